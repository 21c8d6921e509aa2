use std::{fs::File, path::Path};

use csv::Writer;

pub fn create_writer(path: &Path) -> Result<Writer<File>, std::io::Error> {
    let f = File::create(path)?;

    #[cfg(unix)]
    {
        use std::os::unix::prelude::PermissionsExt;

        let mut permissions = f.metadata()?.permissions();
        permissions.set_mode(0o664);
        f.set_permissions(permissions)?;
    }

    Ok(Writer::from_writer(f))
}
