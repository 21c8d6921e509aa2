use std::{path::Path, time::Duration};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationNanoSeconds};

use super::helper::create_writer;

/// One participant's share of a lock run.
#[serde_as]
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Record {
    pub id: usize,
    pub cpu_id: Option<usize>,
    pub thread_num: usize,
    pub iterations: u64,
    pub completed: u64,
    #[serde_as(as = "DurationNanoSeconds")]
    pub elapsed: Duration,
    pub locktype: String,
}

pub fn write_results<'a>(
    output_path: &Path,
    results: impl IntoIterator<Item = &'a Record>,
) -> anyhow::Result<()> {
    let mut writer = create_writer(output_path)
        .with_context(|| format!("failed to create {}", output_path.display()))?;

    for record in results {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}
