pub mod dekker;
pub mod harness;
pub mod lock;
pub mod mutex_lock;
pub mod peterson;
pub mod spin_lock;

mod sync;

pub use harness::{Checkpoint, SharedCounter, Violation};
pub use lock::{LockType, ParticipantLock};
