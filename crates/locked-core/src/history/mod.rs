//! Minute history per mode: the ledger format, the key-value collaborator and
//! the progress logger that feeds it.

mod ledger;
mod logger;
mod store;

pub use ledger::{DayBucket, Granularity, History};
pub use logger::{load_history, Credit, ProgressLogger};
pub use store::{KvStore, MemoryStore};
