mod cli;
mod configuration;
mod error;
mod sync;

pub use self::cli::{lodestone_cli_style, set_ctrlc_handler};
pub use self::configuration::{StorageOptions, SyncOptions};
pub use self::error::{ReportExt, WorkerError, WorkerErrorResultExt};
pub use self::sync::{CycleOutcome, SyncWorker};
