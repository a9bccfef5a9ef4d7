//! File-backed persistence adapters.
//!
//! Both stores live in one data directory opened through `cap-std`, so every
//! file operation is confined to that directory.
//!
//! - `ledger.json` holds the pretty-printed `{version, rows}` snapshot and is
//!   replaced atomically on every save.
//! - `email_logs.jsonl` holds one JSON-encoded reminder per line and is only
//!   ever appended to, or removed on reset.
//!
//! # Example
//!
//! ```no_run
//! use loan_ledger::outbound::persistence::{FileLedgerRepository, open_data_dir};
//!
//! let dir = open_data_dir(std::path::Path::new("./data"))?;
//! let repo = FileLedgerRepository::new(dir);
//! # Ok::<(), std::io::Error>(())
//! ```

mod atomic_io;
mod file_email_log_repository;
mod file_ledger_repository;

use std::io;
use std::path::Path;

use cap_std::{ambient_authority, fs::Dir};

pub use file_email_log_repository::{EMAIL_LOG_FILE, FileEmailLogRepository};
pub use file_ledger_repository::{FileLedgerRepository, LEDGER_FILE};

/// Create `path` if needed and open it as a capability directory.
///
/// # Errors
/// Returns the I/O error when the directory cannot be created or opened.
pub fn open_data_dir(path: &Path) -> io::Result<Dir> {
    Dir::create_ambient_dir_all(path, ambient_authority())?;
    Dir::open_ambient_dir(path, ambient_authority())
}
