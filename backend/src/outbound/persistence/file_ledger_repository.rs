//! Ledger snapshot stored as one JSON file.

use std::io;

use cap_std::fs::Dir;

use crate::domain::LedgerSnapshot;
use crate::domain::ports::{LedgerPersistenceError, LedgerRepository};

use super::atomic_io::write_atomic;

/// File name of the ledger snapshot inside the data directory.
pub const LEDGER_FILE: &str = "ledger.json";

/// [`LedgerRepository`] backed by `ledger.json`.
#[derive(Debug)]
pub struct FileLedgerRepository {
    dir: Dir,
}

impl FileLedgerRepository {
    /// Store the snapshot in `dir`.
    #[must_use]
    pub fn new(dir: Dir) -> Self {
        Self { dir }
    }
}

impl LedgerRepository for FileLedgerRepository {
    fn load(&self) -> Result<Option<LedgerSnapshot>, LedgerPersistenceError> {
        let contents = match self.dir.read_to_string(LEDGER_FILE) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(LedgerPersistenceError::io(err.to_string())),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|err| LedgerPersistenceError::corrupt(err.to_string()))
    }

    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), LedgerPersistenceError> {
        let encoded = serde_json::to_vec_pretty(snapshot)
            .map_err(|err| LedgerPersistenceError::io(err.to_string()))?;
        write_atomic(&self.dir, LEDGER_FILE, &encoded)
            .map_err(|err| LedgerPersistenceError::io(err.to_string()))
    }
}
