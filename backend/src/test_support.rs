//! Test utilities for the ledger crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for `cfg(test)` and behind the `test-support` feature.

use std::io;
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use mockable::DefaultClock;
use tempfile::TempDir;

use crate::domain::LedgerService;
use crate::domain::ports::{
    InMemoryEmailLogRepository, InMemoryLedgerRepository, RecordingBroadcaster,
    RecordingMailDispatcher,
};
use crate::inbound::http::state::HttpState;

/// Ledger service over in-memory adapters.
pub type InMemoryLedgerService = LedgerService<InMemoryLedgerRepository, InMemoryEmailLogRepository>;

/// A [`LedgerService`] wired to in-memory adapters, with handles on each.
pub struct InMemoryLedger {
    pub service: Arc<InMemoryLedgerService>,
    pub repo: Arc<InMemoryLedgerRepository>,
    pub email_log: Arc<InMemoryEmailLogRepository>,
    pub broadcaster: Arc<RecordingBroadcaster>,
    pub mailer: Arc<RecordingMailDispatcher>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedger {
    /// Empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::with_repo(InMemoryLedgerRepository::default())
    }

    /// Ledger seeded from whatever `repo` holds.
    #[must_use]
    pub fn with_repo(repo: InMemoryLedgerRepository) -> Self {
        let repo = Arc::new(repo);
        let email_log = Arc::new(InMemoryEmailLogRepository::default());
        let broadcaster = Arc::new(RecordingBroadcaster::default());
        let mailer = Arc::new(RecordingMailDispatcher::default());
        let service = Arc::new(LedgerService::load(
            Arc::clone(&repo),
            Arc::clone(&email_log),
            broadcaster.clone(),
            mailer.clone(),
            Arc::new(DefaultClock),
        ));
        Self {
            service,
            repo,
            email_log,
            broadcaster,
            mailer,
        }
    }

    /// HTTP state whose ports are served by this ledger.
    #[must_use]
    pub fn http_state(&self) -> HttpState {
        HttpState::from_service(Arc::clone(&self.service))
    }
}

/// A temporary data directory, opened with `cap_std`.
///
/// Keep the [`TempDir`] alive for as long as the [`Dir`] is in use.
///
/// # Examples
///
/// ```rust
/// use loan_ledger::test_support::temp_data_dir;
///
/// let (_guard, dir) = temp_data_dir()?;
/// dir.write("probe.txt", "ok")?;
/// assert!(dir.exists("probe.txt"));
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn temp_data_dir() -> io::Result<(TempDir, Dir)> {
    let temp = TempDir::new()?;
    let dir = Dir::open_ambient_dir(temp.path(), ambient_authority())?;
    Ok((temp, dir))
}
