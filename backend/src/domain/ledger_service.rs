//! Ledger domain service.
//!
//! [`LedgerService`] implements the driving ports. It owns the in-memory
//! ledger behind a mutex and runs every mutation as one critical section:
//! validate, mutate, persist, broadcast. A failed snapshot write restores the
//! pre-mutation ledger so memory never runs ahead of disk.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::ports::{
    BatchOutcome, ChangeBroadcaster, EmailLogError, EmailLogRepository, LedgerCommand,
    LedgerPersistenceError, LedgerQuery, LedgerRepository, MailDispatcher,
};
use crate::domain::{
    EmailDraft, EmailLogEntry, Error, ImportSource, Ledger, LedgerEvent, LedgerSnapshot,
    RawRecord, RowError, ValidatedBatch, return_all_for_student, return_by_copy, sample_records,
    validate_batch,
};

/// Literal the reset operation must receive to proceed.
pub const RESET_CONFIRMATION: &str = "RESET";

/// Ledger service implementing [`LedgerCommand`] and [`LedgerQuery`].
pub struct LedgerService<R, E> {
    ledger: Mutex<Ledger>,
    ledger_repo: Arc<R>,
    email_log: Arc<E>,
    broadcaster: Arc<dyn ChangeBroadcaster>,
    mailer: Arc<dyn MailDispatcher>,
    clock: Arc<dyn Clock>,
}

impl<R, E> LedgerService<R, E>
where
    R: LedgerRepository,
    E: EmailLogRepository,
{
    /// Build the service, seeding the ledger from the stored snapshot.
    ///
    /// A missing snapshot starts an empty ledger. So does a corrupt or
    /// unreadable one; the failure is logged and never fatal.
    pub fn load(
        ledger_repo: Arc<R>,
        email_log: Arc<E>,
        broadcaster: Arc<dyn ChangeBroadcaster>,
        mailer: Arc<dyn MailDispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let ledger = match ledger_repo.load() {
            Ok(Some(snapshot)) => {
                let ledger = Ledger::from_snapshot(snapshot);
                info!(
                    version = ledger.version(),
                    rows = ledger.rows().len(),
                    "ledger snapshot loaded"
                );
                ledger
            }
            Ok(None) => Ledger::default(),
            Err(err) => {
                warn!(error = %err, "ledger snapshot unreadable; starting empty");
                Ledger::default()
            }
        };
        Self {
            ledger: Mutex::new(ledger),
            ledger_repo,
            email_log,
            broadcaster,
            mailer,
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Ledger>, Error> {
        self.ledger
            .lock()
            .map_err(|_| Error::internal("ledger lock poisoned"))
    }

    fn map_persistence_error(err: &LedgerPersistenceError) -> Error {
        Error::internal(format!("failed to persist ledger: {err}"))
    }

    fn map_email_log_error(err: &EmailLogError) -> Error {
        Error::internal(format!("email log unavailable: {err}"))
    }

    fn validation_error(errors: &[RowError]) -> Error {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        Error::invalid_request("Validation failed").with_details(json!({ "errors": messages }))
    }

    /// Write the mutated ledger through, or put `previous` back.
    fn persist(&self, ledger: &mut Ledger, previous: Ledger) -> Result<(), Error> {
        if let Err(err) = self.ledger_repo.save(&ledger.snapshot()) {
            error!(error = %err, version = ledger.version(), "ledger write failed; rolled back");
            *ledger = previous;
            return Err(Self::map_persistence_error(&err));
        }
        Ok(())
    }

    fn apply_batch(&self, batch: ValidatedBatch, operation: &str) -> Result<BatchOutcome, Error> {
        let received = batch.len();
        let mut ledger = self.lock()?;
        let previous = ledger.clone();
        let version = ledger.apply_upserts(batch);
        self.persist(&mut ledger, previous)?;

        let rows = ledger.rows().to_vec();
        let count = rows.len();
        self.broadcaster
            .publish(&LedgerEvent::Import { rows, version });
        info!(operation, version, received, total = count, "ledger rows merged");
        Ok(BatchOutcome { version, count })
    }

    fn apply_return<F>(&self, operation: &str, transition: F) -> Result<BatchOutcome, Error>
    where
        F: FnOnce(&mut Ledger) -> Vec<String>,
    {
        let mut ledger = self.lock()?;
        let previous = ledger.clone();
        let uids = transition(&mut ledger);
        let version = ledger.version();
        if uids.is_empty() {
            return Ok(BatchOutcome { version, count: 0 });
        }
        self.persist(&mut ledger, previous)?;

        let count = uids.len();
        self.broadcaster
            .publish(&LedgerEvent::Return { uids, version });
        info!(operation, version, count, "copies returned");
        Ok(BatchOutcome { version, count })
    }
}

#[async_trait]
impl<R, E> LedgerCommand for LedgerService<R, E>
where
    R: LedgerRepository,
    E: EmailLogRepository,
{
    async fn import_rows(&self, records: Vec<RawRecord>) -> Result<BatchOutcome, Error> {
        let batch = validate_batch(&records, ImportSource::Spreadsheet)
            .map_err(|errors| Self::validation_error(&errors))?;
        self.apply_batch(batch, "import")
    }

    async fn add_record(&self, record: RawRecord) -> Result<u64, Error> {
        let batch = validate_batch(std::slice::from_ref(&record), ImportSource::Manual)
            .map_err(|errors| Self::validation_error(&errors))?;
        self.apply_batch(batch, "add")
            .map(|outcome| outcome.version)
    }

    async fn load_sample(&self) -> Result<BatchOutcome, Error> {
        let batch = validate_batch(&sample_records(), ImportSource::Manual)
            .map_err(|errors| Self::validation_error(&errors))?;
        self.apply_batch(batch, "load_sample")
    }

    async fn return_copy(&self, copy_uid: &str) -> Result<BatchOutcome, Error> {
        if copy_uid.trim().is_empty() {
            return Err(Error::invalid_request("copy_uid required"));
        }
        self.apply_return("return", |ledger| return_by_copy(ledger, copy_uid))
    }

    async fn return_student(&self, student_email: &str) -> Result<BatchOutcome, Error> {
        if student_email.trim().is_empty() {
            return Err(Error::invalid_request("student_email required"));
        }
        self.apply_return("return_all", |ledger| {
            return_all_for_student(ledger, student_email)
        })
    }

    async fn record_emails(
        &self,
        drafts: Vec<EmailDraft>,
        origin_id: Option<String>,
    ) -> Result<usize, Error> {
        if drafts.is_empty() {
            return Ok(0);
        }
        let now = self.clock.utc();
        let entries: Vec<EmailLogEntry> = drafts
            .into_iter()
            .map(|draft| draft.into_entry(now))
            .collect();
        let origin_id = origin_id.filter(|origin| !origin.trim().is_empty());

        // Held so a concurrent reset cannot interleave with the append.
        let _ledger = self.lock()?;
        self.email_log
            .append(&entries)
            .map_err(|err| Self::map_email_log_error(&err))?;

        let count = entries.len();
        self.broadcaster.publish(&LedgerEvent::EmailsSent {
            entries: entries.clone(),
            origin_id,
        });
        info!(count, "reminder emails logged");
        self.mailer.dispatch(entries);
        Ok(count)
    }

    async fn reset(&self, confirm: &str) -> Result<u64, Error> {
        if confirm != RESET_CONFIRMATION {
            return Err(Error::invalid_request(
                "Confirmation required. Send {confirm:'RESET'}",
            ));
        }
        let mut ledger = self.lock()?;
        let previous = ledger.clone();
        let version = ledger.reset();
        self.persist(&mut ledger, previous)?;

        if let Err(err) = self.email_log.clear() {
            warn!(error = %err, "email log could not be cleared during reset");
        }
        self.broadcaster.publish(&LedgerEvent::Reset { version });
        info!(version, "ledger reset");
        Ok(version)
    }
}

#[async_trait]
impl<R, E> LedgerQuery for LedgerService<R, E>
where
    R: LedgerRepository,
    E: EmailLogRepository,
{
    async fn snapshot(&self) -> Result<LedgerSnapshot, Error> {
        Ok(self.lock()?.snapshot())
    }

    async fn email_log(&self) -> Result<Vec<EmailLogEntry>, Error> {
        self.email_log
            .load_all()
            .map_err(|err| Self::map_email_log_error(&err))
    }
}

#[cfg(test)]
#[path = "ledger_service_tests.rs"]
mod tests;
