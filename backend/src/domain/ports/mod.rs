//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports ([`LedgerCommand`], [`LedgerQuery`]) are what inbound
//! adapters call. Driven ports ([`LedgerRepository`], [`EmailLogRepository`],
//! [`ChangeBroadcaster`], [`MailDispatcher`]) are what the domain calls out
//! to. Each driven port ships an in-memory implementation for tests.

mod macros;
pub(crate) use macros::define_port_error;

mod change_broadcaster;
mod email_log_repository;
mod ledger_command;
mod ledger_query;
mod ledger_repository;
mod mail_dispatcher;

#[cfg(test)]
pub use change_broadcaster::MockChangeBroadcaster;
pub use change_broadcaster::{ChangeBroadcaster, RecordingBroadcaster};
#[cfg(test)]
pub use email_log_repository::MockEmailLogRepository;
pub use email_log_repository::{EmailLogError, EmailLogRepository, InMemoryEmailLogRepository};
#[cfg(test)]
pub use ledger_command::MockLedgerCommand;
pub use ledger_command::{BatchOutcome, LedgerCommand};
#[cfg(test)]
pub use ledger_query::MockLedgerQuery;
pub use ledger_query::LedgerQuery;
#[cfg(test)]
pub use ledger_repository::MockLedgerRepository;
pub use ledger_repository::{InMemoryLedgerRepository, LedgerPersistenceError, LedgerRepository};
#[cfg(test)]
pub use mail_dispatcher::MockMailDispatcher;
pub use mail_dispatcher::{MailDispatcher, RecordingMailDispatcher};
