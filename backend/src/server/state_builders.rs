//! Builders wiring file-backed adapters into the ledger service and the
//! adapter states that front it.

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use loan_ledger::domain::LedgerService;
use loan_ledger::inbound::http::state::HttpState;
use loan_ledger::inbound::ws::state::WsState;
use loan_ledger::outbound::broadcast::SessionHub;
use loan_ledger::outbound::mail::{LoggingMailTransport, TransportMailDispatcher};
use loan_ledger::outbound::persistence::{
    FileEmailLogRepository, FileLedgerRepository, open_data_dir,
};

use super::ServerConfig;

/// Adapter states sharing one ledger service and one session hub.
#[derive(Clone)]
pub(super) struct AdapterStates {
    pub(super) http: web::Data<HttpState>,
    pub(super) ws: web::Data<WsState>,
}

/// Open the data directory, load the ledger, and wire the adapters.
///
/// # Errors
/// Returns [`io::Error`] when the data directory cannot be created or opened.
pub(super) fn build_adapter_states(config: &ServerConfig) -> io::Result<AdapterStates> {
    let dir = open_data_dir(&config.data_dir)?;
    let ledger_repo = Arc::new(FileLedgerRepository::new(dir.try_clone()?));
    let email_log = Arc::new(FileEmailLogRepository::new(dir));
    let hub = SessionHub::default();
    let mailer = TransportMailDispatcher::new(Arc::new(LoggingMailTransport), &config.mail_from);

    let service = Arc::new(LedgerService::load(
        ledger_repo,
        email_log,
        Arc::new(hub.clone()),
        Arc::new(mailer),
        Arc::new(DefaultClock),
    ));

    Ok(AdapterStates {
        http: web::Data::new(HttpState::from_service(service)),
        ws: web::Data::new(WsState::new(hub, config.allowed_origin.clone())),
    })
}
