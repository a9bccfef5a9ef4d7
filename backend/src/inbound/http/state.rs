//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on the driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LedgerCommand, LedgerQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub commands: Arc<dyn LedgerCommand>,
    pub queries: Arc<dyn LedgerQuery>,
}

impl HttpState {
    /// Bundle the command and query ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use loan_ledger::inbound::http::state::HttpState;
    /// use loan_ledger::test_support::InMemoryLedger;
    ///
    /// let ledger = InMemoryLedger::new();
    /// let state = HttpState::new(ledger.service.clone(), ledger.service.clone());
    /// let _commands = Arc::clone(&state.commands);
    /// ```
    pub fn new(commands: Arc<dyn LedgerCommand>, queries: Arc<dyn LedgerQuery>) -> Self {
        Self { commands, queries }
    }

    /// State whose command and query ports are served by one service.
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: LedgerCommand + LedgerQuery + 'static,
    {
        Self {
            commands: service.clone(),
            queries: service,
        }
    }
}
