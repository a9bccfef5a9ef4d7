//! Test helpers for inbound HTTP components.

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::inbound::http::api_scope;
use crate::inbound::http::state::HttpState;
use crate::test_support::InMemoryLedger;

/// App serving [`api_scope`] over `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .service(api_scope())
}

/// App backed by a fresh in-memory ledger, returned alongside it so tests
/// can inspect broadcasts and stored snapshots.
pub fn in_memory_app() -> (
    InMemoryLedger,
    App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    >,
) {
    let ledger = InMemoryLedger::new();
    let app = test_app(ledger.http_state());
    (ledger, app)
}
