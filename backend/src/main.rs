//! Loan ledger entry-point: loads settings, restores the ledger, and serves
//! the REST API, the live channel, and (in debug builds) the OpenAPI docs.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use loan_ledger::inbound::http::health::HealthState;
use server::{AppSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| {
        error!(error = %err, "failed to load settings");
        std::io::Error::other(format!("failed to load settings: {err}"))
    })?;
    let config = settings.server_config().map_err(|err| {
        error!(error = %err, "invalid settings");
        std::io::Error::other(err)
    })?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
