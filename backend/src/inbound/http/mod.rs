//! HTTP inbound adapter exposing the ledger REST endpoints.

pub mod emails;
pub mod error;
pub mod health;
pub mod ledger;
pub mod responses;
pub mod returns;
pub mod state;
#[cfg(test)]
pub mod test_utils;

use actix_web::{Scope, web};

pub use error::ApiResult;

/// Largest accepted JSON body; a full-term spreadsheet fits comfortably.
pub const JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Every ledger endpoint under `/api`, with JSON extractor failures mapped
/// to `invalid_request` payloads.
///
/// Handlers expect a `web::Data<HttpState>` registered on the app.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .app_data(
            web::JsonConfig::default()
                .limit(JSON_BODY_LIMIT)
                .error_handler(error::json_error_handler),
        )
        .service(health::ping)
        .service(ledger::get_rows)
        .service(ledger::upload_rows)
        .service(ledger::add_record)
        .service(ledger::load_sample)
        .service(returns::return_copy)
        .service(returns::return_all)
        .service(emails::get_email_log)
        .service(emails::record_emails)
        .service(emails::reset)
}
