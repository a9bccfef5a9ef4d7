//! Reminder log and reset endpoints.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{EmailDraft, EmailLogEntry, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::responses::{CountAck, VersionAck};
use crate::inbound::http::state::HttpState;

/// Body of `GET /api/emails`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmailLogResponse {
    pub logs: Vec<EmailLogEntry>,
}

/// Body of `POST /api/emails`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordEmailsRequest {
    #[serde(default)]
    pub entries: Vec<EmailDraft>,
    /// Tag of the session that sent the reminders; echoed on the broadcast.
    #[serde(default, rename = "originId")]
    pub origin_id: Option<String>,
}

/// Body of `POST /api/reset`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ResetRequest {
    #[serde(default)]
    #[schema(example = "RESET")]
    pub confirm: String,
}

/// Every logged reminder, oldest first.
#[utoipa::path(
    get,
    path = "/api/emails",
    responses(
        (status = 200, description = "Reminder log", body = EmailLogResponse),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["emails"],
    operation_id = "getEmailLog"
)]
#[get("/emails")]
pub async fn get_email_log(state: web::Data<HttpState>) -> ApiResult<web::Json<EmailLogResponse>> {
    let logs = state.queries.email_log().await?;
    Ok(web::Json(EmailLogResponse { logs }))
}

/// Log reminders the desk has sent and queue them for delivery.
#[utoipa::path(
    post,
    path = "/api/emails",
    request_body = RecordEmailsRequest,
    responses(
        (status = 200, description = "Reminders logged", body = CountAck),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["emails"],
    operation_id = "recordEmails"
)]
#[post("/emails")]
pub async fn record_emails(
    state: web::Data<HttpState>,
    payload: web::Json<RecordEmailsRequest>,
) -> ApiResult<web::Json<CountAck>> {
    let RecordEmailsRequest { entries, origin_id } = payload.into_inner();
    let count = state.commands.record_emails(entries, origin_id).await?;
    Ok(web::Json(CountAck::new(count)))
}

/// Clear the ledger and the reminder log. Requires `{"confirm": "RESET"}`.
#[utoipa::path(
    post,
    path = "/api/reset",
    request_body = ResetRequest,
    responses(
        (status = 200, description = "Ledger cleared", body = VersionAck),
        (status = 400, description = "Confirmation required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["emails"],
    operation_id = "resetLedger"
)]
#[post("/reset")]
pub async fn reset(
    state: web::Data<HttpState>,
    payload: web::Json<ResetRequest>,
) -> ApiResult<web::Json<VersionAck>> {
    let version = state.commands.reset(&payload.confirm).await?;
    Ok(web::Json(VersionAck::new(version)))
}

#[cfg(test)]
#[path = "emails_tests.rs"]
mod tests;
