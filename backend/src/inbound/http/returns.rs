//! Return endpoints.
//!
//! Unknown or already returned copies are not errors: the call succeeds and
//! reports the unchanged version.

use actix_web::{post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::responses::{BatchAck, VersionAck};
use crate::inbound::http::state::HttpState;

/// Body of `POST /api/return`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReturnCopyRequest {
    #[serde(default)]
    #[schema(example = "X-1")]
    pub copy_uid: String,
}

/// Body of `POST /api/return-all`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReturnStudentRequest {
    #[serde(default)]
    #[schema(example = "f20230001@goa.bits-pilani.ac.in")]
    pub student_email: String,
}

/// Mark one copy returned.
#[utoipa::path(
    post,
    path = "/api/return",
    request_body = ReturnCopyRequest,
    responses(
        (status = 200, description = "Copy returned, or nothing to return", body = VersionAck),
        (status = 400, description = "copy_uid required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["returns"],
    operation_id = "returnCopy"
)]
#[post("/return")]
pub async fn return_copy(
    state: web::Data<HttpState>,
    payload: web::Json<ReturnCopyRequest>,
) -> ApiResult<web::Json<VersionAck>> {
    let outcome = state.commands.return_copy(&payload.copy_uid).await?;
    Ok(web::Json(VersionAck::new(outcome.version)))
}

/// Mark every issued copy held by one student returned.
#[utoipa::path(
    post,
    path = "/api/return-all",
    request_body = ReturnStudentRequest,
    responses(
        (status = 200, description = "Copies returned", body = BatchAck),
        (status = 400, description = "student_email required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["returns"],
    operation_id = "returnAllForStudent"
)]
#[post("/return-all")]
pub async fn return_all(
    state: web::Data<HttpState>,
    payload: web::Json<ReturnStudentRequest>,
) -> ApiResult<web::Json<BatchAck>> {
    let outcome = state.commands.return_student(&payload.student_email).await?;
    Ok(web::Json(outcome.into()))
}

#[cfg(test)]
#[path = "returns_tests.rs"]
mod tests;
