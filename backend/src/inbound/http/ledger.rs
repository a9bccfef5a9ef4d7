//! Ledger read and import endpoints.
//!
//! ```text
//! GET  /api/rows         -> {version, rows}
//! POST /api/upload       {rows: [{column: cell}]} -> {ok, version, count}
//! POST /api/add          {column: cell} -> {ok, version}
//! POST /api/load-sample  -> {ok, version, count}
//! ```
//!
//! Upload bodies carry the output of the spreadsheet parser: one object per
//! sheet row keyed by header text, with dates either as text or as
//! spreadsheet serial numbers.

use actix_web::{get, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{Error, LedgerSnapshot, RawRecord};
use crate::inbound::http::ApiResult;
use crate::inbound::http::responses::{BatchAck, VersionAck};
use crate::inbound::http::state::HttpState;

/// Body of `POST /api/upload`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadRequest {
    /// Parsed sheet rows keyed by column header.
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<RawRecord>,
}

/// Body of `POST /api/add`: one record keyed by column name.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct AddRecordRequest(pub RawRecord);

/// Current ledger snapshot.
#[utoipa::path(
    get,
    path = "/api/rows",
    responses(
        (status = 200, description = "Ledger snapshot", body = LedgerSnapshot),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["ledger"],
    operation_id = "getRows"
)]
#[get("/rows")]
pub async fn get_rows(state: web::Data<HttpState>) -> ApiResult<web::Json<LedgerSnapshot>> {
    let snapshot = state.queries.snapshot().await?;
    Ok(web::Json(snapshot))
}

/// Merge a parsed spreadsheet into the ledger, all rows or none.
#[utoipa::path(
    post,
    path = "/api/upload",
    request_body = UploadRequest,
    responses(
        (status = 200, description = "Rows merged", body = BatchAck),
        (status = 400, description = "Validation failed; details.errors lists every bad row", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["ledger"],
    operation_id = "uploadRows"
)]
#[post("/upload")]
pub async fn upload_rows(
    state: web::Data<HttpState>,
    payload: web::Json<UploadRequest>,
) -> ApiResult<web::Json<BatchAck>> {
    let UploadRequest { rows } = payload.into_inner();
    let outcome = state.commands.import_rows(rows).await?;
    Ok(web::Json(outcome.into()))
}

/// Add one hand-entered loan; every field is required.
#[utoipa::path(
    post,
    path = "/api/add",
    request_body = AddRecordRequest,
    responses(
        (status = 200, description = "Record merged", body = VersionAck),
        (status = 400, description = "Validation failed", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["ledger"],
    operation_id = "addRecord"
)]
#[post("/add")]
pub async fn add_record(
    state: web::Data<HttpState>,
    payload: web::Json<AddRecordRequest>,
) -> ApiResult<web::Json<VersionAck>> {
    let AddRecordRequest(record) = payload.into_inner();
    let version = state.commands.add_record(record).await?;
    Ok(web::Json(VersionAck::new(version)))
}

/// Merge the built-in three-row sample.
#[utoipa::path(
    post,
    path = "/api/load-sample",
    responses(
        (status = 200, description = "Sample merged", body = BatchAck),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["ledger"],
    operation_id = "loadSample"
)]
#[post("/load-sample")]
pub async fn load_sample(state: web::Data<HttpState>) -> ApiResult<web::Json<BatchAck>> {
    let outcome = state.commands.load_sample().await?;
    Ok(web::Json(outcome.into()))
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
