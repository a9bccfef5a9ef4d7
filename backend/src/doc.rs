//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every ledger endpoint under `/api`, the probe
//! endpoints, and the payload schemas they exchange. Swagger UI serves it in
//! debug builds and `openapi-dump` prints it for external tooling.

use utoipa::OpenApi;

use crate::domain::ports::BatchOutcome;
use crate::domain::{
    EmailBook, EmailDraft, EmailLogEntry, EmailMode, Error, ErrorCode, LedgerSnapshot, LoanRow,
    LoanStatus,
};
use crate::inbound::http::emails::{EmailLogResponse, RecordEmailsRequest, ResetRequest};
use crate::inbound::http::health::PingResponse;
use crate::inbound::http::ledger::{AddRecordRequest, UploadRequest};
use crate::inbound::http::responses::{BatchAck, CountAck, VersionAck};
use crate::inbound::http::returns::{ReturnCopyRequest, ReturnStudentRequest};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library loan ledger API",
        description = "Shared ledger of issued library copies, returns, and overdue reminders."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::health::ping,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::ledger::get_rows,
        crate::inbound::http::ledger::upload_rows,
        crate::inbound::http::ledger::add_record,
        crate::inbound::http::ledger::load_sample,
        crate::inbound::http::returns::return_copy,
        crate::inbound::http::returns::return_all,
        crate::inbound::http::emails::get_email_log,
        crate::inbound::http::emails::record_emails,
        crate::inbound::http::emails::reset,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoanRow,
        LoanStatus,
        LedgerSnapshot,
        EmailMode,
        EmailBook,
        EmailDraft,
        EmailLogEntry,
        BatchOutcome,
        UploadRequest,
        AddRecordRequest,
        ReturnCopyRequest,
        ReturnStudentRequest,
        RecordEmailsRequest,
        ResetRequest,
        EmailLogResponse,
        VersionAck,
        BatchAck,
        CountAck,
        PingResponse,
    )),
    tags(
        (name = "ledger", description = "Reading and importing loan rows"),
        (name = "returns", description = "Marking copies as returned"),
        (name = "emails", description = "Reminder log and ledger reset"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
