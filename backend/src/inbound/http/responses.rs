//! Acknowledgement bodies shared by the mutation endpoints.
//!
//! Every mutation answers `{ "ok": true, ... }` so the desk front-end can
//! treat all of them alike; the extra fields depend on the operation.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::BatchOutcome;

/// `{ok, version}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct VersionAck {
    #[schema(example = true)]
    pub ok: bool,
    #[schema(example = 4)]
    pub version: u64,
}

impl VersionAck {
    pub fn new(version: u64) -> Self {
        Self { ok: true, version }
    }
}

/// `{ok, version, count}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct BatchAck {
    #[schema(example = true)]
    pub ok: bool,
    #[schema(example = 4)]
    pub version: u64,
    #[schema(example = 12)]
    pub count: usize,
}

impl From<BatchOutcome> for BatchAck {
    fn from(outcome: BatchOutcome) -> Self {
        Self {
            ok: true,
            version: outcome.version,
            count: outcome.count,
        }
    }
}

/// `{ok, count}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CountAck {
    #[schema(example = true)]
    pub ok: bool,
    #[schema(example = 2)]
    pub count: usize,
}

impl CountAck {
    pub fn new(count: usize) -> Self {
        Self { ok: true, count }
    }
}
