//! Engine error taxonomy.
//!
//! Rule violations never surface here: an illegal order is recorded as an
//! `Invalid` status on the order itself and reported back through the order
//! list. `EngineError` covers structural and programmer errors only, which
//! indicate a bug in the caller or corrupted embedded data rather than a
//! game-rule outcome.

use thiserror::Error;

/// Errors raised for structural invariant violations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown region id '{0}'")]
    UnknownRegion(String),

    #[error("no unit at {0} to act on the submitted order")]
    MissingUnit(String),

    #[error("map data invalid: {0}")]
    InvalidMapData(String),

    #[error("world data invalid: {0}")]
    InvalidWorldData(String),

    #[error("malformed embedded data file: {0}")]
    MalformedData(#[from] serde_json::Error),
}
