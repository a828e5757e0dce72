use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

/// Which move precondition failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum ViolationKind {
    SourceMismatch,
    DestinationOccupied,
}

#[derive(Error, Debug)]
pub enum SlotPlanError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("Unknown scenario '{0}'")]
    UnknownScenario(String),

    #[error("Unknown {kind} '{key}'")]
    UnknownKey { kind: &'static str, key: String },

    #[error("Malformed solver response: {reason}\n--- payload ---\n{payload}")]
    MalformedSolverResponse { reason: String, payload: String },

    #[error("Step {step}: precondition violated ({kind}): {detail}")]
    PreconditionViolation {
        step: usize,
        kind: ViolationKind,
        detail: String,
    },

    #[error("Cost mismatch: solver reported {reported}, recomputed {recomputed}")]
    CostMismatch { reported: i64, recomputed: u64 },

    #[error("Execution Error: {0}")]
    Execution(String),
}

impl SlotPlanError {
    pub fn unknown_key(kind: &'static str, key: impl ToString) -> Self {
        SlotPlanError::UnknownKey {
            kind,
            key: key.to_string(),
        }
    }

    pub fn malformed(reason: impl Into<String>, payload: impl Into<String>) -> Self {
        SlotPlanError::MalformedSolverResponse {
            reason: reason.into(),
            payload: payload.into(),
        }
    }
}

pub type SpResult<T> = Result<T, SlotPlanError>;
