//! Error taxonomy for the workflow core
//!
//! One enum covers every failure the dispatcher can surface to a
//! caller. Storage-level failures collapse into `StoreUnavailable`;
//! the catalog is treated as a single fallible collaborator.

use thiserror::Error;

use crate::domain::funnel::WorkflowStage;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("catalog store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("dashboard statistics unavailable: {message}")]
    StatsUnavailable { message: String },

    #[error("invalid stage transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: WorkflowStage,
        to: WorkflowStage,
    },

    #[error("csrf token missing or mismatched")]
    CsrfRejected,

    #[error("keyword '{keyword}' already exists for category '{category}'")]
    DuplicateKeyword { keyword: String, category: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
}

impl WorkflowError {
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    pub fn stats_unavailable(message: impl Into<String>) -> Self {
        Self::StatsUnavailable {
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// True when the failure is caused by the request rather than the
    /// backing store. Client faults are logged at `warn`, store faults
    /// at `error`.
    pub fn is_client_fault(&self) -> bool {
        match self {
            Self::StoreUnavailable { .. } | Self::StatsUnavailable { .. } => false,
            Self::InvalidTransition { .. }
            | Self::CsrfRejected
            | Self::DuplicateKeyword { .. }
            | Self::NotFound { .. }
            | Self::InvalidRequest { .. } => true,
        }
    }
}

impl From<sqlx::Error> for WorkflowError {
    fn from(err: sqlx::Error) -> Self {
        Self::StoreUnavailable {
            message: err.to_string(),
        }
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
