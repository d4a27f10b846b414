//! Data Transfer Objects for the action surface
//!
//! Contains the typed per-action request structs, the single response
//! envelope shared by every action, and the session-scoped CSRF token.
//! Requests are validated here, at the dispatch boundary, before any
//! business logic runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::application::search::SearchQuery;
use crate::domain::entities::{
    DashboardStats, DatabaseCheck, KeywordPatch, NewProhibitedKeyword, ProductProjection,
};
use crate::domain::errors::{WorkflowError, WorkflowResult};

// ============================================================================
// Session context
// ============================================================================

/// Session-scoped anti-forgery secret. Generated once per session and
/// compared byte-for-byte against the caller-supplied value; never
/// regenerated mid-session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_value(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Byte equality, no normalization.
    pub fn matches(&self, supplied: &str) -> bool {
        self.0.as_bytes() == supplied.as_bytes()
    }
}

/// Explicit per-request view of the session, passed into the
/// dispatcher. The token is read-only for a request's lifetime.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub csrf_token: CsrfToken,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            csrf_token: CsrfToken::generate(),
        }
    }

    pub fn with_token(csrf_token: CsrfToken) -> Self {
        Self { csrf_token }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Parsed, typed action request. The `action` wire parameter selects
/// the variant; remaining parameters are validated per-variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionRequest {
    GetDashboardStats,
    SearchProducts {
        #[serde(flatten)]
        query: SearchQuery,
    },
    TestDatabase,
    ApproveProducts {
        ids: Vec<String>,
        decision: String,
        reviewer: String,
    },
    AddProhibitedKeyword {
        #[serde(flatten)]
        keyword: NewProhibitedKeyword,
    },
    UpdateProhibitedKeyword {
        id: i64,
        #[serde(flatten)]
        patch: KeywordPatch,
    },
    DeleteProhibitedKeyword {
        id: i64,
    },
}

impl ActionRequest {
    /// Parse a raw parameter map. `Ok(None)` means no `action`
    /// parameter was present: the caller renders the dashboard page
    /// instead (outside this core).
    pub fn from_params(params: &Value) -> WorkflowResult<Option<Self>> {
        let Some(action) = params.get("action") else {
            return Ok(None);
        };
        if !action.is_string() {
            return Err(WorkflowError::invalid_request(
                "action parameter must be a string",
            ));
        }
        serde_json::from_value(params.clone())
            .map(Some)
            .map_err(|err| WorkflowError::invalid_request(err.to_string()))
    }

    /// Wire name of the action, used in the response envelope.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetDashboardStats => "get_dashboard_stats",
            Self::SearchProducts { .. } => "search_products",
            Self::TestDatabase => "test_database",
            Self::ApproveProducts { .. } => "approve_products",
            Self::AddProhibitedKeyword { .. } => "add_prohibited_keyword",
            Self::UpdateProhibitedKeyword { .. } => "update_prohibited_keyword",
            Self::DeleteProhibitedKeyword { .. } => "delete_prohibited_keyword",
        }
    }

    /// Mutating actions require the CSRF guard; reads do not.
    pub fn is_mutating(&self) -> bool {
        match self {
            Self::GetDashboardStats | Self::SearchProducts { .. } | Self::TestDatabase => false,
            Self::ApproveProducts { .. }
            | Self::AddProhibitedKeyword { .. }
            | Self::UpdateProhibitedKeyword { .. }
            | Self::DeleteProhibitedKeyword { .. } => true,
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Typed payload variants carried by the shared envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResponsePayload {
    Stats(DashboardStats),
    Products(Vec<ProductProjection>),
    Database(DatabaseCheck),
    Approved { approved: u64 },
    Applied(bool),
}

/// The one JSON envelope every action responds with.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResponse {
    pub action: String,
    pub success: bool,
    pub data: Option<ResponsePayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ActionResponse {
    pub fn ok(action: &str, data: ResponsePayload) -> Self {
        Self {
            action: action.to_string(),
            success: true,
            data: Some(data),
            message: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failure(action: &str, message: impl Into<String>) -> Self {
        Self {
            action: action.to_string(),
            success: false,
            data: None,
            message: Some(message.into()),
            timestamp: Utc::now(),
        }
    }

    pub fn from_error(action: &str, err: &WorkflowError) -> Self {
        Self::failure(action, err.to_string())
    }
}
