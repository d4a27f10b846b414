//! Workflow stage funnel
//!
//! Defines the ordered stages a catalog item moves through between
//! acquisition and marketplace publication, and the forward-only
//! transition rule. Stage order is the enum declaration order.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{WorkflowError, WorkflowResult};

/// Funnel position of a product. Variant order is the funnel order;
/// comparisons rely on the derived `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStage {
    Scraped,
    Calculated,
    Filtered,
    Ready,
    Listed,
}

impl WorkflowStage {
    /// Deterministic iteration order for funnel-wide operations.
    pub const ALL: [Self; 5] = [
        Self::Scraped,
        Self::Calculated,
        Self::Filtered,
        Self::Ready,
        Self::Listed,
    ];

    /// Storage encoding. Matches the serde wire form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scraped => "scraped",
            Self::Calculated => "calculated",
            Self::Filtered => "filtered",
            Self::Ready => "ready",
            Self::Listed => "listed",
        }
    }

    /// Decode the storage encoding produced by [`Self::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scraped" => Some(Self::Scraped),
            "calculated" => Some(Self::Calculated),
            "filtered" => Some(Self::Filtered),
            "ready" => Some(Self::Ready),
            "listed" => Some(Self::Listed),
            _ => None,
        }
    }

    /// Zero-based funnel index.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Successor in the funnel, or `None` at the terminal stage.
    pub fn next_stage(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// This stage and everything after it, in funnel order.
    pub fn and_beyond(self) -> &'static [Self] {
        &Self::ALL[self.index()..]
    }
}

/// Forward or same-stage only. Same-stage reassignment is permitted for
/// idempotent retries; regression is not.
pub fn is_valid_transition(from: WorkflowStage, to: WorkflowStage) -> bool {
    to >= from
}

/// [`is_valid_transition`] as a result, for callers that report the
/// rejected pair.
pub fn check_transition(from: WorkflowStage, to: WorkflowStage) -> WorkflowResult<()> {
    if is_valid_transition(from, to) {
        Ok(())
    } else {
        Err(WorkflowError::InvalidTransition { from, to })
    }
}
