//! Application layer - use cases over the domain
//!
//! Aggregation, search and mutation use cases, plus the DTOs shared
//! with the command layer.

pub mod approval;
pub mod dto;
pub mod keywords;
pub mod search;
pub mod stats;

pub use approval::ApprovalUseCase;
pub use dto::{ActionRequest, ActionResponse, CsrfToken, ResponsePayload, SessionContext};
pub use keywords::KeywordUseCase;
pub use search::{SearchEngine, SearchOutcome, SearchQuery};
pub use stats::StatsAggregator;
