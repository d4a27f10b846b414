//! Auction Lister - workflow dashboard backend
//!
//! The state-bearing core behind an auction-to-marketplace listing
//! dashboard: stage-funnel statistics, product search and a
//! CSRF-guarded action dispatcher over a SQLite product catalog.

// Module declarations
pub mod application;
pub mod commands;
pub mod domain;
pub mod infrastructure;

// Re-export the action surface for easier access
pub use application::dto::{ActionResponse, CsrfToken, SessionContext};
pub use commands::{DispatchOutcome, Dispatcher};
pub use domain::{WorkflowError, WorkflowResult, WorkflowStage};
