//! Command layer - the boundary between the outside world and the
//! application services.

pub mod dispatcher;

// Re-export for easier access
pub use dispatcher::{DispatchOutcome, Dispatcher};
