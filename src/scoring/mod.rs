// Ball event processing and match orchestration.

pub use commentary::{BasicCommentary, CommentaryGenerator};
pub use event::{BallEvent, WicketEvent};
pub use processor::{apply_ball, BallOutcome};
pub use result::{compute_result, TeamStanding};
pub use service::ScoringService;

pub mod handlers;

mod commentary;
mod event;
mod processor;
mod result;
mod service;

use thiserror::Error;

/// Errors surfaced by scoring actions. Validation failures are rejected
/// synchronously with no partial mutation.
#[derive(Debug, Clone, Error)]
pub enum ScoringError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Two writers raced on the same match's serialization gate. The caller
    /// must retry; the update is never silently dropped.
    #[error("Concurrent scoring action on match {0}, retry")]
    ConcurrencyConflict(String),

    #[error("Persistence failure: {0}")]
    Persistence(String),
}
