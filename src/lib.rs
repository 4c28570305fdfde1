// Library crate for the live cricket scoring server
// This file exposes the public API for integration tests

pub mod broadcast;
pub mod directory;
pub mod model;
pub mod scoring;
pub mod session;
pub mod shared;
pub mod stats;
pub mod storage;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use broadcast::{BroadcastHub, MessageType, OutboundMessage};
pub use model::{Ball, Extra, Innings, MatchModel, MatchStatus, TossDecision, WicketKind};
pub use scoring::{BallEvent, BallOutcome, ScoringError, ScoringService};
pub use session::SessionRegistry;
pub use shared::{AppError, AppState};
pub use storage::{MatchStore, StandingsStore};
