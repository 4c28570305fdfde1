// Broadcast hub: decouples the scorer (producer) from viewers (consumers).

pub use hub::BroadcastHub;
pub use messages::{
    ActiveMatchesListPayload, BallUpdatePayload, InningEndPayload, InningStartedPayload,
    LiveMatchSummary, MatchCompletePayload, MatchSnapshotPayload, MessageType, OutboundMessage,
    TossUpdatePayload,
};
pub use sweep::{start_sweep_task, sweep_once, SweepConfig};

mod hub;
mod messages;
mod sweep;
