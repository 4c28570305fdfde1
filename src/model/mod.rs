// Match state model: the entities the scoring engine owns in memory per
// active match, plus their invariants.

pub use ball::{Ball, Dismissal, Extra, ShotTag, WicketKind};
pub use innings::{
    BattingEntry, BowlingEntry, ExtrasBreakdown, Innings, Partnership, PowerplayStats, SealReason,
    MAX_WICKETS, POWERPLAY_OVERS,
};
pub use match_model::{
    CommentaryLine, MatchModel, MatchResult, MatchStatus, ResultMethod, TossDecision, TossOutcome,
};

mod ball;
mod innings;
mod match_model;
