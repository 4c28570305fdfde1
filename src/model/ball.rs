use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Extras credited to the batting team without runs off the bat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Extra {
    Wide,
    NoBall,
    Bye,
    LegBye,
    Penalty,
}

impl Extra {
    /// Wides and no-balls do not consume a legal-ball slot in the over.
    pub fn is_illegal_delivery(self) -> bool {
        matches!(self, Extra::Wide | Extra::NoBall)
    }

    /// Wides and no-balls are charged against the bowler; byes and leg-byes
    /// are not.
    pub fn charged_to_bowler(self) -> bool {
        matches!(self, Extra::Wide | Extra::NoBall)
    }
}

/// Ways a batsman can be dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WicketKind {
    Bowled,
    Caught,
    Lbw,
    RunOut,
    Stumped,
    HitWicket,
}

impl WicketKind {
    /// Run-outs are never credited to the bowler.
    pub fn credits_bowler(self) -> bool {
        !matches!(self, WicketKind::RunOut)
    }

    /// Dismissals requiring a fair delivery; impossible off a wide or no-ball.
    pub fn requires_legal_delivery(self) -> bool {
        matches!(
            self,
            WicketKind::Bowled | WicketKind::Caught | WicketKind::Lbw | WicketKind::HitWicket
        )
    }
}

/// Dismissal metadata attached to a wicket-bearing ball.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dismissal {
    pub kind: WicketKind,
    /// The dismissed batsman (usually the striker, but run-outs can take the
    /// non-striker).
    pub player_id: String,
    pub fielder_id: Option<String>,
}

/// Opaque shot-placement tag, carried for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotTag {
    pub zone: String,
    pub x: f32,
    pub y: f32,
}

/// Immutable record of one delivery. Balls are append-only: innings
/// aggregates are rederivable from the ball log at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: String,
    pub match_id: String,
    pub inning: u8,
    /// Completed overs before this delivery.
    pub over_number: u32,
    /// 1-indexed position within the over; resets on legal-ball rollover.
    pub ball_number: u32,
    pub bowler_id: String,
    pub striker_id: String,
    pub non_striker_id: String,
    /// Runs off the bat, credited to the striker.
    pub bat_runs: u32,
    /// Runs credited to the batting team as extras.
    pub extra_runs: u32,
    pub extra: Option<Extra>,
    pub dismissal: Option<Dismissal>,
    pub shot: Option<ShotTag>,
    pub recorded_at: DateTime<Utc>,
}

impl Ball {
    /// Whether this delivery counts toward the 6-ball over.
    pub fn is_legal(&self) -> bool {
        self.extra.map_or(true, |e| !e.is_illegal_delivery())
    }

    /// Total runs the innings gained from this delivery.
    pub fn total_runs(&self) -> u32 {
        self.bat_runs + self.extra_runs
    }
}
