use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::model::ball::Dismissal;
use crate::stats;

/// A team is all out after ten wickets; one batsman always remains not-out.
pub const MAX_WICKETS: u32 = 10;

/// Number of overs in the powerplay window at the start of an innings.
pub const POWERPLAY_OVERS: u32 = 6;

/// Per-type breakdown of extras conceded in an innings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtrasBreakdown {
    pub wides: u32,
    pub no_balls: u32,
    pub byes: u32,
    pub leg_byes: u32,
    pub penalty: u32,
}

impl ExtrasBreakdown {
    pub fn total(&self) -> u32 {
        self.wides + self.no_balls + self.byes + self.leg_byes + self.penalty
    }
}

/// Per-batsman aggregates for one innings. Created lazily the first time a
/// player takes strike; never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingEntry {
    pub player_id: String,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub strike_rate: f64,
    pub is_out: bool,
    pub is_batting: bool,
    pub dismissal: Option<Dismissal>,
}

impl BattingEntry {
    fn new(player_id: String) -> Self {
        Self {
            player_id,
            runs: 0,
            balls: 0,
            fours: 0,
            sixes: 0,
            strike_rate: 0.0,
            is_out: false,
            is_batting: true,
            dismissal: None,
        }
    }
}

/// Per-bowler aggregates for one innings, same lifecycle as `BattingEntry`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlingEntry {
    pub player_id: String,
    /// Legal deliveries bowled.
    pub balls: u32,
    pub maidens: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
    pub economy: f64,
    /// Runs charged to this bowler in the over currently in progress.
    pub current_over_runs: u32,
}

impl BowlingEntry {
    fn new(player_id: String) -> Self {
        Self {
            player_id,
            balls: 0,
            maidens: 0,
            runs_conceded: 0,
            wickets: 0,
            economy: 0.0,
            current_over_runs: 0,
        }
    }

    pub fn overs(&self) -> f64 {
        stats::overs_from_balls(self.balls)
    }

    pub fn overs_display(&self) -> String {
        stats::overs_display(self.balls)
    }
}

/// Runs and balls contributed by the current pair of batsmen since the last
/// wicket. Replaced wholesale when a wicket falls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partnership {
    pub batsman_a: String,
    pub batsman_b: String,
    pub runs: u32,
    pub balls: u32,
}

impl Partnership {
    pub fn new(batsman_a: String, batsman_b: String) -> Self {
        Self {
            batsman_a,
            batsman_b,
            runs: 0,
            balls: 0,
        }
    }

    pub fn involves(&self, a: &str, b: &str) -> bool {
        (self.batsman_a == a && self.batsman_b == b)
            || (self.batsman_a == b && self.batsman_b == a)
    }
}

/// Runs and wickets inside the powerplay window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerplayStats {
    pub runs: u32,
    pub wickets: u32,
}

/// Why an innings stopped accepting balls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SealReason {
    AllOut,
    OversExhausted,
    Declared,
}

/// One team's batting turn. Owned by a `MatchModel`, mutated only through
/// the ball event processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Innings {
    pub number: u8,
    pub batting_team: String,
    pub bowling_team: String,
    pub total_runs: u32,
    pub wickets: u32,
    pub legal_balls: u32,
    /// Every delivery bowled, legal or not. Drives per-delivery ball identity.
    pub deliveries: u32,
    /// Runs the batting side needs to win; set for the second innings only.
    pub target: Option<u32>,
    pub extras: ExtrasBreakdown,
    pub batting: Vec<BattingEntry>,
    pub bowling: Vec<BowlingEntry>,
    pub current_partnership: Option<Partnership>,
    pub highest_partnership: Option<Partnership>,
    pub powerplay: PowerplayStats,
    pub sealed: Option<SealReason>,
}

impl Innings {
    pub fn new(number: u8, batting_team: String, bowling_team: String, target: Option<u32>) -> Self {
        Self {
            number,
            batting_team,
            bowling_team,
            total_runs: 0,
            wickets: 0,
            legal_balls: 0,
            deliveries: 0,
            target,
            extras: ExtrasBreakdown::default(),
            batting: Vec::new(),
            bowling: Vec::new(),
            current_partnership: None,
            highest_partnership: None,
            powerplay: PowerplayStats::default(),
            sealed: None,
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed.is_some()
    }

    pub fn overs(&self) -> f64 {
        stats::overs_from_balls(self.legal_balls)
    }

    pub fn overs_display(&self) -> String {
        stats::overs_display(self.legal_balls)
    }

    pub fn run_rate(&self) -> f64 {
        stats::run_rate(self.total_runs, self.overs())
    }

    /// Find or lazily create the batting entry for a player.
    pub fn batting_entry_mut(&mut self, player_id: &str) -> &mut BattingEntry {
        if let Some(index) = self.batting.iter().position(|e| e.player_id == player_id) {
            return &mut self.batting[index];
        }
        self.batting.push(BattingEntry::new(player_id.to_string()));
        self.batting.last_mut().unwrap()
    }

    /// Find or lazily create the bowling entry for a player.
    pub fn bowling_entry_mut(&mut self, player_id: &str) -> &mut BowlingEntry {
        if let Some(index) = self.bowling.iter().position(|e| e.player_id == player_id) {
            return &mut self.bowling[index];
        }
        self.bowling.push(BowlingEntry::new(player_id.to_string()));
        self.bowling.last_mut().unwrap()
    }

    /// Promote the current partnership into the highest-partnership slot when
    /// it beats the record, then clear it for the incoming batsman.
    pub fn close_partnership(&mut self) {
        if let Some(current) = self.current_partnership.take() {
            let beats_record = self
                .highest_partnership
                .as_ref()
                .map_or(true, |best| current.runs > best.runs);
            if beats_record {
                self.highest_partnership = Some(current);
            }
        }
    }
}
