use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::model::innings::Innings;

/// Match lifecycle. A strict linear machine: no re-entry to a prior state,
/// `Abandoned` reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    Toss,
    Inning1,
    Inning2,
    Completed,
    Abandoned,
}

impl MatchStatus {
    /// States in which balls may be recorded.
    pub fn is_active_innings(self) -> bool {
        matches!(self, MatchStatus::Inning1 | MatchStatus::Inning2)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Abandoned)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TossDecision {
    Bat,
    Field,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TossOutcome {
    pub won_by: String,
    pub decision: TossDecision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResultMethod {
    Runs,
    Wickets,
    Tie,
}

/// Outcome of a completed match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// `None` for a tie.
    pub winner: Option<String>,
    pub margin: u32,
    pub method: ResultMethod,
    pub summary: String,
}

/// One line of the time-ordered commentary log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentaryLine {
    pub inning: u8,
    pub over: u32,
    pub ball: u32,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// The authoritative in-memory state of one match. Teams and players are
/// referenced by id only; their records are externally managed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchModel {
    pub id: String,
    pub tournament_id: String,
    pub team_a: String,
    pub team_b: String,
    pub venue: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: MatchStatus,
    pub overs_per_innings: u32,
    /// 1 or 2 once an innings is live, 0 before the first innings starts.
    pub current_inning: u8,
    /// Completed overs in the live innings.
    pub current_over: u32,
    /// 1-indexed slot of the next delivery within the over.
    pub current_ball: u32,
    pub toss: Option<TossOutcome>,
    /// Ordered by inning number.
    pub innings: Vec<Innings>,
    pub result: Option<MatchResult>,
    pub commentary: Vec<CommentaryLine>,
}

impl MatchModel {
    pub fn new(
        id: String,
        tournament_id: String,
        team_a: String,
        team_b: String,
        venue: String,
        scheduled_at: DateTime<Utc>,
        overs_per_innings: u32,
    ) -> Self {
        Self {
            id,
            tournament_id,
            team_a,
            team_b,
            venue,
            scheduled_at,
            status: MatchStatus::Scheduled,
            overs_per_innings,
            current_inning: 0,
            current_over: 0,
            current_ball: 1,
            toss: None,
            innings: Vec::new(),
            result: None,
            commentary: Vec::new(),
        }
    }

    pub fn innings(&self, number: u8) -> Option<&Innings> {
        self.innings.iter().find(|i| i.number == number)
    }

    pub fn current_innings(&self) -> Option<&Innings> {
        self.innings(self.current_inning)
    }

    pub fn current_innings_mut(&mut self) -> Option<&mut Innings> {
        let number = self.current_inning;
        self.innings.iter_mut().find(|i| i.number == number)
    }

    /// The opponent of `team`.
    pub fn other_team(&self, team: &str) -> String {
        if team == self.team_a {
            self.team_b.clone()
        } else {
            self.team_a.clone()
        }
    }

    /// Reset over/ball position for a freshly started innings.
    pub fn reset_over_position(&mut self) {
        self.current_over = 0;
        self.current_ball = 1;
    }

    /// Score line for list views, e.g. "142/3".
    pub fn score_display(&self) -> String {
        match self.current_innings() {
            Some(innings) => format!("{}/{}", innings.total_runs, innings.wickets),
            None => "0/0".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduled_match() -> MatchModel {
        MatchModel::new(
            "m1".into(),
            "t1".into(),
            "team-a".into(),
            "team-b".into(),
            "Eden Gardens".into(),
            Utc::now(),
            20,
        )
    }

    #[test]
    fn new_match_starts_scheduled_with_no_innings() {
        let m = scheduled_match();
        assert_eq!(m.status, MatchStatus::Scheduled);
        assert!(m.innings.is_empty());
        assert!(m.toss.is_none());
        assert_eq!(m.current_ball, 1);
    }

    #[test]
    fn active_innings_states() {
        assert!(MatchStatus::Inning1.is_active_innings());
        assert!(MatchStatus::Inning2.is_active_innings());
        assert!(!MatchStatus::Toss.is_active_innings());
        assert!(!MatchStatus::Completed.is_active_innings());
        assert!(MatchStatus::Abandoned.is_terminal());
    }

    #[test]
    fn other_team_flips_between_the_two_sides() {
        let m = scheduled_match();
        assert_eq!(m.other_team("team-a"), "team-b");
        assert_eq!(m.other_team("team-b"), "team-a");
    }

    #[test]
    fn current_innings_follows_the_inning_number() {
        let mut m = scheduled_match();
        m.innings
            .push(Innings::new(1, "team-a".into(), "team-b".into(), None));
        m.innings
            .push(Innings::new(2, "team-b".into(), "team-a".into(), Some(181)));
        m.current_inning = 2;
        assert_eq!(m.current_innings().unwrap().number, 2);
        assert_eq!(m.current_innings().unwrap().target, Some(181));
    }
}
