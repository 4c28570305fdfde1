use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::directory::TeamInfo;
use crate::model::{MatchModel, MatchResult, MatchStatus, ShotTag, TossDecision};
use crate::scoring::BallOutcome;

/// Message types pushed to match and global channels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum MessageType {
    #[serde(rename = "toss-update")]
    TossUpdate,
    #[serde(rename = "inning_started")]
    InningStarted,
    #[serde(rename = "ball-update")]
    BallUpdate,
    #[serde(rename = "inning-end")]
    InningEnd,
    #[serde(rename = "match-complete")]
    MatchComplete,
    #[serde(rename = "match-snapshot")]
    MatchSnapshot,
    #[serde(rename = "active-matches-list")]
    ActiveMatchesList,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageMeta {
    pub timestamp: DateTime<Utc>,
}

/// Envelope for all outbound channel messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub payload: serde_json::Value,
    pub meta: MessageMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TossUpdatePayload {
    pub match_id: String,
    pub won_by: String,
    pub decision: TossDecision,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InningStartedPayload {
    pub match_id: String,
    pub inning: u8,
    pub batting_team: String,
    pub bowling_team: String,
    pub target: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallUpdatePayload {
    pub match_id: String,
    pub inning: u8,
    pub over: u32,
    pub ball: u32,
    pub total_runs: u32,
    pub wickets: u32,
    pub extras: u32,
    pub overs: String,
    pub striker_id: String,
    pub bowler_id: String,
    pub commentary: String,
    pub shot: Option<ShotTag>,
    pub required_run_rate: Option<f64>,
    pub projected_score: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InningEndPayload {
    pub match_id: String,
    pub inning: u8,
    pub total_runs: u32,
    pub wickets: u32,
    /// Chase target, present when transitioning to inning 2.
    pub target: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchCompletePayload {
    pub match_id: String,
    pub result: MatchResult,
}

/// Full current state for a late joiner; sent before any deltas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSnapshotPayload {
    pub state: MatchModel,
    pub team_a_name: String,
    pub team_b_name: String,
}

/// One row of the live-list view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveMatchSummary {
    pub match_id: String,
    pub team_a: TeamInfo,
    pub team_b: TeamInfo,
    pub status: MatchStatus,
    pub score: String,
    pub overs: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveMatchesListPayload {
    pub matches: Vec<LiveMatchSummary>,
}

impl OutboundMessage {
    pub fn new(message_type: MessageType, payload: serde_json::Value) -> Self {
        Self {
            message_type,
            payload,
            meta: MessageMeta {
                timestamp: Utc::now(),
            },
        }
    }

    pub fn toss_update(match_id: &str, won_by: &str, decision: TossDecision) -> Self {
        let payload = TossUpdatePayload {
            match_id: match_id.to_string(),
            won_by: won_by.to_string(),
            decision,
        };
        Self::new(
            MessageType::TossUpdate,
            serde_json::to_value(payload).unwrap(),
        )
    }

    pub fn inning_started(
        match_id: &str,
        inning: u8,
        batting_team: &str,
        bowling_team: &str,
        target: Option<u32>,
    ) -> Self {
        let payload = InningStartedPayload {
            match_id: match_id.to_string(),
            inning,
            batting_team: batting_team.to_string(),
            bowling_team: bowling_team.to_string(),
            target,
        };
        Self::new(
            MessageType::InningStarted,
            serde_json::to_value(payload).unwrap(),
        )
    }

    pub fn ball_update(match_id: &str, outcome: &BallOutcome) -> Self {
        let payload = BallUpdatePayload {
            match_id: match_id.to_string(),
            inning: outcome.inning,
            over: outcome.over_number,
            ball: outcome.ball_number,
            total_runs: outcome.total_runs,
            wickets: outcome.wickets,
            extras: outcome.extras,
            overs: outcome.overs_display.clone(),
            striker_id: outcome.ball.striker_id.clone(),
            bowler_id: outcome.ball.bowler_id.clone(),
            commentary: outcome.commentary.clone(),
            shot: outcome.ball.shot.clone(),
            required_run_rate: outcome.required_run_rate,
            projected_score: outcome.projected_score,
        };
        Self::new(
            MessageType::BallUpdate,
            serde_json::to_value(payload).unwrap(),
        )
    }

    pub fn inning_end(
        match_id: &str,
        inning: u8,
        total_runs: u32,
        wickets: u32,
        target: Option<u32>,
    ) -> Self {
        let payload = InningEndPayload {
            match_id: match_id.to_string(),
            inning,
            total_runs,
            wickets,
            target,
        };
        Self::new(
            MessageType::InningEnd,
            serde_json::to_value(payload).unwrap(),
        )
    }

    pub fn match_complete(match_id: &str, result: MatchResult) -> Self {
        let payload = MatchCompletePayload {
            match_id: match_id.to_string(),
            result,
        };
        Self::new(
            MessageType::MatchComplete,
            serde_json::to_value(payload).unwrap(),
        )
    }

    pub fn snapshot(state: MatchModel, team_a_name: String, team_b_name: String) -> Self {
        let payload = MatchSnapshotPayload {
            state,
            team_a_name,
            team_b_name,
        };
        Self::new(
            MessageType::MatchSnapshot,
            serde_json::to_value(payload).unwrap(),
        )
    }

    pub fn active_matches_list(matches: Vec<LiveMatchSummary>) -> Self {
        let payload = ActiveMatchesListPayload { matches };
        Self::new(
            MessageType::ActiveMatchesList,
            serde_json::to_value(payload).unwrap(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_types_serialize_to_channel_names() {
        let m = OutboundMessage::toss_update("m1", "team-a", TossDecision::Bat);
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("\"toss-update\""));

        let m = OutboundMessage::inning_started("m1", 1, "team-a", "team-b", None);
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("\"inning_started\""));

        let m = OutboundMessage::active_matches_list(vec![]);
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("\"active-matches-list\""));
    }

    #[test]
    fn messages_round_trip_through_serde() {
        let m = OutboundMessage::inning_end("m1", 1, 180, 6, Some(181));
        let json = serde_json::to_string(&m).unwrap();
        let back: OutboundMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back.message_type, MessageType::InningEnd);
        let payload: InningEndPayload = serde_json::from_value(back.payload).unwrap();
        assert_eq!(payload.target, Some(181));
    }
}
