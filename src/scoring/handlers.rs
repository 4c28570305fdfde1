use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::model::{MatchModel, MatchStatus, TossDecision};
use crate::scoring::{BallEvent, BallOutcome, TeamStanding};
use crate::shared::{AppError, AppState};

#[derive(Debug, Deserialize)]
pub struct MatchCreateRequest {
    pub tournament_id: String,
    pub team_a: String,
    pub team_b: String,
    pub venue: String,
    pub scheduled_at: DateTime<Utc>,
    pub overs_per_innings: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchCreateResponse {
    pub id: String,
    pub status: MatchStatus,
}

#[derive(Debug, Deserialize)]
pub struct TossRequest {
    pub won_by: String,
    pub decision: TossDecision,
}

#[derive(Debug, Deserialize)]
pub struct StartScoringRequest {
    pub batting_team: String,
    pub bowling_team: String,
}

/// POST /matches
#[instrument(name = "create_match", skip(state, request))]
pub async fn create_match(
    State(state): State<AppState>,
    Json(request): Json<MatchCreateRequest>,
) -> Result<Json<MatchCreateResponse>, AppError> {
    let fixture = MatchModel::new(
        Uuid::new_v4().to_string(),
        request.tournament_id,
        request.team_a,
        request.team_b,
        request.venue,
        request.scheduled_at,
        request.overs_per_innings,
    );
    let created = state.scoring.create_match(fixture).await?;
    Ok(Json(MatchCreateResponse {
        id: created.id,
        status: created.status,
    }))
}

/// GET /matches/{match_id}
#[instrument(name = "get_match", skip(state))]
pub async fn get_match(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<MatchModel>, AppError> {
    let snapshot = state.scoring.match_snapshot(&match_id).await?;
    Ok(Json(snapshot))
}

/// POST /matches/{match_id}/toss
#[instrument(name = "record_toss", skip(state, request))]
pub async fn record_toss(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(request): Json<TossRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    info!(match_id = %match_id, won_by = %request.won_by, "Recording toss");
    state
        .scoring
        .record_toss(&match_id, &request.won_by, request.decision)
        .await?;
    Ok(Json(serde_json::json!({ "status": "toss" })))
}

/// POST /matches/{match_id}/start
#[instrument(name = "start_scoring", skip(state, request))]
pub async fn start_scoring(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(request): Json<StartScoringRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .scoring
        .start_scoring(&match_id, &request.batting_team, &request.bowling_team)
        .await?;
    Ok(Json(serde_json::json!({ "status": "inning1" })))
}

/// POST /matches/{match_id}/ball
///
/// The scorer's main endpoint; returns the full per-ball delta.
#[instrument(name = "record_ball", skip(state, event))]
pub async fn record_ball(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(event): Json<BallEvent>,
) -> Result<Json<BallOutcome>, AppError> {
    let outcome = state.scoring.record_ball(&match_id, event).await?;
    Ok(Json(outcome))
}

/// POST /matches/{match_id}/end-innings
#[instrument(name = "end_innings", skip(state))]
pub async fn end_innings(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<MatchModel>, AppError> {
    state.scoring.end_innings(&match_id).await?;
    let snapshot = state.scoring.match_snapshot(&match_id).await?;
    Ok(Json(snapshot))
}

/// POST /matches/{match_id}/abandon
#[instrument(name = "abandon_match", skip(state))]
pub async fn abandon_match(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.scoring.abandon_match(&match_id).await?;
    Ok(Json(serde_json::json!({ "status": "abandoned" })))
}

/// GET /standings
#[instrument(name = "standings", skip(state))]
pub async fn standings(
    State(state): State<AppState>,
) -> Result<Json<Vec<TeamStanding>>, AppError> {
    let table = state.scoring.standings_table().await?;
    Ok(Json(table))
}
