use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, instrument};

use crate::broadcast::{BroadcastHub, OutboundMessage};
use crate::directory::TeamDirectory;
use crate::model::{
    Innings, MatchModel, MatchStatus, SealReason, TossDecision, TossOutcome,
};
use crate::scoring::{
    apply_ball, compute_result, BallEvent, BallOutcome, CommentaryGenerator, ScoringError,
    TeamStanding,
};
use crate::session::SessionRegistry;
use crate::storage::{MatchStore, StandingsStore, StorageError};

/// The single entry point for all match mutation. One logical writer per
/// match; writes serialize on the session gate, persist, and only then
/// broadcast, so observers never see state that failed to save. Snapshot
/// readers share the state lock and never trip the gate.
pub struct ScoringService {
    registry: Arc<SessionRegistry>,
    hub: BroadcastHub,
    store: Arc<dyn MatchStore>,
    standings: Arc<dyn StandingsStore>,
    directory: Arc<dyn TeamDirectory>,
    commentary: Arc<dyn CommentaryGenerator>,
}

impl ScoringService {
    pub fn new(
        registry: Arc<SessionRegistry>,
        hub: BroadcastHub,
        store: Arc<dyn MatchStore>,
        standings: Arc<dyn StandingsStore>,
        directory: Arc<dyn TeamDirectory>,
        commentary: Arc<dyn CommentaryGenerator>,
    ) -> Self {
        Self {
            registry,
            hub,
            store,
            standings,
            directory,
            commentary,
        }
    }

    pub fn hub(&self) -> &BroadcastHub {
        &self.hub
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Register a new fixture in `scheduled` state.
    #[instrument(skip(self, fixture))]
    pub async fn create_match(&self, fixture: MatchModel) -> Result<MatchModel, ScoringError> {
        if fixture.team_a == fixture.team_b {
            return Err(ScoringError::InvalidInput(
                "a team cannot play itself".to_string(),
            ));
        }
        if fixture.overs_per_innings == 0 {
            return Err(ScoringError::InvalidInput(
                "overs_per_innings must be positive".to_string(),
            ));
        }
        self.persist(&fixture).await?;
        info!(match_id = %fixture.id, team_a = %fixture.team_a, team_b = %fixture.team_b, "Match created");
        Ok(fixture)
    }

    /// Record the toss outcome: `scheduled -> toss`.
    #[instrument(skip(self))]
    pub async fn record_toss(
        &self,
        match_id: &str,
        won_by: &str,
        decision: TossDecision,
    ) -> Result<(), ScoringError> {
        let session = self.registry.open_session(match_id).await?;
        let _gate = session
            .gate
            .try_lock()
            .map_err(|_| ScoringError::ConcurrencyConflict(match_id.to_string()))?;
        let mut state = session.state.write().await;

        if state.status != MatchStatus::Scheduled {
            return Err(ScoringError::InvalidState(format!(
                "toss already decided or match underway (status {})",
                state.status
            )));
        }
        if won_by != state.team_a && won_by != state.team_b {
            return Err(ScoringError::InvalidInput(format!(
                "{} is not playing this match",
                won_by
            )));
        }

        let mut next = state.clone();
        next.toss = Some(TossOutcome {
            won_by: won_by.to_string(),
            decision,
        });
        next.status = MatchStatus::Toss;

        self.persist(&next).await?;
        *state = next;
        self.hub
            .publish(match_id, OutboundMessage::toss_update(match_id, won_by, decision))
            .await;
        info!(match_id = %match_id, won_by = %won_by, "Toss recorded");
        Ok(())
    }

    /// Open the first innings: `toss -> inning1`.
    #[instrument(skip(self))]
    pub async fn start_scoring(
        &self,
        match_id: &str,
        batting_team: &str,
        bowling_team: &str,
    ) -> Result<(), ScoringError> {
        let session = self.registry.open_session(match_id).await?;
        let _gate = session
            .gate
            .try_lock()
            .map_err(|_| ScoringError::ConcurrencyConflict(match_id.to_string()))?;
        let mut state = session.state.write().await;

        if state.status != MatchStatus::Toss {
            return Err(ScoringError::InvalidState(format!(
                "scoring can only start after the toss (status {})",
                state.status
            )));
        }
        let sides_valid = (batting_team == state.team_a && bowling_team == state.team_b)
            || (batting_team == state.team_b && bowling_team == state.team_a);
        if !sides_valid {
            return Err(ScoringError::InvalidInput(
                "batting/bowling teams do not match this fixture".to_string(),
            ));
        }
        if let Some(toss) = &state.toss {
            let chosen_batting = match toss.decision {
                TossDecision::Bat => toss.won_by.clone(),
                TossDecision::Field => state.other_team(&toss.won_by),
            };
            if batting_team != chosen_batting {
                return Err(ScoringError::InvalidInput(format!(
                    "toss decided {} bats first",
                    chosen_batting
                )));
            }
        }

        let mut next = state.clone();
        next.innings.push(Innings::new(
            1,
            batting_team.to_string(),
            bowling_team.to_string(),
            None,
        ));
        next.current_inning = 1;
        next.reset_over_position();
        next.status = MatchStatus::Inning1;

        self.persist(&next).await?;
        *state = next;
        self.hub
            .publish(
                match_id,
                OutboundMessage::inning_started(match_id, 1, batting_team, bowling_team, None),
            )
            .await;
        info!(match_id = %match_id, batting_team = %batting_team, "First innings started");
        Ok(())
    }

    /// Apply one ball. Persists the ball and updated match before the delta
    /// is broadcast; a persistence failure suppresses the broadcast and the
    /// in-memory state keeps its pre-ball value. Ball ids are deterministic
    /// per delivery slot, so the retry after a partial failure replaces the
    /// orphaned log entry instead of duplicating it.
    #[instrument(skip(self, event))]
    pub async fn record_ball(
        &self,
        match_id: &str,
        event: BallEvent,
    ) -> Result<BallOutcome, ScoringError> {
        let session = self.registry.open_session(match_id).await?;
        let _gate = session
            .gate
            .try_lock()
            .map_err(|_| ScoringError::ConcurrencyConflict(match_id.to_string()))?;
        let mut state = session.state.write().await;

        let mut next = state.clone();
        let outcome = apply_ball(&mut next, &event, self.commentary.as_ref())?;

        self.store
            .append_ball(&outcome.ball)
            .await
            .map_err(persistence)?;
        self.persist(&next).await?;

        *state = next;
        self.hub
            .publish(match_id, OutboundMessage::ball_update(match_id, &outcome))
            .await;
        Ok(outcome)
    }

    /// Seal the live innings. For inning 1 this opens the chase; for inning 2
    /// the result is computed synchronously before the match completes.
    #[instrument(skip(self))]
    pub async fn end_innings(&self, match_id: &str) -> Result<(), ScoringError> {
        let session = self.registry.open_session(match_id).await?;
        let _gate = session
            .gate
            .try_lock()
            .map_err(|_| ScoringError::ConcurrencyConflict(match_id.to_string()))?;
        let mut state = session.state.write().await;

        match state.status {
            MatchStatus::Inning1 => {
                let mut next = state.clone();
                let first = next
                    .current_innings_mut()
                    .ok_or_else(|| ScoringError::NotFound(format!("innings 1 of {}", match_id)))?;
                if first.sealed.is_none() {
                    first.sealed = Some(SealReason::Declared);
                }
                let first_total = first.total_runs;
                let first_wickets = first.wickets;
                let batting = first.batting_team.clone();
                let bowling = first.bowling_team.clone();
                let target = first_total + 1;

                next.innings
                    .push(Innings::new(2, bowling.clone(), batting.clone(), Some(target)));
                next.current_inning = 2;
                next.reset_over_position();
                next.status = MatchStatus::Inning2;

                self.persist(&next).await?;
                *state = next;
                self.hub
                    .publish(
                        match_id,
                        OutboundMessage::inning_end(match_id, 1, first_total, first_wickets, Some(target)),
                    )
                    .await;
                self.hub
                    .publish(
                        match_id,
                        OutboundMessage::inning_started(match_id, 2, &bowling, &batting, Some(target)),
                    )
                    .await;
                info!(match_id = %match_id, target, "Second innings started");
                Ok(())
            }
            MatchStatus::Inning2 => {
                let mut next = state.clone();
                let second = next
                    .current_innings_mut()
                    .ok_or_else(|| ScoringError::NotFound(format!("innings 2 of {}", match_id)))?;
                if second.sealed.is_none() {
                    second.sealed = Some(SealReason::Declared);
                }
                let second_total = second.total_runs;
                let second_wickets = second.wickets;

                let first = next
                    .innings(1)
                    .ok_or_else(|| ScoringError::NotFound(format!("innings 1 of {}", match_id)))?
                    .clone();
                let second = next
                    .innings(2)
                    .ok_or_else(|| ScoringError::NotFound(format!("innings 2 of {}", match_id)))?
                    .clone();

                let result = compute_result(&first, &second);
                next.result = Some(result.clone());
                next.status = MatchStatus::Completed;

                self.update_standings(&first, &second, &result).await?;
                self.persist(&next).await?;
                *state = next;

                self.hub
                    .publish(
                        match_id,
                        OutboundMessage::inning_end(match_id, 2, second_total, second_wickets, None),
                    )
                    .await;
                self.hub
                    .publish(match_id, OutboundMessage::match_complete(match_id, result.clone()))
                    .await;
                info!(match_id = %match_id, summary = %result.summary, "Match completed");
                Ok(())
            }
            status => Err(ScoringError::InvalidState(format!(
                "no live innings to end (status {})",
                status
            ))),
        }
    }

    /// Administrative abandonment: reachable from any non-terminal state, no
    /// result computed, no further balls accepted.
    #[instrument(skip(self))]
    pub async fn abandon_match(&self, match_id: &str) -> Result<(), ScoringError> {
        let session = self.registry.open_session(match_id).await?;
        let _gate = session
            .gate
            .try_lock()
            .map_err(|_| ScoringError::ConcurrencyConflict(match_id.to_string()))?;
        let mut state = session.state.write().await;

        if state.status.is_terminal() {
            return Err(ScoringError::InvalidState(format!(
                "match already {}",
                state.status
            )));
        }

        let mut next = state.clone();
        next.status = MatchStatus::Abandoned;
        self.persist(&next).await?;
        *state = next;
        info!(match_id = %match_id, "Match abandoned");
        Ok(())
    }

    /// Attach a viewer: returns a full current-state snapshot plus a receiver
    /// that yields only deltas applied strictly after that snapshot.
    ///
    /// Writers publish while still holding the state write lock, so taking
    /// the snapshot and subscribing under the read lock leaves no gap and no
    /// duplicate.
    pub async fn join(
        &self,
        match_id: &str,
        subscriber_id: &str,
    ) -> Result<(OutboundMessage, broadcast::Receiver<OutboundMessage>), ScoringError> {
        let session = self.registry.open_session(match_id).await?;
        let state = session.state.read().await;
        let receiver = self.hub.subscribe(match_id).await;
        let team_a_name = self.directory.team_name(&state.team_a).await;
        let team_b_name = self.directory.team_name(&state.team_b).await;
        let snapshot = OutboundMessage::snapshot(state.clone(), team_a_name, team_b_name);
        drop(state);

        self.registry.subscribe(match_id, subscriber_id).await;
        Ok((snapshot, receiver))
    }

    /// Detach a viewer; the session and its channel are dropped with the last
    /// one.
    pub async fn leave(&self, match_id: &str, subscriber_id: &str) {
        if self.registry.unsubscribe(match_id, subscriber_id).await {
            self.hub.remove_channel(match_id).await;
        }
    }

    /// Read-only copy of the current match state, for HTTP snapshot fetches.
    pub async fn match_snapshot(&self, match_id: &str) -> Result<MatchModel, ScoringError> {
        let session = self.registry.open_session(match_id).await?;
        let state = session.state.read().await;
        Ok(state.clone())
    }

    pub async fn standings_table(&self) -> Result<Vec<TeamStanding>, ScoringError> {
        self.standings.table().await.map_err(persistence)
    }

    async fn persist(&self, state: &MatchModel) -> Result<(), ScoringError> {
        self.store.save_match(state).await.map_err(persistence)
    }

    async fn update_standings(
        &self,
        first: &Innings,
        second: &Innings,
        result: &crate::model::MatchResult,
    ) -> Result<(), ScoringError> {
        for (batted, bowled) in [(first, second), (second, first)] {
            let team_id = &batted.batting_team;
            let mut standing = self
                .standings
                .get_standing(team_id)
                .await
                .map_err(persistence)?
                .unwrap_or_else(|| TeamStanding::new(team_id.clone()));
            standing.apply_match(batted, bowled, result);
            self.standings
                .upsert_standing(&standing)
                .await
                .map_err(persistence)?;
        }
        Ok(())
    }
}

fn persistence(e: StorageError) -> ScoringError {
    ScoringError::Persistence(e.to_string())
}
