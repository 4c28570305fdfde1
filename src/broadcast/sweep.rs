use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, instrument};

use super::hub::BroadcastHub;
use super::messages::{LiveMatchSummary, OutboundMessage};
use crate::directory::{TeamDirectory, TeamInfo};
use crate::session::SessionRegistry;

/// Configuration for the live-list sweep task.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// How often the active-matches summary is republished.
    pub interval: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
        }
    }
}

/// Periodically republish a summary of every match in an active innings to
/// the global channel, regardless of per-match activity, so late joiners to
/// the list view converge without per-match deltas.
#[instrument(skip(registry, hub, directory))]
pub async fn start_sweep_task(
    registry: Arc<SessionRegistry>,
    hub: BroadcastHub,
    directory: Arc<dyn TeamDirectory>,
    config: SweepConfig,
) {
    let mut tick = interval(config.interval);
    loop {
        tick.tick().await;
        let published = sweep_once(&registry, &hub, directory.as_ref()).await;
        debug!(matches = published, "Live-list sweep published");
    }
}

/// Build and publish one active-matches snapshot. Returns the number of
/// matches included.
pub async fn sweep_once(
    registry: &SessionRegistry,
    hub: &BroadcastHub,
    directory: &dyn TeamDirectory,
) -> usize {
    let mut summaries = Vec::new();

    for session in registry.active_sessions().await {
        let state = session.state.read().await;
        if !state.status.is_active_innings() {
            continue;
        }
        let team_a = resolve(directory, &state.team_a).await;
        let team_b = resolve(directory, &state.team_b).await;
        let overs = state
            .current_innings()
            .map(|i| i.overs_display())
            .unwrap_or_else(|| "0.0".to_string());
        summaries.push(LiveMatchSummary {
            match_id: state.id.clone(),
            team_a,
            team_b,
            status: state.status,
            score: state.score_display(),
            overs,
        });
    }

    let count = summaries.len();
    hub.publish_global(OutboundMessage::active_matches_list(summaries));
    count
}

async fn resolve(directory: &dyn TeamDirectory, team_id: &str) -> TeamInfo {
    directory.get_team(team_id).await.unwrap_or_else(|| TeamInfo {
        id: team_id.to_string(),
        name: team_id.to_string(),
        logo_url: None,
    })
}
