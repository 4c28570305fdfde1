use std::sync::Arc;

use chrono::Utc;

use cricscore::broadcast::BroadcastHub;
use cricscore::directory::InMemoryTeamDirectory;
use cricscore::scoring::{BasicCommentary, ScoringService};
use cricscore::session::SessionRegistry;
use cricscore::storage::{InMemoryMatchStore, InMemoryStandingsStore, MatchStore, StandingsStore};
use cricscore::{MatchModel, TossDecision};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const MATCH_ID: &str = "match-123";
pub const TEAM_A: &str = "team-a";
pub const TEAM_B: &str = "team-b";

pub struct TestSetup {
    pub scoring: Arc<ScoringService>,
    pub hub: BroadcastHub,
    pub store: Arc<dyn MatchStore>,
    pub standings: Arc<dyn StandingsStore>,
    pub match_id: String,
}

pub struct TestSetupBuilder {
    overs_per_innings: u32,
    extra_fixtures: Vec<String>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            overs_per_innings: 20,
            extra_fixtures: vec![],
        }
    }

    pub fn with_overs(mut self, overs: u32) -> Self {
        self.overs_per_innings = overs;
        self
    }

    pub fn with_extra_fixture(mut self, match_id: &str) -> Self {
        self.extra_fixtures.push(match_id.to_string());
        self
    }

    pub async fn build(self) -> TestSetup {
        let store: Arc<dyn MatchStore> = Arc::new(InMemoryMatchStore::new());
        let standings: Arc<dyn StandingsStore> = Arc::new(InMemoryStandingsStore::new());
        let registry = Arc::new(SessionRegistry::new(store.clone()));
        let hub = BroadcastHub::new();
        let directory = Arc::new(InMemoryTeamDirectory::new());

        let scoring = Arc::new(ScoringService::new(
            registry,
            hub.clone(),
            store.clone(),
            standings.clone(),
            directory,
            Arc::new(BasicCommentary),
        ));

        for match_id in std::iter::once(MATCH_ID.to_string()).chain(self.extra_fixtures) {
            let fixture = MatchModel::new(
                match_id,
                "tournament-1".to_string(),
                TEAM_A.to_string(),
                TEAM_B.to_string(),
                "test ground".to_string(),
                Utc::now(),
                self.overs_per_innings,
            );
            store.save_match(&fixture).await.unwrap();
        }

        TestSetup {
            scoring,
            hub,
            store,
            standings,
            match_id: MATCH_ID.to_string(),
        }
    }
}

impl TestSetup {
    /// Toss plus first-innings start, the common preamble.
    pub async fn begin_first_innings(&self, batting: &str) {
        self.scoring
            .record_toss(&self.match_id, batting, TossDecision::Bat)
            .await
            .unwrap();
        let bowling = if batting == TEAM_A { TEAM_B } else { TEAM_A };
        self.scoring
            .start_scoring(&self.match_id, batting, bowling)
            .await
            .unwrap();
    }
}
