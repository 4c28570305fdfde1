use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Display metadata for a team. The engine stores team ids only; names and
/// logos are resolved at the broadcast boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub id: String,
    pub name: String,
    pub logo_url: Option<String>,
}

/// Identity collaborator resolving team display metadata by id.
#[async_trait]
pub trait TeamDirectory: Send + Sync {
    async fn get_team(&self, team_id: &str) -> Option<TeamInfo>;

    /// Team display name, falling back to the raw id when unknown.
    async fn team_name(&self, team_id: &str) -> String {
        match self.get_team(team_id).await {
            Some(team) => team.name,
            None => team_id.to_string(),
        }
    }
}

/// In-memory directory for tests and local runs.
#[derive(Default)]
pub struct InMemoryTeamDirectory {
    teams: Arc<RwLock<HashMap<String, TeamInfo>>>,
}

impl InMemoryTeamDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_team(&self, team: TeamInfo) {
        let mut teams = self.teams.write().await;
        teams.insert(team.id.clone(), team);
    }
}

#[async_trait]
impl TeamDirectory for InMemoryTeamDirectory {
    async fn get_team(&self, team_id: &str) -> Option<TeamInfo> {
        let teams = self.teams.read().await;
        teams.get(team_id).cloned()
    }
}
