use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{MatchStore, StandingsStore, StorageError};
use crate::model::{Ball, MatchModel};
use crate::scoring::TeamStanding;

/// In-memory match store for tests and local runs.
#[derive(Default)]
pub struct InMemoryMatchStore {
    matches: Arc<RwLock<HashMap<String, MatchModel>>>,
    balls: Arc<RwLock<HashMap<String, Vec<Ball>>>>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchStore for InMemoryMatchStore {
    async fn save_match(&self, m: &MatchModel) -> Result<(), StorageError> {
        let mut matches = self.matches.write().await;
        matches.insert(m.id.clone(), m.clone());
        Ok(())
    }

    async fn load_match(&self, match_id: &str) -> Result<Option<MatchModel>, StorageError> {
        let matches = self.matches.read().await;
        Ok(matches.get(match_id).cloned())
    }

    async fn append_ball(&self, ball: &Ball) -> Result<(), StorageError> {
        let mut balls = self.balls.write().await;
        let log = balls.entry(ball.match_id.clone()).or_default();
        match log.iter().position(|b| b.id == ball.id) {
            Some(index) => log[index] = ball.clone(),
            None => log.push(ball.clone()),
        }
        Ok(())
    }

    async fn list_balls(&self, match_id: &str) -> Result<Vec<Ball>, StorageError> {
        let balls = self.balls.read().await;
        Ok(balls.get(match_id).cloned().unwrap_or_default())
    }
}

/// In-memory standings store.
#[derive(Default)]
pub struct InMemoryStandingsStore {
    standings: Arc<RwLock<HashMap<String, TeamStanding>>>,
}

impl InMemoryStandingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StandingsStore for InMemoryStandingsStore {
    async fn get_standing(&self, team_id: &str) -> Result<Option<TeamStanding>, StorageError> {
        let standings = self.standings.read().await;
        Ok(standings.get(team_id).cloned())
    }

    async fn upsert_standing(&self, standing: &TeamStanding) -> Result<(), StorageError> {
        let mut standings = self.standings.write().await;
        standings.insert(standing.team_id.clone(), standing.clone());
        Ok(())
    }

    async fn table(&self) -> Result<Vec<TeamStanding>, StorageError> {
        let standings = self.standings.read().await;
        let mut table: Vec<TeamStanding> = standings.values().cloned().collect();
        table.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then(b.net_run_rate.total_cmp(&a.net_run_rate))
        });
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_match(id: &str) -> MatchModel {
        MatchModel::new(
            id.into(),
            "t1".into(),
            "team-a".into(),
            "team-b".into(),
            "venue".into(),
            Utc::now(),
            20,
        )
    }

    #[tokio::test]
    async fn round_trips_matches() {
        let store = InMemoryMatchStore::new();
        assert!(store.load_match("m1").await.unwrap().is_none());
        store.save_match(&sample_match("m1")).await.unwrap();
        let loaded = store.load_match("m1").await.unwrap().unwrap();
        assert_eq!(loaded.id, "m1");
    }

    #[tokio::test]
    async fn ball_log_is_append_only_and_ordered() {
        let store = InMemoryMatchStore::new();
        for n in 1..=3 {
            let ball = crate::model::Ball {
                id: format!("b{}", n),
                match_id: "m1".into(),
                inning: 1,
                over_number: 0,
                ball_number: n,
                bowler_id: "bowler".into(),
                striker_id: "striker".into(),
                non_striker_id: "other".into(),
                bat_runs: 1,
                extra_runs: 0,
                extra: None,
                dismissal: None,
                shot: None,
                recorded_at: Utc::now(),
            };
            store.append_ball(&ball).await.unwrap();
        }
        let balls = store.list_balls("m1").await.unwrap();
        assert_eq!(balls.len(), 3);
        assert_eq!(balls[2].ball_number, 3);
    }

    #[tokio::test]
    async fn reappending_a_ball_id_replaces_the_entry() {
        let store = InMemoryMatchStore::new();
        let mut ball = crate::model::Ball {
            id: "m1:1:1".into(),
            match_id: "m1".into(),
            inning: 1,
            over_number: 0,
            ball_number: 1,
            bowler_id: "bowler".into(),
            striker_id: "striker".into(),
            non_striker_id: "other".into(),
            bat_runs: 1,
            extra_runs: 0,
            extra: None,
            dismissal: None,
            shot: None,
            recorded_at: Utc::now(),
        };
        store.append_ball(&ball).await.unwrap();
        ball.bat_runs = 4;
        store.append_ball(&ball).await.unwrap();

        let balls = store.list_balls("m1").await.unwrap();
        assert_eq!(balls.len(), 1);
        assert_eq!(balls[0].bat_runs, 4);
    }

    #[tokio::test]
    async fn standings_table_orders_by_points_then_nrr() {
        let store = InMemoryStandingsStore::new();
        let mut a = TeamStanding::new("a".into());
        a.points = 4;
        a.net_run_rate = 0.5;
        let mut b = TeamStanding::new("b".into());
        b.points = 4;
        b.net_run_rate = 1.2;
        let mut c = TeamStanding::new("c".into());
        c.points = 2;
        c.net_run_rate = 3.0;
        for s in [&a, &b, &c] {
            store.upsert_standing(s).await.unwrap();
        }
        let table = store.table().await.unwrap();
        let order: Vec<&str> = table.iter().map(|s| s.team_id.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }
}
