// Persistence collaborators. The engine never assumes a storage engine; it
// only requires that a save completes (or fails) before the corresponding
// delta is published.

pub use memory::{InMemoryMatchStore, InMemoryStandingsStore};

mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Ball, MatchModel};
use crate::scoring::TeamStanding;

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Match not found: {0}")]
    MatchNotFound(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Durable match and ball-log storage.
#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn save_match(&self, m: &MatchModel) -> Result<(), StorageError>;

    async fn load_match(&self, match_id: &str) -> Result<Option<MatchModel>, StorageError>;

    /// Balls are append-only; the log is the source of truth the innings
    /// aggregates are rederivable from. Idempotent on `ball.id`: a re-append
    /// after a partial failure replaces the existing entry.
    async fn append_ball(&self, ball: &Ball) -> Result<(), StorageError>;

    async fn list_balls(&self, match_id: &str) -> Result<Vec<Ball>, StorageError>;
}

/// Tournament standings storage.
#[async_trait]
pub trait StandingsStore: Send + Sync {
    async fn get_standing(&self, team_id: &str) -> Result<Option<TeamStanding>, StorageError>;

    async fn upsert_standing(&self, standing: &TeamStanding) -> Result<(), StorageError>;

    /// Full table ordered by points, then net run rate.
    async fn table(&self) -> Result<Vec<TeamStanding>, StorageError>;
}
