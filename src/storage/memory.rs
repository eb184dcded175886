//! プロセス内メモリに対局記録を保持するストレージ

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use super::{sort_newest_first, GameRecord, GameRepository, StoredGame};
use crate::error::PersistenceError;

/// スレッドセーフなDashMapで記録を保持するストレージ
/// IDは1から順に割り当てる
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    games: Arc<DashMap<u64, GameRecord>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            games: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRepository for InMemoryRepository {
    fn save_game(&self, record: GameRecord) -> Result<u64, PersistenceError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        debug!(id, moves = record.moves.len(), "Saving game in memory");
        self.games.insert(id, record);
        Ok(id)
    }

    fn list_games(&self) -> Result<Vec<StoredGame>, PersistenceError> {
        let mut games: Vec<StoredGame> = self
            .games
            .iter()
            .map(|entry| StoredGame {
                id: *entry.key(),
                record: entry.value().clone(),
            })
            .collect();
        sort_newest_first(&mut games);
        Ok(games)
    }

    fn get_game(&self, id: u64) -> Result<Option<StoredGame>, PersistenceError> {
        Ok(self.games.get(&id).map(|entry| StoredGame {
            id,
            record: entry.value().clone(),
        }))
    }
}
