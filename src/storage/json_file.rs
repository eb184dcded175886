//! JSONファイルに対局記録を保存するストレージ
//! ストア全体を1ファイルとして読み書きする。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

use super::{sort_newest_first, GameRecord, GameRepository, StoredGame};
use crate::error::PersistenceError;

/// ファイルに書き出されるストア全体の形
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    next_id: u64,
    games: Vec<StoredGame>,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            next_id: 1,
            games: Vec::new(),
        }
    }
}

/// JSONファイルを使うストレージ
/// ファイルは最初の書き込み時に作成され、読み書きはMutexで直列化する
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_store(&self) -> Result<StoreFile, PersistenceError> {
        if !self.path.exists() {
            return Ok(StoreFile::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(StoreFile::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_store(&self, store: &StoreFile) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // 一時ファイルに書いてから置き換え、途中で落ちても既存のストアを壊さない
        let content = serde_json::to_string_pretty(store)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>, PersistenceError> {
        self.lock.lock().map_err(|_| PersistenceError::Storage {
            message: format!("storage lock poisoned for {}", self.path.display()),
        })
    }
}

impl GameRepository for JsonFileRepository {
    fn save_game(&self, record: GameRecord) -> Result<u64, PersistenceError> {
        let _guard = self.guard()?;
        let mut store = self.read_store()?;

        let id = store.next_id;
        store.next_id += 1;
        store.games.push(StoredGame { id, record });
        self.write_store(&store)?;

        info!(id, path = %self.path.display(), "Game saved");
        Ok(id)
    }

    fn list_games(&self) -> Result<Vec<StoredGame>, PersistenceError> {
        let _guard = self.guard()?;
        let mut games = self.read_store()?.games;
        sort_newest_first(&mut games);
        debug!(count = games.len(), "Games loaded");
        Ok(games)
    }

    fn get_game(&self, id: u64) -> Result<Option<StoredGame>, PersistenceError> {
        let _guard = self.guard()?;
        let store = self.read_store()?;
        Ok(store.games.into_iter().find(|game| game.id == id))
    }
}
