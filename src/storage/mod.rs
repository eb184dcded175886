//! 対局記録の永続化モジュール
//! 対局のサマリーと手の記録（1:N）を保存し、一覧・取得・リプレイ用の
//! 手の読み出しを提供する。

pub mod memory;
pub mod json_file;

pub use memory::*;
pub use json_file::*;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::{GameError, PersistenceError, Result};
use crate::game::{Board, Game, Move, Symbol};

/// 永続化される対局記録
/// JSONの形はHTTP APIで受け渡す形と同一
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub date: String,
    pub player_name: String,
    pub human_symbol: Symbol,
    pub winner: Option<Symbol>,
    pub size: usize,
    pub moves: Vec<Move>,
}

impl GameRecord {
    /// 終了したゲームから記録を作成する
    pub fn from_game(
        game: &Game,
        player_name: impl Into<String>,
        human_symbol: Symbol,
        date: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            player_name: player_name.into(),
            human_symbol,
            winner: game.winner(),
            size: game.size(),
            moves: game.moves().to_vec(),
        }
    }

    /// 宣言されたサイズの盤面に全ての手を置けるかを検証する
    /// 手番号は1からの連番、手番はXから交互でなければならない
    pub fn validate(&self) -> Result<()> {
        let mut board = Board::new(self.size)?;
        let mut moves = self.moves.clone();
        moves.sort_by_key(|mv| mv.move_number);

        let mut expected = Symbol::X;
        for (i, mv) in moves.iter().enumerate() {
            let number = i as u32 + 1;
            if mv.move_number != number {
                return Err(GameError::InvalidMoveLog {
                    reason: format!("expected move number {number}, found {}", mv.move_number),
                });
            }
            if mv.player != expected {
                return Err(GameError::InvalidMoveLog {
                    reason: format!("move {number} must be played by {expected}, not {}", mv.player),
                });
            }
            board.set_cell(mv.row, mv.col, mv.player)?;
            expected = expected.opposite();
        }
        Ok(())
    }
}

/// IDを付与された保存済みの対局
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredGame {
    pub id: u64,
    #[serde(flatten)]
    pub record: GameRecord,
}

/// 対局記録ストレージの統一インターフェース
pub trait GameRepository: Send + Sync {
    /// 記録を保存し、割り当てたIDを返す
    fn save_game(&self, record: GameRecord) -> std::result::Result<u64, PersistenceError>;

    /// 日付の新しい順（同日時ならIDの大きい順）に全件返す
    fn list_games(&self) -> std::result::Result<Vec<StoredGame>, PersistenceError>;

    fn get_game(&self, id: u64) -> std::result::Result<Option<StoredGame>, PersistenceError>;

    /// リプレイ用に手をmove_number順で取得する
    /// 存在しないIDはNotFound（空の記録とは区別する）
    fn load_moves(&self, id: u64) -> Result<Vec<Move>> {
        let game = self
            .get_game(id)?
            .ok_or(GameError::NotFound { game_id: id })?;
        let mut moves = game.record.moves;
        moves.sort_by_key(|mv| mv.move_number);
        Ok(moves)
    }
}

/// 一覧の並び順：日付降順、同じならID降順
pub(crate) fn sort_newest_first(games: &mut [StoredGame]) {
    games.sort_by(|a, b| {
        b.record
            .date
            .cmp(&a.record.date)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// 設定に基づいてストレージを生成する
pub fn open_repository(config: &StorageConfig) -> Arc<dyn GameRepository> {
    match config.backend {
        StorageBackend::Memory => {
            info!("Using in-memory game storage");
            Arc::new(InMemoryRepository::new())
        }
        StorageBackend::JsonFile => {
            info!(path = %config.path, "Using JSON file game storage");
            Arc::new(JsonFileRepository::new(&config.path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;

    fn sample_record() -> GameRecord {
        GameRecord {
            date: "2024-01-01 10:00:00".to_string(),
            player_name: "Alice".to_string(),
            human_symbol: Symbol::X,
            winner: Some(Symbol::X),
            size: 3,
            moves: vec![
                Move::new(1, Symbol::X, Position::new(0, 0)),
                Move::new(2, Symbol::O, Position::new(1, 1)),
            ],
        }
    }

    #[test]
    fn test_stored_game_json_shape() {
        let stored = StoredGame {
            id: 7,
            record: sample_record(),
        };
        let json = serde_json::to_value(&stored).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["player_name"], "Alice");
        assert_eq!(json["human_symbol"], "X");
        assert_eq!(json["winner"], "X");
        assert_eq!(json["size"], 3);
        assert_eq!(json["moves"][1]["player"], "O");
    }

    #[test]
    fn test_null_winner_round_trip() {
        let mut record = sample_record();
        record.winner = None;
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["winner"].is_null());
    }

    #[test]
    fn test_from_game() {
        let mut game = Game::new(3).unwrap();
        for (row, col) in [(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)] {
            game.apply_move(Position::new(row, col)).unwrap();
        }

        let record = GameRecord::from_game(&game, "Bob", Symbol::O, "2024-05-05 12:00:00");
        assert_eq!(record.winner, Some(Symbol::X));
        assert_eq!(record.size, 3);
        assert_eq!(record.moves.len(), 5);
        assert_eq!(record.human_symbol, Symbol::O);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_records() {
        let mut record = sample_record();
        record.size = 11;
        assert!(matches!(record.validate(), Err(GameError::InvalidSize { size: 11 })));

        let mut record = sample_record();
        record.moves.push(Move::new(3, Symbol::X, Position::new(3, 0)));
        assert!(matches!(record.validate(), Err(GameError::OutOfBounds { .. })));

        let mut record = sample_record();
        record.moves.push(Move::new(3, Symbol::X, Position::new(1, 1)));
        assert!(matches!(record.validate(), Err(GameError::CellOccupied { .. })));
    }

    #[test]
    fn test_validate_rejects_broken_numbering_and_turn_order() {
        // 手番号の重複と欠番
        let mut record = sample_record();
        record.moves = vec![
            Move::new(0, Symbol::O, Position::new(0, 0)),
            Move::new(0, Symbol::O, Position::new(1, 1)),
            Move::new(7, Symbol::O, Position::new(2, 2)),
        ];
        assert!(matches!(record.validate(), Err(GameError::InvalidMoveLog { .. })));

        let mut record = sample_record();
        record.moves[1].move_number = 3;
        assert!(matches!(record.validate(), Err(GameError::InvalidMoveLog { .. })));

        // 同じ記号が2手続く
        let mut record = sample_record();
        record.moves[1].player = Symbol::X;
        assert!(matches!(record.validate(), Err(GameError::InvalidMoveLog { .. })));

        // Oから始まる記録
        let mut record = sample_record();
        record.moves[0].player = Symbol::O;
        record.moves[1].player = Symbol::X;
        assert!(matches!(record.validate(), Err(GameError::InvalidMoveLog { .. })));

        // 順不同で保存されていても番号順に並べれば正しい記録
        let mut record = sample_record();
        record.moves.reverse();
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_load_moves_not_found_and_sorted() {
        let repo = InMemoryRepository::new();
        assert!(matches!(
            repo.load_moves(99),
            Err(GameError::NotFound { game_id: 99 })
        ));

        let mut record = sample_record();
        record.moves.reverse();
        let id = repo.save_game(record).unwrap();

        let moves = repo.load_moves(id).unwrap();
        assert_eq!(moves[0].move_number, 1);
        assert_eq!(moves[1].move_number, 2);
    }

    #[test]
    fn test_load_moves_empty_log_is_not_not_found() {
        let repo = InMemoryRepository::new();
        let mut record = sample_record();
        record.moves.clear();
        let id = repo.save_game(record).unwrap();

        assert!(repo.load_moves(id).unwrap().is_empty());
    }

    #[test]
    fn test_open_repository_memory() {
        let config = StorageConfig {
            backend: StorageBackend::Memory,
            ..StorageConfig::default()
        };
        let repo = open_repository(&config);
        assert!(repo.list_games().unwrap().is_empty());
    }
}
