//! アプリケーション全体のエラー定義モジュール
//! ゲームロジック、プレイヤー入力、永続化のエラーを統一管理。

use thiserror::Error;

use crate::game::{MAX_SIZE, MIN_SIZE};

/// ゲームエンジンに関連するエラー
/// いずれもローカルで回復可能な状態であり、プロセスを終了させない
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Invalid board size: {size} (must be between {} and {})", MIN_SIZE, MAX_SIZE)]
    InvalidSize { size: usize },

    #[error("Move ({row}, {col}) is outside the {size}x{size} board")]
    OutOfBounds { row: usize, col: usize, size: usize },

    #[error("Cell ({row}, {col}) is already occupied")]
    CellOccupied { row: usize, col: usize },

    #[error("Game is already over")]
    GameOver,

    #[error("Game has no recorded moves to replay")]
    EmptyLog,

    #[error("Invalid move log: {reason}")]
    InvalidMoveLog { reason: String },

    #[error("Game not found: {game_id}")]
    NotFound { game_id: u64 },

    #[error("Player failed to move: {source}")]
    Player {
        #[from]
        source: PlayerError,
    },

    #[error("Persistence error: {source}")]
    Persistence {
        #[from]
        source: PersistenceError,
    },
}

/// プレイヤーが手を生成できなかった場合のエラー
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("No empty cells left on the board")]
    NoEmptyCells,

    #[error("Input channel closed")]
    InputClosed,

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// データ永続化に関連するエラー
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("File I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

/// ゲームエラーをベースとした結果型
pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_size_message_names_bounds() {
        let err = GameError::InvalidSize { size: 11 };
        assert_eq!(
            err.to_string(),
            "Invalid board size: 11 (must be between 3 and 10)"
        );
    }

    #[test]
    fn test_player_error_converts_into_game_error() {
        let err: GameError = PlayerError::InputClosed.into();
        assert!(matches!(
            err,
            GameError::Player {
                source: PlayerError::InputClosed
            }
        ));
    }

    #[test]
    fn test_persistence_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: PersistenceError = io.into();
        assert!(err.to_string().contains("missing"));
    }
}
