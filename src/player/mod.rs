//! プレイヤーの抽象化層モジュール
//! 人間（入力チャネル）とコンピューター（ランダム）の実装を
//! 同じインターフェースで扱う。

pub mod human;
pub mod computer;

pub use human::*;
pub use computer::*;

use crate::error::PlayerError;
use crate::game::{Board, Position};

/// 盤面を見て次の手を返すプレイヤーの共通インターフェース
pub trait Player {
    /// 現在の盤面から次の手 (row, col) を決める
    fn next_move(&mut self, board: &Board) -> Result<Position, PlayerError>;

    /// ログ表示用のプレイヤー名
    fn name(&self) -> &str;
}
