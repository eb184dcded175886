//! 手の記録からの盤面再構築モジュール
//! 盤面サイズは保存されておらず、記録中の最大の行・列番号から推定する。
//!
//! 推定サイズは `max(max(row), max(col)) + 1` で求めるため、最後の行・列を
//! 一度も使わなかった対局は実際より小さな盤面として再構築される。
//! 既存の記録との互換性のため、この挙動はそのまま維持している。

use super::board::Board;
use super::types::Move;
use crate::error::{GameError, Result};
use tracing::debug;

/// リプレイ中の1コマ：適用した手と、その直後の盤面
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayFrame {
    pub mv: Move,
    pub board: Board,
}

/// 手の記録のみから盤面を再構築するリプレイ
#[derive(Debug, Clone)]
pub struct Replay {
    moves: Vec<Move>,
    blank: Board,
}

impl Replay {
    /// 手の記録からリプレイを作成する
    /// 記録が空ならEmptyLog、推定サイズが範囲外ならInvalidSize
    pub fn new(moves: impl Into<Vec<Move>>) -> Result<Self> {
        let mut moves = moves.into();
        moves.sort_by_key(|mv| mv.move_number);

        let size = Self::infer_size(&moves)?;
        let blank = Board::new(size)?;
        debug!(size, moves = moves.len(), "Replay prepared");

        Ok(Self { moves, blank })
    }

    /// 記録中の最大の行・列番号 + 1 を盤面サイズとする
    pub fn infer_size(moves: &[Move]) -> Result<usize> {
        let max_row = moves.iter().map(|mv| mv.row).max().ok_or(GameError::EmptyLog)?;
        let max_col = moves.iter().map(|mv| mv.col).max().ok_or(GameError::EmptyLog)?;
        Ok(max_row.max(max_col) + 1)
    }

    /// 推定された盤面サイズ
    pub fn size(&self) -> usize {
        self.blank.size()
    }

    /// move_number順に並べ替え済みの手
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// 1手ずつ適用した盤面を順に返すイテレータ
    pub fn frames(&self) -> ReplayFrames<'_> {
        ReplayFrames {
            board: self.blank.clone(),
            moves: self.moves.iter(),
            failed: false,
        }
    }

    /// 全ての手を適用した最終盤面
    pub fn final_board(&self) -> Result<Board> {
        let mut board = self.blank.clone();
        for mv in &self.moves {
            board.set_cell(mv.row, mv.col, mv.player)?;
        }
        Ok(board)
    }
}

/// Replay::frames が返すイテレータ
/// 適用できない手に当たった時点でエラーを1度返して終了する
pub struct ReplayFrames<'a> {
    board: Board,
    moves: std::slice::Iter<'a, Move>,
    failed: bool,
}

impl Iterator for ReplayFrames<'_> {
    type Item = Result<ReplayFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let mv = *self.moves.next()?;
        if let Err(e) = self.board.set_cell(mv.row, mv.col, mv.player) {
            self.failed = true;
            return Some(Err(e));
        }

        Some(Ok(ReplayFrame {
            mv,
            board: self.board.clone(),
        }))
    }
}
