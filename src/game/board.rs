//! 三目並べの盤面状態を管理するモジュール
//! N×N（3〜10）グリッドの盤面と記号の配置、読み取り操作を担当する。

use super::types::{Cell, Position, Symbol};
use crate::error::{GameError, Result};
use std::fmt;

/// 盤面サイズの下限
pub const MIN_SIZE: usize = 3;
/// 盤面サイズの上限
pub const MAX_SIZE: usize = 10;

/// N×N盤面を表現する構造体
/// サイズは生成時に固定され、一度置かれた記号は消えない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
    filled: usize,
}

impl Board {
    /// 全マス空の盤面を作成する
    /// サイズが3〜10の範囲外ならInvalidSize
    pub fn new(size: usize) -> Result<Self> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(GameError::InvalidSize { size });
        }

        Ok(Board {
            size,
            cells: vec![Cell::Empty; size * size],
            filled: 0,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.size && col < self.size {
            Some(row * self.size + col)
        } else {
            None
        }
    }

    /// 指定した位置のセル状態を取得する
    /// 範囲外の場合はNoneを返す
    pub fn get_cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// 指定した位置が空かチェックする
    pub fn is_empty(&self, row: usize, col: usize) -> bool {
        matches!(self.get_cell(row, col), Some(Cell::Empty))
    }

    /// 指定した位置に記号を置く
    /// 範囲外ならOutOfBounds、既に埋まっていればCellOccupied。失敗時は盤面を変更しない
    pub fn set_cell(&mut self, row: usize, col: usize, symbol: Symbol) -> Result<()> {
        let idx = self.index(row, col).ok_or(GameError::OutOfBounds {
            row,
            col,
            size: self.size,
        })?;

        if !self.cells[idx].is_empty() {
            return Err(GameError::CellOccupied { row, col });
        }

        self.cells[idx] = symbol.to_cell();
        self.filled += 1;
        Ok(())
    }

    /// 空きマスが一つも残っていないか
    pub fn is_full(&self) -> bool {
        self.filled == self.cells.len()
    }

    /// 埋まっているマスの数
    pub fn filled_count(&self) -> usize {
        self.filled
    }

    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        if row < self.size {
            let start = row * self.size;
            Some(&self.cells[start..start + self.size])
        } else {
            None
        }
    }

    pub fn column(&self, col: usize) -> Option<Vec<Cell>> {
        if col < self.size {
            Some((0..self.size).map(|row| self.cells[row * self.size + col]).collect())
        } else {
            None
        }
    }

    /// 左上から右下への対角線 (i, i)
    pub fn diagonal(&self) -> Vec<Cell> {
        (0..self.size).map(|i| self.cells[i * self.size + i]).collect()
    }

    /// 右上から左下への対角線 (i, size-1-i)
    pub fn anti_diagonal(&self) -> Vec<Cell> {
        (0..self.size)
            .map(|i| self.cells[i * self.size + (self.size - 1 - i)])
            .collect()
    }

    /// 空きマスの座標を行優先順で列挙する
    pub fn empty_cells(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(idx, _)| Position::new(idx / self.size, idx % self.size))
            .collect()
    }

    /// 行ごとの記号（空はNone）に変換する
    /// APIのレスポンス生成に使用
    pub fn to_symbols(&self) -> Vec<Vec<Option<Symbol>>> {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    /// 盤面表示文字列を生成する
    /// Xと O で記号、.で空マスを表現
    pub fn render(&self) -> String {
        let mut result = String::from("  ");
        for col in 0..self.size {
            result.push_str(&format!("{} ", col));
        }
        result.truncate(result.trim_end().len());
        result.push('\n');

        for (row_idx, row) in self.cells.chunks(self.size).enumerate() {
            let line: Vec<&str> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => ".",
                    Cell::X => "X",
                    Cell::O => "O",
                })
                .collect();
            result.push_str(&format!("{} {}\n", row_idx, line.join(" ")));
        }

        result
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
