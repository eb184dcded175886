//! ゲームの基本型定義モジュール
//! 三目並べで使用されるセル、記号、座標、手の型を定義する。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 盤面の各マスの状態を表現するenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    /// セルに置かれている記号を返す（空ならNone）
    pub fn symbol(self) -> Option<Symbol> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Symbol::X),
            Cell::O => Some(Symbol::O),
        }
    }

    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// プレイヤーの記号を表すenum
/// 先手は常にX
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    /// 相手の記号を返す
    pub fn opposite(self) -> Symbol {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }

    /// 記号を対応するセル状態に変換する
    pub fn to_cell(self) -> Cell {
        match self {
            Symbol::X => Cell::X,
            Symbol::O => Cell::O,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::X => "X",
            Symbol::O => "O",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Symbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "X" | "x" => Ok(Symbol::X),
            "O" | "o" => Ok(Symbol::O),
            other => Err(format!("Invalid symbol: {}. Valid options: X, O", other)),
        }
    }
}

/// 盤面上の座標（0始まり）
/// 範囲チェックは盤面サイズを知っているBoard側で行う
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// ゲームの1手を表現する構造体
/// 永続化・リプレイで使用される手の記録と同じ形をしている
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// 1始まりの手番号
    pub move_number: u32,
    pub player: Symbol,
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub fn new(move_number: u32, player: Symbol, position: Position) -> Self {
        Self {
            move_number,
            player,
            row: position.row,
            col: position.col,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }
}
