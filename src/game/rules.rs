//! 三目並べの勝敗判定モジュール
//! 直前に置かれたマスを通るラインだけを調べて勝利を判定する。

use super::board::Board;
use super::types::{Cell, Symbol};

/// 勝利判定を実装する構造体
/// スタティックメソッドのみを提供する
pub struct WinDetector;

impl WinDetector {
    /// (row, col) に symbol が置かれた直後に呼び出し、勝利したかを返す
    /// 行・列・主対角線・反対角線のいずれか1本が全て symbol で埋まれば勝利。
    /// サイズに関わらずライン全体が必要（k目並べではない）
    pub fn check_win(board: &Board, row: usize, col: usize, symbol: Symbol) -> bool {
        let size = board.size();
        if row >= size || col >= size {
            return false;
        }
        let target = symbol.to_cell();

        if board
            .row(row)
            .is_some_and(|cells| Self::is_line_complete(cells, target))
        {
            return true;
        }

        if board
            .column(col)
            .is_some_and(|cells| Self::is_line_complete(&cells, target))
        {
            return true;
        }

        // 中央マス（奇数サイズ）では両方の対角線を調べる
        if row == col && Self::is_line_complete(&board.diagonal(), target) {
            return true;
        }

        if row + col == size - 1 && Self::is_line_complete(&board.anti_diagonal(), target) {
            return true;
        }

        false
    }

    fn is_line_complete(cells: &[Cell], target: Cell) -> bool {
        !cells.is_empty() && cells.iter().all(|&cell| cell == target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::{MAX_SIZE, MIN_SIZE};

    /// ラインを順に埋め、最後のマスで初めて勝利になることを確認する
    fn assert_line_wins_only_when_complete(size: usize, symbol: Symbol, line: &[(usize, usize)]) {
        let mut board = Board::new(size).unwrap();
        for (i, &(row, col)) in line.iter().enumerate() {
            board.set_cell(row, col, symbol).unwrap();
            let won = WinDetector::check_win(&board, row, col, symbol);
            if i + 1 < line.len() {
                assert!(!won, "size {} won early at ({}, {})", size, row, col);
            } else {
                assert!(won, "size {} did not win at ({}, {})", size, row, col);
            }
        }
    }

    #[test]
    fn test_rows_win_for_every_size() {
        for size in MIN_SIZE..=MAX_SIZE {
            for symbol in [Symbol::X, Symbol::O] {
                for row in 0..size {
                    let line: Vec<_> = (0..size).map(|col| (row, col)).collect();
                    assert_line_wins_only_when_complete(size, symbol, &line);
                }
            }
        }
    }

    #[test]
    fn test_columns_win_for_every_size() {
        for size in MIN_SIZE..=MAX_SIZE {
            for symbol in [Symbol::X, Symbol::O] {
                for col in 0..size {
                    let line: Vec<_> = (0..size).rev().map(|row| (row, col)).collect();
                    assert_line_wins_only_when_complete(size, symbol, &line);
                }
            }
        }
    }

    #[test]
    fn test_diagonals_win_for_every_size() {
        for size in MIN_SIZE..=MAX_SIZE {
            for symbol in [Symbol::X, Symbol::O] {
                let diagonal: Vec<_> = (0..size).map(|i| (i, i)).collect();
                assert_line_wins_only_when_complete(size, symbol, &diagonal);

                let anti: Vec<_> = (0..size).map(|i| (i, size - 1 - i)).collect();
                assert_line_wins_only_when_complete(size, symbol, &anti);
            }
        }
    }

    #[test]
    fn test_three_in_a_row_is_not_enough_on_larger_boards() {
        let mut board = Board::new(5).unwrap();
        for col in 0..3 {
            board.set_cell(0, col, Symbol::X).unwrap();
        }
        assert!(!WinDetector::check_win(&board, 0, 2, Symbol::X));
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let mut board = Board::new(3).unwrap();
        board.set_cell(0, 0, Symbol::X).unwrap();
        board.set_cell(0, 1, Symbol::O).unwrap();
        board.set_cell(0, 2, Symbol::X).unwrap();
        assert!(!WinDetector::check_win(&board, 0, 2, Symbol::X));
    }

    #[test]
    fn test_only_lines_through_last_move_are_checked() {
        // 行0はXで埋まっているが、(2,1) を通るラインではない
        let mut board = Board::new(3).unwrap();
        for col in 0..3 {
            board.set_cell(0, col, Symbol::X).unwrap();
        }
        board.set_cell(2, 1, Symbol::X).unwrap();
        assert!(!WinDetector::check_win(&board, 2, 1, Symbol::X));
    }

    #[test]
    fn test_center_cell_checks_both_diagonals() {
        let mut board = Board::new(3).unwrap();
        board.set_cell(0, 2, Symbol::O).unwrap();
        board.set_cell(2, 0, Symbol::O).unwrap();
        board.set_cell(1, 1, Symbol::O).unwrap();
        assert!(WinDetector::check_win(&board, 1, 1, Symbol::O));

        let mut board = Board::new(5).unwrap();
        for i in [0, 1, 3, 4] {
            board.set_cell(i, i, Symbol::X).unwrap();
        }
        board.set_cell(2, 2, Symbol::X).unwrap();
        assert!(WinDetector::check_win(&board, 2, 2, Symbol::X));
    }

    #[test]
    fn test_wrong_symbol_does_not_win() {
        let mut board = Board::new(3).unwrap();
        for col in 0..3 {
            board.set_cell(1, col, Symbol::X).unwrap();
        }
        assert!(!WinDetector::check_win(&board, 1, 2, Symbol::O));
    }
}
