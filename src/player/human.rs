//! 入力チャネルから手を読み取る人間プレイヤー

use std::io::{BufRead, Write};

use super::Player;
use crate::error::PlayerError;
use crate::game::{Board, Cell, Position, Symbol};

/// 「row col」形式の行を読み取って手にするプレイヤー
/// 範囲外・使用済みマス・解析できない入力は再入力を求める
pub struct HumanPlayer<R, W> {
    symbol: Symbol,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> HumanPlayer<R, W> {
    pub fn new(symbol: Symbol, input: R, output: W) -> Self {
        Self {
            symbol,
            input,
            output,
        }
    }

    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    /// 入力を2つの0始まりの整数として解析する
    fn parse_position(line: &str) -> Option<Position> {
        let mut parts = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty());
        let row = parts.next()?.parse().ok()?;
        let col = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Position::new(row, col))
    }
}

impl<R: BufRead, W: Write> Player for HumanPlayer<R, W> {
    fn next_move(&mut self, board: &Board) -> Result<Position, PlayerError> {
        loop {
            write!(self.output, "{}", board.render())?;
            write!(self.output, "Your move ({}), enter row and col: ", self.symbol)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(PlayerError::InputClosed);
            }

            let Some(position) = Self::parse_position(&line) else {
                writeln!(self.output, "Please enter two numbers, e.g. '1 2'.")?;
                continue;
            };

            match board.get_cell(position.row, position.col) {
                Some(Cell::Empty) => return Ok(position),
                Some(_) => writeln!(
                    self.output,
                    "Cell ({}, {}) is already occupied.",
                    position.row, position.col
                )?,
                None => writeln!(
                    self.output,
                    "Coordinates must be between 0 and {}.",
                    board.size() - 1
                )?,
            }
        }
    }

    fn name(&self) -> &str {
        "Human"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn human(input: &str) -> HumanPlayer<Cursor<Vec<u8>>, Vec<u8>> {
        HumanPlayer::new(Symbol::X, Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_reads_valid_move() {
        let board = Board::new(3).unwrap();
        let mut player = human("1 2\n");

        assert_eq!(player.next_move(&board).unwrap(), Position::new(1, 2));
        assert_eq!(player.symbol(), Symbol::X);
    }

    #[test]
    fn test_accepts_comma_separated() {
        let board = Board::new(3).unwrap();
        let mut player = human("2,0\n");
        assert_eq!(player.next_move(&board).unwrap(), Position::new(2, 0));
    }

    #[test]
    fn test_reprompts_on_invalid_input() {
        let mut board = Board::new(3).unwrap();
        board.set_cell(0, 0, Symbol::O).unwrap();
        let mut player = human("hello\n1\n5 5\n0 0\n1 1 1\n2 2\n");

        assert_eq!(player.next_move(&board).unwrap(), Position::new(2, 2));

        let output = String::from_utf8(player.output.clone()).unwrap();
        assert!(output.contains("Please enter two numbers"));
        assert!(output.contains("Coordinates must be between 0 and 2"));
        assert!(output.contains("Cell (0, 0) is already occupied"));
        assert_eq!(output.matches("Your move (X)").count(), 6);
    }

    #[test]
    fn test_closed_input() {
        let board = Board::new(3).unwrap();
        let mut player = human("");
        assert!(matches!(
            player.next_move(&board),
            Err(PlayerError::InputClosed)
        ));
    }
}
