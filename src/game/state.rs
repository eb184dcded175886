//! ゲーム状態管理モジュール
//! 盤面・手番・勝敗状態・手の履歴を保持し、ターン進行を制御する。

use super::board::Board;
use super::rules::WinDetector;
use super::types::{Move, Position, Symbol};
use crate::error::{GameError, Result};
use crate::player::Player;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// ゲームの進行状態を表すenum
/// Won / Drawn は終端状態で、以降の着手は受け付けない
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won(Symbol),
    Drawn,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// 三目並べ1局分の実行時状態
/// 盤面はこの構造体が排他的に所有する
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    current: Symbol,
    status: GameStatus,
    moves: Vec<Move>,
}

impl Game {
    /// 指定サイズの新しいゲームを作成する
    /// 初期状態：Xの番、進行中
    pub fn new(size: usize) -> Result<Self> {
        let board = Board::new(size)?;
        info!(size, "New game created");

        Ok(Self {
            board,
            current: Symbol::X,
            status: GameStatus::InProgress,
            moves: Vec::new(),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    /// 次に着手する記号
    pub fn current_player(&self) -> Symbol {
        self.current
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    /// 勝者を返す
    /// 引き分けと進行中はどちらもNoneになるため、区別にはstatus()を使うこと
    pub fn winner(&self) -> Option<Symbol> {
        match self.status {
            GameStatus::Won(symbol) => Some(symbol),
            GameStatus::InProgress | GameStatus::Drawn => None,
        }
    }

    /// これまでの手の記録（リプレイ用）
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn into_moves(self) -> Vec<Move> {
        self.moves
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    /// 現在の手番で指定位置に着手する
    /// 不正な手は盤面にも履歴にも反映されない
    pub fn apply_move(&mut self, position: Position) -> Result<GameStatus> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }

        let symbol = self.current;
        self.board.set_cell(position.row, position.col, symbol)?;

        let move_number = self.moves.len() as u32 + 1;
        self.moves.push(Move::new(move_number, symbol, position));
        debug!(move_number, player = %symbol, row = position.row, col = position.col, "Move applied");

        if WinDetector::check_win(&self.board, position.row, position.col, symbol) {
            self.status = GameStatus::Won(symbol);
            info!(winner = %symbol, moves = move_number, "Game won");
        } else if self.board.is_full() {
            self.status = GameStatus::Drawn;
            info!(moves = move_number, "Game drawn");
        } else {
            self.current = symbol.opposite();
        }

        Ok(self.status)
    }

    /// 手番のプレイヤーから手を取得して1ターン進める
    /// 2人のプレイヤーは同じ寿命のトレイトオブジェクトとして受け取る
    pub fn play_turn<'p>(
        &mut self,
        player_x: &mut (dyn Player + 'p),
        player_o: &mut (dyn Player + 'p),
    ) -> Result<GameStatus> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }

        let player = match self.current {
            Symbol::X => player_x,
            Symbol::O => player_o,
        };
        let position = player.next_move(&self.board)?;
        debug!(player = player.name(), symbol = %self.current, "Player chose move");

        self.apply_move(position)
    }

    /// 終端状態になるまでターンを繰り返す
    pub fn play<'p>(
        &mut self,
        player_x: &mut (dyn Player + 'p),
        player_o: &mut (dyn Player + 'p),
    ) -> Result<GameStatus> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }

        while !self.is_finished() {
            self.play_turn(&mut *player_x, &mut *player_o)?;
        }

        Ok(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlayerError;
    use crate::game::types::Cell;

    /// 決められた順に手を返すテスト用プレイヤー
    struct ScriptedPlayer {
        moves: Vec<Position>,
    }

    impl ScriptedPlayer {
        fn new(moves: &[(usize, usize)]) -> Self {
            let mut moves: Vec<Position> = moves.iter().map(|&m| m.into()).collect();
            moves.reverse();
            Self { moves }
        }
    }

    impl Player for ScriptedPlayer {
        fn next_move(&mut self, _board: &Board) -> std::result::Result<Position, PlayerError> {
            self.moves.pop().ok_or(PlayerError::InputClosed)
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn play_all(game: &mut Game, moves: &[(usize, usize)]) -> GameStatus {
        let mut status = game.status();
        for &(row, col) in moves {
            status = game.apply_move(Position::new(row, col)).unwrap();
        }
        status
    }

    #[test]
    fn test_game_new() {
        let game = Game::new(4).unwrap();

        assert_eq!(game.size(), 4);
        assert_eq!(game.current_player(), Symbol::X);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.winner(), None);
        assert_eq!(game.move_count(), 0);
    }

    #[test]
    fn test_game_new_invalid_size() {
        assert!(matches!(Game::new(2), Err(GameError::InvalidSize { size: 2 })));
        assert!(matches!(Game::new(11), Err(GameError::InvalidSize { size: 11 })));
    }

    #[test]
    fn test_row_win_after_five_moves() {
        let mut game = Game::new(3).unwrap();
        let status = play_all(&mut game, &[(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)]);

        assert_eq!(status, GameStatus::Won(Symbol::X));
        assert_eq!(game.winner(), Some(Symbol::X));
        assert_eq!(game.move_count(), 5);
        assert!(game.is_finished());
    }

    #[test]
    fn test_draw_after_nine_moves() {
        // X O X / X O O / O X X
        let mut game = Game::new(3).unwrap();
        let status = play_all(
            &mut game,
            &[(0, 0), (0, 1), (0, 2), (1, 1), (1, 0), (1, 2), (2, 1), (2, 0), (2, 2)],
        );

        assert_eq!(status, GameStatus::Drawn);
        assert_eq!(game.winner(), None);
        assert_eq!(game.move_count(), 9);
        assert!(game.board().is_full());
    }

    #[test]
    fn test_win_on_last_cell_is_won_not_drawn() {
        // 最後の1マスでXがラインを完成させる
        // X O X / O X O / O X X
        let mut game = Game::new(3).unwrap();
        let status = play_all(
            &mut game,
            &[(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2), (2, 1), (2, 0), (2, 2)],
        );

        assert_eq!(status, GameStatus::Won(Symbol::X));
        assert!(game.board().is_full());
    }

    #[test]
    fn test_moves_alternate_and_are_numbered() {
        let mut game = Game::new(3).unwrap();
        play_all(&mut game, &[(0, 0), (1, 1), (2, 2), (0, 2)]);

        let moves = game.moves();
        assert_eq!(moves.len(), 4);
        for (i, mv) in moves.iter().enumerate() {
            assert_eq!(mv.move_number as usize, i + 1);
            let expected = if i % 2 == 0 { Symbol::X } else { Symbol::O };
            assert_eq!(mv.player, expected);
        }
        assert_eq!(game.current_player(), Symbol::X);
    }

    #[test]
    fn test_rejected_move_is_not_logged() {
        let mut game = Game::new(3).unwrap();
        game.apply_move(Position::new(0, 0)).unwrap();

        let occupied = game.apply_move(Position::new(0, 0));
        assert!(matches!(occupied, Err(GameError::CellOccupied { .. })));

        let out_of_bounds = game.apply_move(Position::new(3, 3));
        assert!(matches!(out_of_bounds, Err(GameError::OutOfBounds { .. })));

        assert_eq!(game.move_count(), 1);
        assert_eq!(game.current_player(), Symbol::O);
    }

    #[test]
    fn test_no_moves_after_terminal_state() {
        let mut game = Game::new(3).unwrap();
        play_all(&mut game, &[(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)]);

        let result = game.apply_move(Position::new(2, 0));
        assert!(matches!(result, Err(GameError::GameOver)));
        assert_eq!(game.move_count(), 5);
        assert_eq!(game.board().get_cell(2, 0), Some(Cell::Empty));
    }

    #[test]
    fn test_play_with_scripted_players() {
        let mut game = Game::new(3).unwrap();
        let mut x = ScriptedPlayer::new(&[(0, 0), (0, 1), (0, 2)]);
        let mut o = ScriptedPlayer::new(&[(1, 1), (2, 2)]);

        let status = game.play(&mut x, &mut o).unwrap();
        assert_eq!(status, GameStatus::Won(Symbol::X));
        assert_eq!(game.move_count(), 5);

        let again = game.play_turn(&mut x, &mut o);
        assert!(matches!(again, Err(GameError::GameOver)));
    }

    #[test]
    fn test_play_turn_propagates_player_error() {
        let mut game = Game::new(3).unwrap();
        let mut x = ScriptedPlayer::new(&[]);
        let mut o = ScriptedPlayer::new(&[]);

        let result = game.play_turn(&mut x, &mut o);
        assert!(matches!(
            result,
            Err(GameError::Player {
                source: PlayerError::InputClosed
            })
        ));
        assert_eq!(game.move_count(), 0);
        assert_eq!(game.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_play_turn_rejects_invalid_player_move() {
        let mut game = Game::new(3).unwrap();
        let mut x = ScriptedPlayer::new(&[(4, 4)]);
        let mut o = ScriptedPlayer::new(&[]);

        let result = game.play_turn(&mut x, &mut o);
        assert!(matches!(result, Err(GameError::OutOfBounds { .. })));
        assert_eq!(game.move_count(), 0);
        assert_eq!(game.current_player(), Symbol::X);
    }

    #[test]
    fn test_play_mixes_borrowed_and_owned_players() {
        use crate::player::{ComputerPlayer, HumanPlayer};
        use std::io::Cursor;

        // 入出力を借用する人間プレイヤーとコンピューターを同じ対局で使う
        let mut input = Cursor::new(b"0 0\n0 1\n0 2\n1 0\n1 1\n1 2\n2 0\n2 1\n2 2\n".to_vec());
        let mut output = Vec::new();
        let mut game = Game::new(3).unwrap();
        let mut computer = ComputerPlayer::with_seed(11);

        let status = {
            let mut human = HumanPlayer::new(Symbol::X, &mut input, &mut output);
            game.play(&mut human, &mut computer).unwrap()
        };

        assert!(status.is_terminal());
        assert!(game.is_finished());
        assert!(!output.is_empty());
    }
}
