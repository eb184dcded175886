//! 対話型のコマンドラインフロントエンド
//! 新規対局・対局一覧・リプレイのメニューを提供する。
//! 入出力と乱数源は差し替え可能で、テストから駆動できる。

use chrono::Local;
use rand::Rng;
use std::{
    io::{BufRead, Write},
    sync::Arc,
    thread,
    time::Duration,
};
use tracing::info;

use crate::error::{GameError, PersistenceError, PlayerError};
use crate::game::{Game, Replay, Symbol, MAX_SIZE, MIN_SIZE};
use crate::player::{ComputerPlayer, HumanPlayer};
use crate::storage::{GameRecord, GameRepository};

/// 保存時の日付書式
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub struct CliApp<R, W, G> {
    repository: Arc<dyn GameRepository>,
    replay_delay: Duration,
    input: R,
    output: W,
    rng: G,
}

impl<R: BufRead, W: Write, G: Rng> CliApp<R, W, G> {
    pub fn new(
        repository: Arc<dyn GameRepository>,
        replay_delay: Duration,
        input: R,
        output: W,
        rng: G,
    ) -> Self {
        Self {
            repository,
            replay_delay,
            input,
            output,
            rng,
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// 1行読み込む。入力の終端ならNone
    fn read_line(&mut self) -> Result<Option<String>, CliError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt(&mut self, message: &str) -> Result<Option<String>, CliError> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        self.read_line()
    }

    /// メニューを繰り返し表示する。4か入力の終端で終了
    pub fn run_menu(&mut self) -> Result<(), CliError> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "=== Tic-Tac-Toe ===")?;
            writeln!(self.output, "1. New game")?;
            writeln!(self.output, "2. List games")?;
            writeln!(self.output, "3. Replay game")?;
            writeln!(self.output, "4. Exit")?;

            let Some(choice) = self.prompt("Choose an option: ")? else {
                writeln!(self.output)?;
                return Ok(());
            };

            let result = match choice.as_str() {
                "1" => self.new_game().map(|_| ()),
                "2" => self.list_games(),
                "3" => match self.prompt("Game id: ")? {
                    Some(raw) => match raw.parse::<u64>() {
                        Ok(id) => self.replay_game(id),
                        Err(_) => {
                            writeln!(self.output, "Game id must be a number.")?;
                            Ok(())
                        }
                    },
                    None => return Ok(()),
                },
                "h" | "help" => self.help(),
                "4" => {
                    writeln!(self.output, "Goodbye!")?;
                    return Ok(());
                }
                _ => {
                    writeln!(self.output, "Invalid choice, please enter 1-4 (h for help).")?;
                    Ok(())
                }
            };

            match result {
                Err(CliError::Io(err)) => return Err(CliError::Io(err)),
                Err(err) => writeln!(self.output, "Error: {err}")?,
                Ok(()) => {}
            }
        }
    }

    fn prompt_size(&mut self) -> Result<Option<usize>, CliError> {
        let message = format!("Board size ({MIN_SIZE}-{MAX_SIZE}): ");
        loop {
            let Some(raw) = self.prompt(&message)? else {
                return Ok(None);
            };
            match raw.parse::<usize>() {
                Ok(size) if (MIN_SIZE..=MAX_SIZE).contains(&size) => return Ok(Some(size)),
                _ => writeln!(
                    self.output,
                    "Please enter a number between {MIN_SIZE} and {MAX_SIZE}."
                )?,
            }
        }
    }

    /// 人間とコンピュータで1局対戦し、記録を保存してIDを返す
    /// 途中で入力が終わった対局は保存しない
    pub fn new_game(&mut self) -> Result<Option<u64>, CliError> {
        let Some(size) = self.prompt_size()? else {
            return Ok(None);
        };
        let Some(name) = self.prompt("Your name: ")? else {
            return Ok(None);
        };
        let name = if name.is_empty() { "Player".to_string() } else { name };

        let human_symbol = if self.rng.gen_bool(0.5) { Symbol::X } else { Symbol::O };
        writeln!(
            self.output,
            "{name} plays {human_symbol}, the computer plays {}. X moves first.",
            human_symbol.opposite()
        )?;

        let mut game = Game::new(size)?;
        let mut computer = ComputerPlayer::with_seed(self.rng.gen());

        let outcome = {
            let mut human = HumanPlayer::new(human_symbol, &mut self.input, &mut self.output);
            match human_symbol {
                Symbol::X => game.play(&mut human, &mut computer),
                Symbol::O => game.play(&mut computer, &mut human),
            }
        };

        match outcome {
            Ok(_) => {}
            Err(GameError::Player {
                source: PlayerError::InputClosed,
            }) => {
                writeln!(self.output)?;
                writeln!(self.output, "Input closed, game abandoned.")?;
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        }

        write!(self.output, "{}", game.board().render())?;
        match game.winner() {
            Some(winner) if winner == human_symbol => {
                writeln!(self.output, "Winner: {winner}. You win!")?
            }
            Some(winner) => writeln!(self.output, "Winner: {winner}. The computer wins.")?,
            None => writeln!(self.output, "It's a draw!")?,
        }

        let date = Local::now().format(DATE_FORMAT).to_string();
        let record = GameRecord::from_game(&game, name, human_symbol, date);
        let id = self.repository.save_game(record)?;
        writeln!(self.output, "Game saved with id {id}.")?;
        Ok(Some(id))
    }

    pub fn list_games(&mut self) -> Result<(), CliError> {
        let games = self.repository.list_games()?;
        if games.is_empty() {
            writeln!(self.output, "No games saved yet.")?;
            return Ok(());
        }

        writeln!(
            self.output,
            "{:>4}  {:<19}  {:<16}  {:<5}  {:<6}  {:>4}",
            "ID", "Date", "Player", "Human", "Winner", "Size"
        )?;
        for game in &games {
            let record = &game.record;
            let winner = record.winner.map_or("Draw", Symbol::as_str);
            writeln!(
                self.output,
                "{:>4}  {:<19}  {:<16}  {:<5}  {:<6}  {:>4}",
                game.id, record.date, record.player_name, record.human_symbol, winner, record.size
            )?;
        }
        Ok(())
    }

    /// 保存された手の記録から盤面を再構成し、1手ずつ表示する
    pub fn replay_game(&mut self, id: u64) -> Result<(), CliError> {
        let moves = match self.repository.load_moves(id) {
            Ok(moves) => moves,
            Err(GameError::NotFound { .. }) => {
                writeln!(self.output, "Game {id} not found.")?;
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let replay = match Replay::new(moves) {
            Ok(replay) => replay,
            Err(GameError::EmptyLog) => {
                writeln!(self.output, "Game {id} has no moves to replay.")?;
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let size = replay.size();
        info!(id, size, moves = replay.moves().len(), "Replaying game");
        writeln!(self.output, "Replaying game {id} on a {size}x{size} board.")?;

        for frame in replay.frames() {
            let frame = frame?;
            writeln!(
                self.output,
                "Move {}: {} at ({}, {})",
                frame.mv.move_number, frame.mv.player, frame.mv.row, frame.mv.col
            )?;
            write!(self.output, "{}", frame.board.render())?;
            self.output.flush()?;

            if !self.replay_delay.is_zero() {
                thread::sleep(self.replay_delay);
            }
        }

        writeln!(self.output, "Replay finished.")?;
        Ok(())
    }

    pub fn help(&mut self) -> Result<(), CliError> {
        writeln!(self.output, "Usage: tictactoe [OPTIONS]")?;
        writeln!(self.output)?;
        writeln!(self.output, "  -n, --new          Start a new game")?;
        writeln!(self.output, "  -l, --list         List saved games")?;
        writeln!(self.output, "  -r, --replay <ID>  Replay a saved game")?;
        writeln!(self.output, "      --serve        Run the HTTP API server")?;
        writeln!(self.output, "      --config <PATH> Load configuration from a file")?;
        writeln!(self.output, "  -h, --help         Show this help")?;
        writeln!(self.output)?;
        writeln!(self.output, "Without options an interactive menu is shown.")?;
        Ok(())
    }
}
