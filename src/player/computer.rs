//! ランダムに手を選ぶコンピュータープレイヤー

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::Player;
use crate::error::PlayerError;
use crate::game::{Board, Position};

/// 空きマスの中から一様ランダムに選択するプレイヤー
/// 乱数源は差し替え可能で、シードを固定すれば手順が再現できる
#[derive(Debug, Clone)]
pub struct ComputerPlayer<R: Rng = StdRng> {
    rng: R,
}

impl ComputerPlayer<StdRng> {
    /// OSの乱数でシードしたプレイヤーを作成する
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// 固定シードのプレイヤーを作成する（テスト用）
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for ComputerPlayer<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> ComputerPlayer<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Player for ComputerPlayer<R> {
    fn next_move(&mut self, board: &Board) -> Result<Position, PlayerError> {
        let empty = board.empty_cells();
        empty
            .choose(&mut self.rng)
            .copied()
            .ok_or(PlayerError::NoEmptyCells)
    }

    fn name(&self) -> &str {
        "Computer"
    }
}
