use itertools::Itertools;
use rand::prelude::*;

use crate::game::common::GamePlayer;
use crate::ttt::ttt_game::{TttGame, TttMove};

pub struct PlayerRand {
    rand: StdRng,
}
impl Default for PlayerRand {
    fn default() -> Self {
        Self::new()
    }
}
impl PlayerRand {
    pub fn new() -> Self {
        Self::from_seed(rand::thread_rng().gen())
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rand: StdRng::seed_from_u64(seed),
        }
    }
}

impl GamePlayer for PlayerRand {
    fn next_move(&mut self, game: &TttGame) -> Option<TttMove> {
        let m = game.valid_moves().choose(&mut self.rand).copied()?;
        log::debug!("Rand: I'll claim cell {}!", m);
        Some(m)
    }
}

/// Greedy one-ply player: take a win, else block, else the cell with the highest score.
///
/// Ties between equally scored cells are broken uniformly at random.
pub struct PlayerPriority {
    rand: StdRng,
}
impl Default for PlayerPriority {
    fn default() -> Self {
        Self::new()
    }
}
impl PlayerPriority {
    pub fn new() -> Self {
        Self::from_seed(rand::thread_rng().gen())
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rand: StdRng::seed_from_u64(seed),
        }
    }

    fn choose_best_scored(&mut self, game: &TttGame, candidates: &[TttMove]) -> Option<TttMove> {
        candidates
            .iter()
            .copied()
            .max_set_by_key(|m| game.score(*m))
            .choose(&mut self.rand)
            .copied()
    }
}

impl GamePlayer for PlayerPriority {
    fn next_move(&mut self, game: &TttGame) -> Option<TttMove> {
        let us = game.current_player();
        let moves = game.valid_moves();

        match moves.as_slice() {
            [] => {
                log::debug!("Priority: no valid moves!");
                return None;
            }
            [last] => {
                log::debug!("Priority: last move, {}!", last);
                return Some(*last);
            }
            _ => {}
        }

        if let Some(m) = moves.iter().find(|m| game.is_winning_move(**m, us)) {
            log::debug!("Priority: winning move, {}!", m);
            return Some(*m);
        }

        let blocking_moves = moves
            .iter()
            .copied()
            .filter(|m| game.is_blocking_move(*m, us))
            .collect_vec();
        if !blocking_moves.is_empty() {
            let m = self.choose_best_scored(game, &blocking_moves)?;
            log::debug!("Priority: blocking move, {}!", m);
            return Some(m);
        }

        let m = self.choose_best_scored(game, &moves)?;
        log::debug!("Priority: best cell, {}!", m);
        Some(m)
    }
}
