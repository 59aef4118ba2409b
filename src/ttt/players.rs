use std::fmt::{self, Display};

use clap::ValueEnum;

use crate::game::common::{GameColor, GamePlayer};
use crate::game::mcts::{MctsParams, MctsPlayer};
use crate::ttt::cmd_player::TttPlayerCmd;
use crate::ttt::simple_players::{PlayerPriority, PlayerRand};

/// The strategies a seat can be filled with
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum PlayerKind {
    Human,
    Random,
    Priority,
    Mcts,
}

impl PlayerKind {
    pub fn is_interactive(&self) -> bool {
        matches!(self, PlayerKind::Human)
    }

    pub fn new_player(&self, mcts_params: MctsParams) -> Box<dyn GamePlayer> {
        match self {
            PlayerKind::Human => Box::new(TttPlayerCmd::stdin()),
            PlayerKind::Random => Box::new(PlayerRand::new()),
            PlayerKind::Priority => Box::new(PlayerPriority::new()),
            PlayerKind::Mcts => Box::new(MctsPlayer::new(mcts_params)),
        }
    }

    /// Name used in the results file, e.g. "Priority-X"
    pub fn display_name(&self, color: GameColor) -> String {
        format!("{}-{}", self, color.symbol())
    }
}

impl Display for PlayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlayerKind::Human => "Human",
            PlayerKind::Random => "Random",
            PlayerKind::Priority => "Priority",
            PlayerKind::Mcts => "MCTS",
        };
        write!(f, "{}", name)
    }
}
