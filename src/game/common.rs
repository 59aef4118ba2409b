use crate::ttt::ttt_game::{TttGame, TttMove};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum GameColor {
    /// Plays 'X' and moves first
    Player1,
    /// Plays 'O'
    Player2,
}

impl GameColor {
    pub fn opposite(&self) -> GameColor {
        match self {
            GameColor::Player1 => GameColor::Player2,
            GameColor::Player2 => GameColor::Player1,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            GameColor::Player1 => 'X',
            GameColor::Player2 => 'O',
        }
    }
}

pub fn color_to_str(c: Option<GameColor>) -> String {
    match c {
        None => String::from("None"),
        Some(color) => color.symbol().to_string(),
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameStatus {
    Ongoing,
    Finished(Option<GameColor>),
}

impl GameStatus {
    pub fn is_ongoing(&self) -> bool {
        matches!(self, GameStatus::Ongoing)
    }

    pub fn is_finished(&self) -> bool {
        !self.is_ongoing()
    }
}

/// State machine of a single match. `Won` and `Draw` are terminal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    InProgress,
    Won(GameColor),
    Draw,
}

impl GameState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameState::InProgress)
    }

    /// The result string reported for a finished game: "X", "O" or "Draw".
    pub fn result_str(&self) -> Option<&'static str> {
        match self {
            GameState::InProgress => None,
            GameState::Won(GameColor::Player1) => Some("X"),
            GameState::Won(GameColor::Player2) => Some("O"),
            GameState::Draw => Some("Draw"),
        }
    }
}

impl From<GameStatus> for GameState {
    fn from(status: GameStatus) -> Self {
        match status {
            GameStatus::Ongoing => GameState::InProgress,
            GameStatus::Finished(Some(winner)) => GameState::Won(winner),
            GameStatus::Finished(None) => GameState::Draw,
        }
    }
}

pub trait GamePlayer {
    /// Choose a move for the side to move in `game`.
    ///
    /// Returns `None` when there is no legal move, or when an interactive player quits.
    fn next_move(&mut self, game: &TttGame) -> Option<TttMove>;
}
