use thiserror::Error;

use crate::game::common::GameColor;

/// Errors that can occur while setting up or running matches
#[derive(Error, Debug)]
pub enum TttError {
    #[error("grid size must be odd and within [3, 11], got {0}")]
    MalformedConfiguration(usize),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("invalid search parameters: {0}")]
    InvalidSearchParams(String),

    #[error("invalid move: cell {0} is not available")]
    InvalidMove(usize),

    #[error("player {} stopped playing before the game was over", .0.symbol())]
    Aborted(GameColor),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed results file: {0}")]
    ResultsFormat(String),
}

pub type Result<T> = std::result::Result<T, TttError>;
