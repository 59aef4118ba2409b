pub mod error;
pub mod game;
pub mod ttt;
pub mod util;
