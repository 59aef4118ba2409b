pub mod cmd_player;
pub mod players;
pub mod simple_players;
pub mod ttt_game;

#[cfg(test)]
mod ttt_test;
