pub mod common;
pub mod mcts;
pub mod players_compare;
pub mod players_compare_cmd;
