use std::io::{self, BufRead, BufReader, Stdin};

use itertools::Itertools;

use crate::game::common::GamePlayer;
use crate::ttt::ttt_game::{TttGame, TttMove};

/// A human typing labels. `q`, or the end of the input, quits the game.
pub struct TttPlayerCmd<R: BufRead> {
    input: R,
}

impl TttPlayerCmd<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()))
    }
}

impl<R: BufRead> TttPlayerCmd<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                log::error!("failed to read input: {}", e);
                None
            }
        }
    }
}

impl<R: BufRead> GamePlayer for TttPlayerCmd<R> {
    fn next_move(&mut self, game: &TttGame) -> Option<TttMove> {
        let moves = game.valid_moves();
        if moves.is_empty() {
            return None;
        }

        loop {
            println!(
                "{} - Enter the cell number for your next move [{}] or \"q\" to quit:",
                game.current_player().symbol(),
                moves.iter().join(", ")
            );
            let line = self.read_line()?;
            if line == "q" {
                println!("Quitting the game...");
                return None;
            }
            match line.parse::<usize>().ok().and_then(|label| game.move_from_label(label)) {
                Some(m) if moves.contains(&m) => return Some(m),
                _ => println!("Invalid move, try again"),
            }
        }
    }
}

pub fn cli_print_ttt_board(game: &TttGame) {
    println!();
    println!("{}", game);
}
