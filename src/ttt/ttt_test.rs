#[cfg(test)]
mod tests {
    use rand::prelude::*;

    use crate::error::TttError;
    use crate::game::common::{GameColor, GamePlayer, GameState, GameStatus};
    use crate::game::mcts::{MctsParams, MctsPlayer};
    use crate::ttt::simple_players::{PlayerPriority, PlayerRand};
    use crate::ttt::ttt_game::{TttGame, TttMove};

    /// Plays a fixed list of labels, then gives up
    struct ScriptedPlayer {
        labels: Vec<usize>,
    }
    impl GamePlayer for ScriptedPlayer {
        fn next_move(&mut self, game: &TttGame) -> Option<TttMove> {
            if self.labels.is_empty() {
                return None;
            }
            let label = self.labels.remove(0);
            game.move_from_label(label)
        }
    }

    fn claim(game: &mut TttGame, label: usize, player: GameColor) -> bool {
        let m = game.move_from_label(label).unwrap();
        game.apply_move(m, player)
    }

    fn game_from_cells(grid_size: usize, cells: &str) -> TttGame {
        let mut game = TttGame::new(grid_size).unwrap();
        for (idx, c) in cells.chars().enumerate() {
            let player = match c {
                'x' => GameColor::Player1,
                'o' => GameColor::Player2,
                _ => continue,
            };
            assert!(claim(&mut game, idx + 1, player));
        }
        game
    }

    #[test]
    fn simple_game_and_mate() {
        let winner = |s: &str| match game_from_cells(3, s).status() {
            GameStatus::Finished(winner) => winner,
            GameStatus::Ongoing => None,
        };
        assert_eq!(winner("xxxoo____"), Some(GameColor::Player1));
        assert_eq!(winner("oo_xxx___"), Some(GameColor::Player1));
        assert_eq!(winner("oo____xxx"), Some(GameColor::Player1));
        assert_eq!(winner("xxo__o_xo"), Some(GameColor::Player2));
        assert_eq!(winner("xxo_o_o__"), Some(GameColor::Player2));
        assert_eq!(winner("xo__o_xo_"), Some(GameColor::Player2));
        assert_eq!(winner("xx_oo____"), None);
    }

    #[test]
    fn top_row_wins() {
        let mut game = TttGame::new(3).unwrap();
        for label in [1, 2, 3] {
            assert!(claim(&mut game, label, GameColor::Player1));
        }
        assert!(game.is_winner(GameColor::Player1));
        assert!(!game.is_winner(GameColor::Player2));
        assert_eq!(game.state(), GameState::Won(GameColor::Player1));
        assert_eq!(game.state().result_str(), Some("X"));
    }

    #[test]
    fn full_board_without_line_is_draw() {
        let game = game_from_cells(3, "xoxxoooxx");
        assert!(game.is_draw());
        assert!(!game.is_winner(GameColor::Player1));
        assert!(!game.is_winner(GameColor::Player2));
        assert!(game.valid_moves().is_empty());
        assert_eq!(game.state(), GameState::Draw);
        assert_eq!(game.state().result_str(), Some("Draw"));
    }

    #[test]
    fn even_or_out_of_range_grid_is_rejected() {
        for grid_size in [0, 1, 2, 4, 6, 12, 13] {
            assert!(matches!(
                TttGame::new(grid_size),
                Err(TttError::MalformedConfiguration(n)) if n == grid_size
            ));
        }
        for grid_size in [3, 5, 7, 9, 11] {
            assert!(TttGame::new(grid_size).is_ok());
        }
    }

    #[test]
    fn rejected_moves_leave_game_untouched() {
        let mut game = TttGame::new(3).unwrap();
        assert_eq!(game.move_from_label(0), None);
        assert_eq!(game.move_from_label(10), None);

        /* Outside the 3x3 grid */
        assert!(!game.apply_move(TttMove::from_idx(9), GameColor::Player1));
        assert_eq!(game.claimed_count(), 0);
        assert_eq!(game.current_player(), GameColor::Player1);

        assert!(claim(&mut game, 5, GameColor::Player1));
        assert_eq!(game.current_player(), GameColor::Player2);
        assert!(!claim(&mut game, 5, GameColor::Player2));
        assert_eq!(game.cell(1, 1), Some(GameColor::Player1));
        assert_eq!(game.claimed_count(), 1);
        assert_eq!(game.current_player(), GameColor::Player2);
    }

    #[test]
    fn score_matrix() {
        let game = TttGame::new(3).unwrap();
        assert_eq!(game.score_matrix(), [vec![3u32, 2, 3], vec![2, 4, 2], vec![3, 2, 3]]);
        assert_eq!(game.score(game.move_from_label(5).unwrap()), 4);

        /* Diagonal cells off the first, last and center rows get no bonus */
        let game = TttGame::new(5).unwrap();
        let scores = game.score_matrix();
        assert_eq!(scores[0][0], 3);
        assert_eq!(scores[0][4], 3);
        assert_eq!(scores[1][1], 2);
        assert_eq!(scores[3][1], 2);
        assert_eq!(scores[2][2], 4);
        assert_eq!(scores[4][4], 3);
    }

    #[test]
    fn grid_queries() {
        let mut game = TttGame::new(5).unwrap();
        assert_eq!(game.cells_num(), 25);
        assert_eq!(game.layout().grid_size(), 5);
        /* Rows, columns and the two main diagonals */
        assert_eq!(game.layout().lines().len(), 12);
        assert!(game.layout().lines().iter().all(|line| line.count() == 5));

        let m = game.move_at(1, 3);
        assert_eq!(m.label(), 9);
        assert_eq!(game.coords(m), (1, 3));
        assert!(game.is_valid_move(m));
        assert!(game.status().is_ongoing());
        game.play_single_turn(m).unwrap();
        assert!(!game.is_valid_move(m));
        assert_eq!(game.cell(1, 3), Some(GameColor::Player1));
        assert!(!game.status().is_finished());
    }

    #[test]
    fn copy_is_independent() {
        let mut game = TttGame::new(3).unwrap();
        assert!(claim(&mut game, 1, GameColor::Player1));
        let mut copy = game.copy();
        assert!(claim(&mut copy, 2, GameColor::Player2));
        assert!(claim(&mut copy, 3, GameColor::Player1));

        assert_eq!(game.claimed_count(), 1);
        assert_eq!(game.cell(0, 1), None);
        assert_eq!(game.current_player(), GameColor::Player2);
        assert_eq!(copy.claimed_count(), 3);
    }

    #[test]
    fn winning_and_blocking_moves() {
        /*
         *  X | X | 3
         *  O | 5 | 6
         *  O | 8 | 9
         */
        let game = game_from_cells(3, "xx_o__o__");
        assert_eq!(game.current_player(), GameColor::Player1);
        let m3 = game.move_from_label(3).unwrap();
        assert!(game.is_winning_move(m3, GameColor::Player1));
        assert!(game.is_blocking_move(m3, GameColor::Player2));
        assert!(!game.is_winning_move(m3, GameColor::Player2));

        /* Claimed cells never complete a line */
        let m1 = game.move_from_label(1).unwrap();
        assert!(!game.is_winning_move(m1, GameColor::Player1));
        assert!(!game.is_winning_move(m1, GameColor::Player2));
    }

    #[test]
    fn priority_takes_win_before_block() {
        /* X wins at 3, O threatens 6 */
        let game = game_from_cells(3, "xx_oo____");
        assert!(game.is_blocking_move(game.move_from_label(6).unwrap(), GameColor::Player1));
        for seed in 0..10 {
            let mut player = PlayerPriority::from_seed(seed);
            assert_eq!(player.next_move(&game).map(|m| m.label()), Some(3));
        }
    }

    #[test]
    fn priority_blocks_when_it_cannot_win() {
        /*
         *  O | X | 3
         *  4 | X | 6
         *  7 | 8 | 9
         */
        let game = game_from_cells(3, "ox__x____");
        assert_eq!(game.current_player(), GameColor::Player2);
        let blocks = game
            .valid_moves()
            .into_iter()
            .filter(|m| game.is_blocking_move(*m, GameColor::Player2))
            .map(|m| m.label())
            .collect::<Vec<_>>();
        assert_eq!(blocks, vec![8]);
        for seed in 0..10 {
            let mut player = PlayerPriority::from_seed(seed);
            assert_eq!(player.next_move(&game).map(|m| m.label()), Some(8));
        }
    }

    #[test]
    fn priority_picks_best_scored_block() {
        /*
         *  O | 2 | 3
         *  O | X | 6
         *  X | X | 9
         * X threatens the edge 2 and the corners 3 and 9, O cannot win
         */
        let game = game_from_cells(3, "o__ox_xx_");
        assert_eq!(game.current_player(), GameColor::Player2);
        assert!(game
            .valid_moves()
            .iter()
            .all(|m| !game.is_winning_move(*m, GameColor::Player2)));
        let blocks = game
            .valid_moves()
            .into_iter()
            .filter(|m| game.is_blocking_move(*m, GameColor::Player2))
            .map(|m| (m.label(), game.score(m)))
            .collect::<Vec<_>>();
        assert_eq!(blocks, vec![(2, 2), (3, 3), (9, 3)]);

        let mut seen = Vec::new();
        for seed in 0..40 {
            let mut player = PlayerPriority::from_seed(seed);
            let label = player.next_move(&game).map(|m| m.label()).unwrap();
            assert!(label == 3 || label == 9, "picked {}", label);
            if !seen.contains(&label) {
                seen.push(label);
            }
        }
        seen.sort();
        assert_eq!(seen, vec![3, 9]);
    }

    #[test]
    fn priority_prefers_center_on_empty_grid() {
        let game = TttGame::new(3).unwrap();
        for seed in 0..10 {
            let mut player = PlayerPriority::from_seed(seed);
            assert_eq!(player.next_move(&game).map(|m| m.label()), Some(5));
        }
    }

    #[test]
    fn random_self_play_keeps_board_consistent() {
        let seed = rand::thread_rng().gen::<u64>();
        println!("[test] Using seed {}", seed);
        let mut rand = StdRng::seed_from_u64(seed);

        for grid_size in [3, 5, 7, 9] {
            for _ in 0..20 {
                let mut game = TttGame::new(grid_size).unwrap();
                let mut player_x = PlayerRand::from_seed(rand.next_u64());
                let mut player_o = PlayerPriority::from_seed(rand.next_u64());
                let mut moves_num = 0;
                let state = game
                    .play_until_over_with_callback(&mut player_x, &mut player_o, &mut |game: &TttGame, _m: TttMove| {
                        moves_num += 1;
                        assert_eq!(game.valid_moves().len() + game.claimed_count(), game.cells_num());
                        assert!(!(game.is_winner(GameColor::Player1) && game.is_winner(GameColor::Player2)));
                    })
                    .unwrap();
                assert!(state.is_terminal());
                assert_eq!(game.claimed_count(), moves_num);
                assert_eq!(state, game.state());
            }
        }
    }

    #[test]
    fn mcts_never_loses_to_random() {
        let seed = rand::thread_rng().gen::<u64>();
        println!("[test] Using seed {}", seed);
        let mut rand = StdRng::seed_from_u64(seed);

        for _ in 0..3 {
            let mut game = TttGame::new(3).unwrap();
            let mut player_x = MctsPlayer::from_seed(MctsParams::new(4000), rand.next_u64());
            let mut player_o = PlayerRand::from_seed(rand.next_u64());
            let state = game.play_until_over(&mut player_x, &mut player_o).unwrap();
            assert_ne!(state, GameState::Won(GameColor::Player2));
        }
    }

    #[test]
    fn quitting_player_aborts_the_match() {
        let mut game = TttGame::new(3).unwrap();
        let mut player_x = ScriptedPlayer { labels: vec![5] };
        let mut player_o = ScriptedPlayer { labels: vec![] };
        let res = game.play_until_over(&mut player_x, &mut player_o);
        assert!(matches!(res, Err(TttError::Aborted(GameColor::Player2))));
        assert_eq!(game.claimed_count(), 1);
    }

    #[test]
    fn taken_cell_is_an_invalid_move() {
        let mut game = TttGame::new(3).unwrap();
        let mut player_x = ScriptedPlayer { labels: vec![5, 1] };
        let mut player_o = ScriptedPlayer { labels: vec![5] };
        let res = game.play_until_over(&mut player_x, &mut player_o);
        assert!(matches!(res, Err(TttError::InvalidMove(5))));
        assert_eq!(game.current_player(), GameColor::Player2);
    }

    #[test]
    fn display() {
        let game = game_from_cells(3, "x___o____");
        let expected = [
            " X  |   2 |   3",
            "---------------",
            "  4 |  O  |   6",
            "---------------",
            "  7 |   8 |   9",
        ]
        .join("\n");
        assert_eq!(game.to_string(), expected);
    }
}
