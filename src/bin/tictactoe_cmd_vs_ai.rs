use clap::Parser;
use tictactoe_arena::error::{Result, TttError};
use tictactoe_arena::game::common::{color_to_str, GameState};
use tictactoe_arena::game::mcts::{parse_explore_factor, MctsParams};
use tictactoe_arena::ttt::cmd_player::cli_print_ttt_board;
use tictactoe_arena::ttt::players::PlayerKind;
use tictactoe_arena::ttt::ttt_game::{TttGame, TttMove};

#[derive(Parser, Debug)]
#[clap(about, long_about = None)]
struct Args {
    #[clap(long, default_value = "3")]
    grid_size: usize,
    #[clap(long, value_enum, default_value = "human")]
    player_x: PlayerKind,
    #[clap(long, value_enum, default_value = "mcts")]
    player_o: PlayerKind,
    #[clap(long, default_value = "4000", value_parser = clap::value_parser!(u32).range(1..))]
    sim_num: u32,
    #[clap(long, default_value = "1.4", value_parser = parse_explore_factor)]
    explore_factor: f32,
}

fn main() -> Result<()> {
    tictactoe_arena::util::init_globals();

    let args = Args::parse();
    let mcts_params = MctsParams {
        sim_num: args.sim_num,
        explore_factor: args.explore_factor,
    };
    mcts_params.validate()?;
    let mut player_x = args.player_x.new_player(mcts_params);
    let mut player_o = args.player_o.new_player(mcts_params);

    let mut game = TttGame::new(args.grid_size)?;
    cli_print_ttt_board(&game);
    let res = game.play_until_over_with_callback(
        player_x.as_mut(),
        player_o.as_mut(),
        &mut |game: &TttGame, m: TttMove| {
            log::info!("{} claimed cell {}", color_to_str(Some(game.current_player().opposite())), m);
            cli_print_ttt_board(game);
        },
    );
    let state = match res {
        Ok(state) => state,
        Err(TttError::Aborted(color)) => {
            log::info!("Player {} left, the game is abandoned", color.symbol());
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let winner = match state {
        GameState::Won(color) => Some(color),
        _ => None,
    };
    println!("\nThe winner is: {}", color_to_str(winner));
    Ok(())
}
