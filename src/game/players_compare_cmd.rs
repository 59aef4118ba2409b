use crate::error::{Result, TttError};
use crate::game::common::{GameColor, GamePlayer};
use crate::game::mcts::{parse_explore_factor, MctsParams};
use crate::game::players_compare::{self, PlayerBuilder, PlayerComparator};
use crate::ttt::players::PlayerKind;
use clap::Parser;
use std::path::Path;

#[derive(Parser, Debug)]
#[clap(about, long_about = None)]
struct PlayersCompareArgs {
    #[clap(long, default_value = "3")]
    grid_size: usize,
    #[clap(long, value_enum, default_value = "priority")]
    player_x: PlayerKind,
    #[clap(long, value_enum, default_value = "mcts")]
    player_o: PlayerKind,
    #[clap(long, default_value = "100")]
    games_num: u32,
    #[clap(long, default_value = "results.json")]
    result_file: String,
    #[clap(long, default_value = "4000", value_parser = clap::value_parser!(u32).range(1..))]
    sim_num: u32,
    #[clap(long, default_value = "1.4", value_parser = parse_explore_factor)]
    explore_factor: f32,
    #[clap(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    threads: u32,
}

struct KindPlayerBuilder {
    kind: PlayerKind,
    color: GameColor,
    mcts_params: MctsParams,
}

impl PlayerBuilder for KindPlayerBuilder {
    fn new_player(&self) -> Box<dyn GamePlayer> {
        self.kind.new_player(self.mcts_params)
    }

    fn name(&self) -> String {
        self.kind.display_name(self.color)
    }
}

fn build_comparator(args: &PlayersCompareArgs) -> Result<PlayerComparator> {
    if args.player_x.is_interactive() || args.player_o.is_interactive() {
        return Err(TttError::InvalidArguments(String::from(
            "human players can not take part in a batch comparison",
        )));
    }
    if args.threads == 0 {
        return Err(TttError::InvalidArguments(String::from("at least one thread is required")));
    }

    let mcts_params = MctsParams {
        sim_num: args.sim_num,
        explore_factor: args.explore_factor,
    };
    mcts_params.validate()?;

    let player_x_builder = Box::new(KindPlayerBuilder {
        kind: args.player_x,
        color: GameColor::Player1,
        mcts_params,
    });
    let player_o_builder = Box::new(KindPlayerBuilder {
        kind: args.player_o,
        color: GameColor::Player2,
        mcts_params,
    });
    PlayerComparator::new(player_x_builder, player_o_builder, args.grid_size, args.threads)
}

pub fn run_main() -> Result<()> {
    let args = PlayersCompareArgs::parse();

    let comparator = build_comparator(&args).map_err(|e| {
        log::error!("{}", e);
        e
    })?;
    let matchup = comparator.matchup_name();
    log::info!("Comparing {} over {} games on a {}x{} grid", matchup, args.games_num, args.grid_size, args.grid_size);

    let result = comparator.compare_players(args.games_num)?;
    log::info!(
        "{}: X {} | O {} | Draw {} | {:.5}s per game",
        matchup,
        result.x_wins,
        result.o_wins,
        result.draws,
        result.avg_match_secs
    );

    let result_file = Path::new(&args.result_file);
    players_compare::save_result(result_file, &matchup, &result)?;
    players_compare::display_results(result_file)
}
