use clap::Parser;
use std::path::Path;
use tictactoe_arena::game::players_compare::display_results;

#[derive(Parser, Debug)]
#[clap(about, long_about = None)]
struct Args {
    #[clap(long, default_value = "results.json")]
    result_file: String,
}

fn main() -> tictactoe_arena::error::Result<()> {
    tictactoe_arena::util::init_globals();

    let args = Args::parse();
    display_results(Path::new(&args.result_file))
}
