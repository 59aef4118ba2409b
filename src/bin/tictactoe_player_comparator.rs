use tictactoe_arena::game::players_compare_cmd::run_main;

fn main() -> tictactoe_arena::error::Result<()> {
    tictactoe_arena::util::init_globals();
    run_main()
}
