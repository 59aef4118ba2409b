/// Install the logger: `Info` level to stdout, overridden by `RUST_LOG` when set.
pub fn init_globals() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .target(env_logger::Target::Stdout)
        .parse_default_env()
        .init();
}
