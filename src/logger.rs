//! Logger setup for the setupgen binary.

/// Initializes `env_logger`: `Debug` with `verbose`, `Info` otherwise.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .init();
}
