use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt;

/// Install the stderr fmt subscriber. Safe to call more than once.
pub fn init_tracing(level: LevelFilter) {
    let subscriber = fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::warn!("Tracing subscriber already set; skipping re-initialization.");
    }
}
