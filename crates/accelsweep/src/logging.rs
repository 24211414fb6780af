use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging to stderr.
///
/// The log level comes from the `level` parameter, overridable via the
/// `RUST_LOG` environment variable. Stdout stays clean for the search
/// collaborators that consume it.
pub fn init_logging(level: &str) {
    let default_filter = format!("accelsweep={level},accelsweep_core={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true),
        )
        .init();
}
