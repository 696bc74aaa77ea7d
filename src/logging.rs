use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "warn";

/// Install the stderr subscriber shared by both tools.
///
/// stdout carries the tool output and must stay untouched, so every log line
/// goes to stderr. `RUST_LOG` overrides the default, e.g.
/// `RUST_LOG=aristarchos_tools=debug` shows why a message failed to decompose.
pub fn init() {
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(DEFAULT_FILTER)
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}
