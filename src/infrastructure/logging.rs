use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `HSP_LOG=debug`
pub const LOG_ENV_VAR: &str = "HSP_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Installs the global subscriber; logs go to stderr so prompts stay readable
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
