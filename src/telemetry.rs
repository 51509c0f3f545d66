use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::ENV_LOG;

/// Installs the global stderr subscriber.
///
/// `verbosity` (the count of `-v` flags) wins over the configured `level`;
/// `TODO_DAPP_LOG` wins over both. Calling this more than once is harmless.
pub fn init(verbosity: u8, level: &str) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_directive(verbosity, level).into())
        .with_env_var(ENV_LOG)
        .from_env_lossy();

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_directive(verbosity: u8, level: &str) -> LevelFilter {
    match verbosity {
        0 => level.parse().unwrap_or(LevelFilter::INFO),
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_configured_level() {
        assert_eq!(default_directive(0, "warn"), LevelFilter::WARN);
        assert_eq!(default_directive(0, "garbage"), LevelFilter::INFO);
        assert_eq!(default_directive(1, "warn"), LevelFilter::DEBUG);
        assert_eq!(default_directive(3, "warn"), LevelFilter::TRACE);
    }

    #[test]
    fn init_twice_does_not_panic() {
        init(0, "info");
        init(2, "debug");
    }
}
