//! Tracing subscriber setup for the sweeper binary.

use std::str::FromStr;

use tracing::{Level, Subscriber};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const LOG_ENV: &str = "SWEEPER_LOG";

fn default_level() -> Level {
    if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Returns the subscriber used by the sweeper binary.
///
/// The filter is taken from the `SWEEPER_LOG` environment variable, using the
/// usual `tracing_subscriber` directive syntax. If the variable is unset or
/// does not parse, the filter falls back to a bare level: `debug` for debug
/// builds, `info` otherwise.
pub fn get_subscriber() -> impl Subscriber {
    let max_level = {
        let env_str = std::env::var(LOG_ENV).unwrap_or_default();

        // Accept a bare level ("debug") as well as full directives.
        env_str
            .split(',')
            .map(str::trim)
            .rev()
            .map(Level::from_str)
            .find_map(Result::ok)
            .unwrap_or_else(default_level)
    };

    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::default().add_directive(max_level.into()));

    FmtSubscriber::builder().with_env_filter(env_filter).finish()
}
