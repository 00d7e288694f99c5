//! Logging initialization for killfeed-daemon.
//!
//! The `[general]` section picks the level and the output format. The level
//! applies to the killfeed crates only; dependencies such as `reqwest` and
//! `hyper` stay at `warn` unless `RUST_LOG` says otherwise.

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use killfeed_core::config::GeneralConfig;

/// Crate targets that follow `general.log_level`.
const KILLFEED_TARGETS: &[&str] = &["killfeed_core", "killfeed_tracker", "killfeed_daemon"];

/// Level for every target outside [`KILLFEED_TARGETS`].
const DEPENDENCY_LEVEL: &str = "warn";

/// Build the filter directive used when `RUST_LOG` is unset.
///
/// `default_directive("debug")` yields
/// `warn,killfeed_core=debug,killfeed_tracker=debug,killfeed_daemon=debug`.
pub fn default_directive(log_level: &str) -> String {
    let mut directive = DEPENDENCY_LEVEL.to_owned();
    for target in KILLFEED_TARGETS {
        directive.push_str(&format!(",{target}={log_level}"));
    }
    directive
}

type BoxedFmtLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

fn fmt_layer(log_format: &str) -> Result<BoxedFmtLayer> {
    let layer: BoxedFmtLayer = match log_format {
        "json" => tracing_subscriber::fmt::layer().json().boxed(),
        "pretty" => tracing_subscriber::fmt::layer().pretty().boxed(),
        other => anyhow::bail!("unknown log format '{other}', expected 'json' or 'pretty'"),
    };
    Ok(layer)
}

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros are used.
/// `RUST_LOG` wins over `log_level` when set.
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let layer = fmt_layer(&config.log_format)?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(&config.log_level)))
        .map_err(|e| anyhow::anyhow!("invalid log level '{}': {}", config.log_level, e))?;

    tracing_subscriber::registry()
        .with(layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| {
            anyhow::anyhow!(
                "failed to initialize {} tracing subscriber: {}",
                config.log_format,
                e
            )
        })
}
