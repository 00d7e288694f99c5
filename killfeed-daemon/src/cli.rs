//! CLI argument definitions for killfeed-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "killfeed.toml";

/// Game log kill-feed tracker.
///
/// Tails the game client's log file, waits for the login marker,
/// then forwards every kill event to the configured collector.
#[derive(Parser, Debug, Default)]
#[command(name = "killfeed-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to killfeed.toml configuration file.
    ///
    /// When omitted, `killfeed.toml` in the working directory is used if present,
    /// otherwise built-in defaults apply.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Game log file to track (overrides `tracker.log_path`).
    #[arg(long)]
    pub log_path: Option<String>,

    /// Operator id attached to every delivery (overrides `tracker.session_tag`).
    #[arg(long)]
    pub session_tag: Option<String>,

    /// Selected ship attached to every delivery (overrides `tracker.aux_label`).
    #[arg(long)]
    pub aux_label: Option<String>,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Validate configuration and exit without starting a session.
    #[arg(long)]
    pub validate: bool,
}
