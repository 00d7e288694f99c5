//! Daemon assembly -- configuration resolution, sink wiring, and session lifecycle.
//!
//! The [`Orchestrator`] loads configuration, installs the optional metrics
//! exporter, builds the HTTP collector sink and the session controller,
//! then runs one tracking session until a shutdown signal arrives.
//!
//! # Configuration precedence
//!
//! 1. CLI flags
//! 2. `KILLFEED_*` environment variables
//! 3. Config file
//! 4. Built-in defaults

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::watch;

use killfeed_core::config::KillfeedConfig;
use killfeed_tracker::{
    HttpCollectorSink, ScanMode, SessionController, SessionState, TrackerConfig,
};

use crate::cli::{DEFAULT_CONFIG_PATH, DaemonCli};
use crate::metrics_server;

/// Resolve the effective configuration from file, environment and CLI flags.
///
/// A missing config file is an error only when `--config` was passed explicitly.
///
/// # Errors
///
/// - The explicit config file does not exist or cannot be parsed
/// - The merged configuration fails validation
pub async fn resolve_config(cli: &DaemonCli) -> Result<KillfeedConfig> {
    let mut config = match &cli.config {
        Some(path) => KillfeedConfig::from_file(path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            KillfeedConfig::from_file(DEFAULT_CONFIG_PATH)
                .await
                .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?
        }
        None => KillfeedConfig::default(),
    };

    config.apply_env_overrides();
    apply_cli_overrides(&mut config, cli);

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;
    Ok(config)
}

/// Apply CLI flag overrides on top of file and environment values.
pub fn apply_cli_overrides(config: &mut KillfeedConfig, cli: &DaemonCli) {
    if let Some(level) = &cli.log_level {
        config.general.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.general.log_format = format.clone();
    }
    if let Some(path) = &cli.log_path {
        config.tracker.log_path = path.clone();
    }
    if let Some(tag) = &cli.session_tag {
        config.tracker.session_tag = tag.clone();
    }
    if let Some(label) = &cli.aux_label {
        config.tracker.aux_label = label.clone();
    }
}

/// The daemon orchestrator.
pub struct Orchestrator {
    /// Loaded and validated configuration.
    config: KillfeedConfig,
    /// Session controller wired to the HTTP collector.
    controller: SessionController<HttpCollectorSink>,
}

impl Orchestrator {
    /// Build from an already-resolved configuration.
    ///
    /// # Errors
    ///
    /// - Configuration validation fails
    /// - The metrics exporter cannot be installed
    /// - The HTTP client cannot be created
    pub fn build_from_config(config: KillfeedConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

        if config.metrics.enabled {
            metrics_server::install_metrics_recorder(&config.metrics)?;
        }

        let sink = HttpCollectorSink::from_config(&config.collector)
            .map_err(|e| anyhow::anyhow!("failed to build collector sink: {}", e))?;
        tracing::info!(endpoint = sink.endpoint(), "collector sink ready");

        let controller =
            SessionController::new(Arc::new(sink), TrackerConfig::from_core(&config.tracker));

        Ok(Self { config, controller })
    }

    /// Start the tracking session and block until a shutdown signal is received.
    ///
    /// # Errors
    ///
    /// - `tracker.log_path` or `tracker.session_tag` is empty
    /// - Signal handlers cannot be installed
    pub async fn run(&mut self) -> Result<()> {
        self.controller
            .start_session(
                self.config.tracker.log_path.clone(),
                self.config.tracker.session_tag.clone(),
            )
            .await
            .map_err(|e| anyhow::anyhow!("failed to start session: {}", e))?;

        let state_rx = self.controller.subscribe();
        let reporter = tokio::spawn(report_session_state(state_rx));

        let signal = wait_for_shutdown_signal().await?;
        tracing::info!(signal = signal, "shutdown signal received");

        if let Some(report) = self.controller.stop_session().await {
            tracing::info!(
                dispatched = report.dispatched,
                failed = report.failed,
                "session summary"
            );
        }
        reporter.abort();
        let _ = reporter.await;

        Ok(())
    }

    /// Get a reference to the loaded configuration.
    pub fn config(&self) -> &KillfeedConfig {
        &self.config
    }
}

/// Log the login transition once per session.
async fn report_session_state(mut rx: watch::Receiver<SessionState>) {
    let mut announced = false;
    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();
        if !announced && state.mode == ScanMode::TrackingEvents {
            announced = true;
            tracing::info!(
                handle = state.handle.as_deref().unwrap_or_default(),
                "now tracking kills for this character"
            );
        }
        if !state.active {
            announced = false;
        }
    }
}

/// Wait for a shutdown signal.
///
/// Returns the name of the signal that triggered the shutdown.
#[cfg(unix)]
async fn wait_for_shutdown_signal() -> Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("failed to install SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("failed to install SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("failed to install Ctrl-C handler: {}", e))?;
    Ok("CTRL_C")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_replace_config_values() {
        let mut config = KillfeedConfig::default();
        let cli = DaemonCli {
            log_level: Some("debug".to_owned()),
            log_path: Some("/games/Game.log".to_owned()),
            session_tag: Some("123456789".to_owned()),
            aux_label: Some("Gladius".to_owned()),
            ..DaemonCli::default()
        };

        apply_cli_overrides(&mut config, &cli);

        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.tracker.log_path, "/games/Game.log");
        assert_eq!(config.tracker.session_tag, "123456789");
        assert_eq!(config.tracker.aux_label, "Gladius");
    }

    #[test]
    fn absent_flags_leave_config_untouched() {
        let mut config = KillfeedConfig::default();
        config.tracker.session_tag = "from-file".to_owned();

        apply_cli_overrides(&mut config, &DaemonCli::default());
        assert_eq!(config.tracker.session_tag, "from-file");
    }

    #[tokio::test]
    async fn build_from_default_config() {
        let orchestrator = Orchestrator::build_from_config(KillfeedConfig::default()).unwrap();
        assert!(!orchestrator.config().metrics.enabled);
    }

    #[tokio::test]
    async fn run_without_session_tag_fails_fast() {
        let mut config = KillfeedConfig::default();
        config.tracker.log_path = "/tmp/Game.log".to_owned();
        let mut orchestrator = Orchestrator::build_from_config(config).unwrap();

        let err = orchestrator.run().await.unwrap_err();
        assert!(err.to_string().contains("session_tag"));
    }
}
