//! killfeed.toml 통합 설정 테스트
//!
//! - killfeed.toml.example 파싱 테스트
//! - 파일 로딩 + 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use std::io::Write;

use killfeed_core::config::KillfeedConfig;
use killfeed_core::error::{ConfigError, KillfeedError};
use serial_test::serial;

// =============================================================================
// killfeed.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../killfeed.toml.example");
    let config = KillfeedConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "pretty");
    assert!(config.tracker.log_path.ends_with("Game.log"));
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../killfeed.toml.example");
    let config = KillfeedConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_matches_defaults() {
    let content = include_str!("../../../killfeed.toml.example");
    let config = KillfeedConfig::parse(content).expect("should parse");
    let defaults = KillfeedConfig::default();

    assert_eq!(config.tracker.poll_interval_ms, defaults.tracker.poll_interval_ms);
    assert_eq!(config.tracker.dispatch_delay_ms, defaults.tracker.dispatch_delay_ms);
    assert_eq!(config.tracker.max_line_bytes, defaults.tracker.max_line_bytes);
    assert_eq!(config.collector.endpoint, defaults.collector.endpoint);
    assert_eq!(config.metrics.port, defaults.metrics.port);
}

// =============================================================================
// 파일 로딩
// =============================================================================

#[test]
fn empty_file_yields_defaults() {
    let config = KillfeedConfig::parse("").expect("empty config should parse");
    config.validate().unwrap();
    assert_eq!(config.tracker.poll_interval_ms, 300);
}

#[tokio::test]
#[serial]
async fn load_applies_env_overrides_over_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[tracker]\nsession_tag = \"from-file\"\naux_label = \"Arrow\""
    )
    .unwrap();

    // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
    unsafe { std::env::set_var("KILLFEED_TRACKER_SESSION_TAG", "from-env") };
    let config = KillfeedConfig::load(file.path()).await.unwrap();
    unsafe { std::env::remove_var("KILLFEED_TRACKER_SESSION_TAG") };

    assert_eq!(config.tracker.session_tag, "from-env");
    assert_eq!(config.tracker.aux_label, "Arrow");
}

#[tokio::test]
#[serial]
async fn load_rejects_invalid_env_override() {
    let file = tempfile::NamedTempFile::new().unwrap();

    // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
    unsafe { std::env::set_var("KILLFEED_GENERAL_LOG_FORMAT", "xml") };
    let result = KillfeedConfig::load(file.path()).await;
    unsafe { std::env::remove_var("KILLFEED_GENERAL_LOG_FORMAT") };

    let err = result.unwrap_err();
    assert!(matches!(
        err,
        KillfeedError::Config(ConfigError::InvalidValue { .. })
    ));
}

#[tokio::test]
async fn from_file_rejects_malformed_toml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[tracker\nlog_path = ").unwrap();

    let err = KillfeedConfig::from_file(file.path()).await.unwrap_err();
    assert!(matches!(
        err,
        KillfeedError::Config(ConfigError::ParseFailed { .. })
    ));
}
