//! 설정 관리 -- killfeed.toml 파싱 및 런타임 설정
//!
//! [`KillfeedConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`KILLFEED_TRACKER_LOG_PATH=/path/Game.log` 형식)
//! 3. 설정 파일 (`killfeed.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), killfeed_core::error::KillfeedError> {
//! use killfeed_core::config::KillfeedConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = KillfeedConfig::load("killfeed.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = KillfeedConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, KillfeedError};

/// 폴링 주기 상한 (밀리초)
///
/// `killfeed-tracker`의 `TrackerConfig` 검증도 같은 상한을 사용합니다.
pub const MAX_POLL_INTERVAL_MS: u64 = 60_000;
/// 전달 지연 상한 (밀리초)
pub const MAX_DISPATCH_DELAY_MS: u64 = 60_000;
/// 라인 길이 상한 (바이트)
pub const MAX_LINE_BYTES: usize = 16 * 1024 * 1024;
/// 수집기 요청 타임아웃 상한 (초)
const MAX_COLLECTOR_TIMEOUT_SECS: u64 = 300;

/// killfeed 통합 설정
///
/// `killfeed.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KillfeedConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 로그 추적 설정
    #[serde(default)]
    pub tracker: TrackerSection,
    /// 원격 수집기 설정
    #[serde(default)]
    pub collector: CollectorConfig,
    /// 메트릭 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl KillfeedConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, KillfeedError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    ///
    /// 검증은 하지 않습니다. 파일 값은 환경변수와 CLI 인자로 덮어쓸 수 있으므로
    /// 모든 오버라이드를 적용한 뒤 [`validate`](Self::validate)를 호출해야 합니다.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, KillfeedError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                KillfeedError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                KillfeedError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, KillfeedError> {
        toml::from_str(toml_str).map_err(|e| {
            KillfeedError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `KILLFEED_{SECTION}_{FIELD}`
    /// 예: `KILLFEED_TRACKER_SESSION_TAG=123456789`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "KILLFEED_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "KILLFEED_GENERAL_LOG_FORMAT");

        // Tracker
        override_string(&mut self.tracker.log_path, "KILLFEED_TRACKER_LOG_PATH");
        override_string(&mut self.tracker.session_tag, "KILLFEED_TRACKER_SESSION_TAG");
        override_string(&mut self.tracker.aux_label, "KILLFEED_TRACKER_AUX_LABEL");
        override_parse(
            &mut self.tracker.poll_interval_ms,
            "KILLFEED_TRACKER_POLL_INTERVAL_MS",
        );
        override_parse(
            &mut self.tracker.dispatch_delay_ms,
            "KILLFEED_TRACKER_DISPATCH_DELAY_MS",
        );
        override_parse(
            &mut self.tracker.max_line_bytes,
            "KILLFEED_TRACKER_MAX_LINE_BYTES",
        );

        // Collector
        override_string(&mut self.collector.endpoint, "KILLFEED_COLLECTOR_ENDPOINT");
        override_string(
            &mut self.collector.auth_token,
            "KILLFEED_COLLECTOR_AUTH_TOKEN",
        );
        override_parse(
            &mut self.collector.timeout_secs,
            "KILLFEED_COLLECTOR_TIMEOUT_SECS",
        );

        // Metrics
        override_parse(&mut self.metrics.enabled, "KILLFEED_METRICS_ENABLED");
        override_string(
            &mut self.metrics.listen_addr,
            "KILLFEED_METRICS_LISTEN_ADDR",
        );
        override_parse(&mut self.metrics.port, "KILLFEED_METRICS_PORT");
    }

    /// 설정값의 유효성을 검증합니다.
    ///
    /// `log_path`와 `session_tag`의 존재 여부는 여기서 검사하지 않습니다.
    /// 둘은 세션 시작 시점에 검사되어 호출자에게 바로 보고됩니다.
    pub fn validate(&self) -> Result<(), KillfeedError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.tracker.poll_interval_ms == 0 || self.tracker.poll_interval_ms > MAX_POLL_INTERVAL_MS
        {
            return Err(ConfigError::InvalidValue {
                field: "tracker.poll_interval_ms".to_owned(),
                reason: format!("must be 1-{}", MAX_POLL_INTERVAL_MS),
            }
            .into());
        }

        if self.tracker.dispatch_delay_ms > MAX_DISPATCH_DELAY_MS {
            return Err(ConfigError::InvalidValue {
                field: "tracker.dispatch_delay_ms".to_owned(),
                reason: format!("must be 0-{}", MAX_DISPATCH_DELAY_MS),
            }
            .into());
        }

        if self.tracker.max_line_bytes == 0 || self.tracker.max_line_bytes > MAX_LINE_BYTES {
            return Err(ConfigError::InvalidValue {
                field: "tracker.max_line_bytes".to_owned(),
                reason: format!("must be 1-{}", MAX_LINE_BYTES),
            }
            .into());
        }

        if !(self.collector.endpoint.starts_with("http://")
            || self.collector.endpoint.starts_with("https://"))
        {
            return Err(ConfigError::InvalidValue {
                field: "collector.endpoint".to_owned(),
                reason: "must be an http:// or https:// URL".to_owned(),
            }
            .into());
        }

        if self.collector.timeout_secs == 0
            || self.collector.timeout_secs > MAX_COLLECTOR_TIMEOUT_SECS
        {
            return Err(ConfigError::InvalidValue {
                field: "collector.timeout_secs".to_owned(),
                reason: format!("must be 1-{}", MAX_COLLECTOR_TIMEOUT_SECS),
            }
            .into());
        }

        if self.metrics.enabled && self.metrics.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "metrics.port".to_owned(),
                reason: "port must not be 0 when metrics are enabled".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 로그 추적 설정 (`[tracker]` 섹션)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSection {
    /// 감시할 게임 로그 파일 경로
    pub log_path: String,
    /// 운영자 식별 태그
    pub session_tag: String,
    /// 보조 레이블 (선택한 함선 이름)
    pub aux_label: String,
    /// 폴링 사이클 사이 대기 시간 (밀리초)
    pub poll_interval_ms: u64,
    /// 전달 전 고정 지연 (밀리초)
    pub dispatch_delay_ms: u64,
    /// 매칭 대상 최대 라인 길이 (바이트)
    pub max_line_bytes: usize,
}

impl Default for TrackerSection {
    fn default() -> Self {
        Self {
            log_path: String::new(),
            session_tag: String::new(),
            aux_label: String::new(),
            poll_interval_ms: 300,
            dispatch_delay_ms: 1000,
            max_line_bytes: 64 * 1024, // 64KB
        }
    }
}

/// 원격 수집기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// kill 이벤트를 POST할 엔드포인트
    pub endpoint: String,
    /// Bearer 토큰 (비어 있으면 Authorization 헤더 생략)
    pub auth_token: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:10000/api/kills".to_owned(),
            auth_token: String::new(),
            timeout_secs: 10,
        }
    }
}

/// 메트릭 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Prometheus 엔드포인트 활성화 여부
    pub enabled: bool,
    /// 바인드 주소
    pub listen_addr: String,
    /// 바인드 포트
    pub port: u16,
    /// 스크레이프 경로
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9109,
            endpoint: "/metrics".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

/// `FromStr`로 파싱 가능한 값을 환경변수로 덮어씁니다.
///
/// 파싱에 실패하면 경고만 남기고 기존 값을 유지합니다.
fn override_parse<T: FromStr>(target: &mut T, env_key: &str) {
    let Ok(val) = std::env::var(env_key) else {
        return;
    };
    match val.trim().parse::<T>() {
        Ok(parsed) => *target = parsed,
        Err(_) => warn!(
            env_key,
            value = val.as_str(),
            expected = std::any::type_name::<T>(),
            "ignoring unparsable env override"
        ),
    }
}
