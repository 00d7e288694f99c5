//! 추적 엔진 설정
//!
//! [`TrackerConfig`]는 core의 [`TrackerSection`](killfeed_core::config::TrackerSection)을
//! 기반으로 세션 실행에 필요한 타이밍/제한 값을 제공합니다.
//!
//! 로그 경로와 세션 태그는 설정이 아니라 세션 시작 인자로 전달됩니다.
//!
//! # 사용 예시
//! ```ignore
//! use killfeed_core::config::KillfeedConfig;
//! use killfeed_tracker::config::TrackerConfig;
//!
//! let core_config = KillfeedConfig::default();
//! let config = TrackerConfig::from_core(&core_config.tracker);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use killfeed_core::config::{MAX_DISPATCH_DELAY_MS, MAX_LINE_BYTES, MAX_POLL_INTERVAL_MS};

use crate::error::TrackerError;

/// 추적 엔진 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// 폴링 사이클 사이 대기 시간 (밀리초)
    pub poll_interval_ms: u64,
    /// 전달 전 고정 지연 (밀리초)
    pub dispatch_delay_ms: u64,
    /// 매칭 대상 최대 라인 길이 (바이트). 초과 라인은 소비만 하고 매칭하지 않습니다.
    pub max_line_bytes: usize,
    /// 모든 전달에 붙는 보조 레이블 (선택한 함선)
    pub aux_label: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 300,
            dispatch_delay_ms: 1000,
            max_line_bytes: 64 * 1024, // 64KB
            aux_label: String::new(),
        }
    }
}

impl TrackerConfig {
    /// core의 `TrackerSection`에서 추적 설정을 생성합니다.
    pub fn from_core(core: &killfeed_core::config::TrackerSection) -> Self {
        Self {
            poll_interval_ms: core.poll_interval_ms,
            dispatch_delay_ms: core.dispatch_delay_ms,
            max_line_bytes: core.max_line_bytes,
            aux_label: core.aux_label.clone(),
        }
    }

    /// 폴링 주기를 반환합니다.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// 전달 지연을 반환합니다.
    pub fn dispatch_delay(&self) -> Duration {
        Duration::from_millis(self.dispatch_delay_ms)
    }

    /// 설정값의 유효성을 검증합니다.
    ///
    /// 상한은 `killfeed_core::config`의 상수를 그대로 사용하므로
    /// `KillfeedConfig::validate`와 같은 범위를 허용합니다.
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.poll_interval_ms == 0 || self.poll_interval_ms > MAX_POLL_INTERVAL_MS {
            return Err(TrackerError::Config {
                field: "poll_interval_ms".to_owned(),
                reason: format!("must be 1-{}", MAX_POLL_INTERVAL_MS),
            });
        }

        if self.dispatch_delay_ms > MAX_DISPATCH_DELAY_MS {
            return Err(TrackerError::Config {
                field: "dispatch_delay_ms".to_owned(),
                reason: format!("must be 0-{}", MAX_DISPATCH_DELAY_MS),
            });
        }

        if self.max_line_bytes == 0 || self.max_line_bytes > MAX_LINE_BYTES {
            return Err(TrackerError::Config {
                field: "max_line_bytes".to_owned(),
                reason: format!("must be 1-{}", MAX_LINE_BYTES),
            });
        }

        Ok(())
    }
}

/// 추적 설정 빌더
#[derive(Default)]
pub struct TrackerConfigBuilder {
    config: TrackerConfig,
}

impl TrackerConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 폴링 주기(밀리초)를 설정합니다.
    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.poll_interval_ms = ms;
        self
    }

    /// 전달 지연(밀리초)을 설정합니다.
    pub fn dispatch_delay_ms(mut self, ms: u64) -> Self {
        self.config.dispatch_delay_ms = ms;
        self
    }

    /// 최대 라인 길이를 설정합니다.
    pub fn max_line_bytes(mut self, bytes: usize) -> Self {
        self.config.max_line_bytes = bytes;
        self
    }

    /// 보조 레이블을 설정합니다.
    pub fn aux_label(mut self, label: impl Into<String>) -> Self {
        self.config.aux_label = label.into();
        self
    }

    /// 설정을 검증하고 `TrackerConfig`를 생성합니다.
    pub fn build(self) -> Result<TrackerConfig, TrackerError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        TrackerConfig::default().validate().unwrap();
    }

    #[test]
    fn from_core_preserves_values() {
        let core = killfeed_core::config::TrackerSection {
            poll_interval_ms: 120,
            dispatch_delay_ms: 0,
            aux_label: "Cutlass Black".to_owned(),
            ..Default::default()
        };
        let config = TrackerConfig::from_core(&core);
        assert_eq!(config.poll_interval(), Duration::from_millis(120));
        assert_eq!(config.dispatch_delay(), Duration::ZERO);
        assert_eq!(config.aux_label, "Cutlass Black");
        assert_eq!(config.max_line_bytes, 64 * 1024);
    }

    #[test]
    fn validate_rejects_zero_poll_interval() {
        let config = TrackerConfig {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_enforces_core_line_limit() {
        let at_limit = TrackerConfig {
            max_line_bytes: MAX_LINE_BYTES,
            ..Default::default()
        };
        at_limit.validate().unwrap();

        let over_limit = TrackerConfig {
            max_line_bytes: MAX_LINE_BYTES + 1,
            ..Default::default()
        };
        let err = over_limit.validate().unwrap_err();
        assert!(err.to_string().contains("max_line_bytes"));
    }

    #[test]
    fn validate_agrees_with_core_config() {
        // core 설정이 허용하는 경계값은 tracker 설정도 허용해야 함
        let mut core = killfeed_core::config::KillfeedConfig::default();
        core.tracker.poll_interval_ms = MAX_POLL_INTERVAL_MS;
        core.tracker.dispatch_delay_ms = MAX_DISPATCH_DELAY_MS;
        core.tracker.max_line_bytes = MAX_LINE_BYTES;
        core.validate().unwrap();
        TrackerConfig::from_core(&core.tracker).validate().unwrap();

        core.tracker.dispatch_delay_ms = MAX_DISPATCH_DELAY_MS + 1;
        assert!(core.validate().is_err());
        assert!(TrackerConfig::from_core(&core.tracker).validate().is_err());
    }

    #[test]
    fn builder_creates_valid_config() {
        let config = TrackerConfigBuilder::new()
            .poll_interval_ms(20)
            .dispatch_delay_ms(5)
            .aux_label("Avenger")
            .build()
            .unwrap();
        assert_eq!(config.poll_interval_ms, 20);
        assert_eq!(config.dispatch_delay_ms, 5);
        assert_eq!(config.aux_label, "Avenger");
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let result = TrackerConfigBuilder::new().max_line_bytes(0).build();
        assert!(result.is_err());
    }
}
