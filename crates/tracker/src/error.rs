//! 추적 엔진 에러 타입
//!
//! [`TrackerError`]는 추적 엔진 내부에서 발생하는 모든 에러를 표현합니다.
//! `From<TrackerError> for KillfeedError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.
//!
//! 세션을 멈추는 에러는 [`TrackerError::MissingInput`]뿐입니다.
//! 나머지는 폴링 루프가 로그로 남기고 다음 사이클로 넘어갑니다.

use killfeed_core::error::{ConfigError, KillfeedError};

/// 추적 엔진 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// 세션 시작에 필요한 입력 누락
    #[error("missing input: {field} must not be empty")]
    MissingInput {
        /// 누락된 입력 이름 (log_path, session_tag)
        field: String,
    },

    /// 문법은 일치했지만 필드 값이 잘못된 라인
    #[error("malformed {grammar} line: {field}: {reason}")]
    MalformedLine {
        /// 문법 이름 (kill, identity)
        grammar: String,
        /// 파싱에 실패한 필드
        field: String,
        /// 실패 사유
        reason: String,
    },

    /// 로그 파일 접근 에러
    #[error("collector error: {path}: {reason}")]
    Collector {
        /// 로그 파일 경로
        path: String,
        /// 에러 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// sink 전달 에러
    #[error("sink error: {0}")]
    Sink(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 정규식 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl From<TrackerError> for KillfeedError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::MissingInput { field } => {
                KillfeedError::Config(ConfigError::InvalidValue {
                    field,
                    reason: "must not be empty".to_owned(),
                })
            }
            TrackerError::Config { field, reason } => {
                KillfeedError::Config(ConfigError::InvalidValue { field, reason })
            }
            TrackerError::MalformedLine { .. } => KillfeedError::Parse(err.to_string()),
            TrackerError::Sink(reason) => KillfeedError::Delivery(reason),
            TrackerError::Io(e) => KillfeedError::Io(e),
            other => KillfeedError::Session(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_display() {
        let err = TrackerError::MissingInput {
            field: "session_tag".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "missing input: session_tag must not be empty"
        );
    }

    #[test]
    fn malformed_line_display() {
        let err = TrackerError::MalformedLine {
            grammar: "kill".to_owned(),
            field: "timestamp".to_owned(),
            reason: "input contains invalid characters".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("kill"));
        assert!(msg.contains("timestamp"));
    }

    #[test]
    fn missing_input_converts_to_config_error() {
        let err: KillfeedError = TrackerError::MissingInput {
            field: "log_path".to_owned(),
        }
        .into();
        assert!(matches!(err, KillfeedError::Config(_)));
    }

    #[test]
    fn collector_error_converts_to_session_error() {
        let err: KillfeedError = TrackerError::Collector {
            path: "/tmp/Game.log".to_owned(),
            reason: "permission denied".to_owned(),
        }
        .into();
        assert!(matches!(err, KillfeedError::Session(_)));
        assert!(err.to_string().contains("Game.log"));
    }

    #[test]
    fn sink_error_converts_to_delivery_error() {
        let err: KillfeedError = TrackerError::Sink("timeout".to_owned()).into();
        assert!(matches!(err, KillfeedError::Delivery(_)));
    }
}
