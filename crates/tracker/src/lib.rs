#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`pattern`]: 로그인 마커 / kill 이벤트 라인 문법
//! - [`cursor`]: 재개 가능한 바이트 오프셋 커서, truncation 감지
//! - [`scanner`]: 2단계 스캔 상태 기계
//! - [`poller`]: 공유 읽기 모드로 파일을 여는 폴링 루프
//! - [`dispatch`]: 지연 후 한 번 전달하는 게이트
//! - [`session`]: 세션 시작/중지 제어와 상태 구독
//! - [`sink`]: HTTP 수집기 / 채널 sink
//! - [`config`]: 추적 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입

pub mod config;
pub mod cursor;
pub mod dispatch;
pub mod error;
pub mod pattern;
pub mod poller;
pub mod scanner;
pub mod session;
pub mod sink;

// --- 주요 타입 re-export ---

// 세션 제어
pub use session::{SessionController, SessionState};

// 설정
pub use config::{TrackerConfig, TrackerConfigBuilder};

// 에러
pub use error::TrackerError;

// 문법
pub use pattern::{KillLine, LineMatch, PatternSet};

// 상태 기계
pub use cursor::{Cursor, Truncation};
pub use scanner::{ScanMode, ScanStateMachine, ScanStep};

// 폴링 / 전달
pub use dispatch::{DispatchGate, DispatchOutcome};
pub use poller::{PollLoop, PollReport};

// sink
pub use sink::{ChannelSink, Delivery, HttpCollectorSink};
