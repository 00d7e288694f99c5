#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod event;
pub mod metrics;
pub mod pipeline;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, KillfeedError};

// 설정
pub use config::KillfeedConfig;

// 이벤트
pub use event::{IdentityRecord, KillEvent, SessionIdentity};

// sink trait
pub use pipeline::{DeliveryOutcome, EventSink};
