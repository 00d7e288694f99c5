//! 이벤트 전달 대상 구현
//!
//! - [`HttpCollectorSink`]: 원격 수집기로 JSON POST (운영용)
//! - [`ChannelSink`]: `tokio::mpsc` 채널로 전달 (임베딩/테스트용)
//!
//! 두 구현 모두 core의 [`EventSink`](killfeed_core::pipeline::EventSink) trait을 구현합니다.

pub mod channel;
pub mod http;

pub use channel::{ChannelSink, Delivery};
pub use http::{HttpCollectorSink, KillPayload};
