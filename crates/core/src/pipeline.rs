//! 외부 수집기 경계 -- 추출된 이벤트를 내보내는 sink trait
//!
//! 엔진은 수집기의 비즈니스 로직을 알지 못합니다.
//! [`EventSink::deliver`]를 한 번 호출하고 [`DeliveryOutcome`]을 로그로 남길 뿐입니다.

use std::future::Future;

use crate::error::KillfeedError;
use crate::event::{KillEvent, SessionIdentity};

/// 수집기 응답
///
/// 엔진은 `body`를 해석하지 않고 진단 로그에만 사용합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    /// 응답 상태 코드 (HTTP 의미론)
    pub status: u16,
    /// 응답 본문
    pub body: String,
}

impl DeliveryOutcome {
    /// 새 응답을 생성합니다.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx 응답인지 확인합니다.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 이벤트 전달 대상
///
/// 모든 전달은 이 trait을 거치므로 테스트에서는 채널 기반 sink로 교체할 수 있습니다.
/// `Send + Sync + 'static`이므로 세션 태스크 간에 `Arc`로 공유됩니다.
///
/// # Errors
///
/// 전송 계층 실패(연결 거부, 타임아웃 등)는 `KillfeedError::Delivery`로 반환합니다.
/// 수집기가 응답은 했지만 거부한 경우는 에러가 아니라 non-2xx `DeliveryOutcome`입니다.
pub trait EventSink: Send + Sync + 'static {
    /// sink 이름 (로그용)
    fn name(&self) -> &str;

    /// 이벤트 하나를 전달합니다.
    fn deliver(
        &self,
        event: &KillEvent,
        identity: &SessionIdentity,
        aux_label: &str,
    ) -> impl Future<Output = Result<DeliveryOutcome, KillfeedError>> + Send;
}
