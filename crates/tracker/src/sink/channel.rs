//! 채널 기반 sink
//!
//! 전달된 이벤트를 [`Delivery`] 레코드로 묶어 mpsc 채널로 보냅니다.
//! 수신 측이 닫혀 있으면 전송 실패로 보고합니다.

use tokio::sync::mpsc;

use killfeed_core::error::KillfeedError;
use killfeed_core::event::{KillEvent, SessionIdentity};
use killfeed_core::pipeline::{DeliveryOutcome, EventSink};

/// sink로 전달된 이벤트 한 건
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub event: KillEvent,
    pub identity: SessionIdentity,
    pub aux_label: String,
}

/// mpsc 채널로 이벤트를 넘기는 sink
pub struct ChannelSink {
    tx: mpsc::Sender<Delivery>,
    /// 응답으로 돌려줄 상태 코드
    status: u16,
}

impl ChannelSink {
    /// 새 채널 sink와 수신 측을 생성합니다.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Delivery>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::from_sender(tx), rx)
    }

    /// 기존 송신 측으로 sink를 생성합니다.
    pub fn from_sender(tx: mpsc::Sender<Delivery>) -> Self {
        Self { tx, status: 200 }
    }

    /// 응답 상태 코드를 지정합니다. 수집기 거부 응답을 흉내낼 때 사용합니다.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }
}

impl EventSink for ChannelSink {
    fn name(&self) -> &str {
        "channel"
    }

    async fn deliver(
        &self,
        event: &KillEvent,
        identity: &SessionIdentity,
        aux_label: &str,
    ) -> Result<DeliveryOutcome, KillfeedError> {
        let delivery = Delivery {
            event: event.clone(),
            identity: identity.clone(),
            aux_label: aux_label.to_owned(),
        };

        self.tx
            .send(delivery)
            .await
            .map_err(|e| KillfeedError::Delivery(format!("channel closed: {}", e)))?;

        Ok(DeliveryOutcome::new(self.status, "queued"))
    }
}
