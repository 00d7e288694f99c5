//! 전달 게이트 -- 고정 지연 후 sink로 한 번 전달
//!
//! 지연은 취소 토큰과 경쟁하며, 지연 중 세션이 멈추면 이벤트는 버려집니다.
//! 전달은 이벤트당 최대 한 번이며 재시도하지 않습니다.

use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use killfeed_core::event::{KillEvent, SessionIdentity};
use killfeed_core::metrics as m;
use killfeed_core::pipeline::{DeliveryOutcome, EventSink};

/// 전달 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 2xx 응답
    Delivered(DeliveryOutcome),
    /// 수집기가 응답했지만 non-2xx
    Rejected(DeliveryOutcome),
    /// 전송 계층 실패
    Failed(String),
    /// 지연 중 취소되어 전달하지 않음
    Cancelled,
}

impl DispatchOutcome {
    /// 메트릭 레이블 값
    pub fn label(&self) -> &'static str {
        match self {
            Self::Delivered(_) => "delivered",
            Self::Rejected(_) => "rejected",
            Self::Failed(_) => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// 수집기가 2xx로 받았는지 확인합니다.
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }
}

/// 지연 후 sink 호출을 담당하는 게이트
pub struct DispatchGate<S: EventSink> {
    sink: Arc<S>,
    delay: Duration,
    aux_label: String,
}

impl<S: EventSink> DispatchGate<S> {
    /// 새 전달 게이트를 생성합니다.
    pub fn new(sink: Arc<S>, delay: Duration, aux_label: impl Into<String>) -> Self {
        Self {
            sink,
            delay,
            aux_label: aux_label.into(),
        }
    }

    /// 전달 전 지연 시간
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// 모든 전달에 붙는 보조 레이블
    pub fn aux_label(&self) -> &str {
        &self.aux_label
    }

    /// 이벤트 하나를 전달합니다.
    ///
    /// 지연이 끝나기 전에 `cancel`이 발동하면 sink를 호출하지 않고
    /// [`DispatchOutcome::Cancelled`]를 반환합니다.
    pub async fn dispatch(
        &self,
        event: &KillEvent,
        identity: &SessionIdentity,
        cancel: &CancellationToken,
    ) -> DispatchOutcome {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(killer = %event.killer, victim = %event.victim, "session stopped before dispatch, dropping event");
                return self.record(DispatchOutcome::Cancelled);
            }
            _ = tokio::time::sleep(self.delay) => {}
        }

        let started = Instant::now();
        let result = self.sink.deliver(event, identity, &self.aux_label).await;
        histogram!(m::DISPATCH_DELIVERY_DURATION_SECONDS, m::LABEL_SINK => self.sink.name().to_owned())
            .record(started.elapsed().as_secs_f64());

        let outcome = match result {
            Ok(response) if response.is_success() => {
                info!(
                    sink = self.sink.name(),
                    status = response.status,
                    body = %response.body,
                    event = %event,
                    "kill event delivered"
                );
                DispatchOutcome::Delivered(response)
            }
            Ok(response) => {
                warn!(
                    sink = self.sink.name(),
                    status = response.status,
                    body = %response.body,
                    event = %event,
                    "collector rejected kill event"
                );
                DispatchOutcome::Rejected(response)
            }
            Err(e) => {
                warn!(sink = self.sink.name(), error = %e, event = %event, "kill event delivery failed");
                DispatchOutcome::Failed(e.to_string())
            }
        };

        self.record(outcome)
    }

    fn record(&self, outcome: DispatchOutcome) -> DispatchOutcome {
        debug!(result = outcome.label(), "dispatch finished");
        counter!(m::DISPATCH_DELIVERIES_TOTAL, m::LABEL_RESULT => outcome.label()).increment(1);
        outcome
    }
}
