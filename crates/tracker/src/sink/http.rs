//! HTTP 수집기 sink
//!
//! kill 이벤트를 JSON으로 직렬화하여 원격 수집기에 POST합니다.
//! 인증 토큰이 설정되어 있으면 `Authorization: Bearer` 헤더를 붙입니다.
//!
//! 수집기가 응답한 경우 상태 코드와 본문을 그대로 돌려주며,
//! 연결 실패나 타임아웃만 에러로 취급합니다.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use killfeed_core::config::CollectorConfig;
use killfeed_core::error::KillfeedError;
use killfeed_core::event::{KillEvent, SessionIdentity};
use killfeed_core::pipeline::{DeliveryOutcome, EventSink};

use crate::error::TrackerError;

/// 수집기로 전송되는 JSON 본문
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KillPayload {
    /// 운영자 식별 태그
    pub discord_user_id: String,
    /// 게임 내 핸들
    pub handle_name: String,
    pub timestamp: i64,
    pub victim: String,
    pub killer: String,
    pub zone: String,
    pub weapon: String,
    pub damage_type: String,
    /// 선택한 함선. 수집기는 이 값을 `text` 키로 읽습니다.
    #[serde(rename = "text")]
    pub ship: String,
    /// 전달마다 새로 발급되는 ID (`eventoId` 키)
    #[serde(rename = "eventoId")]
    pub event_id: String,
}

impl KillPayload {
    /// 이벤트와 세션 정보로 본문을 만듭니다. `event_id`는 매번 새 UUID v4입니다.
    pub fn new(event: &KillEvent, identity: &SessionIdentity, aux_label: &str) -> Self {
        Self {
            discord_user_id: identity.session_tag.clone(),
            handle_name: identity.handle.clone(),
            timestamp: event.timestamp,
            victim: event.victim.clone(),
            killer: event.killer.clone(),
            zone: event.zone.clone(),
            weapon: event.weapon.clone(),
            damage_type: event.damage_type.clone(),
            ship: aux_label.to_owned(),
            event_id: Uuid::new_v4().to_string(),
        }
    }
}

/// reqwest 기반 수집기 sink
pub struct HttpCollectorSink {
    client: reqwest::Client,
    endpoint: String,
    auth_token: Option<String>,
}

impl HttpCollectorSink {
    /// 새 HTTP sink를 생성합니다.
    ///
    /// # Errors
    ///
    /// - 엔드포인트가 비어 있으면 `TrackerError::Config`
    /// - HTTP 클라이언트 생성 실패 시 `TrackerError::Sink`
    pub fn new(
        endpoint: impl Into<String>,
        auth_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, TrackerError> {
        let endpoint = endpoint.into();
        if endpoint.is_empty() {
            return Err(TrackerError::Config {
                field: "collector.endpoint".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TrackerError::Sink(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            auth_token: auth_token.filter(|t| !t.is_empty()),
        })
    }

    /// core 설정의 `[collector]` 섹션으로 생성합니다.
    pub fn from_config(config: &CollectorConfig) -> Result<Self, TrackerError> {
        Self::new(
            config.endpoint.clone(),
            Some(config.auth_token.clone()),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// 전송 대상 엔드포인트
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl EventSink for HttpCollectorSink {
    fn name(&self) -> &str {
        "http"
    }

    async fn deliver(
        &self,
        event: &KillEvent,
        identity: &SessionIdentity,
        aux_label: &str,
    ) -> Result<DeliveryOutcome, KillfeedError> {
        let payload = KillPayload::new(event, identity, aux_label);
        debug!(endpoint = %self.endpoint, event_id = %payload.event_id, "posting kill event");

        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| KillfeedError::Delivery(format!("{}: {}", self.endpoint, e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| KillfeedError::Delivery(format!("failed to read response body: {}", e)))?;

        Ok(DeliveryOutcome::new(status, body))
    }
}
