//! 세션 제어 -- 추적 세션 시작/중지
//!
//! [`SessionController`]는 동시에 최대 하나의 세션만 실행합니다.
//! 새 세션을 시작하면 이전 세션을 취소하고 태스크가 끝날 때까지 기다린 뒤
//! 상태를 초기화합니다.
//!
//! 세션 진행 상황은 `watch` 채널의 [`SessionState`] 스냅샷으로 관찰할 수 있습니다.
//!
//! 컨트롤러를 `stop_session` 없이 drop해도 실행 중인 세션은 취소됩니다.
//! 이 경우 태스크 종료를 기다리지 않으므로 요약은 받을 수 없습니다.

use std::path::PathBuf;
use std::sync::Arc;

use metrics::gauge;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use killfeed_core::metrics as m;
use killfeed_core::pipeline::EventSink;

use crate::config::TrackerConfig;
use crate::dispatch::DispatchGate;
use crate::error::TrackerError;
use crate::pattern::PatternSet;
use crate::poller::{PollLoop, PollReport};
use crate::scanner::{ScanMode, ScanStateMachine};

/// 세션 상태 스냅샷
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// 세션 실행 여부
    pub active: bool,
    /// 스캔 모드
    pub mode: ScanMode,
    /// 로그인 마커에서 추출한 핸들 (추적 모드에서만)
    pub handle: Option<String>,
    /// 커서 위치
    pub position: u64,
    /// 2xx로 전달된 이벤트 수
    pub dispatched: u64,
    /// 거부되었거나 실패한 이벤트 수
    pub failed: u64,
    /// 감지한 truncation/rotation 수
    pub truncations: u64,
}

/// 실행 중인 세션
struct ActiveSession {
    cancel: CancellationToken,
    handle: JoinHandle<PollReport>,
}

/// 추적 세션 컨트롤러
pub struct SessionController<S: EventSink> {
    sink: Arc<S>,
    config: TrackerConfig,
    patterns: Option<PatternSet>,
    state_tx: Arc<watch::Sender<SessionState>>,
    active: Option<ActiveSession>,
}

impl<S: EventSink> SessionController<S> {
    /// 새 컨트롤러를 생성합니다. 세션은 시작하지 않습니다.
    pub fn new(sink: Arc<S>, config: TrackerConfig) -> Self {
        let (state_tx, _) = watch::channel(SessionState::default());
        Self {
            sink,
            config,
            patterns: None,
            state_tx: Arc::new(state_tx),
            active: None,
        }
    }

    /// 세션을 시작합니다.
    ///
    /// 실행 중인 세션이 있으면 먼저 중지합니다.
    ///
    /// # Errors
    ///
    /// - 경로나 세션 태그가 비어 있으면 `TrackerError::MissingInput` (아무것도 시작하지 않음)
    /// - 설정 값이 잘못되었으면 `TrackerError::Config`
    pub async fn start_session(
        &mut self,
        path: impl Into<PathBuf>,
        session_tag: impl Into<String>,
    ) -> Result<(), TrackerError> {
        let path = path.into();
        let session_tag = session_tag.into();

        if path.as_os_str().is_empty() {
            return Err(TrackerError::MissingInput {
                field: "log_path".to_owned(),
            });
        }
        if session_tag.trim().is_empty() {
            return Err(TrackerError::MissingInput {
                field: "session_tag".to_owned(),
            });
        }
        self.config.validate()?;

        let patterns = match &self.patterns {
            Some(patterns) => patterns.clone(),
            None => {
                let compiled = PatternSet::new()?;
                self.patterns = Some(compiled.clone());
                compiled
            }
        };

        self.stop_session().await;
        self.state_tx.send_replace(SessionState::default());

        let cancel = CancellationToken::new();
        let gate = DispatchGate::new(
            Arc::clone(&self.sink),
            self.config.dispatch_delay(),
            self.config.aux_label.clone(),
        );
        let poll_loop = PollLoop::new(
            path.clone(),
            session_tag.clone(),
            ScanStateMachine::new(patterns),
            gate,
            self.config.clone(),
            cancel.clone(),
            Arc::clone(&self.state_tx),
        );

        let handle = tokio::spawn(poll_loop.run());
        self.active = Some(ActiveSession { cancel, handle });
        gauge!(m::TRACKER_SESSION_ACTIVE).set(1.0);

        info!(
            path = %path.display(),
            session_tag = %session_tag,
            sink = self.sink.name(),
            "tracking session started"
        );
        Ok(())
    }

    /// 세션을 중지합니다. 실행 중인 세션이 없으면 아무것도 하지 않습니다.
    ///
    /// 세션 태스크가 끝날 때까지 기다린 뒤 요약을 반환합니다.
    pub async fn stop_session(&mut self) -> Option<PollReport> {
        let ActiveSession { cancel, handle } = self.active.take()?;

        cancel.cancel();
        let report = match handle.await {
            Ok(report) => Some(report),
            Err(e) => {
                warn!(error = %e, "session task ended abnormally");
                None
            }
        };

        gauge!(m::TRACKER_SESSION_ACTIVE).set(0.0);
        self.state_tx.send_modify(|state| state.active = false);

        if let Some(report) = &report {
            info!(
                cycles = report.cycles,
                lines_read = report.lines_read,
                dispatched = report.dispatched,
                failed = report.failed,
                truncations = report.truncations,
                position = report.final_position,
                "tracking session stopped"
            );
        }
        report
    }

    /// 이후 시작하는 세션의 모든 전달에 붙일 보조 레이블(선택한 함선)을 설정합니다.
    pub fn set_aux_label(&mut self, label: impl Into<String>) {
        self.config.aux_label = label.into();
    }

    /// 현재 보조 레이블
    pub fn aux_label(&self) -> &str {
        &self.config.aux_label
    }

    /// 세션 상태 변경을 구독합니다.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// 세션 태스크가 실행 중인지 확인합니다.
    pub fn is_active(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|session| !session.handle.is_finished())
    }
}

impl<S: EventSink> Drop for SessionController<S> {
    fn drop(&mut self) {
        if let Some(session) = self.active.take() {
            session.cancel.cancel();
            gauge!(m::TRACKER_SESSION_ACTIVE).set(0.0);
            info!("session controller dropped, tracking session cancelled");
        }
    }
}
