//! 2단계 스캔 상태 기계
//!
//! ```text
//! ScanningForIdentity --(로그인 마커)--> TrackingEvents
//!        |                                   |
//!   kill 라인 무시                    로그인 마커 무시
//! ```
//!
//! 전환은 세션당 한 번이며, 전환 시 커서는 파일 끝으로 이동합니다.
//! 따라서 로그인 이전의 과거 kill 라인은 재생되지 않습니다.
//! 이후 다시 나타나는 로그인 마커(재접속)는 무시됩니다.

use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use killfeed_core::event::{IdentityRecord, KillEvent};
use killfeed_core::metrics as m;

use crate::cursor::Cursor;
use crate::pattern::PatternSet;

/// 스캔 모드
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanMode {
    /// 로그인 마커를 찾는 중 (파일 처음부터)
    #[default]
    ScanningForIdentity,
    /// 실시간 kill 이벤트 추적 중
    TrackingEvents,
}

/// 라인 하나를 처리한 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStep {
    /// 다음 라인으로 진행
    Continue,
    /// 모드가 전환됨. 현재 읽기 사이클을 버리고 갱신된 위치에서 다시 열어야 함
    AbandonCycle,
    /// 전달할 kill 이벤트
    Emit(KillEvent),
}

/// 2단계 스캔 상태 기계
///
/// 커서를 소유하며, 불변식 `identity.is_some() == (mode == TrackingEvents)`를 유지합니다.
#[derive(Debug, Clone)]
pub struct ScanStateMachine {
    patterns: PatternSet,
    cursor: Cursor,
    mode: ScanMode,
    identity: Option<IdentityRecord>,
}

impl ScanStateMachine {
    /// 오프셋 0, 스캔 모드에서 시작하는 상태 기계를 생성합니다.
    pub fn new(patterns: PatternSet) -> Self {
        Self {
            patterns,
            cursor: Cursor::new(),
            mode: ScanMode::ScanningForIdentity,
            identity: None,
        }
    }

    /// 현재 모드를 반환합니다.
    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// 로그인 식별 정보를 반환합니다 (추적 모드에서만 `Some`).
    pub fn identity(&self) -> Option<&IdentityRecord> {
        self.identity.as_ref()
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    /// 완성된 라인 하나를 처리합니다.
    ///
    /// 호출자는 이 메서드를 부르기 전에 커서를 라인 길이만큼 전진시켜야 합니다.
    pub fn feed(&mut self, line: &str) -> ScanStep {
        match self.mode {
            ScanMode::ScanningForIdentity => self.feed_scanning(line),
            ScanMode::TrackingEvents => self.feed_tracking(line),
        }
    }

    fn feed_scanning(&mut self, line: &str) -> ScanStep {
        let Some(identity) = self.patterns.match_identity(line) else {
            return ScanStep::Continue;
        };

        info!(handle = %identity.handle, "login marker detected");
        counter!(m::TRACKER_IDENTITIES_FOUND_TOTAL).increment(1);

        self.identity = Some(identity);
        self.mode = ScanMode::TrackingEvents;
        self.cursor.jump_to_end();

        info!(
            position = self.cursor.position(),
            "jumped to end of log, tracking kills in real time"
        );
        ScanStep::AbandonCycle
    }

    fn feed_tracking(&mut self, line: &str) -> ScanStep {
        match self.patterns.match_kill(line) {
            Ok(Some(kill)) => {
                counter!(m::TRACKER_KILLS_DETECTED_TOTAL).increment(1);
                info!(
                    killer = %kill.event.killer,
                    victim = %kill.event.victim,
                    zone = %kill.event.zone,
                    "kill detected"
                );
                debug!(
                    victim_id = kill.victim_id,
                    killer_id = kill.killer_id,
                    weapon_class = %kill.weapon_class,
                    "kill line details"
                );
                ScanStep::Emit(kill.event)
            }
            Ok(None) => ScanStep::Continue,
            Err(e) => {
                counter!(m::TRACKER_MALFORMED_LINES_TOTAL).increment(1);
                warn!(
                    error = %e,
                    position = self.cursor.position(),
                    "skipping malformed kill line"
                );
                ScanStep::Continue
            }
        }
    }
}
