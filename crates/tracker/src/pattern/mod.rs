//! 라인 문법 모듈 -- 로그인 마커와 kill 이벤트 두 가지 문법
//!
//! 두 문법은 서로 독립적이며 항상 완성된 한 줄에 대해서만 매칭됩니다.
//!
//! - [`IdentityPattern`]: 로그인 마커 (대소문자 구분)
//! - [`KillPattern`]: kill 이벤트 (대소문자 무시)
//!
//! # 사용 예시
//! ```ignore
//! use killfeed_tracker::pattern::{LineMatch, PatternSet};
//!
//! let patterns = PatternSet::new()?;
//! match patterns.match_line(line)? {
//!     Some(LineMatch::Identity(identity)) => println!("login: {}", identity.handle),
//!     Some(LineMatch::Kill(kill)) => println!("kill: {}", kill.event),
//!     None => {}
//! }
//! ```

pub mod identity;
pub mod kill;

pub use identity::IdentityPattern;
pub use kill::{Direction, KillLine, KillPattern, parse_log_timestamp};

use killfeed_core::event::IdentityRecord;

use crate::error::TrackerError;

/// 라인 매칭 결과
#[derive(Debug, Clone, PartialEq)]
pub enum LineMatch {
    /// 로그인 마커
    Identity(IdentityRecord),
    /// kill 이벤트
    Kill(KillLine),
}

/// 두 문법을 묶은 매처 세트
///
/// 정규식은 생성 시 한 번만 컴파일되며, `Clone`은 컴파일 결과를 공유합니다.
#[derive(Debug, Clone)]
pub struct PatternSet {
    identity: IdentityPattern,
    kill: KillPattern,
}

impl PatternSet {
    /// 두 문법을 컴파일합니다.
    pub fn new() -> Result<Self, TrackerError> {
        Ok(Self {
            identity: IdentityPattern::new()?,
            kill: KillPattern::new()?,
        })
    }

    /// 로그인 마커만 매칭합니다.
    pub fn match_identity(&self, line: &str) -> Option<IdentityRecord> {
        self.identity.extract(line)
    }

    /// kill 문법만 매칭합니다.
    pub fn match_kill(&self, line: &str) -> Result<Option<KillLine>, TrackerError> {
        self.kill.extract(line)
    }

    /// 로그인 마커, kill 순서로 매칭합니다.
    pub fn match_line(&self, line: &str) -> Result<Option<LineMatch>, TrackerError> {
        if let Some(identity) = self.match_identity(line) {
            return Ok(Some(LineMatch::Identity(identity)));
        }
        Ok(self.match_kill(line)?.map(LineMatch::Kill))
    }
}
