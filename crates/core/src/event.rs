//! 이벤트 타입 -- 로그에서 추출되어 수집기로 전달되는 도메인 이벤트
//!
//! [`KillEvent`]는 kill 라인 한 줄에서 만들어지며 전달이 끝나면 버려집니다.
//! [`IdentityRecord`]는 세션마다 한 번, 로그인 마커에서 추출됩니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 로그인 마커에서 추출한 계정 식별 정보
///
/// 세션당 한 번 생성되며 이후 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// 게임 내 핸들 (캐릭터 이름)
    pub handle: String,
}

impl IdentityRecord {
    /// 새 식별 정보를 생성합니다.
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
        }
    }
}

/// kill 라인 한 줄에서 추출한 이벤트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KillEvent {
    /// 로그 타임스탬프 (Unix 초)
    pub timestamp: i64,
    /// 피해자
    pub victim: String,
    /// 가해자
    pub killer: String,
    /// 발생 구역
    pub zone: String,
    /// 사용 무기
    pub weapon: String,
    /// 피해 유형
    pub damage_type: String,
}

impl fmt::Display for KillEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} in {} ({}, {})",
            self.killer, self.victim, self.zone, self.weapon, self.damage_type
        )
    }
}

/// 전달 시 모든 이벤트에 붙는 세션 식별 정보
///
/// `session_tag`는 운영자가 세션 시작 시 입력한 값이고,
/// `handle`은 로그인 마커에서 추출한 값입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    /// 운영자 식별 태그
    pub session_tag: String,
    /// 게임 내 핸들
    pub handle: String,
}

impl SessionIdentity {
    /// 세션 태그와 로그인 식별 정보로 생성합니다.
    pub fn new(session_tag: impl Into<String>, identity: &IdentityRecord) -> Self {
        Self {
            session_tag: session_tag.into(),
            handle: identity.handle.clone(),
        }
    }
}
