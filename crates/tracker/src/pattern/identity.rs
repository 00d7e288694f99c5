//! 로그인 마커 문법
//!
//! ```text
//! <TS> [Notice] <AccountLoginCharacterStatus_Character> Character: createdAt N - updatedAt N
//!     - geid N - accountId N - name WORD - state WORD
//! ```
//!
//! 대소문자를 구분하며 라인 어디에서나 일치할 수 있습니다.
//! `name`만 추출하고 나머지 필드는 형태만 검증합니다.

use regex::Regex;

use killfeed_core::event::IdentityRecord;

use crate::error::TrackerError;

const IDENTITY_PATTERN: &str = concat!(
    r"<(?P<timestamp>[^>]+)> \[Notice\] <AccountLoginCharacterStatus_Character> Character: ",
    r"createdAt (?P<created_at>\d+) - updatedAt (?P<updated_at>\d+) - ",
    r"geid (?P<geid>\d+) - accountId (?P<account_id>\d+) - ",
    r"name (?P<name>\w+) - state (?P<state>\w+)",
);

/// 로그인 마커 매처
#[derive(Debug, Clone)]
pub struct IdentityPattern {
    regex: Regex,
}

impl IdentityPattern {
    /// 정규식을 컴파일합니다.
    pub fn new() -> Result<Self, TrackerError> {
        Ok(Self {
            regex: Regex::new(IDENTITY_PATTERN)?,
        })
    }

    /// 라인에서 계정 핸들을 추출합니다. 일치하지 않으면 `None`.
    pub fn extract(&self, line: &str) -> Option<IdentityRecord> {
        let caps = self.regex.captures(line)?;
        caps.name("name").map(|m| IdentityRecord::new(m.as_str()))
    }
}
