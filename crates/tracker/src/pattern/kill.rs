//! kill 이벤트 문법
//!
//! ```text
//! <TS> [Notice] <Actor Death> CActor::Kill: 'VICTIM' [VID] in zone 'ZONE' killed by 'KILLER' [KID]
//!     using 'WEAPON' [Class WCLASS] with damage type 'DAMAGE' from direction x: F, y: F, z: F
//! ```
//!
//! 대소문자를 구분하지 않으며 라인 시작에 고정됩니다.
//! 문법은 일치했지만 타임스탬프, ID, 방향 값이 파싱되지 않으면
//! [`TrackerError::MalformedLine`]을 반환합니다.

use chrono::{DateTime, NaiveDateTime};
use regex::{Captures, Regex};

use killfeed_core::event::KillEvent;

use crate::error::TrackerError;

const KILL_PATTERN: &str = concat!(
    r"(?i)^<(?P<time>[^>]+)>\s+\[Notice\]\s+<Actor Death>\s+CActor::Kill:\s+",
    r"'(?P<victim>[^']+)'\s+\[(?P<victim_id>\d+)\]\s+",
    r"in zone\s+'(?P<zone>[^']+)'\s+",
    r"killed by\s+'(?P<killer>[^']+)'\s+\[(?P<killer_id>\d+)\]\s+",
    r"using\s+'(?P<weapon>[^']+)'\s+\[Class\s+(?P<weapon_class>[^\]]+)\]\s+",
    r"with damage type\s+'(?P<damage>[^']+)'\s+",
    r"from direction x:\s*(?P<dx>[-\d.]+),\s*y:\s*(?P<dy>[-\d.]+),\s*z:\s*(?P<dz>[-\d.]+)",
);

/// 타임존 정보가 없는 타임스탬프 형식 (UTC로 해석)
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// 피격 방향 벡터
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// kill 라인의 전체 추출 결과
///
/// 수집기로는 `event`만 전달됩니다. ID, 무기 클래스, 방향은 검증된 채로 보관됩니다.
#[derive(Debug, Clone, PartialEq)]
pub struct KillLine {
    /// 전달 대상 이벤트
    pub event: KillEvent,
    /// 피해자 엔티티 ID
    pub victim_id: u64,
    /// 가해자 엔티티 ID
    pub killer_id: u64,
    /// 무기 클래스
    pub weapon_class: String,
    /// 피격 방향
    pub direction: Direction,
}

/// kill 라인 매처
#[derive(Debug, Clone)]
pub struct KillPattern {
    regex: Regex,
}

impl KillPattern {
    /// 정규식을 컴파일합니다.
    pub fn new() -> Result<Self, TrackerError> {
        Ok(Self {
            regex: Regex::new(KILL_PATTERN)?,
        })
    }

    /// 라인을 매칭합니다.
    ///
    /// - 일치하지 않음: `Ok(None)`
    /// - 일치하지만 필드 파싱 실패: `Err(MalformedLine)`
    pub fn extract(&self, line: &str) -> Result<Option<KillLine>, TrackerError> {
        let Some(caps) = self.regex.captures(line) else {
            return Ok(None);
        };

        let timestamp = parse_log_timestamp(group(&caps, "time")).map_err(|reason| {
            malformed("timestamp", reason)
        })?;

        let event = KillEvent {
            timestamp,
            victim: group(&caps, "victim").to_owned(),
            killer: group(&caps, "killer").to_owned(),
            zone: group(&caps, "zone").to_owned(),
            weapon: group(&caps, "weapon").to_owned(),
            damage_type: group(&caps, "damage").to_owned(),
        };

        Ok(Some(KillLine {
            event,
            victim_id: parse_id(&caps, "victim_id")?,
            killer_id: parse_id(&caps, "killer_id")?,
            weapon_class: group(&caps, "weapon_class").trim().to_owned(),
            direction: Direction {
                x: parse_component(&caps, "dx")?,
                y: parse_component(&caps, "dy")?,
                z: parse_component(&caps, "dz")?,
            },
        }))
    }
}

/// 로그 타임스탬프를 Unix 초로 변환합니다.
///
/// RFC 3339를 먼저 시도하고, 타임존이 없는 형식은 UTC로 해석합니다.
pub fn parse_log_timestamp(raw: &str) -> Result<i64, String> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.timestamp());
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc().timestamp());
        }
    }

    Err(format!("unrecognized timestamp '{}'", raw))
}

fn group<'a>(caps: &Captures<'a>, name: &str) -> &'a str {
    caps.name(name).map(|m| m.as_str()).unwrap_or_default()
}

fn parse_id(caps: &Captures<'_>, name: &str) -> Result<u64, TrackerError> {
    let raw = group(caps, name);
    raw.parse::<u64>()
        .map_err(|e| malformed(name, format!("'{}': {}", raw, e)))
}

fn parse_component(caps: &Captures<'_>, name: &str) -> Result<f64, TrackerError> {
    let raw = group(caps, name);
    raw.parse::<f64>()
        .map_err(|e| malformed(name, format!("'{}': {}", raw, e)))
}

fn malformed(field: &str, reason: String) -> TrackerError {
    TrackerError::MalformedLine {
        grammar: "kill".to_owned(),
        field: field.to_owned(),
        reason,
    }
}
