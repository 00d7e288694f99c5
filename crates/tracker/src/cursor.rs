//! 재개 가능한 파일 커서
//!
//! [`Cursor`]는 마지막으로 완전히 소비한 라인의 끝 바이트 오프셋을 추적합니다.
//! 위치는 라인 하나를 끝까지 읽은 뒤에만 전진하며,
//! 추적 모드에서 파일이 짧아진 경우에만 뒤로 이동합니다.

use crate::scanner::ScanMode;

/// 감지된 truncation/rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    /// 감지 직전 위치
    pub previous: u64,
    /// 새 파일 길이 (= 새 위치)
    pub current: u64,
}

/// 로그 파일 커서
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    /// 마지막으로 소비한 라인의 끝 오프셋
    position: u64,
    /// 이번 사이클에서 관찰한 파일 길이
    file_length: u64,
}

impl Cursor {
    /// 오프셋 0에서 시작하는 커서를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 현재 위치를 반환합니다.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// 마지막으로 관찰한 파일 길이를 반환합니다.
    pub fn file_length(&self) -> u64 {
        self.file_length
    }

    /// 사이클 시작 시 파일 길이를 기록합니다.
    ///
    /// 추적 모드에서 파일이 현재 위치보다 짧아졌으면 위치를 새 끝으로 옮기고
    /// [`Truncation`]을 반환합니다. 처음부터 다시 읽지 않습니다.
    /// 로그인 마커 스캔 중에는 검사하지 않습니다.
    pub fn observe_length(&mut self, new_length: u64, mode: ScanMode) -> Option<Truncation> {
        self.file_length = new_length;

        if mode == ScanMode::TrackingEvents && new_length < self.position {
            let truncation = Truncation {
                previous: self.position,
                current: new_length,
            };
            self.position = new_length;
            return Some(truncation);
        }

        None
    }

    /// 읽기 시작 오프셋을 반환합니다.
    pub fn seek_target(&self) -> u64 {
        self.position
    }

    /// 이번 사이클에서 읽을 수 있는 남은 바이트 수를 반환합니다.
    pub fn remaining(&self) -> u64 {
        self.file_length.saturating_sub(self.position)
    }

    /// 라인 하나를 소비한 만큼 전진합니다.
    pub fn advance(&mut self, bytes_consumed: u64) {
        self.position = self.position.saturating_add(bytes_consumed);
    }

    /// 관찰한 파일 끝으로 이동합니다. 스캔→추적 전환 시 한 번 호출됩니다.
    pub fn jump_to_end(&mut self) {
        self.position = self.position.max(self.file_length);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let cursor = Cursor::new();
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn advance_accumulates() {
        let mut cursor = Cursor::new();
        cursor.observe_length(100, ScanMode::ScanningForIdentity);
        cursor.advance(10);
        cursor.advance(25);
        assert_eq!(cursor.position(), 35);
        assert_eq!(cursor.seek_target(), 35);
        assert_eq!(cursor.remaining(), 65);
    }

    #[test]
    fn truncation_while_tracking_snaps_to_new_length() {
        let mut cursor = Cursor::new();
        cursor.observe_length(5000, ScanMode::TrackingEvents);
        cursor.jump_to_end();
        assert_eq!(cursor.position(), 5000);

        let truncation = cursor.observe_length(200, ScanMode::TrackingEvents).unwrap();
        assert_eq!(
            truncation,
            Truncation {
                previous: 5000,
                current: 200
            }
        );
        assert_eq!(cursor.position(), 200);
    }

    #[test]
    fn truncation_check_skipped_while_scanning() {
        let mut cursor = Cursor::new();
        cursor.observe_length(500, ScanMode::ScanningForIdentity);
        cursor.advance(400);

        assert!(cursor.observe_length(100, ScanMode::ScanningForIdentity).is_none());
        assert_eq!(cursor.position(), 400);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn growth_is_not_truncation() {
        let mut cursor = Cursor::new();
        cursor.observe_length(100, ScanMode::TrackingEvents);
        cursor.advance(100);
        assert!(cursor.observe_length(100, ScanMode::TrackingEvents).is_none());
        assert!(cursor.observe_length(180, ScanMode::TrackingEvents).is_none());
        assert_eq!(cursor.position(), 100);
        assert_eq!(cursor.remaining(), 80);
    }

    #[test]
    fn jump_to_end_never_moves_backwards() {
        let mut cursor = Cursor::new();
        cursor.observe_length(50, ScanMode::ScanningForIdentity);
        cursor.advance(80);
        cursor.jump_to_end();
        assert_eq!(cursor.position(), 80);
    }
}
