//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 추적 엔진은 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `killfeed_`
//! - 모듈명: `tracker_`, `dispatch_`, `daemon_`
//! - 접미어: `_total` (counter), `_seconds` (histogram), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(killfeed_core::metrics::TRACKER_KILLS_DETECTED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 결과 레이블 키 (delivered, rejected, failed, cancelled)
pub const LABEL_RESULT: &str = "result";

/// sink 레이블 키 (http, channel)
pub const LABEL_SINK: &str = "sink";

// ─── Tracker 메트릭 ────────────────────────────────────────────────

/// Tracker: 읽은 전체 라인 수 (counter)
pub const TRACKER_LINES_READ_TOTAL: &str = "killfeed_tracker_lines_read_total";

/// Tracker: 로그인 마커 감지 수 (counter)
pub const TRACKER_IDENTITIES_FOUND_TOTAL: &str = "killfeed_tracker_identities_found_total";

/// Tracker: 감지된 kill 이벤트 수 (counter)
pub const TRACKER_KILLS_DETECTED_TOTAL: &str = "killfeed_tracker_kills_detected_total";

/// Tracker: 문법은 일치했지만 필드 파싱에 실패한 라인 수 (counter)
pub const TRACKER_MALFORMED_LINES_TOTAL: &str = "killfeed_tracker_malformed_lines_total";

/// Tracker: 감지된 로그 truncation/rotation 수 (counter)
pub const TRACKER_TRUNCATIONS_TOTAL: &str = "killfeed_tracker_truncations_total";

/// Tracker: 폴링 사이클 중 발생한 I/O 에러 수 (counter)
pub const TRACKER_IO_ERRORS_TOTAL: &str = "killfeed_tracker_io_errors_total";

/// Tracker: 현재 커서 위치 (gauge, 바이트)
pub const TRACKER_CURSOR_POSITION: &str = "killfeed_tracker_cursor_position";

/// Tracker: 활성 세션 여부 (gauge, 0 또는 1). `SessionController`가 갱신합니다.
pub const TRACKER_SESSION_ACTIVE: &str = "killfeed_tracker_session_active";

// ─── Dispatch 메트릭 ───────────────────────────────────────────────

/// Dispatch: 결과별 전달 시도 수 (counter, label: result)
pub const DISPATCH_DELIVERIES_TOTAL: &str = "killfeed_dispatch_deliveries_total";

/// Dispatch: sink 호출 지연 시간 (histogram, 초)
pub const DISPATCH_DELIVERY_DURATION_SECONDS: &str = "killfeed_dispatch_delivery_duration_seconds";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
/// 일반적으로 `killfeed-daemon`의 시작 시점에서 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    // Tracker
    describe_counter!(
        TRACKER_LINES_READ_TOTAL,
        "Total number of complete log lines consumed by the tracker"
    );
    describe_counter!(
        TRACKER_IDENTITIES_FOUND_TOTAL,
        "Total number of login markers that started event tracking"
    );
    describe_counter!(
        TRACKER_KILLS_DETECTED_TOTAL,
        "Total number of kill lines extracted while tracking"
    );
    describe_counter!(
        TRACKER_MALFORMED_LINES_TOTAL,
        "Total number of matched lines skipped because a field failed to parse"
    );
    describe_counter!(
        TRACKER_TRUNCATIONS_TOTAL,
        "Total number of detected log truncations or rotations"
    );
    describe_counter!(
        TRACKER_IO_ERRORS_TOTAL,
        "Total number of poll cycles aborted by an I/O error"
    );
    describe_gauge!(
        TRACKER_CURSOR_POSITION,
        "Byte offset of the last fully consumed log line"
    );
    describe_gauge!(
        TRACKER_SESSION_ACTIVE,
        "Whether a recording session is currently active (0 or 1)"
    );

    // Dispatch
    describe_counter!(
        DISPATCH_DELIVERIES_TOTAL,
        "Delivery attempts by result (delivered, rejected, failed, cancelled)"
    );
    describe_histogram!(
        DISPATCH_DELIVERY_DURATION_SECONDS,
        "Time spent inside a single sink delivery in seconds"
    );
}
