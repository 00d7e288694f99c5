//! 폴링 루프 -- 로그 파일을 주기적으로 열어 새 라인을 읽습니다.
//!
//! 사이클마다 파일을 공유 읽기 모드로 열고, 커서 위치로 이동한 뒤
//! 사이클 시작 시점의 파일 길이까지만 읽습니다.
//! 끝나지 않은 마지막 라인은 소비하지 않고 다음 사이클에 다시 읽습니다.
//! 단, `max_line_bytes`를 넘은 라인은 버퍼에 담지 않고 줄 끝까지 건너뜁니다.
//! 아직 끝나지 않은 초과 라인도 읽은 만큼 커서를 옮기므로 같은 바이트를 다시 읽지 않습니다.
//!
//! 파일 핸들은 사이클 안에서만 유지되며 대기(폴링 주기, 전달 지연) 중에는 닫혀 있습니다.
//! kill 이벤트가 나오면 사이클을 끝내고 핸들을 닫은 뒤 전달하고, 곧바로 다음 사이클을 시작합니다.

use std::borrow::Cow;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use metrics::{counter, gauge};
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncSeekExt, BufReader};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use killfeed_core::event::{IdentityRecord, KillEvent, SessionIdentity};
use killfeed_core::metrics as m;
use killfeed_core::pipeline::EventSink;

use crate::config::TrackerConfig;
use crate::dispatch::{DispatchGate, DispatchOutcome};
use crate::error::TrackerError;
use crate::scanner::{ScanStateMachine, ScanStep};
use crate::session::SessionState;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Windows: FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE
#[cfg(windows)]
const SHARE_ALL: u32 = 0x1 | 0x2 | 0x4;

/// 폴링 루프 종료 시 요약
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollReport {
    /// 실행한 읽기 사이클 수
    pub cycles: u64,
    /// 소비한 라인 수
    pub lines_read: u64,
    /// 2xx로 전달된 이벤트 수
    pub dispatched: u64,
    /// 거부되었거나 전송에 실패한 이벤트 수
    pub failed: u64,
    /// 감지한 truncation/rotation 수
    pub truncations: u64,
    /// 종료 시점 커서 위치
    pub final_position: u64,
    /// 세션에서 감지한 로그인 식별 정보
    pub identity: Option<IdentityRecord>,
}

/// 한 라인을 읽은 결과
#[derive(Debug, Default, PartialEq, Eq)]
struct LineRead {
    /// 리더에서 소비한 바이트 수 (줄바꿈 포함)
    consumed: u64,
    /// `\n`으로 끝났는지 여부
    terminated: bool,
    /// 상한을 넘어 버퍼에 담지 않았는지 여부
    overflowed: bool,
}

/// 사이클 종료 사유
#[derive(Debug)]
enum CycleEnd {
    /// 스냅샷 끝까지 읽음
    Drained,
    /// 모드 전환으로 사이클을 버림
    Abandoned,
    /// 전달할 이벤트가 나옴
    Emitted(KillEvent),
    /// 읽는 도중 취소됨
    Cancelled,
}

/// 세션 하나의 폴링 루프
pub struct PollLoop<S: EventSink> {
    path: PathBuf,
    session_tag: String,
    scanner: ScanStateMachine,
    gate: DispatchGate<S>,
    config: TrackerConfig,
    cancel: CancellationToken,
    state_tx: Arc<watch::Sender<SessionState>>,
    session_identity: Option<SessionIdentity>,
    /// 줄 끝을 아직 만나지 못한 초과 라인을 건너뛰는 중
    discarding: bool,
    report: PollReport,
}

impl<S: EventSink> PollLoop<S> {
    /// 새 폴링 루프를 생성합니다.
    pub fn new(
        path: impl Into<PathBuf>,
        session_tag: impl Into<String>,
        scanner: ScanStateMachine,
        gate: DispatchGate<S>,
        config: TrackerConfig,
        cancel: CancellationToken,
        state_tx: Arc<watch::Sender<SessionState>>,
    ) -> Self {
        Self {
            path: path.into(),
            session_tag: session_tag.into(),
            scanner,
            gate,
            config,
            cancel,
            state_tx,
            session_identity: None,
            discarding: false,
            report: PollReport::default(),
        }
    }

    /// 취소될 때까지 폴링합니다.
    ///
    /// I/O 에러는 경고로 남기고 다음 사이클에서 재시도합니다.
    pub async fn run(mut self) -> PollReport {
        info!(path = %self.path.display(), "poll loop started");
        self.publish(true);

        while !self.cancel.is_cancelled() {
            self.report.cycles += 1;

            let end = match self.run_cycle().await {
                Ok(end) => end,
                Err(e) => {
                    counter!(m::TRACKER_IO_ERRORS_TOTAL).increment(1);
                    warn!(path = %self.path.display(), error = %e, "read cycle failed, retrying");
                    CycleEnd::Drained
                }
            };

            gauge!(m::TRACKER_CURSOR_POSITION).set(self.scanner.cursor().position() as f64);

            match end {
                CycleEnd::Cancelled => break,
                CycleEnd::Abandoned => {
                    self.on_tracking_started();
                    self.publish(true);
                    continue;
                }
                CycleEnd::Emitted(event) => {
                    self.dispatch(event).await;
                    self.publish(true);
                    continue;
                }
                CycleEnd::Drained => self.publish(true),
            }

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.config.poll_interval()) => {}
            }
        }

        info!(
            path = %self.path.display(),
            position = self.scanner.cursor().position(),
            dispatched = self.report.dispatched,
            "poll loop cancelled"
        );
        self.publish(false);

        self.report.final_position = self.scanner.cursor().position();
        self.report.identity = self.scanner.identity().cloned();
        self.report
    }

    /// 읽기 사이클 한 번. 반환 시 파일 핸들은 닫힙니다.
    async fn run_cycle(&mut self) -> Result<CycleEnd, TrackerError> {
        let mut file = open_shared(&self.path).await.map_err(|e| TrackerError::Collector {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        let length = file.metadata().await?.len();
        let mode = self.scanner.mode();
        if let Some(truncation) = self.scanner.cursor_mut().observe_length(length, mode) {
            counter!(m::TRACKER_TRUNCATIONS_TOTAL).increment(1);
            self.report.truncations += 1;
            self.discarding = false;
            warn!(
                previous = truncation.previous,
                current = truncation.current,
                "log file shrank, resuming from new end"
            );
        }

        let start = self.scanner.cursor().seek_target();
        let remaining = self.scanner.cursor().remaining();
        if remaining == 0 {
            return Ok(CycleEnd::Drained);
        }

        file.seek(SeekFrom::Start(start)).await?;
        let mut reader = BufReader::new(file.take(remaining));
        let limit = self.config.max_line_bytes;
        let mut buf = Vec::with_capacity(512);

        loop {
            if self.cancel.is_cancelled() {
                return Ok(CycleEnd::Cancelled);
            }

            buf.clear();
            let read = read_bounded_line(&mut reader, &mut buf, limit).await?;
            if read.consumed == 0 {
                return Ok(CycleEnd::Drained);
            }

            if !read.terminated {
                if read.overflowed || self.discarding {
                    // 초과 라인의 앞부분은 다시 읽을 필요가 없음
                    self.scanner.cursor_mut().advance(read.consumed);
                    self.discarding = true;
                    trace!(bytes = read.consumed, "discarding unterminated oversized line");
                } else {
                    trace!(bytes = read.consumed, "partial trailing line, waiting for writer");
                }
                return Ok(CycleEnd::Drained);
            }

            let at_start = self.scanner.cursor().position() == 0;
            self.scanner.cursor_mut().advance(read.consumed);
            self.report.lines_read += 1;
            counter!(m::TRACKER_LINES_READ_TOTAL).increment(1);

            if read.overflowed || self.discarding {
                self.discarding = false;
                debug!(limit, "oversized line skipped");
                continue;
            }

            let line = decode_line(&buf, at_start);
            match self.scanner.feed(&line) {
                ScanStep::Continue => {}
                ScanStep::AbandonCycle => return Ok(CycleEnd::Abandoned),
                ScanStep::Emit(event) => return Ok(CycleEnd::Emitted(event)),
            }
        }
    }

    fn on_tracking_started(&mut self) {
        if self.session_identity.is_some() {
            return;
        }
        if let Some(identity) = self.scanner.identity() {
            self.session_identity = Some(SessionIdentity::new(self.session_tag.clone(), identity));
        }
    }

    async fn dispatch(&mut self, event: KillEvent) {
        let Some(identity) = self.session_identity.as_ref() else {
            return;
        };

        match self.gate.dispatch(&event, identity, &self.cancel).await {
            DispatchOutcome::Delivered(_) => self.report.dispatched += 1,
            DispatchOutcome::Rejected(_) | DispatchOutcome::Failed(_) => self.report.failed += 1,
            DispatchOutcome::Cancelled => {}
        }
    }

    fn publish(&self, active: bool) {
        self.state_tx.send_replace(SessionState {
            active,
            mode: self.scanner.mode(),
            handle: self.scanner.identity().map(|i| i.handle.clone()),
            position: self.scanner.cursor().position(),
            dispatched: self.report.dispatched,
            failed: self.report.failed,
            truncations: self.report.truncations,
        });
    }
}

/// 다른 프로세스가 쓰거나 지우는 중에도 읽을 수 있도록 파일을 엽니다.
async fn open_shared(path: &Path) -> std::io::Result<File> {
    let mut options = tokio::fs::OpenOptions::new();
    options.read(true);
    #[cfg(windows)]
    options.share_mode(SHARE_ALL);
    options.open(path).await
}

/// `\n`까지 한 라인을 읽되 `limit` 바이트까지만 `buf`에 담습니다.
///
/// 라인이 `limit`를 넘으면 `buf`를 비우고 나머지는 소비만 합니다.
/// 스트림 끝에 도달하면 끝나지 않은 라인으로 반환합니다.
async fn read_bounded_line<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    limit: usize,
) -> std::io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    let mut read = LineRead::default();
    loop {
        let (used, done) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(read);
            }
            let (chunk, done) = match available.iter().position(|&b| b == b'\n') {
                Some(i) => (&available[..=i], true),
                None => (available, false),
            };
            if !read.overflowed {
                if buf.len() + chunk.len() > limit {
                    read.overflowed = true;
                    buf.clear();
                } else {
                    buf.extend_from_slice(chunk);
                }
            }
            (chunk.len(), done)
        };
        reader.consume(used);
        read.consumed += used as u64;
        if done {
            read.terminated = true;
            return Ok(read);
        }
    }
}

/// 라인 바이트를 문자열로 변환합니다.
///
/// 파일 시작의 BOM과 줄 끝의 `\r\n`/`\n`을 제거하며, 잘못된 UTF-8은 대체 문자로 바꿉니다.
fn decode_line(raw: &[u8], at_file_start: bool) -> Cow<'_, str> {
    let mut bytes = raw;
    if at_file_start {
        bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    }
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes)
}
