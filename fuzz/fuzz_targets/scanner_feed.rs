#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use killfeed_tracker::pattern::PatternSet;
use killfeed_tracker::scanner::{ScanMode, ScanStateMachine, ScanStep};

const LOGIN_PREFIX: &str = "<2024-01-01T00:00:00Z> [Notice] <AccountLoginCharacterStatus_Character> Character: createdAt 1 - updatedAt 2 - geid 3 - accountId 4 - name ";
const KILL_PREFIX: &str = "<2024-01-01T00:00:05Z> [Notice] <Actor Death> CActor::Kill: '";

/// 퍼저용 구조적 입력: 라인 종류를 섞어 실제 문법에 가까운 입력을 만든다
#[derive(Arbitrary, Debug)]
enum FuzzLine {
    Raw(String),
    Login(String),
    Kill(String),
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// 사이클마다 관찰되는 파일 길이
    file_length: u32,
    lines: Vec<FuzzLine>,
}

fuzz_target!(|input: FuzzInput| {
    let Ok(patterns) = PatternSet::new() else {
        return;
    };
    let mut scanner = ScanStateMachine::new(patterns);

    for fuzz_line in input.lines.iter().take(256) {
        let line = match fuzz_line {
            FuzzLine::Raw(s) => s.clone(),
            FuzzLine::Login(s) => format!("{}{}", LOGIN_PREFIX, s),
            FuzzLine::Kill(s) => format!("{}{}", KILL_PREFIX, s),
        };

        let mode = scanner.mode();
        scanner
            .cursor_mut()
            .observe_length(u64::from(input.file_length), mode);
        scanner.cursor_mut().advance(line.len() as u64 + 1);

        let step = scanner.feed(&line);

        // 식별 정보는 추적 모드에서만 존재
        assert_eq!(
            scanner.identity().is_some(),
            scanner.mode() == ScanMode::TrackingEvents
        );
        if let ScanStep::Emit(_) = step {
            assert_eq!(mode, ScanMode::TrackingEvents);
        }
    }
});
