#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::LazyLock;

use killfeed_tracker::pattern::PatternSet;

static PATTERNS: LazyLock<PatternSet> =
    LazyLock::new(|| PatternSet::new().expect("grammars must compile"));

fuzz_target!(|data: &[u8]| {
    let line = String::from_utf8_lossy(data);
    // 일치 여부와 관계없이 패닉이 없어야 함
    let _ = PATTERNS.match_line(&line);
});
