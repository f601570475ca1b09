#![no_main]

use libfuzzer_sys::fuzz_target;
use gathering_log_pipeline::classify::Classifier;
use gathering_log_pipeline::segment::{LoggerKind, Segmenter};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let segmented = Segmenter::new(Classifier::builtin()).split(&text);

    // 분할은 무손실이어야 함
    assert_eq!(segmented.reassemble(), text);
    for pair in segmented.segments.windows(2) {
        assert_eq!(pair[0].line_range.end, pair[1].line_range.start);
    }
    for segment in &segmented.segments {
        assert!(LoggerKind::detect(&segment.marker_line).is_some());
    }
});
