#![no_main]

use libfuzzer_sys::fuzz_target;
use gathering_log_pipeline::extract::{decode_with_backoff, strip_to_json};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    if let Some(candidate) = strip_to_json(&text) {
        assert!(candidate.starts_with(['{', '[']));
        assert!(candidate.ends_with(['}', ']']));
    }
    let _ = decode_with_backoff::<serde_json::Value>(&text, "fuzz", 0);
});
