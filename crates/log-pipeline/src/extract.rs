//! JSON 추출 -- 노이즈가 섞인 세그먼트 본문에서 디코딩 가능한 JSON을 복원합니다.
//!
//! 추출 단계:
//! 1. 알려진 노이즈 패턴 제거 (잘림 표시, 로거 태그 라인, 16진수 덤프, 진단 메시지)
//! 2. 첫 `{`/`[` 이전 제거
//! 3. 마지막 `}`/`]` 이후 제거
//!
//! 결과는 검증되지 않은 후보입니다. [`decode_with_backoff`]는 디코딩 실패 시
//! 후보의 마지막 라인을 하나씩 버리며 재시도합니다.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::error::ArenaLogError;
use crate::segment::Segment;

/// 노이즈 패턴 (순서대로 적용, 일치 부분은 빈 문자열로 치환)
static NOISE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // 잘림 표시부터 라인 끝까지
        r"<<<<<<<<<<[^\n]*",
        // 라인 맨 앞의 로거 태그 라인 (`[Message summarized ...]` 등)
        r"(?m)^\[[A-Za-z][^\]\n]*\][^\n]*",
        // 16진수 덤프부터 라인 끝까지
        r"\b\dx[0-9A-Fa-f]{2,}[^\n]*",
        r"ZoneTransferUXEvent[^\n]*",
        // 이후 전체
        r"(?s)BIError - GRE\.Notification:.*",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("noise patterns are valid regexes"))
    .collect()
});

/// 알려진 노이즈 패턴을 제거합니다.
pub fn strip_noise(text: &str) -> Cow<'_, str> {
    let mut current = Cow::Borrowed(text);
    for pattern in NOISE_PATTERNS.iter() {
        if pattern.is_match(&current) {
            current = Cow::Owned(pattern.replace_all(&current, "").into_owned());
        }
    }
    current
}

/// 첫 `{`/`[`부터 마지막 `}`/`]`까지를 잘라냅니다. 구간이 없으면 `None`.
pub fn trim_to_json(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let end = text.rfind(['}', ']'])?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// 노이즈 제거 후 JSON 후보 구간을 반환합니다.
pub fn strip_to_json(text: &str) -> Option<String> {
    let cleaned = strip_noise(text);
    trim_to_json(&cleaned).map(str::to_owned)
}

/// 후보의 마지막 라인을 제거하고 다시 오른쪽을 정리합니다.
fn drop_last_line(candidate: &str) -> Option<&str> {
    let cut = candidate.trim_end_matches(['\r', '\n']).rfind('\n')?;
    let shorter = &candidate[..cut];
    let end = shorter.rfind(['}', ']'])?;
    let start = shorter.find(['{', '['])?;
    if end < start {
        return None;
    }
    Some(&shorter[..=end])
}

/// 백오프 재시도 기본 한도 (버릴 수 있는 최대 라인 수)
pub const DEFAULT_BACKOFF_LIMIT: usize = 256;

/// 텍스트에서 JSON을 추출하여 `T`로 디코딩합니다.
///
/// 디코딩에 실패하면 마지막 라인을 버리고 재시도하며, 성공하거나 남은 라인이
/// 없을 때까지 [`DEFAULT_BACKOFF_LIMIT`]번까지 반복합니다. `kind`와 `line`은
/// 에러 보고용입니다.
pub fn decode_with_backoff<T: DeserializeOwned>(
    text: &str,
    kind: &str,
    line: usize,
) -> Result<T, ArenaLogError> {
    decode_with_limit(text, kind, line, DEFAULT_BACKOFF_LIMIT)
}

/// 재시도 한도를 지정하여 디코딩합니다.
///
/// 입력 끝에서 실패(`Eof`)하면 즉시 중단합니다. 오프셋 0에서 열린 값이 후보
/// 전체 안에서 닫히지 않았다면 더 짧은 접두사에서도 닫힐 수 없습니다.
pub fn decode_with_limit<T: DeserializeOwned>(
    text: &str,
    kind: &str,
    line: usize,
    max_attempts: usize,
) -> Result<T, ArenaLogError> {
    let Some(full) = strip_to_json(text) else {
        return Err(ArenaLogError::NoJson {
            kind: kind.to_owned(),
            line,
        });
    };

    let malformed = |e: serde_json::Error| ArenaLogError::MalformedPayload {
        kind: kind.to_owned(),
        line,
        reason: e.to_string(),
    };

    let mut candidate = full.as_str();
    let mut attempts = 0;
    loop {
        let err = match serde_json::from_str::<T>(candidate) {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        if err.classify() == Category::Eof || attempts >= max_attempts {
            if attempts > 0 {
                tracing::trace!(kind, line, attempts, "backoff gave up");
            }
            return Err(malformed(err));
        }
        match drop_last_line(candidate) {
            Some(shorter) => candidate = shorter,
            None => return Err(malformed(err)),
        }
        attempts += 1;
    }
}

/// 세그먼트 본문을 디코딩합니다.
pub fn decode_segment<T: DeserializeOwned>(segment: &Segment) -> Result<T, ArenaLogError> {
    decode_with_backoff(&segment.body, segment.kind.as_str(), segment.line())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn trims_prefix_and_suffix() {
        let text = "<== PlayerInventory.GetPlayerCardsV3(57)\n{\"1\":2}\ntrailing words";
        assert_eq!(strip_to_json(text).as_deref(), Some("{\"1\":2}"));
    }

    #[test]
    fn empty_array_with_text_around() {
        let text = "<== Deck.GetDeckLists(9) [] RandomOtherText";
        assert_eq!(strip_to_json(text).as_deref(), Some("[]"));
    }

    #[test]
    fn no_brackets_yields_none() {
        assert_eq!(strip_to_json(""), None);
        assert_eq!(strip_to_json("just text"), None);
        assert_eq!(strip_to_json("} backwards {"), None);
    }

    #[test]
    fn removes_truncation_marker() {
        let text = "{\"a\":1}\n<<<<<<<<<< 2048 bytes truncated {\"b\"";
        assert_eq!(strip_to_json(text).as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn removes_logger_tag_lines() {
        let text = "{\"a\":[1,\n[Message summarized because one or more GameStateMessages exceeded the 50 GameObject or 50 Annotation limit.]\n2]}";
        let value: serde_json::Value = decode_with_backoff(text, "test", 0).unwrap();
        assert_eq!(value["a"], serde_json::json!([1, 2]));
    }

    #[test]
    fn keeps_numeric_arrays_on_one_line() {
        let text = "{\"mainDeck\":\n[67015,12]}";
        let value: serde_json::Value = decode_with_backoff(text, "test", 0).unwrap();
        assert_eq!(value["mainDeck"], serde_json::json!([67015, 12]));
    }

    #[test]
    fn removes_diagnostic_noise() {
        let text = "{\"a\":1}\nZoneTransferUXEvent [X] moved {weird}\nBIError - GRE.Notification: {\"nope\":}\n";
        assert_eq!(strip_to_json(text).as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn removes_hex_dump_tail() {
        let text = "{\"a\":1}\n0x7F3A2B10 (Mono JIT Code) {frame}\n";
        assert_eq!(strip_to_json(text).as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn backoff_drops_trailing_lines() {
        let text = "<== Event.GetPlayerCourse(63)\n{\n  \"Id\": \"x\"\n}\n{\"partial\": [1, 2]";
        // 닫히지 않은 마지막 라인을 버리고 앞의 객체로 복원
        let value: serde_json::Value = decode_with_backoff(text, "event-get-course", 3).unwrap();
        assert_eq!(value["Id"], "x");
    }

    #[test]
    fn backoff_handles_trailing_object() {
        let text = "{\"a\":1}\n{\"b\":2}";
        let value: BTreeMap<String, u32> = decode_with_backoff(text, "test", 0).unwrap();
        assert_eq!(value.get("a"), Some(&1));
        assert_eq!(value.len(), 1);
    }

    #[test]
    fn backoff_exhaustion_is_malformed() {
        let text = "{\"a\":\n1,\n}";
        let err = decode_with_backoff::<serde_json::Value>(text, "rank-delta", 12).unwrap_err();
        match err {
            ArenaLogError::MalformedPayload { kind, line, .. } => {
                assert_eq!(kind, "rank-delta");
                assert_eq!(line, 12);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn truncated_payload_fails_without_walking_back() {
        // 닫히지 않은 대형 GRE 메시지 (잘림 표시가 꼬리를 잘라낸 형태)
        let mut text = String::from("{\"greToClientEvent\": {\"greToClientMessages\": [\n");
        for i in 0..20_000 {
            text.push_str(&format!("  {{\"instanceId\": {i}, \"grpId\": 66001}},\n"));
        }
        text.push_str("<<<<<<<<<< 1048576 bytes truncated\n");

        let started = std::time::Instant::now();
        let err = decode_with_backoff::<serde_json::Value>(&text, "match-event", 40).unwrap_err();
        assert!(matches!(err, ArenaLogError::MalformedPayload { line: 40, .. }));
        assert!(
            started.elapsed() < std::time::Duration::from_secs(5),
            "took {:?}",
            started.elapsed()
        );
    }

    #[test]
    fn backoff_stops_at_attempt_limit() {
        // 유효한 객체 뒤에 닫힌 쓰레기 라인 3개
        let text = "{\"a\":1}\n} x\n} y\n} z";
        let err = decode_with_limit::<serde_json::Value>(text, "test", 0, 2).unwrap_err();
        assert!(matches!(err, ArenaLogError::MalformedPayload { .. }));

        let value: serde_json::Value = decode_with_limit(text, "test", 0, 3).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn missing_json_is_no_json() {
        let err = decode_with_backoff::<serde_json::Value>("<== Rank", "rank-snapshot", 1).unwrap_err();
        assert!(matches!(err, ArenaLogError::NoJson { .. }));
    }

    #[test]
    fn clean_text_is_borrowed() {
        assert!(matches!(strip_noise("{\"a\":1}"), Cow::Borrowed(_)));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn extracts_object_from_noisy_wrapper(
                prefix in "[a-zA-Z0-9 .:()<=]{0,40}",
                suffix in "[a-zA-Z0-9 .:]{0,40}",
                entries in prop::collection::btree_map("[a-z]{1,8}", 0u32..10_000, 0..8),
            ) {
                let payload = serde_json::to_string(&entries).unwrap();
                let text = format!("{prefix}\n{payload}\n{suffix}");
                let decoded: BTreeMap<String, u32> =
                    decode_with_backoff(&text, "test", 0).unwrap();
                prop_assert_eq!(decoded, entries);
            }

            #[test]
            fn arbitrary_text_never_panics(text in "\\PC{0,300}") {
                let _ = decode_with_backoff::<serde_json::Value>(&text, "test", 0);
            }
        }
    }
}
