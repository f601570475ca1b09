//! 세그먼트 분할 -- 마커 라인 기준으로 원시 로그를 나눕니다.
//!
//! 로그는 `[UnityCrossThreadLogger]`(primary) 또는 `[Client GRE]`(secondary)로
//! 시작하는 마커 라인과, 다음 마커 전까지 이어지는 본문으로 구성됩니다.
//!
//! 분할은 무손실입니다. 첫 마커 이전의 텍스트(프리앰블)는 세그먼트 목록에서
//! 빠지지만 [`Segmented::preamble`]에 보존되므로
//! `preamble + Σ(marker_line + body) == input`이 항상 성립합니다.
//!
//! # 사용 예시
//! ```
//! use gathering_log_pipeline::classify::Classifier;
//! use gathering_log_pipeline::segment::{LoggerKind, Segmenter};
//!
//! let text = "[UnityCrossThreadLogger]1/8/2019 2:07:00 PM\n<== Deck.GetDeckLists(9)\n[]\n";
//! let segmented = Segmenter::new(Classifier::builtin()).split(text);
//! assert_eq!(segmented.segments.len(), 1);
//! assert_eq!(segmented.segments[0].logger, LoggerKind::Primary);
//! ```

use std::ops::Range;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde::Serialize;

use crate::classify::{Classifier, SegmentType};

/// Primary 로거 마커
pub const PRIMARY_MARKER: &str = "[UnityCrossThreadLogger]";

/// Secondary 로거 마커
pub const SECONDARY_MARKER: &str = "[Client GRE]";

/// 마커 라인에서 찾는 타임스탬프 형식 (12시간제 / ISO 유사 24시간제)
static TIMESTAMP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d{1,2}/\d{1,2}/\d{4}\s+\d{1,2}:\d{2}:\d{2}\s*[AaPp][Mm])|(\d{4}-\d{2}-\d{2}[ T]\d{2}:\d{2}:\d{2})",
    )
    .expect("timestamp pattern is a valid regex")
});

/// 세그먼트를 만든 로거 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoggerKind {
    /// `[UnityCrossThreadLogger]`
    Primary,
    /// `[Client GRE]`
    Secondary,
}

impl LoggerKind {
    /// 라인이 마커 라인이면 로거 종류를 반환합니다.
    pub fn detect(line: &str) -> Option<Self> {
        if line.starts_with(PRIMARY_MARKER) {
            Some(Self::Primary)
        } else if line.starts_with(SECONDARY_MARKER) {
            Some(Self::Secondary)
        } else {
            None
        }
    }

    /// 로거 이름 (메트릭 레이블용)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

/// 분할된 로그 세그먼트
///
/// 분할 단계가 끝나면 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    /// 로거 종류
    pub logger: LoggerKind,
    /// 마커 라인의 타임스탬프 (없으면 `None`)
    pub timestamp: Option<DateTime<Utc>>,
    /// 마커 라인 원문 (줄바꿈 포함)
    pub marker_line: String,
    /// 다음 마커 전까지의 본문 (줄바꿈 포함)
    pub body: String,
    /// 본문 분류
    pub kind: SegmentType,
    /// 마커 라인 번호부터 본문 끝(배타)까지의 라인 범위 (0부터 시작)
    pub line_range: Range<usize>,
}

impl Segment {
    /// 마커 라인 번호 (0부터 시작)
    pub fn line(&self) -> usize {
        self.line_range.start
    }

    /// 이 세그먼트가 차지하는 바이트 수
    pub fn len(&self) -> usize {
        self.marker_line.len() + self.body.len()
    }

    /// 마커 라인과 본문이 모두 비어 있는지
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 분할 결과
#[derive(Debug, Clone, Default)]
pub struct Segmented {
    /// 첫 마커 이전의 텍스트
    pub preamble: String,
    /// 로그 순서대로 정렬된 세그먼트
    pub segments: Vec<Segment>,
}

impl Segmented {
    /// 프리앰블과 모든 세그먼트를 순서대로 이어 붙여 원문을 복원합니다.
    pub fn reassemble(&self) -> String {
        let capacity = self.preamble.len() + self.segments.iter().map(Segment::len).sum::<usize>();
        let mut out = String::with_capacity(capacity);
        out.push_str(&self.preamble);
        for segment in &self.segments {
            out.push_str(&segment.marker_line);
            out.push_str(&segment.body);
        }
        out
    }
}

/// 진행 중인 세그먼트 (본문 누적 중)
struct OpenSegment {
    logger: LoggerKind,
    timestamp: Option<DateTime<Utc>>,
    marker_line: String,
    body: String,
    start_line: usize,
}

/// 세그먼트 분할기
///
/// 한 번의 순방향 패스로 라인을 읽어 세그먼트를 만들고, 각 세그먼트를 닫을 때
/// 분류기로 본문을 분류합니다.
pub struct Segmenter<'c> {
    classifier: &'c Classifier,
}

impl<'c> Segmenter<'c> {
    /// 분류기를 지정하여 분할기를 생성합니다.
    pub fn new(classifier: &'c Classifier) -> Self {
        Self { classifier }
    }

    /// 로그 텍스트 전체를 세그먼트로 분할합니다.
    ///
    /// 라인은 `\n` 기준으로 나누며 `\r`은 라인의 일부로 남습니다.
    pub fn split(&self, text: &str) -> Segmented {
        let mut result = Segmented::default();
        let mut open: Option<OpenSegment> = None;
        let mut line_no = 0usize;

        for line in text.split_inclusive('\n') {
            if let Some(logger) = LoggerKind::detect(line) {
                if let Some(prev) = open.take() {
                    result.segments.push(self.close(prev, line_no));
                }
                open = Some(OpenSegment {
                    logger,
                    timestamp: parse_timestamp(line),
                    marker_line: line.to_owned(),
                    body: String::new(),
                    start_line: line_no,
                });
            } else {
                match open.as_mut() {
                    Some(current) => current.body.push_str(line),
                    None => result.preamble.push_str(line),
                }
            }
            line_no += 1;
        }

        if let Some(prev) = open.take() {
            result.segments.push(self.close(prev, line_no));
        }

        result
    }

    fn close(&self, open: OpenSegment, end_line: usize) -> Segment {
        let kind = self.classifier.classify(&open.body);
        Segment {
            logger: open.logger,
            timestamp: open.timestamp,
            marker_line: open.marker_line,
            body: open.body,
            kind,
            line_range: open.start_line..end_line,
        }
    }
}

/// 마커 라인에서 타임스탬프를 찾아 파싱합니다.
///
/// 시간대 정보가 없으므로 UTC로 해석합니다. 찾지 못하거나 파싱에 실패하면
/// `None`을 반환합니다 (에러가 아님).
pub fn parse_timestamp(line: &str) -> Option<DateTime<Utc>> {
    let caps = TIMESTAMP_PATTERN.captures(line)?;
    let naive = if let Some(m) = caps.get(1) {
        NaiveDateTime::parse_from_str(m.as_str(), "%m/%d/%Y %I:%M:%S %p").ok()?
    } else {
        let raw = caps.get(2)?.as_str().replacen('T', " ", 1);
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S").ok()?
    };
    Some(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}
