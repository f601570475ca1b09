//! 파싱된 로그 -- 분할 결과와 조회 함수
//!
//! [`ArenaLog`]는 로그 스냅샷 하나를 한 번의 순방향 패스로 분할/분류한 결과를
//! 보관합니다. 분할 이후에는 불변이며, 모든 조회는 세그먼트 목록을 읽기만 하므로
//! 여러 스레드에서 동시에 호출할 수 있습니다.
//!
//! # 사용 예시
//! ```
//! use gathering_log_pipeline::ArenaLog;
//!
//! let text = "[UnityCrossThreadLogger]1/8/2019 2:07:00 PM\n\
//! <== PlayerInventory.GetPlayerCardsV3(57)\n\
//! {\"66001\": 2, \"67003\": 4}\n";
//! let log = ArenaLog::parse(text);
//! let collection = log.collection().unwrap();
//! assert_eq!(collection[&66001], 2);
//! ```

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use gathering_core::metrics as m;

use crate::classify::{Classifier, SegmentType};
use crate::config::LogConfig;
use crate::correlate::{self, MatchScan};
use crate::error::ArenaLogError;
use crate::records::{
    ArenaDeck, ArenaEvent, ArenaMatch, Booster, Collection, EventCourse, PlayerInventory,
    RankInfo, parse_auth, parse_booster, parse_collection, parse_deck_list, parse_event_course,
    parse_inventory,
};
use crate::segment::{Segment, Segmented, Segmenter};
use crate::upload::UploadData;

/// 분할/분류가 끝난 로그 스냅샷
#[derive(Debug, Clone)]
pub struct ArenaLog {
    segmented: Segmented,
    config: LogConfig,
}

impl ArenaLog {
    /// 기본 설정과 기본 분류기로 로그 텍스트를 분할합니다.
    pub fn parse(text: &str) -> Self {
        Self::parse_with(text, LogConfig::default())
    }

    /// 설정을 지정하여 로그 텍스트를 분할합니다.
    pub fn parse_with(text: &str, config: LogConfig) -> Self {
        Self::with_classifier(text, config, Classifier::builtin())
    }

    /// 분류기를 지정하여 로그 텍스트를 분할합니다.
    pub fn with_classifier(text: &str, config: LogConfig, classifier: &Classifier) -> Self {
        let started = Instant::now();
        let segmented = Segmenter::new(classifier).split(text);

        metrics::counter!(m::LOG_BYTES_INGESTED_TOTAL).increment(text.len() as u64);
        for segment in &segmented.segments {
            metrics::counter!(m::LOG_SEGMENTS_TOTAL, m::LABEL_LOGGER => segment.logger.as_str())
                .increment(1);
            metrics::counter!(
                m::LOG_SEGMENTS_CLASSIFIED_TOTAL,
                m::LABEL_SEGMENT_KIND => segment.kind.as_str()
            )
            .increment(1);
        }
        let elapsed = started.elapsed();
        metrics::histogram!(m::LOG_PARSE_DURATION_SECONDS).record(elapsed.as_secs_f64());

        tracing::debug!(
            bytes = text.len(),
            segments = segmented.segments.len(),
            preamble_bytes = segmented.preamble.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "log segmented"
        );

        Self { segmented, config }
    }

    /// 파일에서 로그를 읽어 분할합니다.
    ///
    /// 파일이 `max_log_bytes`보다 크면 [`ArenaLogError::TooLarge`]를 반환합니다.
    /// UTF-8이 아닌 바이트는 대체 문자로 바꿉니다.
    pub fn read(path: impl AsRef<Path>, config: LogConfig) -> Result<Self, ArenaLogError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let size = file.metadata()?.len();
        if size > config.max_log_bytes {
            return Err(ArenaLogError::TooLarge {
                size,
                max: config.max_log_bytes,
            });
        }

        let mut bytes = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
        // 읽는 도중 파일이 커져도 한도까지만 읽음
        file.take(config.max_log_bytes).read_to_end(&mut bytes)?;
        let text = String::from_utf8_lossy(&bytes);

        tracing::info!(path = %path.display(), bytes = bytes.len(), "reading client log");
        Ok(Self::parse_with(&text, config))
    }

    /// 첫 마커 이전의 텍스트
    pub fn preamble(&self) -> &str {
        &self.segmented.preamble
    }

    /// 로그 순서대로 정렬된 세그먼트
    pub fn segments(&self) -> &[Segment] {
        &self.segmented.segments
    }

    /// 적용 중인 설정
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// 원문을 복원합니다 (프리앰블 + 모든 세그먼트).
    pub fn reassemble(&self) -> String {
        self.segmented.reassemble()
    }

    /// 분류별 세그먼트 수
    pub fn kind_counts(&self) -> BTreeMap<SegmentType, usize> {
        let mut counts = BTreeMap::new();
        for segment in self.segments() {
            *counts.entry(segment.kind).or_insert(0) += 1;
        }
        counts
    }

    // ─── 조회 ─────────────────────────────────────────────────────

    /// 최신 카드 컬렉션
    pub fn collection(&self) -> Option<Collection> {
        correlate::latest(self.segments(), SegmentType::CollectionSnapshot, parse_collection)
    }

    /// 최신 인벤토리
    pub fn inventory(&self) -> Option<PlayerInventory> {
        correlate::latest(self.segments(), SegmentType::InventorySnapshot, parse_inventory)
    }

    /// 최신 덱 목록
    pub fn decks(&self) -> Option<Vec<ArenaDeck>> {
        correlate::latest(self.segments(), SegmentType::DeckList, parse_deck_list)
    }

    /// 마지막으로 개봉한 부스터
    pub fn latest_booster(&self) -> Option<Booster> {
        correlate::latest(self.segments(), SegmentType::BoosterCrack, parse_booster)
    }

    /// 개봉한 모든 부스터 (로그 순서)
    pub fn boosters(&self) -> Vec<Booster> {
        correlate::all(self.segments(), SegmentType::BoosterCrack, parse_booster)
    }

    /// 스냅샷과 변경분을 반영한 최신 랭크
    pub fn rank(&self) -> Option<RankInfo> {
        correlate::replay_rank(self.segments())
    }

    /// 플레이어 화면 이름 (처음 나온 인증 세그먼트)
    pub fn auth(&self) -> Option<String> {
        correlate::first(self.segments(), SegmentType::Auth, parse_auth)
    }

    /// 재구성된 매치
    pub fn matches(&self) -> Vec<ArenaMatch> {
        self.match_scan().matches
    }

    /// 매치 재구성 결과 (불일치, 버려진 매치 포함)
    pub fn match_scan(&self) -> MatchScan {
        correlate::scan_matches(self.segments(), self.config.course_lookback)
    }

    /// 보상을 수령한 이벤트
    pub fn events(&self) -> Vec<ArenaEvent> {
        correlate::collect_events(self.segments(), self.config.prize_window)
    }

    /// 모든 이벤트 코스 레코드 (참가, 참가비, 코스 조회, 덱 제출; 로그 순서)
    pub fn event_courses(&self) -> Vec<EventCourse> {
        self.segments()
            .iter()
            .filter(|s| {
                matches!(
                    s.kind,
                    SegmentType::EventJoin
                        | SegmentType::EventPayEntry
                        | SegmentType::EventGetCourse
                        | SegmentType::EventDeckSubmit
                )
            })
            .filter_map(|s| {
                parse_event_course(s)
                    .inspect_err(|e| correlate::log_malformed(s, e))
                    .ok()
            })
            .collect()
    }

    /// 모든 조회를 실행해 업로드 집계를 만듭니다.
    ///
    /// `is_playing`은 게임 프로세스 실행 여부이며 외부에서 전달합니다.
    pub fn snapshot(&self, is_playing: bool) -> UploadData {
        let data = UploadData::build(self, is_playing);
        for missing in data.missing() {
            tracing::info!(aggregate = missing, "aggregate not found in log");
        }
        data
    }
}
