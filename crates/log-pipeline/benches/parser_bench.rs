//! 로그 재구성 벤치마크
//!
//! 세그먼트 분할, 분류, JSON 추출, 전체 조회의 처리량을 측정합니다.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use gathering_log_pipeline::classify::Classifier;
use gathering_log_pipeline::extract::decode_with_backoff;
use gathering_log_pipeline::segment::Segmenter;
use gathering_log_pipeline::ArenaLog;

/// 통합 테스트와 같은 실제 형태의 로그
const FIXTURE: &str = include_str!("../tests/fixtures/output_log.txt");

/// 노이즈가 섞인 코스 세그먼트 본문
const NOISY_COURSE: &str = "<== Event.GetPlayerCourse(63)\n\
{\n  \"Id\": \"x\",\n  \"CourseDeck\": {\"id\": \"d\", \"mainDeck\": [66001, 4, 67003, 20]}\n}\n\
[Message summarized because one or more GameStateMessages exceeded the 50 GameObject limit.]\n\
new prize bar state is: {PrizeDisplay}\n";

/// 픽스처를 `copies`번 이어 붙인 로그
fn repeated_log(copies: usize) -> String {
    FIXTURE.repeat(copies)
}

fn bench_segmenter(c: &mut Criterion) {
    let classifier = Classifier::builtin();
    let mut group = c.benchmark_group("segmenter");

    for copies in [1usize, 10, 100] {
        let text = repeated_log(copies);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(copies), &text, |b, text| {
            b.iter(|| Segmenter::new(classifier).split(black_box(text)))
        });
    }

    group.finish();
}

fn bench_classifier(c: &mut Criterion) {
    let classifier = Classifier::builtin();
    let log = ArenaLog::parse(FIXTURE);
    let bodies: Vec<&str> = log.segments().iter().map(|s| s.body.as_str()).collect();

    let mut group = c.benchmark_group("classifier");
    group.throughput(Throughput::Elements(bodies.len() as u64));
    group.bench_function("fixture_bodies", |b| {
        b.iter(|| {
            for body in &bodies {
                black_box(classifier.classify(black_box(body)));
            }
        })
    });
    group.finish();
}

fn bench_extractor(c: &mut Criterion) {
    let mut group = c.benchmark_group("extractor");
    group.throughput(Throughput::Elements(1));
    group.bench_function("noisy_course_with_backoff", |b| {
        b.iter(|| {
            decode_with_backoff::<serde_json::Value>(black_box(NOISY_COURSE), "bench", 0).unwrap()
        })
    });
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");

    for copies in [1usize, 10] {
        let text = repeated_log(copies);
        let log = ArenaLog::parse(&text);
        group.bench_with_input(BenchmarkId::new("matches", copies), &log, |b, log| {
            b.iter(|| log.match_scan())
        });
        group.bench_with_input(BenchmarkId::new("snapshot", copies), &log, |b, log| {
            b.iter(|| log.snapshot(false))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_segmenter,
    bench_classifier,
    bench_extractor,
    bench_queries
);
criterion_main!(benches);
