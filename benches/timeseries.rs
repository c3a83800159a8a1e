//! 按日聚合与设备识别性能基准测试

use chrono::{Duration, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use biolink::analytics::{
    AnalyticsEvent, DeviceClass, EventType, browser_os_label, classify_device, last_seven_days,
};

fn synthetic_events(count: usize) -> Vec<AnalyticsEvent> {
    let start = Utc.with_ymd_and_hms(2024, 5, 20, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| AnalyticsEvent {
            id: i.to_string(),
            invite_id: "inv".to_string(),
            // 约 3 周内均匀分布，部分落在窗口外
            timestamp: start + Duration::minutes((i as i64 * 37) % (21 * 24 * 60)),
            event_type: if i % 4 == 0 {
                EventType::Click
            } else {
                EventType::View
            },
            location: String::new(),
            device: DeviceClass::Desktop,
            referral: String::new(),
        })
        .collect()
}

fn bench_last_seven_days(c: &mut Criterion) {
    let mut group = c.benchmark_group("timeseries/last_seven_days");
    let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();

    for size in [100usize, 10_000, 100_000] {
        let events = synthetic_events(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &events, |b, events| {
            b.iter(|| last_seven_days(black_box(&now), black_box(events)));
        });
    }

    group.finish();
}

fn bench_classifier(c: &mut Criterion) {
    let mut group = c.benchmark_group("classifier");
    let agents = [
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148 Safari/604.1",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0 Safari/537.36",
        "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X) AppleWebKit/605.1.15 Safari/604.1",
    ];

    group.bench_function("classify_device", |b| {
        b.iter(|| {
            for ua in &agents {
                black_box(classify_device(Some(black_box(ua))));
            }
        });
    });

    group.bench_function("browser_os_label", |b| {
        b.iter(|| {
            for ua in &agents {
                black_box(browser_os_label(Some(black_box(ua))));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_last_seven_days, bench_classifier);
criterion_main!(benches);
