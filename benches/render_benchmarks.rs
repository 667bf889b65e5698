use chrono::{Local, TimeZone};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lpdash::{
    config::Config,
    metrics::data::{DashboardSnapshot, PrinterState, PrinterStatus, QueueJob, SchedulerStatus},
    render,
    sink::pack_rgb565_le,
};

fn sample_snapshot() -> DashboardSnapshot {
    DashboardSnapshot {
        queue_jobs: (1..=8)
            .map(|n| QueueJob {
                id: format!("Alpha-{}", n),
                printer: "Alpha".to_string(),
                owner: "alice".to_string(),
                title: format!("document-{}.pdf", n),
                size_bytes: 1024 * n,
            })
            .collect(),
        printer: PrinterStatus {
            name: Some("Alpha".to_string()),
            state: PrinterState::Printing,
            detail: "enabled since Tue 06 Aug 2024".to_string(),
        },
        scheduler: SchedulerStatus::Running,
        network_ip: Some("192.168.1.10".to_string()),
        cpu_load: 42.0,
        temperature_c: Some(51.3),
        collected_at: Local.with_ymd_and_hms(2024, 8, 6, 10, 15, 0).unwrap(),
    }
}

/// Benchmark full frame rendering at common panel sizes
fn bench_render(c: &mut Criterion) {
    let snapshot = sample_snapshot();

    for (width, height) in [(320u32, 240u32), (480, 320), (800, 480)] {
        let config = Config {
            width,
            height,
            ..Default::default()
        };
        c.bench_with_input(
            BenchmarkId::new("render_frame", format!("{}x{}", width, height)),
            &config,
            |b, config| b.iter(|| render(&snapshot, config)),
        );
    }
}

/// Benchmark RGB565 packing of a rendered frame
fn bench_rgb565_pack(c: &mut Criterion) {
    let snapshot = sample_snapshot();
    let config = Config::default();
    let frame = render(&snapshot, &config);

    c.bench_function("pack_rgb565", |b| b.iter(|| pack_rgb565_le(frame.data())));
}

/// Benchmark JSON serialization of snapshots (the --snapshot path)
fn bench_snapshot_serialization(c: &mut Criterion) {
    let snapshot = sample_snapshot();

    c.bench_function("snapshot_json_serialization", |b| {
        b.iter(|| serde_json::to_string(&snapshot).expect("Should serialize"))
    });
}

criterion_group!(
    benches,
    bench_render,
    bench_rgb565_pack,
    bench_snapshot_serialization
);
criterion_main!(benches);
