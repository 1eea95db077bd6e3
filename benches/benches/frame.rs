// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Point;
use punchclock::testing::{FakeService, MemoryStore};
use punchclock::{
    ClockTime, EngineConfig, Layer, ScopedStore, Selection, Session, Times, Timeline, TimelineData, TimelineSnapshot,
    Track, TrackId, UiPatch, Viewport,
};
use punchclock_imaging::ApproxTextMetrics;

/// A day of `tracks` employees, each with a morning and an afternoon range.
fn snapshot(tracks: i64) -> TimelineSnapshot {
    let at = |h, m| ClockTime::from_hms(h, m, 0);
    let tracks = (0..tracks)
        .map(|i| {
            let offset = i32::try_from(i % 30).unwrap_or(0);
            Track {
                id: TrackId(i + 1),
                category: "employees".into(),
                name: format!("Employee {}", i + 1),
                sessions: vec![
                    Session::new("in", at(8, offset)),
                    Session::new("out", at(12, offset)),
                    Session::new("in", at(13, offset)),
                    Session::new("out", at(17, offset)),
                ],
                markers: Vec::new(),
            }
        })
        .collect();
    TimelineSnapshot {
        torn: Some(false),
        ui: Some(UiPatch {
            pan_offset_sec: Some(0.0),
            zoom: Some(1.0),
            category: Some("employees".into()),
            playback: Some(false),
            selection: Some(Selection::track(Some(TrackId(1)))),
        }),
        timeline: Some(TimelineData {
            times: Some(Times {
                start: at(6, 0),
                end: at(20, 0),
                current: Some(at(10, 15)),
                business_start: Some(at(9, 0)),
                business_end: Some(at(17, 0)),
                ..Times::default()
            }),
            tracks: Some(tracks),
        }),
    }
}

fn timeline(tracks: i64) -> Timeline<FakeService, MemoryStore> {
    let service = FakeService::new(snapshot(tracks));
    let store = ScopedStore::new(MemoryStore::default(), "bench", "bench").expect("valid scope");
    let mut timeline = Timeline::new(service, store, EngineConfig::default());
    timeline.resize(Viewport {
        width: 1280.0,
        height: 720.0,
        ruler_height: 32.0,
    });
    timeline
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame/render");
    let metrics = ApproxTextMetrics::default();

    for tracks in [10_i64, 100, 1_000] {
        let timeline = timeline(tracks);
        group.throughput(Throughput::Elements(tracks.unsigned_abs()));
        group.bench_with_input(BenchmarkId::from_parameter(tracks), &timeline, |b, timeline| {
            b.iter(|| black_box(timeline.render(&metrics)));
        });
    }

    group.finish();
}

fn bench_hover(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame/hover");
    let mut timeline = timeline(100);
    let mut x = 300.0;

    group.bench_function("pointer_move", |b| {
        b.iter(|| {
            x = if x > 1200.0 { 300.0 } else { x + 7.0 };
            timeline.pointer_move(Layer::Main, black_box(Point::new(x, 47.0)));
            black_box(timeline.cursor())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_render, bench_hover);
criterion_main!(benches);
