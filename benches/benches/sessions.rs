// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use punchclock_axis::TickPolicy;
use punchclock_sessions::query::{is_in_range_end_inclusive, open_start_before};
use punchclock_sessions::{PairTable, PointEvent, pair};

struct Punch {
    kind: &'static str,
    time: u32,
}

impl PointEvent for Punch {
    type Time = u32;

    fn kind(&self) -> &str {
        self.kind
    }

    fn time(&self) -> u32 {
        self.time
    }
}

/// Alternating punches every seven minutes, shuffled by a fixed stride so
/// pairing has to sort.
fn punches(len: u32) -> Vec<Punch> {
    (0..len)
        .map(|i| {
            let slot = (i * 7_919) % len;
            Punch {
                kind: if slot % 2 == 0 { "in" } else { "out" },
                time: slot * 420,
            }
        })
        .collect()
}

fn bench_pair(c: &mut Criterion) {
    let mut group = c.benchmark_group("sessions/pair");
    let table = PairTable::new([("start", "stop"), ("in", "out")]);

    for len in [16_u32, 128, 1_024] {
        let events = punches(len);
        group.throughput(Throughput::Elements(u64::from(len)));
        group.bench_with_input(BenchmarkId::from_parameter(len), &events, |b, events| {
            b.iter(|| black_box(pair(black_box(events), &table)));
        });
    }

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("sessions/query");
    let table = PairTable::default();
    let events = punches(1_024);
    let pairs = pair(&events, &table);
    let probe = 512 * 420 + 60;

    group.bench_function("in_range", |b| {
        b.iter(|| black_box(is_in_range_end_inclusive(&pairs, black_box(probe))));
    });
    group.bench_function("open_start_before", |b| {
        b.iter(|| black_box(open_start_before(&events, black_box(probe), &table)));
    });

    group.finish();
}

fn bench_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("axis/ticks");
    let policy = TickPolicy::default();

    // From a whole day in 750 px down to a five minute window.
    for spp in [0.4_f64, 4.0, 24.0, 115.2] {
        let span = spp * 750.0;
        group.bench_with_input(BenchmarkId::from_parameter(spp), &spp, |b, &spp| {
            b.iter(|| {
                let ladder = policy.ladder(black_box(spp));
                black_box(ladder.ticks(28_800.0, 28_800.0 + span).count())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pair, bench_queries, bench_ticks);
criterion_main!(benches);
