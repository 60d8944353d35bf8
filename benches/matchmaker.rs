//! Benchmarks for the Secret Santa shuffle
//!
//! Performance requirement: a sparse party of 100 resolves well under the
//! default 10s budget.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use santa_shuffle::identity::{ParticipantId, PartyId};
use santa_shuffle::matchmaker::{ExclusionReport, ShuffleConfig, ShuffleEngine};
use santa_shuffle::party::{Participant, Party};
use std::time::Duration;

fn member(i: usize) -> ParticipantId {
    ParticipantId::from(format!("p{}", i))
}

/// Party where each member excludes the next `per_member` members
fn create_party(size: usize, per_member: usize) -> Party {
    let mut party = Party::new(PartyId::random());
    for i in 0..size {
        party
            .add_participant(Participant::new(member(i), format!("Member {}", i)))
            .unwrap();
    }

    for i in 0..size {
        for offset in 1..=per_member.min(size.saturating_sub(2)) {
            party.exclude(&member(i), &member((i + offset) % size)).unwrap();
        }
    }

    party
}

fn uncached_engine() -> ShuffleEngine {
    ShuffleEngine::new(ShuffleConfig {
        time_budget: Duration::from_secs(10),
        memoize: false,
    })
}

fn benchmark_shuffle_office_party(c: &mut Criterion) {
    let party = create_party(12, 1);
    let engine = uncached_engine();
    let mut rng = StdRng::seed_from_u64(7);

    c.bench_function("shuffle_office_12", |b| {
        b.iter(|| engine.shuffle_with_rng(black_box(&party), &mut rng));
    });
}

fn benchmark_shuffle_memoized(c: &mut Criterion) {
    let party = create_party(50, 2);
    let engine = ShuffleEngine::default();
    let _ = engine.shuffle(&party);

    c.bench_function("shuffle_memoized_hit_50", |b| {
        b.iter(|| engine.shuffle(black_box(&party)));
    });
}

fn benchmark_exclusion_report(c: &mut Criterion) {
    let party = create_party(100, 3);

    c.bench_function("exclusion_report_100", |b| {
        b.iter(|| ExclusionReport::analyze(black_box(&party)));
    });
}

fn benchmark_shuffle_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("shuffle_scaling");
    let engine = uncached_engine();

    for size in [10, 25, 50, 100].iter() {
        let party = create_party(*size, 2);
        let mut rng = StdRng::seed_from_u64(*size as u64);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| engine.shuffle_with_rng(black_box(&party), &mut rng));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_shuffle_office_party,
    benchmark_shuffle_memoized,
    benchmark_exclusion_report,
    benchmark_shuffle_scaling
);
criterion_main!(benches);
