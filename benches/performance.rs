//! Performance benchmarks for the reducer store.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use reducer_store::{
    shallow_diff, with_logger, Identifiable, ImmutableIndexedList, NoopLogger, Reduction,
    RootState, ShallowDiff, StateKey, Store,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone, Debug, Serialize)]
struct Player {
    id: String,
    name: String,
    rating: i64,
    online: bool,
}

impl Identifiable for Player {
    fn id(&self) -> &str {
        &self.id
    }
}

impl ShallowDiff for Player {}

fn players(n: usize) -> ImmutableIndexedList<Player> {
    let items = (0..n)
        .map(|i| Player {
            id: format!("p{}", i),
            name: format!("player {}", i),
            rating: 1500,
            online: false,
        })
        .collect();
    ImmutableIndexedList::new(items).unwrap()
}

#[derive(Clone, Debug)]
enum Action {
    Bump,
}

/// Benchmark dispatch cost against the number of sub-states
fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    for sub_states in [1usize, 8, 32] {
        group.bench_with_input(
            BenchmarkId::new("sub_states", sub_states),
            &sub_states,
            |b, &count| {
                let keys: Vec<StateKey<u64>> = (0..count)
                    .map(|i| StateKey::new(Box::leak(format!("s{}", i).into_boxed_str())))
                    .collect();

                let mut builder = RootState::builder();
                for key in &keys {
                    builder = builder.with(*key, 0u64).unwrap();
                }
                let store = Store::with_options(
                    builder.build(),
                    [with_logger::<Action>(Arc::new(NoopLogger))],
                );
                for key in &keys {
                    store
                        .register_reducer(*key, |v: &u64, _: &Action| Reduction::Changed(v + 1))
                        .unwrap();
                }

                b.iter(|| store.dispatch(black_box(Action::Bump)));
            },
        );
    }

    group.finish();
}

/// Benchmark copy-on-write list operations with varying list sizes
fn bench_list_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexed_list");

    for size in [100usize, 1_000, 10_000] {
        let list = players(size);
        let middle = format!("p{}", size / 2);

        group.bench_with_input(BenchmarkId::new("update", size), &size, |b, _| {
            b.iter(|| {
                black_box(
                    list.update(&middle, |p| Player {
                        rating: p.rating + 1,
                        ..p.clone()
                    })
                    .unwrap(),
                )
            });
        });

        group.bench_with_input(BenchmarkId::new("delete", size), &size, |b, _| {
            b.iter(|| black_box(list.delete(&middle).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("get_by_id", size), &size, |b, _| {
            b.iter(|| black_box(list.get_by_id(&middle)));
        });
    }

    group.finish();
}

fn bench_shallow_diff(c: &mut Criterion) {
    let old = Player {
        id: "p1".to_string(),
        name: "alice".to_string(),
        rating: 1500,
        online: false,
    };
    let new = Player {
        rating: 1520,
        ..old.clone()
    };

    c.bench_function("shallow_diff", |b| {
        b.iter(|| black_box(shallow_diff(&old, &new).unwrap()));
    });
}

criterion_group!(benches, bench_dispatch, bench_list_ops, bench_shallow_diff);
criterion_main!(benches);
