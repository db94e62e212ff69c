use std::hint::black_box;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use makerpnp_signals::{Dependent, DependencyManager, LocalDependencyManager, SignalManager, Source};

struct Position(AtomicUsize);

impl Source for Position {
    type Value = usize;

    fn current_value(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }
}

fn dependents(count: usize) -> Vec<Arc<dyn Dependent<Position>>> {
    (0..count)
        .map(|_| {
            Arc::new(|position: &Position| {
                black_box(position.current_value());
            }) as Arc<dyn Dependent<Position>>
        })
        .collect()
}

fn signal_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("signal_fanout");

    for count in [1, 16, 256] {
        group.bench_with_input(BenchmarkId::new("local", count), &count, |b, &count| {
            let position = Position(AtomicUsize::new(0));
            let dependencies: LocalDependencyManager<Position> = LocalDependencyManager::new();
            let subscriptions = dependents(count);
            for dependent in &subscriptions {
                dependencies.add_dependent(dependent);
            }
            b.iter(|| dependencies.signal(black_box(&position)));
        });

        group.bench_with_input(BenchmarkId::new("registry", count), &count, |b, &count| {
            let manager = SignalManager::new();
            let position = Arc::new(Position(AtomicUsize::new(0)));
            let subscriptions = dependents(count);
            for dependent in &subscriptions {
                manager.add_dependency(&position, dependent);
            }
            b.iter(|| manager.signal(black_box(&*position)));
        });
    }

    group.finish();
}

criterion_group!(benches, signal_fanout);
criterion_main!(benches);
