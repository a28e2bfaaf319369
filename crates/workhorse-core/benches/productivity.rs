use criterion::{black_box, criterion_group, criterion_main, Criterion};
use workhorse_core::prelude::*;
use workhorse_logic::productivity;
use workhorse_logic::registry::SynergyRegistry;

/// An 8x4 block of Basic workspaces, every one occupied.
fn populated_engine(rule_set: RuleSet) -> SimulationEngine {
    let mut engine = SimulationEngine::new();
    engine.set_rule_set(rule_set);
    for i in 0..32 {
        let ws = engine.spawn_workspace(
            GridCell::new(i % 8, 1 + i / 8),
            GridSize::UNIT,
            WorkspaceKind::Basic,
        );
        let kind = WorkerKind::ALL[i as usize % WorkerKind::ALL.len()];
        let worker = engine.spawn_worker(kind);
        engine.assign_to_workspace(worker, ws);
    }
    engine
}

fn bench_calculate(c: &mut Criterion) {
    let engine = populated_engine(RuleSet::Full);
    let workspaces = engine.workspaces();
    let assignments = engine.assignments();
    let registry = SynergyRegistry::full();

    c.bench_function("calculate_32_workers_full", |b| {
        b.iter(|| {
            black_box(productivity::calculate(
                black_box(&workspaces),
                black_box(&assignments),
                &registry,
            ))
        })
    });

    let abilities = SynergyRegistry::abilities_only();
    c.bench_function("calculate_32_workers_abilities", |b| {
        b.iter(|| black_box(productivity::calculate(&workspaces, &assignments, &abilities)))
    });
}

fn bench_end_turn(c: &mut Criterion) {
    c.bench_function("end_turn_32_workers", |b| {
        let mut engine = populated_engine(RuleSet::Full);
        b.iter(|| {
            let report = engine.end_turn();
            engine.drain_events();
            black_box(report)
        })
    });
}

criterion_group!(benches, bench_calculate, bench_end_turn);
criterion_main!(benches);
