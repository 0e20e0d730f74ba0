use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use linkage_engine::*;
use std::hint::black_box;

const DT: f64 = 1.0 / 60.0;

fn prepare_chain(joint_count: usize) -> LinkageWorld {
    let mut world = LinkageWorld::default();
    let mut previous = world.add_joint(DVec2::ZERO);
    let _ = world.set_locked(previous, true);
    for i in 1..joint_count {
        let next = world.add_joint(DVec2::new(i as f64, (i % 2) as f64 * 0.25));
        let _ = world.add_constraint(previous, next);
        previous = next;
    }
    world
}

fn bench_four_bar_step(c: &mut Criterion) {
    let mut world = LinkageWorld::default();
    world.synthesize_four_bar(
        FourBarLengths::new(4.0, 1.0, 3.5, 3.0),
        FourBarOptions::default(),
    );
    c.bench_function("four_bar_step", |b| {
        b.iter(|| world.step_frame(black_box(DT)))
    });
}

fn bench_chain_relaxation(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_relaxation");
    for &count in &[16usize, 128, 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut world = prepare_chain(count);
            b.iter(|| {
                let _ = world.drag_joint(JointId(count - 1), black_box(DVec2::new(0.0, 5.0)));
                world.solve_constraints(16)
            })
        });
    }
    group.finish();
}

fn bench_fabrik(c: &mut Criterion) {
    let mut group = c.benchmark_group("fabrik");
    for &count in &[4usize, 32, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let solver = FabrikSolver::new(FabrikConfig {
                tolerance: 1e-3,
                max_iterations: 50,
            });
            let straight: Vec<DVec2> = (0..count).map(|i| DVec2::new(i as f64, 0.0)).collect();
            let target = DVec2::new(count as f64 * 0.5, count as f64 * 0.3);
            b.iter(|| {
                let mut positions = straight.clone();
                solver.solve_positions(black_box(&mut positions), target)
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_four_bar_step,
    bench_chain_relaxation,
    bench_fabrik
);
criterion_main!(benches);
