use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pggsim::prelude::*;

fn bench_epochs(c: &mut Criterion) {
    let configs = [
        SimConfig::default().with_model("mean-field").with_players(300),
        SimConfig::default().with_model("bucket").with_players(300),
        SimConfig::default()
            .with_model("lattice")
            .with_lattice(30, 30)
            .with_game(9, 1.0, 4.0, 1.0),
    ];

    for config in configs {
        let name = format!("epoch_{}", config.model);
        let mut sim = match Simulation::new(config) {
            Ok(sim) => sim,
            Err(e) => panic!("bench config rejected: {}", e),
        };
        c.bench_function(&name, |b| b.iter(|| black_box(sim.step())));
    }
}

criterion_group!(benches, bench_epochs);
criterion_main!(benches);
