//! Worked examples of single games and revisions.

use pggsim::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_mean_field_nine_cooperators() {
    let population = Population::from_strategies(&[Strategy::Cooperator; 9], Topology::Unstructured).unwrap();
    let mut model = MeanFieldModel::with_population(population);
    let mut rng = StdRng::seed_from_u64(42);

    model.play_game(9, &GameParams::new(1.0, 2.0, 0.5), &mut rng).unwrap();

    // -1 + 2 * 1 * 9 / 9
    for agent in model.population().agents() {
        assert!(close(agent.payoff(), 1.0));
    }
}

#[test]
fn test_bucket_three_cooperators_two_defectors_one_loner() {
    use Strategy::*;
    let population = Population::from_strategies(
        &[Cooperator, Cooperator, Cooperator, Defector, Defector, Loner],
        Topology::Unstructured,
    )
    .unwrap();
    let mut model = BucketModel::with_population(population);
    let mut rng = StdRng::seed_from_u64(42);

    let outcome = model.play_game(6, &GameParams::new(1.0, 3.0, 0.9), &mut rng).unwrap();
    assert_eq!((outcome.cooperators, outcome.defectors, outcome.loners), (3, 2, 1));

    for agent in model.population().agents() {
        let expected = match agent.strategy() {
            Cooperator => 0.8,
            Defector => 1.8,
            Loner => 0.9,
        };
        assert!(close(agent.payoff(), expected), "{:?}", agent);
    }
}

#[test]
fn test_whole_group_share_counts_the_loner() {
    use Strategy::*;
    let strategies = [Cooperator, Cooperator, Cooperator, Defector, Defector, Loner];
    let params = GameParams::new(1.0, 3.0, 0.9);
    let mut rng = StdRng::seed_from_u64(1);

    let mut whole = MeanFieldModel::with_population(
        Population::from_strategies(&strategies, Topology::Unstructured).unwrap(),
    );
    whole.play_game(6, &params, &mut rng).unwrap();

    // share = 3 * 3 / 6 = 1.5 with the loner in the denominator
    let cooperator = whole.population().agent(0).unwrap().payoff();
    let defector = whole.population().agent(3).unwrap().payoff();
    assert!(close(cooperator, 0.5));
    assert!(close(defector, 1.5));
}

#[test]
fn test_all_loner_bucket_group() {
    let population = Population::from_strategies(&[Strategy::Loner; 5], Topology::Unstructured).unwrap();
    let mut model = BucketModel::with_population(population);
    let mut rng = StdRng::seed_from_u64(42);

    let outcome = model.play_game(5, &GameParams::new(1.0, 3.0, 1.2), &mut rng).unwrap();

    assert_eq!(outcome.loners, 5);
    assert!(model.population().agents().iter().all(|a| close(a.payoff(), 1.2)));
}

#[test]
fn test_all_loner_lattice_group() {
    let population = Population::from_strategies(
        &[Strategy::Loner; 16],
        Topology::Lattice { width: 4, height: 4 },
    )
    .unwrap();
    let mut model = LatticeModel::with_population(population).unwrap();
    let mut rng = StdRng::seed_from_u64(42);

    model.play_game(9, &GameParams::new(1.0, 3.0, 1.2), &mut rng).unwrap();

    let paid = model.population().agents().iter().filter(|a| a.payoff() > 0.0).count();
    assert_eq!(paid, 9);
}

#[test]
fn test_lattice_corner_group_wraps() {
    // Wherever the game lands, its members are the Moore block around the
    // center cell, wrapped at the edges.
    let mut rng = StdRng::seed_from_u64(2024);
    let mut model = LatticeModel::new(10, 10, None, &mut rng).unwrap();
    let outcome = model.play_game(9, &GameParams::new(1.0, 3.0, 1.0), &mut rng).unwrap();

    let mut members = outcome.members.clone();
    members.sort_unstable();
    members.dedup();
    assert_eq!(members.len(), 9);

    let cells: Vec<(usize, usize)> = outcome.members.iter().map(|&i| (i % 10, i / 10)).collect();
    let (cx, cy) = cells[4];
    let expected = pggsim::topology::moore_neighborhood(cx, cy, 10, 10);
    assert_eq!(cells, expected.to_vec());
}

#[test]
fn test_invalid_sigma_leaves_population_untouched() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut model = BucketModel::new(20, None, &mut rng).unwrap();
    let before = model.population().agents().to_vec();

    let err = model.play_game(5, &GameParams::new(1.0, 3.0, 2.5), &mut rng).unwrap_err();

    assert!(matches!(err, PggError::LonerPayoffOutOfRange { .. }));
    assert_eq!(model.population().agents(), before.as_slice());
}

#[test]
fn test_registry_round_through_simulation() {
    let config = SimConfig::default()
        .with_model("lattice")
        .with_lattice(12, 12)
        .with_game(9, 1.0, 4.0, 1.0)
        .with_epochs(20)
        .with_seed(5);
    let mut sim = Simulation::new(config).unwrap();
    sim.run().unwrap();

    let grid = sim.model().strategy_grid().unwrap();
    let counts = sim.model().count_strategies();
    let from_grid: StrategyCounts = grid.rows().flatten().copied().collect();
    assert_eq!(counts, from_grid);
    assert_eq!(sim.metrics.trajectory().len(), 20);
}
