pub mod config;
pub use config::SimConfig;

use crate::agent::Strategy;
use crate::error::{PggError, Result};
use crate::metrics::{MetricsCollector, MetricsSnapshot};
use crate::models::{ModelRegistry, PublicGoodsGame, Revise};
use crate::population::{InitialDistribution, Population, StrategyCounts};
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

/// Epoch driver: games, then revision, then a snapshot, then clearing.
///
/// All randomness comes from one `StdRng` seeded from the config, so two
/// simulations built from the same config produce the same trajectory.
pub struct Simulation {
    config: SimConfig,
    model: Box<dyn PublicGoodsGame>,
    rng: StdRng,
    epoch: usize,
    initial_counts: StrategyCounts,
    pub metrics: MetricsCollector,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self> {
        let distribution = config
            .initial_distribution
            .map(InitialDistribution::try_from)
            .transpose()?;

        // Reject bad parameters before anything is built or played.
        config.game.validate(config.group_size())?;
        config.revision.validate()?;
        if config.group_size() > config.population.size() {
            return Err(PggError::GroupTooLarge {
                group_size: config.group_size(),
                population: config.population.size(),
            });
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let model = ModelRegistry::global().create(&config.model, config.population, distribution, &mut rng)?;
        let initial_counts = model.count_strategies();

        Ok(Self {
            config,
            model,
            rng,
            epoch: 0,
            initial_counts,
            metrics: MetricsCollector::new(),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn model(&self) -> &dyn PublicGoodsGame {
        self.model.as_ref()
    }

    pub fn epoch(&self) -> usize {
        self.epoch
    }

    /// Counts at the end of the last epoch, or at construction before the first.
    pub fn previous_counts(&self) -> StrategyCounts {
        self.metrics
            .latest()
            .map(MetricsSnapshot::counts)
            .unwrap_or(self.initial_counts)
    }

    /// Advances the system by one generation and returns its snapshot.
    pub fn step(&mut self) -> Result<MetricsSnapshot> {
        let games = self.config.games_per_epoch();
        for _ in 0..games {
            self.model
                .play_game(self.config.nparticipants, &self.config.game, &mut self.rng)?;
        }

        let mean_payoffs = mean_payoffs(self.model.population());

        let mut switches = 0;
        if let Some(reviser) = self.model.reviser() {
            for focal in 0..self.config.population.size() {
                if reviser.revise_strategy(focal, &self.config.revision, &mut self.rng)? {
                    switches += 1;
                }
            }
        }

        let previous = self.previous_counts();
        let counts = self.model.count_strategies();
        self.model.clear_payoffs();
        self.epoch += 1;

        let snapshot = MetricsSnapshot::new(self.epoch, counts, mean_payoffs, switches);
        debug!(
            "Epoch {}: C={} D={} L={} ({} switches)",
            self.epoch, counts.cooperators, counts.defectors, counts.loners, switches
        );

        for strategy in newly_extinct(previous, counts) {
            warn!("Epoch {}: {}s went extinct", self.epoch, strategy);
        }

        self.metrics.record(snapshot.clone());
        Ok(snapshot)
    }

    pub fn run(&mut self) -> Result<()> {
        info!("Starting simulation: {}", self.config.name);
        info!("Model: {}", self.model.name());
        info!(
            "Population: {} agents, {} epochs, {} games per epoch",
            self.config.population.size(),
            self.config.epochs,
            self.config.games_per_epoch()
        );

        let initial = self.model.count_strategies();
        info!(
            "Initial strategies: C={} D={} L={}",
            initial.cooperators, initial.defectors, initial.loners
        );

        let pb = if self.config.progress {
            ProgressBar::new(self.config.epochs as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.green/cyan} {pos}/{len} epochs {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );

        for _ in 0..self.config.epochs {
            let snapshot = self.step()?;
            pb.inc(1);
            pb.set_message(format!(
                "C {} | D {} | L {}",
                snapshot.cooperators, snapshot.defectors, snapshot.loners
            ));
        }

        pb.finish_with_message("Simulation complete");

        let last = self.model.count_strategies();
        info!(
            "Final strategies: C={} D={} L={}",
            last.cooperators, last.defectors, last.loners
        );
        Ok(())
    }
}

/// Strategies present in `before` and gone in `after`.
fn newly_extinct(before: StrategyCounts, after: StrategyCounts) -> Vec<Strategy> {
    Strategy::ALL
        .into_iter()
        .filter(|&s| before.get(s) > 0 && after.get(s) == 0)
        .collect()
}

/// Average payoff per strategy, 0.0 for strategies nobody plays.
fn mean_payoffs(population: &Population) -> [f64; 3] {
    let mut sums = [0.0; 3];
    let mut counts = [0usize; 3];
    for agent in population.agents() {
        let slot = agent.strategy().code() as usize;
        sums[slot] += agent.payoff();
        counts[slot] += 1;
    }
    let mut means = [0.0; 3];
    for slot in 0..3 {
        if counts[slot] > 0 {
            means[slot] = sums[slot] / counts[slot] as f64;
        }
    }
    means
}
