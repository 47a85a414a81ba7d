use crate::models::PopulationSpec;
use crate::payoff::GameParams;
use crate::revision::{AdoptionRule, RevisionParams};
use crate::topology::NEIGHBORHOOD_SIZE;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub name: String,
    pub model: String,
    pub population: PopulationSpec,
    pub epochs: usize,
    /// Games per epoch; `None` means population size over group size.
    pub games_per_epoch: Option<usize>,
    pub nparticipants: usize,
    pub game: GameParams,
    pub revision: RevisionParams,
    pub initial_distribution: Option<[f64; 3]>,
    pub seed: u64,
    #[serde(default)]
    pub progress: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            name: "default_sim".to_string(),
            model: "bucket".to_string(),
            population: PopulationSpec::Unstructured { players: 300 },
            epochs: 100,
            games_per_epoch: None,
            nparticipants: 5,
            game: GameParams::new(1.0, 3.0, 1.0),
            revision: RevisionParams::default(),
            initial_distribution: Some([0.4, 0.1, 0.5]),
            seed: 42,
            progress: false,
        }
    }
}

impl SimConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_players(mut self, players: usize) -> Self {
        self.population = PopulationSpec::Unstructured { players };
        self
    }

    pub fn with_lattice(mut self, width: usize, height: usize) -> Self {
        self.population = PopulationSpec::Lattice { width, height };
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_games_per_epoch(mut self, games: usize) -> Self {
        self.games_per_epoch = Some(games);
        self
    }

    pub fn with_game(mut self, nparticipants: usize, cost: f64, r: f64, sigma: f64) -> Self {
        self.nparticipants = nparticipants;
        self.game = GameParams::new(cost, r, sigma);
        self
    }

    pub fn with_revision(mut self, tau: f64, k: f64, rule: AdoptionRule) -> Self {
        self.revision = RevisionParams::new(tau, k).with_rule(rule);
        self
    }

    pub fn with_distribution(mut self, distribution: Option<[f64; 3]>) -> Self {
        self.initial_distribution = distribution;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn group_size(&self) -> usize {
        match self.population {
            PopulationSpec::Unstructured { .. } => self.nparticipants,
            PopulationSpec::Lattice { .. } => NEIGHBORHOOD_SIZE,
        }
    }

    pub fn games_per_epoch(&self) -> usize {
        self.games_per_epoch
            .unwrap_or_else(|| (self.population.size() / self.group_size().max(1)).max(1))
    }
}
