pub mod mean_field;
pub mod bucket;
pub mod lattice;

use crate::error::{PggError, Result};
use crate::payoff::{assign_payoffs, GameParams, GroupOutcome, PayoffConvention};
use crate::population::{InitialDistribution, Population, StrategyCounts, StrategyGrid};
use crate::revision::RevisionParams;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

pub use bucket::BucketModel;
pub use lattice::LatticeModel;
pub use mean_field::MeanFieldModel;

/// Shape of the population a model is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PopulationSpec {
    Unstructured { players: usize },
    Lattice { width: usize, height: usize },
}

impl PopulationSpec {
    pub fn size(&self) -> usize {
        match *self {
            PopulationSpec::Unstructured { players } => players,
            PopulationSpec::Lattice { width, height } => width * height,
        }
    }
}

pub trait PublicGoodsGame: fmt::Debug {
    fn name(&self) -> &str;

    fn population(&self) -> &Population;

    fn population_mut(&mut self) -> &mut Population;

    fn convention(&self) -> PayoffConvention;

    /// Plays one game: validate, form a group, pay every member.
    ///
    /// Fails before touching any agent when the parameters are out of range.
    fn play_game(
        &mut self,
        nparticipants: usize,
        params: &GameParams,
        rng: &mut dyn RngCore,
    ) -> Result<GroupOutcome> {
        let convention = self.convention();
        play_one(self.population_mut(), nparticipants, params, convention, rng)
    }

    /// Models without a revision protocol return `None`.
    fn reviser(&mut self) -> Option<&mut dyn Revise> {
        None
    }

    /// Like `reviser`, but a model without revision is an error.
    fn try_reviser(&mut self) -> Result<&mut dyn Revise> {
        let name = self.name().to_string();
        self.reviser().ok_or(PggError::RevisionUnsupported(name))
    }

    fn count_strategies(&self) -> StrategyCounts {
        self.population().count_strategies()
    }

    fn clear_payoffs(&mut self) {
        self.population_mut().clear_payoffs();
    }

    fn strategy_grid(&self) -> Option<StrategyGrid> {
        self.population().strategy_grid()
    }
}

/// Strategy revision for models that evolve.
pub trait Revise {
    /// Lets agent `focal` compare itself with one opponent and possibly
    /// copy its strategy. Returns whether the strategy changed.
    fn revise_strategy(
        &mut self,
        focal: usize,
        params: &RevisionParams,
        rng: &mut dyn RngCore,
    ) -> Result<bool>;
}

pub(crate) fn play_one(
    population: &mut Population,
    nparticipants: usize,
    params: &GameParams,
    convention: PayoffConvention,
    rng: &mut dyn RngCore,
) -> Result<GroupOutcome> {
    let group_size = population.group_size(nparticipants);
    params.validate(group_size)?;
    population.check_group_fits(nparticipants)?;

    let members = population
        .topology()
        .form_group(population.len(), nparticipants, rng)?;
    let outcome = assign_payoffs(population.agents_mut(), members, params, convention);

    debug!(
        "Game over {} agents: {} cooperators, {} defectors, {} loners",
        outcome.size(),
        outcome.cooperators,
        outcome.defectors,
        outcome.loners
    );
    Ok(outcome)
}

type ModelFactory = Box<
    dyn Fn(PopulationSpec, Option<InitialDistribution>, &mut dyn RngCore) -> Result<Box<dyn PublicGoodsGame>>
        + Send
        + Sync,
>;

pub struct ModelRegistry {
    models: HashMap<String, ModelFactory>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            models: HashMap::new(),
        };
        registry.register_builtin();
        registry
    }

    fn register_builtin(&mut self) {
        self.register("mean-field", |spec, dist, rng| {
            Ok(Box::new(MeanFieldModel::from_spec(spec, dist, rng)?))
        });
        self.register("meanfield", |spec, dist, rng| {
            Ok(Box::new(MeanFieldModel::from_spec(spec, dist, rng)?))
        });
        self.register("bucket", |spec, dist, rng| {
            Ok(Box::new(BucketModel::from_spec(spec, dist, rng)?))
        });
        self.register("well-mixed", |spec, dist, rng| {
            Ok(Box::new(BucketModel::from_spec(spec, dist, rng)?))
        });
        self.register("lattice", |spec, dist, rng| {
            Ok(Box::new(LatticeModel::from_spec(spec, dist, rng)?))
        });
    }

    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(PopulationSpec, Option<InitialDistribution>, &mut dyn RngCore) -> Result<Box<dyn PublicGoodsGame>>
            + Send
            + Sync
            + 'static,
    {
        self.models.insert(name.to_lowercase(), Box::new(factory));
    }

    pub fn create(
        &self,
        name: &str,
        spec: PopulationSpec,
        distribution: Option<InitialDistribution>,
        rng: &mut dyn RngCore,
    ) -> Result<Box<dyn PublicGoodsGame>> {
        let factory = self
            .models
            .get(&name.to_lowercase())
            .ok_or_else(|| PggError::UnknownModel(name.to_string()))?;
        factory(spec, distribution, rng)
    }

    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn global() -> &'static ModelRegistry {
        use std::sync::OnceLock;
        static REGISTRY: OnceLock<ModelRegistry> = OnceLock::new();
        REGISTRY.get_or_init(ModelRegistry::new)
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_registry_lists_builtins_sorted() {
        let names = ModelRegistry::global().list();
        assert_eq!(names, vec!["bucket", "lattice", "mean-field", "meanfield", "well-mixed"]);
    }

    #[test]
    fn test_registry_is_case_insensitive() {
        let mut rng = StdRng::seed_from_u64(1);
        let model = ModelRegistry::global()
            .create("Bucket", PopulationSpec::Unstructured { players: 20 }, None, &mut rng)
            .unwrap();
        assert_eq!(model.name(), "bucket");
        assert_eq!(model.population().len(), 20);
    }

    #[test]
    fn test_unknown_model_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = ModelRegistry::global()
            .create("hexagonal", PopulationSpec::Unstructured { players: 20 }, None, &mut rng)
            .unwrap_err();
        assert_eq!(err, PggError::UnknownModel("hexagonal".to_string()));
    }

    #[test]
    fn test_only_evolving_models_revise() {
        let mut rng = StdRng::seed_from_u64(1);
        let registry = ModelRegistry::global();
        let spec = PopulationSpec::Unstructured { players: 10 };

        let mut mean_field = registry.create("mean-field", spec, None, &mut rng).unwrap();
        let mut bucket = registry.create("bucket", spec, None, &mut rng).unwrap();
        let mut lattice = registry
            .create("lattice", PopulationSpec::Lattice { width: 4, height: 4 }, None, &mut rng)
            .unwrap();

        assert!(mean_field.reviser().is_none());
        assert_eq!(
            mean_field.try_reviser().err(),
            Some(PggError::RevisionUnsupported("mean-field".to_string()))
        );
        assert!(bucket.reviser().is_some());
        assert!(lattice.reviser().is_some());
    }

    #[test]
    fn test_custom_model_can_be_registered() {
        let mut registry = ModelRegistry::new();
        registry.register("tiny-bucket", |_, dist, rng| {
            Ok(Box::new(BucketModel::new(6, dist, rng)?))
        });
        let mut rng = StdRng::seed_from_u64(2);
        let model = registry
            .create("tiny-bucket", PopulationSpec::Unstructured { players: 100 }, None, &mut rng)
            .unwrap();
        assert_eq!(model.population().len(), 6);
    }
}
