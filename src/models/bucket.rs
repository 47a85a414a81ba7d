// Well-mixed finite population. Groups are random subsets, the pot is
// shared among cooperators and defectors only, and anyone may be picked
// as the comparison partner during revision.

use super::{PopulationSpec, PublicGoodsGame, Revise};
use crate::error::{PggError, Result};
use crate::payoff::PayoffConvention;
use crate::population::{InitialDistribution, Population};
use crate::revision::{global_opponent, imitate, RevisionParams};
use rand::{Rng, RngCore};

#[derive(Debug, Clone)]
pub struct BucketModel {
    population: Population,
}

impl BucketModel {
    pub fn new<R: Rng + ?Sized>(
        nplayers: usize,
        distribution: Option<InitialDistribution>,
        rng: &mut R,
    ) -> Result<Self> {
        Ok(Self {
            population: Population::new(nplayers, distribution, rng)?,
        })
    }

    pub fn from_spec<R: Rng + ?Sized>(
        spec: PopulationSpec,
        distribution: Option<InitialDistribution>,
        rng: &mut R,
    ) -> Result<Self> {
        match spec {
            PopulationSpec::Unstructured { players } => Self::new(players, distribution, rng),
            PopulationSpec::Lattice { .. } => Err(PggError::TopologyMismatch {
                model: "bucket".to_string(),
                expected: "unstructured",
            }),
        }
    }

    pub fn with_population(population: Population) -> Self {
        Self { population }
    }
}

impl PublicGoodsGame for BucketModel {
    fn name(&self) -> &str {
        "bucket"
    }

    fn population(&self) -> &Population {
        &self.population
    }

    fn population_mut(&mut self) -> &mut Population {
        &mut self.population
    }

    fn convention(&self) -> PayoffConvention {
        PayoffConvention::ContributorOnly
    }

    fn reviser(&mut self) -> Option<&mut dyn Revise> {
        Some(self)
    }
}

impl Revise for BucketModel {
    fn revise_strategy(
        &mut self,
        focal: usize,
        params: &RevisionParams,
        rng: &mut dyn RngCore,
    ) -> Result<bool> {
        params.validate()?;
        self.population.agent(focal)?;

        let opponent = global_opponent(self.population.len(), rng);
        imitate(self.population.agents_mut(), focal, opponent, params, rng)
    }
}
