// No revision here: the mean-field model only plays games and accumulates
// payoffs. Strategies never change after construction.

use super::{PopulationSpec, PublicGoodsGame};
use crate::error::{PggError, Result};
use crate::payoff::PayoffConvention;
use crate::population::{InitialDistribution, Population};
use rand::Rng;

#[derive(Debug, Clone)]
pub struct MeanFieldModel {
    population: Population,
}

impl MeanFieldModel {
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
                model: "mean-field".to_string(),
                expected: "unstructured",
            }),
        }
    }

    pub fn with_population(population: Population) -> Self {
        Self { population }
    }
}

impl PublicGoodsGame for MeanFieldModel {
    fn name(&self) -> &str {
        "mean-field"
    }

    fn population(&self) -> &Population {
        &self.population
    }

    fn population_mut(&mut self) -> &mut Population {
        &mut self.population
    }

    fn convention(&self) -> PayoffConvention {
        PayoffConvention::WholeGroup
    }
}
