// Spatial model on a torus. Every game is the 3x3 block around a random
// cell; revision compares an agent with one of its eight neighbors.

use super::{PopulationSpec, PublicGoodsGame, Revise};
use crate::error::{PggError, Result};
use crate::payoff::PayoffConvention;
use crate::population::{InitialDistribution, Population};
use crate::revision::{imitate, neighborhood_opponent, RevisionParams};
use crate::topology::Topology;
use rand::{Rng, RngCore};

#[derive(Debug, Clone)]
pub struct LatticeModel {
    population: Population,
}

impl LatticeModel {
    pub fn new<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        distribution: Option<InitialDistribution>,
        rng: &mut R,
    ) -> Result<Self> {
        Ok(Self {
            population: Population::lattice(width, height, distribution, rng)?,
        })
    }

    pub fn from_spec<R: Rng + ?Sized>(
        spec: PopulationSpec,
        distribution: Option<InitialDistribution>,
        rng: &mut R,
    ) -> Result<Self> {
        match spec {
            PopulationSpec::Lattice { width, height } => Self::new(width, height, distribution, rng),
            PopulationSpec::Unstructured { .. } => Err(topology_mismatch()),
        }
    }

    pub fn with_population(population: Population) -> Result<Self> {
        match population.topology() {
            Topology::Lattice { .. } => Ok(Self { population }),
            Topology::Unstructured => Err(topology_mismatch()),
        }
    }

    pub fn width(&self) -> usize {
        self.dimensions().0
    }

    pub fn height(&self) -> usize {
        self.dimensions().1
    }

    fn dimensions(&self) -> (usize, usize) {
        match self.population.topology() {
            Topology::Lattice { width, height } => (width, height),
            Topology::Unstructured => (0, 0),
        }
    }

    /// Revision addressed by grid coordinate instead of flat index.
    pub fn revise_cell(
        &mut self,
        x: usize,
        y: usize,
        params: &RevisionParams,
        rng: &mut dyn RngCore,
    ) -> Result<bool> {
        self.population.agent_at(x, y)?;
        let focal = self.population.topology().index(x, y).ok_or_else(topology_mismatch)?;
        self.revise_strategy(focal, params, rng)
    }
}

fn topology_mismatch() -> PggError {
    PggError::TopologyMismatch {
        model: "lattice".to_string(),
        expected: "lattice",
    }
}

impl PublicGoodsGame for LatticeModel {
    fn name(&self) -> &str {
        "lattice"
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

impl Revise for LatticeModel {
    fn revise_strategy(
        &mut self,
        focal: usize,
        params: &RevisionParams,
        rng: &mut dyn RngCore,
    ) -> Result<bool> {
        params.validate()?;
        self.population.agent(focal)?;

        let topology = self.population.topology();
        let (x, y) = topology.coordinates(focal).ok_or_else(topology_mismatch)?;
        let (width, height) = self.dimensions();
        let (ox, oy) = neighborhood_opponent(x, y, width, height, rng);
        let opponent = topology.index(ox, oy).ok_or_else(topology_mismatch)?;
        imitate(self.population.agents_mut(), focal, opponent, params, rng)
    }
}
