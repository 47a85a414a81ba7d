use crate::agent::{Agent, Strategy};
use crate::error::{PggError, Result};
use crate::topology::Topology;
use rand::Rng;
use rand_distr::{Distribution, WeightedIndex};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Probabilities of starting as cooperator, defector and loner.
///
/// Only `new` builds one, so every instance sums to exactly 1.0. Serde goes
/// through the same check via the `[c, d, l]` array form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 3]", into = "[f64; 3]")]
pub struct InitialDistribution {
    cooperators: f64,
    defectors: f64,
    loners: f64,
}

impl InitialDistribution {
    /// The sum must be exactly 1.0, no tolerance.
    pub fn new(cooperators: f64, defectors: f64, loners: f64) -> Result<Self> {
        if cooperators < 0.0 || defectors < 0.0 || loners < 0.0 {
            return Err(PggError::NegativeProbability);
        }
        let sum = cooperators + defectors + loners;
        if sum != 1.0 {
            return Err(PggError::InvalidDistribution { sum });
        }
        Ok(Self {
            cooperators,
            defectors,
            loners,
        })
    }

    pub fn cooperators(&self) -> f64 {
        self.cooperators
    }

    pub fn defectors(&self) -> f64 {
        self.defectors
    }

    pub fn loners(&self) -> f64 {
        self.loners
    }

    fn sampler(&self) -> Result<WeightedIndex<f64>> {
        WeightedIndex::new([self.cooperators, self.defectors, self.loners]).map_err(|_| {
            PggError::InvalidDistribution {
                sum: self.cooperators + self.defectors + self.loners,
            }
        })
    }
}

impl TryFrom<[f64; 3]> for InitialDistribution {
    type Error = PggError;

    fn try_from(p: [f64; 3]) -> Result<Self> {
        Self::new(p[0], p[1], p[2])
    }
}

impl From<InitialDistribution> for [f64; 3] {
    fn from(dist: InitialDistribution) -> Self {
        [dist.cooperators, dist.defectors, dist.loners]
    }
}

/// Strategy totals over a whole population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StrategyCounts {
    pub cooperators: usize,
    pub defectors: usize,
    pub loners: usize,
}

impl StrategyCounts {
    pub fn total(&self) -> usize {
        self.cooperators + self.defectors + self.loners
    }

    pub fn get(&self, strategy: Strategy) -> usize {
        match strategy {
            Strategy::Cooperator => self.cooperators,
            Strategy::Defector => self.defectors,
            Strategy::Loner => self.loners,
        }
    }

    pub fn fractions(&self) -> [f64; 3] {
        let total = self.total();
        if total == 0 {
            return [0.0; 3];
        }
        let n = total as f64;
        [
            self.cooperators as f64 / n,
            self.defectors as f64 / n,
            self.loners as f64 / n,
        ]
    }

    fn tally(&mut self, strategy: Strategy) {
        match strategy {
            Strategy::Cooperator => self.cooperators += 1,
            Strategy::Defector => self.defectors += 1,
            Strategy::Loner => self.loners += 1,
        }
    }
}

impl FromIterator<Strategy> for StrategyCounts {
    fn from_iter<I: IntoIterator<Item = Strategy>>(iter: I) -> Self {
        let mut counts = StrategyCounts::default();
        for strategy in iter {
            counts.tally(strategy);
        }
        counts
    }
}

/// Read-only copy of a lattice's strategies, for heatmaps.
///
/// Only a lattice `Population` hands these out, so `cells` always holds
/// `width * height` entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyGrid {
    width: usize,
    height: usize,
    cells: Vec<Strategy>,
}

impl StrategyGrid {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Strategy> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Strategy]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Integer codes, one inner vector per row.
    pub fn codes(&self) -> Vec<Vec<u8>> {
        self.rows()
            .map(|row| row.iter().map(|s| s.code()).collect())
            .collect()
    }
}

impl fmt::Display for StrategyGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|s| s.symbol()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Fixed-size set of agents plus the topology that decides who meets whom.
#[derive(Debug, Clone)]
pub struct Population {
    agents: Vec<Agent>,
    topology: Topology,
}

impl Population {
    pub fn new<R: Rng + ?Sized>(
        n: usize,
        distribution: Option<InitialDistribution>,
        rng: &mut R,
    ) -> Result<Self> {
        if n == 0 {
            return Err(PggError::EmptyPopulation);
        }
        Ok(Self {
            agents: spawn_agents(n, distribution, rng)?,
            topology: Topology::Unstructured,
        })
    }

    pub fn lattice<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        distribution: Option<InitialDistribution>,
        rng: &mut R,
    ) -> Result<Self> {
        // Smaller grids would put the same cell into a neighborhood twice.
        if width < 3 || height < 3 {
            return Err(PggError::LatticeTooSmall { width, height });
        }
        Ok(Self {
            agents: spawn_agents(width * height, distribution, rng)?,
            topology: Topology::Lattice { width, height },
        })
    }

    /// Builds a population from explicit strategies, mostly for tests.
    pub fn from_strategies(strategies: &[Strategy], topology: Topology) -> Result<Self> {
        if strategies.is_empty() {
            return Err(PggError::EmptyPopulation);
        }
        if let Topology::Lattice { width, height } = topology {
            if width < 3 || height < 3 {
                return Err(PggError::LatticeTooSmall { width, height });
            }
            if width * height != strategies.len() {
                return Err(PggError::GridSizeMismatch {
                    expected: width * height,
                    actual: strategies.len(),
                });
            }
        }
        Ok(Self {
            agents: strategies.iter().copied().map(Agent::new).collect(),
            topology,
        })
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub(crate) fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub fn agent(&self, index: usize) -> Result<&Agent> {
        let len = self.agents.len();
        self.agents
            .get(index)
            .ok_or(PggError::IndexOutOfRange { index, len })
    }

    pub fn agent_mut(&mut self, index: usize) -> Result<&mut Agent> {
        let len = self.agents.len();
        self.agents
            .get_mut(index)
            .ok_or(PggError::IndexOutOfRange { index, len })
    }

    /// Lattice slot lookup. Coordinates are not wrapped here.
    pub fn agent_at(&self, x: usize, y: usize) -> Result<&Agent> {
        let index = self.cell_index(x, y)?;
        Ok(&self.agents[index])
    }

    pub fn agent_at_mut(&mut self, x: usize, y: usize) -> Result<&mut Agent> {
        let index = self.cell_index(x, y)?;
        Ok(&mut self.agents[index])
    }

    fn cell_index(&self, x: usize, y: usize) -> Result<usize> {
        match self.topology {
            Topology::Lattice { width, height } if x < width && y < height => Ok(y * width + x),
            Topology::Lattice { width, height } => Err(PggError::CellOutOfRange { x, y, width, height }),
            Topology::Unstructured => Err(PggError::CellOutOfRange {
                x,
                y,
                width: self.agents.len(),
                height: 1,
            }),
        }
    }

    /// Fresh pass over every agent, nothing is cached.
    pub fn count_strategies(&self) -> StrategyCounts {
        self.agents.iter().map(Agent::strategy).collect()
    }

    pub fn clear_payoffs(&mut self) {
        for agent in &mut self.agents {
            agent.clear_payoff();
        }
    }

    /// `None` for unstructured populations.
    pub fn strategy_grid(&self) -> Option<StrategyGrid> {
        match self.topology {
            Topology::Lattice { width, height } => Some(StrategyGrid {
                width,
                height,
                cells: self.agents.iter().map(Agent::strategy).collect(),
            }),
            Topology::Unstructured => None,
        }
    }

    /// Group size a game on this population uses for the given request.
    pub fn group_size(&self, nparticipants: usize) -> usize {
        self.topology.group_size(nparticipants)
    }

    pub(crate) fn check_group_fits(&self, nparticipants: usize) -> Result<()> {
        let group_size = self.group_size(nparticipants);
        if group_size > self.agents.len() {
            return Err(PggError::GroupTooLarge {
                group_size,
                population: self.agents.len(),
            });
        }
        Ok(())
    }
}

fn spawn_agents<R: Rng + ?Sized>(
    n: usize,
    distribution: Option<InitialDistribution>,
    rng: &mut R,
) -> Result<Vec<Agent>> {
    match distribution {
        None => Ok((0..n).map(|_| Agent::random(rng)).collect()),
        Some(dist) => {
            let sampler = dist.sampler()?;
            Ok((0..n)
                .map(|_| Agent::new(Strategy::ALL[sampler.sample(rng)]))
                .collect())
        }
    }
}
