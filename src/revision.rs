// Pairwise imitation: a focal agent compares its payoff with one opponent
// and copies the opponent's strategy with probability `p`.

use crate::agent::Agent;
use crate::error::{PggError, Result};
use crate::topology::{moore_neighborhood, NEIGHBORHOOD_SIZE};
use rand::Rng;
use rand_distr::{Bernoulli, Distribution};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AdoptionRule {
    /// `1 / (1 + exp(x) / K)`. K divides the exponential, not the exponent.
    /// This is the reproduced behavior even though it reads like a
    /// precedence slip; use `Fermi` for the textbook form.
    #[default]
    Literal,
    /// `1 / (1 + exp(x / K))`.
    Fermi,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevisionParams {
    pub tau: f64,
    pub k: f64,
    #[serde(default)]
    pub rule: AdoptionRule,
}

impl RevisionParams {
    pub fn new(tau: f64, k: f64) -> Self {
        Self {
            tau,
            k,
            rule: AdoptionRule::Literal,
        }
    }

    pub fn with_rule(mut self, rule: AdoptionRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.k.is_finite() && self.k > 0.0) {
            return Err(PggError::InvalidNoise(self.k));
        }
        Ok(())
    }
}

impl Default for RevisionParams {
    fn default() -> Self {
        Self::new(0.1, 0.1)
    }
}

/// Probability that the focal agent imitates the opponent,
/// with `x = payoff_focal - payoff_opponent + tau`.
pub fn adoption_probability(payoff_focal: f64, payoff_opponent: f64, params: &RevisionParams) -> f64 {
    let x = payoff_focal - payoff_opponent + params.tau;
    match params.rule {
        AdoptionRule::Literal => 1.0 / (1.0 + x.exp() / params.k),
        AdoptionRule::Fermi => 1.0 / (1.0 + (x / params.k).exp()),
    }
}

/// Runs the decision step for `focal` against `opponent`. Returns whether
/// the focal agent switched to the opponent's strategy.
pub(crate) fn imitate<R: Rng + ?Sized>(
    agents: &mut [Agent],
    focal: usize,
    opponent: usize,
    params: &RevisionParams,
    rng: &mut R,
) -> Result<bool> {
    let p = adoption_probability(agents[focal].payoff(), agents[opponent].payoff(), params);
    let coin = Bernoulli::new(p).map_err(|_| PggError::InvalidProbability(p))?;

    if coin.sample(rng) {
        let strategy = agents[opponent].strategy();
        agents[focal].set_strategy(strategy);
        return Ok(true);
    }
    Ok(false)
}

/// Any index of the population, the focal agent included.
pub fn global_opponent<R: Rng + ?Sized>(len: usize, rng: &mut R) -> usize {
    rng.gen_range(0..len)
}

/// A Moore neighbor of `(x, y)` other than the cell itself, resampled until
/// it differs from the focal coordinate.
pub fn neighborhood_opponent<R: Rng + ?Sized>(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    rng: &mut R,
) -> (usize, usize) {
    let cells = moore_neighborhood(x, y, width, height);
    loop {
        let candidate = cells[rng.gen_range(0..NEIGHBORHOOD_SIZE)];
        if candidate != (x, y) {
            return candidate;
        }
    }
}
