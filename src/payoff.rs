use crate::agent::{Agent, Strategy};
use crate::error::{PggError, Result};
use serde::{Deserialize, Serialize};

/// Per-round game settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameParams {
    /// Contribution a cooperator pays into the pot.
    pub cost: f64,
    /// Factor the pot is multiplied by.
    pub r: f64,
    /// Fixed payoff of a loner.
    pub sigma: f64,
}

impl GameParams {
    pub fn new(cost: f64, r: f64, sigma: f64) -> Self {
        Self { cost, r, sigma }
    }

    /// Requires `1 < r < group_size` and `0 < sigma < r - 1`.
    pub fn validate(&self, group_size: usize) -> Result<()> {
        if !(1.0 < self.r && self.r < group_size as f64) {
            return Err(PggError::MultiplicationFactorOutOfRange {
                r: self.r,
                group_size,
            });
        }
        if !(0.0 < self.sigma && self.sigma < self.r - 1.0) {
            return Err(PggError::LonerPayoffOutOfRange {
                sigma: self.sigma,
                r: self.r,
            });
        }
        Ok(())
    }
}

impl Default for GameParams {
    fn default() -> Self {
        Self {
            cost: 1.0,
            r: 3.0,
            sigma: 1.0,
        }
    }
}

/// How the multiplied pot is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayoffConvention {
    /// Shared over every group member, loners included.
    WholeGroup,
    /// Shared over cooperators and defectors only.
    ContributorOnly,
}

/// Who played one game and how the group split up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOutcome {
    pub members: Vec<usize>,
    pub cooperators: usize,
    pub defectors: usize,
    pub loners: usize,
}

impl GroupOutcome {
    pub fn size(&self) -> usize {
        self.members.len()
    }

    fn classify(agents: &[Agent], members: Vec<usize>) -> Self {
        let mut outcome = GroupOutcome {
            members,
            cooperators: 0,
            defectors: 0,
            loners: 0,
        };
        for &i in &outcome.members {
            match agents[i].strategy() {
                Strategy::Cooperator => outcome.cooperators += 1,
                Strategy::Defector => outcome.defectors += 1,
                Strategy::Loner => outcome.loners += 1,
            }
        }
        outcome
    }
}

/// Share of the multiplied pot each participant receives, or `None` when
/// nobody is in the pot (an all-loner group under contributor-only pooling).
pub fn pot_share(
    params: &GameParams,
    convention: PayoffConvention,
    cooperators: usize,
    defectors: usize,
    group_size: usize,
) -> Option<f64> {
    let denominator = match convention {
        PayoffConvention::WholeGroup => group_size,
        PayoffConvention::ContributorOnly => cooperators + defectors,
    };
    if denominator == 0 {
        return None;
    }
    Some(params.r * params.cost * cooperators as f64 / denominator as f64)
}

/// Adds one game's payoffs onto every member of `members`.
///
/// Members must be valid, distinct indices into `agents`.
pub fn assign_payoffs(
    agents: &mut [Agent],
    members: Vec<usize>,
    params: &GameParams,
    convention: PayoffConvention,
) -> GroupOutcome {
    let outcome = GroupOutcome::classify(agents, members);
    let share = pot_share(
        params,
        convention,
        outcome.cooperators,
        outcome.defectors,
        outcome.size(),
    );

    for &i in &outcome.members {
        let agent = &mut agents[i];
        match (agent.strategy(), share) {
            (Strategy::Cooperator, Some(share)) => agent.add_payoff(share - params.cost),
            (Strategy::Defector, Some(share)) => agent.add_payoff(share),
            (Strategy::Loner, _) => agent.add_payoff(params.sigma),
            // No contributors in the pot means no cooperators or defectors here.
            (_, None) => {}
        }
    }
    outcome
}
