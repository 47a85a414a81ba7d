use crate::error::{PggError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three strategies of the optional public goods game.
///
/// Codes are fixed: 0 cooperator, 1 defector, 2 loner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    Cooperator = 0,
    Defector = 1,
    Loner = 2,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Cooperator, Strategy::Defector, Strategy::Loner];

    /// Uniform draw over the three strategies.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Single character used for text dumps of a lattice.
    pub fn symbol(self) -> char {
        match self {
            Strategy::Cooperator => 'C',
            Strategy::Defector => 'D',
            Strategy::Loner => 'L',
        }
    }
}

impl TryFrom<u8> for Strategy {
    type Error = PggError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Strategy::Cooperator),
            1 => Ok(Strategy::Defector),
            2 => Ok(Strategy::Loner),
            other => Err(PggError::InvalidStrategyCode(other)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Cooperator => "cooperator",
            Strategy::Defector => "defector",
            Strategy::Loner => "loner",
        };
        f.write_str(name)
    }
}

/// One player: a strategy and the payoff it has collected this epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    strategy: Strategy,
    payoff: f64,
}

impl Agent {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            payoff: 0.0,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(Strategy::random(rng))
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn payoff(&self) -> f64 {
        self.payoff
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.strategy = strategy;
    }

    /// Raw-code setter, for callers holding strategies as integers.
    pub fn set_strategy_code(&mut self, code: u8) -> Result<()> {
        self.strategy = Strategy::try_from(code)?;
        Ok(())
    }

    pub fn add_payoff(&mut self, delta: f64) {
        self.payoff += delta;
    }

    pub fn clear_payoff(&mut self) {
        self.payoff = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_new_agent_has_zero_payoff() {
        let agent = Agent::new(Strategy::Defector);
        assert_eq!(agent.strategy(), Strategy::Defector);
        assert_eq!(agent.payoff(), 0.0);
    }

    #[test]
    fn test_payoff_accumulates_until_cleared() {
        let mut agent = Agent::new(Strategy::Cooperator);
        agent.add_payoff(0.5);
        agent.add_payoff(1.25);
        assert!((agent.payoff() - 1.75).abs() < 1e-12);

        agent.clear_payoff();
        assert_eq!(agent.payoff(), 0.0);
    }

    #[test]
    fn test_strategy_code_setter_rejects_unknown_codes() {
        let mut agent = Agent::new(Strategy::Loner);
        assert_eq!(agent.set_strategy_code(3), Err(PggError::InvalidStrategyCode(3)));
        assert_eq!(agent.strategy(), Strategy::Loner);

        agent.set_strategy_code(0).unwrap();
        assert_eq!(agent.strategy(), Strategy::Cooperator);
    }

    #[test]
    fn test_codes_match_variants() {
        for strategy in Strategy::ALL {
            assert_eq!(Strategy::try_from(strategy.code()).unwrap(), strategy);
        }
    }

    #[test]
    fn test_random_strategy_hits_every_variant() {
        let mut rng = StdRng::seed_from_u64(12345);
        let mut seen = [false; 3];
        for _ in 0..200 {
            seen[Agent::random(&mut rng).strategy().code() as usize] = true;
        }
        assert_eq!(seen, [true; 3]);
    }
}
