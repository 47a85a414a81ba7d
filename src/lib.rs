pub mod agent;
pub mod error;
pub mod population;
pub mod topology;
pub mod payoff;
pub mod revision;
pub mod models;
pub mod metrics;
pub mod simulation;

pub use agent::{Agent, Strategy};
pub use error::{PggError, Result};
pub use population::Population;
pub use models::{PublicGoodsGame, Revise};
pub use simulation::{Simulation, SimConfig};
pub use metrics::MetricsCollector;

pub mod prelude {
    pub use crate::agent::{Agent, Strategy};
    pub use crate::error::{PggError, Result};
    pub use crate::population::{InitialDistribution, Population, StrategyCounts, StrategyGrid};
    pub use crate::topology::Topology;
    pub use crate::payoff::{GameParams, GroupOutcome, PayoffConvention};
    pub use crate::revision::{AdoptionRule, RevisionParams};
    pub use crate::models::{
        BucketModel, LatticeModel, MeanFieldModel, ModelRegistry, PopulationSpec, PublicGoodsGame, Revise,
    };
    pub use crate::simulation::{Simulation, SimConfig};
    pub use crate::metrics::MetricsSnapshot;
}
