//! # Computation Models
//!
//! The five machine models, in dependency order: stator, rotor, magnetic
//! circuit, reactances, losses. Each model owns the write-once slots of its
//! derived quantities and reads upstream models through shared borrows passed
//! into its `compute_*` methods; no model ever owns or mutates a peer.

pub mod losses;
pub mod magnetic;
pub mod reactance;
pub mod rotor;
pub mod stator;

pub use losses::LossModel;
pub use magnetic::MagneticCircuitModel;
pub use reactance::ReactanceModel;
pub use rotor::RotorModel;
pub use stator::StatorModel;

use serde::{Deserialize, Serialize};

/// Standard winding temperatures for copper resistance correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindingTemperature {
    C15,
    C75,
    C105,
    C120,
}

impl WindingTemperature {
    /// Resistance correction factor relative to the 15 °C base value.
    pub fn factor(self) -> f64 {
        match self {
            WindingTemperature::C15 => 1.0,
            WindingTemperature::C75 => 1.24,
            WindingTemperature::C105 => 1.36,
            WindingTemperature::C120 => 1.42,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_factors() {
        assert_eq!(WindingTemperature::C15.factor(), 1.0);
        assert_eq!(WindingTemperature::C75.factor(), 1.24);
        assert_eq!(WindingTemperature::C105.factor(), 1.36);
        assert_eq!(WindingTemperature::C120.factor(), 1.42);
    }
}
