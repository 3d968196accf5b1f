//! # Machine Specification
//!
//! Nameplate ratings and main dimensions of the machine. This is the root
//! input of every calculation session: all five computation models keep a
//! copy and read it freely. The specification is validated once, at session
//! construction, and is immutable afterwards.
//!
//! Units are pre-normalized: millimetres, volts, amperes, hertz, kVA.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "poles": 4,
//!   "rated_power_kva": 100000.0,
//!   "rated_voltage_v": 10500.0,
//!   "frequency_hz": 50.0,
//!   "power_factor": 0.85,
//!   "phase_count": 3,
//!   "core_outer_diameter_mm": 2150.0,
//!   "core_inner_diameter_mm": 1300.0,
//!   "core_length_mm": 2600.0,
//!   "air_gap_mm": 37.0
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{DesignError, DesignResult};

/// Nameplate ratings and main dimensions of a synchronous machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineSpec {
    /// Number of poles (2 or 4 for turbo-generators)
    pub poles: u32,
    /// Rated apparent power, kVA
    pub rated_power_kva: f64,
    /// Rated line-to-line voltage, V
    pub rated_voltage_v: f64,
    /// Rated frequency, Hz
    pub frequency_hz: f64,
    /// Rated power factor
    pub power_factor: f64,
    /// Number of stator phases
    pub phase_count: u32,
    /// Stator core outer diameter, mm
    pub core_outer_diameter_mm: f64,
    /// Stator bore (core inner) diameter, mm
    pub core_inner_diameter_mm: f64,
    /// Stator core gross length, mm
    pub core_length_mm: f64,
    /// Radial air gap, mm
    pub air_gap_mm: f64,
}

impl MachineSpec {
    /// Validate nameplate data and main dimensions.
    pub fn validate(&self) -> DesignResult<()> {
        if self.poles != 2 && self.poles != 4 {
            return Err(DesignError::invalid_spec(
                "poles",
                self.poles,
                "turbo-generators have 2 or 4 poles",
            ));
        }
        if self.phase_count == 0 {
            return Err(DesignError::invalid_spec(
                "phase_count",
                self.phase_count,
                "must be at least 1",
            ));
        }
        if self.rated_power_kva <= 0.0 {
            return Err(DesignError::invalid_spec(
                "rated_power_kva",
                self.rated_power_kva,
                "must be positive",
            ));
        }
        if self.rated_voltage_v <= 0.0 {
            return Err(DesignError::invalid_spec(
                "rated_voltage_v",
                self.rated_voltage_v,
                "must be positive",
            ));
        }
        if self.frequency_hz <= 0.0 {
            return Err(DesignError::invalid_spec(
                "frequency_hz",
                self.frequency_hz,
                "must be positive",
            ));
        }
        if self.power_factor <= 0.0 || self.power_factor > 1.0 {
            return Err(DesignError::invalid_spec(
                "power_factor",
                self.power_factor,
                "must be in (0, 1]",
            ));
        }
        if self.core_length_mm <= 0.0 {
            return Err(DesignError::invalid_spec(
                "core_length_mm",
                self.core_length_mm,
                "must be positive",
            ));
        }
        if self.core_inner_diameter_mm <= 0.0 {
            return Err(DesignError::invalid_spec(
                "core_inner_diameter_mm",
                self.core_inner_diameter_mm,
                "must be positive",
            ));
        }
        if self.core_outer_diameter_mm <= self.core_inner_diameter_mm {
            return Err(DesignError::invalid_spec(
                "core_outer_diameter_mm",
                self.core_outer_diameter_mm,
                "must exceed the bore diameter",
            ));
        }
        if self.air_gap_mm <= 0.0 || 2.0 * self.air_gap_mm >= self.core_inner_diameter_mm {
            return Err(DesignError::invalid_spec(
                "air_gap_mm",
                self.air_gap_mm,
                "must be positive and smaller than the bore radius",
            ));
        }
        Ok(())
    }

    /// Number of pole pairs.
    pub fn pole_pairs(&self) -> f64 {
        f64::from(self.poles) / 2.0
    }

    /// Rated stator phase current, A (line current of a wye winding).
    pub fn rated_current_a(&self) -> f64 {
        self.rated_power_kva * 1e3 / (f64::from(self.phase_count) * self.phase_voltage_v())
    }

    /// Rated phase voltage, V.
    pub fn phase_voltage_v(&self) -> f64 {
        self.rated_voltage_v / 3f64.sqrt()
    }

    /// Synchronous speed, rpm.
    pub fn synchronous_speed_rpm(&self) -> f64 {
        60.0 * self.frequency_hz / self.pole_pairs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> MachineSpec {
        MachineSpec {
            poles: 4,
            rated_power_kva: 100_000.0,
            rated_voltage_v: 10_500.0,
            frequency_hz: 50.0,
            power_factor: 0.85,
            phase_count: 3,
            core_outer_diameter_mm: 2150.0,
            core_inner_diameter_mm: 1300.0,
            core_length_mm: 2600.0,
            air_gap_mm: 37.0,
        }
    }

    #[test]
    fn test_valid_spec() {
        assert!(spec().validate().is_ok());
    }

    #[test]
    fn test_rated_current() {
        // 100 MVA at 10.5 kV wye
        let i = spec().rated_current_a();
        assert!((i - 5498.6).abs() < 0.5, "got {i}");
    }

    #[test]
    fn test_synchronous_speed() {
        assert_eq!(spec().synchronous_speed_rpm(), 1500.0);
        let mut two_pole = spec();
        two_pole.poles = 2;
        assert_eq!(two_pole.synchronous_speed_rpm(), 3000.0);
    }

    #[test]
    fn test_negative_core_length_rejected() {
        let mut s = spec();
        s.core_length_mm = -2600.0;
        let err = s.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SPEC");
        assert!(err.to_string().contains("core_length_mm"));
    }

    #[test]
    fn test_odd_pole_count_rejected() {
        let mut s = spec();
        s.poles = 6;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_outer_diameter_must_exceed_bore() {
        let mut s = spec();
        s.core_outer_diameter_mm = 1200.0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let s = spec();
        let json = serde_json::to_string(&s).unwrap();
        let back: MachineSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
