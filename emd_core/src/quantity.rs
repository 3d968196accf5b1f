//! # Derived Quantity Slots
//!
//! A [`Slot`] is a named write-once cell holding one derived quantity of the
//! design calculation. The write-once discipline is what keeps the whole
//! engine honest: a quantity is computed exactly once, in dependency order,
//! and every violation of that order surfaces as an error instead of a stale
//! or half-initialized value.
//!
//! - Reading an unset slot fails with `PrerequisiteMissing`, naming the slot.
//! - Setting a slot twice fails with `Recompute`, leaving the first value
//!   intact.
//! - [`Slot::reset`] clears the slot; models expose it only as part of a
//!   whole-model reset.

use serde::{Serialize, Serializer};

use crate::errors::{DesignError, DesignResult};

/// A named write-once cell for one derived quantity.
///
/// Slot names are dotted paths (`"stator.pole_pitch"`) so that errors and
/// the session query interface agree on naming.
#[derive(Debug, Clone)]
pub struct Slot<T> {
    name: &'static str,
    value: Option<T>,
}

impl<T: Copy> Slot<T> {
    /// Create an empty slot with the given dotted name.
    pub fn new(name: &'static str) -> Self {
        Slot { name, value: None }
    }

    /// The dotted name of this quantity.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the quantity has been computed.
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Read the computed value.
    ///
    /// Fails with `PrerequisiteMissing` if the quantity has not been
    /// computed yet. Reading is idempotent.
    pub fn get(&self) -> DesignResult<T> {
        self.value
            .ok_or_else(|| DesignError::prerequisite_missing(self.name))
    }

    /// Store the computed value.
    ///
    /// Fails with `Recompute` if the quantity was already computed; the
    /// stored value is left untouched in that case.
    pub fn set(&mut self, value: T) -> DesignResult<()> {
        if self.value.is_some() {
            return Err(DesignError::recompute(self.name));
        }
        self.value = Some(value);
        Ok(())
    }

    /// Clear the slot so the quantity can be computed again.
    pub fn reset(&mut self) {
        self.value = None;
    }
}

// Slots serialize as their optional value so model state exports cleanly.
impl<T: Serialize> Serialize for Slot<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_before_compute_names_quantity() {
        let slot: Slot<f64> = Slot::new("stator.pole_pitch");
        let err = slot.get().unwrap_err();
        assert_eq!(
            err,
            DesignError::prerequisite_missing("stator.pole_pitch")
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_write_once_then_read_many() {
        let mut slot: Slot<f64> = Slot::new("stator.tooth_pitch");
        slot.set(56.72).unwrap();
        assert_eq!(slot.get().unwrap(), 56.72);
        assert_eq!(slot.get().unwrap(), 56.72);
    }

    #[test]
    fn test_second_write_fails_and_keeps_first_value() {
        let mut slot: Slot<f64> = Slot::new("rotor.slot_height");
        slot.set(246.9).unwrap();
        let err = slot.set(0.0).unwrap_err();
        assert_eq!(err, DesignError::recompute("rotor.slot_height"));
        assert_eq!(slot.get().unwrap(), 246.9);
    }

    #[test]
    fn test_reset_allows_recompute() {
        let mut slot: Slot<f64> = Slot::new("magnetic.main_flux");
        slot.set(1.643).unwrap();
        slot.reset();
        assert!(!slot.is_set());
        slot.set(1.7).unwrap();
        assert_eq!(slot.get().unwrap(), 1.7);
    }

    #[test]
    fn test_serializes_as_value() {
        let mut slot: Slot<f64> = Slot::new("reactance.x_d");
        assert_eq!(serde_json::to_string(&slot).unwrap(), "null");
        slot.set(1.5).unwrap();
        assert_eq!(serde_json::to_string(&slot).unwrap(), "1.5");
    }
}
