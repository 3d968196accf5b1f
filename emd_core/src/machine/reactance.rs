//! # Reactance Model
//!
//! Per-unit reactances of the machine: armature reaction, leakage (slot,
//! differential, end winding), synchronous, transient and sub-transient,
//! negative-sequence and Potier. Strictly read-only over the stator, rotor
//! and magnetic circuit models; every `compute_*` states its prerequisites
//! by failing when one is missing.

use serde::Serialize;

use crate::errors::DesignResult;
use crate::quantity::Slot;
use crate::spec::MachineSpec;

use super::magnetic::MagneticCircuitModel;
use super::rotor::RotorModel;
use super::stator::StatorModel;

/// Shared coefficients of the per-unit reactance formulas.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UnitCoefficients {
    /// Pitch-shortening factor of the leakage fields
    pub k_pitch: f64,
    /// Per-unit base coefficient
    pub k_x: f64,
    /// Effective slot-field length, cm
    pub core_length_cm: f64,
}

/// Leakage reactance and its components, p.u.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LeakageReactance {
    pub slot: f64,
    pub differential: f64,
    pub end_winding: f64,
    pub total: f64,
}

/// The reactance model.
#[derive(Debug, Serialize)]
pub struct ReactanceModel {
    #[serde(skip)]
    spec: MachineSpec,

    unit_coefficients: Slot<UnitCoefficients>,
    end_winding_reactance: Slot<f64>,
    armature_reaction_current: Slot<f64>,
    x_ad: Slot<f64>,
    leakage: Slot<LeakageReactance>,
    x_d: Slot<f64>,
    dissipation_factor: Slot<f64>,
    x_d_transient: Slot<f64>,
    x_d_subtransient: Slot<f64>,
    x_negative_sequence: Slot<f64>,
    x_zero_sequence: Slot<f64>,
    x_potier: Slot<f64>,
}

impl ReactanceModel {
    pub fn new(spec: &MachineSpec) -> Self {
        ReactanceModel {
            spec: spec.clone(),
            unit_coefficients: Slot::new("reactance.unit_coefficients"),
            end_winding_reactance: Slot::new("reactance.x_end"),
            armature_reaction_current: Slot::new("reactance.armature_reaction_current"),
            x_ad: Slot::new("reactance.x_ad"),
            leakage: Slot::new("reactance.x_leakage"),
            x_d: Slot::new("reactance.x_d"),
            dissipation_factor: Slot::new("reactance.dissipation_factor"),
            x_d_transient: Slot::new("reactance.x_d_transient"),
            x_d_subtransient: Slot::new("reactance.x_d_subtransient"),
            x_negative_sequence: Slot::new("reactance.x_negative_sequence"),
            x_zero_sequence: Slot::new("reactance.x_zero_sequence"),
            x_potier: Slot::new("reactance.x_potier"),
        }
    }

    // --- derived quantities, write-once ---

    pub fn compute_unit_coefficients(&mut self, stator: &StatorModel) -> DesignResult<()> {
        let beta = stator.pitch_ratio()?;
        let w1 = stator.turns_per_phase()?;
        let k_pitch = if beta > 2.0 / 3.0 {
            (3.0 * beta + 1.0) / 4.0
        } else {
            (6.0 * beta - 1.0) / 4.0
        };
        let k_x = 0.407 * w1 * w1 * self.spec.rated_current_a() * self.spec.frequency_hz
            * f64::from(self.spec.phase_count)
            / (15_000.0 * self.spec.pole_pairs() * self.spec.rated_voltage_v);
        let sg = stator.geometry();
        let core_length_cm = (self.spec.core_length_mm
            - 0.2 * f64::from(sg.vent_channel_count) * sg.vent_channel_width_mm)
            * 0.1;
        self.unit_coefficients.set(UnitCoefficients {
            k_pitch,
            k_x,
            core_length_cm,
        })
    }

    pub fn compute_end_winding_reactance(&mut self, stator: &StatorModel) -> DesignResult<()> {
        let k = self.unit_coefficients.get()?;
        let beta = stator.pitch_ratio()?;
        let x_end = 0.15 * k.k_x * (3.0 * beta - 1.0) * self.spec.core_inner_diameter_mm
            / self.spec.pole_pairs()
            / 1e3;
        self.end_winding_reactance.set(x_end)
    }

    /// Rated armature reaction referred to the field winding, A.
    pub fn compute_armature_reaction(
        &mut self,
        stator: &StatorModel,
        rotor: &RotorModel,
    ) -> DesignResult<()> {
        let mmf = 1.06 * self.spec.rated_current_a() * stator.turns_per_phase()?
            * stator.winding_factor()?
            * f64::from(self.spec.phase_count)
            / (3.0 * self.spec.pole_pairs());
        let referred = mmf / (rotor.winding_factor()? * rotor.turn_count()?);
        self.armature_reaction_current.set(referred)
    }

    /// Armature reaction reactance, p.u.
    pub fn compute_x_ad(&mut self, magnetic: &MagneticCircuitModel) -> DesignResult<()> {
        let x = self.armature_reaction_current.get()? / magnetic.magnetizing_current_a()?;
        self.x_ad.set(x)
    }

    /// Leakage reactance with slot, differential and end-winding terms, p.u.
    pub fn compute_leakage(&mut self, stator: &StatorModel) -> DesignResult<()> {
        let k = self.unit_coefficients.get()?;
        let x_end = self.end_winding_reactance.get()?;
        let x_ad = self.x_ad.get()?;
        let sg = stator.geometry();
        let delta = self.spec.air_gap_mm;
        let t1 = stator.tooth_pitch_mm()?;
        let zones = stator.coil_zone_heights();

        let slot = 2.0 * self.spec.pole_pairs() * k.core_length_cm * k.k_x * k.k_pitch
            / f64::from(sg.slot_count)
            * ((3.0 * zones.top_mm + zones.copper_mm) / (3.0 * sg.slot_width_mm)
                + 0.2
                + delta / (2.0 * t1 + delta / 2.0))
            / 100.0;

        let differential = 0.375 * delta * t1 * x_ad
            / (stator.pole_pitch_mm()?
                * stator.slots_per_pole_phase()?
                * f64::from(stator.winding().columns)
                * stator.conductor().width_mm);

        self.leakage.set(LeakageReactance {
            slot,
            differential,
            end_winding: x_end,
            total: slot + differential + x_end,
        })
    }

    /// Synchronous reactance, p.u.
    pub fn compute_x_d(&mut self) -> DesignResult<()> {
        let x = self.x_ad.get()? + self.leakage.get()?.total;
        self.x_d.set(x)
    }

    /// Field leakage (dissipation) factor of the rotor winding.
    pub fn compute_dissipation_factor(
        &mut self,
        rotor: &RotorModel,
        magnetic: &MagneticCircuitModel,
    ) -> DesignResult<()> {
        let rg = rotor.geometry();
        let ins = &rotor.winding().insulation;
        let h_s2 = rotor.slot_height_mm()?;
        let t2 = rotor.tooth_pitch_mm()?;
        let delta = self.spec.air_gap_mm;
        let slot_term = (2.0 * (rg.wedge_height_mm + ins.wedge_filling_mm) + h_s2
            - ins.bottom_filling_mm
            - ins.body_mm)
            / rg.slot_width_mm
            + delta / (2.0 * t2 + delta / 2.0);
        let sigma = 1.0
            + 0.0835 * magnetic.magnetizing_current_a()?
                * f64::from(rg.effective_wires)
                * self.spec.core_length_mm
                / (magnetic.rotor_flux_wb()? * rotor.winding_factor()?)
                * slot_term
                * 1e-8;
        self.dissipation_factor.set(sigma)
    }

    /// Transient reactance, p.u.
    pub fn compute_x_d_transient(&mut self) -> DesignResult<()> {
        let x = self.x_d.get()? - self.x_ad.get()? / self.dissipation_factor.get()?;
        self.x_d_transient.set(x)
    }

    /// Sub-transient reactance, p.u.
    pub fn compute_x_d_subtransient(&mut self) -> DesignResult<()> {
        let x = self.leakage.get()?.total + 0.025;
        self.x_d_subtransient.set(x)
    }

    /// Negative-sequence reactance, p.u.
    pub fn compute_x_negative_sequence(&mut self, rotor: &RotorModel) -> DesignResult<()> {
        let factor = if rotor.geometry().damper { 1.05 } else { 1.22 };
        let x = factor * self.x_d_subtransient.get()?;
        self.x_negative_sequence.set(x)
    }

    /// Zero-sequence reactance, p.u.
    ///
    /// Only a fraction of the slot field and of the mutual field survives
    /// when the three phase currents are equal; both fractions depend on the
    /// pitch shortening of the winding, with separate expressions either side
    /// of a two-thirds pitch.
    pub fn compute_x_zero_sequence(
        &mut self,
        stator: &StatorModel,
        rotor: &RotorModel,
    ) -> DesignResult<()> {
        let k = self.unit_coefficients.get()?;
        let x_ad = self.x_ad.get()?;
        let beta = stator.pitch_ratio()?;
        let sg = stator.geometry();
        let zones = stator.coil_zone_heights();

        let slot_scale = 2.0 * self.spec.pole_pairs() * k.k_x * k.core_length_cm
            / (f64::from(sg.slot_count) * sg.slot_width_mm);
        let mutual_scale =
            2.0 * x_ad * rotor.winding_factor()? / stator.winding_factor()?.powi(2);
        let pitch_sq = 4.0 * (self.spec.pole_pairs() / f64::from(sg.slot_count)).powi(2);

        let x = if beta > 2.0 / 3.0 {
            let d = beta - 2.0 / 3.0;
            slot_scale
                * ((3.0 * beta - 2.0) * zones.top_mm
                    + zones.copper_mm * (9.0 * beta - 5.0) / 12.0
                    - zones.insulation_mm * (9.0 * beta - 8.0) / 12.0)
                / 100.0
                + mutual_scale * d * (pitch_sq + 0.037 + 0.39 * d - d * d)
        } else {
            let d = 2.0 / 3.0 - beta;
            slot_scale
                * ((2.0 - 3.0 * beta) * zones.top_mm
                    + zones.copper_mm * (7.0 - 9.0 * beta) / 12.0
                    - zones.insulation_mm * (4.0 - 9.0 * beta) / 12.0)
                / 100.0
                + mutual_scale * d * (pitch_sq + 0.5 * d - d * d)
        };
        self.x_zero_sequence.set(x)
    }

    /// Potier reactance, p.u.
    pub fn compute_x_potier(&mut self, rotor: &RotorModel) -> DesignResult<()> {
        let mut x = 0.8 * self.x_d_transient.get()?;
        if rotor.banding().map(|b| b.magnetic).unwrap_or(false) {
            x += self.end_winding_reactance.get()? / 2.0;
        }
        self.x_potier.set(x)
    }

    // --- slot readers ---

    pub fn unit_coefficients(&self) -> DesignResult<UnitCoefficients> {
        self.unit_coefficients.get()
    }

    pub fn end_winding_reactance(&self) -> DesignResult<f64> {
        self.end_winding_reactance.get()
    }

    pub fn armature_reaction_current_a(&self) -> DesignResult<f64> {
        self.armature_reaction_current.get()
    }

    pub fn x_ad(&self) -> DesignResult<f64> {
        self.x_ad.get()
    }

    pub fn leakage(&self) -> DesignResult<LeakageReactance> {
        self.leakage.get()
    }

    pub fn x_d(&self) -> DesignResult<f64> {
        self.x_d.get()
    }

    pub fn dissipation_factor(&self) -> DesignResult<f64> {
        self.dissipation_factor.get()
    }

    pub fn x_d_transient(&self) -> DesignResult<f64> {
        self.x_d_transient.get()
    }

    pub fn x_d_subtransient(&self) -> DesignResult<f64> {
        self.x_d_subtransient.get()
    }

    pub fn x_negative_sequence(&self) -> DesignResult<f64> {
        self.x_negative_sequence.get()
    }

    pub fn x_zero_sequence(&self) -> DesignResult<f64> {
        self.x_zero_sequence.get()
    }

    pub fn x_potier(&self) -> DesignResult<f64> {
        self.x_potier.get()
    }

    /// Clear all derived quantities for a recompute.
    pub fn reset(&mut self) {
        self.unit_coefficients.reset();
        self.end_winding_reactance.reset();
        self.armature_reaction_current.reset();
        self.x_ad.reset();
        self.leakage.reset();
        self.x_d.reset();
        self.dissipation_factor.reset();
        self.x_d_transient.reset();
        self.x_d_subtransient.reset();
        self.x_negative_sequence.reset();
        self.x_zero_sequence.reset();
        self.x_potier.reset();
    }

    /// Run every reactance computation in dependency order.
    pub fn compute_all(
        &mut self,
        stator: &StatorModel,
        rotor: &RotorModel,
        magnetic: &MagneticCircuitModel,
    ) -> DesignResult<()> {
        self.compute_unit_coefficients(stator)?;
        self.compute_end_winding_reactance(stator)?;
        self.compute_armature_reaction(stator, rotor)?;
        self.compute_x_ad(magnetic)?;
        self.compute_leakage(stator)?;
        self.compute_x_d()?;
        self.compute_dissipation_factor(rotor, magnetic)?;
        self.compute_x_d_transient()?;
        self.compute_x_d_subtransient()?;
        self.compute_x_negative_sequence(rotor)?;
        self.compute_x_zero_sequence(stator, rotor)?;
        self.compute_x_potier(rotor)?;
        Ok(())
    }
}
