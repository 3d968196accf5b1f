//! # Loss Model
//!
//! Rated losses and efficiency: stator copper (with eddy field factor),
//! core losses from the specific-loss curves and active steel masses, stray
//! surface and pulsation losses from empirical coefficient tables,
//! excitation losses, and windage. All losses in kW.
//!
//! Terminal model of the chain; nothing reads it back.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::catalog::{interp_linear, COPPER_DENSITY_KG_M3, STEEL_DENSITY_KG_M3};
use crate::errors::{DesignError, DesignResult};
use crate::quantity::Slot;
use crate::spec::MachineSpec;

use super::magnetic::MagneticCircuitModel;
use super::rotor::RotorModel;
use super::stator::StatorModel;
use super::WindingTemperature;

/// Surface-loss coefficient over the rotor wound-surface ratio, 0.60..0.85.
static SURFACE_LOSS_BY_RATIO: Lazy<(Vec<f64>, Vec<f64>)> = Lazy::new(|| {
    let xs = (0..26).map(|i| 0.60 + 0.01 * f64::from(i)).collect();
    let ys = vec![
        12.8, 11.6, 10.4, 9.2, 8.2, 7.2, 6.4, 5.8, 5.4, 5.2, 5.2, 5.4, 5.6, 6.2, 6.6, 7.4, 8.0,
        8.8, 9.6, 10.6, 11.4, 12.4, 13.2, 14.0, 15.2, 16.2,
    ];
    (xs, ys)
});

/// Surface-loss coefficient over the stator pitch ratio, 0.40..1.00.
static SURFACE_LOSS_BY_PITCH: Lazy<(Vec<f64>, Vec<f64>)> = Lazy::new(|| {
    let xs = (0..61).map(|i| 0.40 + 0.01 * f64::from(i)).collect();
    let ys = vec![
        2.8, 3.2, 3.8, 4.4, 5.2, 6.2, 7.2, 8.6, 9.8, 11.1, 12.2, 13.2, 15.1, 16.3, 17.2, 18.6,
        19.6, 20.1, 20.3, 20.4, 21.5, 21.6, 21.3, 21.2, 20.9, 20.5, 19.8, 17.7, 16.8, 14.9, 13.4,
        11.8, 10.2, 8.6, 7.2, 5.7, 4.4, 3.1, 2.1, 1.6, 1.4, 1.4, 1.6, 2.1, 2.8, 4.0, 5.2, 6.4,
        7.8, 9.4, 11.8, 14.1, 16.5, 18.2, 20.4, 22.2, 23.3, 24.0, 24.5, 24.8, 25.0,
    ];
    (xs, ys)
});

/// Loss calculation inputs that are design decisions rather than geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossInputs {
    /// Build-up factor on the yoke core losses (stacking, machining burrs)
    pub core_loss_buildup: f64,
    /// Efficiency of the exciter feeding the field winding
    pub exciter_efficiency: f64,
}

impl LossInputs {
    pub fn validate(&self) -> DesignResult<()> {
        if self.core_loss_buildup < 1.0 {
            return Err(DesignError::invalid_spec(
                "losses.core_loss_buildup",
                self.core_loss_buildup,
                "must be at least 1",
            ));
        }
        if self.exciter_efficiency <= 0.0 || self.exciter_efficiency > 1.0 {
            return Err(DesignError::invalid_spec(
                "losses.exciter_efficiency",
                self.exciter_efficiency,
                "must be in (0, 1]",
            ));
        }
        Ok(())
    }
}

/// Active masses, kg.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Masses {
    pub stator_yoke_kg: f64,
    pub stator_teeth_kg: f64,
    pub stator_winding_kg: f64,
    pub rotor_winding_kg: f64,
}

/// Core losses, kW.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CoreLosses {
    pub yoke_kw: f64,
    pub teeth_kw: f64,
    pub total_kw: f64,
}

/// Stray load and no-load surface losses, kW.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StrayLosses {
    pub stator_surface_harmonic_kw: f64,
    pub stator_surface_tooth_kw: f64,
    pub tooth_pulsation_kw: f64,
    pub rotor_surface_harmonic_kw: f64,
    pub rotor_surface_tooth_kw: f64,
    pub rotor_no_load_surface_kw: f64,
    pub total_kw: f64,
}

/// Windage losses, kW.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MechanicalLosses {
    pub rotor_windage_kw: f64,
    pub banding_windage_kw: f64,
    pub total_kw: f64,
}

/// The loss model.
#[derive(Debug, Serialize)]
pub struct LossModel {
    #[serde(skip)]
    spec: MachineSpec,
    inputs: LossInputs,

    masses: Slot<Masses>,
    field_coefficient: Slot<f64>,
    copper: Slot<f64>,
    core: Slot<CoreLosses>,
    stray: Slot<StrayLosses>,
    excitation: Slot<f64>,
    mechanical: Slot<MechanicalLosses>,
}

impl LossModel {
    pub fn new(spec: &MachineSpec, inputs: LossInputs) -> DesignResult<Self> {
        inputs.validate()?;
        Ok(LossModel {
            spec: spec.clone(),
            inputs,
            masses: Slot::new("losses.masses"),
            field_coefficient: Slot::new("losses.field_coefficient"),
            copper: Slot::new("losses.copper"),
            core: Slot::new("losses.core"),
            stray: Slot::new("losses.stray"),
            excitation: Slot::new("losses.excitation"),
            mechanical: Slot::new("losses.mechanical"),
        })
    }

    /// Frequency scaling of iron and surface losses relative to 50 Hz.
    fn frequency_ratio(&self) -> f64 {
        (self.spec.frequency_hz / 50.0).powf(1.5)
    }

    // --- derived quantities, write-once ---

    /// Active steel and copper masses, kg.
    pub fn compute_masses(&mut self, stator: &StatorModel, rotor: &RotorModel) -> DesignResult<()> {
        use std::f64::consts::PI;
        let l_eff = stator.effective_length_mm()?;
        let d_a = self.spec.core_outer_diameter_mm;
        let d_i = self.spec.core_inner_diameter_mm;
        let d_bottom = stator.diameter_at_bottom_mm();
        let sg = stator.geometry();

        let stator_yoke_kg =
            STEEL_DENSITY_KG_M3 * PI / 4.0 * (d_a * d_a - d_bottom * d_bottom) * l_eff * 1e-9;
        let stator_teeth_kg = STEEL_DENSITY_KG_M3
            * l_eff
            * (PI / 4.0 * (d_bottom * d_bottom - d_i * d_i)
                - f64::from(sg.slot_count) * sg.slot_height_mm * sg.slot_width_mm)
            * 1e-9;
        let stator_winding_kg = COPPER_DENSITY_KG_M3
            * f64::from(self.spec.phase_count)
            * f64::from(stator.winding().parallel_branches)
            * stator.conductor_section_mm2()
            * stator.turn_length_mm()?
            * stator.turns_per_phase()?
            * 1e-9;
        let rotor_winding_kg = COPPER_DENSITY_KG_M3
            * 4.0
            * self.spec.pole_pairs()
            * f64::from(rotor.winding().parallel_branches)
            * rotor.turn_count()?
            * rotor.conductor().section_mm2
            * (self.spec.core_length_mm + rotor.end_part_length_mm())
            * 1e-9;

        self.masses.set(Masses {
            stator_yoke_kg,
            stator_teeth_kg,
            stator_winding_kg,
            rotor_winding_kg,
        })
    }

    /// Field (eddy) coefficient of the stator copper losses.
    pub fn compute_field_coefficient(&mut self, stator: &StatorModel) -> DesignResult<()> {
        let winding = stator.winding();
        let conductor = stator.conductor();
        let sg = stator.geometry();
        let strands_across = f64::from(winding.rows) * f64::from(winding.columns)
            * conductor.width_mm
            * f64::from(sg.effective_wires)
            / sg.slot_width_mm
            * (self.spec.frequency_hz / 50.0);
        let k = 1.0
            + 0.107 * strands_across * strands_across * (conductor.height_mm / 10.0).powi(4);
        self.field_coefficient.set(k)
    }

    /// Stator copper losses at 75 °C including eddy losses, kW.
    pub fn compute_copper(&mut self, stator: &StatorModel) -> DesignResult<()> {
        let i = self.spec.rated_current_a();
        let r75 = stator.resistance_at(WindingTemperature::C75)?;
        let ohmic = f64::from(self.spec.phase_count) * r75 * i * i / 1e3;
        self.copper.set(ohmic * self.field_coefficient.get()?)
    }

    /// Core losses of yoke and teeth, kW.
    pub fn compute_core(
        &mut self,
        magnetic: &MagneticCircuitModel,
    ) -> DesignResult<()> {
        let masses = self.masses.get()?;
        let b = magnetic.stator_flux_densities_t()?;
        let w_yoke = magnetic.stator_yoke_steel().specific_loss(b.yoke)?;
        let w_teeth = magnetic.stator_teeth_steel().specific_loss(b.teeth)?;
        let fr = self.frequency_ratio();
        let yoke_kw =
            1.3 * self.inputs.core_loss_buildup * w_yoke * masses.stator_yoke_kg * fr / 1e3;
        let teeth_kw = 1.5 * w_teeth * masses.stator_teeth_kg * fr / 1e3;
        self.core.set(CoreLosses {
            yoke_kw,
            teeth_kw,
            total_kw: yoke_kw + teeth_kw,
        })
    }

    /// Stray surface and pulsation losses, kW.
    pub fn compute_stray(
        &mut self,
        stator: &StatorModel,
        rotor: &RotorModel,
        magnetic: &MagneticCircuitModel,
    ) -> DesignResult<()> {
        let masses = self.masses.get()?;
        let fr = self.frequency_ratio();
        let delta = self.spec.air_gap_mm;
        let p = self.spec.pole_pairs();
        let d_i = self.spec.core_inner_diameter_mm;
        let d_2 = rotor.outer_diameter_mm();
        let length = self.spec.core_length_mm;
        let l_eff = stator.effective_length_mm()?;
        let slots_1 = f64::from(stator.geometry().slot_count);
        let pitches_2 = f64::from(rotor.geometry().slot_pitch_count);
        let gamma = rotor.surface_ratio()?;
        let beta = stator.pitch_ratio()?;
        let k_delta = magnetic.air_gap_coefficient()?;
        let total_mmf = magnetic.total_mmf_a()?;
        let current_load = stator.current_load_a_cm()?;
        let b_gap = magnetic.stator_flux_densities_t()?.air_gap;

        // squared specific MMF across the effective gap
        let mmf_sq = (total_mmf / (k_delta * delta)).powi(2) * fr;

        let (gamma_grid, gamma_coeff) = &*SURFACE_LOSS_BY_RATIO;
        let stator_surface_harmonic_kw =
            interp_linear("surface loss by ratio", gamma_grid, gamma_coeff, gamma)?
                * mmf_sq
                * l_eff
                * d_i.powi(3)
                / d_2.powf(3.5)
                / 10f64.powf(7.5);

        let gap_angle = 2.0 * std::f64::consts::PI * delta / rotor.tooth_pitch_mm()?;
        let damping = (gap_angle / gap_angle.sinh()).powi(2);
        let tooth_coeff = 5e4 / gamma * (p / pitches_2).powf(2.5);
        let stator_surface_tooth_kw =
            tooth_coeff * damping * mmf_sq * l_eff * d_i.powi(3) / (p * p) / 1e18;

        let tooth_pulsation_kw =
            12.5 / gamma * damping * mmf_sq * masses.stator_teeth_kg / pitches_2.sqrt() / 1e9;

        let (beta_grid, beta_coeff) = &*SURFACE_LOSS_BY_PITCH;
        let rotor_surface_harmonic_kw =
            interp_linear("surface loss by pitch", beta_grid, beta_coeff, beta)? * fr
                * d_i.powi(5)
                / p.powi(4)
                * length
                * (current_load / (k_delta * delta)).powi(2)
                / 1e20;

        let slot_angle = 2.0 * std::f64::consts::PI * delta / stator.tooth_pitch_mm()?;
        let slot_coeff = 62.7 * (stator.winding_factor()? / slot_angle.sinh()).powi(2);
        let rotor_surface_tooth_kw = slot_coeff * fr * current_load * current_load * d_i.powi(3)
            / p.powf(1.5)
            * length
            / slots_1.sqrt()
            / 1e16;

        let slotting = magnetic.carter_coefficients()?.stator_slotting;
        let rotor_no_load_surface_kw = 5.1 / slots_1.sqrt() * l_eff * fr * d_i.powi(3)
            / p.powf(1.5)
            * (b_gap * (slotting - 1.0)).powi(2)
            / 1e8;

        let total_kw = stator_surface_harmonic_kw
            + stator_surface_tooth_kw
            + tooth_pulsation_kw
            + rotor_surface_harmonic_kw
            + rotor_surface_tooth_kw
            + rotor_no_load_surface_kw;
        self.stray.set(StrayLosses {
            stator_surface_harmonic_kw,
            stator_surface_tooth_kw,
            tooth_pulsation_kw,
            rotor_surface_harmonic_kw,
            rotor_surface_tooth_kw,
            rotor_no_load_surface_kw,
            total_kw,
        })
    }

    /// Excitation system losses at the no-load field point, kW.
    pub fn compute_excitation(
        &mut self,
        rotor: &RotorModel,
        magnetic: &MagneticCircuitModel,
    ) -> DesignResult<()> {
        let i_f = magnetic.field_current_a()?;
        let r_f = rotor.resistance_at(WindingTemperature::C75)?;
        // 2 V standing brush drop
        let p = (i_f * i_f * r_f + 2.0 * i_f) / self.inputs.exciter_efficiency / 1e3;
        self.excitation.set(p)
    }

    /// Windage of the rotor body and the retaining rings, kW.
    pub fn compute_mechanical(&mut self, rotor: &RotorModel) -> DesignResult<()> {
        let speed_ratio = self.spec.frequency_hz / (50.0 * self.spec.pole_pairs());
        let rotor_windage_kw = 57.3 * speed_ratio.powi(3) * self.spec.core_length_mm
            * rotor.outer_diameter_mm().powi(4)
            / 1e15;
        let banding_windage_kw = match rotor.banding() {
            Some(banding) => {
                25.0 * speed_ratio.powi(3) * banding.ring_width_mm
                    * banding.outer_diameter_mm.powi(4)
                    / 1e15
            }
            None => 0.0,
        };
        self.mechanical.set(MechanicalLosses {
            rotor_windage_kw,
            banding_windage_kw,
            total_kw: rotor_windage_kw + banding_windage_kw,
        })
    }

    // --- slot readers ---

    pub fn masses(&self) -> DesignResult<Masses> {
        self.masses.get()
    }

    pub fn field_coefficient(&self) -> DesignResult<f64> {
        self.field_coefficient.get()
    }

    pub fn copper_kw(&self) -> DesignResult<f64> {
        self.copper.get()
    }

    pub fn core_kw(&self) -> DesignResult<CoreLosses> {
        self.core.get()
    }

    pub fn stray_kw(&self) -> DesignResult<StrayLosses> {
        self.stray.get()
    }

    pub fn excitation_kw(&self) -> DesignResult<f64> {
        self.excitation.get()
    }

    pub fn mechanical_kw(&self) -> DesignResult<MechanicalLosses> {
        self.mechanical.get()
    }

    /// Sum of all losses, kW.
    pub fn total_losses_kw(&self) -> DesignResult<f64> {
        Ok(self.copper.get()?
            + self.core.get()?.total_kw
            + self.stray.get()?.total_kw
            + self.excitation.get()?
            + self.mechanical.get()?.total_kw)
    }

    /// Efficiency at rated active power.
    pub fn efficiency(&self) -> DesignResult<f64> {
        let rated_kw = self.spec.rated_power_kva * self.spec.power_factor;
        Ok(rated_kw / (rated_kw + self.total_losses_kw()?))
    }

    /// Clear all derived quantities for a recompute.
    pub fn reset(&mut self) {
        self.masses.reset();
        self.field_coefficient.reset();
        self.copper.reset();
        self.core.reset();
        self.stray.reset();
        self.excitation.reset();
        self.mechanical.reset();
    }

    /// Run every loss computation in dependency order.
    pub fn compute_all(
        &mut self,
        stator: &StatorModel,
        rotor: &RotorModel,
        magnetic: &MagneticCircuitModel,
    ) -> DesignResult<()> {
        self.compute_masses(stator, rotor)?;
        self.compute_field_coefficient(stator)?;
        self.compute_copper(stator)?;
        self.compute_core(magnetic)?;
        self.compute_stray(stator, rotor, magnetic)?;
        self.compute_excitation(rotor, magnetic)?;
        self.compute_mechanical(rotor)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::rotor::{RotorGeometry, RotorInsulation, RotorWinding};
    use crate::machine::stator::{StatorGeometry, StatorInsulation, StatorWinding};

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

    fn inputs() -> LossInputs {
        LossInputs {
            core_loss_buildup: 1.0,
            exciter_efficiency: 0.85,
        }
    }

    fn stator() -> StatorModel {
        let mut s = StatorModel::new(
            &spec(),
            StatorGeometry {
                slot_count: 72,
                slot_height_mm: 160.0,
                slot_width_mm: 21.0,
                slit_height_mm: 1.0,
                wedge_height_mm: 5.0,
                effective_wires: 3,
                vent_channel_count: 30,
                vent_channel_width_mm: 10.0,
                fill_factor: 0.93,
                stud_diameter_mm: None,
            },
            StatorWinding {
                rows: 12,
                columns: 2,
                slot_span: 15,
                parallel_branches: 2,
                conductor_id: Some("strand-2.24x10.0".to_string()),
                arrangement_allowance_mm: 0.3,
                insulation: StatorInsulation {
                    turn_mm: 0.0,
                    body_height_mm: 4.84,
                    body_width_mm: 4.84,
                    semiconducting_mm: 0.4,
                    column_wrap_mm: 0.2,
                    wedge_filling_mm: 0.5,
                    coil_filling_mm: 4.0,
                    bottom_filling_mm: 0.5,
                },
            },
        )
        .unwrap();
        s.compute_all().unwrap();
        s
    }

    fn rotor() -> RotorModel {
        let mut r = RotorModel::new(
            &spec(),
            RotorGeometry {
                slot_count: 24,
                slot_pitch_count: 36,
                slot_width_mm: 32.0,
                wedge_height_mm: 30.0,
                wedge_width_mm: 32.0,
                effective_wires: 24,
                inner_diameter_mm: 0.0,
                damper: false,
            },
            RotorWinding {
                parallel_branches: 1,
                conductor_id: "bus-8.0x35.5".to_string(),
                insulation: RotorInsulation {
                    turn_mm: 0.8,
                    body_mm: 2.0,
                    wedge_filling_mm: 3.0,
                    bottom_filling_mm: 1.5,
                },
            },
            None,
        )
        .unwrap();
        r.compute_all().unwrap();
        r
    }

    fn solved() -> LossModel {
        let s = stator();
        let r = rotor();
        let mut m = MagneticCircuitModel::new(&spec(), "2414", "2414", "35hn3mfa").unwrap();
        m.compute_all(&s, &r).unwrap();
        let mut l = LossModel::new(&spec(), inputs()).unwrap();
        l.compute_all(&s, &r, &m).unwrap();
        l
    }

    fn close(a: f64, b: f64, rel: f64) -> bool {
        (a - b).abs() <= rel * b.abs().max(1e-12)
    }

    #[test]
    fn test_masses() {
        let l = solved();
        let m = l.masses().unwrap();
        assert!(close(m.stator_yoke_kg, 25511.2, 1e-4));
        assert!(close(m.stator_teeth_kg, 7997.43, 1e-4));
        assert!(close(m.stator_winding_kg, 3848.61, 1e-4));
        assert!(close(m.rotor_winding_kg, 3344.50, 1e-4));
    }

    #[test]
    fn test_copper_losses() {
        let l = solved();
        assert!(close(l.field_coefficient().unwrap(), 1.316667, 1e-5));
        assert!(close(l.copper_kw().unwrap(), 329.059, 1e-4));
    }

    #[test]
    fn test_core_losses() {
        let l = solved();
        let core = l.core_kw().unwrap();
        assert!(close(core.yoke_kw, 90.1181, 1e-4));
        assert!(close(core.teeth_kw, 42.5428, 1e-4));
    }

    #[test]
    fn test_stray_losses() {
        let l = solved();
        let stray = l.stray_kw().unwrap();
        assert!(close(stray.stator_surface_harmonic_kw, 21.4789, 1e-4));
        assert!(close(stray.stator_surface_tooth_kw, 25.0323, 1e-4));
        assert!(close(stray.tooth_pulsation_kw, 9.75980, 1e-4));
        assert!(close(stray.rotor_surface_harmonic_kw, 18.7497, 1e-4));
        assert!(close(stray.rotor_surface_tooth_kw, 2.96739, 1e-4));
        assert!(close(stray.rotor_no_load_surface_kw, 13.2551, 1e-4));
        assert!(close(stray.total_kw, 91.2432, 1e-4));
    }

    #[test]
    fn test_excitation_and_mechanical() {
        let l = solved();
        assert!(close(l.excitation_kw().unwrap(), 138.328, 1e-4));
        let mech = l.mechanical_kw().unwrap();
        assert!(close(mech.rotor_windage_kw, 42.0726, 1e-4));
        assert_eq!(mech.banding_windage_kw, 0.0);
    }

    #[test]
    fn test_totals_and_efficiency() {
        let l = solved();
        assert!(close(l.total_losses_kw().unwrap(), 733.363, 1e-4));
        assert!(close(l.efficiency().unwrap(), 0.991446, 1e-5));
    }

    #[test]
    fn test_banding_windage() {
        use crate::machine::rotor::RotorBanding;
        let s = stator();
        let mut r = RotorModel::new(
            &spec(),
            rotor().geometry().clone(),
            rotor().winding().clone(),
            Some(RotorBanding {
                outer_diameter_mm: 1150.0,
                inner_diameter_mm: 1000.0,
                ring_width_mm: 250.0,
                axial_offset_mm: 50.0,
                magnetic: false,
            }),
        )
        .unwrap();
        r.compute_all().unwrap();
        let mut m = MagneticCircuitModel::new(&spec(), "2414", "2414", "35hn3mfa").unwrap();
        m.compute_all(&s, &r).unwrap();
        let mut l = LossModel::new(&spec(), inputs()).unwrap();
        l.compute_all(&s, &r, &m).unwrap();
        let mech = l.mechanical_kw().unwrap();
        // 25 * (1/2)^3 * 250 * 1150^4 / 1e15
        assert!(close(mech.banding_windage_kw, 1.36672, 1e-3));
    }

    #[test]
    fn test_invalid_exciter_efficiency_rejected() {
        let mut bad = inputs();
        bad.exciter_efficiency = 0.0;
        let err = LossModel::new(&spec(), bad).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SPEC");
    }
}
