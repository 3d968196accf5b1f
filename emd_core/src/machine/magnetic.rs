//! # Magnetic Circuit Model
//!
//! No-load magnetic circuit of the machine, solved segment by segment: air
//! gap, stator yoke, stator teeth, rotor yoke, rotor teeth at 0.2 and 0.7 of
//! the slot height. The terminal quantity is the total excitation MMF, from
//! which the no-load field and magnetizing currents follow.
//!
//! The rotor segments see more than the main flux: slot leakage (and banding
//! leakage when the retaining rings are magnetic) is added before the rotor
//! flux densities are formed. Rotor teeth saturating beyond 2.05 T are
//! handled with the flux-branching correction instead of the B-H curve.

use serde::Serialize;

use crate::catalog::{SteelCatalog, SteelRecord};
use crate::errors::DesignResult;
use crate::quantity::Slot;
use crate::spec::MachineSpec;

use super::rotor::RotorModel;
use super::stator::StatorModel;

/// Line lengths and flux sections of every circuit segment.
///
/// Yoke sections are doubled here: the yoke carries half the pole flux each
/// way round, so the flux density divisor is twice the radial section.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CircuitGeometry {
    pub air_gap_line_cm: f64,
    pub stator_yoke_line_cm: f64,
    pub stator_tooth_line_cm: f64,
    pub rotor_yoke_line_cm: f64,
    pub rotor_tooth_half_line_cm: f64,
    pub air_gap_section_m2: f64,
    pub stator_yoke_section_m2: f64,
    pub stator_teeth_section_m2: f64,
    pub rotor_yoke_section_m2: f64,
    pub rotor_teeth_section_02_m2: f64,
    pub rotor_teeth_section_07_m2: f64,
    pub rotor_branching_02: f64,
    pub rotor_branching_07: f64,
}

/// Carter coefficient broken into its gap-lengthening components.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CarterCoefficients {
    pub stator_slotting: f64,
    pub vent_channels: f64,
    pub end_steps: f64,
    pub rotor_slotting: f64,
    pub total: f64,
}

/// Flux densities or field strengths of the stator-side segments.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatorSegments {
    pub air_gap: f64,
    pub yoke: f64,
    pub teeth: f64,
}

/// Flux densities or field strengths of the rotor-side segments.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RotorSegments {
    pub yoke: f64,
    pub teeth_02: f64,
    pub teeth_07: f64,
}

/// One point of the no-load characteristic.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NoLoadPoint {
    /// Terminal voltage, p.u. of rated
    pub voltage_pu: f64,
    /// Field current producing it, A
    pub field_current_a: f64,
}

/// Sampling of the no-load characteristic, 0 to 1.2 p.u.
const NO_LOAD_POINTS: usize = 30;
const NO_LOAD_CEILING_PU: f64 = 1.2;

/// The magnetic circuit model.
#[derive(Debug, Serialize)]
pub struct MagneticCircuitModel {
    #[serde(skip)]
    spec: MachineSpec,
    stator_yoke_steel_id: String,
    stator_teeth_steel_id: String,
    rotor_steel_id: String,
    #[serde(skip)]
    stator_yoke_steel: &'static SteelRecord,
    #[serde(skip)]
    stator_teeth_steel: &'static SteelRecord,
    #[serde(skip)]
    rotor_steel: &'static SteelRecord,

    geometry: Slot<CircuitGeometry>,
    air_gap_coefficient: Slot<CarterCoefficients>,
    slot_leakage_permeance: Slot<f64>,
    main_flux: Slot<f64>,
    stator_flux_density: Slot<StatorSegments>,
    stator_field_strength: Slot<StatorSegments>,
    stator_mmf: Slot<f64>,
    slot_leakage_flux: Slot<f64>,
    banding_leakage_flux: Slot<f64>,
    rotor_flux: Slot<f64>,
    rotor_flux_density: Slot<RotorSegments>,
    rotor_field_strength: Slot<RotorSegments>,
    total_mmf: Slot<f64>,
    saturation_coefficient: Slot<f64>,
    field_current: Slot<f64>,
    magnetizing_current: Slot<f64>,
}

impl MagneticCircuitModel {
    pub fn new(
        spec: &MachineSpec,
        stator_yoke_steel: &str,
        stator_teeth_steel: &str,
        rotor_steel: &str,
    ) -> DesignResult<Self> {
        let catalog = SteelCatalog::global();
        Ok(MagneticCircuitModel {
            spec: spec.clone(),
            stator_yoke_steel_id: stator_yoke_steel.to_string(),
            stator_teeth_steel_id: stator_teeth_steel.to_string(),
            rotor_steel_id: rotor_steel.to_string(),
            stator_yoke_steel: catalog.lookup(stator_yoke_steel)?,
            stator_teeth_steel: catalog.lookup(stator_teeth_steel)?,
            rotor_steel: catalog.lookup(rotor_steel)?,
            geometry: Slot::new("magnetic.geometry"),
            air_gap_coefficient: Slot::new("magnetic.air_gap_coefficient"),
            slot_leakage_permeance: Slot::new("magnetic.slot_leakage_permeance"),
            main_flux: Slot::new("magnetic.main_flux"),
            stator_flux_density: Slot::new("magnetic.stator_flux_density"),
            stator_field_strength: Slot::new("magnetic.stator_field_strength"),
            stator_mmf: Slot::new("magnetic.stator_mmf"),
            slot_leakage_flux: Slot::new("magnetic.slot_leakage_flux"),
            banding_leakage_flux: Slot::new("magnetic.banding_leakage_flux"),
            rotor_flux: Slot::new("magnetic.rotor_flux"),
            rotor_flux_density: Slot::new("magnetic.rotor_flux_density"),
            rotor_field_strength: Slot::new("magnetic.rotor_field_strength"),
            total_mmf: Slot::new("magnetic.total_mmf"),
            saturation_coefficient: Slot::new("magnetic.saturation_coefficient"),
            field_current: Slot::new("magnetic.field_current"),
            magnetizing_current: Slot::new("magnetic.magnetizing_current"),
        })
    }

    pub fn stator_yoke_steel(&self) -> &'static SteelRecord {
        self.stator_yoke_steel
    }

    pub fn stator_teeth_steel(&self) -> &'static SteelRecord {
        self.stator_teeth_steel
    }

    pub fn rotor_steel(&self) -> &'static SteelRecord {
        self.rotor_steel
    }

    // --- derived quantities, write-once ---

    /// Collect line lengths and sections from the machine geometry.
    pub fn compute_geometry(
        &mut self,
        stator: &StatorModel,
        rotor: &RotorModel,
    ) -> DesignResult<()> {
        let gamma = rotor.surface_ratio()?;
        let g = CircuitGeometry {
            air_gap_line_cm: self.spec.air_gap_mm * 0.1,
            stator_yoke_line_cm: stator.yoke_line_cm(gamma)?,
            stator_tooth_line_cm: stator.tooth_line_cm(),
            rotor_yoke_line_cm: rotor.yoke_line_cm()?,
            rotor_tooth_half_line_cm: rotor.tooth_half_line_cm()?,
            air_gap_section_m2: rotor.air_gap_section_m2()?,
            stator_yoke_section_m2: 2.0 * stator.yoke_section_m2()?,
            stator_teeth_section_m2: stator.teeth_section_m2()?,
            rotor_yoke_section_m2: 2.0 * rotor.yoke_section_m2()?,
            rotor_teeth_section_02_m2: rotor.teeth_section_02_m2()?,
            rotor_teeth_section_07_m2: rotor.teeth_section_07_m2()?,
            rotor_branching_02: rotor.flow_branching_02()?,
            rotor_branching_07: rotor.flow_branching_07()?,
        };
        self.geometry.set(g)
    }

    /// Carter coefficient of the double-slotted, vented air gap.
    pub fn compute_air_gap_coefficient(
        &mut self,
        stator: &StatorModel,
        rotor: &RotorModel,
    ) -> DesignResult<()> {
        let delta = self.spec.air_gap_mm;
        let length = self.spec.core_length_mm;
        let sg = stator.geometry();
        let b_s1 = sg.slot_width_mm;
        let t1 = stator.tooth_pitch_mm()?;

        let stator_slotting = 1.0 + b_s1 * b_s1 / (t1 * (b_s1 + 5.0 * delta) - b_s1 * b_s1);

        let vent_channels = if sg.vent_channel_count > 0 {
            let b_v = sg.vent_channel_width_mm;
            let packet =
                (length - f64::from(sg.vent_channel_count) * b_v) / f64::from(sg.vent_channel_count + 1);
            1.0 + b_v * b_v / ((b_v + packet) * (5.0 * delta + b_v) - b_v * b_v)
        } else {
            1.0
        };

        let end_steps = 1.0 + 5.0 / (delta * length).sqrt();

        let gamma = rotor.surface_ratio()?;
        let b_s2 = rotor.geometry().slot_width_mm;
        let t2 = rotor.tooth_pitch_mm()?;
        let rotor_slotting =
            1.0 + gamma / 2.0 * b_s2 * b_s2 / (t2 * (b_s2 + 5.0 * delta) - b_s2 * b_s2);

        let total = stator_slotting + vent_channels + end_steps + rotor_slotting - 3.0;
        self.air_gap_coefficient.set(CarterCoefficients {
            stator_slotting,
            vent_channels,
            end_steps,
            rotor_slotting,
            total,
        })
    }

    /// Specific permeance of the rotor slot leakage path, per pole.
    pub fn compute_slot_leakage_permeance(&mut self, rotor: &RotorModel) -> DesignResult<()> {
        let rg = rotor.geometry();
        let ins = &rotor.winding().insulation;
        let h_s2 = rotor.slot_height_mm()?;
        let t2 = rotor.tooth_pitch_mm()?;
        let delta = self.spec.air_gap_mm;
        let copper_zone =
            h_s2 - rg.wedge_height_mm - ins.total_fillings_mm() - ins.body_mm;
        let lambda = self.spec.core_length_mm * self.spec.pole_pairs()
            / f64::from(rg.slot_count)
            * (copper_zone / (2.0 * rg.slot_width_mm)
                + (ins.wedge_filling_mm + rg.wedge_height_mm) / rg.wedge_width_mm
                + delta / (2.0 * t2 + delta / 2.0));
        self.slot_leakage_permeance.set(lambda)
    }

    /// Main flux per pole from the EMF equation, Wb.
    pub fn compute_main_flux(&mut self, stator: &StatorModel) -> DesignResult<()> {
        let w1 = stator.turns_per_phase()?;
        let k_w = stator.winding_factor()?;
        let phi = self.spec.phase_voltage_v() / (4.44 * self.spec.frequency_hz * w1 * k_w);
        self.main_flux.set(phi)
    }

    /// Flux densities of the air gap and stator segments, T.
    pub fn compute_stator_flux_densities(&mut self) -> DesignResult<()> {
        let g = self.geometry.get()?;
        let phi = self.main_flux.get()?;
        self.stator_flux_density.set(StatorSegments {
            air_gap: phi / g.air_gap_section_m2,
            yoke: phi / g.stator_yoke_section_m2,
            teeth: phi / g.stator_teeth_section_m2,
        })
    }

    /// Field strengths of the air gap and stator segments, A/cm.
    pub fn compute_stator_field_strengths(&mut self, rotor: &RotorModel) -> DesignResult<()> {
        let b = self.stator_flux_density.get()?;
        let k_delta = self.air_gap_coefficient.get()?.total;
        let gamma = rotor.surface_ratio()?;

        let air_gap = 8e3 * k_delta * b.air_gap;
        // yoke flux crowds toward the back of the core under a turbo field form
        let yoke_effective = b.yoke * (18.0 - 10.0 * gamma) / (18.0 - 9.0 * gamma);
        let yoke = self.stator_yoke_steel.field_strength(yoke_effective)?;
        let teeth = self.stator_teeth_steel.field_strength(b.teeth)?;
        self.stator_field_strength.set(StatorSegments {
            air_gap,
            yoke,
            teeth,
        })
    }

    /// MMF of the gap and stator segments per pole, A.
    pub fn compute_stator_mmf(&mut self) -> DesignResult<()> {
        let g = self.geometry.get()?;
        let h = self.stator_field_strength.get()?;
        let f = h.air_gap * g.air_gap_line_cm
            + h.yoke * g.stator_yoke_line_cm
            + h.teeth * g.stator_tooth_line_cm;
        self.stator_mmf.set(f)
    }

    /// Rotor slot leakage flux per pole, Wb.
    pub fn compute_slot_leakage_flux(&mut self) -> DesignResult<()> {
        let lambda = self.slot_leakage_permeance.get()?;
        let f_st = self.stator_mmf.get()?;
        self.slot_leakage_flux.set(lambda * f_st * 1e-8)
    }

    /// Leakage through magnetic retaining rings, Wb (zero otherwise).
    pub fn compute_banding_leakage_flux(&mut self, rotor: &RotorModel) -> DesignResult<()> {
        let phi = match rotor.banding() {
            Some(banding) if banding.magnetic => {
                let phi_main = self.main_flux.get()?;
                1.2 * (banding.outer_diameter_mm - banding.inner_diameter_mm)
                    / self.spec.core_length_mm
                    * self.spec.air_gap_mm
                    * phi_main
                    / banding.axial_offset_mm
            }
            _ => 0.0,
        };
        self.banding_leakage_flux.set(phi)
    }

    /// Total flux carried by the rotor body, Wb.
    pub fn compute_rotor_flux(&mut self) -> DesignResult<()> {
        let phi = self.main_flux.get()?
            + self.slot_leakage_flux.get()?
            + self.banding_leakage_flux.get()?;
        self.rotor_flux.set(phi)
    }

    /// Flux densities of the rotor segments, T.
    pub fn compute_rotor_flux_densities(&mut self) -> DesignResult<()> {
        let g = self.geometry.get()?;
        let phi = self.rotor_flux.get()?;
        self.rotor_flux_density.set(RotorSegments {
            yoke: phi / g.rotor_yoke_section_m2,
            teeth_02: phi / g.rotor_teeth_section_02_m2,
            teeth_07: phi / g.rotor_teeth_section_07_m2,
        })
    }

    /// Field strengths of the rotor segments, A/cm.
    pub fn compute_rotor_field_strengths(&mut self, rotor: &RotorModel) -> DesignResult<()> {
        let b = self.rotor_flux_density.get()?;
        let g = self.geometry.get()?;
        let yoke = self.rotor_steel.field_strength(b.yoke)? * rotor.yoke_saturation_factor();
        let teeth_02 = self.rotor_tooth_field_strength(b.teeth_02, g.rotor_branching_02)?;
        let teeth_07 = self.rotor_tooth_field_strength(b.teeth_07, g.rotor_branching_07)?;
        self.rotor_field_strength.set(RotorSegments {
            yoke,
            teeth_02,
            teeth_07,
        })
    }

    /// Tooth field strength with the high-saturation branching correction.
    ///
    /// Beyond 2.05 T part of the flux is carried by the slot contents; the
    /// linearized correction replaces the B-H curve there.
    fn rotor_tooth_field_strength(&self, flux_density: f64, branching: f64) -> DesignResult<f64> {
        if flux_density > 2.05 {
            return Ok((flux_density - 1.956) * 5.2 / (8.0 + 6.5 * branching) * 1e4);
        }
        self.rotor_steel.field_strength(flux_density)
    }

    /// Total excitation MMF per pole at no load, A.
    pub fn compute_total_mmf(&mut self) -> DesignResult<()> {
        let g = self.geometry.get()?;
        let h = self.rotor_field_strength.get()?;
        let f = self.stator_mmf.get()?
            + h.yoke * g.rotor_yoke_line_cm
            + h.teeth_02 * g.rotor_tooth_half_line_cm
            + h.teeth_07 * g.rotor_tooth_half_line_cm;
        self.total_mmf.set(f)
    }

    /// Saturation coefficient, total MMF over air-gap MMF.
    pub fn compute_saturation_coefficient(&mut self) -> DesignResult<()> {
        let k = self.total_mmf.get()? / self.air_gap_mmf()?;
        self.saturation_coefficient.set(k)
    }

    /// No-load field current, A.
    pub fn compute_field_current(&mut self, rotor: &RotorModel) -> DesignResult<()> {
        let i = self.total_mmf.get()? / rotor.turn_count()?;
        self.field_current.set(i)
    }

    /// Magnetizing current, A (air-gap MMF referred to the field winding).
    pub fn compute_magnetizing_current(&mut self, rotor: &RotorModel) -> DesignResult<()> {
        let i = self.air_gap_mmf()? / rotor.turn_count()?;
        self.magnetizing_current.set(i)
    }

    // --- slot readers ---

    pub fn circuit_geometry(&self) -> DesignResult<CircuitGeometry> {
        self.geometry.get()
    }

    pub fn air_gap_coefficient(&self) -> DesignResult<f64> {
        Ok(self.air_gap_coefficient.get()?.total)
    }

    pub fn carter_coefficients(&self) -> DesignResult<CarterCoefficients> {
        self.air_gap_coefficient.get()
    }

    pub fn slot_leakage_permeance(&self) -> DesignResult<f64> {
        self.slot_leakage_permeance.get()
    }

    pub fn main_flux_wb(&self) -> DesignResult<f64> {
        self.main_flux.get()
    }

    pub fn stator_flux_densities_t(&self) -> DesignResult<StatorSegments> {
        self.stator_flux_density.get()
    }

    pub fn stator_field_strengths_a_cm(&self) -> DesignResult<StatorSegments> {
        self.stator_field_strength.get()
    }

    pub fn stator_mmf_a(&self) -> DesignResult<f64> {
        self.stator_mmf.get()
    }

    pub fn slot_leakage_flux_wb(&self) -> DesignResult<f64> {
        self.slot_leakage_flux.get()
    }

    pub fn banding_leakage_flux_wb(&self) -> DesignResult<f64> {
        self.banding_leakage_flux.get()
    }

    pub fn rotor_flux_wb(&self) -> DesignResult<f64> {
        self.rotor_flux.get()
    }

    pub fn rotor_flux_densities_t(&self) -> DesignResult<RotorSegments> {
        self.rotor_flux_density.get()
    }

    pub fn rotor_field_strengths_a_cm(&self) -> DesignResult<RotorSegments> {
        self.rotor_field_strength.get()
    }

    pub fn total_mmf_a(&self) -> DesignResult<f64> {
        self.total_mmf.get()
    }

    pub fn saturation_coefficient(&self) -> DesignResult<f64> {
        self.saturation_coefficient.get()
    }

    pub fn field_current_a(&self) -> DesignResult<f64> {
        self.field_current.get()
    }

    pub fn magnetizing_current_a(&self) -> DesignResult<f64> {
        self.magnetizing_current.get()
    }

    /// MMF dropped across the air gap per pole, A.
    pub fn air_gap_mmf(&self) -> DesignResult<f64> {
        let g = self.geometry.get()?;
        let h = self.stator_field_strength.get()?;
        Ok(h.air_gap * g.air_gap_line_cm)
    }

    /// No-load characteristic: field current versus terminal voltage.
    ///
    /// The circuit is re-solved at thirty voltage levels from zero to 1.2 p.u.
    /// of rated. Fluxes scale with voltage, the leakage contribution tracks
    /// the stator MMF at each level, and the steel is read through the
    /// linearly extended magnetization curves so the sweep covers flux
    /// densities outside the tabulated range. The rated-point solution in the
    /// slots is left untouched.
    pub fn no_load_characteristic(&self, rotor: &RotorModel) -> DesignResult<Vec<NoLoadPoint>> {
        let g = self.geometry.get()?;
        let k_delta = self.air_gap_coefficient.get()?.total;
        let lambda = self.slot_leakage_permeance.get()?;
        let b_rated = self.stator_flux_density.get()?;
        let phi_main = self.main_flux.get()?;
        let phi_banding = self.banding_leakage_flux.get()?;
        let gamma = rotor.surface_ratio()?;
        let w_f = rotor.turn_count()?;
        let yoke_correction = (18.0 - 10.0 * gamma) / (18.0 - 9.0 * gamma);

        let mut curve = Vec::with_capacity(NO_LOAD_POINTS);
        for i in 0..NO_LOAD_POINTS {
            let u = NO_LOAD_CEILING_PU * i as f64 / (NO_LOAD_POINTS - 1) as f64;

            let h_gap = 8e3 * k_delta * b_rated.air_gap * u;
            let h_yoke = self
                .stator_yoke_steel
                .field_strength_extended(b_rated.yoke * u * yoke_correction);
            let h_teeth = self
                .stator_teeth_steel
                .field_strength_extended(b_rated.teeth * u);
            let stator_mmf = h_gap * g.air_gap_line_cm
                + h_yoke * g.stator_yoke_line_cm
                + h_teeth * g.stator_tooth_line_cm;

            let rotor_flux = (phi_main + phi_banding) * u + lambda * stator_mmf * 1e-8;
            let h_rotor_yoke = self
                .rotor_steel
                .field_strength_extended(rotor_flux / g.rotor_yoke_section_m2)
                * rotor.yoke_saturation_factor();
            let h_teeth_02 = self.swept_tooth_field_strength(
                rotor_flux / g.rotor_teeth_section_02_m2,
                g.rotor_branching_02,
            );
            let h_teeth_07 = self.swept_tooth_field_strength(
                rotor_flux / g.rotor_teeth_section_07_m2,
                g.rotor_branching_07,
            );

            let total_mmf = stator_mmf
                + h_rotor_yoke * g.rotor_yoke_line_cm
                + (h_teeth_02 + h_teeth_07) * g.rotor_tooth_half_line_cm;
            curve.push(NoLoadPoint {
                voltage_pu: u,
                field_current_a: total_mmf / w_f,
            });
        }
        Ok(curve)
    }

    /// Tooth field strength for the characteristic sweep, extended curve.
    fn swept_tooth_field_strength(&self, flux_density: f64, branching: f64) -> f64 {
        if flux_density > 2.05 {
            return (flux_density - 1.956) * 5.2 / (8.0 + 6.5 * branching) * 1e4;
        }
        self.rotor_steel.field_strength_extended(flux_density)
    }

    /// Clear all derived quantities for a recompute.
    pub fn reset(&mut self) {
        self.geometry.reset();
        self.air_gap_coefficient.reset();
        self.slot_leakage_permeance.reset();
        self.main_flux.reset();
        self.stator_flux_density.reset();
        self.stator_field_strength.reset();
        self.stator_mmf.reset();
        self.slot_leakage_flux.reset();
        self.banding_leakage_flux.reset();
        self.rotor_flux.reset();
        self.rotor_flux_density.reset();
        self.rotor_field_strength.reset();
        self.total_mmf.reset();
        self.saturation_coefficient.reset();
        self.field_current.reset();
        self.magnetizing_current.reset();
    }

    /// Run the whole circuit solution in dependency order.
    pub fn compute_all(&mut self, stator: &StatorModel, rotor: &RotorModel) -> DesignResult<()> {
        self.compute_geometry(stator, rotor)?;
        self.compute_air_gap_coefficient(stator, rotor)?;
        self.compute_slot_leakage_permeance(rotor)?;
        self.compute_main_flux(stator)?;
        self.compute_stator_flux_densities()?;
        self.compute_stator_field_strengths(rotor)?;
        self.compute_stator_mmf()?;
        self.compute_slot_leakage_flux()?;
        self.compute_banding_leakage_flux(rotor)?;
        self.compute_rotor_flux()?;
        self.compute_rotor_flux_densities()?;
        self.compute_rotor_field_strengths(rotor)?;
        self.compute_total_mmf()?;
        self.compute_saturation_coefficient()?;
        self.compute_field_current(rotor)?;
        self.compute_magnetizing_current(rotor)?;
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

    fn solved() -> (MagneticCircuitModel, StatorModel, RotorModel) {
        let s = stator();
        let r = rotor();
        let mut m = MagneticCircuitModel::new(&spec(), "2414", "2414", "35hn3mfa").unwrap();
        m.compute_all(&s, &r).unwrap();
        (m, s, r)
    }

    fn close(a: f64, b: f64, rel: f64) -> bool {
        (a - b).abs() <= rel * b.abs().max(1e-12)
    }

    #[test]
    fn test_unknown_steel_rejected_at_construction() {
        let err = MagneticCircuitModel::new(&spec(), "2414", "m999", "35hn3mfa").unwrap_err();
        assert_eq!(err, crate::errors::DesignError::unknown_material("m999"));
    }

    #[test]
    fn test_carter_coefficient() {
        let (m, _, _) = solved();
        let k = m.carter_coefficients().unwrap();
        assert!(close(k.stator_slotting, 1.039221, 1e-5));
        assert!(close(k.vent_channels, 1.006128, 1e-5));
        assert!(close(k.end_steps, 1.016121, 1e-5));
        assert!(close(k.rotor_slotting, 1.015381, 1e-5));
        assert!(close(k.total, 1.076850, 1e-5));
    }

    #[test]
    fn test_main_flux_and_densities() {
        let (m, _, _) = solved();
        assert!(close(m.main_flux_wb().unwrap(), 1.642618, 1e-5));
        let b = m.stator_flux_densities_t().unwrap();
        assert!(close(b.air_gap, 0.928909, 1e-5));
        assert!(close(b.yoke, 1.448939, 1e-5));
        assert!(close(b.teeth, 1.659598, 1e-5));
    }

    #[test]
    fn test_stator_mmf() {
        let (m, _, _) = solved();
        let h = m.stator_field_strengths_a_cm().unwrap();
        assert!(close(h.air_gap, 8002.37, 1e-4));
        assert!(close(h.yoke, 5.23095, 1e-4));
        assert!(close(h.teeth, 61.1299, 1e-4));
        assert!(close(m.stator_mmf_a().unwrap(), 30845.0, 1e-4));
        assert!(close(m.air_gap_mmf().unwrap(), 29608.8, 1e-4));
    }

    #[test]
    fn test_rotor_flux_includes_slot_leakage() {
        let (m, _, _) = solved();
        assert!(close(m.slot_leakage_permeance().unwrap(), 970.213, 1e-4));
        assert!(close(m.slot_leakage_flux_wb().unwrap(), 0.299262, 1e-4));
        assert_eq!(m.banding_leakage_flux_wb().unwrap(), 0.0);
        assert!(close(m.rotor_flux_wb().unwrap(), 1.941880, 1e-5));
    }

    #[test]
    fn test_rotor_segments_and_saturated_tooth() {
        let (m, _, _) = solved();
        let b = m.rotor_flux_densities_t().unwrap();
        assert!(close(b.yoke, 0.932509, 1e-5));
        assert!(close(b.teeth_02, 2.309884, 1e-5));
        assert!(close(b.teeth_07, 1.671653, 1e-5));
        let h = m.rotor_field_strengths_a_cm().unwrap();
        // 0.2h tooth is beyond 2.05 T, solved with the branching correction
        assert!(close(h.teeth_02, 1401.10, 1e-4));
        assert!(close(h.teeth_07, 69.9066, 1e-4));
        assert!(close(h.yoke, 12.9201, 1e-4));
    }

    #[test]
    fn test_total_mmf_and_currents() {
        let (m, _, _) = solved();
        assert!(close(m.total_mmf_a().unwrap(), 49673.5, 1e-4));
        assert!(close(m.saturation_coefficient().unwrap(), 1.67766, 1e-4));
        assert!(close(m.field_current_a().unwrap(), 1034.87, 1e-4));
        assert!(close(m.magnetizing_current_a().unwrap(), 616.849, 1e-4));
    }

    #[test]
    fn test_magnetic_banding_adds_leakage() {
        use crate::machine::rotor::RotorBanding;
        let s = stator();
        let mut r = RotorModel::new(
            &spec(),
            rotor().geometry().clone(),
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
            Some(RotorBanding {
                outer_diameter_mm: 1150.0,
                inner_diameter_mm: 1000.0,
                ring_width_mm: 250.0,
                axial_offset_mm: 50.0,
                magnetic: true,
            }),
        )
        .unwrap();
        r.compute_all().unwrap();
        let mut m = MagneticCircuitModel::new(&spec(), "2414", "2414", "35hn3mfa").unwrap();
        m.compute_all(&s, &r).unwrap();
        let phi_b = m.banding_leakage_flux_wb().unwrap();
        // 1.2 * 150 / 2600 * 37 * phi / 50
        assert!(close(phi_b, 1.2 * 150.0 / 2600.0 * 37.0 * 1.642618 / 50.0, 1e-4));
        assert!(m.rotor_flux_wb().unwrap() > 1.941880);
    }

    #[test]
    fn test_no_load_characteristic_shape() {
        let (m, _, r) = solved();
        let curve = m.no_load_characteristic(&r).unwrap();
        assert_eq!(curve.len(), 30);
        assert_eq!(curve[0].voltage_pu, 0.0);
        assert_eq!(curve[0].field_current_a, 0.0);
        assert!(close(curve[29].voltage_pu, 1.2, 1e-12));
        for pair in curve.windows(2) {
            assert!(pair[1].field_current_a > pair[0].field_current_a);
        }
        // the knee: current grows faster than voltage once the steel saturates
        let low_slope = curve[5].field_current_a / curve[5].voltage_pu;
        let high_slope = (curve[29].field_current_a - curve[24].field_current_a)
            / (curve[29].voltage_pu - curve[24].voltage_pu);
        assert!(high_slope > 2.0 * low_slope);
    }

    #[test]
    fn test_no_load_characteristic_values() {
        let (m, _, r) = solved();
        let curve = m.no_load_characteristic(&r).unwrap();
        assert!(close(curve[15].voltage_pu, 0.620690, 1e-5));
        assert!(close(curve[15].field_current_a, 402.925, 1e-3));
        assert!(close(curve[20].field_current_a, 596.525, 1e-3));
        assert!(close(curve[29].field_current_a, 1935.61, 1e-3));
    }

    #[test]
    fn test_no_load_characteristic_needs_solved_circuit() {
        let r = rotor();
        let m = MagneticCircuitModel::new(&spec(), "2414", "2414", "35hn3mfa").unwrap();
        let err = m.no_load_characteristic(&r).unwrap_err();
        assert_eq!(
            err,
            crate::errors::DesignError::prerequisite_missing("magnetic.geometry")
        );
    }

    #[test]
    fn test_recompute_rejected() {
        let (mut m, s, r) = solved();
        let err = m.compute_main_flux(&s).unwrap_err();
        assert_eq!(err.error_code(), "RECOMPUTE");
        let err = m.compute_geometry(&s, &r).unwrap_err();
        assert_eq!(err.error_code(), "RECOMPUTE");
    }

    #[test]
    fn test_flux_before_geometry_fails() {
        let s = stator();
        let mut m = MagneticCircuitModel::new(&spec(), "2414", "2414", "35hn3mfa").unwrap();
        m.compute_main_flux(&s).unwrap();
        let err = m.compute_stator_flux_densities().unwrap_err();
        assert_eq!(
            err,
            crate::errors::DesignError::prerequisite_missing("magnetic.geometry")
        );
    }
}
