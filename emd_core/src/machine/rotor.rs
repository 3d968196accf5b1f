//! # Rotor Model
//!
//! Solid-forging turbo rotor: wound slot zone, field winding layout, dc
//! resistance, plus the geometric quantities the magnetic circuit reads back
//! (tooth and yoke sections, air-gap section, magnetic line lengths).
//!
//! A turbo rotor is slotted over part of its surface only; the ratio of the
//! wound arc to the full circumference (`surface_ratio`) drives the field
//! form and most section formulas. Field current is not known until the
//! magnetic circuit is solved, so the current-dependent quantities take it
//! as an argument.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::catalog::{ConductorCatalog, ConductorKind, ConductorRecord, COPPER_CONDUCTIVITY};
use crate::errors::{DesignError, DesignResult};
use crate::quantity::Slot;
use crate::spec::MachineSpec;

use super::WindingTemperature;

/// Rotor slot zone geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotorGeometry {
    /// Number of wound slots
    pub slot_count: u32,
    /// Number of slot pitches over the full circumference
    pub slot_pitch_count: u32,
    /// Slot width, mm
    pub slot_width_mm: f64,
    /// Wedge height, mm
    pub wedge_height_mm: f64,
    /// Wedge width, mm
    pub wedge_width_mm: f64,
    /// Conductors per slot
    pub effective_wires: u32,
    /// Central bore diameter of the forging, mm (0 for a solid shaft)
    pub inner_diameter_mm: f64,
    /// Whether a damper winding sits under the wedges
    pub damper: bool,
}

impl RotorGeometry {
    pub fn validate(&self) -> DesignResult<()> {
        if self.slot_count == 0 || self.slot_pitch_count == 0 {
            return Err(DesignError::invalid_spec(
                "rotor.slot_count",
                format!("{}/{}", self.slot_count, self.slot_pitch_count),
                "slot counts must be positive",
            ));
        }
        if self.slot_pitch_count < self.slot_count {
            return Err(DesignError::invalid_spec(
                "rotor.slot_pitch_count",
                self.slot_pitch_count,
                "must cover at least the wound slots",
            ));
        }
        if self.slot_width_mm <= 0.0 || self.wedge_width_mm <= 0.0 {
            return Err(DesignError::invalid_spec(
                "rotor.slot_width_mm",
                self.slot_width_mm,
                "slot and wedge widths must be positive",
            ));
        }
        if self.effective_wires == 0 {
            return Err(DesignError::invalid_spec(
                "rotor.effective_wires",
                self.effective_wires,
                "must be positive",
            ));
        }
        Ok(())
    }
}

/// Insulation build of the rotor slot fill, all in mm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotorInsulation {
    pub turn_mm: f64,
    pub body_mm: f64,
    pub wedge_filling_mm: f64,
    pub bottom_filling_mm: f64,
}

impl RotorInsulation {
    pub fn total_fillings_mm(&self) -> f64 {
        self.wedge_filling_mm + self.bottom_filling_mm
    }
}

/// Field winding layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotorWinding {
    /// Parallel branches of the field circuit
    pub parallel_branches: u32,
    /// Standard bus conductor id
    pub conductor_id: String,
    pub insulation: RotorInsulation,
}

impl RotorWinding {
    pub fn validate(&self) -> DesignResult<()> {
        if self.parallel_branches == 0 {
            return Err(DesignError::invalid_spec(
                "rotor.parallel_branches",
                self.parallel_branches,
                "must be positive",
            ));
        }
        Ok(())
    }
}

/// Retaining-ring (banding) dimensions over the end windings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotorBanding {
    pub outer_diameter_mm: f64,
    pub inner_diameter_mm: f64,
    pub ring_width_mm: f64,
    /// Axial distance from the core end to the ring, mm
    pub axial_offset_mm: f64,
    /// Magnetic ring steel leaks main flux past the air gap
    pub magnetic: bool,
}

/// The rotor model.
#[derive(Debug, Serialize)]
pub struct RotorModel {
    #[serde(skip)]
    spec: MachineSpec,
    geometry: RotorGeometry,
    winding: RotorWinding,
    banding: Option<RotorBanding>,
    #[serde(skip)]
    conductor: &'static ConductorRecord,

    slot_height: Slot<f64>,
    surface_ratio: Slot<f64>,
    wound_surface_ratio: Slot<f64>,
    coils_per_pole: Slot<f64>,
    pole_pitch: Slot<f64>,
    tooth_pitch: Slot<f64>,
    turn_count: Slot<f64>,
    turn_length: Slot<f64>,
    dc_resistance: Slot<f64>,
    current_density: Slot<f64>,
    current_load: Slot<f64>,
}

impl RotorModel {
    pub fn new(
        spec: &MachineSpec,
        geometry: RotorGeometry,
        winding: RotorWinding,
        banding: Option<RotorBanding>,
    ) -> DesignResult<Self> {
        geometry.validate()?;
        winding.validate()?;

        let pole_count = 2.0 * spec.pole_pairs();
        if f64::from(geometry.slot_count) <= 2.0 * pole_count {
            return Err(DesignError::invalid_spec(
                "rotor.slot_count",
                geometry.slot_count,
                "too few wound slots for the pole count",
            ));
        }

        let conductor = ConductorCatalog::global().lookup(&winding.conductor_id)?;
        if conductor.kind != ConductorKind::Bus {
            return Err(DesignError::invalid_spec(
                "rotor.conductor_id",
                &winding.conductor_id,
                "field coils are wound from buses",
            ));
        }

        Ok(RotorModel {
            spec: spec.clone(),
            geometry,
            winding,
            banding,
            conductor,
            slot_height: Slot::new("rotor.slot_height"),
            surface_ratio: Slot::new("rotor.surface_ratio"),
            wound_surface_ratio: Slot::new("rotor.wound_surface_ratio"),
            coils_per_pole: Slot::new("rotor.coils_per_pole"),
            pole_pitch: Slot::new("rotor.pole_pitch"),
            tooth_pitch: Slot::new("rotor.tooth_pitch"),
            turn_count: Slot::new("rotor.turn_count"),
            turn_length: Slot::new("rotor.turn_length"),
            dc_resistance: Slot::new("rotor.dc_resistance"),
            current_density: Slot::new("rotor.current_density"),
            current_load: Slot::new("rotor.current_load"),
        })
    }

    pub fn geometry(&self) -> &RotorGeometry {
        &self.geometry
    }

    pub fn winding(&self) -> &RotorWinding {
        &self.winding
    }

    pub fn banding(&self) -> Option<&RotorBanding> {
        self.banding.as_ref()
    }

    pub fn conductor(&self) -> &'static ConductorRecord {
        self.conductor
    }

    /// Rotor body diameter, mm.
    pub fn outer_diameter_mm(&self) -> f64 {
        self.spec.core_inner_diameter_mm - 2.0 * self.spec.air_gap_mm
    }

    // --- derived quantities, write-once ---

    pub fn compute_slot_height(&mut self) -> DesignResult<()> {
        let ins = &self.winding.insulation;
        let wires = f64::from(self.geometry.effective_wires);
        let h = wires * self.conductor.height_mm
            + (wires - 1.0) * ins.turn_mm
            + ins.body_mm
            + ins.total_fillings_mm()
            + self.geometry.wedge_height_mm;
        // rounded to the 0.1 mm the wedge seats are machined to
        self.slot_height.set((h * 10.0).round() / 10.0)
    }

    pub fn compute_surface_ratio(&mut self) -> DesignResult<()> {
        let g = f64::from(self.geometry.slot_count) / f64::from(self.geometry.slot_pitch_count);
        self.surface_ratio.set(g)
    }

    pub fn compute_wound_surface_ratio(&mut self) -> DesignResult<()> {
        let pole_count = 2.0 * self.spec.pole_pairs();
        let g = (f64::from(self.geometry.slot_count) - 2.0 * pole_count)
            / f64::from(self.geometry.slot_pitch_count);
        self.wound_surface_ratio.set(g)
    }

    pub fn compute_coils_per_pole(&mut self) -> DesignResult<()> {
        let c = f64::from(self.geometry.slot_count) / (4.0 * self.spec.pole_pairs());
        self.coils_per_pole.set(c)
    }

    pub fn compute_pole_pitch(&mut self) -> DesignResult<()> {
        let tau = PI * self.outer_diameter_mm() / (2.0 * self.spec.pole_pairs());
        self.pole_pitch.set(tau)
    }

    pub fn compute_tooth_pitch(&mut self) -> DesignResult<()> {
        let t = PI * self.outer_diameter_mm() / f64::from(self.geometry.slot_pitch_count);
        self.tooth_pitch.set(t)
    }

    pub fn compute_turn_count(&mut self) -> DesignResult<()> {
        let coils = self.coils_per_pole.get()?;
        let w = f64::from(self.geometry.effective_wires) * (coils - 1.0)
            / f64::from(self.winding.parallel_branches);
        self.turn_count.set(w)
    }

    pub fn compute_turn_length(&mut self) -> DesignResult<()> {
        self.turn_length
            .set(2.0 * (self.spec.core_length_mm + self.end_part_length_mm()))
    }

    /// Dc resistance of the whole field circuit at 15 °C, Ω.
    pub fn compute_dc_resistance(&mut self) -> DesignResult<()> {
        let w_f = self.turn_count.get()?;
        let l_turn = self.turn_length.get()?;
        let r = 2.0 * self.spec.pole_pairs() * w_f * l_turn
            / (COPPER_CONDUCTIVITY
                * f64::from(self.winding.parallel_branches)
                * self.conductor.section_mm2);
        self.dc_resistance.set(r)
    }

    /// Field copper current density, A/mm².
    pub fn compute_current_density(&mut self, field_current_a: f64) -> DesignResult<()> {
        let j = field_current_a
            / (f64::from(self.winding.parallel_branches) * self.conductor.section_mm2);
        self.current_density.set(j)
    }

    /// Linear current load of the wound zone, A/cm.
    pub fn compute_current_load(&mut self, field_current_a: f64) -> DesignResult<()> {
        let t2 = self.tooth_pitch.get()?;
        let a = 10.0 * field_current_a * f64::from(self.geometry.effective_wires)
            / (f64::from(self.winding.parallel_branches) * t2);
        self.current_load.set(a)
    }

    // --- slot readers ---

    pub fn slot_height_mm(&self) -> DesignResult<f64> {
        self.slot_height.get()
    }

    pub fn surface_ratio(&self) -> DesignResult<f64> {
        self.surface_ratio.get()
    }

    pub fn wound_surface_ratio(&self) -> DesignResult<f64> {
        self.wound_surface_ratio.get()
    }

    pub fn coils_per_pole(&self) -> DesignResult<f64> {
        self.coils_per_pole.get()
    }

    pub fn pole_pitch_mm(&self) -> DesignResult<f64> {
        self.pole_pitch.get()
    }

    pub fn tooth_pitch_mm(&self) -> DesignResult<f64> {
        self.tooth_pitch.get()
    }

    pub fn turn_count(&self) -> DesignResult<f64> {
        self.turn_count.get()
    }

    pub fn turn_length_mm(&self) -> DesignResult<f64> {
        self.turn_length.get()
    }

    pub fn dc_resistance_ohm(&self) -> DesignResult<f64> {
        self.dc_resistance.get()
    }

    pub fn current_density_a_mm2(&self) -> DesignResult<f64> {
        self.current_density.get()
    }

    pub fn current_load_a_cm(&self) -> DesignResult<f64> {
        self.current_load.get()
    }

    /// Field resistance corrected to a standard winding temperature, Ω.
    pub fn resistance_at(&self, temperature: WindingTemperature) -> DesignResult<f64> {
        Ok(self.dc_resistance.get()? * temperature.factor())
    }

    // --- pure geometry ---

    /// Field-form winding factor of the concentric coil groups.
    pub fn winding_factor(&self) -> DesignResult<f64> {
        let gamma_wound = self.wound_surface_ratio.get()?;
        let p = self.spec.pole_pairs();
        let pole_count = 2.0 * p;
        let k = pole_count * (PI * gamma_wound / 2.0).sin()
            / ((f64::from(self.geometry.slot_count) - 2.0 * pole_count)
                * (PI * p / f64::from(self.geometry.slot_pitch_count)).sin());
        Ok(k)
    }

    /// End-winding overhang of one field coil side, mm.
    pub fn end_part_length_mm(&self) -> f64 {
        1.35 * self.outer_diameter_mm() / self.spec.pole_pairs().powf(0.8)
    }

    /// Body diameter at 0.2 of the slot height from the bottom, mm.
    pub fn diameter_at_02_mm(&self) -> DesignResult<f64> {
        Ok(self.outer_diameter_mm() - 1.6 * self.slot_height.get()?)
    }

    /// Body diameter at 0.7 of the slot height from the bottom, mm.
    pub fn diameter_at_07_mm(&self) -> DesignResult<f64> {
        Ok(self.outer_diameter_mm() - 0.6 * self.slot_height.get()?)
    }

    /// Body diameter at the slot bottom, mm.
    pub fn slot_bottom_diameter_mm(&self) -> DesignResult<f64> {
        Ok(self.outer_diameter_mm() - 2.0 * self.slot_height.get()?)
    }

    fn tooth_width_at(&self, diameter_mm: f64) -> DesignResult<f64> {
        let w = PI * diameter_mm / f64::from(self.geometry.slot_pitch_count)
            - self.geometry.slot_width_mm;
        if w <= 0.0 {
            return Err(DesignError::invalid_spec(
                "rotor.slot_width_mm",
                self.geometry.slot_width_mm,
                "tooth width is not positive at the checked height",
            ));
        }
        Ok(w)
    }

    /// Tooth width at 0.2 of the slot height, mm.
    pub fn tooth_width_02_mm(&self) -> DesignResult<f64> {
        let d = self.diameter_at_02_mm()?;
        self.tooth_width_at(d)
    }

    /// Tooth width at 0.7 of the slot height, mm.
    pub fn tooth_width_07_mm(&self) -> DesignResult<f64> {
        let d = self.diameter_at_07_mm()?;
        self.tooth_width_at(d)
    }

    /// Sine of the wound-zone edge angle, used by the tooth sections.
    fn wound_edge_sine(&self) -> DesignResult<f64> {
        let gamma = self.surface_ratio.get()?;
        let p = self.spec.pole_pairs();
        Ok((1.0 - (PI * gamma / 2.0).cos())
            / (PI * p / f64::from(self.geometry.slot_pitch_count)).sin())
    }

    fn teeth_section_at(&self, diameter_mm: f64) -> DesignResult<f64> {
        self.tooth_width_at(diameter_mm)?;
        let sin_alpha = self.wound_edge_sine()?;
        Ok(self.spec.core_length_mm
            * (diameter_mm / self.spec.pole_pairs() - self.geometry.slot_width_mm * sin_alpha)
            * 1e-6)
    }

    /// Tooth flux section per pole at 0.2 of the slot height, m².
    pub fn teeth_section_02_m2(&self) -> DesignResult<f64> {
        let d = self.diameter_at_02_mm()?;
        self.teeth_section_at(d)
    }

    /// Tooth flux section per pole at 0.7 of the slot height, m².
    pub fn teeth_section_07_m2(&self) -> DesignResult<f64> {
        let d = self.diameter_at_07_mm()?;
        self.teeth_section_at(d)
    }

    /// Yoke flux section per half pole, m².
    pub fn yoke_section_m2(&self) -> DesignResult<f64> {
        let d_bottom = self.slot_bottom_diameter_mm()?;
        Ok((d_bottom - self.geometry.inner_diameter_mm) / 2.0
            * (self.spec.core_length_mm + d_bottom / 3.0)
            * 1e-6)
    }

    /// Air-gap flux section per pole, m².
    pub fn air_gap_section_m2(&self) -> DesignResult<f64> {
        let gamma = self.surface_ratio.get()?;
        let delta = self.spec.air_gap_mm;
        Ok((self.outer_diameter_mm() + delta)
            * (self.spec.core_length_mm + 2.0 * delta)
            * (PI / 2.0)
            * (1.0 - gamma / 2.0)
            / self.spec.pole_pairs()
            * 1e-6)
    }

    /// Magnetic line length over half the tooth height, cm.
    pub fn tooth_half_line_cm(&self) -> DesignResult<f64> {
        Ok(self.slot_height.get()? / 2.0 * 0.1)
    }

    /// Magnetic line length in the yoke per pole, cm.
    pub fn yoke_line_cm(&self) -> DesignResult<f64> {
        let d_bottom = self.slot_bottom_diameter_mm()?;
        Ok(d_bottom / (2.0 * (PI / (2.0 * self.spec.pole_pairs())).sin()) * 0.1)
    }

    /// Share of tooth flux forced into the slot at 0.2 of the slot height.
    pub fn flow_branching_02(&self) -> DesignResult<f64> {
        Ok(self.geometry.slot_width_mm / self.tooth_width_02_mm()?)
    }

    /// Share of tooth flux forced into the slot at 0.7 of the slot height.
    pub fn flow_branching_07(&self) -> DesignResult<f64> {
        Ok(self.geometry.slot_width_mm / self.tooth_width_07_mm()?)
    }

    /// Flux crowding correction of the solid yoke.
    pub fn yoke_saturation_factor(&self) -> f64 {
        1.0
    }

    /// Thermal load factor, (A/cm)·(A/mm²).
    pub fn heat_load(&self) -> DesignResult<f64> {
        Ok(self.current_load.get()? * self.current_density.get()?)
    }

    /// Clear all derived quantities for a recompute.
    pub fn reset(&mut self) {
        self.slot_height.reset();
        self.surface_ratio.reset();
        self.wound_surface_ratio.reset();
        self.coils_per_pole.reset();
        self.pole_pitch.reset();
        self.tooth_pitch.reset();
        self.turn_count.reset();
        self.turn_length.reset();
        self.dc_resistance.reset();
        self.current_density.reset();
        self.current_load.reset();
    }

    /// Run every field-current-independent computation in dependency order.
    pub fn compute_all(&mut self) -> DesignResult<()> {
        self.compute_slot_height()?;
        self.compute_surface_ratio()?;
        self.compute_wound_surface_ratio()?;
        self.compute_coils_per_pole()?;
        self.compute_pole_pitch()?;
        self.compute_tooth_pitch()?;
        self.compute_turn_count()?;
        self.compute_turn_length()?;
        self.compute_dc_resistance()?;
        Ok(())
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

    fn geometry() -> RotorGeometry {
        RotorGeometry {
            slot_count: 24,
            slot_pitch_count: 36,
            slot_width_mm: 32.0,
            wedge_height_mm: 30.0,
            wedge_width_mm: 32.0,
            effective_wires: 24,
            inner_diameter_mm: 0.0,
            damper: false,
        }
    }

    fn winding() -> RotorWinding {
        RotorWinding {
            parallel_branches: 1,
            conductor_id: "bus-8.0x35.5".to_string(),
            insulation: RotorInsulation {
                turn_mm: 0.8,
                body_mm: 2.0,
                wedge_filling_mm: 3.0,
                bottom_filling_mm: 1.5,
            },
        }
    }

    fn model() -> RotorModel {
        RotorModel::new(&spec(), geometry(), winding(), None).unwrap()
    }

    fn close(a: f64, b: f64, rel: f64) -> bool {
        (a - b).abs() <= rel * b.abs().max(1e-12)
    }

    #[test]
    fn test_slot_height_rounded_to_tenth() {
        let mut r = model();
        r.compute_slot_height().unwrap();
        // 24*8.0 + 23*0.8 + 2.0 + 4.5 + 30.0
        assert_eq!(r.slot_height_mm().unwrap(), 246.9);
    }

    #[test]
    fn test_surface_ratios() {
        let mut r = model();
        r.compute_surface_ratio().unwrap();
        r.compute_wound_surface_ratio().unwrap();
        assert!(close(r.surface_ratio().unwrap(), 2.0 / 3.0, 1e-12));
        assert!(close(r.wound_surface_ratio().unwrap(), 4.0 / 9.0, 1e-12));
    }

    #[test]
    fn test_winding_layout() {
        let mut r = model();
        r.compute_all().unwrap();
        assert_eq!(r.coils_per_pole().unwrap(), 3.0);
        assert_eq!(r.turn_count().unwrap(), 48.0);
        assert!(close(r.winding_factor().unwrap(), 0.925417, 1e-5));
    }

    #[test]
    fn test_field_resistance() {
        let mut r = model();
        r.compute_all().unwrap();
        assert!(close(r.dc_resistance_ohm().unwrap(), 0.0869813, 1e-5));
        assert!(close(
            r.resistance_at(WindingTemperature::C75).unwrap(),
            1.24 * 0.0869813,
            1e-5
        ));
    }

    #[test]
    fn test_tooth_geometry() {
        let mut r = model();
        r.compute_all().unwrap();
        assert!(close(r.tooth_width_02_mm().unwrap(), 40.5149, 1e-4));
        assert!(close(r.tooth_width_07_mm().unwrap(), 62.0610, 1e-4));
        assert!(close(r.teeth_section_02_m2().unwrap(), 0.840683, 1e-5));
        assert!(close(r.teeth_section_07_m2().unwrap(), 1.161653, 1e-5));
    }

    #[test]
    fn test_yoke_and_gap_sections() {
        let mut r = model();
        r.compute_all().unwrap();
        assert!(close(r.yoke_section_m2().unwrap(), 1.041213, 1e-5));
        assert!(close(r.air_gap_section_m2().unwrap(), 1.768330, 1e-5));
        assert!(close(r.yoke_line_cm().unwrap(), 51.7744, 1e-4));
        assert!(close(r.tooth_half_line_cm().unwrap(), 12.345, 1e-6));
    }

    #[test]
    fn test_current_dependent_quantities() {
        let mut r = model();
        r.compute_all().unwrap();
        r.compute_current_density(1034.87).unwrap();
        r.compute_current_load(1034.87).unwrap();
        assert!(close(r.current_density_a_mm2().unwrap(), 3.76316, 1e-4));
        assert!(close(r.current_load_a_cm().unwrap(), 2321.45, 1e-4));
    }

    #[test]
    fn test_too_few_slots_rejected() {
        let mut g = geometry();
        g.slot_count = 8;
        g.slot_pitch_count = 36;
        let err = RotorModel::new(&spec(), g, winding(), None).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SPEC");
    }

    #[test]
    fn test_strand_id_rejected_for_rotor() {
        let mut w = winding();
        w.conductor_id = "strand-2.24x10.0".to_string();
        let err = RotorModel::new(&spec(), geometry(), w, None).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SPEC");
    }

    #[test]
    fn test_recompute_rejected() {
        let mut r = model();
        r.compute_slot_height().unwrap();
        let err = r.compute_slot_height().unwrap_err();
        assert_eq!(err, DesignError::recompute("rotor.slot_height"));
    }
}
