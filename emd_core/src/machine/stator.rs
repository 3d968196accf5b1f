//! # Stator Model
//!
//! Stator core and armature winding: slot layout, winding layout, dc
//! resistance, current density and linear current load, plus the geometric
//! quantities the magnetic circuit and the reactance model read back
//! (sections, magnetic line lengths, coil zone heights).
//!
//! Dimensions are mm, sections mm² (slot work) or m² (magnetic circuit),
//! resistances Ω, flux densities T.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::catalog::{ConductorCatalog, ConductorKind, ConductorRecord, COPPER_CONDUCTIVITY};
use crate::errors::{DesignError, DesignResult};
use crate::quantity::Slot;
use crate::spec::MachineSpec;

use super::WindingTemperature;

/// Stator core and slot geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatorGeometry {
    /// Number of stator slots
    pub slot_count: u32,
    /// Slot height, mm
    pub slot_height_mm: f64,
    /// Slot width, mm
    pub slot_width_mm: f64,
    /// Slit (opening lip) height, mm
    pub slit_height_mm: f64,
    /// Wedge height, mm
    pub wedge_height_mm: f64,
    /// Effective conductors per slot
    pub effective_wires: u32,
    /// Number of radial vent channels
    pub vent_channel_count: u32,
    /// Width of one vent channel, mm
    pub vent_channel_width_mm: f64,
    /// Lamination fill factor
    pub fill_factor: f64,
    /// Diameter of through studs in the yoke, if the core is stud-built
    pub stud_diameter_mm: Option<f64>,
}

impl StatorGeometry {
    pub fn validate(&self) -> DesignResult<()> {
        if self.slot_count == 0 {
            return Err(DesignError::invalid_spec(
                "stator.slot_count",
                self.slot_count,
                "must be positive",
            ));
        }
        if self.slot_height_mm <= 0.0 || self.slot_width_mm <= 0.0 {
            return Err(DesignError::invalid_spec(
                "stator.slot_dimensions",
                format!("{}x{}", self.slot_height_mm, self.slot_width_mm),
                "must be positive",
            ));
        }
        if self.effective_wires == 0 {
            return Err(DesignError::invalid_spec(
                "stator.effective_wires",
                self.effective_wires,
                "must be positive",
            ));
        }
        if self.fill_factor <= 0.0 || self.fill_factor > 1.0 {
            return Err(DesignError::invalid_spec(
                "stator.fill_factor",
                self.fill_factor,
                "must be in (0, 1]",
            ));
        }
        Ok(())
    }

    /// Core length minus vent channels, mm.
    fn packet_length_mm(&self, core_length_mm: f64) -> f64 {
        core_length_mm - f64::from(self.vent_channel_count) * self.vent_channel_width_mm
    }
}

/// Insulation build of a stator bar, all in mm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatorInsulation {
    pub turn_mm: f64,
    pub body_height_mm: f64,
    pub body_width_mm: f64,
    pub semiconducting_mm: f64,
    pub column_wrap_mm: f64,
    pub wedge_filling_mm: f64,
    pub coil_filling_mm: f64,
    pub bottom_filling_mm: f64,
}

impl StatorInsulation {
    /// Total insulation on the bar height (turn, semiconducting, body, wrap).
    pub fn total_height_mm(&self) -> f64 {
        self.turn_mm + self.semiconducting_mm + self.body_height_mm + self.column_wrap_mm
    }

    /// Total insulation on the bar width.
    pub fn total_width_mm(&self) -> f64 {
        self.turn_mm + self.semiconducting_mm + self.body_width_mm + self.column_wrap_mm
    }

    /// Total slot fillings on the height.
    pub fn total_fillings_mm(&self) -> f64 {
        self.wedge_filling_mm + self.coil_filling_mm + self.bottom_filling_mm
    }
}

/// Armature winding layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatorWinding {
    /// Strand rows per bar
    pub rows: u32,
    /// Strand columns per bar
    pub columns: u32,
    /// Coil span in slot pitches
    pub slot_span: u32,
    /// Parallel branches per phase
    pub parallel_branches: u32,
    /// Standard strand id; `None` sizes the strand from the slot space
    pub conductor_id: Option<String>,
    /// Side clearance of the bar in the slot, mm
    pub arrangement_allowance_mm: f64,
    pub insulation: StatorInsulation,
}

impl StatorWinding {
    pub fn validate(&self) -> DesignResult<()> {
        if self.rows == 0 || self.columns == 0 {
            return Err(DesignError::invalid_spec(
                "stator.winding",
                format!("{}x{}", self.rows, self.columns),
                "strand rows and columns must be positive",
            ));
        }
        if self.parallel_branches == 0 {
            return Err(DesignError::invalid_spec(
                "stator.parallel_branches",
                self.parallel_branches,
                "must be positive",
            ));
        }
        if self.slot_span == 0 {
            return Err(DesignError::invalid_spec(
                "stator.slot_span",
                self.slot_span,
                "must be positive",
            ));
        }
        Ok(())
    }
}

/// Radial zone heights of the slot fill, read by the leakage reactance.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CoilZoneHeights {
    /// Height of the copper column, mm
    pub copper_mm: f64,
    /// Height from the bore to the top of the copper, mm
    pub top_mm: f64,
    /// Insulation build between the coil sides, mm
    pub insulation_mm: f64,
}

/// The stator model.
#[derive(Debug, Serialize)]
pub struct StatorModel {
    #[serde(skip)]
    spec: MachineSpec,
    geometry: StatorGeometry,
    winding: StatorWinding,
    #[serde(skip)]
    conductor: &'static ConductorRecord,

    slots_per_pole_phase: Slot<f64>,
    pole_pitch: Slot<f64>,
    tooth_pitch: Slot<f64>,
    effective_length: Slot<f64>,
    pitch_ratio: Slot<f64>,
    turns_per_phase: Slot<f64>,
    turn_length: Slot<f64>,
    dc_resistance: Slot<f64>,
    current_density: Slot<f64>,
    current_load: Slot<f64>,
}

impl StatorModel {
    pub fn new(
        spec: &MachineSpec,
        geometry: StatorGeometry,
        winding: StatorWinding,
    ) -> DesignResult<Self> {
        geometry.validate()?;
        winding.validate()?;

        let conductor = match &winding.conductor_id {
            Some(id) => {
                let record = ConductorCatalog::global().lookup(id)?;
                if record.kind != ConductorKind::Strand {
                    return Err(DesignError::invalid_spec(
                        "stator.conductor_id",
                        id,
                        "stator bars are wound from strands",
                    ));
                }
                record
            }
            None => Self::pick_strand(&geometry, &winding)?,
        };

        Ok(StatorModel {
            spec: spec.clone(),
            geometry,
            winding,
            conductor,
            slots_per_pole_phase: Slot::new("stator.slots_per_pole_phase"),
            pole_pitch: Slot::new("stator.pole_pitch"),
            tooth_pitch: Slot::new("stator.tooth_pitch"),
            effective_length: Slot::new("stator.effective_length"),
            pitch_ratio: Slot::new("stator.pitch_ratio"),
            turns_per_phase: Slot::new("stator.turns_per_phase"),
            turn_length: Slot::new("stator.turn_length"),
            dc_resistance: Slot::new("stator.dc_resistance"),
            current_density: Slot::new("stator.current_density"),
            current_load: Slot::new("stator.current_load"),
        })
    }

    /// Size the strand from the space left in the slot.
    fn pick_strand(
        geometry: &StatorGeometry,
        winding: &StatorWinding,
    ) -> DesignResult<&'static ConductorRecord> {
        let ins = &winding.insulation;
        let coil_height = Self::coil_height_for(geometry, ins);
        let coil_width = geometry.slot_width_mm - winding.arrangement_allowance_mm;
        let per_turn = f64::from(winding.rows) * f64::from(geometry.effective_wires);
        let max_height = 2.0 * (coil_height - ins.body_height_mm - ins.semiconducting_mm)
            / per_turn
            - ins.turn_mm / f64::from(winding.rows);
        let max_width = (coil_width - ins.total_width_mm()) / f64::from(winding.columns);
        ConductorCatalog::global().pick(ConductorKind::Strand, max_height, max_width)
    }

    fn coil_height_for(geometry: &StatorGeometry, ins: &StatorInsulation) -> f64 {
        (geometry.slot_height_mm
            - geometry.slit_height_mm
            - geometry.wedge_height_mm
            - ins.total_fillings_mm())
            / 2.0
    }

    pub fn geometry(&self) -> &StatorGeometry {
        &self.geometry
    }

    pub fn winding(&self) -> &StatorWinding {
        &self.winding
    }

    pub fn conductor(&self) -> &'static ConductorRecord {
        self.conductor
    }

    /// Total copper section of one effective conductor, mm².
    pub fn conductor_section_mm2(&self) -> f64 {
        f64::from(self.winding.rows) * f64::from(self.winding.columns) * self.conductor.section_mm2
    }

    // --- derived quantities, write-once ---

    pub fn compute_slots_per_pole_phase(&mut self) -> DesignResult<()> {
        let q = f64::from(self.geometry.slot_count)
            / (2.0 * self.spec.pole_pairs() * f64::from(self.spec.phase_count));
        self.slots_per_pole_phase.set(q)
    }

    pub fn compute_pole_pitch(&mut self) -> DesignResult<()> {
        let tau = PI * self.spec.core_inner_diameter_mm / (2.0 * self.spec.pole_pairs());
        self.pole_pitch.set(tau)
    }

    pub fn compute_tooth_pitch(&mut self) -> DesignResult<()> {
        let t = PI * self.spec.core_inner_diameter_mm / f64::from(self.geometry.slot_count);
        self.tooth_pitch.set(t)
    }

    pub fn compute_effective_length(&mut self) -> DesignResult<()> {
        let l = self.geometry.packet_length_mm(self.spec.core_length_mm) * self.geometry.fill_factor;
        self.effective_length.set(l)
    }

    pub fn compute_pitch_ratio(&mut self) -> DesignResult<()> {
        let q = self.slots_per_pole_phase.get()?;
        let beta = f64::from(self.winding.slot_span) / (f64::from(self.spec.phase_count) * q);
        self.pitch_ratio.set(beta)
    }

    pub fn compute_turns_per_phase(&mut self) -> DesignResult<()> {
        let q = self.slots_per_pole_phase.get()?;
        let w = self.spec.pole_pairs() * f64::from(self.geometry.effective_wires) * q
            / f64::from(self.winding.parallel_branches);
        self.turns_per_phase.set(w)
    }

    pub fn compute_turn_length(&mut self) -> DesignResult<()> {
        let l_end = self.end_part_length_mm();
        self.turn_length.set(2.0 * (l_end + self.spec.core_length_mm))
    }

    /// Dc resistance of one phase at 15 °C, Ω.
    pub fn compute_dc_resistance(&mut self) -> DesignResult<()> {
        let w = self.turns_per_phase.get()?;
        let l_w = self.turn_length.get()?;
        let r = w * l_w
            / (COPPER_CONDUCTIVITY
                * f64::from(self.winding.parallel_branches)
                * self.conductor_section_mm2());
        self.dc_resistance.set(r)
    }

    /// Current density at rated current, A/mm².
    pub fn compute_current_density(&mut self) -> DesignResult<()> {
        let j = self.spec.rated_current_a()
            / (f64::from(self.winding.parallel_branches) * self.conductor_section_mm2());
        self.current_density.set(j)
    }

    /// Linear current load, A/cm.
    pub fn compute_current_load(&mut self) -> DesignResult<()> {
        let t1 = self.tooth_pitch.get()?;
        let a = 10.0 * self.spec.rated_current_a() * f64::from(self.geometry.effective_wires)
            / (f64::from(self.winding.parallel_branches) * t1);
        self.current_load.set(a)
    }

    // --- slot readers ---

    pub fn slots_per_pole_phase(&self) -> DesignResult<f64> {
        self.slots_per_pole_phase.get()
    }

    pub fn pole_pitch_mm(&self) -> DesignResult<f64> {
        self.pole_pitch.get()
    }

    pub fn tooth_pitch_mm(&self) -> DesignResult<f64> {
        self.tooth_pitch.get()
    }

    pub fn effective_length_mm(&self) -> DesignResult<f64> {
        self.effective_length.get()
    }

    pub fn pitch_ratio(&self) -> DesignResult<f64> {
        self.pitch_ratio.get()
    }

    pub fn turns_per_phase(&self) -> DesignResult<f64> {
        self.turns_per_phase.get()
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

    /// Phase resistance corrected to a standard winding temperature, Ω.
    pub fn resistance_at(&self, temperature: WindingTemperature) -> DesignResult<f64> {
        Ok(self.dc_resistance.get()? * temperature.factor())
    }

    // --- pure geometry ---

    /// Fundamental winding factor (distribution and pitch).
    pub fn winding_factor(&self) -> DesignResult<f64> {
        let q = self.slots_per_pole_phase.get()?;
        let beta = self.pitch_ratio.get()?;
        let k = (PI / 6.0).sin() * (beta * PI / 2.0).sin() / (q * (PI / (6.0 * q)).sin());
        Ok(k)
    }

    /// Straight-part overhang of one end winding, mm.
    pub fn end_part_length_mm(&self) -> f64 {
        2.5 * self.spec.core_inner_diameter_mm / self.spec.pole_pairs().powf(1.5)
    }

    /// Core diameter at one third of the tooth height, mm.
    pub fn diameter_at_third_mm(&self) -> f64 {
        self.spec.core_inner_diameter_mm + 2.0 * self.geometry.slot_height_mm / 3.0
    }

    /// Core diameter at the slot bottom, mm.
    pub fn diameter_at_bottom_mm(&self) -> f64 {
        self.spec.core_inner_diameter_mm + 2.0 * self.geometry.slot_height_mm
    }

    /// Tooth pitch at one third of the tooth height, mm.
    pub fn tooth_pitch_at_third_mm(&self) -> f64 {
        PI * self.diameter_at_third_mm() / f64::from(self.geometry.slot_count)
    }

    /// Radial yoke height behind the slots, mm.
    pub fn yoke_height_mm(&self) -> DesignResult<f64> {
        let mut h = (self.spec.core_outer_diameter_mm - self.diameter_at_bottom_mm()) / 2.0;
        if let Some(stud) = self.geometry.stud_diameter_mm {
            h -= stud / 3.0;
        }
        if h <= 0.0 {
            return Err(DesignError::invalid_spec(
                "stator.slot_height_mm",
                self.geometry.slot_height_mm,
                "slots leave no yoke below the core back",
            ));
        }
        Ok(h)
    }

    /// Yoke flux section per half pole, m².
    pub fn yoke_section_m2(&self) -> DesignResult<f64> {
        Ok(self.yoke_height_mm()? * self.effective_length.get()? * 1e-6)
    }

    /// Tooth flux section per pole at one third height, m².
    pub fn teeth_section_m2(&self) -> DesignResult<f64> {
        let tooth_width = self.tooth_pitch_at_third_mm() - self.geometry.slot_width_mm;
        if tooth_width <= 0.0 {
            return Err(DesignError::invalid_spec(
                "stator.slot_width_mm",
                self.geometry.slot_width_mm,
                "tooth width at one-third height is not positive",
            ));
        }
        let q = self.slots_per_pole_phase.get()?;
        Ok(1.91 * self.effective_length.get()? * tooth_width * q * 1e-6)
    }

    /// Magnetic line length in the yoke per pole, cm.
    pub fn yoke_line_cm(&self, rotor_surface_ratio: f64) -> DesignResult<f64> {
        let h_a = self.yoke_height_mm()?;
        Ok(PI * rotor_surface_ratio * (self.spec.core_outer_diameter_mm - h_a)
            / (4.0 * self.spec.pole_pairs())
            * 0.1)
    }

    /// Magnetic line length in the teeth, cm.
    pub fn tooth_line_cm(&self) -> f64 {
        self.geometry.slot_height_mm * 0.1
    }

    /// Share of tooth flux forced into the slot at one third height.
    pub fn flow_branching(&self) -> DesignResult<f64> {
        let t13 = self.tooth_pitch_at_third_mm();
        let width = t13 - self.geometry.slot_width_mm;
        Ok(t13 * self.spec.core_length_mm / (width * self.effective_length.get()?) - 1.0)
    }

    /// Thermal load factor, (A/cm)·(A/mm²).
    pub fn heat_load(&self) -> DesignResult<f64> {
        Ok(self.current_load.get()? * self.current_density.get()?)
    }

    /// Height of one coil side in the slot, mm.
    pub fn coil_height_mm(&self) -> f64 {
        Self::coil_height_for(&self.geometry, &self.winding.insulation)
    }

    /// Width of the bar in the slot, mm.
    pub fn coil_width_mm(&self) -> f64 {
        self.geometry.slot_width_mm - self.winding.arrangement_allowance_mm
    }

    /// Radial zone heights of the slot fill, mm.
    pub fn coil_zone_heights(&self) -> CoilZoneHeights {
        let ins = &self.winding.insulation;
        let wire_ins = self.conductor.insulation_height_mm;
        let copper = 2.0 * self.coil_height_mm() - wire_ins - ins.total_height_mm()
            + ins.coil_filling_mm;
        let top = self.geometry.slit_height_mm
            + self.geometry.wedge_height_mm
            + ins.wedge_filling_mm
            + (wire_ins + ins.total_height_mm()) / 2.0;
        CoilZoneHeights {
            copper_mm: copper,
            top_mm: top,
            insulation_mm: wire_ins + ins.total_height_mm() + ins.coil_filling_mm,
        }
    }

    /// Clear all derived quantities for a recompute.
    pub fn reset(&mut self) {
        self.slots_per_pole_phase.reset();
        self.pole_pitch.reset();
        self.tooth_pitch.reset();
        self.effective_length.reset();
        self.pitch_ratio.reset();
        self.turns_per_phase.reset();
        self.turn_length.reset();
        self.dc_resistance.reset();
        self.current_density.reset();
        self.current_load.reset();
    }

    /// Run every stator computation in dependency order.
    pub fn compute_all(&mut self) -> DesignResult<()> {
        self.compute_slots_per_pole_phase()?;
        self.compute_pole_pitch()?;
        self.compute_tooth_pitch()?;
        self.compute_effective_length()?;
        self.compute_pitch_ratio()?;
        self.compute_turns_per_phase()?;
        self.compute_turn_length()?;
        self.compute_dc_resistance()?;
        self.compute_current_density()?;
        self.compute_current_load()?;
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

    fn geometry() -> StatorGeometry {
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
        }
    }

    fn winding() -> StatorWinding {
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
        }
    }

    fn model() -> StatorModel {
        StatorModel::new(&spec(), geometry(), winding()).unwrap()
    }

    fn close(a: f64, b: f64, rel: f64) -> bool {
        (a - b).abs() <= rel * b.abs().max(1e-12)
    }

    #[test]
    fn test_slot_layout() {
        let mut s = model();
        s.compute_slots_per_pole_phase().unwrap();
        s.compute_pole_pitch().unwrap();
        s.compute_tooth_pitch().unwrap();
        assert_eq!(s.slots_per_pole_phase().unwrap(), 6.0);
        assert!(close(s.pole_pitch_mm().unwrap(), 1021.018, 1e-4));
        assert!(close(s.tooth_pitch_mm().unwrap(), 56.7232, 1e-4));
    }

    #[test]
    fn test_winding_factor() {
        let mut s = model();
        s.compute_slots_per_pole_phase().unwrap();
        s.compute_pitch_ratio().unwrap();
        assert!(close(s.pitch_ratio().unwrap(), 5.0 / 6.0, 1e-12));
        assert!(close(s.winding_factor().unwrap(), 0.923563, 1e-5));
    }

    #[test]
    fn test_winding_factor_needs_prerequisites() {
        let s = model();
        let err = s.winding_factor().unwrap_err();
        assert_eq!(
            err,
            DesignError::prerequisite_missing("stator.slots_per_pole_phase")
        );
    }

    #[test]
    fn test_recompute_rejected() {
        let mut s = model();
        s.compute_pole_pitch().unwrap();
        let err = s.compute_pole_pitch().unwrap_err();
        assert_eq!(err, DesignError::recompute("stator.pole_pitch"));
        // first value still intact
        assert!(close(s.pole_pitch_mm().unwrap(), 1021.018, 1e-4));
    }

    #[test]
    fn test_dc_resistance() {
        let mut s = model();
        s.compute_all().unwrap();
        assert_eq!(s.turns_per_phase().unwrap(), 18.0);
        assert!(close(s.dc_resistance_ohm().unwrap(), 2.22205e-3, 1e-4));
        assert!(close(
            s.resistance_at(WindingTemperature::C75).unwrap(),
            1.24 * 2.22205e-3,
            1e-4
        ));
    }

    #[test]
    fn test_current_density_and_load() {
        let mut s = model();
        s.compute_all().unwrap();
        assert!(close(s.current_density_a_mm2().unwrap(), 5.1601, 1e-4));
        assert!(close(s.current_load_a_cm().unwrap(), 1454.05, 1e-4));
        assert!(close(s.heat_load().unwrap(), 1454.05 * 5.1601, 1e-3));
    }

    #[test]
    fn test_core_sections() {
        let mut s = model();
        s.compute_all().unwrap();
        assert_eq!(s.effective_length_mm().unwrap(), 2139.0);
        assert_eq!(s.yoke_height_mm().unwrap(), 265.0);
        assert!(close(s.yoke_section_m2().unwrap(), 0.566835, 1e-6));
        assert!(close(s.teeth_section_m2().unwrap(), 0.989769, 1e-5));
    }

    #[test]
    fn test_stud_reduces_yoke_height() {
        let mut g = geometry();
        g.stud_diameter_mm = Some(60.0);
        let s = StatorModel::new(&spec(), g, winding()).unwrap();
        assert_eq!(s.yoke_height_mm().unwrap(), 245.0);
    }

    #[test]
    fn test_too_deep_slots_rejected() {
        let mut g = geometry();
        g.slot_height_mm = 430.0;
        let s = StatorModel::new(&spec(), g, winding()).unwrap();
        assert_eq!(s.yoke_height_mm().unwrap_err().error_code(), "INVALID_SPEC");
    }

    #[test]
    fn test_too_wide_slots_rejected() {
        let mut g = geometry();
        g.slot_width_mm = 62.0;
        let mut s = StatorModel::new(&spec(), g, winding()).unwrap();
        s.compute_slots_per_pole_phase().unwrap();
        s.compute_effective_length().unwrap();
        assert_eq!(s.teeth_section_m2().unwrap_err().error_code(), "INVALID_SPEC");
    }

    #[test]
    fn test_strand_sized_from_slot_when_unspecified() {
        let mut w = winding();
        w.conductor_id = None;
        let s = StatorModel::new(&spec(), geometry(), w).unwrap();
        assert_eq!(s.conductor().id, "strand-2.24x7.1");
    }

    #[test]
    fn test_bus_id_rejected_for_stator() {
        let mut w = winding();
        w.conductor_id = Some("bus-8.0x35.5".to_string());
        let err = StatorModel::new(&spec(), geometry(), w).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SPEC");
    }

    #[test]
    fn test_coil_zone_heights() {
        let s = model();
        assert_eq!(s.coil_height_mm(), 74.5);
        assert!(close(s.coil_width_mm(), 20.7, 1e-12));
        let zones = s.coil_zone_heights();
        assert!(close(zones.copper_mm, 147.16, 1e-6));
        assert!(close(zones.top_mm, 9.42, 1e-6));
        assert!(close(zones.insulation_mm, 9.84, 1e-6));
    }

    #[test]
    fn test_reset_allows_recompute() {
        let mut s = model();
        s.compute_all().unwrap();
        s.reset();
        assert!(s.pole_pitch_mm().is_err());
        s.compute_all().unwrap();
        assert!(close(s.pole_pitch_mm().unwrap(), 1021.018, 1e-4));
    }
}
