//! # Calculation Session
//!
//! A [`Session`] owns exactly one instance of each computation model and
//! drives the dependency-ordered chain over them. Sessions are built from a
//! [`MachineDescription`], the JSON-serializable bundle of nameplate data,
//! geometry, winding layouts and material selection.
//!
//! Construction validates the machine specification first; an invalid
//! specification produces no session and no model instances.
//!
//! ## Example
//!
//! ```no_run
//! # use emd_core::session::{MachineDescription, Session};
//! # let description: MachineDescription = todo!();
//! let mut session = Session::new(description).unwrap();
//! session.compute_all().unwrap();
//! println!("x_d = {:.3}", session.quantity("reactance.x_d").unwrap());
//! println!("MMF = {:.0} A", session.quantity("magnetic.total_mmf").unwrap());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{DesignError, DesignResult};
use crate::machine::losses::{LossInputs, LossModel};
use crate::machine::magnetic::{MagneticCircuitModel, NoLoadPoint};
use crate::machine::reactance::ReactanceModel;
use crate::machine::rotor::{RotorBanding, RotorGeometry, RotorModel, RotorWinding};
use crate::machine::stator::{StatorGeometry, StatorModel, StatorWinding};
use crate::spec::MachineSpec;

/// Steel grades of the flux-carrying parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSelection {
    pub stator_yoke_steel: String,
    pub stator_teeth_steel: String,
    pub rotor_steel: String,
}

/// The complete, serializable input of one calculation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineDescription {
    pub spec: MachineSpec,
    pub stator_geometry: StatorGeometry,
    pub stator_winding: StatorWinding,
    pub rotor_geometry: RotorGeometry,
    pub rotor_winding: RotorWinding,
    pub banding: Option<RotorBanding>,
    pub materials: MaterialSelection,
    pub losses: LossInputs,
}

/// One calculation session over one machine.
#[derive(Debug, Serialize)]
pub struct Session {
    spec: MachineSpec,
    stator: StatorModel,
    rotor: RotorModel,
    magnetic: MagneticCircuitModel,
    reactance: ReactanceModel,
    losses: LossModel,
}

impl Session {
    /// Validate the description and construct one instance of each model.
    pub fn new(description: MachineDescription) -> DesignResult<Self> {
        description.spec.validate()?;
        let spec = description.spec;
        let stator = StatorModel::new(&spec, description.stator_geometry, description.stator_winding)?;
        let rotor = RotorModel::new(
            &spec,
            description.rotor_geometry,
            description.rotor_winding,
            description.banding,
        )?;
        let magnetic = MagneticCircuitModel::new(
            &spec,
            &description.materials.stator_yoke_steel,
            &description.materials.stator_teeth_steel,
            &description.materials.rotor_steel,
        )?;
        let reactance = ReactanceModel::new(&spec);
        let losses = LossModel::new(&spec, description.losses)?;
        Ok(Session {
            spec,
            stator,
            rotor,
            magnetic,
            reactance,
            losses,
        })
    }

    pub fn spec(&self) -> &MachineSpec {
        &self.spec
    }

    pub fn stator(&self) -> &StatorModel {
        &self.stator
    }

    pub fn stator_mut(&mut self) -> &mut StatorModel {
        &mut self.stator
    }

    pub fn rotor(&self) -> &RotorModel {
        &self.rotor
    }

    pub fn rotor_mut(&mut self) -> &mut RotorModel {
        &mut self.rotor
    }

    pub fn magnetic(&self) -> &MagneticCircuitModel {
        &self.magnetic
    }

    pub fn magnetic_mut(&mut self) -> &mut MagneticCircuitModel {
        &mut self.magnetic
    }

    pub fn reactance(&self) -> &ReactanceModel {
        &self.reactance
    }

    pub fn reactance_mut(&mut self) -> &mut ReactanceModel {
        &mut self.reactance
    }

    pub fn losses(&self) -> &LossModel {
        &self.losses
    }

    pub fn losses_mut(&mut self) -> &mut LossModel {
        &mut self.losses
    }

    /// Solve both winding models.
    pub fn compute_windings(&mut self) -> DesignResult<()> {
        self.stator.compute_all()?;
        self.rotor.compute_all()
    }

    /// Solve the magnetic circuit and the field loading it implies.
    pub fn compute_magnetic_circuit(&mut self) -> DesignResult<()> {
        self.magnetic.compute_all(&self.stator, &self.rotor)?;
        let field_current = self.magnetic.field_current_a()?;
        self.rotor.compute_current_density(field_current)?;
        self.rotor.compute_current_load(field_current)
    }

    /// Solve the reactance model.
    pub fn compute_reactances(&mut self) -> DesignResult<()> {
        self.reactance
            .compute_all(&self.stator, &self.rotor, &self.magnetic)
    }

    /// Solve the loss model.
    pub fn compute_losses(&mut self) -> DesignResult<()> {
        self.losses
            .compute_all(&self.stator, &self.rotor, &self.magnetic)
    }

    /// Run the whole chain in dependency order.
    pub fn compute_all(&mut self) -> DesignResult<()> {
        self.compute_windings()?;
        self.compute_magnetic_circuit()?;
        self.compute_reactances()?;
        self.compute_losses()
    }

    /// Clear every derived quantity for a whole-session recompute.
    pub fn reset(&mut self) {
        self.stator.reset();
        self.rotor.reset();
        self.magnetic.reset();
        self.reactance.reset();
        self.losses.reset();
    }

    /// No-load characteristic over the solved magnetic circuit.
    pub fn no_load_characteristic(&self) -> DesignResult<Vec<NoLoadPoint>> {
        self.magnetic.no_load_characteristic(&self.rotor)
    }

    /// Read any scalar derived quantity by its dotted name.
    ///
    /// Uncomputed quantities fail as their slot does; unknown names fail
    /// with `UnknownQuantity`.
    pub fn quantity(&self, name: &str) -> DesignResult<f64> {
        match name {
            "stator.slots_per_pole_phase" => self.stator.slots_per_pole_phase(),
            "stator.pole_pitch" => self.stator.pole_pitch_mm(),
            "stator.tooth_pitch" => self.stator.tooth_pitch_mm(),
            "stator.effective_length" => self.stator.effective_length_mm(),
            "stator.pitch_ratio" => self.stator.pitch_ratio(),
            "stator.turns_per_phase" => self.stator.turns_per_phase(),
            "stator.turn_length" => self.stator.turn_length_mm(),
            "stator.dc_resistance" => self.stator.dc_resistance_ohm(),
            "stator.current_density" => self.stator.current_density_a_mm2(),
            "stator.current_load" => self.stator.current_load_a_cm(),
            "stator.winding_factor" => self.stator.winding_factor(),
            "stator.heat_load" => self.stator.heat_load(),

            "rotor.slot_height" => self.rotor.slot_height_mm(),
            "rotor.surface_ratio" => self.rotor.surface_ratio(),
            "rotor.wound_surface_ratio" => self.rotor.wound_surface_ratio(),
            "rotor.coils_per_pole" => self.rotor.coils_per_pole(),
            "rotor.pole_pitch" => self.rotor.pole_pitch_mm(),
            "rotor.tooth_pitch" => self.rotor.tooth_pitch_mm(),
            "rotor.turn_count" => self.rotor.turn_count(),
            "rotor.turn_length" => self.rotor.turn_length_mm(),
            "rotor.dc_resistance" => self.rotor.dc_resistance_ohm(),
            "rotor.current_density" => self.rotor.current_density_a_mm2(),
            "rotor.current_load" => self.rotor.current_load_a_cm(),
            "rotor.winding_factor" => self.rotor.winding_factor(),
            "rotor.heat_load" => self.rotor.heat_load(),

            "magnetic.air_gap_coefficient" => self.magnetic.air_gap_coefficient(),
            "magnetic.slot_leakage_permeance" => self.magnetic.slot_leakage_permeance(),
            "magnetic.main_flux" => self.magnetic.main_flux_wb(),
            "magnetic.stator_mmf" => self.magnetic.stator_mmf_a(),
            "magnetic.air_gap_mmf" => self.magnetic.air_gap_mmf(),
            "magnetic.slot_leakage_flux" => self.magnetic.slot_leakage_flux_wb(),
            "magnetic.banding_leakage_flux" => self.magnetic.banding_leakage_flux_wb(),
            "magnetic.rotor_flux" => self.magnetic.rotor_flux_wb(),
            "magnetic.total_mmf" => self.magnetic.total_mmf_a(),
            "magnetic.saturation_coefficient" => self.magnetic.saturation_coefficient(),
            "magnetic.field_current" => self.magnetic.field_current_a(),
            "magnetic.magnetizing_current" => self.magnetic.magnetizing_current_a(),
            "magnetic.flux_density.air_gap" => {
                Ok(self.magnetic.stator_flux_densities_t()?.air_gap)
            }
            "magnetic.flux_density.stator_yoke" => {
                Ok(self.magnetic.stator_flux_densities_t()?.yoke)
            }
            "magnetic.flux_density.stator_teeth" => {
                Ok(self.magnetic.stator_flux_densities_t()?.teeth)
            }
            "magnetic.flux_density.rotor_yoke" => {
                Ok(self.magnetic.rotor_flux_densities_t()?.yoke)
            }
            "magnetic.flux_density.rotor_teeth_02" => {
                Ok(self.magnetic.rotor_flux_densities_t()?.teeth_02)
            }
            "magnetic.flux_density.rotor_teeth_07" => {
                Ok(self.magnetic.rotor_flux_densities_t()?.teeth_07)
            }

            "reactance.x_end" => self.reactance.end_winding_reactance(),
            "reactance.armature_reaction_current" => self.reactance.armature_reaction_current_a(),
            "reactance.x_ad" => self.reactance.x_ad(),
            "reactance.x_slot" => Ok(self.reactance.leakage()?.slot),
            "reactance.x_differential" => Ok(self.reactance.leakage()?.differential),
            "reactance.x_leakage" => Ok(self.reactance.leakage()?.total),
            "reactance.x_d" => self.reactance.x_d(),
            "reactance.dissipation_factor" => self.reactance.dissipation_factor(),
            "reactance.x_d_transient" => self.reactance.x_d_transient(),
            "reactance.x_d_subtransient" => self.reactance.x_d_subtransient(),
            "reactance.x_negative_sequence" => self.reactance.x_negative_sequence(),
            "reactance.x_zero_sequence" => self.reactance.x_zero_sequence(),
            "reactance.x_potier" => self.reactance.x_potier(),

            "losses.field_coefficient" => self.losses.field_coefficient(),
            "losses.copper" => self.losses.copper_kw(),
            "losses.core" => Ok(self.losses.core_kw()?.total_kw),
            "losses.stray" => Ok(self.losses.stray_kw()?.total_kw),
            "losses.excitation" => self.losses.excitation_kw(),
            "losses.mechanical" => Ok(self.losses.mechanical_kw()?.total_kw),
            "losses.total" => self.losses.total_losses_kw(),
            "losses.efficiency" => self.losses.efficiency(),
            "losses.mass.stator_yoke" => Ok(self.losses.masses()?.stator_yoke_kg),
            "losses.mass.stator_teeth" => Ok(self.losses.masses()?.stator_teeth_kg),
            "losses.mass.stator_winding" => Ok(self.losses.masses()?.stator_winding_kg),
            "losses.mass.rotor_winding" => Ok(self.losses.masses()?.rotor_winding_kg),

            _ => Err(DesignError::unknown_quantity(name)),
        }
    }
}
