//! # emd CLI
//!
//! Terminal front end for the machine design calculation engine.
//!
//! Usage: `emd_cli [machine.json]`. With no argument a built-in 100 MVA
//! four-pole demo machine is calculated. Prints a human summary followed by
//! the full JSON report.

use std::process::ExitCode;

use emd_core::machine::losses::LossInputs;
use emd_core::machine::rotor::{RotorGeometry, RotorInsulation, RotorWinding};
use emd_core::machine::stator::{StatorGeometry, StatorInsulation, StatorWinding};
use emd_core::session::{MachineDescription, MaterialSelection, Session};
use emd_core::spec::MachineSpec;
use emd_core::DesignError;

fn main() -> ExitCode {
    println!("emd - AC Machine Design Calculator");
    println!("==================================");
    println!();

    let description = match std::env::args().nth(1) {
        Some(path) => match load_description(&path) {
            Ok(d) => {
                println!("Loaded machine description from {path}");
                d
            }
            Err(message) => {
                eprintln!("Error: {message}");
                return ExitCode::FAILURE;
            }
        },
        None => {
            println!("No description given, running the built-in demo machine...");
            demo_machine()
        }
    };
    println!();

    match calculate(description) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{json}");
            }
            ExitCode::FAILURE
        }
    }
}

fn load_description(path: &str) -> Result<MachineDescription, String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("cannot read {path}: {e}"))?;
    serde_json::from_str(&text).map_err(|e| format!("cannot parse {path}: {e}"))
}

fn calculate(description: MachineDescription) -> Result<(), DesignError> {
    let spec = description.spec.clone();
    let mut session = Session::new(description)?;
    session.compute_all()?;

    println!("═══════════════════════════════════════");
    println!("  MACHINE CALCULATION RESULTS");
    println!("═══════════════════════════════════════");
    println!();
    println!("Rating:");
    println!("  S:        {:.0} kVA", spec.rated_power_kva);
    println!("  U:        {:.0} V, {:.0} Hz", spec.rated_voltage_v, spec.frequency_hz);
    println!(
        "  Poles:    {} ({:.0} rpm)",
        spec.poles,
        spec.synchronous_speed_rpm()
    );
    println!("  I:        {:.0} A", spec.rated_current_a());
    println!();
    println!("Winding:");
    println!(
        "  w1 = {:.0} turns/phase, k_w = {:.4}",
        session.quantity("stator.turns_per_phase")?,
        session.quantity("stator.winding_factor")?
    );
    println!(
        "  j1 = {:.2} A/mm2, A = {:.0} A/cm",
        session.quantity("stator.current_density")?,
        session.quantity("stator.current_load")?
    );
    println!();
    println!("Excitation (no load):");
    println!(
        "  F = {:.0} A, k_sat = {:.3}",
        session.quantity("magnetic.total_mmf")?,
        session.quantity("magnetic.saturation_coefficient")?
    );
    println!(
        "  I_f = {:.0} A, I_mu = {:.0} A",
        session.quantity("magnetic.field_current")?,
        session.quantity("magnetic.magnetizing_current")?
    );
    println!();
    println!("Reactances (p.u.):");
    println!(
        "  x_d = {:.3}, x_d' = {:.3}, x_d'' = {:.3}",
        session.quantity("reactance.x_d")?,
        session.quantity("reactance.x_d_transient")?,
        session.quantity("reactance.x_d_subtransient")?
    );
    println!(
        "  x_2 = {:.3}, x_0 = {:.3}, x_P = {:.3}",
        session.quantity("reactance.x_negative_sequence")?,
        session.quantity("reactance.x_zero_sequence")?,
        session.quantity("reactance.x_potier")?
    );
    println!();
    println!("No-load characteristic:");
    let curve = session.no_load_characteristic()?;
    for point in curve.iter().skip(4).step_by(5) {
        println!(
            "  U = {:.2} p.u.  ->  I_f = {:.0} A",
            point.voltage_pu, point.field_current_a
        );
    }
    println!();
    println!("Losses:");
    println!(
        "  copper = {:.0} kW, core = {:.0} kW, stray = {:.0} kW",
        session.quantity("losses.copper")?,
        session.quantity("losses.core")?,
        session.quantity("losses.stray")?
    );
    println!(
        "  excitation = {:.0} kW, mechanical = {:.0} kW",
        session.quantity("losses.excitation")?,
        session.quantity("losses.mechanical")?
    );
    println!(
        "  total = {:.0} kW, efficiency = {:.4}",
        session.quantity("losses.total")?,
        session.quantity("losses.efficiency")?
    );
    println!();
    println!("═══════════════════════════════════════");

    println!();
    println!("JSON Report:");
    if let Ok(json) = serde_json::to_string_pretty(&session) {
        println!("{json}");
    }
    Ok(())
}

/// 100 MVA, 10.5 kV, 50 Hz four-pole turbo-generator.
fn demo_machine() -> MachineDescription {
    MachineDescription {
        spec: MachineSpec {
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
        },
        stator_geometry: StatorGeometry {
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
        stator_winding: StatorWinding {
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
        rotor_geometry: RotorGeometry {
            slot_count: 24,
            slot_pitch_count: 36,
            slot_width_mm: 32.0,
            wedge_height_mm: 30.0,
            wedge_width_mm: 32.0,
            effective_wires: 24,
            inner_diameter_mm: 0.0,
            damper: false,
        },
        rotor_winding: RotorWinding {
            parallel_branches: 1,
            conductor_id: "bus-8.0x35.5".to_string(),
            insulation: RotorInsulation {
                turn_mm: 0.8,
                body_mm: 2.0,
                wedge_filling_mm: 3.0,
                bottom_filling_mm: 1.5,
            },
        },
        banding: None,
        materials: MaterialSelection {
            stator_yoke_steel: "2414".to_string(),
            stator_teeth_steel: "2414".to_string(),
            rotor_steel: "35hn3mfa".to_string(),
        },
        losses: LossInputs {
            core_loss_buildup: 1.0,
            exciter_efficiency: 0.85,
        },
    }
}
