//! # emd_core
//!
//! Calculation engine for AC electrical machine design, currently covering
//! two- and four-pole synchronous turbo-generators. Given nameplate data and
//! the stator/rotor geometry, the engine derives the winding layout, the
//! magnetic circuit, the reactances, and the losses of the machine.
//!
//! ## Architecture
//!
//! Every derived quantity lives in a write-once [`quantity::Slot`]. A slot is
//! computed exactly once, in dependency order; reading it before it is
//! computed fails with [`errors::DesignError::PrerequisiteMissing`], and
//! computing it twice fails with [`errors::DesignError::Recompute`]. A
//! [`session::Session`] owns exactly one instance of each computation model
//! and drives the whole chain.
//!
//! ## Example
//!
//! ```no_run
//! use emd_core::session::{MachineDescription, Session};
//!
//! let json = std::fs::read_to_string("machine.json").unwrap();
//! let description: MachineDescription = serde_json::from_str(&json).unwrap();
//! let mut session = Session::new(description).unwrap();
//! session.compute_all().unwrap();
//! let x_d = session.quantity("reactance.x_d").unwrap();
//! println!("x_d = {x_d:.3} p.u.");
//! ```

pub mod catalog;
pub mod errors;
pub mod machine;
pub mod quantity;
pub mod session;
pub mod spec;

pub use errors::{DesignError, DesignResult};
