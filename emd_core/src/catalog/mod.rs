//! # Material Catalogs
//!
//! Built-in property catalogs for electrical steels and standard winding
//! conductors, plus the physical constants shared by the computation models.
//!
//! Catalogs are immutable static tables. Lookups by id fail with
//! `UnknownMaterial`; curve lookups interpolate linearly between bracketing
//! tabulated points and fail with `OutOfRange` outside the tabulated domain.
//! The engine never extrapolates material data.

pub mod conductor;
pub mod steel;

pub use conductor::{ConductorCatalog, ConductorKind, ConductorRecord};
pub use steel::{SteelCatalog, SteelRecord};

use crate::errors::{DesignError, DesignResult};

/// Copper conductivity at 15 °C, m/(Ω·mm²)
pub const COPPER_CONDUCTIVITY: f64 = 57_000.0;

/// Copper density, kg/m³
pub const COPPER_DENSITY_KG_M3: f64 = 8920.0;

/// Electrical steel density, kg/m³
pub const STEEL_DENSITY_KG_M3: f64 = 7600.0;

/// Linear interpolation over a tabulated curve.
///
/// `xs` must be strictly increasing and the same length as `ys`. Exact at
/// tabulated points; strictly linear between bracketing points; fails with
/// `OutOfRange` for arguments outside `[xs[0], xs[last]]`.
pub(crate) fn interp_linear(curve: &str, xs: &[f64], ys: &[f64], x: f64) -> DesignResult<f64> {
    debug_assert_eq!(xs.len(), ys.len());
    debug_assert!(xs.len() >= 2);

    let (min, max) = (xs[0], xs[xs.len() - 1]);
    if x < min || x > max {
        return Err(DesignError::out_of_range(curve, x, min, max));
    }

    // partition_point never returns 0 here because x >= xs[0]
    let hi = xs.partition_point(|&p| p < x).max(1).min(xs.len() - 1);
    let lo = hi - 1;
    if x == xs[lo] {
        return Ok(ys[lo]);
    }
    let t = (x - xs[lo]) / (xs[hi] - xs[lo]);
    Ok(ys[lo] + t * (ys[hi] - ys[lo]))
}
