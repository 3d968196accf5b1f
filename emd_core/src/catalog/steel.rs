//! # Electrical Steel Catalog
//!
//! Magnetization (B-H) and specific-loss curves for the electrical steels
//! the engine knows about: cold-rolled lamination grades for the stator core
//! and a forging steel for the rotor body. Field strengths are tabulated in
//! A/cm against flux density in T; specific losses in W/kg on a 0.1 T grid.
//!
//! Curves come from manufacturer data measured at 50 Hz. Forging steels
//! carry no loss curve (the rotor body sees dc flux at synchronous speed).

use once_cell::sync::Lazy;

use crate::errors::{DesignError, DesignResult};

use super::interp_linear;

/// One steel grade: magnetization curve, optional loss curve, density.
#[derive(Debug)]
pub struct SteelRecord {
    pub id: &'static str,
    pub name: &'static str,
    pub density_kg_m3: f64,
    /// Flux density grid for the magnetization curve, T (strictly increasing)
    flux_density_t: &'static [f64],
    /// Field strength at each grid point, A/cm
    field_strength_a_cm: &'static [f64],
    /// Specific losses on [`LOSS_GRID_T`], W/kg; `None` for forging steels
    specific_loss_w_kg: Option<&'static [f64]>,
}

/// Flux density grid of the specific-loss curves, T.
const LOSS_GRID_T: [f64; 18] = [
    0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.1, 1.2, 1.3, 1.4, 1.5, 1.6, 1.7,
];

impl SteelRecord {
    /// Field strength for a given flux density, A/cm.
    pub fn field_strength(&self, flux_density_t: f64) -> DesignResult<f64> {
        interp_linear(
            &format!("{} B-H", self.id),
            self.flux_density_t,
            self.field_strength_a_cm,
            flux_density_t,
        )
    }

    /// Highest flux density covered by the magnetization curve, T.
    pub fn max_flux_density_t(&self) -> f64 {
        self.flux_density_t[self.flux_density_t.len() - 1]
    }

    /// Field strength with the magnetization curve linearly extended past
    /// its tabulated domain, A/cm.
    ///
    /// Below the first tabulated point the curve is anchored to the origin;
    /// above the last it continues the terminal slope. Characteristic sweeps
    /// that span the whole voltage range use this; point solutions use
    /// [`SteelRecord::field_strength`] and surface `OutOfRange` instead.
    pub fn field_strength_extended(&self, flux_density_t: f64) -> f64 {
        let xs = self.flux_density_t;
        let ys = self.field_strength_a_cm;
        let last = xs.len() - 1;
        if flux_density_t <= xs[0] {
            if xs[0] <= 0.0 {
                return ys[0];
            }
            return ys[0] * flux_density_t / xs[0];
        }
        if flux_density_t >= xs[last] {
            let slope = (ys[last] - ys[last - 1]) / (xs[last] - xs[last - 1]);
            return ys[last] + (flux_density_t - xs[last]) * slope;
        }
        // in range, bracketing points always exist
        let hi = xs.partition_point(|&p| p < flux_density_t).max(1);
        let lo = hi - 1;
        let t = (flux_density_t - xs[lo]) / (xs[hi] - xs[lo]);
        ys[lo] + t * (ys[hi] - ys[lo])
    }

    /// Specific losses for a given flux density, W/kg.
    ///
    /// Fails with `UnknownMaterial` for grades that carry no loss curve
    /// (forging steels).
    pub fn specific_loss(&self, flux_density_t: f64) -> DesignResult<f64> {
        let losses = self
            .specific_loss_w_kg
            .ok_or_else(|| DesignError::unknown_material(format!("{} (no loss curve)", self.id)))?;
        interp_linear(
            &format!("{} losses", self.id),
            &LOSS_GRID_T,
            losses,
            flux_density_t,
        )
    }
}

/// Lamination steel 2414, mean curve
static STEEL_2414: SteelRecord = SteelRecord {
    id: "2414",
    name: "Lamination steel 2414, 0.5 mm",
    density_kg_m3: 7600.0,
    flux_density_t: &[
        0.0, 0.0052, 0.0078, 0.0097, 0.0143, 0.0181, 0.0221, 0.0272, 0.0321, 0.1094, 0.2492,
        0.429, 0.5763, 0.6759, 0.7575, 0.8267, 0.887, 0.9388, 1.2073, 1.2945, 1.3374, 1.3638,
        1.3839, 1.4007, 1.4124, 1.4252, 1.4349, 1.5052, 1.5556, 1.5951, 1.626, 1.6564, 1.6847,
        1.7085, 1.7301, 1.752,
    ],
    field_strength_a_cm: &[
        0.0, 0.03, 0.04, 0.05, 0.06, 0.07, 0.08, 0.09, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8,
        0.9, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0,
        70.0, 80.0, 90.0, 100.0,
    ],
    specific_loss_w_kg: Some(&[
        0.0, 0.0211, 0.0776, 0.1579, 0.2578, 0.3727, 0.5045, 0.6507, 0.8137, 0.994, 1.1965,
        1.4281, 1.6993, 2.0397, 2.4889, 2.9556, 3.3469, 3.6816,
    ]),
};

/// Lamination steel M270-50A, mean curve
static STEEL_M270_50A: SteelRecord = SteelRecord {
    id: "m270-50a",
    name: "Lamination steel M270-50A, 0.5 mm",
    density_kg_m3: 7600.0,
    flux_density_t: &[
        0.0, 0.0059, 0.0088, 0.0124, 0.0161, 0.0207, 0.0253, 0.0321, 0.0385, 0.1367, 0.2966,
        0.4586, 0.5602, 0.6405, 0.7121, 0.7761, 0.8349, 0.8871, 1.2003, 1.3051, 1.3522, 1.3793,
        1.4011, 1.4172, 1.4305, 1.4419, 1.4528, 1.5276, 1.5763, 1.6157, 1.65, 1.6772, 1.7042,
        1.729, 1.7499, 1.77,
    ],
    field_strength_a_cm: &[
        0.0, 0.03, 0.04, 0.05, 0.06, 0.07, 0.08, 0.09, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8,
        0.9, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0,
        70.0, 80.0, 90.0, 100.0,
    ],
    specific_loss_w_kg: Some(&[
        0.0, 0.0219, 0.0787, 0.1583, 0.2552, 0.3667, 0.4911, 0.6282, 0.7791, 0.9441, 1.1242,
        1.3285, 1.5634, 1.8465, 2.2095, 2.6015, 2.9473, 3.2372,
    ]),
};

/// Lamination steel M400-50A, mean curve
static STEEL_M400_50A: SteelRecord = SteelRecord {
    id: "m400-50a",
    name: "Lamination steel M400-50A, 0.5 mm",
    density_kg_m3: 7600.0,
    flux_density_t: &[
        0.0, 0.0047, 0.0066, 0.0086, 0.0107, 0.0126, 0.0149, 0.0171, 0.0196, 0.0476, 0.0939,
        0.1845, 0.3263, 0.4579, 0.5753, 0.6655, 0.7355, 0.7982, 1.1714, 1.2929, 1.3484, 1.3844,
        1.4098, 1.4292, 1.4449, 1.4582, 1.4683, 1.5476, 1.5966, 1.6344, 1.6656, 1.6929, 1.7185,
        1.7395, 1.7616, 1.7818,
    ],
    field_strength_a_cm: &[
        0.0, 0.03, 0.04, 0.05, 0.06, 0.07, 0.08, 0.09, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8,
        0.9, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0,
        70.0, 80.0, 90.0, 100.0,
    ],
    specific_loss_w_kg: Some(&[
        0.0, 0.0222, 0.0949, 0.2015, 0.3333, 0.4865, 0.6574, 0.8461, 1.0542, 1.2854, 1.5444,
        1.8362, 2.166, 2.548, 3.0173, 3.6242, 4.4446, 5.1435,
    ]),
};

/// Rotor forging steel 35HN3MFA
static STEEL_35HN3MFA: SteelRecord = SteelRecord {
    id: "35hn3mfa",
    name: "Forging steel 35HN3MFA",
    density_kg_m3: 7850.0,
    flux_density_t: &[
        0.81, 0.875, 0.94, 1.005, 1.075, 1.14, 1.205, 1.27, 1.335, 1.4, 1.465, 1.53, 1.6, 1.665,
        1.73, 1.795, 1.86, 1.925, 1.99, 2.055, 2.125, 2.19, 2.255, 2.32,
    ],
    field_strength_a_cm: &[
        11.94, 12.46, 12.98, 13.55, 14.18, 14.76, 15.39, 16.68, 18.87, 22.0, 25.85, 32.9, 44.5,
        67.0, 95.4, 127.5, 184.0, 290.0, 428.0, 697.5, 1100.0, 1490.0, 1880.0, 2270.0,
    ],
    specific_loss_w_kg: None,
};

/// The built-in steel catalog.
pub struct SteelCatalog {
    records: Vec<&'static SteelRecord>,
}

static CATALOG: Lazy<SteelCatalog> = Lazy::new(|| SteelCatalog {
    records: vec![
        &STEEL_2414,
        &STEEL_M270_50A,
        &STEEL_M400_50A,
        &STEEL_35HN3MFA,
    ],
});

impl SteelCatalog {
    /// The shared catalog instance.
    pub fn global() -> &'static SteelCatalog {
        &CATALOG
    }

    /// Look up a steel grade by id.
    pub fn lookup(&self, id: &str) -> DesignResult<&'static SteelRecord> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .copied()
            .ok_or_else(|| DesignError::unknown_material(id))
    }

    /// All known grade ids.
    pub fn ids(&self) -> Vec<&'static str> {
        self.records.iter().map(|r| r.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_grades() {
        let cat = SteelCatalog::global();
        assert_eq!(cat.lookup("2414").unwrap().id, "2414");
        assert_eq!(cat.lookup("m400-50a").unwrap().name.contains("M400"), true);
    }

    #[test]
    fn test_lookup_unknown_grade() {
        let err = SteelCatalog::global().lookup("m999-50a").unwrap_err();
        assert_eq!(err, DesignError::unknown_material("m999-50a"));
    }

    #[test]
    fn test_field_strength_exact_at_tabulated_point() {
        let steel = SteelCatalog::global().lookup("2414").unwrap();
        assert_eq!(steel.field_strength(1.2073).unwrap(), 2.0);
        assert_eq!(steel.field_strength(1.752).unwrap(), 100.0);
    }

    #[test]
    fn test_field_strength_is_linear() {
        let steel = SteelCatalog::global().lookup("2414").unwrap();
        // midway between (1.2073, 2.0) and (1.2945, 3.0)
        let h = steel.field_strength((1.2073 + 1.2945) / 2.0).unwrap();
        assert!((h - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_field_strength_out_of_range() {
        let steel = SteelCatalog::global().lookup("2414").unwrap();
        let err = steel.field_strength(2.0).unwrap_err();
        assert_eq!(err.error_code(), "OUT_OF_RANGE");
        // the saturated forging curve reaches further
        let rotor = SteelCatalog::global().lookup("35hn3mfa").unwrap();
        assert!(rotor.field_strength(2.0).is_ok());
        assert!(rotor.field_strength(0.5).is_err());
    }

    #[test]
    fn test_extended_field_strength_matches_curve_in_range() {
        let steel = SteelCatalog::global().lookup("2414").unwrap();
        assert_eq!(steel.field_strength_extended(1.2073), 2.0);
        let mid = (1.2073 + 1.2945) / 2.0;
        assert!((steel.field_strength_extended(mid) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_extended_field_strength_anchors_to_origin() {
        let rotor = SteelCatalog::global().lookup("35hn3mfa").unwrap();
        // half the first tabulated flux density gives half its field strength
        let h = rotor.field_strength_extended(0.405);
        assert!((h - 11.94 / 2.0).abs() < 1e-12);
        assert_eq!(rotor.field_strength_extended(0.0), 0.0);
    }

    #[test]
    fn test_extended_field_strength_continues_terminal_slope() {
        let steel = SteelCatalog::global().lookup("2414").unwrap();
        // last segment: (1.7301, 90) -> (1.752, 100)
        let slope = 10.0 / (1.752 - 1.7301);
        let h = steel.field_strength_extended(1.8);
        assert!((h - (100.0 + (1.8 - 1.752) * slope)).abs() < 1e-9);
    }

    #[test]
    fn test_specific_loss() {
        let steel = SteelCatalog::global().lookup("m270-50a").unwrap();
        assert_eq!(steel.specific_loss(1.0).unwrap(), 1.1242);
        let w = steel.specific_loss(1.05).unwrap();
        assert!((w - (1.1242 + 1.3285) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_forging_steel_has_no_loss_curve() {
        let rotor = SteelCatalog::global().lookup("35hn3mfa").unwrap();
        let err = rotor.specific_loss(1.0).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_MATERIAL");
    }
}
