//! # Standard Conductor Catalog
//!
//! Rectangular copper conductors in the standard sizes the winding models
//! can be built from: enamelled strands for stator bars and bare buses for
//! rotor field coils. Dimensions are bare copper in mm, sections in mm²
//! (corner radii already deducted), insulation build per side pair in mm.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{DesignError, DesignResult};

/// What a conductor is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConductorKind {
    /// Insulated strand for stator bars
    Strand,
    /// Bare bus for rotor field coils
    Bus,
}

/// One standard conductor size.
#[derive(Debug, Serialize)]
pub struct ConductorRecord {
    pub id: &'static str,
    pub kind: ConductorKind,
    /// Bare height, mm
    pub height_mm: f64,
    /// Bare width, mm
    pub width_mm: f64,
    /// Copper section, mm²
    pub section_mm2: f64,
    /// Insulation build on the height, mm
    pub insulation_height_mm: f64,
    /// Insulation build on the width, mm
    pub insulation_width_mm: f64,
}

impl ConductorRecord {
    /// Overall height including insulation, mm.
    pub fn overall_height_mm(&self) -> f64 {
        self.height_mm + self.insulation_height_mm
    }

    /// Overall width including insulation, mm.
    pub fn overall_width_mm(&self) -> f64 {
        self.width_mm + self.insulation_width_mm
    }
}

static RECORDS: [ConductorRecord; 13] = [
    ConductorRecord {
        id: "strand-1.8x6.3",
        kind: ConductorKind::Strand,
        height_mm: 1.8,
        width_mm: 6.3,
        section_mm2: 11.1,
        insulation_height_mm: 0.40,
        insulation_width_mm: 0.42,
    },
    ConductorRecord {
        id: "strand-2.0x7.1",
        kind: ConductorKind::Strand,
        height_mm: 2.0,
        width_mm: 7.1,
        section_mm2: 13.9,
        insulation_height_mm: 0.40,
        insulation_width_mm: 0.42,
    },
    ConductorRecord {
        id: "strand-2.24x7.1",
        kind: ConductorKind::Strand,
        height_mm: 2.24,
        width_mm: 7.1,
        section_mm2: 15.6,
        insulation_height_mm: 0.40,
        insulation_width_mm: 0.42,
    },
    ConductorRecord {
        id: "strand-2.24x10.0",
        kind: ConductorKind::Strand,
        height_mm: 2.24,
        width_mm: 10.0,
        section_mm2: 22.2,
        insulation_height_mm: 0.40,
        insulation_width_mm: 0.42,
    },
    ConductorRecord {
        id: "strand-2.5x8.0",
        kind: ConductorKind::Strand,
        height_mm: 2.5,
        width_mm: 8.0,
        section_mm2: 19.6,
        insulation_height_mm: 0.40,
        insulation_width_mm: 0.42,
    },
    ConductorRecord {
        id: "strand-2.83x10.0",
        kind: ConductorKind::Strand,
        height_mm: 2.83,
        width_mm: 10.0,
        section_mm2: 27.7,
        insulation_height_mm: 0.40,
        insulation_width_mm: 0.42,
    },
    ConductorRecord {
        id: "bus-5.6x25.0",
        kind: ConductorKind::Bus,
        height_mm: 5.6,
        width_mm: 25.0,
        section_mm2: 138.9,
        insulation_height_mm: 0.0,
        insulation_width_mm: 0.0,
    },
    ConductorRecord {
        id: "bus-6.3x28.0",
        kind: ConductorKind::Bus,
        height_mm: 6.3,
        width_mm: 28.0,
        section_mm2: 175.3,
        insulation_height_mm: 0.0,
        insulation_width_mm: 0.0,
    },
    ConductorRecord {
        id: "bus-7.1x32.0",
        kind: ConductorKind::Bus,
        height_mm: 7.1,
        width_mm: 32.0,
        section_mm2: 225.6,
        insulation_height_mm: 0.0,
        insulation_width_mm: 0.0,
    },
    ConductorRecord {
        id: "bus-8.0x35.5",
        kind: ConductorKind::Bus,
        height_mm: 8.0,
        width_mm: 35.5,
        section_mm2: 275.0,
        insulation_height_mm: 0.0,
        insulation_width_mm: 0.0,
    },
    ConductorRecord {
        id: "bus-9.0x40.0",
        kind: ConductorKind::Bus,
        height_mm: 9.0,
        width_mm: 40.0,
        section_mm2: 358.5,
        insulation_height_mm: 0.0,
        insulation_width_mm: 0.0,
    },
    ConductorRecord {
        id: "bus-10.0x45.0",
        kind: ConductorKind::Bus,
        height_mm: 10.0,
        width_mm: 45.0,
        section_mm2: 448.5,
        insulation_height_mm: 0.0,
        insulation_width_mm: 0.0,
    },
    ConductorRecord {
        id: "bus-12.5x50.0",
        kind: ConductorKind::Bus,
        height_mm: 12.5,
        width_mm: 50.0,
        section_mm2: 622.9,
        insulation_height_mm: 0.0,
        insulation_width_mm: 0.0,
    },
];

/// The built-in conductor catalog.
pub struct ConductorCatalog {
    records: &'static [ConductorRecord],
}

static CATALOG: Lazy<ConductorCatalog> = Lazy::new(|| ConductorCatalog { records: &RECORDS });

impl ConductorCatalog {
    /// The shared catalog instance.
    pub fn global() -> &'static ConductorCatalog {
        &CATALOG
    }

    /// Look up a conductor by id.
    pub fn lookup(&self, id: &str) -> DesignResult<&'static ConductorRecord> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| DesignError::unknown_material(id))
    }

    /// Pick the largest-section standard conductor of the given kind whose
    /// overall dimensions fit the available space.
    ///
    /// Fails with `InvalidSpec` when no standard size fits.
    pub fn pick(
        &self,
        kind: ConductorKind,
        max_height_mm: f64,
        max_width_mm: f64,
    ) -> DesignResult<&'static ConductorRecord> {
        self.records
            .iter()
            .filter(|r| {
                r.kind == kind
                    && r.overall_height_mm() <= max_height_mm
                    && r.overall_width_mm() <= max_width_mm
            })
            .max_by(|a, b| a.section_mm2.total_cmp(&b.section_mm2))
            .ok_or_else(|| {
                DesignError::invalid_spec(
                    "conductor",
                    format!("{max_height_mm:.2}x{max_width_mm:.2}"),
                    "no standard conductor fits the available slot space",
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let c = ConductorCatalog::global().lookup("bus-8.0x35.5").unwrap();
        assert_eq!(c.kind, ConductorKind::Bus);
        assert_eq!(c.section_mm2, 275.0);
    }

    #[test]
    fn test_lookup_unknown() {
        let err = ConductorCatalog::global().lookup("strand-9x9").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_MATERIAL");
    }

    #[test]
    fn test_pick_largest_fitting_strand() {
        // height limit excludes 2.5 and 2.83 mm strands
        let c = ConductorCatalog::global()
            .pick(ConductorKind::Strand, 2.7, 10.5)
            .unwrap();
        assert_eq!(c.id, "strand-2.24x10.0");
    }

    #[test]
    fn test_pick_respects_kind() {
        let c = ConductorCatalog::global()
            .pick(ConductorKind::Bus, 8.5, 40.0)
            .unwrap();
        assert_eq!(c.id, "bus-8.0x35.5");
    }

    #[test]
    fn test_pick_nothing_fits() {
        let err = ConductorCatalog::global()
            .pick(ConductorKind::Bus, 5.0, 20.0)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SPEC");
    }
}
