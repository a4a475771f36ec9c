//! Fixed domain compensations applied to request values before scaling.
//!
//! Both tables are deliberately narrow: only the columns listed here are
//! touched.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::data::schema::{HEAT_FLUX, TIME_TO_IGN};

use super::material::MaterialCategory;
use super::numeric::Bounds;

/// Units a request is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputProfile {
    /// Raw apparatus units, exactly as in the training export.
    Measurement,
    /// Values typed into the assessment form: interface ranges are remapped
    /// and material factors applied.
    #[default]
    Interface,
}

impl InputProfile {
    pub fn remaps_interface_ranges(&self) -> bool {
        matches!(self, InputProfile::Interface)
    }

    pub fn applies_material_factors(&self) -> bool {
        matches!(self, InputProfile::Interface)
    }
}

impl FromStr for InputProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "measurement" => Ok(InputProfile::Measurement),
            "interface" => Ok(InputProfile::Interface),
            other => Err(format!("unknown input profile '{other}'")),
        }
    }
}

impl fmt::Display for InputProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputProfile::Measurement => f.write_str("measurement"),
            InputProfile::Interface => f.write_str("interface"),
        }
    }
}

// ---------------------------------------------------------------------------
// Interface ranges
// ---------------------------------------------------------------------------

/// Range the assessment form accepts for a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterfaceRange {
    pub column: &'static str,
    pub range: Bounds,
}

pub const INTERFACE_RANGES: [InterfaceRange; 1] = [InterfaceRange {
    column: HEAT_FLUX,
    range: Bounds { min: 0.0, max: 2000.0 },
}];

// ---------------------------------------------------------------------------
// Material factors
// ---------------------------------------------------------------------------

/// Multiplier applied to one column for one material family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialFactor {
    pub column: &'static str,
    pub factor: f64,
}

const POLYMER_FACTORS: [MaterialFactor; 2] = [
    MaterialFactor { column: HEAT_FLUX, factor: 1.2 },
    MaterialFactor { column: TIME_TO_IGN, factor: 0.8 },
];

const COMPOSITE_FACTORS: [MaterialFactor; 2] = [
    MaterialFactor { column: HEAT_FLUX, factor: 1.0 },
    MaterialFactor { column: TIME_TO_IGN, factor: 1.0 },
];

const GENERIC_FACTORS: [MaterialFactor; 2] = [
    MaterialFactor { column: HEAT_FLUX, factor: 0.9 },
    MaterialFactor { column: TIME_TO_IGN, factor: 1.1 },
];

pub fn material_factors(category: MaterialCategory) -> &'static [MaterialFactor] {
    match category {
        MaterialCategory::Polymer => &POLYMER_FACTORS,
        MaterialCategory::Composite => &COMPOSITE_FACTORS,
        MaterialCategory::Generic => &GENERIC_FACTORS,
    }
}
