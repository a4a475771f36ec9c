use std::fmt;

use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Keyword tables, checked in this order
// ---------------------------------------------------------------------------

const COMPOSITE_KEYWORDS: &[&str] = &["composite", "fiber", "fiberglass", "carbon", "laminate", "ply"];

// "pe " and "pp " keep their trailing space so "pe" inside other words does not match.
const POLYMER_KEYWORDS: &[&str] = &[
    "poly", "plastic", "nylon", "pvc", "pe ", "pp ", "pet", "epoxy", "resin", "vinyl", "rubber",
    "pmma", "acrylic",
];

/// Coarse material family derived from the free-text `MATERIAL` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MaterialCategory {
    Polymer,
    Composite,
    Generic,
}

impl MaterialCategory {
    pub const ALL: [MaterialCategory; 3] = [
        MaterialCategory::Polymer,
        MaterialCategory::Composite,
        MaterialCategory::Generic,
    ];

    /// Classify material text. Composite keywords win over polymer ones;
    /// anything unrecognised, including no text at all, is generic.
    pub fn classify(text: Option<&str>) -> Self {
        let Some(text) = text else {
            return MaterialCategory::Generic;
        };
        let text = text.to_lowercase();
        if COMPOSITE_KEYWORDS.iter().any(|k| text.contains(k)) {
            MaterialCategory::Composite
        } else if POLYMER_KEYWORDS.iter().any(|k| text.contains(k)) {
            MaterialCategory::Polymer
        } else {
            MaterialCategory::Generic
        }
    }

    /// Classify a raw cell. Only text cells are inspected.
    pub fn from_cell(cell: Option<&CellValue>) -> Self {
        Self::classify(cell.and_then(CellValue::as_str))
    }

    /// Level written into the `material_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialCategory::Polymer => "polymer",
            MaterialCategory::Composite => "composite",
            MaterialCategory::Generic => "generic",
        }
    }

    /// Plural label used in comparison text.
    pub fn label(&self) -> &'static str {
        match self {
            MaterialCategory::Polymer => "polymers",
            MaterialCategory::Composite => "composite materials",
            MaterialCategory::Generic => "generic baseline materials",
        }
    }

    /// Representative material name, used when a request omits `Material_Name`.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            MaterialCategory::Polymer => "Polymethyl methacrylate (PMMA)",
            MaterialCategory::Composite => "Glass fiber reinforced laminate",
            MaterialCategory::Generic => "Gypsum wallboard",
        }
    }
}

impl fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
