use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::data::model::{CellValue, RawRow, RawTable};
use crate::data::schema::{MATERIAL, MATERIAL_TYPE};
use crate::error::PipelineError;

use super::material::MaterialCategory;
use super::numeric::{median, Bounds};
use super::prepare::{prepare_base, BaseTable};

/// Level used for missing categorical values.
pub const UNKNOWN_LEVEL: &str = "unknown";

// ---------------------------------------------------------------------------
// TrainingStats – the frozen feature contract
// ---------------------------------------------------------------------------

/// Everything needed to reproduce the training transform on a later row.
///
/// Captured once from the training table and never mutated afterwards.
/// `dummy_columns` lists the numeric columns followed by one indicator per
/// categorical level except the first, which is the reference level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub medians: BTreeMap<String, f64>,
    /// Bounds after median imputation.
    pub min_max: BTreeMap<String, Bounds>,
    /// Sorted distinct levels per categorical column, "unknown" included when seen.
    pub category_levels: BTreeMap<String, Vec<String>>,
    pub dummy_columns: Vec<String>,
}

/// A row after imputation, before scaling and encoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedRow {
    pub numeric: BTreeMap<String, f64>,
    /// Numeric columns whose value came from the row rather than a median.
    pub supplied: BTreeSet<String>,
    /// Categorical values, already restricted to the training levels.
    pub categorical: BTreeMap<String, String>,
}

impl TrainingStats {
    /// Capture stats straight from a raw training table.
    pub fn capture(raw: &RawTable) -> Result<Self, PipelineError> {
        prepare_base(raw).map(|base| Self::from_base(&base))
    }

    /// Capture stats from an already prepared base table.
    pub fn from_base(base: &BaseTable) -> Self {
        let table = &base.table;
        let mut medians = BTreeMap::new();
        let mut min_max = BTreeMap::new();

        for column in &base.numeric_columns {
            let values = table.numeric_column(column);
            let present: Vec<f64> = values.iter().flatten().copied().collect();
            // an all-missing column imputes 0 and scales to 0
            let fill = median(&present).unwrap_or(0.0);
            let imputed: Vec<f64> = values.iter().map(|v| v.unwrap_or(fill)).collect();
            let bounds = Bounds::of(&imputed).unwrap_or(Bounds::new(fill, fill));

            medians.insert(column.clone(), fill);
            min_max.insert(column.clone(), bounds);
        }

        let mut category_levels = BTreeMap::new();
        for column in &base.categorical_columns {
            let levels: BTreeSet<String> = table
                .column(column)
                .map(|cell| cell.as_label().unwrap_or_else(|| UNKNOWN_LEVEL.to_string()))
                .collect();
            category_levels.insert(column.clone(), levels.into_iter().collect::<Vec<_>>());
        }

        let mut dummy_columns = base.numeric_columns.clone();
        for column in &base.categorical_columns {
            for level in category_levels[column].iter().skip(1) {
                dummy_columns.push(dummy_name(column, level));
            }
        }

        log::debug!(
            "captured stats: {} numeric, {} categorical, {} encoded columns",
            base.numeric_columns.len(),
            base.categorical_columns.len(),
            dummy_columns.len()
        );

        TrainingStats {
            numeric_columns: base.numeric_columns.clone(),
            categorical_columns: base.categorical_columns.clone(),
            medians,
            min_max,
            category_levels,
            dummy_columns,
        }
    }

    /// Training median of a numeric column (0 for columns never seen).
    pub fn median(&self, column: &str) -> f64 {
        self.medians.get(column).copied().unwrap_or(0.0)
    }

    /// Training bounds of a numeric column (degenerate for columns never seen).
    pub fn bounds(&self, column: &str) -> Bounds {
        self.min_max
            .get(column)
            .copied()
            .unwrap_or(Bounds::new(0.0, 0.0))
    }

    pub fn levels(&self, column: &str) -> &[String] {
        self.category_levels
            .get(column)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Map a categorical value onto a training level. Missing values become
    /// "unknown"; values never seen in training become "unknown" when that
    /// level exists and the reference level otherwise.
    pub fn restrict_level(&self, column: &str, value: Option<String>) -> String {
        let levels = self.levels(column);
        let value = value.unwrap_or_else(|| UNKNOWN_LEVEL.to_string());
        if levels.is_empty() || levels.contains(&value) {
            return value;
        }
        log::debug!("unseen level {value:?} for {column}, restricting");
        if levels.iter().any(|l| l == UNKNOWN_LEVEL) {
            UNKNOWN_LEVEL.to_string()
        } else {
            levels[0].clone()
        }
    }

    /// Impute a raw row: numbers (or numeric text) are kept, anything else
    /// falls back to the training median; categoricals are restricted to the
    /// training levels. A row without `material_type` gets it derived from
    /// `MATERIAL`.
    pub fn prepare(&self, row: &RawRow) -> PreparedRow {
        let mut prepared = PreparedRow::default();
        for column in &self.numeric_columns {
            let value = match row.get(column).and_then(CellValue::coerce_f64) {
                Some(v) => {
                    prepared.supplied.insert(column.clone());
                    v
                }
                None => self.median(column),
            };
            prepared.numeric.insert(column.clone(), value);
        }
        for column in &self.categorical_columns {
            let label = match row.get(column).and_then(CellValue::as_label) {
                None if column == MATERIAL_TYPE => {
                    Some(MaterialCategory::from_cell(row.get(MATERIAL)).as_str().to_string())
                }
                label => label,
            };
            prepared
                .categorical
                .insert(column.clone(), self.restrict_level(column, label));
        }
        prepared
    }

    /// Scale and one-hot encode a prepared row, in `dummy_columns` order.
    pub fn encode(&self, row: &PreparedRow) -> Vec<f64> {
        let mut encoded = Vec::with_capacity(self.dummy_columns.len());
        for column in &self.numeric_columns {
            let value = row
                .numeric
                .get(column)
                .copied()
                .unwrap_or_else(|| self.median(column));
            encoded.push(self.bounds(column).scale(value));
        }
        for column in &self.categorical_columns {
            let value = row.categorical.get(column);
            for level in self.levels(column).iter().skip(1) {
                encoded.push(if value == Some(level) { 1.0 } else { 0.0 });
            }
        }
        encoded
    }
}

/// Name of the indicator column for one categorical level.
pub fn dummy_name(column: &str, level: &str) -> String {
    format!("{column}_{level}")
}
