//! Single-row transform for live requests.
//!
//! Every step reads the frozen [`TrainingStats`]; nothing here computes a
//! statistic of its own, so a request is encoded exactly like a training row
//! apart from the explicit compensations of the [`InputProfile`].

use std::collections::HashMap;

use crate::data::filter::drop_ignored_fields;
use crate::data::model::{CellValue, RawRow};
use crate::data::schema::{MATERIAL, MATERIAL_NAME, MATERIAL_TYPE};
use crate::error::PipelineError;

use super::adjust::{material_factors, InputProfile, INTERFACE_RANGES};
use super::material::MaterialCategory;
use super::stats::{PreparedRow, TrainingStats};

/// One encoded request, in the model's feature order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub values: Vec<f64>,
    pub material_type: MaterialCategory,
}

pub struct InferenceTransformer<'a> {
    stats: &'a TrainingStats,
    feature_columns: &'a [String],
    profile: InputProfile,
}

impl<'a> InferenceTransformer<'a> {
    pub fn new(stats: &'a TrainingStats, feature_columns: &'a [String], profile: InputProfile) -> Self {
        InferenceTransformer {
            stats,
            feature_columns,
            profile,
        }
    }

    /// Encode one raw request row. Fails only when `MATERIAL` is missing;
    /// every other gap is filled from the training stats.
    pub fn transform(&self, row: &RawRow) -> Result<FeatureVector, PipelineError> {
        let mut row = drop_ignored_fields(row);
        let category = MaterialCategory::from_cell(Some(require_material(&row)?));
        row.insert(
            MATERIAL_TYPE.to_string(),
            CellValue::String(category.as_str().to_string()),
        );
        fill_material_name(&mut row, category);

        let mut prepared = self.stats.prepare(&row);
        if self.profile.remaps_interface_ranges() {
            remap_interface_ranges(&mut prepared, self.stats);
        }
        if self.profile.applies_material_factors() {
            apply_material_factors(&mut prepared, category);
        }
        clip_to_bounds(&mut prepared, self.stats);

        let encoded = self.stats.encode(&prepared);
        let values = reindex(&self.stats.dummy_columns, &encoded, self.feature_columns);
        Ok(FeatureVector {
            values,
            material_type: category,
        })
    }
}

fn is_blank(cell: &CellValue) -> bool {
    cell.is_null() || cell.as_str().is_some_and(|s| s.trim().is_empty())
}

/// The material identifier, rejecting absent, null and blank values.
pub fn require_material(row: &RawRow) -> Result<&CellValue, PipelineError> {
    match row.get(MATERIAL) {
        Some(cell) if !is_blank(cell) => Ok(cell),
        _ => Err(PipelineError::MissingMaterial),
    }
}

/// Substitute the family's representative name when no material name was given.
pub fn fill_material_name(row: &mut RawRow, category: MaterialCategory) {
    if row.get(MATERIAL_NAME).map_or(true, is_blank) {
        row.insert(
            MATERIAL_NAME.to_string(),
            CellValue::String(category.canonical_name().to_string()),
        );
    }
}

/// Rescale client-supplied values from the form's range into the training
/// range. Imputed medians are already in training units and stay as they are.
pub fn remap_interface_ranges(prepared: &mut PreparedRow, stats: &TrainingStats) {
    for entry in &INTERFACE_RANGES {
        if !prepared.supplied.contains(entry.column) {
            continue;
        }
        if let Some(value) = prepared.numeric.get_mut(entry.column) {
            let remapped = entry.range.remap_into(*value, &stats.bounds(entry.column));
            log::debug!("{}: interface value {} -> {}", entry.column, value, remapped);
            *value = remapped;
        }
    }
}

pub fn apply_material_factors(prepared: &mut PreparedRow, category: MaterialCategory) {
    for entry in material_factors(category) {
        if let Some(value) = prepared.numeric.get_mut(entry.column) {
            *value *= entry.factor;
        }
    }
}

/// Clip every numeric value into its training bounds.
pub fn clip_to_bounds(prepared: &mut PreparedRow, stats: &TrainingStats) {
    for (column, value) in prepared.numeric.iter_mut() {
        *value = stats.bounds(column).clip(*value);
    }
}

/// Reorder `values` (named by `columns`) into `target` order. Target columns
/// without a value are 0; values not named in `target` are dropped.
pub fn reindex(columns: &[String], values: &[f64], target: &[String]) -> Vec<f64> {
    let lookup: HashMap<&str, f64> = columns
        .iter()
        .map(String::as_str)
        .zip(values.iter().copied())
        .collect();
    target
        .iter()
        .map(|c| lookup.get(c.as_str()).copied().unwrap_or(0.0))
        .collect()
}
