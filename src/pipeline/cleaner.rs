use serde::Serialize;

use crate::data::model::RawTable;
use crate::data::schema::{FIRE_PROPERTY_COLUMNS, MATERIAL_TYPE, THERMAL_COLUMNS};
use crate::error::PipelineError;

use super::prepare::prepare_base;
use super::proxy::compute_proxy_scores;
use super::stats::TrainingStats;

/// Descriptive grouping of the cleaned columns. Has no effect on fitting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureGroups {
    pub material_type: Vec<String>,
    pub thermal: Vec<String>,
    pub fire_properties: Vec<String>,
}

impl FeatureGroups {
    fn for_columns(columns: &[String]) -> Self {
        let present = |names: &[&str]| -> Vec<String> {
            names
                .iter()
                .filter(|n| columns.iter().any(|c| c == *n))
                .map(|n| n.to_string())
                .collect()
        };
        FeatureGroups {
            material_type: vec![MATERIAL_TYPE.to_string()],
            thermal: present(&THERMAL_COLUMNS),
            fire_properties: present(&FIRE_PROPERTY_COLUMNS),
        }
    }
}

/// The fully numeric training table.
#[derive(Debug, Clone)]
pub struct CleanedTable {
    /// Column order the model is fit against.
    pub feature_columns: Vec<String>,
    /// One encoded row per training record.
    pub features: Vec<Vec<f64>>,
    /// Proxy risk score per record.
    pub risk_scores: Vec<f64>,
    pub feature_groups: FeatureGroups,
}

impl CleanedTable {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Turn the raw training table into model-ready features plus the frozen
/// stats that reproduce the same transform at inference time.
///
/// Rows are encoded through [`TrainingStats::prepare`] and
/// [`TrainingStats::encode`], the exact steps the inference path uses.
pub fn clean_dataset(raw: &RawTable) -> Result<(CleanedTable, TrainingStats), PipelineError> {
    if raw.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }

    let base = prepare_base(raw)?;
    let risk_scores = compute_proxy_scores(&base.table)?;
    let stats = TrainingStats::from_base(&base);

    let features = base
        .table
        .rows
        .iter()
        .map(|row| stats.encode(&stats.prepare(row)))
        .collect();

    let cleaned = CleanedTable {
        feature_columns: stats.dummy_columns.clone(),
        features,
        risk_scores,
        feature_groups: FeatureGroups::for_columns(&base.table.columns),
    };
    log::info!(
        "cleaned {} rows into {} features",
        cleaned.len(),
        cleaned.feature_columns.len()
    );
    Ok((cleaned, stats))
}
