//! Proxy risk label for training.
//!
//! The test exports carry no measured risk value, so the training target is a
//! fixed weighted blend of normalized measurements. Faster ignition and
//! lighter specimens count as riskier, so those two inputs are inverted.

use crate::data::model::RawTable;
use crate::data::schema::{C_FACTOR, FLOW_FACTOR, HEAT_FLUX, SPECIMEN_MASS, SURF_AREA, TIME_TO_IGN};
use crate::error::PipelineError;

use super::numeric::{median, min_max_normalize};

/// One input of the proxy blend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProxyWeight {
    pub column: &'static str,
    pub weight: f64,
    /// Use `1 - x` of the normalized value.
    pub inverted: bool,
}

/// Weights sum to 1.0.
pub const PROXY_WEIGHTS: [ProxyWeight; 6] = [
    ProxyWeight { column: HEAT_FLUX, weight: 0.35, inverted: false },
    ProxyWeight { column: TIME_TO_IGN, weight: 0.30, inverted: true },
    ProxyWeight { column: SURF_AREA, weight: 0.15, inverted: false },
    ProxyWeight { column: FLOW_FACTOR, weight: 0.10, inverted: false },
    ProxyWeight { column: SPECIMEN_MASS, weight: 0.05, inverted: true },
    ProxyWeight { column: C_FACTOR, weight: 0.05, inverted: false },
];

/// Columns the proxy label cannot be computed without.
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    PROXY_WEIGHTS.iter().map(|w| w.column)
}

/// Compute the 0–100 proxy score of every row, before any imputation.
///
/// A missing cell is normalized at its column median; an entirely missing
/// column normalizes to 0.
pub fn compute_proxy_scores(table: &RawTable) -> Result<Vec<f64>, PipelineError> {
    let missing: Vec<String> = required_columns()
        .filter(|c| !table.has_column(c))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::MissingColumns(missing));
    }

    let mut scores = vec![0.0; table.len()];
    for input in &PROXY_WEIGHTS {
        let normalized = min_max_normalize(&table.numeric_column(input.column));
        let present: Vec<f64> = normalized.iter().flatten().copied().collect();
        let fallback = median(&present).unwrap_or(0.0);

        for (score, value) in scores.iter_mut().zip(&normalized) {
            let x = value.unwrap_or(fallback);
            let x = if input.inverted { 1.0 - x } else { x };
            *score += input.weight * x;
        }
    }

    Ok(scores
        .into_iter()
        .map(|s| (s * 100.0).clamp(0.0, 100.0))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, RawRow};

    fn table(rows: &[[Option<f64>; 6]]) -> RawTable {
        let columns: Vec<String> = required_columns().map(str::to_string).collect();
        let rows = rows
            .iter()
            .map(|values| {
                columns
                    .iter()
                    .zip(values)
                    .map(|(c, v)| (c.clone(), v.map(CellValue::Float).unwrap_or(CellValue::Null)))
                    .collect::<RawRow>()
            })
            .collect();
        RawTable::new(columns, rows)
    }

    #[test]
    fn weights_sum_to_one() {
        let total: f64 = PROXY_WEIGHTS.iter().map(|w| w.weight).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn extremes_map_to_the_ends_of_the_scale() {
        // columns: heat flux, tti, surf area, flow, mass, c factor
        let t = table(&[
            [Some(100.0), Some(10.0), Some(0.01), Some(1.0), Some(10.0), Some(0.05)],
            [Some(10.0), Some(600.0), Some(0.001), Some(0.5), Some(90.0), Some(0.01)],
        ]);
        let scores = compute_proxy_scores(&t).unwrap();
        assert!((scores[0] - 100.0).abs() < 1e-9);
        assert!(scores[1].abs() < 1e-9);
    }

    #[test]
    fn constant_columns_stay_in_range() {
        let row = [Some(50.0), Some(60.0), Some(0.01), Some(1.0), Some(20.0), Some(0.04)];
        let scores = compute_proxy_scores(&table(&[row, row, row])).unwrap();
        for s in scores {
            // every column normalizes to 0, the two inverted ones contribute 0.30 + 0.05
            assert!((s - 35.0).abs() < 1e-9);
        }
    }

    #[test]
    fn missing_cells_fall_back_to_the_column_median() {
        let t = table(&[
            [Some(0.0), Some(1.0), Some(0.0), Some(0.0), Some(0.0), Some(0.0)],
            [Some(10.0), Some(1.0), Some(0.0), Some(0.0), Some(0.0), Some(0.0)],
            [None, Some(1.0), Some(0.0), Some(0.0), Some(0.0), Some(0.0)],
        ]);
        let scores = compute_proxy_scores(&t).unwrap();
        assert!(scores.iter().all(|s| s.is_finite() && (0.0..=100.0).contains(s)));
        // median of normalized heat flux {0, 1} is 0.5
        assert!((scores[2] - (0.35 * 0.5 + 0.35) * 100.0).abs() < 1e-9);
    }

    #[test]
    fn missing_required_columns_are_reported() {
        let t = RawTable::new(vec![HEAT_FLUX.to_string()], vec![]);
        match compute_proxy_scores(&t) {
            Err(PipelineError::MissingColumns(cols)) => {
                assert_eq!(cols.len(), 5);
                assert!(cols.contains(&TIME_TO_IGN.to_string()));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
