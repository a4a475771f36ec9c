use crate::data::filter::drop_ignored_columns;
use crate::data::model::{CellValue, RawTable};
use crate::data::schema::{MATERIAL, MATERIAL_TYPE, RISK_SCORE};
use crate::error::PipelineError;

use super::material::MaterialCategory;

/// The raw table after column dropping and material typing, with every
/// remaining column assigned a role. Both the cleaner and the stats capture
/// start from this, so they always agree on the column sets.
#[derive(Debug, Clone)]
pub struct BaseTable {
    pub table: RawTable,
    /// Numeric feature columns, in source order.
    pub numeric_columns: Vec<String>,
    /// Categorical feature columns, in source order, `MATERIAL` excluded.
    pub categorical_columns: Vec<String>,
}

/// Drop ignored columns, derive `material_type`, and split columns into
/// numeric and categorical.
pub fn prepare_base(raw: &RawTable) -> Result<BaseTable, PipelineError> {
    if !raw.has_column(MATERIAL) {
        return Err(PipelineError::MissingColumns(vec![MATERIAL.to_string()]));
    }

    let mut table = drop_ignored_columns(raw);
    table.insert_column(MATERIAL_TYPE, |row| {
        CellValue::String(MaterialCategory::from_cell(row.get(MATERIAL)).as_str().to_string())
    });

    let mut numeric_columns = Vec::new();
    let mut categorical_columns = Vec::new();
    for column in &table.columns {
        if column == MATERIAL || column == RISK_SCORE {
            continue;
        }
        if table.is_numeric_column(column) {
            numeric_columns.push(column.clone());
        } else {
            categorical_columns.push(column.clone());
        }
    }

    Ok(BaseTable {
        table,
        numeric_columns,
        categorical_columns,
    })
}
