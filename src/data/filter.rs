use super::model::{RawRow, RawTable};

// ---------------------------------------------------------------------------
// Columns that never reach the model
// ---------------------------------------------------------------------------

/// Spreadsheet artefacts.
pub const DROP_COLUMNS: &[&str] = &["Unnamed: 24"];

/// Free-text operator comments.
pub const TEXT_HEAVY_COLUMNS: &[&str] = &["PRE TEST CMT", "POST TEST CMT", "POST TEST CMT.1"];

/// Provenance metadata with no physical meaning.
pub const META_COLUMNS: &[&str] = &["Source_File", "LABORATORY", "TEST IDENT", "OPERATOR"];

/// Whether a column is removed before typing, imputation and encoding.
pub fn is_ignored(column: &str) -> bool {
    DROP_COLUMNS
        .iter()
        .chain(TEXT_HEAVY_COLUMNS)
        .chain(META_COLUMNS)
        .any(|c| *c == column)
}

/// Remove every ignored column from a table. Absent columns are skipped.
pub fn drop_ignored_columns(table: &RawTable) -> RawTable {
    let columns: Vec<String> = table
        .columns
        .iter()
        .filter(|c| !is_ignored(c))
        .cloned()
        .collect();
    let rows = table.rows.iter().map(drop_ignored_fields).collect();
    RawTable::new(columns, rows)
}

/// Remove every ignored field from a single record.
pub fn drop_ignored_fields(row: &RawRow) -> RawRow {
    row.iter()
        .filter(|(col, _)| !is_ignored(col))
        .map(|(col, val)| (col.clone(), val.clone()))
        .collect()
}
