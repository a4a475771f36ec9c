use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the raw fire-properties table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a spreadsheet export carries.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// `Null` and NaN floats are both missing values.
    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Whether the cell holds a number-like value (bools count as 0/1).
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            CellValue::Integer(_) | CellValue::Float(_) | CellValue::Bool(_)
        )
    }

    /// Numeric view of the cell. Text is not parsed here, see [`CellValue::coerce_f64`].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if v.is_finite() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Like [`CellValue::as_f64`] but also accepts numeric text such as `" 35.5 "`.
    pub fn coerce_f64(&self) -> Option<f64> {
        match self {
            CellValue::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            other => other.as_f64(),
        }
    }

    /// Text used as a categorical level. `None` for missing values.
    pub fn as_label(&self) -> Option<String> {
        if self.is_null() {
            return None;
        }
        match self {
            CellValue::String(s) => Some(s.clone()),
            CellValue::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
            other => Some(other.to_string()),
        }
    }

    /// The string payload, only for genuine text cells.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// One record of the raw table: column name → cell.
pub type RawRow = BTreeMap<String, CellValue>;

// ---------------------------------------------------------------------------
// RawTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The raw tabular dataset with its column order preserved from the source.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Column names in source order.
    pub columns: Vec<String>,
    /// All records. A row may omit a column, which reads as `Null`.
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<RawRow>) -> Self {
        RawTable { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Cells of one column, `Null` where a row lacks it.
    pub fn column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a CellValue> + 'a {
        self.rows
            .iter()
            .map(move |row| row.get(column).unwrap_or(&CellValue::Null))
    }

    /// Non-missing numeric values of a column, `None` where missing.
    pub fn numeric_column(&self, column: &str) -> Vec<Option<f64>> {
        self.column(column).map(CellValue::as_f64).collect()
    }

    /// A column is numeric when every non-missing cell is number-like.
    /// An entirely missing column counts as numeric.
    pub fn is_numeric_column(&self, column: &str) -> bool {
        self.column(column)
            .filter(|cell| !cell.is_null())
            .all(CellValue::is_numeric)
    }

    /// Append a derived column, overwriting any existing one of the same name.
    pub fn insert_column<F>(&mut self, column: &str, mut derive: F)
    where
        F: FnMut(&RawRow) -> CellValue,
    {
        for row in &mut self.rows {
            let value = derive(row);
            row.insert(column.to_string(), value);
        }
        if !self.has_column(column) {
            self.columns.push(column.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_is_missing() {
        assert!(CellValue::Float(f64::NAN).is_null());
        assert!(CellValue::Null.is_null());
        assert!(!CellValue::Float(0.0).is_null());
        assert_eq!(CellValue::Float(f64::NAN).as_f64(), None);
    }

    #[test]
    fn coerce_parses_numeric_text_only() {
        assert_eq!(CellValue::String(" 35.5 ".into()).coerce_f64(), Some(35.5));
        assert_eq!(CellValue::String("n/a".into()).coerce_f64(), None);
        assert_eq!(CellValue::String("35".into()).as_f64(), None);
        assert_eq!(CellValue::Bool(true).coerce_f64(), Some(1.0));
    }

    #[test]
    fn labels_follow_the_cell_type() {
        assert_eq!(CellValue::Integer(3).as_label().as_deref(), Some("3"));
        assert_eq!(CellValue::Float(2.5).as_label().as_deref(), Some("2.5"));
        assert_eq!(CellValue::Bool(false).as_label().as_deref(), Some("False"));
        assert_eq!(CellValue::Null.as_label(), None);
    }

    #[test]
    fn numeric_columns_ignore_missing_cells() {
        let mut a = RawRow::new();
        a.insert("x".into(), CellValue::Integer(1));
        a.insert("y".into(), CellValue::String("HORIZONTAL".into()));
        let mut b = RawRow::new();
        b.insert("x".into(), CellValue::Null);
        let table = RawTable::new(vec!["x".into(), "y".into(), "z".into()], vec![a, b]);

        assert!(table.is_numeric_column("x"));
        assert!(!table.is_numeric_column("y"));
        assert!(table.is_numeric_column("z"));
        assert_eq!(table.numeric_column("x"), vec![Some(1.0), None]);
    }

    #[test]
    fn insert_column_appends_once() {
        let mut table = RawTable::new(vec!["x".into()], vec![RawRow::new(), RawRow::new()]);
        table.insert_column("flag", |_| CellValue::Bool(true));
        table.insert_column("flag", |_| CellValue::Bool(false));
        assert_eq!(table.columns, vec!["x".to_string(), "flag".to_string()]);
        assert!(table.column("flag").all(|c| *c == CellValue::Bool(false)));
    }
}
