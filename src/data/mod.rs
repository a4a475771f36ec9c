/// Data layer: raw table types, loading, and column filtering.
///
/// ```text
///  export.csv / records.json / table.parquet
///        │ loader::load_file   (headers normalized, cell types guessed)
///        ▼
///  RawTable { columns, rows: Vec<RawRow> }
///        │ filter::drop_ignored_columns   (meta, comments, artefacts)
///        ▼
///  pipeline::prepare
/// ```
///
/// `schema` names the columns both sides agree on.

pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;
