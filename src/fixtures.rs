//! Small hand-written fire-properties table shared by unit tests.

use crate::data::model::{CellValue, RawRow, RawTable};

const COLUMNS: [&str; 11] = [
    "OPERATOR",
    "MATERIAL",
    "ORIENTATION",
    "HEAT FLUX",
    "TIME TO IGN",
    "SURF AREA",
    "FLOW FACTOR",
    "SPECIMEN MASS",
    "C FACTOR",
    "SCAN COUNT",
    "PRE TEST CMT",
];

fn text(s: &str) -> CellValue {
    CellValue::String(s.to_string())
}

fn num(v: f64) -> CellValue {
    CellValue::Float(v)
}

pub fn training_table() -> RawTable {
    use CellValue::Null;

    let rows: Vec<[CellValue; 11]> = vec![
        [text("JD"), text("PMMA"), text("HORIZONTAL"), num(25.0), num(60.0), num(0.01), num(1.2), num(20.5), num(0.040), Null, text("clean")],
        [text("JD"), text("Red oak"), text("VERTICAL"), num(50.0), num(120.0), num(0.01), num(1.1), num(45.0), num(0.042), Null, Null],
        [text("AB"), text("Rigid PVC sheet"), Null, Null, num(45.0), num(0.0088), num(1.3), num(18.0), num(0.041), Null, text("smoke")],
        [text("AB"), text("Carbon fiber laminate"), text("HORIZONTAL"), num(75.0), num(90.0), num(0.01), num(1.25), num(30.0), num(0.039), Null, Null],
        [text("CD"), text("Gypsum board"), text("VERTICAL"), num(35.0), num(300.0), num(0.0088), num(1.15), num(60.0), num(0.040), Null, Null],
        [text("CD"), text("Nylon 6"), text("HORIZONTAL"), num(50.0), num(30.0), num(0.01), num(1.2), num(15.0), num(0.043), Null, text("dripping")],
    ];

    let rows = rows
        .into_iter()
        .map(|cells| {
            COLUMNS
                .iter()
                .map(|c| c.to_string())
                .zip(cells)
                .collect::<RawRow>()
        })
        .collect();
    RawTable::new(COLUMNS.iter().map(|c| c.to_string()).collect(), rows)
}

/// A request-shaped row with only a material and optional heat flux / ignition time.
pub fn request_row(material: Option<&str>, heat_flux: Option<f64>, time_to_ign: Option<f64>) -> RawRow {
    let mut row = RawRow::new();
    row.insert(
        "MATERIAL".into(),
        material.map(text).unwrap_or(CellValue::Null),
    );
    if let Some(v) = heat_flux {
        row.insert("HEAT FLUX".into(), num(v));
    }
    if let Some(v) = time_to_ign {
        row.insert("TIME TO IGN".into(), num(v));
    }
    row
}
