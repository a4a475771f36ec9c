use serde::{Deserialize, Serialize};

use crate::data::model::{CellValue, RawRow};
use crate::data::schema::*;

/// A measurement as sent by a client: a number, or text that may parse as one.
/// Any other JSON value is kept as `Other` and read as missing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Measurement {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl From<&Measurement> for CellValue {
    fn from(m: &Measurement) -> Self {
        match m {
            Measurement::Number(v) => CellValue::Float(*v),
            Measurement::Text(s) => CellValue::String(s.clone()),
            Measurement::Other(_) => CellValue::Null,
        }
    }
}

/// One scoring request. Field names are the dataset's column names; the
/// snake_case names are accepted too.
///
/// `material` is optional at the type level so that a missing value reaches
/// validation and gets a client error instead of a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FirePropertiesInput {
    #[serde(default, rename = "Material_Name", alias = "material_name")]
    pub material_name: Option<String>,
    #[serde(default, rename = "MATERIAL", alias = "material")]
    pub material: Option<String>,
    #[serde(default, rename = "ORIENTATION", alias = "orientation")]
    pub orientation: Option<String>,
    #[serde(default, rename = "HEAT FLUX", alias = "heat_flux")]
    pub heat_flux: Option<Measurement>,
    #[serde(default, rename = "SURF AREA", alias = "surf_area")]
    pub surf_area: Option<Measurement>,
    #[serde(default, rename = "C FACTOR", alias = "c_factor")]
    pub c_factor: Option<Measurement>,
    #[serde(default, rename = "SPEC HOLDER DIFF", alias = "spec_holder_diff")]
    pub spec_holder_diff: Option<Measurement>,
    #[serde(default, rename = "SPECIMEN MASS", alias = "specimen_mass")]
    pub specimen_mass: Option<Measurement>,
    #[serde(default, rename = "SCAN TIME", alias = "scan_time")]
    pub scan_time: Option<Measurement>,
    #[serde(default, rename = "O2 DELAY TIME", alias = "o2_delay_time")]
    pub o2_delay_time: Option<Measurement>,
    #[serde(default, rename = "CO DELAY TIME", alias = "co_delay_time")]
    pub co_delay_time: Option<Measurement>,
    #[serde(default, rename = "CO2 DELAY TIME", alias = "co2_delay_time")]
    pub co2_delay_time: Option<Measurement>,
    #[serde(default, rename = "FLOW FACTOR", alias = "flow_factor")]
    pub flow_factor: Option<Measurement>,
    #[serde(default, rename = "SCAN COUNT", alias = "scan_count")]
    pub scan_count: Option<Measurement>,
    #[serde(default, rename = "TIME TO IGN", alias = "time_to_ign")]
    pub time_to_ign: Option<Measurement>,
    #[serde(default, rename = "END OF TEST SCAN", alias = "end_of_test_scan")]
    pub end_of_test_scan: Option<Measurement>,
    #[serde(default, rename = "END OF TEST TIME", alias = "end_of_test_time")]
    pub end_of_test_time: Option<Measurement>,
    #[serde(default, rename = "TEST STATUS", alias = "test_status")]
    pub test_status: Option<Measurement>,
}

impl FirePropertiesInput {
    fn measurements(&self) -> [(&'static str, &Option<Measurement>); 15] {
        [
            (HEAT_FLUX, &self.heat_flux),
            (SURF_AREA, &self.surf_area),
            (C_FACTOR, &self.c_factor),
            (SPEC_HOLDER_DIFF, &self.spec_holder_diff),
            (SPECIMEN_MASS, &self.specimen_mass),
            (SCAN_TIME, &self.scan_time),
            (O2_DELAY_TIME, &self.o2_delay_time),
            (CO_DELAY_TIME, &self.co_delay_time),
            (CO2_DELAY_TIME, &self.co2_delay_time),
            (FLOW_FACTOR, &self.flow_factor),
            (SCAN_COUNT, &self.scan_count),
            (TIME_TO_IGN, &self.time_to_ign),
            (END_OF_TEST_SCAN, &self.end_of_test_scan),
            (END_OF_TEST_TIME, &self.end_of_test_time),
            (TEST_STATUS, &self.test_status),
        ]
    }

    /// The request as a raw row. Absent fields read as `Null`.
    pub fn to_raw_row(&self) -> RawRow {
        let text = |v: &Option<String>| {
            v.as_ref()
                .map(|s| CellValue::String(s.clone()))
                .unwrap_or(CellValue::Null)
        };

        let mut row = RawRow::new();
        row.insert(MATERIAL_NAME.to_string(), text(&self.material_name));
        row.insert(MATERIAL.to_string(), text(&self.material));
        row.insert(ORIENTATION.to_string(), text(&self.orientation));
        for (column, value) in self.measurements() {
            let cell = value.as_ref().map(CellValue::from).unwrap_or(CellValue::Null);
            row.insert(column.to_string(), cell);
        }
        row
    }
}

/// Error body of the request/response protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_column_names_and_snake_case() {
        let by_column: FirePropertiesInput =
            serde_json::from_str(r#"{"MATERIAL": "PMMA", "HEAT FLUX": 500, "TIME TO IGN": "60"}"#).unwrap();
        let by_field: FirePropertiesInput =
            serde_json::from_str(r#"{"material": "PMMA", "heat_flux": 500, "time_to_ign": "60"}"#).unwrap();
        assert_eq!(by_column, by_field);
        assert_eq!(by_column.heat_flux, Some(Measurement::Number(500.0)));
        assert_eq!(by_column.time_to_ign, Some(Measurement::Text("60".into())));
    }

    #[test]
    fn missing_material_still_parses() {
        let input: FirePropertiesInput = serde_json::from_str(r#"{"HEAT FLUX": 50}"#).unwrap();
        assert_eq!(input.material, None);
    }

    #[test]
    fn non_numeric_json_values_read_as_missing() {
        for body in [
            r#"{"MATERIAL": "PMMA", "HEAT FLUX": true}"#,
            r#"{"MATERIAL": "PMMA", "HEAT FLUX": [500]}"#,
            r#"{"MATERIAL": "PMMA", "HEAT FLUX": {"value": 500}}"#,
        ] {
            let input: FirePropertiesInput = serde_json::from_str(body).unwrap();
            assert!(matches!(input.heat_flux, Some(Measurement::Other(_))));
            assert!(input.to_raw_row()[HEAT_FLUX].is_null());
        }
    }

    #[test]
    fn raw_row_carries_every_field() {
        let input = FirePropertiesInput {
            material: Some("Nylon 6".into()),
            heat_flux: Some(Measurement::Number(35.0)),
            ..Default::default()
        };
        let row = input.to_raw_row();
        assert_eq!(row.len(), 18);
        assert_eq!(row[MATERIAL], CellValue::String("Nylon 6".into()));
        assert_eq!(row[HEAT_FLUX], CellValue::Float(35.0));
        assert!(row[TIME_TO_IGN].is_null());
        assert!(row[MATERIAL_NAME].is_null());
    }
}
