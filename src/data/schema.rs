//! Column names of the fire-properties dataset.
//!
//! The names are the external contract: the training export and the request
//! records both use them verbatim, spaces included.

pub const MATERIAL: &str = "MATERIAL";
pub const MATERIAL_NAME: &str = "Material_Name";
pub const ORIENTATION: &str = "ORIENTATION";

/// Derived coarse material category.
pub const MATERIAL_TYPE: &str = "material_type";
/// Proxy label attached to the cleaned training table.
pub const RISK_SCORE: &str = "risk_score";

pub const HEAT_FLUX: &str = "HEAT FLUX";
pub const SURF_AREA: &str = "SURF AREA";
pub const C_FACTOR: &str = "C FACTOR";
pub const SPEC_HOLDER_DIFF: &str = "SPEC HOLDER DIFF";
pub const SPECIMEN_MASS: &str = "SPECIMEN MASS";
pub const SCAN_TIME: &str = "SCAN TIME";
pub const O2_DELAY_TIME: &str = "O2 DELAY TIME";
pub const CO_DELAY_TIME: &str = "CO DELAY TIME";
pub const CO2_DELAY_TIME: &str = "CO2 DELAY TIME";
pub const FLOW_FACTOR: &str = "FLOW FACTOR";
pub const SCAN_COUNT: &str = "SCAN COUNT";
pub const TIME_TO_IGN: &str = "TIME TO IGN";
pub const END_OF_TEST_SCAN: &str = "END OF TEST SCAN";
pub const END_OF_TEST_TIME: &str = "END OF TEST TIME";
pub const TEST_STATUS: &str = "TEST STATUS";

/// The physical measurements, in export order.
pub const MEASUREMENTS: [&str; 15] = [
    HEAT_FLUX,
    SURF_AREA,
    C_FACTOR,
    SPEC_HOLDER_DIFF,
    SPECIMEN_MASS,
    SCAN_TIME,
    O2_DELAY_TIME,
    CO_DELAY_TIME,
    CO2_DELAY_TIME,
    FLOW_FACTOR,
    SCAN_COUNT,
    TIME_TO_IGN,
    END_OF_TEST_SCAN,
    END_OF_TEST_TIME,
    TEST_STATUS,
];

/// Thermal exposure columns, used only for descriptive grouping.
pub const THERMAL_COLUMNS: [&str; 7] = [
    HEAT_FLUX,
    SCAN_TIME,
    O2_DELAY_TIME,
    CO_DELAY_TIME,
    CO2_DELAY_TIME,
    TIME_TO_IGN,
    END_OF_TEST_TIME,
];

/// Specimen and apparatus columns, used only for descriptive grouping.
pub const FIRE_PROPERTY_COLUMNS: [&str; 8] = [
    SURF_AREA,
    C_FACTOR,
    SPEC_HOLDER_DIFF,
    SPECIMEN_MASS,
    FLOW_FACTOR,
    SCAN_COUNT,
    END_OF_TEST_SCAN,
    TEST_STATUS,
];
