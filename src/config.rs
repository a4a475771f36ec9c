//! Service configuration.
//!
//! Defaults live here; the CLI overrides them from flags and the
//! `MFR_DATASET` / `MFR_PROFILE` environment variables.

use std::path::PathBuf;

use crate::pipeline::adjust::InputProfile;

/// Where the fire-properties export is expected when nothing else is given.
pub const DEFAULT_DATASET: &str = "data/raw/Fire_Properties_master_fire_properties.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Training table (`.csv`, `.json` or `.parquet`).
    pub dataset: PathBuf,
    /// Ridge L2 penalty.
    pub ridge_penalty: f64,
    /// Share of rows held out to report model quality at startup.
    pub holdout_fraction: f64,
    /// Seed of the hold-out shuffle.
    pub seed: u64,
    /// Units incoming requests are expressed in.
    pub profile: InputProfile,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from(DEFAULT_DATASET),
            ridge_penalty: 0.1,
            holdout_fraction: 0.2,
            seed: 42,
            profile: InputProfile::Interface,
        }
    }
}
