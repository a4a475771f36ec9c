use std::fmt;

use serde::{Deserialize, Serialize};

/// Three-tier risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskClass {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskClass::Low => "Low",
            RiskClass::Medium => "Medium",
            RiskClass::High => "High",
        };
        f.write_str(s)
    }
}

/// Class cutoffs. Both bounds are exclusive upper limits of the lower class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Scores below this are Low.
    pub medium_from: u8,
    /// Scores below this (and not Low) are Medium.
    pub high_from: u8,
}

pub const THRESHOLDS: Thresholds = Thresholds {
    medium_from: 35,
    high_from: 65,
};

impl Thresholds {
    pub fn classify(&self, score: u8) -> RiskClass {
        if score < self.medium_from {
            RiskClass::Low
        } else if score < self.high_from {
            RiskClass::Medium
        } else {
            RiskClass::High
        }
    }
}

/// Response payload for one scored sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResult {
    pub risk_score: u8,
    pub risk_class: RiskClass,
    pub resistance_index: u8,
    pub interpretation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<String>,
}

/// Clamp a raw model output into an integer score. NaN scores 0.
pub fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, 100.0).round() as u8
}

fn interpretation(class: RiskClass) -> &'static str {
    match class {
        RiskClass::Low => {
            "This material demonstrates good fire resistance under the specified conditions. \
             Expected to maintain structural integrity with minimal degradation during the exposure period."
        }
        RiskClass::Medium => {
            "This material shows moderate fire resistance. Some thermal degradation expected, \
             but catastrophic failure is unlikely within the exposure duration. Monitor for signs of weakening."
        }
        RiskClass::High => {
            "This material exhibits poor fire resistance at these conditions. Significant thermal \
             degradation, potential ignition, or structural failure is likely. Not recommended for use \
             without additional fire protection."
        }
    }
}

fn comparison(class: RiskClass, material_label: &str) -> String {
    match class {
        RiskClass::Low => format!(
            "Performs significantly better than baseline {material_label} under similar thermal conditions. \
             Suitable for applications with moderate fire safety requirements."
        ),
        RiskClass::Medium => format!(
            "Performance is comparable to typical {material_label} at these exposure levels. \
             Additional fire protection measures may be advisable for critical applications."
        ),
        RiskClass::High => "Shows elevated risk compared to fire-resistant alternatives. \
             Material degradation likely under these conditions. Consider fire-retardant treatments \
             or alternative materials for safety-critical use."
            .to_string(),
    }
}

/// Turn a raw model output into the user-facing result.
pub fn interpret(raw: f64, material_label: &str) -> RiskResult {
    let risk_score = clamp_score(raw);
    let risk_class = THRESHOLDS.classify(risk_score);
    RiskResult {
        risk_score,
        risk_class,
        resistance_index: 100 - risk_score,
        interpretation: interpretation(risk_class).to_string(),
        comparison: Some(comparison(risk_class, material_label)),
    }
}
