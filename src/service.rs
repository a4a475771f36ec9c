use anyhow::{Context, Result};

use crate::config::ServiceConfig;
use crate::data::loader::load_file;
use crate::data::model::{RawRow, RawTable};
use crate::error::PipelineError;
use crate::model::{evaluate, holdout_split, Estimator, Evaluation, Predictor, RidgeRegression};
use crate::pipeline::adjust::InputProfile;
use crate::pipeline::cleaner::{clean_dataset, FeatureGroups};
use crate::pipeline::inference::InferenceTransformer;
use crate::pipeline::interpret::{interpret, RiskResult};
use crate::pipeline::stats::TrainingStats;
use crate::request::{ErrorResponse, FirePropertiesInput};

/// Status answered for a request body that is not a valid request record.
pub const MALFORMED_REQUEST_STATUS: u16 = 422;

// ---------------------------------------------------------------------------
// Shared serving state
// ---------------------------------------------------------------------------

/// The trained model plus the frozen transform it was fit against.
///
/// Built once at startup; every request only borrows it, so it can be shared
/// across threads behind an `Arc` without locking.
pub struct RiskService {
    stats: TrainingStats,
    feature_columns: Vec<String>,
    feature_groups: Option<FeatureGroups>,
    model: Box<dyn Predictor>,
    profile: InputProfile,
    evaluation: Option<Evaluation>,
}

impl RiskService {
    /// Load the configured dataset and train. Any failure here is fatal.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        if !config.dataset.exists() {
            return Err(PipelineError::DatasetMissing(config.dataset.clone()).into());
        }
        let raw = load_file(&config.dataset)
            .with_context(|| format!("loading {}", config.dataset.display()))?;
        let service = Self::train(&raw, config)?;
        Ok(service)
    }

    /// Clean the table, capture the stats and fit the ridge model.
    pub fn train(raw: &RawTable, config: &ServiceConfig) -> Result<Self, PipelineError> {
        let (cleaned, stats) = clean_dataset(raw)?;
        let ridge = RidgeRegression {
            penalty: config.ridge_penalty,
        };

        let (train_idx, test_idx) = holdout_split(cleaned.len(), config.holdout_fraction, config.seed);
        let pick = |idx: &[usize]| -> (Vec<Vec<f64>>, Vec<f64>) {
            idx.iter()
                .map(|&i| (cleaned.features[i].clone(), cleaned.risk_scores[i]))
                .unzip()
        };
        let (x_train, y_train) = pick(&train_idx);
        let model = ridge.fit(&x_train, &y_train)?;

        let evaluation = if test_idx.is_empty() {
            None
        } else {
            let (x_test, y_test) = pick(&test_idx);
            let eval = evaluate(&model, &x_test, &y_test);
            log::info!(
                "hold-out on {} rows: MAE {:.3}, R² {:.3}",
                eval.samples,
                eval.mean_absolute_error,
                eval.r_squared
            );
            Some(eval)
        };
        log::info!(
            "trained on {} rows, {} features, profile {}",
            train_idx.len(),
            cleaned.feature_columns.len(),
            config.profile
        );

        Ok(RiskService {
            stats,
            feature_columns: cleaned.feature_columns,
            feature_groups: Some(cleaned.feature_groups),
            model: Box::new(model),
            profile: config.profile,
            evaluation,
        })
    }

    /// Assemble a service from parts trained elsewhere.
    pub fn from_parts(
        stats: TrainingStats,
        feature_columns: Vec<String>,
        model: Box<dyn Predictor>,
        profile: InputProfile,
    ) -> Self {
        RiskService {
            stats,
            feature_columns,
            feature_groups: None,
            model,
            profile,
            evaluation: None,
        }
    }

    /// Score one request.
    pub fn predict(&self, input: &FirePropertiesInput) -> Result<RiskResult, PipelineError> {
        self.predict_row(&input.to_raw_row())
    }

    /// Score one raw row. The model is only invoked once the row is valid.
    pub fn predict_row(&self, row: &RawRow) -> Result<RiskResult, PipelineError> {
        let transformer = InferenceTransformer::new(&self.stats, &self.feature_columns, self.profile);
        let features = transformer.transform(row)?;
        let raw = self.model.predict(&features.values);
        let result = interpret(raw, features.material_type.label());
        log::debug!(
            "scored {} sample: raw {raw:.3} -> {} ({})",
            features.material_type,
            result.risk_score,
            result.risk_class
        );
        Ok(result)
    }

    /// Answer one JSON request with one single-line JSON response: the
    /// result on success, `{error, status}` otherwise.
    pub fn respond(&self, request: &str) -> String {
        let response = match serde_json::from_str::<FirePropertiesInput>(request) {
            Ok(input) => match self.predict(&input) {
                Ok(result) => serde_json::to_value(result),
                Err(err) => {
                    log::warn!("rejected request: {err}");
                    serde_json::to_value(ErrorResponse {
                        error: err.to_string(),
                        status: err.status(),
                    })
                }
            },
            Err(err) => serde_json::to_value(ErrorResponse {
                error: format!("invalid request: {err}"),
                status: MALFORMED_REQUEST_STATUS,
            }),
        };
        match response {
            Ok(value) => value.to_string(),
            Err(err) => serde_json::json!({ "error": err.to_string(), "status": 500 }).to_string(),
        }
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    pub fn profile(&self) -> InputProfile {
        self.profile
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    pub fn feature_groups(&self) -> Option<&FeatureGroups> {
        self.feature_groups.as_ref()
    }

    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.evaluation.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::data::model::CellValue;
    use crate::data::schema::ORIENTATION;
    use crate::fixtures::{self, request_row};
    use crate::pipeline::interpret::RiskClass;
    use crate::request::Measurement;
    use serde_json::Value;

    fn parse(line: &str) -> Value {
        assert!(!line.contains('\n'));
        serde_json::from_str(line).unwrap()
    }

    fn service() -> RiskService {
        RiskService::train(&fixtures::training_table(), &ServiceConfig::default()).unwrap()
    }

    struct CountingPredictor {
        calls: Arc<AtomicUsize>,
        score: f64,
    }

    impl Predictor for CountingPredictor {
        fn predict(&self, _features: &[f64]) -> f64 {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.score
        }
    }

    #[test]
    fn pmma_request_scores_end_to_end() {
        let service = service();
        let input = FirePropertiesInput {
            material: Some("PMMA".into()),
            heat_flux: Some(Measurement::Number(500.0)),
            time_to_ign: Some(Measurement::Number(60.0)),
            ..Default::default()
        };

        let result = service.predict(&input).unwrap();
        assert!(result.risk_score <= 100);
        assert!(matches!(
            result.risk_class,
            RiskClass::Low | RiskClass::Medium | RiskClass::High
        ));
        assert_eq!(result.resistance_index, 100 - result.risk_score);
        assert!(result.comparison.is_some());
    }

    #[test]
    fn missing_material_never_reaches_the_model() {
        let calls = Arc::new(AtomicUsize::new(0));
        let trained = service();
        let service = RiskService::from_parts(
            trained.stats().clone(),
            trained.feature_columns().to_vec(),
            Box::new(CountingPredictor {
                calls: Arc::clone(&calls),
                score: 50.0,
            }),
            InputProfile::Interface,
        );

        let err = service.predict(&FirePropertiesInput::default()).unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        service.predict_row(&request_row(Some("PVC"), None, None)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unseen_orientation_is_tolerated() {
        let service = service();
        let mut row = request_row(Some("Plywood"), Some(30.0), None);
        row.insert(ORIENTATION.into(), CellValue::String("UPSIDE DOWN".into()));
        let result = service.predict_row(&row).unwrap();
        assert_eq!(result.resistance_index, 100 - result.risk_score);
    }

    #[test]
    fn model_output_is_clamped() {
        let trained = service();
        let service = RiskService::from_parts(
            trained.stats().clone(),
            trained.feature_columns().to_vec(),
            Box::new(CountingPredictor {
                calls: Arc::new(AtomicUsize::new(0)),
                score: 180.0,
            }),
            InputProfile::Measurement,
        );
        let result = service.predict_row(&request_row(Some("PVC"), None, None)).unwrap();
        assert_eq!(result.risk_score, 100);
        assert_eq!(result.risk_class, RiskClass::High);
        assert_eq!(result.resistance_index, 0);
    }

    #[test]
    fn requests_can_be_served_concurrently() {
        let service = Arc::new(service());
        let expected = service.predict_row(&request_row(Some("Nylon 6"), Some(40.0), Some(50.0))).unwrap();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let service = Arc::clone(&service);
                let expected = expected.clone();
                scope.spawn(move || {
                    let got = service
                        .predict_row(&request_row(Some("Nylon 6"), Some(40.0), Some(50.0)))
                        .unwrap();
                    assert_eq!(got, expected);
                });
            }
        });
    }

    #[test]
    fn holdout_metrics_are_reported() {
        let service = service();
        // six fixture rows: two held out
        assert!(service.evaluation().is_some());
        assert_eq!(service.feature_columns(), service.stats().dummy_columns.as_slice());
        assert!(service.feature_groups().is_some());
    }

    #[test]
    fn success_body_uses_camel_case_keys() {
        let body = parse(&service().respond(r#"{"MATERIAL": "PMMA", "HEAT FLUX": 500, "TIME TO IGN": "60"}"#));
        for key in ["riskScore", "riskClass", "resistanceIndex", "interpretation", "comparison"] {
            assert!(body.get(key).is_some(), "missing {key}");
        }
        assert!(body.get("error").is_none());
        assert_eq!(
            body["resistanceIndex"].as_u64().unwrap() + body["riskScore"].as_u64().unwrap(),
            100
        );

        let input = FirePropertiesInput {
            material: Some("PMMA".into()),
            heat_flux: Some(Measurement::Number(500.0)),
            time_to_ign: Some(Measurement::Text("60".into())),
            ..Default::default()
        };
        let decoded: RiskResult = serde_json::from_value(body).unwrap();
        assert_eq!(decoded, service().predict(&input).unwrap());
    }

    #[test]
    fn missing_material_answers_400() {
        let body: ErrorResponse =
            serde_json::from_value(parse(&service().respond(r#"{"HEAT FLUX": 50}"#))).unwrap();
        assert_eq!(body.status, 400);
        assert_eq!(body.error, PipelineError::MissingMaterial.to_string());
    }

    #[test]
    fn malformed_json_answers_422() {
        let service = service();
        for line in ["{not json", "42", r#"{"MATERIAL": 7}"#] {
            let body = parse(&service.respond(line));
            assert_eq!(body["status"], u64::from(MALFORMED_REQUEST_STATUS));
            assert!(body["error"].as_str().unwrap().starts_with("invalid request"));
        }
    }

    #[test]
    fn non_numeric_measurement_scores_with_the_median() {
        let service = service();
        let absent = service.respond(r#"{"MATERIAL": "PMMA"}"#);
        for line in [
            r#"{"MATERIAL": "PMMA", "HEAT FLUX": true}"#,
            r#"{"MATERIAL": "PMMA", "HEAT FLUX": [500]}"#,
            r#"{"MATERIAL": "PMMA", "HEAT FLUX": {"value": 500}}"#,
        ] {
            let answer = service.respond(line);
            assert!(parse(&answer).get("riskScore").is_some());
            assert_eq!(answer, absent);
        }
    }
}
