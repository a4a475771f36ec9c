/// Preprocessing pipeline shared by training and serving.
///
/// ```text
///  training                               serving
///  ────────                               ───────
///  RawTable                               RawRow (one request)
///     │                                      │
///     ▼                                      ▼
///  prepare ── drop columns, material_type    inference ── same drops + typing,
///     │                                      │            profile compensations
///     ├─► proxy    → risk_score target       │
///     ├─► stats    → TrainingStats ─────────►│ (frozen, read-only)
///     ▼                                      ▼
///  cleaner  → encoded rows               FeatureVector → Predictor → interpret
/// ```

pub mod adjust;
pub mod cleaner;
pub mod inference;
pub mod interpret;
pub mod material;
pub mod numeric;
pub mod prepare;
pub mod proxy;
pub mod stats;
