use std::path::PathBuf;

use thiserror::Error;

/// Failures of the scoring pipeline.
///
/// Startup variants abort the process before any request is served;
/// [`PipelineError::MissingMaterial`] rejects a single request.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("dataset not found at {}", .0.display())]
    DatasetMissing(PathBuf),

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("training table has no rows")]
    EmptyDataset,

    #[error("model training failed: {0}")]
    Training(String),

    #[error("MATERIAL is required to score a sample")]
    MissingMaterial,
}

impl PipelineError {
    /// Whether the caller sent a bad request, as opposed to a broken service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PipelineError::MissingMaterial)
    }

    /// Status code reported on the request/response protocol.
    pub fn status(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }
}
