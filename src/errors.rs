use crate::analysis::AnalysisError;
use crate::config::ConfigError;
use crate::experiment::{ClientError, SourceError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("data source error: {0}")]
    Source(#[from] SourceError),

    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),
}

impl From<ClientError> for AppError {
    fn from(e: ClientError) -> Self {
        AppError::Source(e.into())
    }
}
