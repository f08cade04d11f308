use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid generation request: {reason}")]
    GenerationPrecondition { reason: String },

    #[error("Risk score {score} is outside [0, 100]")]
    ClassificationDomain { score: i64 },

    #[error("Invalid dataset config: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub(crate) fn precondition(reason: impl Into<String>) -> Self {
        Self::GenerationPrecondition { reason: reason.into() }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig { reason: reason.into() }
    }
}
