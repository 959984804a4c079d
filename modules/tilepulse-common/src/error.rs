use thiserror::Error;

#[derive(Error, Debug)]
pub enum TilePulseError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Feature service error: {0}")]
    FeatureService(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
