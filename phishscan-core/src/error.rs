use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("invalid feature extraction: expected {expected} features, got {actual}")]
    Length { expected: usize, actual: usize },
}

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("failed to read model: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed model: {0}")]
    Format(#[from] serde_json::Error),

    #[error("model expects {expected} features, got {actual}")]
    Shape { expected: usize, actual: usize },

    #[error("prediction failed: {0}")]
    Prediction(String),
}
