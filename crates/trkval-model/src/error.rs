use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown processing sequence: {0}")]
    UnknownSequence(String),

    #[error("unknown era: {0}")]
    UnknownEra(String),

    #[error("invalid input tag: {0}")]
    InvalidInputTag(String),

    #[error("module label already registered: {0}")]
    DuplicateLabel(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type ModelResult<T> = Result<T, ModelError>;
