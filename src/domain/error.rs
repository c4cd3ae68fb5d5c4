// src/domain/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Tag key {key} out of range for tag set '{set_id}' with {len} tags")]
    OutOfRange {
        set_id: String,
        key: usize,
        len: usize,
    },

    #[error("Invalid script: {0}")]
    InvalidScript(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl DomainError {
    pub fn context<C: Into<String>>(self, context: C) -> Self {
        match self {
            DomainError::InvalidScript(msg) => {
                DomainError::InvalidScript(format!("{}: {}", context.into(), msg))
            }
            DomainError::Other(msg) => DomainError::Other(format!("{}: {}", context.into(), msg)),
            err => err,
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
