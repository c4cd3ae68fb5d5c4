// src/application/error.rs
use crate::domain::error::DomainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl ApplicationError {
    pub fn context<C: Into<String>>(self, context: C) -> Self {
        match self {
            ApplicationError::Domain(err) => ApplicationError::Domain(err.context(context)),
        }
    }
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;
