use thiserror::Error;

use models::errors::ModelError;

use crate::subscription::period::PeriodError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller-fixable input problem; the message is safe to show as is.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("randomness source failure: {0}")]
    Randomness(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::Validation(msg),
            ModelError::NotFound(entity) => ServiceError::not_found(entity),
            ModelError::Db(msg) => ServiceError::Storage(msg),
        }
    }
}

impl From<PeriodError> for ServiceError {
    fn from(e: PeriodError) -> Self { ServiceError::Validation(e.to_string()) }
}
