//! Error types for the cohort compiler core

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::PyErr;
use thiserror::Error;

/// Main error type for the cohort compiler core
#[derive(Error, Debug)]
pub enum CohortError {
    #[error("Catalog not initialized")]
    CatalogNotInitialized,

    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl From<CohortError> for PyErr {
    fn from(err: CohortError) -> PyErr {
        match err {
            CohortError::CatalogNotInitialized => {
                PyRuntimeError::new_err("Catalog not initialized. Call init_catalog() first.")
            }
            CohortError::InvalidCondition(msg) => {
                PyValueError::new_err(format!("Invalid condition: {}", msg))
            }
            CohortError::DeserializationError(msg) => {
                PyValueError::new_err(format!("Deserialization error: {}", msg))
            }
            CohortError::Transport(err) => {
                PyRuntimeError::new_err(format!("Transport error: {}", err))
            }
        }
    }
}

/// Result type alias for the cohort compiler core
pub type Result<T> = std::result::Result<T, CohortError>;
