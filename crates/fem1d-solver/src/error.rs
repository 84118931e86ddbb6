//! Error types for fem1d-solver

use thiserror::Error;

use crate::backend::BackendError;

pub type Result<T> = std::result::Result<T, FemError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FemError {
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("Evaluation of {function}(x) failed in element {element} at x = {x}: {message}")]
    Evaluation {
        /// Coefficient name: "a", "c" or "f"
        function: &'static str,
        element: usize,
        x: f64,
        message: String,
    },

    #[error("Singular system: {0}")]
    SingularSystem(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<BackendError> for FemError {
    fn from(err: BackendError) -> Self {
        FemError::SingularSystem(err.0)
    }
}

impl From<serde_json::Error> for FemError {
    fn from(err: serde_json::Error) -> Self {
        FemError::Config(err.to_string())
    }
}
