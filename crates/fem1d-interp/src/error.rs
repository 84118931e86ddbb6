//! Error types for fem1d-interp

use thiserror::Error;

pub type Result<T> = std::result::Result<T, InterpError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpError {
    #[error("at least one data point is required")]
    InsufficientData,

    #[error("length mismatch: {xs} abscissae but {ys} ordinates")]
    LengthMismatch { xs: usize, ys: usize },

    #[error("duplicate abscissa {value} at positions {first} and {second}")]
    DuplicateAbscissa {
        value: f64,
        first: usize,
        second: usize,
    },

    #[error("Vandermonde system is singular")]
    SingularVandermonde,

    #[error("basis index {index} with degree {degree} needs {needed} knots, got {available}")]
    IndexOutOfRange {
        index: usize,
        degree: usize,
        needed: usize,
        available: usize,
    },

    #[error("knot vector must be non-decreasing, t[{position}] is smaller than its predecessor")]
    DecreasingKnots { position: usize },
}
