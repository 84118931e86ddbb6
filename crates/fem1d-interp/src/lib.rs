//! Polynomial interpolation in three classical bases and B-spline basis
//! derivatives.

pub mod bspline;
pub mod error;
pub mod interpolant;

pub use error::{InterpError, Result};
pub use interpolant::{Interpolant, InterpolationMethod};
