//! Backend trait definitions for linear solvers.

use crate::assembly::GlobalSystem;
use nalgebra::DVector;

/// Error type for backend operations.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendError(pub String);

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BackendError {}

impl From<String> for BackendError {
    fn from(s: String) -> Self {
        BackendError(s)
    }
}

impl From<&str> for BackendError {
    fn from(s: &str) -> Self {
        BackendError(s.to_string())
    }
}

/// Solver convergence and diagnostic info.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveInfo {
    /// Number of iterations (1 for direct solvers)
    pub iterations: usize,
    /// Final residual norm (if available)
    pub residual_norm: Option<f64>,
    /// Human-readable solver name (e.g., "nalgebra-LU", "thomas")
    pub solver_name: String,
}

/// Trait for a linear solver backend.
///
/// Implementations solve A * u = b for a system whose boundary conditions
/// have already been applied.
pub trait LinearSolver: Send + Sync {
    /// Solve A * u = b and return the coefficient vector.
    fn solve_linear(
        &self,
        system: &GlobalSystem,
    ) -> Result<(DVector<f64>, SolveInfo), BackendError>;

    /// Human-readable name of this backend.
    fn name(&self) -> &str;
}

/// Reject solutions containing NaN or infinities.
pub(crate) fn ensure_finite(u: &DVector<f64>, solver: &str) -> Result<(), BackendError> {
    match u.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(BackendError(format!(
            "{} produced non-finite value {} at node {}",
            solver, u[i], i
        ))),
        None => Ok(()),
    }
}
