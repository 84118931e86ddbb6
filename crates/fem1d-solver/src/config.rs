//! Solver configuration.
//!
//! All fields have defaults, so a config file only needs to name what it
//! changes:
//!
//! ```json
//! { "backend": "tridiagonal", "trace": true }
//! ```

use crate::backend::{DenseLuBackend, LinearSolver, SparseCgBackend, TridiagonalBackend};
use crate::error::{FemError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Linear solver backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Dense LU with partial pivoting
    #[default]
    DenseLu,
    /// Thomas algorithm on the three diagonals
    Tridiagonal,
    /// Conjugate gradient on CSR storage
    SparseCg,
}

impl BackendKind {
    pub const ALL: [BackendKind; 3] = [
        BackendKind::DenseLu,
        BackendKind::Tridiagonal,
        BackendKind::SparseCg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::DenseLu => "dense_lu",
            BackendKind::Tridiagonal => "tridiagonal",
            BackendKind::SparseCg => "sparse_cg",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = FemError;

    fn from_str(s: &str) -> Result<Self> {
        BackendKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                FemError::Config(format!(
                    "unknown backend '{}', expected one of: dense_lu, tridiagonal, sparse_cg",
                    s
                ))
            })
    }
}

/// Options controlling a solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Linear solver backend
    pub backend: BackendKind,
    /// Emit the stiffness matrix (after boundary conditions) as a trace event
    pub trace: bool,
    /// Compute element contributions in parallel with rayon
    pub parallel_assembly: bool,
    /// Relative residual tolerance for the CG backend
    pub cg_tolerance: f64,
    /// Iteration cap for the CG backend (10 * n when unset)
    pub cg_max_iterations: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::DenseLu,
            trace: false,
            parallel_assembly: false,
            cg_tolerance: 1e-12,
            cg_max_iterations: None,
        }
    }
}

impl SolverConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SolverConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_parallel_assembly(mut self, parallel: bool) -> Self {
        self.parallel_assembly = parallel;
        self
    }

    /// Check option ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.cg_tolerance > 0.0 && self.cg_tolerance.is_finite()) {
            return Err(FemError::Config(format!(
                "cg_tolerance must be positive and finite, got {}",
                self.cg_tolerance
            )));
        }
        if self.cg_max_iterations == Some(0) {
            return Err(FemError::Config(
                "cg_max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Instantiate the configured backend
    pub fn build_backend(&self) -> Box<dyn LinearSolver> {
        match self.backend {
            BackendKind::DenseLu => Box::new(DenseLuBackend),
            BackendKind::Tridiagonal => Box::new(TridiagonalBackend),
            BackendKind::SparseCg => Box::new(SparseCgBackend {
                tolerance: self.cg_tolerance,
                max_iterations: self.cg_max_iterations,
            }),
        }
    }
}
