//! Tridiagonal (Thomas algorithm) backend.
//!
//! Piecewise-linear elements only couple neighbouring nodes, so A has at most
//! three nonzero diagonals. Forward elimination without pivoting is stable for
//! the diagonally dominant or SPD systems produced by well-posed problems; a
//! vanishing pivot is reported as a singular system.

use super::traits::*;
use crate::assembly::GlobalSystem;
use nalgebra::DVector;

const PIVOT_TOL: f64 = 1e-14;

/// Three diagonals of a tridiagonal matrix
#[derive(Debug, Clone, PartialEq)]
pub struct TridiagonalBands {
    /// Sub-diagonal, `lower[i] = A[i+1, i]`
    pub lower: Vec<f64>,
    /// Main diagonal
    pub diag: Vec<f64>,
    /// Super-diagonal, `upper[i] = A[i, i+1]`
    pub upper: Vec<f64>,
}

impl TridiagonalBands {
    /// Read the three diagonals of A.
    ///
    /// Only the band is read, in O(n); entries further from the diagonal are
    /// ignored. Assembly with piecewise-linear elements never writes them.
    pub fn from_system(system: &GlobalSystem) -> Self {
        let n = system.num_nodes;
        let a = &system.stiffness;
        Self {
            lower: (0..n.saturating_sub(1)).map(|i| a[(i + 1, i)]).collect(),
            diag: (0..n).map(|i| a[(i, i)]).collect(),
            upper: (0..n.saturating_sub(1)).map(|i| a[(i, i + 1)]).collect(),
        }
    }

    /// Largest absolute entry of row `i`
    fn row_scale(&self, i: usize) -> f64 {
        let mut scale = self.diag[i].abs();
        if i > 0 {
            scale = scale.max(self.lower[i - 1].abs());
        }
        if i + 1 < self.diag.len() {
            scale = scale.max(self.upper[i].abs());
        }
        scale
    }

    /// Solve with the Thomas algorithm
    pub fn solve(&self, rhs: &DVector<f64>) -> Result<DVector<f64>, BackendError> {
        let n = self.diag.len();
        if rhs.len() != n {
            return Err(BackendError(format!(
                "right-hand side has length {}, expected {}",
                rhs.len(),
                n
            )));
        }
        if n == 0 {
            return Ok(DVector::zeros(0));
        }

        // Each pivot is judged against its own row, so identity rows from
        // boundary elimination do not set the scale for the interior.
        let check = |pivot: f64, row: usize| -> Result<f64, BackendError> {
            if pivot.abs() <= PIVOT_TOL * self.row_scale(row) || !pivot.is_finite() {
                Err(BackendError(format!(
                    "zero pivot {:.3e} at row {} in tridiagonal elimination",
                    pivot, row
                )))
            } else {
                Ok(pivot)
            }
        };

        let mut c_prime = vec![0.0; n];
        let mut d_prime = vec![0.0; n];

        let pivot = check(self.diag[0], 0)?;
        if n > 1 {
            c_prime[0] = self.upper[0] / pivot;
        }
        d_prime[0] = rhs[0] / pivot;

        for i in 1..n {
            let pivot = check(self.diag[i] - self.lower[i - 1] * c_prime[i - 1], i)?;
            if i < n - 1 {
                c_prime[i] = self.upper[i] / pivot;
            }
            d_prime[i] = (rhs[i] - self.lower[i - 1] * d_prime[i - 1]) / pivot;
        }

        let mut u = DVector::zeros(n);
        u[n - 1] = d_prime[n - 1];
        for i in (0..n - 1).rev() {
            u[i] = d_prime[i] - c_prime[i] * u[i + 1];
        }

        Ok(u)
    }
}

/// O(n) direct solver exploiting the tridiagonal fill.
///
/// The solve itself is linear in n; the dense [`GlobalSystem`] it reads from
/// still costs O(n²) memory to assemble.
pub struct TridiagonalBackend;

impl LinearSolver for TridiagonalBackend {
    fn solve_linear(
        &self,
        system: &GlobalSystem,
    ) -> Result<(DVector<f64>, SolveInfo), BackendError> {
        let bands = TridiagonalBands::from_system(system);
        let u = bands.solve(&system.load)?;
        ensure_finite(&u, self.name())?;

        Ok((
            u,
            SolveInfo {
                iterations: 1,
                residual_norm: None,
                solver_name: self.name().to_string(),
            },
        ))
    }

    fn name(&self) -> &str {
        "thomas-tridiagonal"
    }
}
