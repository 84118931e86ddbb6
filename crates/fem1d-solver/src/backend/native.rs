//! Dense LU backend using nalgebra.

use super::traits::*;
use crate::assembly::GlobalSystem;
use nalgebra::DVector;

/// Pivot size, relative to a unit row, below which A is treated as singular
const PIVOT_TOL: f64 = 1e-14;

/// Dense LU decomposition with partial pivoting.
///
/// Reference backend: makes no structural assumption about A. Rows are
/// equilibrated to unit max-norm before factorizing, so the pivot test does
/// not depend on how a(x) or c(x) are scaled relative to the identity rows
/// left by boundary elimination.
pub struct DenseLuBackend;

impl LinearSolver for DenseLuBackend {
    fn solve_linear(
        &self,
        system: &GlobalSystem,
    ) -> Result<(DVector<f64>, SolveInfo), BackendError> {
        let mut matrix = system.stiffness.clone();
        let mut rhs = system.load.clone();
        for i in 0..matrix.nrows() {
            let row_scale = matrix.row(i).amax();
            if row_scale == 0.0 || !row_scale.is_finite() {
                return Err(BackendError(format!(
                    "row {} of the matrix has max-norm {:.3e}",
                    i, row_scale
                )));
            }
            matrix.row_mut(i).unscale_mut(row_scale);
            rhs[i] /= row_scale;
        }

        let lu = matrix.lu();

        // Every row now has max-norm 1, so a pivot far below 1 means the
        // rows are numerically dependent.
        let min_pivot = lu
            .u()
            .diagonal()
            .iter()
            .fold(f64::INFINITY, |m, v| m.min(v.abs()));
        if min_pivot <= PIVOT_TOL {
            return Err(BackendError(format!(
                "LU pivot {:.3e} of the row-equilibrated matrix indicates a singular or ill-conditioned matrix",
                min_pivot
            )));
        }

        let u = lu
            .solve(&rhs)
            .ok_or(BackendError("Singular matrix in LU decomposition".into()))?;
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
        "nalgebra-LU"
    }
}
