//! Linear FEM assembler-solver for two-point boundary value problems.
//!
//! Solves
//!
//! ```text
//! -d/dx [ a(x) du/dx ] + c(x) u(x) = f(x),   x_0 <= x <= x_{n-1}
//! u(x_0) = 0,  u(x_{n-1}) = 0
//! ```
//!
//! with piecewise-linear hat functions on the given mesh. The stages run in
//! sequence: mesh validation, element assembly, boundary elimination, linear
//! solve. The boundary entries of the returned vector are set to exactly 0.0.

use crate::assembly::GlobalSystem;
use crate::coefficients::{Coefficient, Coefficients};
use crate::config::SolverConfig;
use crate::error::{FemError, Result};
use crate::mesh::Mesh;
use crate::solution::FemSolution;

/// Configured finite element solver
#[derive(Debug, Clone, Default)]
pub struct Fem1dSolver {
    config: SolverConfig,
}

impl Fem1dSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Assemble the system with boundary conditions applied, without solving
    pub fn assemble(
        &self,
        mesh: &Mesh,
        a: &dyn Coefficient,
        c: &dyn Coefficient,
        f: &dyn Coefficient,
    ) -> Result<GlobalSystem> {
        let coefficients = Coefficients::new(a, c, f);
        let mut system =
            GlobalSystem::assemble(mesh, &coefficients, self.config.parallel_assembly)?;
        system.apply_boundary_conditions();
        Ok(system)
    }

    /// Solve the boundary value problem on `mesh`.
    ///
    /// # Errors
    /// - [`FemError::Config`] if the solver options are invalid
    /// - [`FemError::Evaluation`] if `a`, `c` or `f` fails at a quadrature point
    /// - [`FemError::SingularSystem`] if the backend cannot produce a finite solution
    pub fn solve(
        &self,
        mesh: &Mesh,
        a: &dyn Coefficient,
        c: &dyn Coefficient,
        f: &dyn Coefficient,
    ) -> Result<FemSolution> {
        self.config.validate()?;

        let system = self.assemble(mesh, a, c, f)?;

        if self.config.trace {
            tracing::info!(target: "fem1d::trace", "Stiffness matrix{}", system.stiffness);
        }

        let backend = self.config.build_backend();
        let (u, info) = backend.solve_linear(&system)?;

        tracing::debug!(
            backend = backend.name(),
            iterations = info.iterations,
            nodes = system.num_nodes,
            "solved linear system"
        );

        if u.len() != system.num_nodes {
            return Err(FemError::SingularSystem(format!(
                "backend returned {} values for {} nodes",
                u.len(),
                system.num_nodes
            )));
        }

        let mut values: Vec<f64> = u.iter().copied().collect();
        // Boundary values are imposed, not taken from the solve
        for &node in &system.constrained_nodes {
            values[node] = 0.0;
        }

        Ok(FemSolution::new(mesh.clone(), values, info))
    }
}

/// Solve `-(a u')' + c u = f`, `u(x[0]) = u(x[n-1]) = 0` on the mesh `x` of
/// `n` nodes with the default dense LU backend.
///
/// Returns the nodal values of the piecewise-linear finite element solution.
///
/// # Example
/// ```
/// use fem1d_solver::fem1d_bvp_linear;
///
/// let x: Vec<f64> = (0..5).map(|i| i as f64 / 4.0).collect();
/// let u = fem1d_bvp_linear(5, &|_x: f64| 1.0, &|_x: f64| 0.0, &|_x: f64| 2.0, &x).unwrap();
/// assert_eq!(u[0], 0.0);
/// assert!((u[2] - 0.25).abs() < 1e-12);
/// ```
pub fn fem1d_bvp_linear(
    n: usize,
    a: &dyn Coefficient,
    c: &dyn Coefficient,
    f: &dyn Coefficient,
    x: &[f64],
) -> Result<Vec<f64>> {
    fem1d_bvp_linear_traced(n, a, c, f, x, false)
}

/// [`fem1d_bvp_linear`] with an optional trace of the stiffness matrix
pub fn fem1d_bvp_linear_traced(
    n: usize,
    a: &dyn Coefficient,
    c: &dyn Coefficient,
    f: &dyn Coefficient,
    x: &[f64],
    trace: bool,
) -> Result<Vec<f64>> {
    let mesh = Mesh::with_count(n, x)?;
    let solver = Fem1dSolver::new(SolverConfig::default().with_trace(trace));
    Ok(solver.solve(&mesh, a, c, f)?.into_values())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendKind;

    #[test]
    fn quadratic_solution_is_nodally_exact() {
        let mesh = Mesh::uniform(6, 0.0, 1.0).unwrap();
        let solution = Fem1dSolver::default()
            .solve(&mesh, &|_x: f64| 1.0, &|_x: f64| 0.0, &|_x: f64| 2.0)
            .unwrap();
        assert!(solution.max_nodal_error(|x| x * (1.0 - x)) < 1e-12);
        assert_eq!(solution.solver, "nalgebra-LU");
    }

    #[test]
    fn boundary_values_are_exactly_zero() {
        let mesh = Mesh::new(vec![0.0, 0.13, 0.4, 0.41, 0.9, 1.0]).unwrap();
        for backend in BackendKind::ALL {
            let solver = Fem1dSolver::new(SolverConfig::default().with_backend(backend));
            let solution = solver
                .solve(
                    &mesh,
                    &|x: f64| 1.0 + x,
                    &|x: f64| x * x,
                    &|x: f64| (5.0 * x).cos(),
                )
                .unwrap();
            assert_eq!(solution.values[0], 0.0, "{backend}");
            assert_eq!(solution.values[5], 0.0, "{backend}");
        }
    }

    #[test]
    fn trace_does_not_change_result() {
        let x = [0.0, 0.3, 0.7, 1.0];
        let one = |_x: f64| 1.0;
        let source = |x: f64| x;
        let plain = fem1d_bvp_linear(4, &one, &one, &source, &x).unwrap();
        let traced = fem1d_bvp_linear_traced(4, &one, &one, &source, &x, true).unwrap();
        assert_eq!(plain, traced);
    }

    #[test]
    fn mismatched_count_is_invalid_mesh() {
        let one = |_x: f64| 1.0;
        let zero = |_x: f64| 0.0;
        let err = fem1d_bvp_linear(3, &one, &zero, &one, &[0.0, 1.0]).unwrap_err();
        assert!(matches!(err, FemError::InvalidMesh(_)));
    }

    #[test]
    fn zero_diffusion_and_reaction_is_singular() {
        let mesh = Mesh::uniform(5, 0.0, 1.0).unwrap();
        let err = Fem1dSolver::default()
            .solve(&mesh, &|_x: f64| 0.0, &|_x: f64| 0.0, &|_x: f64| 1.0)
            .unwrap_err();
        assert!(matches!(err, FemError::SingularSystem(_)));
    }

    #[test]
    fn invalid_config_is_rejected_before_assembly() {
        let mesh = Mesh::uniform(3, 0.0, 1.0).unwrap();
        let mut config = SolverConfig::default();
        config.cg_tolerance = -1.0;
        let err = Fem1dSolver::new(config)
            .solve(&mesh, &|_x: f64| 1.0, &|_x: f64| 0.0, &|_x: f64| 1.0)
            .unwrap_err();
        assert!(matches!(err, FemError::Config(_)));
    }
}
