//! Finite element solution and error measures.
//!
//! The nodal values define a continuous piecewise-linear function on the
//! mesh. Error norms compare it against a known exact solution.

use crate::backend::SolveInfo;
use crate::error::{FemError, Result};
use crate::mesh::{Element, Mesh};
use crate::quadrature::GaussLegendre;
use serde::Serialize;

/// Nodal solution of a boundary value problem
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FemSolution {
    /// Mesh the solution lives on
    pub mesh: Mesh,
    /// Nodal values u[i] = u_h(x[i])
    pub values: Vec<f64>,
    /// Backend that solved the system
    pub solver: String,
    /// Backend iterations (1 for direct solvers)
    pub iterations: usize,
    /// Final residual norm reported by iterative backends
    pub residual_norm: Option<f64>,
}

impl FemSolution {
    pub(crate) fn new(mesh: Mesh, values: Vec<f64>, info: SolveInfo) -> Self {
        Self {
            mesh,
            values,
            solver: info.solver_name,
            iterations: info.iterations,
            residual_norm: info.residual_norm,
        }
    }

    /// Node coordinates
    pub fn nodes(&self) -> &[f64] {
        self.mesh.nodes()
    }

    /// Consume the solution, keeping only the nodal values
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    fn on_element(&self, element: &Element, x: f64) -> f64 {
        let h = element.length();
        let vl = (element.xr - x) / h;
        let vr = (x - element.xl) / h;
        self.values[element.left] * vl + self.values[element.right] * vr
    }

    fn slope(&self, element: &Element) -> f64 {
        (self.values[element.right] - self.values[element.left]) / element.length()
    }

    fn locate(&self, x: f64) -> Result<Element> {
        self.mesh.locate(x).ok_or_else(|| {
            FemError::InvalidMesh(format!(
                "x = {} lies outside the mesh interval [{}, {}]",
                x,
                self.mesh.left(),
                self.mesh.right()
            ))
        })
    }

    /// Evaluate the piecewise-linear solution at `x`
    pub fn evaluate(&self, x: f64) -> Result<f64> {
        let element = self.locate(x)?;
        Ok(self.on_element(&element, x))
    }

    /// Derivative of the solution at `x`.
    ///
    /// Constant on each element; at an interior node the value of the element
    /// to the left is returned.
    pub fn derivative(&self, x: f64) -> Result<f64> {
        let element = self.locate(x)?;
        Ok(self.slope(&element))
    }

    /// Maximum absolute error at the nodes
    pub fn max_nodal_error<F>(&self, exact: F) -> f64
    where
        F: Fn(f64) -> f64,
    {
        self.nodes()
            .iter()
            .zip(&self.values)
            .map(|(&x, &u)| (u - exact(x)).abs())
            .fold(0.0, f64::max)
    }

    /// Average absolute error at the nodes
    pub fn l1_nodal_error<F>(&self, exact: F) -> f64
    where
        F: Fn(f64) -> f64,
    {
        let total: f64 = self
            .nodes()
            .iter()
            .zip(&self.values)
            .map(|(&x, &u)| (u - exact(x)).abs())
            .sum();
        total / self.values.len() as f64
    }

    /// L2 norm of `u_h - exact`, integrated element by element
    pub fn l2_error<F>(&self, exact: F) -> f64
    where
        F: Fn(f64) -> f64,
    {
        let rule = GaussLegendre::two_point();
        self.mesh
            .elements()
            .map(|element| {
                rule.integrate(element.xl, element.xr, |x| {
                    let diff = self.on_element(&element, x) - exact(x);
                    diff * diff
                })
            })
            .sum::<f64>()
            .sqrt()
    }

    /// H1 seminorm of the error: L2 norm of `u_h' - exact'`
    pub fn h1_seminorm_error<F>(&self, exact_derivative: F) -> f64
    where
        F: Fn(f64) -> f64,
    {
        let rule = GaussLegendre::two_point();
        self.mesh
            .elements()
            .map(|element| {
                let slope = self.slope(&element);
                rule.integrate(element.xl, element.xr, |x| {
                    let diff = slope - exact_derivative(x);
                    diff * diff
                })
            })
            .sum::<f64>()
            .sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hat_solution() -> FemSolution {
        let mesh = Mesh::new(vec![0.0, 0.5, 1.0]).unwrap();
        FemSolution::new(
            mesh,
            vec![0.0, 1.0, 0.0],
            SolveInfo {
                iterations: 1,
                residual_norm: None,
                solver_name: "test".to_string(),
            },
        )
    }

    #[test]
    fn evaluates_linear_interpolant() {
        let solution = hat_solution();
        assert_eq!(solution.evaluate(0.5).unwrap(), 1.0);
        assert!((solution.evaluate(0.25).unwrap() - 0.5).abs() < 1e-15);
        assert!((solution.evaluate(0.9).unwrap() - 0.2).abs() < 1e-15);
        assert!(solution.evaluate(1.5).is_err());
    }

    #[test]
    fn derivative_is_piecewise_constant() {
        let solution = hat_solution();
        assert!((solution.derivative(0.1).unwrap() - 2.0).abs() < 1e-15);
        assert!((solution.derivative(0.7).unwrap() + 2.0).abs() < 1e-15);
    }

    #[test]
    fn errors_vanish_for_matching_function() {
        let solution = hat_solution();
        let exact = |x: f64| 1.0 - (2.0 * x - 1.0).abs();
        assert!(solution.max_nodal_error(exact) < 1e-15);
        assert!(solution.l1_nodal_error(exact) < 1e-15);
        assert!(solution.l2_error(exact) < 1e-15);
        let exact_derivative = |x: f64| if x < 0.5 { 2.0 } else { -2.0 };
        assert!(solution.h1_seminorm_error(exact_derivative) < 1e-15);
    }

    #[test]
    fn l2_error_of_constant_offset() {
        let solution = hat_solution();
        let shifted = |x: f64| 1.0 - (2.0 * x - 1.0).abs() + 0.5;
        // ∫_0^1 0.5^2 dx = 0.25
        assert!((solution.l2_error(shifted) - 0.5).abs() < 1e-14);
        assert!((solution.max_nodal_error(shifted) - 0.5).abs() < 1e-15);
    }
}
