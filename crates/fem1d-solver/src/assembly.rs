//! Global matrix assembly for the 1D finite element system.
//!
//! Assembles element contributions into the global system:
//! - A: Global stiffness matrix (dense, tridiagonal fill)
//! - b: Global load vector
//!
//! ## Assembly Process
//!
//! 1. Allocate zeroed A (n × n) and b (n)
//! 2. Loop over all elements [x_l, x_r]:
//!    - Evaluate a, c, f at the mapped Gauss points
//!    - Integrate the 2×2 local block of ∫ a u' v' + c u v dx and the local
//!      load ∫ f v dx using the two hat functions of the element
//!    - Add the local block at (l,l), (l,r), (r,l), (r,r) and the local load at l, r
//! 3. Boundary conditions are applied afterwards (see `boundary_conditions`)
//!
//! Element contributions are independent, so they can be computed in
//! parallel. The scatter into A and b always runs sequentially in element
//! order, which keeps parallel and sequential assembly bit-identical.

use crate::coefficients::{Coefficient, Coefficients};
use crate::error::{FemError, Result};
use crate::mesh::{Element, Mesh};
use crate::quadrature::GaussLegendre;
use nalgebra::{DMatrix, DVector, Matrix2, Vector2};
use nalgebra_sparse::CooMatrix;
use rayon::prelude::*;

/// Local 2×2 stiffness block and load pair of one element
#[derive(Debug, Clone, PartialEq)]
pub struct ElementContribution {
    /// The element this contribution belongs to
    pub element: Element,
    /// Local stiffness block, ordered (left, right)
    pub stiffness: Matrix2<f64>,
    /// Local load vector, ordered (left, right)
    pub load: Vector2<f64>,
}

impl ElementContribution {
    /// Integrate the local bilinear and linear forms over one element
    pub fn compute(
        element: &Element,
        coefficients: &Coefficients<'_>,
        rule: &GaussLegendre,
    ) -> Result<Self> {
        let (xl, xr) = (element.xl, element.xr);
        let h = element.length();

        let mut stiffness = Matrix2::zeros();
        let mut load = Vector2::zeros();

        for q in rule.points(element) {
            let xq = q.x;
            let wq = q.weight;

            // Hat functions of the two element nodes and their derivatives
            let vl = (xr - xq) / h;
            let vlp = -1.0 / h;
            let vr = (xq - xl) / h;
            let vrp = 1.0 / h;

            let axq = evaluate("a", coefficients.a, element, xq)?;
            let cxq = evaluate("c", coefficients.c, element, xq)?;
            let fxq = evaluate("f", coefficients.f, element, xq)?;

            stiffness[(0, 0)] += wq * (vlp * axq * vlp + vl * cxq * vl);
            stiffness[(0, 1)] += wq * (vlp * axq * vrp + vl * cxq * vr);
            load[0] += wq * (vl * fxq);

            stiffness[(1, 0)] += wq * (vrp * axq * vlp + vr * cxq * vl);
            stiffness[(1, 1)] += wq * (vrp * axq * vrp + vr * cxq * vr);
            load[1] += wq * (vr * fxq);
        }

        Ok(Self {
            element: *element,
            stiffness,
            load,
        })
    }
}

fn evaluate(
    function: &'static str,
    coefficient: &dyn Coefficient,
    element: &Element,
    x: f64,
) -> Result<f64> {
    coefficient
        .evaluate(x)
        .map_err(|message| FemError::Evaluation {
            function,
            element: element.index,
            x,
            message,
        })
}

/// Global finite element system A u = b
#[derive(Debug, Clone)]
pub struct GlobalSystem {
    /// Global stiffness matrix
    pub stiffness: DMatrix<f64>,
    /// Global load vector
    pub load: DVector<f64>,
    /// Number of nodes (= number of unknowns)
    pub num_nodes: usize,
    /// Nodes whose equations were replaced by fixed-value conditions
    pub constrained_nodes: Vec<usize>,
}

impl GlobalSystem {
    /// Create a new zeroed system
    pub fn new(num_nodes: usize) -> Self {
        Self {
            stiffness: DMatrix::zeros(num_nodes, num_nodes),
            load: DVector::zeros(num_nodes),
            num_nodes,
            constrained_nodes: Vec::new(),
        }
    }

    /// Assemble stiffness matrix and load vector over all mesh elements.
    ///
    /// Boundary conditions are not applied here.
    ///
    /// # Errors
    /// Returns [`FemError::Evaluation`] if a coefficient fails at any
    /// quadrature point; no partial system is returned.
    pub fn assemble(mesh: &Mesh, coefficients: &Coefficients<'_>, parallel: bool) -> Result<Self> {
        let rule = GaussLegendre::two_point();
        let mut system = Self::new(mesh.num_nodes());

        tracing::debug!(
            elements = mesh.num_elements(),
            parallel,
            "assembling global system"
        );

        if parallel {
            let elements: Vec<Element> = mesh.elements().collect();
            let contributions = elements
                .par_iter()
                .map(|element| ElementContribution::compute(element, coefficients, &rule))
                .collect::<Result<Vec<_>>>()?;
            for contribution in &contributions {
                system.scatter(contribution);
            }
        } else {
            for element in mesh.elements() {
                let contribution = ElementContribution::compute(&element, coefficients, &rule)?;
                system.scatter(&contribution);
            }
        }

        Ok(system)
    }

    /// Add one element contribution into A and b
    pub fn scatter(&mut self, contribution: &ElementContribution) {
        let dofs = [contribution.element.left, contribution.element.right];
        for (i_local, &i_global) in dofs.iter().enumerate() {
            for (j_local, &j_global) in dofs.iter().enumerate() {
                self.stiffness[(i_global, j_global)] += contribution.stiffness[(i_local, j_local)];
            }
            self.load[i_global] += contribution.load[i_local];
        }
    }

    /// Check `|A[i,j] - A[j,i]| <= tol` for every pair
    pub fn is_symmetric(&self, tol: f64) -> bool {
        let n = self.num_nodes;
        (0..n).all(|i| {
            (i + 1..n).all(|j| (self.stiffness[(i, j)] - self.stiffness[(j, i)]).abs() <= tol)
        })
    }

    /// Largest distance of a nonzero entry from the diagonal.
    ///
    /// Diagnostic only: scans the whole dense matrix, O(n²).
    pub fn bandwidth(&self) -> usize {
        let n = self.num_nodes;
        let mut width = 0;
        for i in 0..n {
            for j in 0..n {
                if self.stiffness[(i, j)] != 0.0 {
                    width = width.max(i.abs_diff(j));
                }
            }
        }
        width
    }

    /// Nonzero entries of the tridiagonal band of A in COO format, for sparse
    /// backends. Reads at most three entries per row.
    pub fn stiffness_coo(&self) -> CooMatrix<f64> {
        let n = self.num_nodes;
        let mut coo = CooMatrix::new(n, n);
        for i in 0..n {
            for j in i.saturating_sub(1)..(i + 2).min(n) {
                let value = self.stiffness[(i, j)];
                if value != 0.0 {
                    coo.push(i, j, value);
                }
            }
        }
        coo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_coefficients<'a>(
        a: &'a dyn Coefficient,
        c: &'a dyn Coefficient,
        f: &'a dyn Coefficient,
    ) -> Coefficients<'a> {
        Coefficients::new(a, c, f)
    }

    #[test]
    fn laplacian_element_block() {
        // a = 1, c = 0 on [0, h]: k = (1/h) [1 -1; -1 1]
        let one = |_x: f64| 1.0;
        let zero = |_x: f64| 0.0;
        let coeffs = unit_coefficients(&one, &zero, &one);
        let element = Element {
            index: 0,
            left: 0,
            right: 1,
            xl: 0.0,
            xr: 0.5,
        };
        let local = ElementContribution::compute(&element, &coeffs, &GaussLegendre::two_point())
            .unwrap();
        assert!((local.stiffness[(0, 0)] - 2.0).abs() < 1e-14);
        assert!((local.stiffness[(0, 1)] + 2.0).abs() < 1e-14);
        assert!((local.stiffness[(1, 1)] - 2.0).abs() < 1e-14);
        // f = 1: load = h/2 on each node
        assert!((local.load[0] - 0.25).abs() < 1e-14);
        assert!((local.load[1] - 0.25).abs() < 1e-14);
    }

    #[test]
    fn mass_element_block() {
        // a = 0, c = 1 on [0, h]: m = (h/6) [2 1; 1 2]
        let one = |_x: f64| 1.0;
        let zero = |_x: f64| 0.0;
        let coeffs = unit_coefficients(&zero, &one, &zero);
        let element = Element {
            index: 0,
            left: 0,
            right: 1,
            xl: 1.0,
            xr: 1.6,
        };
        let local = ElementContribution::compute(&element, &coeffs, &GaussLegendre::two_point())
            .unwrap();
        let h = 0.6;
        assert!((local.stiffness[(0, 0)] - h / 3.0).abs() < 1e-14);
        assert!((local.stiffness[(0, 1)] - h / 6.0).abs() < 1e-14);
        assert!((local.stiffness[(1, 0)] - h / 6.0).abs() < 1e-14);
    }

    #[test]
    fn assembled_matrix_is_tridiagonal_and_symmetric() {
        let mesh = Mesh::new(vec![0.0, 0.1, 0.35, 0.6, 1.0]).unwrap();
        let a = |x: f64| 1.0 + x * x;
        let c = |x: f64| x;
        let f = |x: f64| x.sin();
        let coeffs = Coefficients::new(&a, &c, &f);
        let system = GlobalSystem::assemble(&mesh, &coeffs, false).unwrap();
        assert!(system.is_symmetric(1e-12));
        assert_eq!(system.bandwidth(), 1);
    }

    #[test]
    fn parallel_assembly_matches_sequential() {
        let mesh = Mesh::uniform(33, 0.0, 2.0).unwrap();
        let a = |x: f64| 2.0 + x.cos();
        let c = |x: f64| x * x;
        let f = |x: f64| (3.0 * x).exp();
        let coeffs = Coefficients::new(&a, &c, &f);
        let seq = GlobalSystem::assemble(&mesh, &coeffs, false).unwrap();
        let par = GlobalSystem::assemble(&mesh, &coeffs, true).unwrap();
        assert_eq!(seq.stiffness, par.stiffness);
        assert_eq!(seq.load, par.load);
    }

    #[test]
    fn evaluation_failure_names_function_and_point() {
        let mesh = Mesh::uniform(5, 0.0, 1.0).unwrap();
        let a = |_x: f64| 1.0;
        let c = |x: f64| if x > 0.6 { f64::NAN } else { 0.0 };
        let f = |_x: f64| 1.0;
        let coeffs = Coefficients::new(&a, &c, &f);
        let err = GlobalSystem::assemble(&mesh, &coeffs, false).unwrap_err();
        match err {
            FemError::Evaluation {
                function,
                element,
                x,
                ..
            } => {
                assert_eq!(function, "c");
                assert_eq!(element, 2);
                assert!(x > 0.6 && x < 0.75);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn coo_export_holds_band_entries() {
        let mesh = Mesh::uniform(4, 0.0, 1.0).unwrap();
        let one = |_x: f64| 1.0;
        let coeffs = Coefficients::new(&one, &one, &one);
        let system = GlobalSystem::assemble(&mesh, &coeffs, false).unwrap();
        assert_eq!(system.stiffness_coo().nnz(), 3 * 4 - 2);
    }
}
