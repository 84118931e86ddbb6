//! Gauss-Legendre quadrature on 1D elements.
//!
//! The solver integrates products of linear basis functions and their
//! derivatives, which are at most quadratic, so the 2-point rule (exact up to
//! cubic polynomials) is sufficient.

use crate::mesh::Element;

/// 2-point Gauss-Legendre abscissa on the reference interval [-1, 1]
pub const GAUSS2_ABSCISSA: f64 = 0.577350269189625764509148780502;

/// A quadrature point mapped onto a physical element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraturePoint {
    /// Physical coordinate
    pub x: f64,
    /// Weight including the Jacobian `(xr - xl) / 2`
    pub weight: f64,
}

/// Quadrature rule on the reference interval [-1, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct GaussLegendre {
    abscissae: Vec<f64>,
    weights: Vec<f64>,
}

impl GaussLegendre {
    /// The 2-point rule: abscissae ±1/√3, unit weights
    pub fn two_point() -> Self {
        Self {
            abscissae: vec![-GAUSS2_ABSCISSA, GAUSS2_ABSCISSA],
            weights: vec![1.0, 1.0],
        }
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.abscissae.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abscissae.is_empty()
    }

    /// Map the rule onto `[xl, xr]`:
    /// `xq = ((1 - ξ) xl + (1 + ξ) xr) / 2`, `wq = w (xr - xl) / 2`
    pub fn map(&self, xl: f64, xr: f64) -> impl Iterator<Item = QuadraturePoint> + '_ {
        self.abscissae
            .iter()
            .zip(self.weights.iter())
            .map(move |(&xi, &w)| QuadraturePoint {
                x: ((1.0 - xi) * xl + (1.0 + xi) * xr) / 2.0,
                weight: w * (xr - xl) / 2.0,
            })
    }

    /// Map the rule onto a mesh element
    pub fn points(&self, element: &Element) -> impl Iterator<Item = QuadraturePoint> + '_ {
        self.map(element.xl, element.xr)
    }

    /// Integrate `g` over `[xl, xr]`
    pub fn integrate<G>(&self, xl: f64, xr: f64, mut g: G) -> f64
    where
        G: FnMut(f64) -> f64,
    {
        self.map(xl, xr).map(|q| q.weight * g(q.x)).sum()
    }
}

impl Default for GaussLegendre {
    fn default() -> Self {
        Self::two_point()
    }
}
