//! Interpolating polynomial through `n + 1` points, in one of three bases.
//!
//! | Method   | Coefficients                              | Evaluation        |
//! |----------|-------------------------------------------|-------------------|
//! | Lagrange | `y_i / Π_{j≠i} (x_i - x_j)`               | sum of products   |
//! | Monomial | Vandermonde solve (nalgebra LU)           | Horner            |
//! | Newton   | first column of divided-difference table  | nested Horner     |
//!
//! All three represent the same polynomial; they differ in construction cost
//! and conditioning.

use crate::error::{InterpError, Result};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Polynomial basis used to build an [`Interpolant`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod {
    Lagrange,
    Monomial,
    #[default]
    Newton,
}

/// Interpolating polynomial with method-specific coefficients
#[derive(Debug, Clone, PartialEq)]
pub enum Interpolant {
    Lagrange {
        nodes: Vec<f64>,
        /// `y_i / Π_{j≠i} (x_i - x_j)`
        weights: Vec<f64>,
    },
    Monomial {
        /// Coefficients of `1, x, x², ...`
        coefficients: Vec<f64>,
    },
    Newton {
        nodes: Vec<f64>,
        /// Divided differences `f[x_0], f[x_0, x_1], ...`
        coefficients: Vec<f64>,
    },
}

fn validate(xs: &[f64], ys: &[f64]) -> Result<()> {
    if xs.is_empty() {
        return Err(InterpError::InsufficientData);
    }
    if xs.len() != ys.len() {
        return Err(InterpError::LengthMismatch {
            xs: xs.len(),
            ys: ys.len(),
        });
    }
    for i in 0..xs.len() {
        for j in i + 1..xs.len() {
            if xs[i] == xs[j] {
                return Err(InterpError::DuplicateAbscissa {
                    value: xs[i],
                    first: i,
                    second: j,
                });
            }
        }
    }
    Ok(())
}

impl Interpolant {
    /// Build the interpolant of `(xs[i], ys[i])`.
    ///
    /// # Errors
    /// Empty input, mismatched lengths, repeated abscissae, or (monomial
    /// basis only) a numerically singular Vandermonde matrix.
    pub fn new(xs: &[f64], ys: &[f64], method: InterpolationMethod) -> Result<Self> {
        validate(xs, ys)?;
        Ok(match method {
            InterpolationMethod::Lagrange => Self::lagrange(xs, ys),
            InterpolationMethod::Monomial => Self::monomial(xs, ys)?,
            InterpolationMethod::Newton => Self::newton(xs, ys),
        })
    }

    fn lagrange(xs: &[f64], ys: &[f64]) -> Self {
        let weights = (0..xs.len())
            .map(|i| {
                let denom: f64 = (0..xs.len())
                    .filter(|&j| j != i)
                    .map(|j| xs[i] - xs[j])
                    .product();
                ys[i] / denom
            })
            .collect();
        Interpolant::Lagrange {
            nodes: xs.to_vec(),
            weights,
        }
    }

    fn monomial(xs: &[f64], ys: &[f64]) -> Result<Self> {
        let n = xs.len();
        let mut vander = DMatrix::from_element(n, n, 1.0);
        for j in 1..n {
            for i in 0..n {
                vander[(i, j)] = vander[(i, j - 1)] * xs[i];
            }
        }
        let rhs = DVector::from_column_slice(ys);
        let coefficients = vander
            .lu()
            .solve(&rhs)
            .ok_or(InterpError::SingularVandermonde)?;
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(InterpError::SingularVandermonde);
        }
        Ok(Interpolant::Monomial {
            coefficients: coefficients.iter().copied().collect(),
        })
    }

    fn newton(xs: &[f64], ys: &[f64]) -> Self {
        let n = xs.len();
        // Overwrite in place: after pass k, table[i] = f[x_{i-k}, ..., x_i] for i >= k
        let mut table = ys.to_vec();
        for k in 1..n {
            for i in (k..n).rev() {
                table[i] = (table[i] - table[i - 1]) / (xs[i] - xs[i - k]);
            }
        }
        Interpolant::Newton {
            nodes: xs.to_vec(),
            coefficients: table,
        }
    }

    /// Polynomial degree bound (number of points minus one)
    pub fn degree(&self) -> usize {
        match self {
            Interpolant::Lagrange { weights, .. } => weights.len() - 1,
            Interpolant::Monomial { coefficients } => coefficients.len() - 1,
            Interpolant::Newton { coefficients, .. } => coefficients.len() - 1,
        }
    }

    pub fn method(&self) -> InterpolationMethod {
        match self {
            Interpolant::Lagrange { .. } => InterpolationMethod::Lagrange,
            Interpolant::Monomial { .. } => InterpolationMethod::Monomial,
            Interpolant::Newton { .. } => InterpolationMethod::Newton,
        }
    }

    /// Evaluate the polynomial at `x`
    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            Interpolant::Lagrange { nodes, weights } => (0..nodes.len())
                .map(|i| {
                    let basis: f64 = (0..nodes.len())
                        .filter(|&j| j != i)
                        .map(|j| x - nodes[j])
                        .product();
                    weights[i] * basis
                })
                .sum(),
            Interpolant::Monomial { coefficients } => coefficients
                .iter()
                .rev()
                .fold(0.0, |acc, &c| acc * x + c),
            Interpolant::Newton {
                nodes,
                coefficients,
            } => {
                let d = coefficients.len() - 1;
                (0..d)
                    .rev()
                    .fold(coefficients[d], |acc, i| acc * (x - nodes[i]) + coefficients[i])
            }
        }
    }

    /// Evaluate at every point of `xs`
    pub fn evaluate_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }
}
