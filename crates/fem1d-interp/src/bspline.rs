//! B-spline basis functions and their first two derivatives.
//!
//! For knots `t` and degree `p`, the Cox-de Boor recursion defines
//!
//! ```text
//! B_{i,0}(x) = 1 if t_i <= x < t_{i+1}, else 0
//! B_{i,p}(x) = (x - t_i) / (t_{i+p} - t_i) B_{i,p-1}(x)
//!            + (t_{i+p+1} - x) / (t_{i+p+1} - t_{i+1}) B_{i+1,p-1}(x)
//! ```
//!
//! and the derivative follows the same pattern one degree down:
//!
//! ```text
//! B'_{i,p}(x) = p / (t_{i+p} - t_i) B_{i,p-1}(x) - p / (t_{i+p+1} - t_{i+1}) B_{i+1,p-1}(x)
//! ```
//!
//! Terms whose knot span has zero width are dropped (0/0 := 0). The last
//! non-empty span is closed on the right so the basis is nonzero at the end
//! of the knot vector.

use crate::error::{InterpError, Result};

fn check_knots(knots: &[f64]) -> Result<()> {
    match knots.windows(2).position(|w| w[1] < w[0]) {
        Some(i) => Err(InterpError::DecreasingKnots { position: i + 1 }),
        None => Ok(()),
    }
}

fn check_index(index: usize, knots: &[f64], degree: usize) -> Result<()> {
    let needed = index + degree + 2;
    if knots.len() < needed {
        return Err(InterpError::IndexOutOfRange {
            index,
            degree,
            needed,
            available: knots.len(),
        });
    }
    Ok(())
}

/// `numerator / width`, with zero-width spans contributing nothing
fn ratio(numerator: f64, width: f64) -> f64 {
    if width == 0.0 { 0.0 } else { numerator / width }
}

fn basis_unchecked(x: f64, i: usize, knots: &[f64], degree: usize) -> f64 {
    if degree == 0 {
        let (lo, hi) = (knots[i], knots[i + 1]);
        if lo <= x && x < hi {
            return 1.0;
        }
        // Close the last non-empty span at the right end of the knot vector
        let last = knots[knots.len() - 1];
        if x == last && hi == last && lo < hi {
            return 1.0;
        }
        return 0.0;
    }

    let left = ratio(x - knots[i], knots[i + degree] - knots[i]);
    let right = ratio(knots[i + degree + 1] - x, knots[i + degree + 1] - knots[i + 1]);
    left * basis_unchecked(x, i, knots, degree - 1)
        + right * basis_unchecked(x, i + 1, knots, degree - 1)
}

fn derivative_unchecked(x: f64, i: usize, knots: &[f64], degree: usize) -> f64 {
    if degree == 0 {
        return 0.0;
    }
    let p = degree as f64;
    ratio(p, knots[i + degree] - knots[i]) * basis_unchecked(x, i, knots, degree - 1)
        - ratio(p, knots[i + degree + 1] - knots[i + 1])
            * basis_unchecked(x, i + 1, knots, degree - 1)
}

fn second_derivative_unchecked(x: f64, i: usize, knots: &[f64], degree: usize) -> f64 {
    if degree <= 1 {
        return 0.0;
    }
    let p = degree as f64;
    ratio(p, knots[i + degree] - knots[i]) * derivative_unchecked(x, i, knots, degree - 1)
        - ratio(p, knots[i + degree + 1] - knots[i + 1])
            * derivative_unchecked(x, i + 1, knots, degree - 1)
}

/// Value of `B_{i,degree}` at `x`
pub fn basis(x: f64, i: usize, knots: &[f64], degree: usize) -> Result<f64> {
    check_knots(knots)?;
    check_index(i, knots, degree)?;
    Ok(basis_unchecked(x, i, knots, degree))
}

/// First derivative of `B_{i,degree}` at `x`; zero for degree 0
pub fn derivative(x: f64, i: usize, knots: &[f64], degree: usize) -> Result<f64> {
    check_knots(knots)?;
    check_index(i, knots, degree)?;
    Ok(derivative_unchecked(x, i, knots, degree))
}

/// Second derivative of `B_{i,degree}` at `x`; zero for degree 0 and 1
pub fn second_derivative(x: f64, i: usize, knots: &[f64], degree: usize) -> Result<f64> {
    check_knots(knots)?;
    check_index(i, knots, degree)?;
    Ok(second_derivative_unchecked(x, i, knots, degree))
}

/// Evaluate a basis quantity at every point of `xs`
pub fn evaluate_many<F>(xs: &[f64], mut g: F) -> Result<Vec<f64>>
where
    F: FnMut(f64) -> Result<f64>,
{
    xs.iter().map(|&x| g(x)).collect()
}
