//! Coefficient functions of the boundary value problem
//!
//! ```text
//! -d/dx [ a(x) du/dx ] + c(x) u(x) = f(x)
//! ```
//!
//! Coefficients are opaque callables evaluated only at quadrature points.
//! Plain closures `Fn(f64) -> f64` are accepted directly; a non-finite return
//! value is reported as an evaluation failure. Closures that can fail with
//! their own error type are wrapped with [`fallible`].

use std::fmt::Display;

/// A scalar function of one variable that may fail to evaluate
pub trait Coefficient: Sync {
    /// Evaluate at `x`, or describe why evaluation failed
    fn evaluate(&self, x: f64) -> Result<f64, String>;
}

impl<F> Coefficient for F
where
    F: Fn(f64) -> f64 + Sync,
{
    fn evaluate(&self, x: f64) -> Result<f64, String> {
        let value = self(x);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(format!("non-finite value {}", value))
        }
    }
}

/// Adapter for closures returning `Result<f64, E>`
pub struct Fallible<F>(pub F);

/// Wrap a fallible closure as a [`Coefficient`]
pub fn fallible<F, E>(func: F) -> Fallible<F>
where
    F: Fn(f64) -> Result<f64, E> + Sync,
    E: Display,
{
    Fallible(func)
}

impl<F, E> Coefficient for Fallible<F>
where
    F: Fn(f64) -> Result<f64, E> + Sync,
    E: Display,
{
    fn evaluate(&self, x: f64) -> Result<f64, String> {
        match (self.0)(x) {
            Ok(value) if value.is_finite() => Ok(value),
            Ok(value) => Err(format!("non-finite value {}", value)),
            Err(err) => Err(err.to_string()),
        }
    }
}

/// The three coefficient functions of a problem, borrowed for one solve
pub struct Coefficients<'a> {
    /// Diffusion coefficient a(x)
    pub a: &'a dyn Coefficient,
    /// Reaction coefficient c(x)
    pub c: &'a dyn Coefficient,
    /// Source term f(x)
    pub f: &'a dyn Coefficient,
}

impl<'a> Coefficients<'a> {
    pub fn new(a: &'a dyn Coefficient, c: &'a dyn Coefficient, f: &'a dyn Coefficient) -> Self {
        Self { a, c, f }
    }
}
