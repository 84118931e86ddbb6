//! Reference boundary value problems with closed-form solutions on [0, 1].
//!
//! Used by the CLI and by the convergence tests. Every problem satisfies
//! u(0) = u(1) = 0.

use std::f64::consts::PI;

/// A problem `-(a u')' + c u = f` with known solution `u`
#[derive(Debug, Clone, Copy)]
pub struct ReferenceProblem {
    pub name: &'static str,
    pub description: &'static str,
    pub a: fn(f64) -> f64,
    pub c: fn(f64) -> f64,
    pub f: fn(f64) -> f64,
    pub exact: fn(f64) -> f64,
    pub exact_derivative: fn(f64) -> f64,
}

fn one(_x: f64) -> f64 {
    1.0
}

fn zero(_x: f64) -> f64 {
    0.0
}

fn quadratic(x: f64) -> f64 {
    x * (1.0 - x)
}

fn quadratic_derivative(x: f64) -> f64 {
    1.0 - 2.0 * x
}

pub const POLY_QUADRATIC: ReferenceProblem = ReferenceProblem {
    name: "poly_quadratic",
    description: "a = 1, c = 0, f = 2, u = x(1-x)",
    a: one,
    c: zero,
    f: |_x| 2.0,
    exact: quadratic,
    exact_derivative: quadratic_derivative,
};

pub const EXP_POLY: ReferenceProblem = ReferenceProblem {
    name: "exp_poly",
    description: "a = 1, c = 0, f = x(x+3)e^x, u = x(1-x)e^x",
    a: one,
    c: zero,
    f: |x| x * (x + 3.0) * x.exp(),
    exact: |x| x * (1.0 - x) * x.exp(),
    exact_derivative: |x| (1.0 - x - x * x) * x.exp(),
};

pub const SINE: ReferenceProblem = ReferenceProblem {
    name: "sine",
    description: "a = 1, c = 0, f = pi^2 sin(pi x), u = sin(pi x)",
    a: one,
    c: zero,
    f: |x| PI * PI * (PI * x).sin(),
    exact: |x| (PI * x).sin(),
    exact_derivative: |x| PI * (PI * x).cos(),
};

pub const REACTION: ReferenceProblem = ReferenceProblem {
    name: "reaction",
    description: "a = 1, c = 1, f = 2 + x(1-x), u = x(1-x)",
    a: one,
    c: one,
    f: |x| 2.0 + x * (1.0 - x),
    exact: quadratic,
    exact_derivative: quadratic_derivative,
};

pub const VARIABLE_DIFFUSION: ReferenceProblem = ReferenceProblem {
    name: "variable_diffusion",
    description: "a = 1 + x, c = 0, f = 1 + 4x, u = x(1-x)",
    a: |x| 1.0 + x,
    c: zero,
    f: |x| 1.0 + 4.0 * x,
    exact: quadratic,
    exact_derivative: quadratic_derivative,
};

/// All reference problems
pub const ALL: &[ReferenceProblem] = &[POLY_QUADRATIC, EXP_POLY, SINE, REACTION, VARIABLE_DIFFUSION];

/// Look up a reference problem by name
pub fn by_name(name: &str) -> Option<&'static ReferenceProblem> {
    ALL.iter().find(|problem| problem.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_solutions_vanish_at_boundaries() {
        for problem in ALL {
            assert!((problem.exact)(0.0).abs() < 1e-15, "{}", problem.name);
            assert!((problem.exact)(1.0).abs() < 1e-15, "{}", problem.name);
        }
    }

    #[test]
    fn source_matches_residual_of_exact_solution() {
        // Check -(a u')' + c u = f with central differences
        let h = 1e-4;
        for problem in ALL {
            for &x in &[0.2, 0.5, 0.8] {
                let flux = |y: f64| (problem.a)(y) * (problem.exact_derivative)(y);
                let lhs = -(flux(x + h) - flux(x - h)) / (2.0 * h)
                    + (problem.c)(x) * (problem.exact)(x);
                let rhs = (problem.f)(x);
                assert!(
                    (lhs - rhs).abs() < 1e-6,
                    "{} at x = {}: {} vs {}",
                    problem.name,
                    x,
                    lhs,
                    rhs
                );
            }
        }
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(by_name("sine").map(|p| p.name), Some("sine"));
        assert!(by_name("missing").is_none());
    }
}
