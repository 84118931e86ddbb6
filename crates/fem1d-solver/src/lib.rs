//! Piecewise-linear finite element solver for linear two-point boundary
//! value problems
//!
//! ```text
//! -d/dx [ a(x) du/dx ] + c(x) u(x) = f(x),   u(x_0) = u(x_{n-1}) = 0
//! ```
//!
//! The global system is assembled element by element with 2-point
//! Gauss-Legendre quadrature, boundary rows and columns are eliminated
//! symmetrically, and the result is handed to a pluggable linear solver
//! backend.

pub mod assembly;
pub mod backend;
pub mod boundary_conditions;
pub mod coefficients;
pub mod config;
pub mod error;
pub mod mesh;
pub mod problems;
pub mod quadrature;
pub mod solution;
pub mod solver;

pub use assembly::{ElementContribution, GlobalSystem};
pub use backend::{
    default_backend, BackendError, DenseLuBackend, LinearSolver, SolveInfo, SparseCgBackend,
    TridiagonalBackend,
};
pub use boundary_conditions::Boundary;
pub use coefficients::{fallible, Coefficient, Coefficients, Fallible};
pub use config::{BackendKind, SolverConfig};
pub use error::{FemError, Result};
pub use mesh::{Element, Mesh};
pub use problems::ReferenceProblem;
pub use quadrature::{GaussLegendre, QuadraturePoint};
pub use solution::FemSolution;
pub use solver::{fem1d_bvp_linear, fem1d_bvp_linear_traced, Fem1dSolver};
