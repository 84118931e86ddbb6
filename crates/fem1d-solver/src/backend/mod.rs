//! Linear solver backends.
//!
//! The assembly layer produces a [`GlobalSystem`](crate::assembly::GlobalSystem)
//! with boundary conditions applied; a backend turns it into the nodal
//! coefficient vector.
//!
//! # Backends
//!
//! - **Dense LU** (default): nalgebra LU with partial pivoting. General, O(n³).
//! - **Tridiagonal**: Thomas algorithm on the three diagonals. O(n), relies on
//!   the tridiagonal fill of piecewise-linear elements.
//! - **Sparse CG**: conjugate gradient on a CSR copy of the tridiagonal band
//!   (nalgebra-sparse). Requires a symmetric positive definite system.
//!
//! The tridiagonal and CG backends only read the band of A. The dense
//! `GlobalSystem` itself is still O(n²) in memory.
//!
//! ```text
//! Element contributions (nalgebra Matrix2)
//!         │
//!         ▼
//! GlobalSystem (dense A, b; BCs applied)
//!         │
//!         ▼
//!   LinearSolver trait
//!    ┌────┼────────┐
//!    ▼    ▼        ▼
//! DenseLu Tridiag SparseCg
//! ```

pub mod native;
pub mod sparse_cg;
pub mod traits;
pub mod tridiagonal;

pub use native::DenseLuBackend;
pub use sparse_cg::SparseCgBackend;
pub use traits::*;
pub use tridiagonal::TridiagonalBackend;

/// Returns the default solver backend (dense LU).
pub fn default_backend() -> Box<dyn LinearSolver> {
    Box::new(DenseLuBackend)
}
