//! Fixed-value boundary conditions u(x_0) = u(x_{n-1}) = 0.
//!
//! Each boundary equation is overwritten with the identity row, and the
//! boundary unknown is then eliminated from every other equation. Zeroing the
//! column as well as the row keeps A symmetric:
//!
//! ```text
//! row k:        A[k,:] = 0, A[k,k] = 1, b[k] = g
//! rows i != k:  b[i] -= A[i,k] * b[k], A[i,k] = 0
//! ```
//!
//! The elimination reads `b[k]` after it has been overwritten, so it always
//! uses the prescribed value `g`.

use crate::assembly::GlobalSystem;

/// Boundary end of the mesh interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Left,
    Right,
}

impl Boundary {
    /// Node index of this boundary in a system of `num_nodes` unknowns
    pub fn node(&self, num_nodes: usize) -> usize {
        match self {
            Boundary::Left => 0,
            Boundary::Right => num_nodes - 1,
        }
    }
}

impl GlobalSystem {
    /// Apply u = 0 at both boundary nodes, left first.
    pub fn apply_boundary_conditions(&mut self) {
        self.apply_fixed_zero(Boundary::Left);
        self.apply_fixed_zero(Boundary::Right);
    }

    /// Apply u = 0 at one boundary node
    pub fn apply_fixed_zero(&mut self, boundary: Boundary) {
        let node = boundary.node(self.num_nodes);
        self.fix_node(node, 0.0);
    }

    fn fix_node(&mut self, node: usize, value: f64) {
        let n = self.num_nodes;

        for j in 0..n {
            self.stiffness[(node, j)] = 0.0;
        }
        self.stiffness[(node, node)] = 1.0;
        self.load[node] = value;

        for i in (0..n).filter(|&i| i != node) {
            self.load[i] -= self.stiffness[(i, node)] * self.load[node];
            self.stiffness[(i, node)] = 0.0;
        }

        if !self.constrained_nodes.contains(&node) {
            self.constrained_nodes.push(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::Coefficients;
    use crate::mesh::Mesh;

    fn assembled(n: usize) -> GlobalSystem {
        let mesh = Mesh::uniform(n, 0.0, 1.0).unwrap();
        let a = |x: f64| 1.0 + x;
        let c = |_x: f64| 2.0;
        let f = |x: f64| 1.0 - x;
        GlobalSystem::assemble(&mesh, &Coefficients::new(&a, &c, &f), false).unwrap()
    }

    #[test]
    fn boundary_rows_become_identity() {
        let mut system = assembled(5);
        system.apply_boundary_conditions();
        for j in 0..5 {
            let expected_first = if j == 0 { 1.0 } else { 0.0 };
            let expected_last = if j == 4 { 1.0 } else { 0.0 };
            assert_eq!(system.stiffness[(0, j)], expected_first);
            assert_eq!(system.stiffness[(4, j)], expected_last);
        }
        assert_eq!(system.load[0], 0.0);
        assert_eq!(system.load[4], 0.0);
        assert_eq!(system.constrained_nodes, vec![0, 4]);
    }

    #[test]
    fn elimination_keeps_symmetry() {
        let mut system = assembled(6);
        system.apply_boundary_conditions();
        assert!(system.is_symmetric(1e-12));
        for i in 1..5 {
            assert_eq!(system.stiffness[(i, 0)], 0.0);
            assert_eq!(system.stiffness[(i, 5)], 0.0);
        }
    }

    #[test]
    fn interior_block_is_untouched() {
        let original = assembled(5);
        let mut system = original.clone();
        system.apply_boundary_conditions();
        for i in 1..4 {
            for j in 1..4 {
                assert_eq!(system.stiffness[(i, j)], original.stiffness[(i, j)]);
            }
            assert_eq!(system.load[i], original.load[i]);
        }
    }

    #[test]
    fn order_of_boundaries_does_not_matter() {
        let mut left_first = assembled(7);
        left_first.apply_fixed_zero(Boundary::Left);
        left_first.apply_fixed_zero(Boundary::Right);

        let mut right_first = assembled(7);
        right_first.apply_fixed_zero(Boundary::Right);
        right_first.apply_fixed_zero(Boundary::Left);

        assert_eq!(left_first.stiffness, right_first.stiffness);
        assert_eq!(left_first.load, right_first.load);
    }

    #[test]
    fn two_node_system_reduces_to_identity() {
        let mut system = assembled(2);
        system.apply_boundary_conditions();
        assert_eq!(system.stiffness[(0, 0)], 1.0);
        assert_eq!(system.stiffness[(0, 1)], 0.0);
        assert_eq!(system.stiffness[(1, 0)], 0.0);
        assert_eq!(system.stiffness[(1, 1)], 1.0);
        assert_eq!(system.load[0], 0.0);
        assert_eq!(system.load[1], 0.0);
    }

    #[test]
    fn nonzero_value_is_moved_to_the_right_hand_side() {
        let mut system = assembled(4);
        let coupling = system.stiffness[(1, 0)];
        let before = system.load[1];
        system.fix_node(0, 2.5);
        assert_eq!(system.load[0], 2.5);
        assert!((system.load[1] - (before - coupling * 2.5)).abs() < 1e-14);
        assert_eq!(system.stiffness[(1, 0)], 0.0);
    }
}
