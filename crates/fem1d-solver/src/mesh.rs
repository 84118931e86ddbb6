//! One-dimensional mesh for the finite element solver.
//!
//! A mesh is an ordered list of node coordinates. Consecutive nodes bound an
//! element, so a mesh of `n` nodes has `n - 1` elements. Node `0` and node
//! `n - 1` are the boundary nodes.

use crate::error::{FemError, Result};
use serde::Serialize;

/// A linear element spanning two consecutive mesh nodes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    /// Element index (0-based)
    pub index: usize,
    /// Left node index
    pub left: usize,
    /// Right node index
    pub right: usize,
    /// Left node coordinate
    pub xl: f64,
    /// Right node coordinate
    pub xr: f64,
}

impl Element {
    /// Element length `xr - xl` (always positive for a validated mesh)
    pub fn length(&self) -> f64 {
        self.xr - self.xl
    }

    /// Whether `x` lies inside the closed element interval
    pub fn contains(&self, x: f64) -> bool {
        self.xl <= x && x <= self.xr
    }
}

/// Validated, strictly increasing 1D mesh
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mesh {
    nodes: Vec<f64>,
}

impl Mesh {
    /// Build a mesh from node coordinates.
    ///
    /// # Errors
    /// Returns [`FemError::InvalidMesh`] if fewer than two nodes are given, if
    /// any coordinate is not finite, or if the coordinates are not strictly
    /// increasing.
    pub fn new(nodes: Vec<f64>) -> Result<Self> {
        if nodes.len() < 2 {
            return Err(FemError::InvalidMesh(format!(
                "at least 2 nodes are required, got {}",
                nodes.len()
            )));
        }

        if let Some(i) = nodes.iter().position(|x| !x.is_finite()) {
            return Err(FemError::InvalidMesh(format!(
                "node {} has non-finite coordinate {}",
                i, nodes[i]
            )));
        }

        for (i, pair) in nodes.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(FemError::InvalidMesh(format!(
                    "coordinates must be strictly increasing: x[{}] = {} is not greater than x[{}] = {}",
                    i + 1,
                    pair[1],
                    i,
                    pair[0]
                )));
            }
        }

        Ok(Self { nodes })
    }

    /// Build a mesh from `x`, additionally checking the declared node count.
    pub fn with_count(n: usize, x: &[f64]) -> Result<Self> {
        if n < 2 {
            return Err(FemError::InvalidMesh(format!(
                "node count must be at least 2, got {}",
                n
            )));
        }
        if x.len() != n {
            return Err(FemError::InvalidMesh(format!(
                "node count is {} but {} coordinates were given",
                n,
                x.len()
            )));
        }
        Self::new(x.to_vec())
    }

    /// Equally spaced mesh of `n` nodes on `[left, right]`.
    pub fn uniform(n: usize, left: f64, right: f64) -> Result<Self> {
        if n < 2 {
            return Err(FemError::InvalidMesh(format!(
                "node count must be at least 2, got {}",
                n
            )));
        }
        let h = (right - left) / (n - 1) as f64;
        let mut nodes: Vec<f64> = (0..n).map(|i| left + i as f64 * h).collect();
        // Pin the last node so the right boundary is hit exactly
        nodes[n - 1] = right;
        Self::new(nodes)
    }

    /// Number of nodes
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of elements (`num_nodes - 1`)
    pub fn num_elements(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Node coordinates
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Left boundary coordinate
    pub fn left(&self) -> f64 {
        self.nodes[0]
    }

    /// Right boundary coordinate
    pub fn right(&self) -> f64 {
        self.nodes[self.nodes.len() - 1]
    }

    /// Element `e`, spanning nodes `e` and `e + 1`
    pub fn element(&self, e: usize) -> Option<Element> {
        if e + 1 >= self.nodes.len() {
            return None;
        }
        Some(Element {
            index: e,
            left: e,
            right: e + 1,
            xl: self.nodes[e],
            xr: self.nodes[e + 1],
        })
    }

    /// Iterate over all elements in order
    pub fn elements(&self) -> impl Iterator<Item = Element> + '_ {
        self.nodes.windows(2).enumerate().map(|(e, pair)| Element {
            index: e,
            left: e,
            right: e + 1,
            xl: pair[0],
            xr: pair[1],
        })
    }

    /// Find the element containing `x`.
    ///
    /// Interior nodes belong to the element on their left; the left boundary
    /// belongs to element 0. Returns `None` outside `[left, right]`.
    pub fn locate(&self, x: f64) -> Option<Element> {
        if !(self.left() <= x && x <= self.right()) {
            return None;
        }
        // First node strictly greater than or equal to x, clamped to a valid element
        let idx = self.nodes.partition_point(|&node| node < x);
        let e = idx.saturating_sub(1).min(self.num_elements() - 1);
        self.element(e)
    }

    /// Largest element length
    pub fn max_spacing(&self) -> f64 {
        self.elements().map(|e| e.length()).fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_increasing_nodes() {
        let mesh = Mesh::new(vec![0.0, 0.25, 0.5, 1.0]).unwrap();
        assert_eq!(mesh.num_nodes(), 4);
        assert_eq!(mesh.num_elements(), 3);
        assert_eq!(mesh.left(), 0.0);
        assert_eq!(mesh.right(), 1.0);
    }

    #[test]
    fn rejects_single_node() {
        let err = Mesh::new(vec![0.0]).unwrap_err();
        assert!(matches!(err, FemError::InvalidMesh(_)));
    }

    #[test]
    fn rejects_out_of_order_nodes() {
        let err = Mesh::new(vec![0.0, 0.5, 0.3, 1.0]).unwrap_err();
        assert!(matches!(err, FemError::InvalidMesh(_)));
        assert!(err.to_string().contains("x[2]"));
    }

    #[test]
    fn rejects_duplicate_nodes() {
        assert!(Mesh::new(vec![0.0, 0.5, 0.5, 1.0]).is_err());
    }

    #[test]
    fn rejects_non_finite_nodes() {
        assert!(Mesh::new(vec![0.0, f64::NAN, 1.0]).is_err());
        assert!(Mesh::new(vec![0.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn with_count_checks_length() {
        assert!(Mesh::with_count(3, &[0.0, 1.0]).is_err());
        assert!(Mesh::with_count(1, &[0.0]).is_err());
        assert!(Mesh::with_count(2, &[0.0, 1.0]).is_ok());
    }

    #[test]
    fn uniform_mesh_hits_endpoints() {
        let mesh = Mesh::uniform(11, 0.0, 1.0).unwrap();
        assert_eq!(mesh.nodes()[0], 0.0);
        assert_eq!(mesh.nodes()[10], 1.0);
        assert!((mesh.max_spacing() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn elements_span_consecutive_nodes() {
        let mesh = Mesh::new(vec![0.0, 0.2, 1.0]).unwrap();
        let elements: Vec<_> = mesh.elements().collect();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[1].left, 1);
        assert_eq!(elements[1].right, 2);
        assert!((elements[1].length() - 0.8).abs() < 1e-15);
        assert_eq!(mesh.element(1), Some(elements[1]));
        assert_eq!(mesh.element(2), None);
    }

    #[test]
    fn locate_finds_containing_element() {
        let mesh = Mesh::uniform(5, 0.0, 1.0).unwrap();
        assert_eq!(mesh.locate(0.0).unwrap().index, 0);
        assert_eq!(mesh.locate(0.3).unwrap().index, 1);
        assert_eq!(mesh.locate(0.5).unwrap().index, 1);
        assert_eq!(mesh.locate(1.0).unwrap().index, 3);
        assert!(mesh.locate(-0.1).is_none());
        assert!(mesh.locate(1.1).is_none());
    }
}
