//! 2D k-d tree for spatial indexing
//!
//! Nearest and k-nearest queries over planar coordinates, used by the
//! nearest-neighbour distances, the Voronoi neighbour search and the
//! interpolators. Results always carry the index of the point in the
//! slice the tree was built from; equal distances are ordered by index
//! so queries are deterministic.
//!
//! Reference:
//! Bentley, J.L. (1975). Multidimensional binary search trees used
//! for associative searching. CACM, 18(9).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use geopattern_core::PointSet;

/// A 2D k-d tree over a fixed set of coordinates
#[derive(Debug, Clone)]
pub struct KdTree {
    nodes: Vec<KdNode>,
    coords: Vec<[f64; 2]>,
}

#[derive(Debug, Clone)]
struct KdNode {
    /// Index into `coords`
    index: usize,
    /// Split axis: 0 = x, 1 = y
    axis: u8,
    left: Option<usize>,
    right: Option<usize>,
}

/// Result of a neighbour query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Index of the point in the input the tree was built from
    pub index: usize,
    /// Squared planar distance to the query location
    pub distance_sq: f64,
}

impl Neighbor {
    pub fn distance(&self) -> f64 {
        self.distance_sq.sqrt()
    }
}

// Max-heap entry: the farthest candidate sits on top
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate(Neighbor);

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .distance_sq
            .total_cmp(&other.0.distance_sq)
            .then(self.0.index.cmp(&other.0.index))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl KdTree {
    /// Build a tree from (x, y) coordinates.
    ///
    /// Construction is O(n log n) using median selection on alternating axes.
    pub fn build<I>(coords: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let coords: Vec<[f64; 2]> = coords.into_iter().map(|(x, y)| [x, y]).collect();
        let mut order: Vec<usize> = (0..coords.len()).collect();
        let mut nodes = Vec::with_capacity(coords.len());

        if !coords.is_empty() {
            build_recursive(&coords, &mut order, 0, &mut nodes);
        }

        Self { nodes, coords }
    }

    /// Build a tree over the locations of a point set
    pub fn from_points(points: &PointSet) -> Self {
        Self::build(points.iter().map(|p| (p.x(), p.y())))
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Coordinates of point `index`
    pub fn coord(&self, index: usize) -> Option<(f64, f64)> {
        self.coords.get(index).map(|c| (c[0], c[1]))
    }

    /// Nearest point to (qx, qy); `None` on an empty tree.
    pub fn nearest(&self, qx: f64, qy: f64) -> Option<Neighbor> {
        self.nearest_filtered(qx, qy, None)
    }

    /// Nearest point to (qx, qy) other than point `exclude`.
    ///
    /// Other points at the same location are still found (distance 0).
    pub fn nearest_excluding(&self, qx: f64, qy: f64, exclude: usize) -> Option<Neighbor> {
        self.nearest_filtered(qx, qy, Some(exclude))
    }

    /// The k nearest points to (qx, qy), ascending by distance then index.
    pub fn k_nearest(&self, qx: f64, qy: f64, k: usize) -> Vec<Neighbor> {
        if self.nodes.is_empty() || k == 0 {
            return Vec::new();
        }

        let mut heap = BinaryHeap::with_capacity(k + 1);
        self.knn_recursive(0, qx, qy, k, &mut heap);

        heap.into_sorted_vec().into_iter().map(|c| c.0).collect()
    }

    /// All points within `radius` of (qx, qy), ascending by distance then index.
    pub fn within_radius(&self, qx: f64, qy: f64, radius: f64) -> Vec<Neighbor> {
        if self.nodes.is_empty() || radius.is_nan() || radius < 0.0 {
            return Vec::new();
        }

        let mut results = Vec::new();
        self.radius_recursive(0, qx, qy, radius * radius, &mut results);
        results.sort_by(|a, b| Candidate(*a).cmp(&Candidate(*b)));
        results
    }

    fn nearest_filtered(&self, qx: f64, qy: f64, exclude: Option<usize>) -> Option<Neighbor> {
        if self.nodes.is_empty() {
            return None;
        }
        let mut best: Option<Neighbor> = None;
        self.nearest_recursive(0, qx, qy, exclude, &mut best);
        best
    }

    fn offset(&self, node: &KdNode, qx: f64, qy: f64) -> (f64, f64) {
        let [x, y] = self.coords[node.index];
        let dx = qx - x;
        let dy = qy - y;
        let diff = if node.axis == 0 { dx } else { dy };
        (dx * dx + dy * dy, diff)
    }

    fn nearest_recursive(
        &self,
        node_idx: usize,
        qx: f64,
        qy: f64,
        exclude: Option<usize>,
        best: &mut Option<Neighbor>,
    ) {
        let node = &self.nodes[node_idx];
        let (dist_sq, diff) = self.offset(node, qx, qy);

        if exclude != Some(node.index) {
            let candidate = Neighbor {
                index: node.index,
                distance_sq: dist_sq,
            };
            let better = match best {
                None => true,
                Some(b) => Candidate(candidate) < Candidate(*b),
            };
            if better {
                *best = Some(candidate);
            }
        }

        let (first, second) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(child) = first {
            self.nearest_recursive(child, qx, qy, exclude, best);
        }

        // `<=` so equally distant points on the far side compete on index
        let bound = best.map_or(f64::INFINITY, |b| b.distance_sq);
        if diff * diff <= bound {
            if let Some(child) = second {
                self.nearest_recursive(child, qx, qy, exclude, best);
            }
        }
    }

    fn knn_recursive(
        &self,
        node_idx: usize,
        qx: f64,
        qy: f64,
        k: usize,
        heap: &mut BinaryHeap<Candidate>,
    ) {
        let node = &self.nodes[node_idx];
        let (dist_sq, diff) = self.offset(node, qx, qy);

        let candidate = Candidate(Neighbor {
            index: node.index,
            distance_sq: dist_sq,
        });
        if heap.len() < k {
            heap.push(candidate);
        } else if heap.peek().is_some_and(|worst| candidate < *worst) {
            heap.pop();
            heap.push(candidate);
        }

        let (first, second) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(child) = first {
            self.knn_recursive(child, qx, qy, k, heap);
        }

        let bound = if heap.len() < k {
            f64::INFINITY
        } else {
            heap.peek().map_or(f64::INFINITY, |worst| worst.0.distance_sq)
        };
        if diff * diff <= bound {
            if let Some(child) = second {
                self.knn_recursive(child, qx, qy, k, heap);
            }
        }
    }

    fn radius_recursive(
        &self,
        node_idx: usize,
        qx: f64,
        qy: f64,
        radius_sq: f64,
        results: &mut Vec<Neighbor>,
    ) {
        let node = &self.nodes[node_idx];
        let (dist_sq, diff) = self.offset(node, qx, qy);

        if dist_sq <= radius_sq {
            results.push(Neighbor {
                index: node.index,
                distance_sq: dist_sq,
            });
        }

        if let Some(left) = node.left {
            if diff <= 0.0 || diff * diff <= radius_sq {
                self.radius_recursive(left, qx, qy, radius_sq, results);
            }
        }
        if let Some(right) = node.right {
            if diff >= 0.0 || diff * diff <= radius_sq {
                self.radius_recursive(right, qx, qy, radius_sq, results);
            }
        }
    }
}

/// Build the subtree over `order`, returning its root node index.
///
/// Left subtrees hold coordinates `<=` the split value on the node's axis,
/// right subtrees `>=`.
fn build_recursive(
    coords: &[[f64; 2]],
    order: &mut [usize],
    depth: usize,
    nodes: &mut Vec<KdNode>,
) -> usize {
    let axis = (depth % 2) as u8;
    let a = axis as usize;
    let median = order.len() / 2;
    order.select_nth_unstable_by(median, |&i, &j| coords[i][a].total_cmp(&coords[j][a]));

    let node_idx = nodes.len();
    nodes.push(KdNode {
        index: order[median],
        axis,
        left: None,
        right: None,
    });

    let (left, rest) = order.split_at_mut(median);
    let right = &mut rest[1..];

    if !left.is_empty() {
        let child = build_recursive(coords, left, depth + 1, nodes);
        nodes[node_idx].left = Some(child);
    }
    if !right.is_empty() {
        let child = build_recursive(coords, right, depth + 1, nodes);
        nodes[node_idx].right = Some(child);
    }

    node_idx
}
