//! Nearest-neighbour distances and isolation ranking

use crate::kdtree::KdTree;
use crate::maybe_rayon::*;
use crate::pattern::DistanceMatrix;
use geopattern_core::{Error, PointSet, Result};
use tracing::debug;

/// Per-point nearest-neighbour distance read off a distance matrix.
///
/// The diagonal is excluded from each row's minimum; coincident points
/// have a nearest-neighbour distance of zero.
///
/// # Errors
/// [`Error::DegenerateInput`] for fewer than 2 points.
pub fn nearest_neighbor_distances(matrix: &DistanceMatrix) -> Result<Vec<f64>> {
    Ok(nearest_neighbors(matrix)?.into_iter().map(|(_, d)| d).collect())
}

/// Per-point `(neighbour index, distance)`; ties go to the lowest index.
pub fn nearest_neighbors(matrix: &DistanceMatrix) -> Result<Vec<(usize, f64)>> {
    let n = matrix.len();
    if n < 2 {
        return Err(Error::DegenerateInput(format!(
            "nearest-neighbour distances need at least 2 points, got {}",
            n
        )));
    }

    let result = (0..n)
        .into_par_iter()
        .map(|i| {
            let mut best = (usize::MAX, f64::INFINITY);
            for (j, &d) in matrix.row(i).iter().enumerate() {
                if j != i && d < best.1 {
                    best = (j, d);
                }
            }
            best
        })
        .collect();

    Ok(result)
}

/// Planar nearest-neighbour distances through a k-d tree.
///
/// Same values as `nearest_neighbor_distances(distance_matrix(points,
/// Metric::Euclidean))` in O(n log n) time and O(n) memory.
///
/// # Errors
/// - [`Error::IncompatibleExtent`] for a geographic CRS
/// - [`Error::DegenerateInput`] for fewer than 2 points
pub fn nearest_neighbor_distances_indexed(points: &PointSet) -> Result<Vec<f64>> {
    crate::pattern::Metric::Euclidean.ensure_valid_for(points.crs())?;
    let n = points.len();
    if n < 2 {
        return Err(Error::DegenerateInput(format!(
            "nearest-neighbour distances need at least 2 points, got {}",
            n
        )));
    }

    let tree = KdTree::from_points(points);
    debug!(points = n, "indexed nearest-neighbour search");
    let pts = points.points();

    let distances = (0..n)
        .into_par_iter()
        .map(|i| {
            tree.nearest_excluding(pts[i].x(), pts[i].y(), i)
                .map_or(f64::INFINITY, |nb| nb.distance())
        })
        .collect();

    Ok(distances)
}

/// Indices of the `k` most isolated points.
///
/// Points are ordered by descending nearest-neighbour distance; equal
/// distances keep their input order. A `k` larger than the input returns
/// every index.
pub fn isolation_ranking(distances: &[f64], k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..distances.len()).collect();
    // Stable sort keeps input order among ties
    order.sort_by(|&a, &b| distances[b].total_cmp(&distances[a]));
    order.truncate(k);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{distance_matrix, Metric};
    use geopattern_core::{Point, CRS};

    fn projected(coords: &[(f64, f64)]) -> PointSet {
        let pts = coords.iter().map(|&(x, y)| Point::new(x, y)).collect();
        PointSet::new(pts, CRS::british_national_grid()).unwrap()
    }

    #[test]
    fn test_two_points() {
        let m = distance_matrix(&projected(&[(0.0, 0.0), (1.0, 0.0)]), Metric::Euclidean).unwrap();
        assert_eq!(nearest_neighbor_distances(&m).unwrap(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_nearest_neighbors_indices() {
        let pts = projected(&[(0.0, 0.0), (1.0, 0.0), (10.0, 0.0), (12.0, 0.0)]);
        let m = distance_matrix(&pts, Metric::Euclidean).unwrap();
        let nn = nearest_neighbors(&m).unwrap();
        assert_eq!(nn, vec![(1, 1.0), (0, 1.0), (3, 2.0), (2, 2.0)]);
    }

    #[test]
    fn test_single_point_is_degenerate() {
        let m = distance_matrix(&projected(&[(0.0, 0.0)]), Metric::Euclidean).unwrap();
        assert!(matches!(
            nearest_neighbor_distances(&m),
            Err(Error::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_coincident_points_have_zero_distance() {
        let pts = projected(&[(2.0, 2.0), (2.0, 2.0), (5.0, 2.0)]);
        let m = distance_matrix(&pts, Metric::Euclidean).unwrap();
        assert_eq!(nearest_neighbor_distances(&m).unwrap(), vec![0.0, 0.0, 3.0]);
        assert_eq!(nearest_neighbor_distances_indexed(&pts).unwrap(), vec![0.0, 0.0, 3.0]);
    }

    #[test]
    fn test_indexed_matches_matrix() {
        let coords: Vec<(f64, f64)> = (0..50)
            .map(|i| {
                let t = i as f64;
                ((t * 7.3) % 13.0, (t * 3.1) % 11.0)
            })
            .collect();
        let pts = projected(&coords);
        let from_matrix =
            nearest_neighbor_distances(&distance_matrix(&pts, Metric::Euclidean).unwrap()).unwrap();
        let from_tree = nearest_neighbor_distances_indexed(&pts).unwrap();
        assert_eq!(from_matrix.len(), from_tree.len());
        for (a, b) in from_matrix.iter().zip(&from_tree) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_indexed_rejects_geographic() {
        let pts = PointSet::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)], CRS::wgs84()).unwrap();
        assert!(matches!(
            nearest_neighbor_distances_indexed(&pts),
            Err(Error::IncompatibleExtent { .. })
        ));
    }

    #[test]
    fn test_isolation_ranking_stable() {
        let d = [1.0, 5.0, 3.0, 5.0, 0.5];
        assert_eq!(isolation_ranking(&d, 3), vec![1, 3, 2]);
        assert_eq!(isolation_ranking(&d, 10), vec![1, 3, 2, 0, 4]);
        assert!(isolation_ranking(&d, 0).is_empty());
        assert!(isolation_ranking(&[], 2).is_empty());
    }
}
