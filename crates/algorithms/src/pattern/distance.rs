//! Pairwise distances between points
//!
//! The metric is always chosen by the caller and checked against the
//! CRS of the point set: planar distances on lon/lat degrees, or
//! great-circle distances on projected metres, are rejected.

use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use crate::maybe_rayon::*;
use geo::Distance;
use geopattern_core::{Error, PointSet, Result, CRS};
use tracing::debug;

/// Mean Earth radius (GRS80 R₁), metres
pub const EARTH_RADIUS_M: f64 = geo::Haversine.radius();

/// Distance metric between two locations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Planar distance in CRS units; projected CRS only
    #[default]
    Euclidean,
    /// Great-circle distance in metres on a sphere of radius
    /// [`EARTH_RADIUS_M`]; `x` is longitude and `y` latitude, in degrees.
    /// Geographic CRS only.
    Haversine,
}

impl Metric {
    /// The metric matching the kind of `crs`
    pub fn for_crs(crs: &CRS) -> Self {
        if crs.is_geographic() {
            Metric::Haversine
        } else {
            Metric::Euclidean
        }
    }

    /// Whether this metric expects geographic (lon/lat) coordinates
    pub fn is_geographic(&self) -> bool {
        matches!(self, Metric::Haversine)
    }

    /// Fail with `IncompatibleExtent` if this metric does not fit `crs`
    pub fn ensure_valid_for(&self, crs: &CRS) -> Result<()> {
        if self.is_geographic() == crs.is_geographic() {
            return Ok(());
        }
        let kind = if crs.is_geographic() { "geographic" } else { "projected" };
        Err(Error::IncompatibleExtent {
            expected: format!("{} CRS for {:?} distances", self.crs_kind(), self),
            found: format!("{} CRS {}", kind, crs),
        })
    }

    fn crs_kind(&self) -> &'static str {
        if self.is_geographic() { "geographic" } else { "projected" }
    }

    /// Distance between (x1, y1) and (x2, y2)
    #[inline]
    pub fn distance(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
        match self {
            Metric::Euclidean => geo::Euclidean.distance(geo::Point::new(x1, y1), geo::Point::new(x2, y2)),
            Metric::Haversine => haversine(x1, y1, x2, y2),
        }
    }
}

/// Great-circle distance in metres between two lon/lat positions (degrees)
pub fn haversine(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    geo::Haversine.distance(geo::Point::new(lon1, lat1), geo::Point::new(lon2, lat2))
}

/// Square matrix of pairwise distances over a point set.
///
/// `D[i][j]` is the distance between points `i` and `j`; the matrix is
/// symmetric and the diagonal is exactly zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    values: Array2<f64>,
    metric: Metric,
}

impl DistanceMatrix {
    /// Number of points (rows)
    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.values.nrows() == 0
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get((i, j)).copied()
    }

    /// Distances from point `i` to every point
    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.values.row(i)
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn into_array(self) -> Array2<f64> {
        self.values
    }
}

/// Compute all pairwise distances under `metric`.
///
/// Rows are computed in parallel when the `parallel` feature is enabled.
///
/// # Errors
/// - [`Error::EmptyInput`] for an empty point set
/// - [`Error::IncompatibleExtent`] if `metric` does not match the CRS kind
pub fn distance_matrix(points: &PointSet, metric: Metric) -> Result<DistanceMatrix> {
    if points.is_empty() {
        return Err(Error::EmptyInput { what: "point set" });
    }
    metric.ensure_valid_for(points.crs())?;

    let n = points.len();
    debug!(points = n, ?metric, "distance matrix");
    let pts = points.points();

    let data: Vec<f64> = (0..n)
        .into_par_iter()
        .flat_map(|i| {
            let (xi, yi) = (pts[i].x(), pts[i].y());
            pts.iter()
                .enumerate()
                .map(|(j, pj)| {
                    if i == j {
                        0.0
                    } else {
                        metric.distance(xi, yi, pj.x(), pj.y())
                    }
                })
                .collect::<Vec<f64>>()
        })
        .collect();

    let values = Array2::from_shape_vec((n, n), data)
        .map_err(|_| Error::InvalidDimensions { rows: n, cols: n })?;

    Ok(DistanceMatrix { values, metric })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geopattern_core::Point;

    fn projected(coords: &[(f64, f64)]) -> PointSet {
        let pts = coords.iter().map(|&(x, y)| Point::new(x, y)).collect();
        PointSet::new(pts, CRS::british_national_grid()).unwrap()
    }

    #[test]
    fn test_euclidean_matrix() {
        let m = distance_matrix(&projected(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)]), Metric::Euclidean).unwrap();
        assert_eq!(m.len(), 3);
        assert_eq!(m.get(0, 1), Some(5.0));
        assert_eq!(m.get(2, 0), Some(10.0));
        for i in 0..3 {
            assert_eq!(m.get(i, i), Some(0.0));
            for j in 0..3 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
    }

    #[test]
    fn test_haversine_one_degree_of_latitude() {
        let d = haversine(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(d, EARTH_RADIUS_M * 1f64.to_radians(), max_relative = 1e-12);
    }

    #[test]
    fn test_haversine_known_route() {
        // New York to London, metres
        let d = haversine(-74.006, 40.7128, -0.1278, 51.5074);
        assert_relative_eq!(d.round(), 5_570_230.0);
        assert_eq!(d, Metric::Haversine.distance(-74.006, 40.7128, -0.1278, 51.5074));
    }

    #[test]
    fn test_euclidean_metric() {
        assert_eq!(Metric::Euclidean.distance(1.0, 1.0, 4.0, 5.0), 5.0);
        assert_eq!(Metric::Euclidean.distance(2.0, 2.0, 2.0, 2.0), 0.0);
    }

    #[test]
    fn test_haversine_antipodes() {
        let d = haversine(0.0, 0.0, 180.0, 0.0);
        assert_relative_eq!(d, EARTH_RADIUS_M * std::f64::consts::PI, max_relative = 1e-12);
    }

    #[test]
    fn test_haversine_matrix_on_geographic_points() {
        // Two London cycle-hire docks, roughly 1 km apart
        let pts = PointSet::new(
            vec![Point::new(-0.1275, 51.5072), Point::new(-0.1420, 51.5010)],
            CRS::wgs84(),
        )
        .unwrap();
        let m = distance_matrix(&pts, Metric::Haversine).unwrap();
        let d = m.get(0, 1).unwrap();
        assert!(d > 1000.0 && d < 1300.0, "got {}", d);
    }

    #[test]
    fn test_metric_must_match_crs() {
        let pts = projected(&[(0.0, 0.0), (1.0, 1.0)]);
        let err = distance_matrix(&pts, Metric::Haversine).unwrap_err();
        assert!(matches!(err, Error::IncompatibleExtent { .. }));

        let lonlat = PointSet::new(vec![Point::new(0.0, 0.0)], CRS::wgs84()).unwrap();
        assert!(distance_matrix(&lonlat, Metric::Euclidean).is_err());
    }

    #[test]
    fn test_declared_geographic_crs_rejects_euclidean() {
        let ed50 = CRS::geographic(4230);
        assert!(Metric::Euclidean.ensure_valid_for(&ed50).is_err());
        assert!(Metric::Haversine.ensure_valid_for(&ed50).is_ok());
        assert_eq!(Metric::for_crs(&ed50), Metric::Haversine);
    }

    #[test]
    fn test_metric_for_crs() {
        assert_eq!(Metric::for_crs(&CRS::wgs84()), Metric::Haversine);
        assert_eq!(Metric::for_crs(&CRS::british_national_grid()), Metric::Euclidean);
        assert_eq!(Metric::default(), Metric::Euclidean);
    }

    #[test]
    fn test_empty_input() {
        let empty = PointSet::empty(CRS::british_national_grid());
        assert!(matches!(
            distance_matrix(&empty, Metric::Euclidean),
            Err(Error::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_metric_from_config() {
        let m: Metric = serde_json::from_str("\"haversine\"").unwrap();
        assert_eq!(m, Metric::Haversine);
    }
}
