//! Point-to-raster binning

use crate::maybe_rayon::*;
use crate::statistics::Reducer;
use geopattern_core::raster::{Grid, RasterLayer};
use geopattern_core::{PointSet, Result};
use tracing::debug;

/// Bin points into grid cells and reduce an attribute per cell.
///
/// Each point goes to the cell whose half-open interval contains it (see
/// [`Grid::cell_of`]); points outside the grid extent are ignored. Cells
/// that receive no values are no data (NaN), whatever the reducer.
///
/// `Count` counts points regardless of `attribute`; other reducers skip
/// points whose attribute is missing or non-numeric.
///
/// # Errors
/// - [`geopattern_core::Error::IncompatibleExtent`] if grid and point CRS differ
/// - [`geopattern_core::Error::InvalidParameter`] for an out-of-range percentile
pub fn rasterize(
    points: &PointSet,
    grid: &Grid,
    attribute: &str,
    reducer: Reducer,
) -> Result<RasterLayer> {
    grid.crs().ensure_compatible(points.crs())?;
    reducer.validate()?;

    let (rows, cols) = grid.shape();
    let mut bins: Vec<Vec<f64>> = vec![Vec::new(); rows * cols];
    let mut outside = 0usize;
    let mut skipped = 0usize;

    for p in points {
        let Some((row, col)) = grid.cell_of(p.x(), p.y()) else {
            outside += 1;
            continue;
        };
        let value = if reducer.is_count() {
            1.0
        } else {
            match p.numeric(attribute) {
                Some(v) => v,
                None => {
                    skipped += 1;
                    continue;
                }
            }
        };
        bins[row * cols + col].push(value);
    }

    debug!(
        points = points.len(),
        rows,
        cols,
        outside,
        skipped,
        ?reducer,
        "rasterized points"
    );

    let data: Vec<f64> = bins
        .into_par_iter()
        .map(|mut values| {
            if values.is_empty() {
                f64::NAN
            } else {
                reducer.reduce(&mut values).unwrap_or(f64::NAN)
            }
        })
        .collect();

    let mut output = RasterLayer::from_vec(grid.clone(), data)?;
    output.set_nodata(Some(f64::NAN));
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geopattern_core::{BoundingExtent, Error, Point, CRS};

    fn grid(rows: usize, cols: usize) -> Grid {
        let extent = BoundingExtent::new(0.0, 0.0, 10.0, 10.0).unwrap();
        Grid::new(extent, rows, cols, CRS::british_national_grid()).unwrap()
    }

    fn corners() -> PointSet {
        PointSet::new(
            vec![
                Point::new(0.0, 0.0).with_attribute("v", 2.0),
                Point::new(10.0, 0.0).with_attribute("v", 4.0),
                Point::new(0.0, 10.0).with_attribute("v", 6.0),
                Point::new(10.0, 10.0).with_attribute("v", 8.0),
            ],
            CRS::british_national_grid(),
        )
        .unwrap()
    }

    #[test]
    fn test_single_cell_mean() {
        let out = rasterize(&corners(), &grid(1, 1), "v", Reducer::Mean).unwrap();
        assert_eq!(out.get(0, 0).unwrap(), 5.0);
    }

    #[test]
    fn test_corners_land_in_corner_cells() {
        let out = rasterize(&corners(), &grid(2, 2), "v", Reducer::Sum).unwrap();
        // Row 0 is the north row
        assert_eq!(out.get(0, 0).unwrap(), 6.0);
        assert_eq!(out.get(0, 1).unwrap(), 8.0);
        assert_eq!(out.get(1, 0).unwrap(), 2.0);
        assert_eq!(out.get(1, 1).unwrap(), 4.0);
    }

    #[test]
    fn test_count_and_empty_cells() {
        let out = rasterize(&corners(), &grid(5, 5), "v", Reducer::Count).unwrap();
        assert_eq!(out.get(4, 0).unwrap(), 1.0);
        assert!(out.get(2, 2).unwrap().is_nan());
        assert!(out.is_nodata_at(2, 2).unwrap());
        let stats = out.statistics();
        assert_eq!(stats.valid_count, 4);
    }

    #[test]
    fn test_points_outside_are_ignored() {
        let points = PointSet::new(
            vec![
                Point::new(5.0, 5.0).with_attribute("v", 1.0),
                Point::new(50.0, 5.0).with_attribute("v", 100.0),
            ],
            CRS::british_national_grid(),
        )
        .unwrap();
        let out = rasterize(&points, &grid(1, 1), "v", Reducer::Sum).unwrap();
        assert_eq!(out.get(0, 0).unwrap(), 1.0);
    }

    #[test]
    fn test_missing_attribute_is_no_data() {
        let points = PointSet::new(vec![Point::new(5.0, 5.0)], CRS::british_national_grid()).unwrap();
        let mean = rasterize(&points, &grid(1, 1), "v", Reducer::Mean).unwrap();
        assert!(mean.get(0, 0).unwrap().is_nan());
        let count = rasterize(&points, &grid(1, 1), "v", Reducer::Count).unwrap();
        assert_eq!(count.get(0, 0).unwrap(), 1.0);
    }

    #[test]
    fn test_crs_mismatch() {
        let extent = BoundingExtent::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let g = Grid::new(extent, 1, 1, CRS::wgs84()).unwrap();
        let err = rasterize(&corners(), &g, "v", Reducer::Mean).unwrap_err();
        assert!(matches!(err, Error::IncompatibleExtent { .. }));
    }
}
