//! Regular grid geometry over a bounding extent

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::geometry::BoundingExtent;

/// A bounding extent split into `rows × cols` equal cells.
///
/// North-up: row 0 touches `ymax`, column 0 touches `xmin`. Cell intervals
/// are half-open `[x0, x1) × [y0, y1)`, except that the last column is
/// closed on `xmax` and the top row is closed on `ymax`, so every location
/// inside the extent maps to exactly one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    extent: BoundingExtent,
    rows: usize,
    cols: usize,
    crs: CRS,
}

impl Grid {
    pub fn new(extent: BoundingExtent, rows: usize, cols: usize, crs: CRS) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimensions { rows, cols });
        }
        if extent.width() <= 0.0 || extent.height() <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "grid extent {}x{} has no area",
                extent.width(),
                extent.height()
            )));
        }
        Ok(Self { extent, rows, cols, crs })
    }

    /// Grid of square cells of side `cell_size` anchored at (xmin, ymin).
    ///
    /// `xmax`/`ymax` are pushed out to the next whole cell.
    pub fn with_cell_size(extent: BoundingExtent, cell_size: f64, crs: CRS) -> Result<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(Error::invalid_parameter("cell_size", cell_size, "must be positive"));
        }
        let cols = ((extent.width() / cell_size).ceil() as usize).max(1);
        let rows = ((extent.height() / cell_size).ceil() as usize).max(1);
        let snapped = BoundingExtent::new(
            extent.xmin(),
            extent.ymin(),
            extent.xmin() + cols as f64 * cell_size,
            extent.ymin() + rows as f64 * cell_size,
        )?;
        Self::new(snapped, rows, cols, crs)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Always false: a grid has at least one cell
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn extent(&self) -> &BoundingExtent {
        &self.extent
    }

    pub fn crs(&self) -> &CRS {
        &self.crs
    }

    pub fn cell_width(&self) -> f64 {
        self.extent.width() / self.cols as f64
    }

    pub fn cell_height(&self) -> f64 {
        self.extent.height() / self.rows as f64
    }

    pub fn cell_area(&self) -> f64 {
        self.cell_width() * self.cell_height()
    }

    /// Centre of cell (row, col)
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        let x = self.extent.xmin() + (col as f64 + 0.5) * self.cell_width();
        let y = self.extent.ymax() - (row as f64 + 0.5) * self.cell_height();
        (x, y)
    }

    /// Extent of cell (row, col)
    pub fn cell_extent(&self, row: usize, col: usize) -> Result<BoundingExtent> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        let w = self.cell_width();
        let h = self.cell_height();
        let x0 = self.extent.xmin() + col as f64 * w;
        let y1 = self.extent.ymax() - row as f64 * h;
        BoundingExtent::new(x0, y1 - h, x0 + w, y1)
    }

    /// Cell holding (x, y), or `None` outside the extent
    pub fn cell_of(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if !self.extent.contains(x, y) {
            return None;
        }
        let fx = (x - self.extent.xmin()) / self.extent.width() * self.cols as f64;
        let fy = (y - self.extent.ymin()) / self.extent.height() * self.rows as f64;
        let col = (fx.floor() as usize).min(self.cols - 1);
        let from_bottom = (fy.floor() as usize).min(self.rows - 1);
        Some((self.rows - 1 - from_bottom, col))
    }

    /// Same extent, dimensions and CRS
    pub fn is_aligned_with(&self, other: &Grid) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self.extent == other.extent
            && self.crs.is_equivalent(&other.crs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid_10() -> Grid {
        let extent = BoundingExtent::new(0.0, 0.0, 10.0, 10.0).unwrap();
        Grid::new(extent, 5, 10, CRS::british_national_grid()).unwrap()
    }

    #[test]
    fn test_grid_dimensions() {
        let g = grid_10();
        assert_eq!(g.shape(), (5, 10));
        assert_relative_eq!(g.cell_width(), 1.0);
        assert_relative_eq!(g.cell_height(), 2.0);
        assert_relative_eq!(g.cell_area(), 2.0);
    }

    #[test]
    fn test_grid_rejects_zero_dimensions() {
        let extent = BoundingExtent::new(0.0, 0.0, 1.0, 1.0).unwrap();
        let err = Grid::new(extent, 0, 3, CRS::wgs84()).unwrap_err();
        assert_eq!(err, Error::InvalidDimensions { rows: 0, cols: 3 });
    }

    #[test]
    fn test_grid_rejects_flat_extent() {
        let extent = BoundingExtent::new(0.0, 0.0, 1.0, 0.0).unwrap();
        assert!(Grid::new(extent, 1, 1, CRS::wgs84()).is_err());
    }

    #[test]
    fn test_cell_center_north_up() {
        let g = grid_10();
        assert_eq!(g.cell_center(0, 0), (0.5, 9.0));
        assert_eq!(g.cell_center(4, 9), (9.5, 1.0));
    }

    #[test]
    fn test_cell_of_half_open() {
        let g = grid_10();
        // Interior
        assert_eq!(g.cell_of(0.5, 9.0), Some((0, 0)));
        // Lower bounds are inclusive
        assert_eq!(g.cell_of(1.0, 0.0), Some((4, 1)));
        assert_eq!(g.cell_of(0.0, 2.0), Some((3, 0)));
        // Upper extent edges close the last column and the top row
        assert_eq!(g.cell_of(10.0, 10.0), Some((0, 9)));
        assert_eq!(g.cell_of(10.0, 0.0), Some((4, 9)));
        // Outside
        assert_eq!(g.cell_of(10.01, 5.0), None);
        assert_eq!(g.cell_of(5.0, -0.01), None);
    }

    #[test]
    fn test_cell_extent_covers_center() {
        let g = grid_10();
        let e = g.cell_extent(2, 3).unwrap();
        let (cx, cy) = g.cell_center(2, 3);
        assert!(e.contains(cx, cy));
        assert_eq!(<[f64; 4]>::from(e), [3.0, 4.0, 4.0, 6.0]);
        assert!(g.cell_extent(5, 0).is_err());
    }

    #[test]
    fn test_with_cell_size_snaps_extent() {
        let extent = BoundingExtent::new(0.0, 0.0, 9.5, 4.2).unwrap();
        let g = Grid::with_cell_size(extent, 1.0, CRS::british_national_grid()).unwrap();
        assert_eq!(g.shape(), (5, 10));
        assert_relative_eq!(g.extent().xmax(), 10.0);
        assert_relative_eq!(g.extent().ymax(), 5.0);
        assert!(Grid::with_cell_size(extent, 0.0, CRS::wgs84()).is_err());
    }
}
