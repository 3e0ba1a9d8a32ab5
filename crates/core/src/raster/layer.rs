//! Main Raster type

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::{Grid, RasterElement};
use ndarray::{Array2, ArrayView2, ArrayViewMut2};

/// A raster layer: cell values of type `T` over a [`Grid`].
///
/// Values are stored row-major in an `ndarray::Array2`, row 0 being the
/// northernmost row. The grid geometry is fixed at construction; cell
/// values stay mutable.
///
/// # Example
///
/// ```ignore
/// use geopattern_core::{BoundingExtent, Grid, Raster, CRS};
///
/// let extent = BoundingExtent::new(0.0, 0.0, 100.0, 100.0)?;
/// let grid = Grid::new(extent, 10, 10, CRS::british_national_grid())?;
/// let mut raster: Raster<f64> = Raster::nodata_like(grid);
/// raster.set(2, 3, 42.0)?;
/// ```
#[derive(Debug, Clone)]
pub struct Raster<T: RasterElement> {
    /// Cell values (row, col)
    data: Array2<T>,
    grid: Grid,
    /// No-data value. NaN is always no-data for float rasters.
    nodata: Option<T>,
}

/// Floating-point raster layer
pub type RasterLayer = Raster<f64>;

impl<T: RasterElement> Raster<T> {
    /// Create a raster filled with zeros
    pub fn new(grid: Grid) -> Self {
        Self {
            data: Array2::zeros(grid.shape()),
            grid,
            nodata: None,
        }
    }

    /// Create a raster filled with a specific value
    pub fn filled(grid: Grid, value: T) -> Self {
        Self {
            data: Array2::from_elem(grid.shape(), value),
            grid,
            nodata: None,
        }
    }

    /// Create a raster where every cell is the type's default no-data value
    pub fn nodata_like(grid: Grid) -> Self {
        let nodata = T::default_nodata();
        Self {
            data: Array2::from_elem(grid.shape(), nodata),
            grid,
            nodata: Some(nodata),
        }
    }

    /// Create a raster from row-major values
    pub fn from_vec(grid: Grid, data: Vec<T>) -> Result<Self> {
        let (rows, cols) = grid.shape();
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions { rows, cols });
        }
        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|_| Error::InvalidDimensions { rows, cols })?;
        Ok(Self {
            data: array,
            grid,
            nodata: None,
        })
    }

    /// Create a raster from an ndarray matching the grid shape
    pub fn from_array(grid: Grid, data: Array2<T>) -> Result<Self> {
        let (er, ec) = grid.shape();
        let (ar, ac) = data.dim();
        if (er, ec) != (ar, ac) {
            return Err(Error::SizeMismatch { er, ec, ar, ac });
        }
        Ok(Self {
            data,
            grid,
            nodata: None,
        })
    }

    /// Same grid, different cell type, filled with zeros
    pub fn with_same_grid<U: RasterElement>(&self) -> Raster<U> {
        Raster::new(self.grid.clone())
    }

    // Dimensions

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Data access

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Get value at (row, col) without bounds checking
    ///
    /// # Safety
    /// Caller must ensure row < self.rows() and col < self.cols()
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> T {
        unsafe { *self.data.uget((row, col)) }
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        self.data[(row, col)] = value;
        Ok(())
    }

    pub fn view(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }

    pub fn view_mut(&mut self) -> ArrayViewMut2<'_, T> {
        self.data.view_mut()
    }

    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Array2<T> {
        &mut self.data
    }

    pub fn into_array(self) -> Array2<T> {
        self.data
    }

    // Metadata

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn crs(&self) -> &CRS {
        self.grid.crs()
    }

    pub fn nodata(&self) -> Option<T> {
        self.nodata
    }

    pub fn set_nodata(&mut self, nodata: Option<T>) {
        self.nodata = nodata;
    }

    /// Centre of cell (row, col) in CRS units
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        self.grid.cell_center(row, col)
    }

    // Value checks

    pub fn is_nodata(&self, value: T) -> bool {
        value.is_nodata(self.nodata)
    }

    pub fn is_nodata_at(&self, row: usize, col: usize) -> Result<bool> {
        let value = self.get(row, col)?;
        Ok(self.is_nodata(value))
    }

    // Statistics

    /// Basic statistics over valid cells
    pub fn statistics(&self) -> RasterStatistics<T> {
        let mut min: Option<T> = None;
        let mut max: Option<T> = None;
        let mut sum: f64 = 0.0;
        let mut count: usize = 0;

        for &value in self.data.iter() {
            if self.is_nodata(value) {
                continue;
            }

            if min.is_none_or(|m| value < m) {
                min = Some(value);
            }
            if max.is_none_or(|m| value > m) {
                max = Some(value);
            }

            if let Some(v) = value.to_f64() {
                sum += v;
                count += 1;
            }
        }

        let mean = if count > 0 {
            Some(sum / count as f64)
        } else {
            None
        };

        RasterStatistics {
            min,
            max,
            mean,
            valid_count: count,
            nodata_count: self.len() - count,
        }
    }
}

/// Basic statistics for a raster
#[derive(Debug, Clone)]
pub struct RasterStatistics<T> {
    pub min: Option<T>,
    pub max: Option<T>,
    pub mean: Option<f64>,
    pub valid_count: usize,
    pub nodata_count: usize,
}
