//! Neighborhood windows for focal raster operations

use crate::error::{Error, Result};

/// A window of cells centred on a focal cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighborhood {
    /// Square window of the given radius (side = 2r + 1)
    Square(usize),
    /// Cells within the given radius (in cells) of the centre
    Circle(usize),
}

impl Neighborhood {
    /// Window from an odd side length, e.g. 3 for a 3×3 window
    pub fn from_window_size(size: usize, circular: bool) -> Result<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(Error::invalid_parameter(
                "window_size",
                size,
                "must be an odd number >= 1",
            ));
        }
        let radius = (size - 1) / 2;
        Ok(if circular {
            Neighborhood::Circle(radius)
        } else {
            Neighborhood::Square(radius)
        })
    }

    pub fn radius(&self) -> usize {
        match self {
            Neighborhood::Square(r) | Neighborhood::Circle(r) => *r,
        }
    }

    /// Side length of the bounding square
    pub fn size(&self) -> usize {
        self.radius() * 2 + 1
    }

    /// Check if a relative position is within this neighborhood
    pub fn contains(&self, dr: isize, dc: isize) -> bool {
        let r = self.radius() as isize;
        match self {
            Neighborhood::Square(_) => dr.abs() <= r && dc.abs() <= r,
            Neighborhood::Circle(_) => dr * dr + dc * dc <= r * r,
        }
    }

    /// Relative (row, col) offsets, row-major, centre included
    pub fn offsets(&self) -> Vec<(isize, isize)> {
        let r = self.radius() as isize;
        let mut offsets = Vec::with_capacity(self.size() * self.size());
        for dr in -r..=r {
            for dc in -r..=r {
                if self.contains(dr, dc) {
                    offsets.push((dr, dc));
                }
            }
        }
        offsets
    }
}
