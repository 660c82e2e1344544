//! Owned row-range views handed to unit builders.

use std::ops::Range;

use crate::cell::{Active, Grid};

/// A copy of `k` contiguous rows of a matrix or template grid.
///
/// The rows are copied when the slice is taken, so a builder that rewrites
/// its slice can never observe or disturb the grid it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice<T> {
    start: usize,
    grid: Grid<T>,
}

impl<T: Copy + Default> Slice<T> {
    /// Copy `rows` out of `source`.
    #[must_use]
    pub fn copy_of(source: &Grid<T>, rows: Range<usize>) -> Self {
        Self {
            start: rows.start,
            grid: source.copy_rows(rows),
        }
    }

    /// Row index in the source grid of the slice's first row.
    #[inline]
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Row count.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.grid.rows()
    }

    /// `true` for a zero-row slice.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grid.rows() == 0
    }

    /// Cells per row.
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.grid.cols()
    }

    /// Source row range this slice was copied from.
    #[must_use]
    pub fn rows(&self) -> Range<usize> {
        self.start..self.start + self.len()
    }

    /// Borrow the copied rows.
    #[inline]
    #[must_use]
    pub fn grid(&self) -> &Grid<T> {
        &self.grid
    }
}

impl<T: Copy + Default + Active> Slice<T> {
    /// Whether `(row, col)` of the slice holds an active cell.
    #[inline]
    #[must_use]
    pub fn is_active(&self, row: usize, col: usize) -> bool {
        self.grid[(row, col)].is_active()
    }

    /// Number of slice rows active in `col`.
    #[must_use]
    pub fn column_count(&self, col: usize) -> usize {
        (0..self.len()).filter(|&row| self.is_active(row, col)).count()
    }
}
