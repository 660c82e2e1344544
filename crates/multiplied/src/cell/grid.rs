//! Row-major cell storage shared by matrices, templates, and bit maps.

use std::fmt;
use std::ops::{Index, IndexMut, Range};

use super::{Active, Bitwidth, Glyph};
use crate::error::{Error, Result};

/// A dense `rows x cols` grid addressed by `(row, col)`.
///
/// Cells live in one flat vector; rows are borrowed as slices and never
/// aliased mutably across an operation. Copies of row ranges are explicit
/// through [`Grid::copy_rows`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T: Copy + Default> Grid<T> {
    /// Grid of default cells.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, T::default())
    }

    /// Grid with every cell set to `value`.
    #[must_use]
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            cells: vec![value; rows * cols],
        }
    }

    /// Square-ish grid for a bitwidth: `bits` rows of `2 * bits` cells.
    #[must_use]
    pub fn for_bits(bits: Bitwidth) -> Self {
        Self::new(bits.bits(), bits.width())
    }

    /// Row count.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column count.
    #[inline]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at `(row, col)`, or `None` when out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        (row < self.rows && col < self.cols).then(|| self.cells[row * self.cols + col])
    }

    /// Borrow one row.
    #[inline]
    #[must_use]
    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Mutably borrow one row.
    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        let start = row * self.cols;
        &mut self.cells[start..start + self.cols]
    }

    /// Iterate rows top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.cells.chunks(self.cols.max(1)).take(self.rows)
    }

    /// Owned copy of a contiguous row range.
    #[must_use]
    pub fn copy_rows(&self, rows: Range<usize>) -> Self {
        let cells = self.cells[rows.start * self.cols..rows.end * self.cols].to_vec();
        Self {
            rows: rows.len(),
            cols: self.cols,
            cells,
        }
    }

    /// Overwrite rows starting at `start` with the rows of `other`.
    pub fn paste_rows(&mut self, start: usize, other: &Grid<T>) {
        for (offset, row) in other.iter_rows().enumerate() {
            self.row_mut(start + offset).copy_from_slice(row);
        }
    }

    /// Cell-wise conversion into another grid type.
    #[must_use]
    pub fn map<U, F>(&self, f: F) -> Grid<U>
    where
        U: Copy + Default,
        F: FnMut(&T) -> U,
    {
        Grid {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    /// Iterate `(row, col, cell)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        let cols = self.cols.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (i / cols, i % cols, cell))
    }
}

impl<T: Copy + Default + Active> Grid<T> {
    /// `true` if the row holds any non-empty cell.
    #[must_use]
    pub fn row_active(&self, row: usize) -> bool {
        self.row(row).iter().any(Active::is_active)
    }

    /// Per-row activity, top to bottom.
    #[must_use]
    pub fn checksum(&self) -> Vec<bool> {
        (0..self.rows).map(|row| self.row_active(row)).collect()
    }

    /// Leftmost and rightmost active column of a row.
    #[must_use]
    pub fn active_span(&self, row: usize) -> Option<(usize, usize)> {
        let cells = self.row(row);
        let first = cells.iter().position(Active::is_active)?;
        let last = cells.iter().rposition(Active::is_active)?;
        Some((first, last))
    }
}

impl<T: Glyph> Grid<T> {
    /// Parse textual rows for a bitwidth inferred from the row count.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedBitwidth`] if the row count is not supported
    /// - [`Error::RowWidth`] if a row is not `2 * bits` glyphs wide
    /// - [`Error::InvalidGlyph`] for a character outside the cell's glyph set
    pub fn parse_rows<S: AsRef<str>>(rows: &[S]) -> Result<(Bitwidth, Self)> {
        let bits = Bitwidth::new(rows.len())?;
        let mut grid = Self::for_bits(bits);
        for (r, text) in rows.iter().enumerate() {
            let text = text.as_ref();
            let found = text.chars().count();
            if found != bits.width() {
                return Err(Error::RowWidth {
                    row: r,
                    expected: bits.width(),
                    found,
                });
            }
            for (c, glyph) in text.chars().enumerate() {
                grid[(r, c)] =
                    T::from_glyph(glyph).ok_or(Error::InvalidGlyph { glyph, row: r, col: c })?;
            }
        }
        Ok((bits, grid))
    }

    /// Parse newline separated rows, ignoring surrounding whitespace and
    /// blank lines.
    ///
    /// # Errors
    ///
    /// As [`Grid::parse_rows`].
    pub fn parse_text(text: &str) -> Result<(Bitwidth, Self)> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Self::parse_rows(&rows)
    }

    /// Render each row as a string of glyphs.
    #[must_use]
    pub fn render_rows(&self) -> Vec<String> {
        self.iter_rows()
            .map(|row| row.iter().map(|cell| cell.glyph()).collect())
            .collect()
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.cells[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        &mut self.cells[row * self.cols + col]
    }
}

/// Rows of glyphs joined by newlines, without a trailing newline.
impl<T: Glyph> fmt::Display for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.render_rows().iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(row)?;
        }
        Ok(())
    }
}
