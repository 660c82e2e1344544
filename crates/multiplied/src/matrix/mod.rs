//! The partial-product matrix.
//!
//! A [`Matrix`] is `bits` rows of `2 * bits` [`Bit`] cells. Built from two
//! operands it is the AND-expansion of a multiplication: row `k` holds
//! operand `a` shifted left by `k` when bit `k` of `b` is set, and a run of
//! `Zero` cells at the same alignment otherwise.
//!
//! ```text
//! a = 0101, b = 0100
//!
//! ____0000   bit 0 of b is 0
//! ___0000_   bit 1 of b is 0
//! __0101__   bit 2 of b is 1
//! _0000___   bit 3 of b is 0
//! ```
//!
//! The per-row checksum marks which rows carry a live partial product.
//! Read as column-weighted integers, the rows of a matrix always sum to the
//! product it represents; every reduction stage preserves that sum.

mod slice;

pub use slice::Slice;

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::cell::{Active, Bit, Bitwidth, Grid};
use crate::error::{Error, Result};
use crate::map::{Map, MapKind};

/// Partial-product matrix with its row checksum.
#[derive(Debug, Clone, Eq)]
pub struct Matrix {
    bits: Bitwidth,
    grid: Grid<Bit>,
    checksum: Vec<bool>,
}

impl Matrix {
    /// AND-expansion of `a * b`.
    ///
    /// If either operand is zero the result is the reserved zero shape: the
    /// structural layout of [`Matrix::seed`] with an all-false checksum.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedBitwidth`] for `bits` outside `{4, 8}`
    /// - [`Error::OperandOutOfRange`] if an operand needs more than `bits` bits
    ///
    /// # Example
    ///
    /// ```
    /// use multiplied::Matrix;
    ///
    /// let m = Matrix::from_operands(4, 5, 4).unwrap();
    /// assert_eq!(m.checksum(), &[false, false, true, false]);
    /// assert_eq!(m.value(), 20);
    /// ```
    pub fn from_operands(bits: usize, a: u32, b: u32) -> Result<Self> {
        let bits = Bitwidth::new(bits)?;
        for operand in [a, b] {
            if operand > bits.max_operand() {
                return Err(Error::OperandOutOfRange {
                    operand,
                    bits: bits.bits(),
                });
            }
        }
        if a == 0 || b == 0 {
            return Ok(Self::zero(bits));
        }

        let n = bits.bits();
        let mut grid = Grid::<Bit>::for_bits(bits);
        let mut checksum = vec![false; n];
        for (k, active) in checksum.iter_mut().enumerate() {
            *active = (b >> k) & 1 == 1;
            for i in 0..n {
                // Bit i of `a` lands in column width-1-(i+k).
                let col = bits.width() - 1 - (i + k);
                grid[(k, col)] = if *active {
                    Bit::from_bool((a >> i) & 1 == 1)
                } else {
                    Bit::Zero
                };
            }
        }
        Ok(Self {
            bits,
            grid,
            checksum,
        })
    }

    /// Structural AND-expansion: every row active, every position `Zero`.
    ///
    /// Stages are planned against this shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedBitwidth`] for `bits` outside `{4, 8}`.
    pub fn seed(bits: usize) -> Result<Self> {
        let bits = Bitwidth::new(bits)?;
        let mut matrix = Self::zero(bits);
        matrix.refresh_checksum();
        Ok(matrix)
    }

    /// The reserved zero shape for a validated bitwidth.
    #[must_use]
    pub fn zero(bits: Bitwidth) -> Self {
        let n = bits.bits();
        let mut grid = Grid::<Bit>::for_bits(bits);
        for k in 0..n {
            let first = n - k;
            grid.row_mut(k)[first..first + n].fill(Bit::Zero);
        }
        Self {
            bits,
            grid,
            checksum: vec![false; n],
        }
    }

    /// Matrix with no cells at all.
    #[must_use]
    pub fn empty(bits: Bitwidth) -> Self {
        Self {
            bits,
            grid: Grid::for_bits(bits),
            checksum: vec![false; bits.bits()],
        }
    }

    /// Matrix from textual rows of `_`, `0`, and `1`.
    ///
    /// # Errors
    ///
    /// As [`Grid::parse_rows`]: unsupported row count, wrong row width, or
    /// an invalid glyph.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let (bits, grid) = Grid::parse_rows(rows)?;
        Ok(Self::from_grid(bits, grid))
    }

    /// Wrap an existing grid, computing its checksum.
    #[must_use]
    pub fn from_grid(bits: Bitwidth, grid: Grid<Bit>) -> Self {
        let checksum = grid.checksum();
        Self {
            bits,
            grid,
            checksum,
        }
    }

    /// Bitwidth of the matrix.
    #[inline]
    #[must_use]
    pub fn bits(&self) -> Bitwidth {
        self.bits
    }

    /// Borrow the cells.
    #[inline]
    #[must_use]
    pub fn grid(&self) -> &Grid<Bit> {
        &self.grid
    }

    /// Per-row activity.
    #[inline]
    #[must_use]
    pub fn checksum(&self) -> &[bool] {
        &self.checksum
    }

    /// Whether row `row` is marked active.
    #[inline]
    #[must_use]
    pub fn is_row_active(&self, row: usize) -> bool {
        self.checksum.get(row).copied().unwrap_or(false)
    }

    /// Count of rows marked active.
    #[must_use]
    pub fn active_rows(&self) -> usize {
        self.checksum.iter().filter(|&&active| active).count()
    }

    /// Count of rows with no cells at all.
    #[must_use]
    pub fn empty_rows(&self) -> usize {
        (0..self.bits.bits())
            .filter(|&row| !self.grid.row_active(row))
            .count()
    }

    /// Unsigned value of one row, `Empty` read as 0.
    #[must_use]
    pub fn row_value(&self, row: usize) -> u64 {
        self.grid
            .row(row)
            .iter()
            .enumerate()
            .map(|(col, bit)| bit.value() * self.bits.weight(col))
            .sum()
    }

    /// Every row as an unsigned integer.
    #[must_use]
    pub fn to_int_rows(&self) -> Vec<u64> {
        (0..self.bits.bits()).map(|row| self.row_value(row)).collect()
    }

    /// Sum of all rows: the product this matrix represents.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.to_int_rows().iter().sum()
    }

    /// Copy rows `rows` into an owned [`Slice`].
    #[must_use]
    pub fn slice(&self, rows: Range<usize>) -> Slice<Bit> {
        Slice::copy_of(&self.grid, rows)
    }

    /// Derive a row map that packs non-empty rows towards row 0.
    ///
    /// Each non-empty row is moved up by the number of empty rows above
    /// it; empty rows stay put. A row is empty when it holds only `Empty`
    /// cells, or with `ignore_zeros = false`, only `Empty` and `Zero` cells.
    #[must_use]
    pub fn resolve_rmap(&self, ignore_zeros: bool) -> Map {
        let mut skipped: i8 = 0;
        let offsets = self
            .grid
            .iter_rows()
            .map(|row| {
                let empty = row
                    .iter()
                    .all(|&bit| bit == Bit::Empty || (!ignore_zeros && bit == Bit::Zero));
                if empty {
                    skipped += 1;
                    0
                } else {
                    -skipped
                }
            })
            .collect();
        let map = Map::from_row_offsets_unchecked(self.bits, offsets);
        debug!(bits = %self.bits, map = %map.render_rows().join(" "), "resolved row map");
        map
    }

    /// Relocate rows according to a row map.
    ///
    /// Row `i` with offset `s` moves up to row `i - |s|`; its old position
    /// is cleared. Rows holding no cells are not written. When two rows land on
    /// the same destination the later row wins. The checksum is recomputed
    /// from the relocated cells.
    ///
    /// # Errors
    ///
    /// - [`Error::BitwidthMismatch`] if the map has a different bitwidth
    /// - [`Error::MapOutOfRange`] if any destination leaves the matrix
    /// - [`Error::NotImplemented`] for bit maps
    pub fn apply_map(&mut self, map: &Map) -> Result<()> {
        self.bits.expect_eq("map", map.bits())?;
        let offsets = match map.kind() {
            MapKind::Row(offsets) => offsets,
            MapKind::Bit(_) => return Err(Error::NotImplemented("bit-wise map application")),
        };

        let n = self.bits.bits();
        let mut targets = Vec::with_capacity(n);
        for (row, &offset) in offsets.iter().enumerate() {
            let dest = row as isize - isize::from(offset.unsigned_abs());
            if dest < 0 {
                return Err(Error::MapOutOfRange { row, offset });
            }
            targets.push(dest as usize);
        }

        let mut grid = Grid::<Bit>::for_bits(self.bits);
        let mut written = vec![None; n];
        for (row, &dest) in targets.iter().enumerate() {
            if !self.grid.row_active(row) {
                continue;
            }
            if let Some(previous) = written[dest] {
                warn!(row, previous, dest, "row map collision, later row wins");
            }
            grid.row_mut(dest).copy_from_slice(self.grid.row(row));
            written[dest] = Some(row);
        }
        self.grid = grid;
        self.refresh_checksum();
        Ok(())
    }

    /// Merge disjoint matrices cell by cell.
    ///
    /// # Errors
    ///
    /// - [`Error::BitwidthMismatch`] if a part has a different bitwidth
    /// - [`Error::MergeConflict`] if two parts both place a cell at the same
    ///   position
    pub fn merge(bits: Bitwidth, parts: &[Matrix]) -> Result<Self> {
        let mut grid = Grid::<Bit>::for_bits(bits);
        for part in parts {
            bits.expect_eq("merged matrix", part.bits)?;
            for (row, col, bit) in part.grid.cells() {
                if !bit.is_active() {
                    continue;
                }
                if grid[(row, col)].is_active() {
                    return Err(Error::MergeConflict { row, col });
                }
                grid[(row, col)] = bit;
            }
        }
        Ok(Self::from_grid(bits, grid))
    }

    /// Recompute the checksum from the cells.
    pub(crate) fn refresh_checksum(&mut self) {
        self.checksum = self.grid.checksum();
    }

    pub(crate) fn grid_mut(&mut self) -> &mut Grid<Bit> {
        &mut self.grid
    }
}

/// Equality is structural: bitwidth and cells. The checksum is derived
/// state and is not compared.
impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits && self.grid == other.grid
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.grid.fmt(f)
    }
}

impl FromStr for Matrix {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let (bits, grid) = Grid::parse_text(text)?;
        Ok(Self::from_grid(bits, grid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(text: &str) -> Matrix {
        text.parse().unwrap()
    }

    #[test]
    fn operand_rows_follow_bits_of_b() {
        let m = Matrix::from_operands(4, 0b1011, 0b0101).unwrap();
        assert_eq!(
            m.to_string(),
            "____1011\n___0000_\n__1011__\n_0000___"
        );
        assert_eq!(m.checksum(), &[true, false, true, false]);
        assert_eq!(m.active_rows(), 2);
        assert_eq!(m.to_int_rows(), vec![11, 0, 44, 0]);
        assert_eq!(m.value(), 55);
    }

    #[test]
    fn every_product_is_preserved_by_construction() {
        for bits in [4usize, 8] {
            let max = (1u32 << bits) - 1;
            for a in (0..=max).step_by(7) {
                for b in (0..=max).step_by(5) {
                    let m = Matrix::from_operands(bits, a, b).unwrap();
                    assert_eq!(m.value(), u64::from(a * b), "{a}*{b}");
                }
            }
        }
    }

    #[test]
    fn zero_operands_give_the_reserved_shape() {
        let zero_a = Matrix::from_operands(4, 0, 9).unwrap();
        let zero_b = Matrix::from_operands(4, 9, 0).unwrap();
        assert_eq!(zero_a, zero_b);
        assert_eq!(zero_a.checksum(), &[false; 4]);
        assert_eq!(zero_a, Matrix::seed(4).unwrap());
        assert_eq!(zero_a.to_string(), "____0000\n___0000_\n__0000__\n_0000___");
    }

    #[test]
    fn seed_is_fully_active() {
        let seed = Matrix::seed(8).unwrap();
        assert_eq!(seed.active_rows(), 8);
        assert_eq!(seed.empty_rows(), 0);
        assert_eq!(seed.value(), 0);
    }

    #[test]
    fn construction_validates_inputs() {
        assert_eq!(
            Matrix::from_operands(5, 1, 1).unwrap_err(),
            Error::UnsupportedBitwidth { bits: 5 }
        );
        assert_eq!(
            Matrix::from_operands(4, 16, 0).unwrap_err(),
            Error::OperandOutOfRange {
                operand: 16,
                bits: 4
            }
        );
        assert!(Matrix::from_operands(8, 255, 255).is_ok());
    }

    #[test]
    fn rmap_packs_rows_upwards() {
        let mut m = matrix("________\n___1011_\n________\n_1011___");
        let map = m.resolve_rmap(true);
        assert_eq!(map.render_rows(), vec!["00", "FF", "00", "FE"]);
        m.apply_map(&map).unwrap();
        assert_eq!(m.to_string(), "___1011_\n_1011___\n________\n________");
        assert_eq!(m.checksum(), &[true, true, false, false]);
    }

    #[test]
    fn rmap_counting_zeros_packs_empty_rows_the_same_way() {
        let mut m = matrix("________\n___1011_\n________\n_1011___");
        assert_eq!(m.checksum(), &[false, true, false, true]);
        let map = m.resolve_rmap(false);
        assert_eq!(map.render_rows(), vec!["00", "FF", "00", "FE"]);
        m.apply_map(&map).unwrap();
        assert_eq!(m.to_string(), "___1011_\n_1011___\n________\n________");
        assert_eq!(m.checksum(), &[true, true, false, false]);
        assert_eq!(m.active_rows(), 2);
    }

    #[test]
    fn rmap_can_treat_zero_rows_as_empty() {
        let m = matrix("____1011\n___0000_\n__1011__\n_0000___");
        assert_eq!(m.resolve_rmap(true).render_rows(), vec!["00"; 4]);
        assert_eq!(
            m.resolve_rmap(false).render_rows(),
            vec!["00", "00", "FF", "00"]
        );
    }

    #[test]
    fn apply_map_rejects_out_of_range_rows() {
        let mut m = Matrix::seed(4).unwrap();
        let before = m.clone();
        let map = Map::from_hex_rows(&["FF", "00", "00", "00"]).unwrap();
        assert_eq!(
            m.apply_map(&map).unwrap_err(),
            Error::MapOutOfRange { row: 0, offset: -1 }
        );
        let map = Map::from_hex_rows(&["00", "02", "00", "00"]).unwrap();
        assert_eq!(
            m.apply_map(&map).unwrap_err(),
            Error::MapOutOfRange { row: 1, offset: 2 }
        );
        assert_eq!(m, before);
    }

    #[test]
    fn apply_map_rejects_bit_maps_and_mismatched_widths() {
        let mut m = Matrix::seed(4).unwrap();
        let dadda = crate::map::build_dadda_map(4).unwrap();
        assert!(matches!(
            m.apply_map(&dadda),
            Err(Error::NotImplemented(_))
        ));
        let wide = Map::empty(8).unwrap();
        assert!(matches!(
            m.apply_map(&wide),
            Err(Error::BitwidthMismatch { .. })
        ));
    }

    #[test]
    fn positive_and_negative_offsets_both_move_up() {
        let rows = "________\n___1011_\n________\n________";
        for entry in ["01", "FF"] {
            let mut m = matrix(rows);
            let map = Map::from_hex_rows(&["00", entry, "00", "00"]).unwrap();
            m.apply_map(&map).unwrap();
            assert_eq!(m.to_string(), "___1011_\n________\n________\n________", "{entry}");
            assert_eq!(m.checksum(), &[true, false, false, false]);
        }

        let mut m = matrix("________\n________\n________\n_1011___");
        let map = Map::from_hex_rows(&["00", "00", "00", "03"]).unwrap();
        m.apply_map(&map).unwrap();
        assert_eq!(m.to_string(), "_1011___\n________\n________\n________");
    }

    #[test]
    fn colliding_rows_keep_the_later_row() {
        let mut m = matrix("____1111\n___1000_\n________\n________");
        let map = Map::from_hex_rows(&["00", "01", "00", "00"]).unwrap();
        m.apply_map(&map).unwrap();
        assert_eq!(m.to_string(), "___1000_\n________\n________\n________");
    }

    #[test]
    fn merge_detects_overlap() {
        let bits = Bitwidth::Four;
        let top = matrix("____1111\n________\n________\n________");
        let low = matrix("________\n___0110_\n________\n________");
        let merged = Matrix::merge(bits, &[top.clone(), low]).unwrap();
        assert_eq!(merged.value(), 15 + 12);

        let clash = matrix("_______1\n________\n________\n________");
        assert_eq!(
            Matrix::merge(bits, &[top, clash]).unwrap_err(),
            Error::MergeConflict { row: 0, col: 7 }
        );
    }
}
