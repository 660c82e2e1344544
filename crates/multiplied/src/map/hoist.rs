//! Per-column compaction.

use tracing::debug;

use super::Map;
use crate::cell::{Active, Bit, Grid};
use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Slide every column's cells up to the top of the active band.
///
/// The band runs from row 0 (or, with `relative`, from the first row the
/// checksum marks active) down to the last active row. Within it, the
/// non-empty cells of each column keep their order and move up to the
/// band's first free rows. Rows outside the band are left alone.
///
/// `source` is compacted in place; the returned bit map records how far
/// every cell moved. Hoisting [`Matrix::seed`] reproduces
/// [`build_dadda_map`](super::build_dadda_map).
///
/// # Errors
///
/// Returns [`Error::RowCount`] if `checksum` does not have one entry per
/// row of `source`.
///
/// # Example
///
/// ```
/// use multiplied::{build_dadda_map, hoist, Matrix};
///
/// let mut seed = Matrix::seed(4).unwrap();
/// let checksum = seed.checksum().to_vec();
/// let map = hoist(&mut seed, &checksum, false).unwrap();
/// assert_eq!(map, build_dadda_map(4).unwrap());
/// ```
pub fn hoist(source: &mut Matrix, checksum: &[bool], relative: bool) -> Result<Map> {
    let bits = source.bits();
    if checksum.len() != bits.bits() {
        return Err(Error::RowCount {
            expected: bits.bits(),
            found: checksum.len(),
        });
    }

    let mut offsets = Grid::<i8>::for_bits(bits);
    let Some(last) = checksum.iter().rposition(|&active| active) else {
        return Map::from_bit_offsets(offsets);
    };
    let first = if relative {
        checksum.iter().position(|&active| active).unwrap_or(0)
    } else {
        0
    };

    let grid = source.grid_mut();
    for col in 0..bits.width() {
        let cells: Vec<(usize, Bit)> = (first..=last)
            .map(|row| (row, grid[(row, col)]))
            .filter(|(_, bit)| bit.is_active())
            .collect();
        for row in first..=last {
            grid[(row, col)] = Bit::Empty;
        }
        for (slot, (row, bit)) in cells.into_iter().enumerate() {
            let dest = first + slot;
            grid[(dest, col)] = bit;
            offsets[(row, col)] = dest as i8 - row as i8;
        }
    }
    source.refresh_checksum();
    debug!(bits = %bits, first, last, "hoisted columns");
    Map::from_bit_offsets(offsets)
}
