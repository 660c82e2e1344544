//! Row relocation maps.
//!
//! A map assigns every row (or, for bit maps, every cell) a signed offset.
//! Offsets travel as signed bytes rendered as two upper-case hex digits.
//! An offset is a distance towards row 0: row `i` with offset `s` lands in
//! row `i - |s|`. `01` and `FF` both move a row up one position; maps
//! derived here (`resolve_rmap`, `hoist`, the Dadda table) use the negative
//! spelling.
//!
//! ```text
//! rows        row map     after apply_map
//! ________    00          ___1011_
//! ___1011_    FF          _1011___
//! ________    00          ________
//! _1011___    FE          ________
//! ```

mod dadda;
mod hoist;

pub use dadda::build_dadda_map;
pub use hoist::hoist;

use std::fmt;

use crate::cell::{Bitwidth, Grid};
use crate::error::{Error, Result};

/// Shape of a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapKind {
    /// One offset per row.
    Row(Vec<i8>),
    /// One offset per cell. Carried and rendered, but not applicable.
    Bit(Grid<i8>),
}

/// A relocation map for one bitwidth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    bits: Bitwidth,
    kind: MapKind,
}

impl Map {
    /// Row map from signed offsets, one per row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedBitwidth`] if the offset count is not a
    /// supported bitwidth.
    pub fn from_row_offsets(offsets: Vec<i8>) -> Result<Self> {
        let bits = Bitwidth::new(offsets.len())?;
        Ok(Self::from_row_offsets_unchecked(bits, offsets))
    }

    pub(crate) fn from_row_offsets_unchecked(bits: Bitwidth, offsets: Vec<i8>) -> Self {
        Self {
            bits,
            kind: MapKind::Row(offsets),
        }
    }

    /// Bit map from a `bits x 2*bits` grid of offsets.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedBitwidth`] for an unsupported row count
    /// - [`Error::RowWidth`] if the grid is not `2 * bits` wide
    pub fn from_bit_offsets(offsets: Grid<i8>) -> Result<Self> {
        let bits = Bitwidth::new(offsets.rows())?;
        if offsets.cols() != bits.width() {
            return Err(Error::RowWidth {
                row: 0,
                expected: bits.width(),
                found: offsets.cols(),
            });
        }
        Ok(Self {
            bits,
            kind: MapKind::Bit(offsets),
        })
    }

    /// Parse hex rows: one entry per row gives a row map, `2 * bits`
    /// space separated entries per row give a bit map.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedBitwidth`] for an unsupported row count
    /// - [`Error::InvalidMapEntry`] for an entry that is not two hex digits
    /// - [`Error::RowWidth`] for a bit map row of the wrong width
    ///
    /// # Example
    ///
    /// ```
    /// use multiplied::Map;
    ///
    /// let map = Map::from_hex_rows(&["00", "FF", "00", "FE"]).unwrap();
    /// assert_eq!(map.row_offsets(), Some(&[0, -1, 0, -2][..]));
    /// ```
    pub fn from_hex_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let bits = Bitwidth::new(rows.len())?;
        let parsed = rows
            .iter()
            .enumerate()
            .map(|(row, text)| {
                text.as_ref()
                    .split_whitespace()
                    .map(|entry| parse_entry(row, entry))
                    .collect::<Result<Vec<i8>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        if parsed.iter().all(|entries| entries.len() == 1) {
            let offsets = parsed.into_iter().flatten().collect();
            return Ok(Self::from_row_offsets_unchecked(bits, offsets));
        }

        let mut grid = Grid::<i8>::for_bits(bits);
        for (row, entries) in parsed.iter().enumerate() {
            if entries.len() != bits.width() {
                return Err(Error::RowWidth {
                    row,
                    expected: bits.width(),
                    found: entries.len(),
                });
            }
            grid.row_mut(row).copy_from_slice(entries);
        }
        Ok(Self {
            bits,
            kind: MapKind::Bit(grid),
        })
    }

    /// Row map that moves nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedBitwidth`] for `bits` outside `{4, 8}`.
    pub fn empty(bits: usize) -> Result<Self> {
        let bits = Bitwidth::new(bits)?;
        Ok(Self::from_row_offsets_unchecked(bits, vec![0; bits.bits()]))
    }

    /// Bitwidth of the map.
    #[inline]
    #[must_use]
    pub fn bits(&self) -> Bitwidth {
        self.bits
    }

    /// Row or bit offsets.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &MapKind {
        &self.kind
    }

    /// Offsets of a row map, `None` for a bit map.
    #[must_use]
    pub fn row_offsets(&self) -> Option<&[i8]> {
        match &self.kind {
            MapKind::Row(offsets) => Some(offsets),
            MapKind::Bit(_) => None,
        }
    }

    /// Which rows move at all.
    #[must_use]
    pub fn checksum(&self) -> Vec<bool> {
        match &self.kind {
            MapKind::Row(offsets) => offsets.iter().map(|&offset| offset != 0).collect(),
            MapKind::Bit(grid) => grid
                .iter_rows()
                .map(|row| row.iter().any(|&offset| offset != 0))
                .collect(),
        }
    }

    /// Expand to one entry per cell, each cell taking its row's offset.
    #[must_use]
    pub fn to_bit_map(&self) -> Map {
        match &self.kind {
            MapKind::Bit(_) => self.clone(),
            MapKind::Row(offsets) => {
                let mut grid = Grid::<i8>::for_bits(self.bits);
                for (row, &offset) in offsets.iter().enumerate() {
                    grid.row_mut(row).fill(offset);
                }
                Map {
                    bits: self.bits,
                    kind: MapKind::Bit(grid),
                }
            }
        }
    }

    /// Each row as space separated hex entries.
    #[must_use]
    pub fn render_rows(&self) -> Vec<String> {
        match &self.kind {
            MapKind::Row(offsets) => offsets.iter().map(|&offset| hex(offset)).collect(),
            MapKind::Bit(grid) => grid
                .iter_rows()
                .map(|row| row.iter().map(|&offset| hex(offset)).collect::<Vec<_>>().join(" "))
                .collect(),
        }
    }
}

fn hex(offset: i8) -> String {
    format!("{:02X}", offset as u8)
}

fn parse_entry(row: usize, entry: &str) -> Result<i8> {
    let invalid = || Error::InvalidMapEntry {
        row,
        entry: entry.to_owned(),
    };
    if entry.len() != 2 {
        return Err(invalid());
    }
    u8::from_str_radix(entry, 16)
        .map(|byte| byte as i8)
        .map_err(|_| invalid())
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_rows().join("\n"))
    }
}
