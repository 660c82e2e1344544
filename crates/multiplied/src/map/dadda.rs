//! Initial packing for Dadda trees.

use super::Map;
use crate::cell::Bitwidth;
use crate::error::Result;

// Left half of each row; the right half never moves. Row k shifts the
// columns it shares with no row above up into the free triangle.
const DADDA_4: [[&str; 4]; 4] = [
    ["00", "00", "00", "00"],
    ["00", "00", "00", "FF"],
    ["00", "00", "FE", "FF"],
    ["00", "FD", "FE", "FF"],
];

const DADDA_8: [[&str; 8]; 8] = [
    ["00", "00", "00", "00", "00", "00", "00", "00"],
    ["00", "00", "00", "00", "00", "00", "00", "FF"],
    ["00", "00", "00", "00", "00", "00", "FE", "FF"],
    ["00", "00", "00", "00", "00", "FD", "FE", "FF"],
    ["00", "00", "00", "00", "FC", "FD", "FE", "FF"],
    ["00", "00", "00", "FB", "FC", "FD", "FE", "FF"],
    ["00", "00", "FA", "FB", "FC", "FD", "FE", "FF"],
    ["00", "F9", "FA", "FB", "FC", "FD", "FE", "FF"],
];

/// Bit map taking the AND-expansion to the starting shape of a Dadda tree.
///
/// The table is fixed per width; only the supported widths have one.
///
/// # Errors
///
/// Returns [`Error::UnsupportedBitwidth`](crate::Error::UnsupportedBitwidth)
/// for `bits` outside `{4, 8}`.
pub fn build_dadda_map(bits: usize) -> Result<Map> {
    let rows: Vec<String> = match Bitwidth::new(bits)? {
        Bitwidth::Four => DADDA_4.iter().map(|left| expand(left)).collect(),
        Bitwidth::Eight => DADDA_8.iter().map(|left| expand(left)).collect(),
    };
    Map::from_hex_rows(&rows)
}

fn expand(left: &[&str]) -> String {
    let mut entries = left.to_vec();
    entries.extend(std::iter::repeat("00").take(left.len()));
    entries.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dadda_maps_are_bit_maps() {
        let map = build_dadda_map(4).unwrap();
        assert!(map.row_offsets().is_none());
        assert_eq!(
            map.render_rows(),
            vec![
                "00 00 00 00 00 00 00 00",
                "00 00 00 FF 00 00 00 00",
                "00 00 FE FF 00 00 00 00",
                "00 FD FE FF 00 00 00 00",
            ]
        );
        assert_eq!(map.checksum(), vec![false, true, true, true]);
        assert_eq!(build_dadda_map(8).unwrap().bits(), Bitwidth::Eight);
        assert!(build_dadda_map(16).is_err());
    }
}
