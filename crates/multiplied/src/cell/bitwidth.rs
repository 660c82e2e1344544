//! The closed set of supported multiplier widths.

use std::fmt;

use crate::error::{Error, Result};

/// Bitwidths a partial-product matrix may have.
pub const SUPPORTED_BITWIDTHS: [usize; 2] = [4, 8];

/// A validated multiplier bitwidth.
///
/// Every matrix, pattern, template, and map carries one of these, so an
/// unsupported width is rejected at construction rather than at use.
///
/// # Example
///
/// ```
/// use multiplied::Bitwidth;
///
/// let bits = Bitwidth::new(8).unwrap();
/// assert_eq!(bits.bits(), 8);
/// assert_eq!(bits.width(), 16);
/// assert!(Bitwidth::new(16).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bitwidth {
    /// 4-bit operands, 4 rows by 8 columns.
    Four,
    /// 8-bit operands, 8 rows by 16 columns.
    Eight,
}

impl Bitwidth {
    /// Validate a raw bitwidth.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedBitwidth`] for anything outside
    /// [`SUPPORTED_BITWIDTHS`].
    pub fn new(bits: usize) -> Result<Self> {
        match bits {
            4 => Ok(Self::Four),
            8 => Ok(Self::Eight),
            _ => Err(Error::UnsupportedBitwidth { bits }),
        }
    }

    /// Operand width in bits, which is also the matrix row count.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> usize {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
        }
    }

    /// Matrix row width, `2 * bits`.
    #[inline]
    #[must_use]
    pub const fn width(self) -> usize {
        self.bits() << 1
    }

    /// Largest operand representable at this width.
    #[inline]
    #[must_use]
    pub const fn max_operand(self) -> u32 {
        (1 << self.bits()) - 1
    }

    /// Positional weight of a column: the leftmost column is the most
    /// significant bit of the `2 * bits` wide product.
    #[inline]
    #[must_use]
    pub const fn weight(self, col: usize) -> u64 {
        1 << (self.width() - 1 - col)
    }

    /// Require `other` to equal `self`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BitwidthMismatch`] naming `context` otherwise.
    pub fn expect_eq(self, context: &'static str, other: Bitwidth) -> Result<()> {
        if self == other {
            Ok(())
        } else {
            Err(Error::BitwidthMismatch {
                context,
                expected: self.bits(),
                found: other.bits(),
            })
        }
    }
}

impl TryFrom<usize> for Bitwidth {
    type Error = Error;

    fn try_from(bits: usize) -> Result<Self> {
        Self::new(bits)
    }
}

impl From<Bitwidth> for usize {
    fn from(bits: Bitwidth) -> usize {
        bits.bits()
    }
}

impl fmt::Display for Bitwidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_four_and_eight_are_supported() {
        for bits in 0..=32 {
            let ok = Bitwidth::new(bits).is_ok();
            assert_eq!(ok, SUPPORTED_BITWIDTHS.contains(&bits), "bits={bits}");
        }
    }

    #[test]
    fn weights_follow_column_order() {
        let bits = Bitwidth::Four;
        assert_eq!(bits.weight(0), 128);
        assert_eq!(bits.weight(7), 1);
        assert_eq!(Bitwidth::Eight.weight(15), 1);
        assert_eq!(Bitwidth::Eight.max_operand(), 255);
    }

    #[test]
    fn mismatch_reports_both_widths() {
        let err = Bitwidth::Four
            .expect_eq("template", Bitwidth::Eight)
            .unwrap_err();
        assert_eq!(
            err,
            Error::BitwidthMismatch {
                context: "template",
                expected: 4,
                found: 8
            }
        );
    }
}
