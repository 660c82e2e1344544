//! Cell types and the glyph contract.
//!
//! Every grid renders one character per cell. The glyph set is fixed:
//!
//! | Cell | Glyph |
//! |------|-------|
//! | [`Bit::Empty`], [`Slot::Empty`] | `_` |
//! | [`Bit::Zero`] | `0` |
//! | [`Bit::One`] | `1` |
//! | [`Slot::Tagged`] | `A`-`Z` (upper) or `a`-`z` (lower) |

use super::Tag;

/// Glyph used for an empty cell in every grid.
pub const EMPTY_GLYPH: char = '_';

/// A cell with a single-character rendering.
pub trait Glyph: Copy + Default {
    /// The cell's character.
    fn glyph(self) -> char;

    /// Parse a character, returning `None` if it is not a glyph of this
    /// cell type.
    fn from_glyph(c: char) -> Option<Self>;
}

/// A cell that either occupies its position or leaves it empty.
pub trait Active {
    /// `true` for any non-empty cell.
    fn is_active(&self) -> bool;
}

/// A cell of a partial-product matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Bit {
    /// No bit at this position.
    #[default]
    Empty,
    /// A bit position holding 0.
    Zero,
    /// A bit position holding 1.
    One,
}

impl Bit {
    /// `Zero` or `One` from a boolean.
    #[inline]
    #[must_use]
    pub const fn from_bool(set: bool) -> Self {
        if set {
            Self::One
        } else {
            Self::Zero
        }
    }

    /// Numeric value of the cell; `Empty` reads as 0.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        match self {
            Self::One => 1,
            Self::Empty | Self::Zero => 0,
        }
    }

    /// `true` only for [`Bit::One`].
    #[inline]
    #[must_use]
    pub const fn is_set(self) -> bool {
        matches!(self, Self::One)
    }
}

impl Glyph for Bit {
    fn glyph(self) -> char {
        match self {
            Self::Empty => EMPTY_GLYPH,
            Self::Zero => '0',
            Self::One => '1',
        }
    }

    fn from_glyph(c: char) -> Option<Self> {
        match c {
            EMPTY_GLYPH => Some(Self::Empty),
            '0' => Some(Self::Zero),
            '1' => Some(Self::One),
            _ => None,
        }
    }
}

impl Active for Bit {
    #[inline]
    fn is_active(&self) -> bool {
        !matches!(self, Self::Empty)
    }
}

/// A cell of an annotated template grid.
///
/// Case alternates along a unit so that neighbouring cells remain
/// distinguishable after they are moved by a reduction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Position not used by any unit.
    #[default]
    Empty,
    /// Position belonging to the unit `tag`.
    Tagged {
        /// Owning unit.
        tag: Tag,
        /// Rendering case.
        upper: bool,
    },
}

impl Slot {
    /// Tagged slot.
    #[inline]
    #[must_use]
    pub const fn tagged(tag: Tag, upper: bool) -> Self {
        Self::Tagged { tag, upper }
    }

    /// Owning unit, if any.
    #[inline]
    #[must_use]
    pub const fn tag(self) -> Option<Tag> {
        match self {
            Self::Empty => None,
            Self::Tagged { tag, .. } => Some(tag),
        }
    }
}

impl Glyph for Slot {
    fn glyph(self) -> char {
        match self {
            Self::Empty => EMPTY_GLYPH,
            Self::Tagged { tag, upper } => tag.letter(upper),
        }
    }

    fn from_glyph(c: char) -> Option<Self> {
        if c == EMPTY_GLYPH {
            return Some(Self::Empty);
        }
        Tag::from_char(c).map(|tag| Self::tagged(tag, c.is_ascii_uppercase()))
    }
}

impl Active for Slot {
    #[inline]
    fn is_active(&self) -> bool {
        !matches!(self, Self::Empty)
    }
}
