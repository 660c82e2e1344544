//! Reduction-unit tags.

use std::fmt;

/// Identity of one reduction unit within a stage: one of the 26 letters.
///
/// Identity is case-insensitive; the case a tag is rendered in belongs to
/// the [`Slot`](super::Slot) holding it, not to the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(u8);

impl Tag {
    /// Number of distinct tags.
    pub const COUNT: u8 = 26;

    /// The first tag, `A`.
    pub const FIRST: Tag = Tag(0);

    /// Tag for an ASCII letter of either case.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        c.is_ascii_alphabetic()
            .then(|| Tag(c.to_ascii_uppercase() as u8 - b'A'))
    }

    /// Tag at `index`, wrapping after `Z`.
    #[inline]
    #[must_use]
    pub const fn nth(index: usize) -> Self {
        Tag((index % Self::COUNT as usize) as u8)
    }

    /// Zero-based position in the alphabet.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The tag's letter in the requested case.
    #[inline]
    #[must_use]
    pub const fn letter(self, upper: bool) -> char {
        let base = if upper { b'A' } else { b'a' };
        (base + self.0) as char
    }

    /// Endless `A, B, ..., Z, A, ...` sequence used to label fresh units.
    pub fn sequence() -> impl Iterator<Item = Tag> {
        (0..).map(Tag::nth)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter(true))
    }
}
