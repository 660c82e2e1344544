//! Per-row unit tags and automatic pattern derivation.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::cell::{Bitwidth, Tag, EMPTY_GLYPH};
use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// One tag per matrix row; `None` leaves the row out of the stage.
///
/// Adjacent rows with the same tag form a run, and each run becomes one
/// reduction unit: one row passes through, two rows are added, three rows
/// enter a carry-save adder.
///
/// # Example
///
/// ```
/// use multiplied::Pattern;
///
/// let pattern: Pattern = "aaab".parse().unwrap();
/// let runs: Vec<usize> = pattern.runs().iter().map(|run| run.len).collect();
/// assert_eq!(runs, vec![3, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    bits: Bitwidth,
    tags: Vec<Option<Tag>>,
}

/// A maximal run of equal tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    /// The shared tag, `None` for untagged rows.
    pub tag: Option<Tag>,
    /// First row of the run.
    pub start: usize,
    /// Number of rows in the run.
    pub len: usize,
}

impl Run {
    /// Rows covered by the run.
    #[must_use]
    pub fn rows(&self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

impl Pattern {
    /// Pattern from one tag per row.
    ///
    /// Only the row count is checked here; run lengths are checked when the
    /// pattern is compiled into a [`Template`](super::Template).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedBitwidth`] if the tag count is not a
    /// supported bitwidth.
    pub fn new(tags: Vec<Option<Tag>>) -> Result<Self> {
        let bits = Bitwidth::new(tags.len())?;
        Ok(Self { bits, tags })
    }

    /// Bitwidth of the pattern.
    #[inline]
    #[must_use]
    pub fn bits(&self) -> Bitwidth {
        self.bits
    }

    /// Tags, top row first.
    #[inline]
    #[must_use]
    pub fn tags(&self) -> &[Option<Tag>] {
        &self.tags
    }

    /// Maximal runs of equal tags, top to bottom.
    #[must_use]
    pub fn runs(&self) -> Vec<Run> {
        let mut runs: Vec<Run> = Vec::new();
        for (row, &tag) in self.tags.iter().enumerate() {
            match runs.last_mut() {
                Some(run) if run.tag == tag => run.len += 1,
                _ => runs.push(Run {
                    tag,
                    start: row,
                    len: 1,
                }),
            }
        }
        runs
    }
}

/// Parses one glyph per row, `_` for an untagged row. Whitespace between
/// glyphs is ignored, so `"aaab"` and `"a a a b"` are the same pattern.
impl FromStr for Pattern {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let tags = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .enumerate()
            .map(|(row, glyph)| match glyph {
                EMPTY_GLYPH => Ok(None),
                _ => Tag::from_char(glyph)
                    .map(Some)
                    .ok_or(Error::InvalidGlyph { glyph, row, col: 0 }),
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(tags)
    }
}

/// One glyph per line, tags in upper case.
impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, tag) in self.tags.iter().enumerate() {
            if row > 0 {
                f.write_str("\n")?;
            }
            match tag {
                Some(tag) => write!(f, "{tag}")?,
                None => write!(f, "{EMPTY_GLYPH}")?,
            }
        }
        Ok(())
    }
}

/// Greedy Wallace-style grouping of a matrix's active rows.
///
/// With `scope` active rows, the first `scope` rows are tagged in runs of
/// three while at least three remain, then one run of two or one; every
/// later row is left untagged. A matrix with no active rows gives an
/// all-untagged pattern. Active rows are expected to be packed at the top,
/// which every predicted stage matrix is.
#[must_use]
pub fn resolve_pattern(matrix: &Matrix) -> Pattern {
    let n = matrix.bits().bits();
    let mut scope = matrix.active_rows();
    let mut tags = Vec::with_capacity(n);
    let mut fresh = Tag::sequence();
    while scope > 0 {
        let run = scope.min(3);
        let tag = fresh.next();
        tags.extend(std::iter::repeat(tag).take(run));
        scope -= run;
    }
    tags.resize(n, None);
    Pattern {
        bits: matrix.bits(),
        tags,
    }
}
