//! Pattern compilation into annotated templates.
//!
//! A [`Template`] is the structural description of one reduction stage:
//! which cells enter which unit (`grid`) and which cells each unit will
//! produce (`result`). Templates are compiled from a [`Pattern`] against a
//! matrix shape, or parsed from hand-authored grids.
//!
//! ```text
//! matrix     pattern   grid       result
//! ____0000   a         ____AaAa   __AaAaAa
//! ___0000_   a         ___aAaA_   ________
//! __0000__   b         __BbBb__   BbBbBb__
//! _0000___   b         _bBbB___   ________
//! ```

mod bounds;
mod builders;
mod pattern;
mod units;

pub use bounds::BoundingBox;
pub use pattern::{resolve_pattern, Pattern, Run};
pub use units::TemplateUnit;

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::cell::{Active, Bit, Bitwidth, Grid, Slot};
use crate::error::{Error, Result};
use crate::matrix::{Matrix, Slice};

/// Reduction performed by a unit, chosen by how many rows it spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunKind {
    /// One row, passed through unchanged.
    Noop,
    /// Two rows, added with a carry-out.
    Add,
    /// Three rows, compressed to a sum row and a carry row.
    Csa,
}

impl RunKind {
    /// Unit for a run of `len` rows; longer runs would need decoders.
    #[must_use]
    pub const fn from_len(len: usize) -> Option<Self> {
        match len {
            1 => Some(Self::Noop),
            2 => Some(Self::Add),
            3 => Some(Self::Csa),
            _ => None,
        }
    }

    /// Rows consumed by the unit.
    #[must_use]
    pub const fn span(self) -> usize {
        match self {
            Self::Noop => 1,
            Self::Add => 2,
            Self::Csa => 3,
        }
    }
}

/// An annotated stage description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    bits: Bitwidth,
    grid: Grid<Slot>,
    result: Grid<Slot>,
    checksum: Vec<bool>,
    bounds: BoundingBox,
}

impl Template {
    /// Compile `pattern` against the shape of `matrix`.
    ///
    /// Every tagged run becomes one unit built from the matching rows of
    /// `matrix`; untagged rows contribute nothing. The compiled template is
    /// isolated into units before it is returned, so structural problems
    /// surface here rather than during execution.
    ///
    /// # Errors
    ///
    /// - [`Error::BitwidthMismatch`] if pattern and matrix widths differ
    /// - [`Error::UnsupportedRunLength`] for a run longer than three rows
    /// - [`Error::UntaggedActiveRow`] if an untagged row has cells
    /// - [`Error::StructuralAmbiguity`] if a tag is reused non-adjacently
    ///
    /// # Example
    ///
    /// ```
    /// use multiplied::{Matrix, Pattern, Template};
    ///
    /// let pattern: Pattern = "aabb".parse().unwrap();
    /// let template = Template::from_pattern(&pattern, &Matrix::seed(4).unwrap()).unwrap();
    /// assert_eq!(template.grid().to_string(), "____AaAa\n___aAaA_\n__BbBb__\n_bBbB___");
    /// assert_eq!(template.result().to_string(), "__AaAaAa\n________\nBbBbBb__\n________");
    /// ```
    pub fn from_pattern(pattern: &Pattern, matrix: &Matrix) -> Result<Self> {
        let bits = matrix.bits();
        bits.expect_eq("pattern", pattern.bits())?;

        let mut grid = Grid::<Slot>::for_bits(bits);
        let mut result = Grid::<Slot>::for_bits(bits);
        for run in pattern.runs() {
            let Some(tag) = run.tag else {
                if let Some(row) = run.rows().find(|&row| matrix.is_row_active(row)) {
                    return Err(Error::UntaggedActiveRow { row });
                }
                continue;
            };
            let kind = RunKind::from_len(run.len).ok_or(Error::UnsupportedRunLength {
                tag,
                row: run.start,
                run: run.len,
            })?;
            let (annotated, predicted) = builders::build(kind, tag, &matrix.slice(run.rows()))?;
            grid.paste_rows(run.start, &annotated);
            result.paste_rows(run.start, &predicted);
        }

        let template = Self::assemble(bits, grid, result);
        let units = template.collect_template_units()?;
        debug!(bits = %bits, units = units.len(), "compiled pattern");
        Ok(template)
    }

    /// Template from a hand-authored annotated grid.
    ///
    /// The result is predicted unit by unit with the same builders pattern
    /// compilation uses.
    ///
    /// # Errors
    ///
    /// - [`Error::StructuralAmbiguity`] if a tag is not one contiguous unit
    /// - [`Error::UnsupportedUnitSpan`] for a unit taller than three rows
    /// - [`Error::MergeConflict`] if two units predict the same cell
    pub fn from_grid(bits: Bitwidth, grid: Grid<Slot>) -> Result<Self> {
        let mut template = Self::assemble(bits, grid, Grid::for_bits(bits));
        let mut result = Grid::<Slot>::for_bits(bits);
        for unit in template.collect_template_units()? {
            let kind = unit.kind()?;
            let slice = Slice::copy_of(unit.grid(), unit.rows());
            let (_, predicted) = builders::build(kind, unit.tag(), &slice)?;
            for (offset, cells) in predicted.iter_rows().enumerate() {
                let row = unit.top() + offset;
                for (col, &slot) in cells.iter().enumerate() {
                    if !slot.is_active() {
                        continue;
                    }
                    if result[(row, col)].is_active() {
                        return Err(Error::MergeConflict { row, col });
                    }
                    result[(row, col)] = slot;
                }
            }
        }
        template.result = result;
        Ok(template)
    }

    /// Template from textual rows of `_` and letters.
    ///
    /// # Errors
    ///
    /// Parse errors as [`Grid::parse_rows`], then as [`Template::from_grid`].
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let (bits, grid) = Grid::parse_rows(rows)?;
        Self::from_grid(bits, grid)
    }

    fn assemble(bits: Bitwidth, grid: Grid<Slot>, result: Grid<Slot>) -> Self {
        let checksum = grid.checksum();
        let bounds = BoundingBox::find(&grid);
        Self {
            bits,
            grid,
            result,
            checksum,
            bounds,
        }
    }

    /// Bitwidth of the template.
    #[inline]
    #[must_use]
    pub fn bits(&self) -> Bitwidth {
        self.bits
    }

    /// Annotated input cells.
    #[inline]
    #[must_use]
    pub fn grid(&self) -> &Grid<Slot> {
        &self.grid
    }

    /// Predicted output cells, unpacked: each unit's outputs start at the
    /// unit's top row.
    #[inline]
    #[must_use]
    pub fn result(&self) -> &Grid<Slot> {
        &self.result
    }

    /// Per-row activity of the annotated grid.
    #[inline]
    #[must_use]
    pub fn checksum(&self) -> &[bool] {
        &self.checksum
    }

    /// Boundary points of every tag in the annotated grid.
    #[inline]
    #[must_use]
    pub fn find_bounding_box(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Isolate every unit of the template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructuralAmbiguity`] when a tag appears as two
    /// spans within a row, skips rows, or shares a row with another unit.
    pub fn collect_template_units(&self) -> Result<Vec<TemplateUnit>> {
        units::collect_units(&self.grid, &self.bounds)
    }

    /// The predicted result as a matrix shape: every predicted cell `Zero`.
    #[must_use]
    pub fn result_matrix(&self) -> Matrix {
        let grid = self.result.map(|slot| {
            if slot.is_active() {
                Bit::Zero
            } else {
                Bit::Empty
            }
        });
        Matrix::from_grid(self.bits, grid)
    }
}

/// The annotated grid, a newline, then the predicted result.
impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.grid, self.result)
    }
}

/// Parses a hand-authored annotated grid; see [`Template::from_grid`].
impl FromStr for Template {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let (bits, grid) = Grid::parse_text(text)?;
        Self::from_grid(bits, grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Ambiguity;

    fn seed(bits: usize) -> Matrix {
        Matrix::seed(bits).unwrap()
    }

    fn compile(pattern: &str, matrix: &Matrix) -> Result<Template> {
        Template::from_pattern(&pattern.parse().unwrap(), matrix)
    }

    #[test]
    fn two_adders_on_the_seed() {
        let template = compile("aabb", &seed(4)).unwrap();
        assert_eq!(
            template.grid().to_string(),
            "____AaAa\n___aAaA_\n__BbBb__\n_bBbB___"
        );
        assert_eq!(
            template.result().to_string(),
            "__AaAaAa\n________\nBbBbBb__\n________"
        );
        assert_eq!(template.checksum(), &[true; 4]);
        assert_eq!(template.collect_template_units().unwrap().len(), 2);
    }

    #[test]
    fn csa_and_noop_on_the_seed() {
        let template = compile("aaab", &seed(4)).unwrap();
        assert_eq!(
            template.to_string(),
            "____AaAa\n___aAaA_\n__AaAa__\n_BbBb___\n__AaAaAa\n__aAaA__\n________\n_BbBb___"
        );
        let predicted = template.result_matrix();
        assert_eq!(predicted.checksum(), &[true, true, false, true]);
    }

    #[test]
    fn run_of_four_is_rejected() {
        let err = compile("aaaa", &seed(4)).unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedRunLength {
                tag: crate::cell::Tag::FIRST,
                row: 0,
                run: 4
            }
        );
    }

    #[test]
    fn reused_tag_is_rejected_at_compile_time() {
        let err = compile("abab", &seed(4)).unwrap_err();
        assert!(matches!(
            err,
            Error::StructuralAmbiguity(Ambiguity::NonAdjacentRows { .. })
        ));
    }

    #[test]
    fn runs_may_cover_empty_rows_but_active_rows_need_a_tag() {
        let packed: Matrix = "__000000\n_00000__\n________\n________".parse().unwrap();
        assert!(compile("aaa_", &packed).is_ok());
        assert!(compile("aaab", &packed).is_ok());
        assert_eq!(
            compile("a___", &packed).unwrap_err(),
            Error::UntaggedActiveRow { row: 1 }
        );
        assert!(compile("aa__", &packed).is_ok());
    }

    #[test]
    fn adder_over_an_empty_lower_row_predicts_no_carry() {
        let single: Matrix = "___0000_\n________\n________\n________".parse().unwrap();
        let template = compile("aa__", &single).unwrap();
        assert_eq!(
            template.grid().to_string(),
            "___aAaA_\n________\n________\n________"
        );
        assert_eq!(
            template.result().to_string(),
            "___aAaA_\n________\n________\n________"
        );
        assert_eq!(template.collect_template_units().unwrap().len(), 1);
    }

    #[test]
    fn pattern_width_must_match() {
        assert!(matches!(
            compile("aaabbbcc", &seed(4)),
            Err(Error::BitwidthMismatch { .. })
        ));
    }

    #[test]
    fn hand_authored_grid_gets_a_result() {
        let template: Template = "
            ____AaAa
            ___aAaA_
            __BbBb__
            _bBbB___
        "
        .parse()
        .unwrap();
        let compiled = compile("aabb", &seed(4)).unwrap();
        assert_eq!(template, compiled);
    }

    #[test]
    fn hand_authored_grid_with_split_tag_fails() {
        let err = Template::from_rows(&["____AaAa", "___bBbB_", "__AaAa__", "________"]).unwrap_err();
        assert!(matches!(
            err,
            Error::StructuralAmbiguity(Ambiguity::NonAdjacentRows { .. })
        ));
    }

    #[test]
    fn bounding_box_round_trips_the_layout() {
        let template = compile("aaabbbcc", &seed(8)).unwrap();
        let units = template.collect_template_units().unwrap();
        let mut rebuilt = Grid::<Slot>::for_bits(template.bits());
        for unit in &units {
            for (row, col, slot) in unit.grid().cells() {
                if slot.is_active() {
                    rebuilt[(row, col)] = slot;
                }
            }
        }
        assert_eq!(&rebuilt, template.grid());
    }
}
