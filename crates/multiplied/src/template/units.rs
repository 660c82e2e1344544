//! Isolation of a template into its reduction units.

use std::ops::Range;

use super::{BoundingBox, RunKind};
use crate::cell::{Grid, Slot, Tag};
use crate::error::{Ambiguity, Error, Result};

/// One reduction unit cut out of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateUnit {
    tag: Tag,
    rows: Range<usize>,
    spans: Vec<(usize, usize)>,
    grid: Grid<Slot>,
}

impl TemplateUnit {
    /// The unit's tag.
    #[inline]
    #[must_use]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Template rows the unit occupies.
    #[must_use]
    pub fn rows(&self) -> Range<usize> {
        self.rows.clone()
    }

    /// First row of the unit.
    #[inline]
    #[must_use]
    pub fn top(&self) -> usize {
        self.rows.start
    }

    /// Inclusive `(first, last)` column of the unit in each of its rows.
    #[must_use]
    pub fn spans(&self) -> &[(usize, usize)] {
        &self.spans
    }

    /// Full-size grid holding only this unit's cells.
    #[must_use]
    pub fn grid(&self) -> &Grid<Slot> {
        &self.grid
    }

    /// Extend the unit down to `end`, the end of the run it was compiled
    /// from. Trailing rows without cells contribute zero inputs.
    pub(crate) fn extend_to(&mut self, end: usize) {
        self.rows.end = self.rows.end.max(end);
    }

    /// Which reduction the unit performs, from its height.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedUnitSpan`] unless the unit spans 1, 2,
    /// or 3 rows.
    pub fn kind(&self) -> Result<RunKind> {
        RunKind::from_len(self.rows.len()).ok_or(Error::UnsupportedUnitSpan {
            tag: self.tag,
            span: self.rows.len(),
        })
    }
}

/// Cut `grid` into one [`TemplateUnit`] per tag.
///
/// A tag must occupy a single span in each of its rows and consecutive
/// rows only, and the units together must account for every active row
/// exactly once.
pub(crate) fn collect_units(grid: &Grid<Slot>, bounds: &BoundingBox) -> Result<Vec<TemplateUnit>> {
    let mut units = Vec::new();
    for tag in bounds.tags() {
        let points = bounds.get(Some(tag)).unwrap_or_default();
        let mut spans = Vec::new();
        let mut top = None;
        let mut last_row: Option<usize> = None;
        for row_points in points.chunk_by(|a, b| a.1 == b.1) {
            let row = row_points[0].1;
            let [(first, _), (last, _)] = row_points else {
                return Err(Ambiguity::DuplicateSpan { tag, row }.into());
            };
            if let Some(previous) = last_row {
                if row != previous + 1 {
                    return Err(Ambiguity::NonAdjacentRows {
                        tag,
                        expected: previous + 1,
                        found: row,
                    }
                    .into());
                }
            }
            top.get_or_insert(row);
            last_row = Some(row);
            spans.push((*first, *last));
        }
        let (Some(top), Some(bottom)) = (top, last_row) else {
            continue;
        };

        let mut unit_grid = Grid::<Slot>::new(grid.rows(), grid.cols());
        for (offset, &(first, last)) in spans.iter().enumerate() {
            let row = top + offset;
            for col in first..=last {
                unit_grid[(row, col)] = grid[(row, col)];
            }
        }
        units.push(TemplateUnit {
            tag,
            rows: top..bottom + 1,
            spans,
            grid: unit_grid,
        });
    }

    let covered: usize = units.iter().map(|unit| unit.rows.len()).sum();
    let active = grid.checksum().iter().filter(|&&active| active).count();
    if covered != active {
        return Err(Ambiguity::RowCountMismatch {
            units: covered,
            template: active,
        }
        .into());
    }
    Ok(units)
}
