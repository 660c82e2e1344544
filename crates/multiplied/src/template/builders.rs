//! Unit builders: annotate a run of rows and predict its output shape.
//!
//! Each builder receives a [`Slice`] holding exactly the run's rows and
//! returns the annotated rows plus the result rows, both the same height
//! as the slice.
//!
//! ```text
//! slice      annotated  result
//! ____0000   ____AaAa   __AaAaAa      CSA: sum where any input is
//! ___0000_   ___aAaA_   __aAaA__      present, carry one column left
//! __0000__   __AaAa__   ________      where two or more are
//!
//! ___0000_   ___aAaA_   _aAaAaA_      ADD: span of both rows plus
//! __0000__   __AaAa__   ________      one carry-out column
//!
//! ___0000_   ___AaAa_   ___AaAa_      NOOP: unchanged
//! ```

use super::RunKind;
use crate::cell::{Active, Grid, Slot, Tag};
use crate::error::{Error, Result};
use crate::matrix::Slice;

/// Annotated rows and predicted result rows of one unit.
pub(crate) type Built = (Grid<Slot>, Grid<Slot>);

/// Column parity decides case: even columns upper, odd columns lower.
#[inline]
fn column_case(col: usize) -> bool {
    col % 2 == 0
}

/// Build the unit `kind` for `slice`.
///
/// # Errors
///
/// Returns [`Error::UnsupportedUnitSpan`] if the slice height does not match
/// the unit.
pub(crate) fn build<T>(kind: RunKind, tag: Tag, slice: &Slice<T>) -> Result<Built>
where
    T: Copy + Default + Active,
{
    if slice.len() != kind.span() {
        return Err(Error::UnsupportedUnitSpan {
            tag,
            span: slice.len(),
        });
    }
    Ok(match kind {
        RunKind::Noop => build_noop(tag, slice),
        RunKind::Add => build_add(tag, slice),
        RunKind::Csa => build_csa(tag, slice),
    })
}

fn annotate<T>(tag: Tag, slice: &Slice<T>) -> Grid<Slot>
where
    T: Copy + Default + Active,
{
    let mut grid = Grid::<Slot>::new(slice.len(), slice.width());
    for row in 0..slice.len() {
        for col in 0..slice.width() {
            if slice.is_active(row, col) {
                grid[(row, col)] = Slot::tagged(tag, column_case(col));
            }
        }
    }
    grid
}

fn build_noop<T>(tag: Tag, slice: &Slice<T>) -> Built
where
    T: Copy + Default + Active,
{
    let mut grid = Grid::<Slot>::new(1, slice.width());
    let mut upper = true;
    for col in 0..slice.width() {
        if slice.is_active(0, col) {
            grid[(0, col)] = Slot::tagged(tag, upper);
            upper = !upper;
        }
    }
    let result = grid.clone();
    (grid, result)
}

fn build_add<T>(tag: Tag, slice: &Slice<T>) -> Built
where
    T: Copy + Default + Active,
{
    let grid = annotate(tag, slice);
    let mut result = Grid::<Slot>::new(2, slice.width());
    let spans = [grid.active_span(0), grid.active_span(1)];
    let left = spans.iter().flatten().map(|&(l, _)| l).min();
    let right = spans.iter().flatten().map(|&(_, r)| r).max();
    if let (Some(left), Some(right)) = (left, right) {
        for col in left..=right {
            result[(0, col)] = Slot::tagged(tag, column_case(col));
        }
        if spans[1].is_some() && left > 0 {
            result[(0, left - 1)] = Slot::tagged(tag, column_case(left - 1));
        }
    }
    (grid, result)
}

fn build_csa<T>(tag: Tag, slice: &Slice<T>) -> Built
where
    T: Copy + Default + Active,
{
    let grid = annotate(tag, slice);
    let mut result = Grid::<Slot>::new(3, slice.width());
    for col in 0..slice.width() {
        let count = slice.column_count(col);
        let slot = Slot::tagged(tag, column_case(col));
        if count >= 1 {
            result[(0, col)] = slot;
        }
        if count >= 2 && col >= 1 {
            result[(1, col - 1)] = slot;
        }
    }
    (grid, result)
}
