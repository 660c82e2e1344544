//! The reduction interpreter.
//!
//! Executes one stage against a live matrix: every unit reads its rows as
//! column-weighted integers, computes its outputs, and writes them into the
//! cells the template predicted for it. The per-unit results are merged and
//! relocated by the stage map.
//!
//! | Unit | Inputs | Outputs |
//! |------|--------|---------|
//! | NOOP | `a` | `a` |
//! | ADD | `a, b` | `a + b` |
//! | CSA | `a, b, c` | `a ^ b ^ c`, `maj(a, b, c) << 1` |
//!
//! Every unit preserves the sum of its rows, so the matrix value is the
//! same before and after each stage.

use tracing::trace;

use super::Stage;
use crate::cell::{Active, Bit, Bitwidth, Grid, Slot, Tag};
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::template::{RunKind, TemplateUnit};

/// Run `stage` on `live`, returning the next matrix.
///
/// # Errors
///
/// - [`Error::BitwidthMismatch`] if the stage and matrix widths differ
/// - [`Error::UncoveredBit`] if a set bit lies outside every unit
/// - [`Error::UnsupportedUnitSpan`] for a unit taller than three rows
/// - [`Error::ShapeViolation`] if an output does not fit its predicted cells
/// - [`Error::MergeConflict`] if two units write the same cell
/// - [`Error::MapOutOfRange`] if the stage map leaves the matrix
pub(crate) fn reduce(live: &Matrix, stage: &Stage) -> Result<Matrix> {
    let bits = live.bits();
    let template = stage.template();
    bits.expect_eq("stage template", template.bits())?;

    for (row, col, bit) in live.grid().cells() {
        if bit.is_set() && !template.grid()[(row, col)].is_active() {
            return Err(Error::UncoveredBit { row, col });
        }
    }

    let mut parts = Vec::with_capacity(stage.units().len());
    for unit in stage.units() {
        let inputs: Vec<u64> = unit
            .rows()
            .map(|row| unit_row_value(bits, live, unit, row))
            .collect();
        let outputs = evaluate(unit, &inputs)?;
        let mut part = Matrix::empty(bits);
        for (k, &value) in outputs.iter().enumerate() {
            place(bits, part.grid_mut(), template.result(), unit.tag(), unit.top() + k, value)?;
        }
        trace!(tag = %unit.tag(), ?inputs, ?outputs, "reduced unit");
        parts.push(part);
    }

    let mut merged = Matrix::merge(bits, &parts)?;
    merged.apply_map(stage.map())?;
    Ok(merged)
}

/// Value of the live cells the unit claims in `row`.
fn unit_row_value(bits: Bitwidth, live: &Matrix, unit: &TemplateUnit, row: usize) -> u64 {
    let Some(&(first, last)) = unit.spans().get(row - unit.top()) else {
        return 0;
    };
    (first..=last)
        .filter(|&col| unit.grid()[(row, col)].is_active())
        .map(|col| live.grid()[(row, col)].value() * bits.weight(col))
        .sum()
}

fn evaluate(unit: &TemplateUnit, inputs: &[u64]) -> Result<Vec<u64>> {
    Ok(match (unit.kind()?, inputs) {
        (RunKind::Noop, &[a]) => vec![a],
        (RunKind::Add, &[a, b]) => vec![a + b],
        (RunKind::Csa, &[a, b, c]) => {
            let majority = (a & b) | (a & c) | (b & c);
            vec![a ^ b ^ c, majority << 1]
        }
        _ => {
            return Err(Error::UnsupportedUnitSpan {
                tag: unit.tag(),
                span: inputs.len(),
            })
        }
    })
}

/// Write `value` into the cells of `row` predicted for `tag`.
fn place(
    bits: Bitwidth,
    target: &mut Grid<Bit>,
    predicted: &Grid<Slot>,
    tag: Tag,
    row: usize,
    value: u64,
) -> Result<()> {
    let mut written = 0;
    if row < bits.bits() {
        for col in 0..bits.width() {
            if predicted[(row, col)].tag() != Some(tag) {
                continue;
            }
            let weight = bits.weight(col);
            let set = value & weight != 0;
            target[(row, col)] = Bit::from_bool(set);
            if set {
                written |= weight;
            }
        }
    }
    if written == value {
        Ok(())
    } else {
        Err(Error::ShapeViolation { tag, row })
    }
}
