//! Error types shared by every stage of the reduction pipeline.
//!
//! All failures are unrecoverable at the point of detection: the operation
//! that raised them returns no partial matrix, template, or map. Messages
//! name the offending tag, row, column, or bitwidth so hand-authored
//! patterns and templates can be corrected.

use thiserror::Error;

use crate::cell::{Tag, SUPPORTED_BITWIDTHS};

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the reduction pipeline can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Bitwidth outside the closed set of supported widths.
    #[error("unsupported bitwidth {bits}, expected one of {SUPPORTED_BITWIDTHS:?}")]
    UnsupportedBitwidth {
        /// The rejected bitwidth.
        bits: usize,
    },

    /// Two collaborating objects disagree on their bitwidth.
    #[error("{context} has bitwidth {found}, expected {expected}")]
    BitwidthMismatch {
        /// What was being combined (e.g. "template", "map").
        context: &'static str,
        /// Bitwidth of the receiving object.
        expected: usize,
        /// Bitwidth of the supplied object.
        found: usize,
    },

    /// An operand does not fit in the matrix bitwidth.
    #[error("operand {operand} exceeds the {bits}-bit range")]
    OperandOutOfRange {
        /// The rejected operand.
        operand: u32,
        /// Bitwidth of the matrix.
        bits: usize,
    },

    /// A character that is not a valid cell glyph for the target grid.
    #[error("invalid glyph {glyph:?} at row {row}, column {col}")]
    InvalidGlyph {
        /// The rejected character.
        glyph: char,
        /// Row of the character.
        row: usize,
        /// Column of the character.
        col: usize,
    },

    /// A grid row whose width is not `2 * bits`.
    #[error("row {row} has width {found}, expected {expected}")]
    RowWidth {
        /// Offending row.
        row: usize,
        /// Required width.
        expected: usize,
        /// Actual width.
        found: usize,
    },

    /// A grid whose row count does not match its bitwidth.
    #[error("grid has {found} rows, expected {expected}")]
    RowCount {
        /// Required row count.
        expected: usize,
        /// Actual row count.
        found: usize,
    },

    /// A map entry that is not a two digit hexadecimal byte.
    #[error("invalid map entry {entry:?} at row {row}: expected two hex digits '00'..'FF'")]
    InvalidMapEntry {
        /// Offending row.
        row: usize,
        /// The rejected entry text.
        entry: String,
    },

    /// A map offset that relocates a row outside the matrix.
    #[error("map offset {offset} moves row {row} outside the matrix")]
    MapOutOfRange {
        /// Source row.
        row: usize,
        /// Signed offset applied to the row.
        offset: i8,
    },

    /// A pattern run longer than a carry-save adder can absorb.
    #[error("unsupported run length {run} for tag '{tag}' at row {row}: decoders are not supported")]
    UnsupportedRunLength {
        /// Tag of the run.
        tag: Tag,
        /// First row of the run.
        row: usize,
        /// Length of the run.
        run: usize,
    },

    /// An untagged row still carries active cells.
    #[error("row {row} is active but has no tag")]
    UntaggedActiveRow {
        /// The active row.
        row: usize,
    },

    /// A tag does not describe exactly one physical unit.
    #[error("structural ambiguity: {0}")]
    StructuralAmbiguity(#[from] Ambiguity),

    /// An isolated unit spans a row count no reduction unit supports.
    #[error("unit '{tag}' spans {span} rows, expected 1, 2 or 3")]
    UnsupportedUnitSpan {
        /// Tag of the unit.
        tag: Tag,
        /// Number of rows the unit spans.
        span: usize,
    },

    /// Two units write the same cell during merge.
    #[error("merge conflict at row {row}, column {col}")]
    MergeConflict {
        /// Row of the overlapping cell.
        row: usize,
        /// Column of the overlapping cell.
        col: usize,
    },

    /// A unit produced a set bit where its template predicted no cell.
    #[error("unit '{tag}' produced a bit outside its predicted shape in row {row}")]
    ShapeViolation {
        /// Tag of the unit.
        tag: Tag,
        /// Output row that overflowed.
        row: usize,
    },

    /// A set bit in the live matrix that no unit of the stage covers.
    #[error("set bit at row {row}, column {col} is not covered by any unit")]
    UncoveredBit {
        /// Row of the bit.
        row: usize,
        /// Column of the bit.
        col: usize,
    },

    /// `step` was called with no stage left to execute.
    #[error("no stage pending at state {state} of {stages}")]
    NoPendingStage {
        /// Current cursor.
        state: usize,
        /// Number of recorded stages.
        stages: usize,
    },

    /// Automatic stage generation exceeded its ceiling.
    #[error("automatic reduction exceeded {limit} stages")]
    RunawayReduction {
        /// The stage ceiling that was hit.
        limit: usize,
    },

    /// A feature that exists in the data model but has no implementation.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
}

/// Ways a tag can fail to identify a single contiguous unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Ambiguity {
    /// The tag appears as more than one span within a row.
    #[error("tag '{tag}' has more than one span in row {row}")]
    DuplicateSpan {
        /// The repeated tag.
        tag: Tag,
        /// Row holding the disjoint spans.
        row: usize,
    },

    /// The tag skips rows or recombines non-adjacently.
    #[error("tag '{tag}' continues at row {found}, expected row {expected}")]
    NonAdjacentRows {
        /// The repeated tag.
        tag: Tag,
        /// Row the unit should have continued on.
        expected: usize,
        /// Row the tag was found on.
        found: usize,
    },

    /// Isolated units account for a different number of rows than the template.
    #[error("isolated units cover {units} rows but the template has {template} active rows")]
    RowCountMismatch {
        /// Rows covered by all isolated units.
        units: usize,
        /// Active rows in the template.
        template: usize,
    },
}
