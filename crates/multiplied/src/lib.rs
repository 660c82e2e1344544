//! Multiplied - partial-product reduction for Wallace and Dadda multipliers
//!
//! A binary multiplier ANDs every bit of one operand with every bit of the
//! other, producing a staircase of partial products. A reduction tree then
//! compresses that staircase stage by stage, using carry-save adders (three
//! rows in, two out) and ordinary adders (two rows in, one out), until a
//! single row holds the product.
//!
//! This crate models that process symbolically and numerically:
//!
//! ```text
//! Pattern  --compile-->  Template  --push-->  Stage { template, pseudo, map }
//!                                                   |
//! (a, b)  --Matrix::from_operands-->  Matrix  --exec-->  stage 0 .. stage N
//! ```
//!
//! # Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`cell`] | Bitwidths, cells, tags, and the row-major [`Grid`] |
//! | [`matrix`] | The partial-product [`Matrix`] and row [`Slice`]s |
//! | [`template`] | [`Pattern`]s, [`Template`] compilation, unit isolation |
//! | [`map`] | Row relocation [`Map`]s, the Dadda table, [`hoist`] |
//! | [`algorithm`] | Stage planning and the reduction interpreter |
//! | [`export`] | JSON export (feature `serde`) |
//!
//! # Glyphs
//!
//! Every grid renders one character per cell, rows joined by newlines:
//! `_` for an empty position, `0`/`1` for matrix bits, and a letter for a
//! template cell, its case alternating along the unit.
//!
//! # Example: greedy plan
//!
//! ```
//! use multiplied::Algorithm;
//!
//! let mut algorithm = Algorithm::new(4).unwrap();
//! algorithm.auto_resolve_stage(true).unwrap();
//!
//! let trace = algorithm.exec(13, 11).unwrap();
//! for matrix in trace.values() {
//!     assert_eq!(matrix.value(), 143);
//! }
//! assert_eq!(trace[&3].row_value(0), 143);
//! ```
//!
//! # Example: hand-written pattern
//!
//! ```
//! use multiplied::{Algorithm, Pattern};
//!
//! let mut algorithm = Algorithm::new(4).unwrap();
//! algorithm.push("aabb".parse::<Pattern>().unwrap(), None).unwrap();
//! algorithm.auto_resolve_stage(true).unwrap();
//!
//! let trace = algorithm.exec(15, 15).unwrap();
//! assert_eq!(trace.values().last().unwrap().row_value(0), 225);
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

// Bitwidths, cell types, tags, and grid storage
pub mod cell;

// Error taxonomy
pub mod error;

// Partial-product matrix and row slices
pub mod matrix;

// Row relocation maps (row maps, Dadda table, hoisting)
pub mod map;

// Patterns, template compilation, bounding boxes, unit isolation
pub mod template;

// Stage planning and the reduction interpreter
pub mod algorithm;

// JSON export of planned algorithms
#[cfg(feature = "serde")]
pub mod export;

pub use algorithm::{Algorithm, AlgorithmConfig, Stage, StageSource, ZeroOperandPolicy};
pub use cell::{Active, Bit, Bitwidth, Glyph, Grid, Slot, Tag, SUPPORTED_BITWIDTHS};
pub use error::{Ambiguity, Error, Result};
pub use map::{build_dadda_map, hoist, Map, MapKind};
pub use matrix::{Matrix, Slice};
pub use template::{resolve_pattern, BoundingBox, Pattern, RunKind, Template, TemplateUnit};
