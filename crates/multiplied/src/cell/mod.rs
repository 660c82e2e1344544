//! Cells, tags, bitwidths, and the grid they are stored in.
//!
//! Everything above this layer (matrices, templates, maps) is a [`Grid`] of
//! one of the cell types here plus a validated [`Bitwidth`].

mod bitwidth;
mod glyph;
mod grid;
mod tag;

pub use bitwidth::{Bitwidth, SUPPORTED_BITWIDTHS};
pub use glyph::{Active, Bit, Glyph, Slot, EMPTY_GLYPH};
pub use grid::Grid;
pub use tag::Tag;
