//! Common scalar data types used in embedded bitmap font tables.
//!
//! These are the building blocks for interpreting raw big-endian table
//! data: the [`Scalar`] read/write traits for the integer types that
//! appear on the wire, plus the [`Tag`] and [`GlyphId`] identifier types.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![no_std]

#[cfg(test)]
extern crate std;

mod glyph_id;
pub mod raw;
mod tag;

pub use glyph_id::GlyphId;
pub use raw::{FixedSize, Scalar};
pub use tag::Tag;
