//! Reading embedded bitmap glyph data from OpenType fonts.
//!
//! This crate decodes the bitmap strikes stored in the `EBLC`
//! (bitmap location) and `EBDT` (bitmap data) tables, including their
//! legacy `bloc`/`bdat` aliases. Given a glyph identifier and a
//! previously selected strike, it produces a raster [`Bitmap`] and the
//! per-glyph [`SbitMetrics`].
//!
//! Font files are adversarial input: every multi-byte read here is
//! bounds-checked, header-declared counts are clamped against what the
//! underlying buffer can actually hold, and compound (composite) glyph
//! recursion is depth-limited.
//!
//! The caller supplies table bytes through the [`TableProvider`] trait;
//! locating tables within a font file is out of scope for this crate.
//!
//! # Example
//!
//! ```no_run
//! use read_sbit::{load_glyph_bitmap, BitmapStrikes, FaceMetrics, TableProvider};
//! use read_sbit::types::GlyphId;
//!
//! # fn demo(font: &impl TableProvider<'static>) -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = FaceMetrics {
//!     units_per_em: 2048,
//!     ascender: 1638,
//!     descender: -410,
//!     line_gap: 0,
//!     avg_char_width: 1044,
//! };
//! let strikes = BitmapStrikes::load(font, &metrics)?;
//! let strike = strikes.select(12, 12)?;
//! let (bitmap, glyph_metrics) = load_glyph_bitmap(&strikes, font, strike, GlyphId::new(3))?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod bitmap;
mod decode;
mod error;
mod font_data;
mod read;
mod table_provider;
pub mod tables;

#[cfg(test)]
mod test_helpers;

pub use bitmap::{Bitmap, PixelMode};
pub use decode::load_glyph_bitmap;
pub use error::{LoadError, Result};
pub use font_data::FontData;
pub use read::ReadError;
pub use table_provider::TableProvider;
pub use tables::ebdt::SbitMetrics;
pub use tables::eblc::{BitmapLocation, BitmapSize, BitmapStrikes, FaceMetrics, Strike};

/// Public re-export of the sbit-types crate.
pub extern crate sbit_types as types;

/// Maximum nesting depth for compound bitmap glyph components.
///
/// The table format places no limit of its own, so untrusted data could
/// otherwise recurse until the stack is exhausted.
pub const SBIT_COMPOSITE_RECURSION_LIMIT: usize = 4;
