//! The [EBDT (Embedded Bitmap Data)](https://learn.microsoft.com/en-us/typography/opentype/spec/ebdt) table
//!
//! This module holds the per-glyph wire records shared between the
//! location and data tables. The glyph image decoding itself is driven
//! by [`load_glyph_bitmap`](crate::load_glyph_bitmap).

use types::Tag;

use crate::font_data::Cursor;
use crate::read::ReadError;

pub const TAG: Tag = Tag::new(b"EBDT");
pub const LEGACY_TAG: Tag = Tag::new(b"bdat");

/// [SmallGlyphMetrics](https://learn.microsoft.com/en-us/typography/opentype/spec/eblc#smallglyphmetrics) record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C)]
pub struct SmallGlyphMetrics {
    pub height: u8,
    pub width: u8,
    pub bearing_x: i8,
    pub bearing_y: i8,
    pub advance: u8,
}

/// [BigGlyphMetrics](https://learn.microsoft.com/en-us/typography/opentype/spec/eblc#bigglyphmetrics) record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C)]
pub struct BigGlyphMetrics {
    pub height: u8,
    pub width: u8,
    pub hori_bearing_x: i8,
    pub hori_bearing_y: i8,
    pub hori_advance: u8,
    pub vert_bearing_x: i8,
    pub vert_bearing_y: i8,
    pub vert_advance: u8,
}

/// [SbitLineMetrics](https://learn.microsoft.com/en-us/typography/opentype/spec/eblc#sbitlinemetrics) record.
///
/// Stored twice per strike, for the horizontal and vertical layout
/// directions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C)]
pub struct SbitLineMetrics {
    pub ascender: i8,
    pub descender: i8,
    pub width_max: u8,
    pub caret_slope_numerator: i8,
    pub caret_slope_denominator: i8,
    pub caret_offset: i8,
    pub min_origin_sb: i8,
    pub min_advance_sb: i8,
    pub max_before_bl: i8,
    pub min_after_bl: i8,
    pub pad1: i8,
    pub pad2: i8,
}

/// Decoded metrics for one bitmap glyph.
///
/// The vertical fields are only meaningful when the glyph's image
/// format carried big metrics; they are zero otherwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SbitMetrics {
    pub height: u8,
    pub width: u8,
    pub bearing_x: i8,
    pub bearing_y: i8,
    pub advance: u8,
    pub vert_bearing_x: i8,
    pub vert_bearing_y: i8,
    pub vert_advance: u8,
}

pub(crate) fn read_small_metrics(cursor: &mut Cursor) -> Result<SmallGlyphMetrics, ReadError> {
    Ok(cursor.read_array::<SmallGlyphMetrics>(1)?[0])
}

pub(crate) fn read_big_metrics(cursor: &mut Cursor) -> Result<BigGlyphMetrics, ReadError> {
    Ok(cursor.read_array::<BigGlyphMetrics>(1)?[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font_data::FontData;

    #[test]
    fn small_metrics_layout() {
        let data = FontData::new(&[8, 3, 0x01, 0xfa, 4]);
        let mut cursor = data.cursor();
        let metrics = read_small_metrics(&mut cursor).unwrap();
        assert_eq!(
            metrics,
            SmallGlyphMetrics {
                height: 8,
                width: 3,
                bearing_x: 1,
                bearing_y: -6,
                advance: 4,
            }
        );
        assert_eq!(cursor.position().unwrap(), 5);
    }

    #[test]
    fn big_metrics_layout() {
        let data = FontData::new(&[17, 9, 0, 12, 9, 0xfc, 0xf7, 0]);
        let mut cursor = data.cursor();
        let metrics = read_big_metrics(&mut cursor).unwrap();
        assert_eq!(metrics.height, 17);
        assert_eq!(metrics.hori_bearing_y, 12);
        assert_eq!(metrics.vert_bearing_x, -4);
        assert_eq!(metrics.vert_bearing_y, -9);
        assert_eq!(cursor.position().unwrap(), 8);
    }

    #[test]
    fn truncated_metrics() {
        let data = FontData::new(&[8, 3, 0x01]);
        let mut cursor = data.cursor();
        assert!(matches!(
            read_small_metrics(&mut cursor),
            Err(ReadError::OutOfBounds)
        ));
    }
}
