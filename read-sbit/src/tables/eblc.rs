//! The [EBLC (Embedded Bitmap Location)](https://learn.microsoft.com/en-us/typography/opentype/spec/eblc) table

use log::{trace, warn};
use types::{GlyphId, Tag};

use super::ebdt::{read_big_metrics, BigGlyphMetrics, SbitLineMetrics};
use crate::error::LoadError;
use crate::font_data::FontData;
use crate::read::ReadError;
use crate::table_provider::TableProvider;

pub const TAG: Tag = Tag::new(b"EBLC");
pub const LEGACY_TAG: Tag = Tag::new(b"bloc");

/// Version expected in the table header, for both `EBLC` and `bloc`.
const EXPECTED_VERSION: u32 = 0x0002_0000;

/// Sanity ceiling for the declared strike count.
const MAX_STRIKES: u32 = 0x1_0000;

const HEADER_LEN: usize = 8;
const STRIKE_RECORD_LEN: usize = 48;
const INDEX_SUBTABLE_ARRAY_RECORD_LEN: usize = 8;

/// Face-level font unit metrics used to synthesize nominal strike sizes.
///
/// These fields are parsed from `head`, `hhea` and `OS/2` by the host
/// font stack; this crate only consumes them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaceMetrics {
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
    /// `xAvgCharWidth` from the `OS/2` table, or zero if absent.
    pub avg_char_width: i16,
}

/// A strike size advertised to the rest of the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitmapSize {
    pub x_ppem: u8,
    pub y_ppem: u8,
    pub bit_depth: u8,
    /// Nominal glyph width in pixels, derived from the face's average
    /// character width.
    pub width: i16,
    /// Nominal line height in pixels.
    pub height: i16,
}

/// The set of bitmap strikes in a font, loaded once per face.
///
/// This owns a validated copy of the bitmap location table, released
/// when the store is dropped. It is immutable after
/// [`load`](Self::load); decodes borrow it read-only, so sharing a
/// loaded store across threads is safe.
#[derive(Clone, Debug, Default)]
pub struct BitmapStrikes {
    table: Vec<u8>,
    num_strikes: u32,
    sizes: Vec<BitmapSize>,
}

impl BitmapStrikes {
    /// Load the bitmap location table (`EBLC`, falling back to `bloc`)
    /// and derive the list of available strikes.
    ///
    /// The table is optional: a font without one yields an empty store.
    pub fn load<'a>(
        provider: &impl TableProvider<'a>,
        metrics: &FaceMetrics,
    ) -> Result<Self, ReadError> {
        let Some(data) = provider.eblc() else {
            return Ok(Self::default());
        };
        if data.len() < HEADER_LEN {
            warn!("bitmap location table too short ({} bytes)", data.len());
            return Err(ReadError::MalformedData("bitmap location table too short"));
        }
        let version = data.read_at::<u32>(0)?;
        let declared = data.read_at::<u32>(4)?;
        if version != EXPECTED_VERSION || declared >= MAX_STRIKES {
            warn!("invalid bitmap location table (version {version:#010x}, {declared} strikes)");
            return Err(ReadError::InvalidFormat(version as i64));
        }

        // count the strikes that actually fit in the table; the header
        // is untrusted input
        let usable = (declared as usize).min((data.len() - HEADER_LEN) / STRIKE_RECORD_LEN);

        let em = i32::from(metrics.units_per_em.max(1));
        let face_height =
            i32::from(metrics.ascender) - i32::from(metrics.descender) + i32::from(metrics.line_gap);
        let avg_width = i32::from(metrics.avg_char_width);

        let mut sizes = Vec::with_capacity(usable);
        for index in 0..usable {
            let record = HEADER_LEN + index * STRIKE_RECORD_LEN;
            let x_ppem = data.read_at::<u8>(record + 44)?;
            let y_ppem = data.read_at::<u8>(record + 45)?;
            let bit_depth = data.read_at::<u8>(record + 46)?;
            let ppem = i32::from(y_ppem);
            sizes.push(BitmapSize {
                x_ppem,
                y_ppem,
                bit_depth,
                width: ((avg_width * ppem + em / 2) / em) as i16,
                height: ((face_height * ppem + em / 2) / em) as i16,
            });
        }
        trace!("loaded {usable} bitmap strikes");
        Ok(BitmapStrikes {
            table: data.as_bytes().to_vec(),
            num_strikes: usable as u32,
            sizes,
        })
    }

    /// The number of available strikes.
    pub fn len(&self) -> usize {
        self.num_strikes as usize
    }

    /// `true` if the font has no bitmap strikes.
    pub fn is_empty(&self) -> bool {
        self.num_strikes == 0
    }

    /// The advertised sizes, in table order.
    pub fn sizes(&self) -> &[BitmapSize] {
        &self.sizes
    }

    /// Find the strike exactly matching the requested pixels-per-em.
    pub fn select(&self, x_ppem: u16, y_ppem: u16) -> Result<u32, LoadError> {
        if x_ppem > 255 || y_ppem < 1 || y_ppem > 255 {
            return Err(LoadError::InvalidPixelSize { x_ppem, y_ppem });
        }
        for (index, size) in self.sizes.iter().enumerate() {
            if u16::from(size.x_ppem) == x_ppem && u16::from(size.y_ppem) == y_ppem {
                return Ok(index as u32);
            }
        }
        Err(LoadError::InvalidPixelSize { x_ppem, y_ppem })
    }

    /// Returns a view of the strike record at `index`.
    pub fn strike(&self, index: u32) -> Option<Strike<'_>> {
        if index >= self.num_strikes {
            return None;
        }
        let eblc = FontData::new(&self.table);
        let record = HEADER_LEN + index as usize * STRIKE_RECORD_LEN;
        // the load-time clamp keeps every record inside the table, so
        // these reads cannot fail in practice
        let mut cursor = eblc.slice(record..)?.cursor();
        let index_subtables_offset = cursor.read::<u32>().ok()?;
        cursor.advance_by(4); // index tables size
        let num_index_subtables = cursor.read::<u32>().ok()?;
        let color_ref = cursor.read::<u32>().ok()?;
        let hori = cursor.read_array::<SbitLineMetrics>(1).ok()?[0];
        let vert = cursor.read_array::<SbitLineMetrics>(1).ok()?[0];
        let start_glyph = cursor.read::<GlyphId>().ok()?;
        let end_glyph = cursor.read::<GlyphId>().ok()?;
        let ppem_x = cursor.read::<u8>().ok()?;
        let ppem_y = cursor.read::<u8>().ok()?;
        let bit_depth = cursor.read::<u8>().ok()?;
        let flags = cursor.read::<i8>().ok()?;
        Some(Strike {
            eblc,
            index_subtables_offset,
            num_index_subtables,
            color_ref,
            hori,
            vert,
            start_glyph,
            end_glyph,
            ppem_x,
            ppem_y,
            bit_depth,
            flags,
        })
    }
}

/// A view of one 48-byte strike record and its index subtables.
#[derive(Clone)]
pub struct Strike<'a> {
    eblc: FontData<'a>,
    index_subtables_offset: u32,
    num_index_subtables: u32,
    color_ref: u32,
    hori: SbitLineMetrics,
    vert: SbitLineMetrics,
    start_glyph: GlyphId,
    end_glyph: GlyphId,
    ppem_x: u8,
    ppem_y: u8,
    bit_depth: u8,
    flags: i8,
}

/// The resolved location of one glyph's image inside the bitmap data
/// table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitmapLocation {
    /// Format of the image data.
    pub image_format: u16,
    /// Offset in bytes from the start of the bitmap data table.
    pub data_offset: u32,
    /// Size of the image data in bytes.
    pub data_size: u32,
    /// Shared metrics, when the index subtable (formats 2 and 5)
    /// carries them instead of the image data.
    pub metrics: Option<BigGlyphMetrics>,
}

impl<'a> Strike<'a> {
    /// Line metrics for horizontal layout.
    pub fn hori(&self) -> &SbitLineMetrics {
        &self.hori
    }

    /// Line metrics for vertical layout.
    pub fn vert(&self) -> &SbitLineMetrics {
        &self.vert
    }

    pub fn color_ref(&self) -> u32 {
        self.color_ref
    }

    pub fn start_glyph(&self) -> GlyphId {
        self.start_glyph
    }

    pub fn end_glyph(&self) -> GlyphId {
        self.end_glyph
    }

    pub fn ppem_x(&self) -> u8 {
        self.ppem_x
    }

    pub fn ppem_y(&self) -> u8 {
        self.ppem_y
    }

    pub fn bit_depth(&self) -> u8 {
        self.bit_depth
    }

    pub fn flags(&self) -> i8 {
        self.flags
    }

    /// Returns the bitmap location information for the given glyph.
    ///
    /// Walks the strike's index subtable array for a range covering
    /// `glyph_id` and resolves the per-format glyph offsets into a byte
    /// range of the bitmap data table. A well formed subtable that
    /// records no image for the glyph yields
    /// [`LoadError::GlyphNotFound`].
    pub fn location(&self, glyph_id: GlyphId) -> Result<BitmapLocation, LoadError> {
        let array_base = self.index_subtables_offset as usize;
        let array_len = (self.num_index_subtables as usize)
            .checked_mul(INDEX_SUBTABLE_ARRAY_RECORD_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        let array_end = array_base
            .checked_add(array_len)
            .ok_or(ReadError::OutOfBounds)?;
        let mut cursor = self
            .eblc
            .slice(array_base..array_end)
            .ok_or(ReadError::OutOfBounds)?
            .cursor();

        // find the range covering this glyph
        let mut found = None;
        for _ in 0..self.num_index_subtables {
            let first = cursor.read::<GlyphId>()?;
            let last = cursor.read::<GlyphId>()?;
            let additional_offset = cursor.read::<u32>()?;
            if (first..=last).contains(&glyph_id) {
                found = Some((first, additional_offset));
                break;
            }
        }
        let Some((first_glyph, additional_offset)) = found else {
            return Err(LoadError::GlyphNotFound(glyph_id));
        };

        let subtable_base = array_base
            .checked_add(additional_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        let mut cursor = self
            .eblc
            .slice(subtable_base..)
            .ok_or(ReadError::OutOfBounds)?
            .cursor();
        let index_format = cursor.read::<u16>()?;
        let image_format = cursor.read::<u16>()?;
        let image_data_offset = cursor.read::<u32>()?;
        // glyph index relative to the first glyph in the range
        let glyph_ix = (glyph_id.to_u16() - first_glyph.to_u16()) as usize;

        let mut metrics = None;
        let (image_start, image_end) = match index_format {
            // 4-byte offsets per glyph, relative to the image data offset
            1 => {
                cursor.advance_by(4 * glyph_ix);
                let start = cursor.read::<u32>()?;
                let end = cursor.read::<u32>()?;
                if start == end {
                    // missing glyph
                    return Err(LoadError::GlyphNotFound(glyph_id));
                }
                (start, end)
            }
            // constant image size, one shared set of big metrics
            2 => {
                let image_size = cursor.read::<u32>()?;
                metrics = Some(read_big_metrics(&mut cursor)?);
                let start = image_size
                    .checked_mul(glyph_ix as u32)
                    .ok_or(ReadError::OutOfBounds)?;
                let end = start.checked_add(image_size).ok_or(ReadError::OutOfBounds)?;
                (start, end)
            }
            // 2-byte offsets per glyph, relative to the image data offset
            3 => {
                cursor.advance_by(2 * glyph_ix);
                let start = cursor.read::<u16>()?;
                let end = cursor.read::<u16>()?;
                if start == end {
                    // missing glyph
                    return Err(LoadError::GlyphNotFound(glyph_id));
                }
                (start.into(), end.into())
            }
            // sparse (glyph, offset) pairs; offsets bracket consecutive
            // entries, so the array carries one trailing sentinel pair
            4 => {
                let num_glyphs = cursor.read::<u32>()?;
                let pairs_len = (num_glyphs as usize)
                    .checked_add(1)
                    .and_then(|n| n.checked_mul(4))
                    .ok_or(ReadError::OutOfBounds)?;
                if cursor.remaining_bytes() < pairs_len {
                    return Err(ReadError::OutOfBounds.into());
                }
                let mut found = None;
                for _ in 0..num_glyphs {
                    let gid = cursor.read::<GlyphId>()?;
                    let offset = cursor.read::<u16>()?;
                    if gid == glyph_id {
                        cursor.advance_by(2); // the next pair's glyph id
                        found = Some((offset, cursor.read::<u16>()?));
                        break;
                    }
                }
                let Some((start, end)) = found else {
                    return Err(LoadError::GlyphNotFound(glyph_id));
                };
                (start.into(), end.into())
            }
            // constant image size and shared big metrics, sparse glyph list
            5 => {
                let image_size = cursor.read::<u32>()?;
                metrics = Some(read_big_metrics(&mut cursor)?);
                let num_glyphs = cursor.read::<u32>()?;
                let glyphs_len = (num_glyphs as usize)
                    .checked_mul(2)
                    .ok_or(ReadError::OutOfBounds)?;
                if cursor.remaining_bytes() < glyphs_len {
                    return Err(ReadError::OutOfBounds.into());
                }
                let mut position = None;
                for nn in 0..num_glyphs {
                    if cursor.read::<GlyphId>()? == glyph_id {
                        position = Some(nn);
                        break;
                    }
                }
                let Some(position) = position else {
                    return Err(LoadError::GlyphNotFound(glyph_id));
                };
                let start = image_size
                    .checked_mul(position)
                    .ok_or(ReadError::OutOfBounds)?;
                let end = start.checked_add(image_size).ok_or(ReadError::OutOfBounds)?;
                (start, end)
            }
            _ => return Err(LoadError::GlyphNotFound(glyph_id)),
        };

        if image_start > image_end {
            return Err(LoadError::GlyphNotFound(glyph_id));
        }
        Ok(BitmapLocation {
            image_format,
            data_offset: image_data_offset
                .checked_add(image_start)
                .ok_or(ReadError::OutOfBounds)?,
            data_size: image_end - image_start,
            metrics,
        })
    }
}
