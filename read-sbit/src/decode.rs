//! Decoding glyph images from the bitmap data table.
//!
//! A [`SbitDecoder`] drives one top-level glyph decode: it resolves the
//! glyph's byte range through the strike's index subtables, parses the
//! per-glyph metrics, and composites the image into the output raster.
//! Compound glyphs recurse through the same pipeline with positioned
//! sub-glyphs, sharing the decoder's one-shot metrics and allocation
//! state.

use types::GlyphId;

use crate::bitmap::Bitmap;
use crate::error::{LoadError, Result};
use crate::font_data::FontData;
use crate::read::ReadError;
use crate::table_provider::TableProvider;
use crate::tables::ebdt;
use crate::tables::ebdt::{
    read_big_metrics, read_small_metrics, BigGlyphMetrics, SbitMetrics, SmallGlyphMetrics,
};
use crate::tables::eblc::{BitmapLocation, BitmapStrikes, Strike};
use crate::SBIT_COMPOSITE_RECURSION_LIMIT;

/// Load the bitmap image and metrics for one glyph of one strike.
///
/// The raster is composited at the origin; for compound glyphs the
/// component offsets position each sub-glyph within the raster of the
/// top-level glyph, whose metrics are authoritative.
pub fn load_glyph_bitmap<'a>(
    strikes: &BitmapStrikes,
    provider: &impl TableProvider<'a>,
    strike_index: u32,
    glyph_id: GlyphId,
) -> Result<(Bitmap, SbitMetrics)> {
    let data = provider
        .ebdt()
        .ok_or(ReadError::TableIsMissing(ebdt::TAG))?;
    let strike = strikes
        .strike(strike_index)
        .ok_or(ReadError::OutOfBounds)?;
    let mut decoder = SbitDecoder::new(strike, data);
    decoder.load_glyph(glyph_id, 0, 0, 0)?;
    Ok((decoder.bitmap, decoder.metrics))
}

/// State for one top-level glyph decode.
///
/// Never shared between decodes; concurrent decodes against the same
/// loaded [`BitmapStrikes`] each construct their own.
struct SbitDecoder<'a> {
    strike: Strike<'a>,
    ebdt: FontData<'a>,
    bit_depth: u8,
    metrics: SbitMetrics,
    metrics_loaded: bool,
    bitmap_allocated: bool,
    bitmap: Bitmap,
}

impl<'a> SbitDecoder<'a> {
    fn new(strike: Strike<'a>, ebdt: FontData<'a>) -> Self {
        let bit_depth = strike.bit_depth();
        SbitDecoder {
            strike,
            ebdt,
            bit_depth,
            metrics: SbitMetrics::default(),
            metrics_loaded: false,
            bitmap_allocated: false,
            bitmap: Bitmap::default(),
        }
    }

    fn load_glyph(
        &mut self,
        glyph_id: GlyphId,
        x_pos: i32,
        y_pos: i32,
        recurse_depth: usize,
    ) -> Result<()> {
        if recurse_depth > SBIT_COMPOSITE_RECURSION_LIMIT {
            return Err(LoadError::RecursionLimitExceeded(glyph_id));
        }
        let location = self.strike.location(glyph_id)?;
        self.load_image(&location, x_pos, y_pos, recurse_depth)
    }

    fn load_image(
        &mut self,
        location: &BitmapLocation,
        x_pos: i32,
        y_pos: i32,
        recurse_depth: usize,
    ) -> Result<()> {
        let start = location.data_offset as usize;
        let end = start
            .checked_add(location.data_size as usize)
            .filter(|end| *end <= self.ebdt.len())
            .ok_or(ReadError::OutOfBounds)?;
        let image = self.ebdt.slice(start..end).ok_or(ReadError::OutOfBounds)?;

        // index subtable formats 2 and 5 store one shared set of
        // metrics in the location table
        if let Some(big) = &location.metrics {
            self.set_big_metrics(big);
        }

        let mut cursor = image.cursor();
        match location.image_format {
            1 | 2 | 8 => {
                let small = read_small_metrics(&mut cursor)?;
                self.set_small_metrics(&small);
            }
            6 | 7 | 9 => {
                let big = read_big_metrics(&mut cursor)?;
                self.set_big_metrics(&big);
            }
            // format 5 carries no metrics of its own
            _ => {}
        }

        let data = &image.as_bytes()[cursor.position()?..];
        match location.image_format {
            1 | 6 => self.blit_byte_aligned(data, x_pos, y_pos),
            2 | 5 | 7 => self.blit_bit_aligned(data, x_pos, y_pos),
            8 => {
                // one padding byte before the component count
                let data = data.get(1..).ok_or(ReadError::OutOfBounds)?;
                self.load_compound(data, x_pos, y_pos, recurse_depth)
            }
            9 => self.load_compound(data, x_pos, y_pos, recurse_depth),
            other => Err(ReadError::InvalidFormat(other as i64).into()),
        }
    }

    /// First successful parse wins: the sub-glyphs of a compound still
    /// consume their metrics bytes, but do not overwrite the top-level
    /// glyph's values.
    fn set_small_metrics(&mut self, small: &SmallGlyphMetrics) {
        if self.metrics_loaded {
            return;
        }
        self.metrics = SbitMetrics {
            height: small.height,
            width: small.width,
            bearing_x: small.bearing_x,
            bearing_y: small.bearing_y,
            advance: small.advance,
            ..SbitMetrics::default()
        };
        self.metrics_loaded = true;
    }

    fn set_big_metrics(&mut self, big: &BigGlyphMetrics) {
        if self.metrics_loaded {
            return;
        }
        self.metrics = SbitMetrics {
            height: big.height,
            width: big.width,
            bearing_x: big.hori_bearing_x,
            bearing_y: big.hori_bearing_y,
            advance: big.hori_advance,
            vert_bearing_x: big.vert_bearing_x,
            vert_bearing_y: big.vert_bearing_y,
            vert_advance: big.vert_advance,
        };
        self.metrics_loaded = true;
    }

    /// Size the raster from the first-loaded metrics, once per decode.
    fn ensure_bitmap(&mut self) -> Result<()> {
        if self.bitmap_allocated {
            return Ok(());
        }
        if !self.metrics_loaded {
            return Err(ReadError::MalformedData("bitmap image with no metrics").into());
        }
        self.bitmap = Bitmap::allocate(
            self.metrics.width.into(),
            self.metrics.height.into(),
            self.bit_depth,
        )?;
        self.bitmap_allocated = true;
        Ok(())
    }

    /// Preconditions shared by both blit renderers: the target
    /// rectangle must lie inside the raster and the source must hold
    /// `ceil(width / 8) * height` bytes.
    fn check_blit(
        &mut self,
        src: &[u8],
        x_pos: i32,
        y_pos: i32,
    ) -> Result<(usize, usize, usize, usize)> {
        self.ensure_bitmap()?;
        let width = i32::from(self.metrics.width);
        let height = i32::from(self.metrics.height);
        if x_pos < 0
            || x_pos + width > i32::from(self.bitmap.width)
            || y_pos < 0
            || y_pos + height > i32::from(self.bitmap.rows)
        {
            return Err(ReadError::MalformedData("glyph image outside bitmap bounds").into());
        }
        if ((width as usize + 7) >> 3) * height as usize > src.len() {
            return Err(ReadError::MalformedData("truncated bitmap image data").into());
        }
        Ok((width as usize, height as usize, x_pos as usize, y_pos as usize))
    }

    /// OR-blit a source whose rows each start on a byte boundary.
    ///
    /// With a sub-byte horizontal position, a sliding 16-bit window
    /// combines consecutive source bytes before shifting them into
    /// place; the trailing partial byte is masked to the remaining
    /// width.
    fn blit_byte_aligned(&mut self, src: &[u8], x_pos: i32, y_pos: i32) -> Result<()> {
        let (width, height, x_pos, y_pos) = self.check_blit(src, x_pos, y_pos)?;
        let pitch = self.bitmap.pitch as usize;
        let mut line = y_pos * pitch + (x_pos >> 3);
        let x_pos = (x_pos & 7) as u32;
        let buffer = &mut self.bitmap.buffer;
        let mut from = 0;

        if x_pos == 0 {
            // whole source bytes line up with destination bytes
            for _ in 0..height {
                let mut write = line;
                let mut w = width;
                while w >= 8 {
                    buffer[write] |= src[from];
                    write += 1;
                    from += 1;
                    w -= 8;
                }
                if w > 0 {
                    buffer[write] |= src[from] & (0xff00 >> w) as u8;
                    from += 1;
                }
                line += pitch;
            }
        } else {
            for _ in 0..height {
                let mut write = line;
                let mut w = width;
                let mut wval: u16 = 0;
                while w >= 8 {
                    wval |= u16::from(src[from]);
                    from += 1;
                    buffer[write] |= (wval >> x_pos) as u8;
                    write += 1;
                    wval <<= 8;
                    w -= 8;
                }
                if w > 0 {
                    wval |= u16::from(src[from] & (0xff00 >> w) as u8);
                    from += 1;
                }
                // flush the carry; a row spanning a third destination
                // byte needs one more partial write
                buffer[write] |= (wval >> x_pos) as u8;
                if w + x_pos as usize > 8 {
                    write += 1;
                    wval <<= 8;
                    buffer[write] |= (wval >> x_pos) as u8;
                }
                line += pitch;
            }
        }
        Ok(())
    }

    /// OR-blit a source stored as one continuous bitstream.
    ///
    /// Rows are not padded to byte boundaries, so a carry register
    /// gathers source bits one at a time across byte boundaries and a
    /// destination byte is emitted for every 8 consumed bits.
    fn blit_bit_aligned(&mut self, src: &[u8], x_pos: i32, y_pos: i32) -> Result<()> {
        let (width, height, x_pos, y_pos) = self.check_blit(src, x_pos, y_pos)?;
        let pitch = self.bitmap.pitch as usize;
        let mut line = y_pos * pitch + (x_pos >> 3);
        let x_pos = (x_pos & 7) as u32;
        let buffer = &mut self.bitmap.buffer;
        let mut from = 0;
        // source carry; the sentinel bit at 0x10000 requests a refill
        let mut rval: u32 = 0x10000;

        for _ in 0..height {
            let mut write = line;
            // destination accumulator; its marker bit reaching 0x10000
            // means eight bits have been gathered
            let mut wval: u32 = 0x100 << x_pos;
            for _ in 0..width {
                if rval & 0x10000 != 0 {
                    rval = 0x100 | u32::from(src[from]);
                    from += 1;
                }
                wval |= rval & 0x80;
                wval <<= 1;
                rval <<= 1;
                if wval & 0x10000 != 0 {
                    buffer[write] |= (wval >> 8) as u8;
                    write += 1;
                    wval = 0x100;
                }
            }
            // right-align whatever is left of the final partial byte
            if wval != 0x100 {
                while wval > 0x1ff {
                    wval >>= 1;
                }
                buffer[write] |= wval as u8;
            }
            line += pitch;
        }
        Ok(())
    }

    fn load_compound(&mut self, data: &[u8], x_pos: i32, y_pos: i32, recurse_depth: usize) -> Result<()> {
        let data = FontData::new(data);
        let mut cursor = data.cursor();
        let num_components = cursor.read::<u16>()?;
        if cursor.remaining_bytes() < num_components as usize * 4 {
            return Err(ReadError::OutOfBounds.into());
        }
        for _ in 0..num_components {
            let component = cursor.read::<GlyphId>()?;
            let dx = cursor.read::<i8>()?;
            let dy = cursor.read::<i8>()?;
            // recurse through the full locate-and-load pipeline
            self.load_glyph(
                component,
                x_pos + i32::from(dx),
                y_pos + i32::from(dy),
                recurse_depth + 1,
            )?;
        }
        Ok(())
    }
}
