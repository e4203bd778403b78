#![no_main]
use libfuzzer_sys::fuzz_target;

use read_sbit::types::{GlyphId, Tag};
use read_sbit::{load_glyph_bitmap, BitmapStrikes, FaceMetrics, FontData, TableProvider};

struct SplitFont<'a> {
    eblc: &'a [u8],
    ebdt: &'a [u8],
}

impl<'a> TableProvider<'a> for SplitFont<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>> {
        if tag == Tag::new(b"EBLC") {
            Some(FontData::new(self.eblc))
        } else if tag == Tag::new(b"EBDT") {
            Some(FontData::new(self.ebdt))
        } else {
            None
        }
    }
}

fuzz_target!(|data: &[u8]| {
    // first half location table, second half data table
    let (eblc, ebdt) = data.split_at(data.len() / 2);
    let font = SplitFont { eblc, ebdt };
    let metrics = FaceMetrics {
        units_per_em: 1000,
        ascender: 800,
        descender: -200,
        line_gap: 0,
        avg_char_width: 500,
    };
    let Ok(strikes) = BitmapStrikes::load(&font, &metrics) else {
        return;
    };
    let _ = strikes.select(12, 12);
    for strike in 0..strikes.len() as u32 {
        for gid in 0..64u16 {
            let _ = load_glyph_bitmap(&strikes, &font, strike, GlyphId::new(gid));
        }
    }
});
