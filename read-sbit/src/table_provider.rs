//! a trait for things that can serve font tables

use types::Tag;

use crate::{tables, FontData};

/// An interface for accessing tables from a font (or font-like object)
///
/// Table directory parsing is out of scope for this crate; the host
/// font stack implements this trait on whatever owns the file bytes.
pub trait TableProvider<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>>;

    /// The bitmap location table, preferring `EBLC` and falling back to
    /// the legacy `bloc` alias.
    fn eblc(&self) -> Option<FontData<'a>> {
        self.data_for_tag(tables::eblc::TAG)
            .or_else(|| self.data_for_tag(tables::eblc::LEGACY_TAG))
    }

    /// The bitmap data table, preferring `EBDT` and falling back to the
    /// legacy `bdat` alias.
    fn ebdt(&self) -> Option<FontData<'a>> {
        self.data_for_tag(tables::ebdt::TAG)
            .or_else(|| self.data_for_tag(tables::ebdt::LEGACY_TAG))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LegacyOnly;

    impl TableProvider<'static> for LegacyOnly {
        fn data_for_tag(&self, tag: Tag) -> Option<FontData<'static>> {
            if tag == Tag::new(b"bloc") {
                Some(FontData::new(&[1]))
            } else if tag == Tag::new(b"bdat") {
                Some(FontData::new(&[2]))
            } else {
                None
            }
        }
    }

    #[test]
    fn legacy_alias_fallback() {
        assert_eq!(LegacyOnly.eblc().unwrap().as_ref(), &[1]);
        assert_eq!(LegacyOnly.ebdt().unwrap().as_ref(), &[2]);
    }

    struct NoTables;

    impl TableProvider<'static> for NoTables {
        fn data_for_tag(&self, _: Tag) -> Option<FontData<'static>> {
            None
        }
    }

    #[test]
    fn absent_tables() {
        assert!(NoTables.eblc().is_none());
        assert!(NoTables.ebdt().is_none());
    }
}
