//! raw font bytes

use std::ops::{Range, RangeBounds};

use types::Scalar;

use crate::read::ReadError;

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice, that provides convenience
/// methods for parsing and validating that data. All reads are
/// bounds-checked; an out-of-range access is an error, never a panic.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontData<'a> {
    bytes: &'a [u8],
}

/// A cursor for validating bytes during parsing.
///
/// Every read advances the position by the encoded size of the value,
/// and fails if the read would cross the end of the underlying data.
pub(crate) struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

impl<'a> FontData<'a> {
    /// Create a new `FontData` with these bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData { bytes }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the data in the given range, or `None` if it is out of
    /// bounds.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        self.bytes.get(bounds).map(|bytes| FontData { bytes })
    }

    /// Read a scalar at the provided location in the data.
    pub fn read_at<T: Scalar>(&self, offset: usize) -> Result<T, ReadError> {
        self.bytes
            .get(offset..)
            .and_then(T::read)
            .ok_or(ReadError::OutOfBounds)
    }

    /// Interpret the bytes in the given range as a slice of records.
    ///
    /// The record type must tolerate any bit pattern, which in practice
    /// means it is built exclusively out of byte-sized fields.
    pub fn read_array<T: bytemuck::AnyBitPattern>(
        &self,
        range: Range<usize>,
    ) -> Result<&'a [T], ReadError> {
        let bytes = self.bytes.get(range).ok_or(ReadError::OutOfBounds)?;
        bytemuck::try_cast_slice(bytes).map_err(|_| ReadError::InvalidArrayLen)
    }

    pub(crate) fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }

    pub(crate) fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    fn check_in_bounds(&self, offset: usize) -> Result<(), ReadError> {
        self.bytes
            .get(..offset)
            .map(|_| ())
            .ok_or(ReadError::OutOfBounds)
    }
}

impl<'a> Cursor<'a> {
    /// Advance the position without reading, as for padding or fields
    /// whose value is not interesting.
    pub(crate) fn advance_by(&mut self, n_bytes: usize) {
        self.pos = self.pos.saturating_add(n_bytes);
    }

    pub(crate) fn read<T: Scalar>(&mut self) -> Result<T, ReadError> {
        let temp = self.data.read_at(self.pos);
        self.pos = self.pos.saturating_add(T::RAW_BYTE_LEN);
        temp
    }

    pub(crate) fn read_array<T: bytemuck::AnyBitPattern>(
        &mut self,
        len: usize,
    ) -> Result<&'a [T], ReadError> {
        let len_bytes = len
            .checked_mul(std::mem::size_of::<T>())
            .ok_or(ReadError::OutOfBounds)?;
        let end = self
            .pos
            .checked_add(len_bytes)
            .ok_or(ReadError::OutOfBounds)?;
        let temp = self.data.read_array(self.pos..end);
        self.pos = end;
        temp
    }

    /// return the current position, or an error if we are out of bounds
    pub(crate) fn position(&self) -> Result<usize, ReadError> {
        self.data.check_in_bounds(self.pos).map(|_| self.pos)
    }

    pub(crate) fn remaining_bytes(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }
}

impl AsRef<[u8]> for FontData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl<'a> From<&'a [u8]> for FontData<'a> {
    fn from(src: &'a [u8]) -> FontData<'a> {
        FontData::new(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_at_bounds() {
        let data = FontData::new(&[0, 1, 2, 3]);
        assert_eq!(data.read_at::<u16>(0).unwrap(), 1);
        assert_eq!(data.read_at::<u32>(0).unwrap(), 0x00010203);
        assert!(matches!(
            data.read_at::<u32>(1),
            Err(ReadError::OutOfBounds)
        ));
    }

    #[test]
    fn cursor_advances_past_failed_reads() {
        let data = FontData::new(&[0xab]);
        let mut cursor = data.cursor();
        assert!(cursor.read::<u32>().is_err());
        // the position is past the end now, and stays an error
        assert!(cursor.position().is_err());
    }

    #[test]
    fn cursor_sequencing() {
        let data = FontData::new(&[0, 5, 0, 0, 0, 7, 0xfe]);
        let mut cursor = data.cursor();
        assert_eq!(cursor.read::<u16>().unwrap(), 5);
        assert_eq!(cursor.read::<u32>().unwrap(), 7);
        assert_eq!(cursor.read::<i8>().unwrap(), -2);
        assert_eq!(cursor.remaining_bytes(), 0);
    }
}
