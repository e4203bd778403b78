//! small utilities used in tests

use types::{Scalar, Tag};

use crate::{FontData, TableProvider};

/// A convenience type for generating a buffer of big-endian bytes.
#[derive(Debug, Clone, Default)]
pub struct BeBuffer {
    data: Vec<u8>,
}

impl BeBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    /// The current length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Write any scalar to this buffer.
    pub fn push(mut self, item: impl Scalar) -> Self {
        self.data.extend(item.to_raw().as_ref());
        self
    }

    /// Write multiple scalars into the buffer
    pub fn extend<T: Scalar>(mut self, iter: impl IntoIterator<Item = T>) -> Self {
        for item in iter {
            self.data.extend(item.to_raw().as_ref());
        }
        self
    }

    /// Write raw bytes into the buffer
    pub fn extend_bytes(mut self, bytes: impl AsRef<[u8]>) -> Self {
        self.data.extend(bytes.as_ref());
        self
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.data.clone()
    }
}

impl std::ops::Deref for BeBuffer {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

/// Serves bitmap location and data tables from in-memory buffers.
pub struct TestFont<'a> {
    pub eblc: &'a [u8],
    pub ebdt: &'a [u8],
}

impl<'a> TableProvider<'a> for TestFont<'a> {
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
