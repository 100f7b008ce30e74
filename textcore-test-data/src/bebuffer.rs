//! A buffer builder for big-endian test data.

use std::collections::HashMap;

use textcore_types::Scalar;

/// A convenience type for generating a buffer of big-endian bytes.
#[derive(Debug, Clone, Default)]
pub struct BeBuffer {
    data: Vec<u8>,
    tagged_locations: HashMap<String, usize>,
}

impl BeBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    /// The current length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer contains zero bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return a reference to the contents of the buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer, returning the bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Write any scalar to this buffer.
    pub fn push(mut self, item: impl Scalar) -> Self {
        self.data.extend(item.to_raw().as_ref());
        self
    }

    /// Write a scalar and remember its position under `tag`, so it can be
    /// patched later with [`BeBuffer::write_at`].
    pub fn push_with_tag(mut self, item: impl Scalar, tag: &str) -> Self {
        self.tagged_locations
            .insert(tag.to_string(), self.data.len());
        self.data.extend(item.to_raw().as_ref());
        self
    }

    /// Write multiple scalars into the buffer.
    pub fn extend<T: Scalar>(mut self, iter: impl IntoIterator<Item = T>) -> Self {
        for item in iter {
            self.data.extend(item.to_raw().as_ref());
        }
        self
    }

    /// Append raw bytes.
    pub fn extend_bytes(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    /// Pad with zeros until the length is a multiple of `align`.
    pub fn align_to(mut self, align: usize) -> Self {
        while self.data.len() % align != 0 {
            self.data.push(0);
        }
        self
    }

    /// Returns the position recorded for `tag`.
    ///
    /// Panics on unknown tags.
    pub fn offset_for(&self, tag: &str) -> usize {
        self.tagged_locations.get(tag).copied().unwrap()
    }

    /// Overwrite the scalar previously pushed with `tag`.
    pub fn write_at(&mut self, tag: &str, item: impl Scalar) {
        let offset = self.offset_for(tag);
        let raw = item.to_raw();
        let new_data: &[u8] = raw.as_ref();
        let data = &mut self.data[offset..];
        if data.len() < new_data.len() {
            panic!("not enough room left in buffer for the requested write.");
        }
        data[..new_data.len()].copy_from_slice(new_data);
    }
}

impl std::ops::Deref for BeBuffer {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

/// Build a [`BeBuffer`] from a list of items.
///
/// Each item is a scalar expression, a bracketed list of scalars of one
/// type, or `{ value: "tag" }` to record the position of a value. Items
/// that are not a single token need parentheses.
#[macro_export]
macro_rules! be_buffer {
    ( $( $item:tt ),* $(,)? ) => {{
        let buffer = $crate::bebuffer::BeBuffer::new();
        $(
            let buffer = $crate::be_buffer_add!(buffer, $item);
        )*
        buffer
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! be_buffer_add {
    ($buffer:ident, { $value:tt : $tag:expr }) => {
        $buffer.push_with_tag($value, $tag)
    };
    ($buffer:ident, [ $( $value:expr ),* $(,)? ]) => {
        $buffer.extend([ $( $value ),* ])
    };
    ($buffer:ident, $value:expr) => {
        $buffer.push($value)
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn macro_items() {
        let mut buf = be_buffer! {
            1u16,
            [2u8, 3],
            {0u32: "patch"},
            (-2i16)
        };
        assert_eq!(buf.data(), &[0, 1, 2, 3, 0, 0, 0, 0, 0xFF, 0xFE]);
        buf.write_at("patch", 0xAABBCCDDu32);
        assert_eq!(&buf[4..8], &[0xAA, 0xBB, 0xCC, 0xDD]);
    }
}
