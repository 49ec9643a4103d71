//! Big-endian byte buffers for class-file encoding and decoding.
//!
//! This module provides:
//! - [`ByteWriter`] a growable writer with back-patching
//! - [`ByteReader`] a bounds-checked cursor over a byte slice
//!
//! All multi-byte values use big-endian byte order as required by the
//! class-file format.

use crate::error::{Error, Result};

/// Growable big-endian byte writer.
///
/// Tracks the current write position and supports patching previously
/// written length fields once the size of a section is known.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buffer: Vec<u8>,
}

impl ByteWriter {
    /// Creates a new empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Creates a new writer with the given initial capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Returns the current write position (number of bytes written).
    #[must_use]
    pub fn position(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the number of bytes written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns the written bytes.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Consumes the writer and returns the written bytes.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    /// Writes a u8 at the current position and advances.
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Writes a u16 in big-endian at the current position and advances.
    pub fn write_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes an i16 in big-endian at the current position and advances.
    pub fn write_i16(&mut self, value: i16) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes a u32 in big-endian at the current position and advances.
    pub fn write_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes an i32 in big-endian at the current position and advances.
    pub fn write_i32(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes bytes at the current position and advances.
    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Overwrites a u16 previously written at `offset`.
    ///
    /// # Panics
    /// Panics if `offset + 2` is past the written region.
    pub fn patch_u16(&mut self, offset: usize, value: u16) {
        self.buffer[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
    }

    /// Overwrites an i16 previously written at `offset`.
    ///
    /// # Panics
    /// Panics if `offset + 2` is past the written region.
    pub fn patch_i16(&mut self, offset: usize, value: i16) {
        self.buffer[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
    }

    /// Overwrites a u32 previously written at `offset`.
    ///
    /// # Panics
    /// Panics if `offset + 4` is past the written region.
    pub fn patch_u32(&mut self, offset: usize, value: u32) {
        self.buffer[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
    }

    /// Writes an attribute: name index, u4 length and the body produced by `body`.
    ///
    /// The length field is back-patched once the body has been written.
    pub fn write_attribute<F>(&mut self, name_index: u16, body: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.write_u16(name_index);
        let length_at = self.position();
        self.write_u32(0);
        body(self)?;
        let length = self.position() - length_at - 4;
        let length = u32::try_from(length).map_err(|_| Error::TooMany {
            kind: "attribute bytes",
            count: length,
        })?;
        self.patch_u32(length_at, length);
        Ok(())
    }
}

/// Bounds-checked big-endian reader over a byte slice.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    /// Wraps a byte slice, starting at offset 0.
    #[must_use]
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Returns the current read position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    /// Returns true if every byte has been consumed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Reads `len` bytes and advances.
    ///
    /// # Errors
    /// Returns [`Error::BufferTooShort`] if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(Error::BufferTooShort {
                required: self.position + len,
                available: self.buffer.len(),
            });
        }
        let bytes = &self.buffer[self.position..self.position + len];
        self.position += len;
        Ok(bytes)
    }

    /// Reads a u8 and advances.
    ///
    /// # Errors
    /// Returns [`Error::BufferTooShort`] at end of input.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Reads a big-endian u16 and advances.
    ///
    /// # Errors
    /// Returns [`Error::BufferTooShort`] at end of input.
    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Reads a big-endian u32 and advances.
    ///
    /// # Errors
    /// Returns [`Error::BufferTooShort`] at end of input.
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads a big-endian i32 and advances.
    ///
    /// # Errors
    /// Returns [`Error::BufferTooShort`] at end of input.
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_big_endian() {
        let mut writer = ByteWriter::new();
        assert!(writer.is_empty());

        writer.write_u8(0xFF);
        writer.write_u16(0x1234);
        writer.write_u32(0xCAFEBABE);
        writer.write_i16(-2);

        assert_eq!(writer.position(), 9);
        assert_eq!(
            writer.as_slice(),
            &[0xFF, 0x12, 0x34, 0xCA, 0xFE, 0xBA, 0xBE, 0xFF, 0xFE]
        );
    }

    #[test]
    fn test_writer_patch() {
        let mut writer = ByteWriter::new();
        writer.write_u16(0);
        writer.write_u32(0);
        writer.patch_u16(0, 0xABCD);
        writer.patch_u32(2, 7);
        assert_eq!(writer.into_inner(), vec![0xAB, 0xCD, 0, 0, 0, 7]);
    }

    #[test]
    fn test_write_attribute_patches_length() {
        let mut writer = ByteWriter::new();
        writer
            .write_attribute(3, |out| {
                out.write_bytes(b"abc");
                Ok(())
            })
            .expect("attribute");
        assert_eq!(writer.as_slice(), &[0, 3, 0, 0, 0, 3, b'a', b'b', b'c']);
    }

    #[test]
    fn test_reader_reads_and_bounds() {
        let data = [0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x3D, 0x01];
        let mut reader = ByteReader::new(&data);

        assert_eq!(reader.read_u32().unwrap(), 0xCAFEBABE);
        assert_eq!(reader.read_u16().unwrap(), 61);
        assert_eq!(reader.remaining(), 1);
        assert_eq!(reader.read_u8().unwrap(), 1);
        assert!(reader.is_exhausted());

        let err = reader.read_u16().unwrap_err();
        assert!(matches!(
            err,
            Error::BufferTooShort {
                required: 9,
                available: 7
            }
        ));
    }
}
