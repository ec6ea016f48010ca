//! Sequential little-endian reading and writing over byte buffers.
//!
//! [`ByteCursor`] walks a borrowed slice and fails with
//! [`BinaryError::InsufficientData`] instead of reading past the end.
//! [`ByteWriter`] appends to an owned output buffer. Neither knows anything
//! about records.

use bytes::{BufMut, Bytes, BytesMut};
use zerocopy::{FromBytes, LE, U16, U32};

/// Binary access error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryError {
    /// Not enough data to read the requested type
    InsufficientData {
        /// Absolute offset of the attempted read
        offset: usize,
        /// Number of bytes requested
        expected: usize,
        /// Number of bytes left
        available: usize,
    },
}

impl std::fmt::Display for BinaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryError::InsufficientData {
                offset,
                expected,
                available,
            } => {
                write!(
                    f,
                    "Insufficient data at offset {}: expected {}, got {}",
                    offset, expected, available
                )
            },
        }
    }
}

impl std::error::Error for BinaryError {}

/// Result type for binary operations
pub type BinaryResult<T> = Result<T, BinaryError>;

/// Forward-only little-endian reader over a byte slice.
///
/// Positions reported by the cursor are absolute: they include the base
/// offset the cursor was created with, so a cursor over one record payload
/// reports offsets within the enclosing stream.
///
/// # Examples
///
/// ```
/// use biffstream::common::binary::ByteCursor;
/// let data = [0x34, 0x12, 0x78, 0x56, 0x34, 0x12];
/// let mut cursor = ByteCursor::new(&data);
/// assert_eq!(cursor.read_u16().unwrap(), 0x1234);
/// assert_eq!(cursor.read_u32().unwrap(), 0x12345678);
/// assert!(cursor.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor at the start of `data`.
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_base(data, 0)
    }

    /// Create a cursor whose reported offsets start at `base`.
    #[inline]
    pub fn with_base(data: &'a [u8], base: usize) -> Self {
        Self { data, pos: 0, base }
    }

    /// Absolute offset of the next byte to be read.
    #[inline]
    pub fn position(&self) -> usize {
        self.base + self.pos
    }

    /// Number of unread bytes.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whether every byte has been consumed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    #[inline]
    fn take(&mut self, n: usize) -> BinaryResult<&'a [u8]> {
        if n > self.remaining() {
            return Err(BinaryError::InsufficientData {
                offset: self.position(),
                expected: n,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> BinaryResult<u8> {
        Ok(self.take(1)?[0])
    }

    /// Read a little-endian u16.
    #[inline]
    pub fn read_u16(&mut self) -> BinaryResult<u16> {
        let offset = self.position();
        let bytes = self.take(2)?;
        U16::<LE>::read_from_bytes(bytes)
            .map(|v| v.get())
            .map_err(|_| BinaryError::InsufficientData {
                offset,
                expected: 2,
                available: bytes.len(),
            })
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> BinaryResult<u32> {
        let offset = self.position();
        let bytes = self.take(4)?;
        U32::<LE>::read_from_bytes(bytes)
            .map(|v| v.get())
            .map_err(|_| BinaryError::InsufficientData {
                offset,
                expected: 4,
                available: bytes.len(),
            })
    }

    /// Peek at the next little-endian u16 without consuming it.
    #[inline]
    pub fn peek_u16(&self) -> Option<u16> {
        self.clone().read_u16().ok()
    }

    /// Read exactly `n` bytes.
    #[inline]
    pub fn read_bytes(&mut self, n: usize) -> BinaryResult<&'a [u8]> {
        self.take(n)
    }

    /// Read a fixed-size array.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> BinaryResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Consume and return everything that is left.
    #[inline]
    pub fn read_remainder(&mut self) -> &'a [u8] {
        let rest = &self.data[self.pos..];
        self.pos = self.data.len();
        rest
    }
}

/// Append-only little-endian writer backed by a [`BytesMut`].
///
/// # Examples
///
/// ```
/// use biffstream::common::binary::ByteWriter;
/// let mut out = ByteWriter::new();
/// out.write_u16(0x0809);
/// out.write_u32(1);
/// assert_eq!(out.as_slice(), &[0x09, 0x08, 0x01, 0x00, 0x00, 0x00]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: BytesMut,
}

impl ByteWriter {
    /// Create an empty writer.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with room for `capacity` bytes.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    #[inline]
    pub fn write_u16(&mut self, value: u16) {
        self.buf.put_u16_le(value);
    }

    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.buf.put_u32_le(value);
    }

    #[inline]
    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buf.put_slice(data);
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// View the bytes written so far.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Freeze the buffer without copying.
    #[inline]
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    /// Copy the buffer into a plain vector.
    #[inline]
    pub fn into_vec(self) -> Vec<u8> {
        self.buf.to_vec()
    }
}

/// Decode a BIFF8 "compressed" string: one byte per UTF-16 code unit with
/// the high byte dropped, i.e. ISO-8859-1.
pub fn decode_compressed(data: &[u8]) -> String {
    data.iter().map(|&b| b as char).collect()
}

/// Decode UTF-16LE code units, rejecting unpaired surrogates.
pub fn decode_utf16le(data: &[u8]) -> Option<String> {
    if data.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
        .collect();
    String::from_utf16(&units).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_integers() {
        let data = [0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 0xAB];
        let mut cursor = ByteCursor::new(&data);
        assert!(cursor.read_u16().is_ok_and(|v| v == 0x1234));
        assert!(cursor.read_u32().is_ok_and(|v| v == 0x12345678));
        assert!(cursor.read_u8().is_ok_and(|v| v == 0xAB));
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_read_past_end_fails() {
        let data = [0x01, 0x02, 0x03];
        let mut cursor = ByteCursor::with_base(&data, 100);
        assert_eq!(cursor.read_u16(), Ok(0x0201));
        assert_eq!(
            cursor.read_u16(),
            Err(BinaryError::InsufficientData {
                offset: 102,
                expected: 2,
                available: 1,
            })
        );
        // A failed read does not move the cursor.
        assert_eq!(cursor.position(), 102);
        assert_eq!(cursor.read_u8(), Ok(0x03));
    }

    #[test]
    fn test_read_bytes_and_remainder() {
        let data = [1, 2, 3, 4, 5];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_bytes(2).unwrap(), &[1, 2]);
        assert_eq!(cursor.peek_u16(), Some(0x0403));
        assert_eq!(cursor.read_array::<1>().unwrap(), [3]);
        assert_eq!(cursor.read_remainder(), &[4, 5]);
        assert_eq!(cursor.read_remainder(), &[] as &[u8]);
        assert!(cursor.read_bytes(1).is_err());
        assert_eq!(cursor.read_bytes(0).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn test_writer() {
        let mut out = ByteWriter::with_capacity(8);
        out.write_u16(0x003C);
        out.write_u32(0xDEADBEEF);
        out.write_u8(7);
        out.write_bytes(&[9, 9]);
        assert_eq!(out.len(), 9);
        assert_eq!(
            out.into_vec(),
            vec![0x3C, 0x00, 0xEF, 0xBE, 0xAD, 0xDE, 7, 9, 9]
        );
    }

    #[test]
    fn test_string_helpers() {
        assert_eq!(decode_compressed(b"Sheet1"), "Sheet1");
        assert_eq!(decode_compressed(&[0xE9]), "\u{e9}");
        assert_eq!(
            decode_utf16le(&[0x48, 0x00, 0x69, 0x00]).as_deref(),
            Some("Hi")
        );
        assert_eq!(decode_utf16le(&[0x48]), None);
        // Lone high surrogate
        assert_eq!(decode_utf16le(&[0x00, 0xD8]), None);
    }
}
