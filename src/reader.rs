//! Primitive byte- and bit-level readers over a fixed buffer.
//!
//! This module provides the [`crate::reader::Reader`] type, a cursor-based reader
//! over an immutable byte slice. It separates *advancing* from *decoding*: a call to
//! [`Reader::read`] or [`Reader::read_bits`] only marks the window of the buffer
//! that was consumed, and the value decoders in [`crate::decode`] interpret that
//! window as many times and in as many ways as the caller likes without re-reading.
//!
//! # Architecture
//!
//! The reader couples a `&[u8]` with a [`crate::Cursor`]. All operations are
//! bounds-checked and atomic: a failing call returns an error without touching the
//! cursor, so a caught failure leaves the reader exactly where it was.
//!
//! Bit-wise and byte-wise reads interoperate through carry normalization. A bit
//! read carries accumulated bits into whole bytes and keeps the sub-byte remainder;
//! a byte-wise operation additionally discards the remainder, restarting at the
//! byte that contains it.
//!
//! # Usage Examples
//!
//! ```rust
//! use bytescope::Reader;
//!
//! let data = [0x34, 0x12, 0xFF];
//! let mut reader = Reader::new(&data);
//!
//! reader.read(2)?;
//! assert_eq!(reader.number_value()?, 0x1234 as f64);
//!
//! reader.read_bits(4)?;
//! assert_eq!(reader.number_value()?, 0xF as f64);
//! # Ok::<(), bytescope::Error>(())
//! ```

use crate::{
    cursor::{Cursor, Endianness},
    Error, Result,
};

/// A cursor-based reader for byte- and bit-wise windows over a fixed buffer.
///
/// `Reader` is the primitive layer of the decoding engine: it advances the cursor
/// over the buffer while the decoders in [`crate::decode`] interpret the window the
/// cursor describes. The buffer is the sole data source and is never mutated.
///
/// # Examples
///
/// ```rust
/// use bytescope::Reader;
///
/// let data = [b'A', b'B', 0x00, 0x07];
/// let mut reader = Reader::new(&data);
///
/// // Scan up to (exclusive) the zero byte
/// reader.read_until(0)?;
/// assert_eq!(reader.string_value()?, "AB");
///
/// // Jump behind it and read the rest
/// reader.set_offset(3)?;
/// reader.read_remaining()?;
/// assert_eq!(reader.number_value()?, 7.0);
/// # Ok::<(), bytescope::Error>(())
/// ```
#[derive(Debug)]
pub struct Reader<'a> {
    /// The binary data being read
    data: &'a [u8],
    /// Cursor state describing the last read window
    cursor: Cursor,
}

impl<'a> Reader<'a> {
    /// Create a new [`crate::reader::Reader`] over a byte slice, positioned at the
    /// start with an empty window and little-endian byte order.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Reader {
            data,
            cursor: Cursor::new(),
        }
    }

    /// Create a reader that resumes from a previously captured cursor state.
    #[must_use]
    pub fn with_cursor(data: &'a [u8], cursor: Cursor) -> Self {
        Reader { data, cursor }
    }

    /// Returns the length of the underlying buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get access to the underlying buffer.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// The current cursor state.
    #[must_use]
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub(crate) fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    /// Consume a byte-wise window of `size` bytes.
    ///
    /// First advances past the previous read (carrying any pending bit read into
    /// whole bytes and discarding the sub-byte remainder), then marks the next
    /// `size` bytes as the current window. A negative `size` moves the offset
    /// *backward* by `|size|` and marks those bytes, which re-reads data that an
    /// earlier call already consumed.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the resulting window exceeds the
    /// buffer bounds in either direction. The cursor is unchanged on failure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bytescope::Reader;
    /// let data = [0x01, 0x02, 0x03, 0x04];
    /// let mut reader = Reader::new(&data);
    ///
    /// reader.read(3)?;
    /// assert_eq!(reader.offset(), 0);
    ///
    /// // Rewind over the last two bytes of the previous window
    /// reader.read(-2)?;
    /// assert_eq!(reader.offset(), 1);
    /// # Ok::<(), bytescope::Error>(())
    /// ```
    pub fn read(&mut self, size: i64) -> Result<()> {
        let mut cur = self.cursor;
        cur.advance_past_read();
        cur.bit_offset = 0;

        if size >= 0 {
            #[allow(clippy::cast_sign_loss)] // non-negative verified above
            let size = size as usize;
            let end = cur.byte_offset.checked_add(size).ok_or(Error::OutOfBounds)?;
            if end > self.data.len() {
                return Err(Error::OutOfBounds);
            }
            cur.byte_size = size;
        } else {
            let back = size.unsigned_abs() as usize;
            if back > cur.byte_offset {
                return Err(Error::OutOfBounds);
            }
            cur.byte_offset -= back;
            cur.byte_size = back;
        }

        self.cursor = cur;
        Ok(())
    }

    /// Consume all bytes from the current position to the end of the buffer.
    ///
    /// Equivalent to a `read` whose size is the remaining byte count; the window
    /// may be empty when the cursor already sits at end of file.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if a pending bit read already carried
    /// the offset past the buffer end.
    pub fn read_remaining(&mut self) -> Result<()> {
        let mut cur = self.cursor;
        cur.advance_past_read();
        cur.bit_offset = 0;

        if cur.byte_offset > self.data.len() {
            return Err(Error::OutOfBounds);
        }
        cur.byte_size = self.data.len() - cur.byte_offset;

        self.cursor = cur;
        Ok(())
    }

    /// Consume a bit-wise window of `n` bits.
    ///
    /// Advances past the previous read with bit-accurate carry: every 8 accumulated
    /// bits roll into one byte-offset increment and the remainder becomes the new
    /// sub-byte bit offset. Bits are consumed least-significant-bit-first within
    /// each byte, independent of the endianness flag.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the bit window would exceed the
    /// buffer. The cursor is unchanged on failure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bytescope::Reader;
    /// let data = [0b1111_0110];
    /// let mut reader = Reader::new(&data);
    ///
    /// reader.read_bits(1)?;
    /// assert_eq!(reader.number_value()?, 0.0);
    /// reader.read_bits(5)?;
    /// assert_eq!(reader.number_value()?, 0b11011 as f64);
    /// # Ok::<(), bytescope::Error>(())
    /// ```
    pub fn read_bits(&mut self, n: usize) -> Result<()> {
        let mut cur = self.cursor;
        cur.advance_past_read();

        let end_bit = cur
            .byte_offset
            .checked_mul(8)
            .and_then(|b| b.checked_add(cur.bit_offset))
            .and_then(|b| b.checked_add(n))
            .ok_or(Error::OutOfBounds)?;
        if end_bit > self.data.len() * 8 {
            return Err(Error::OutOfBounds);
        }
        cur.bit_size = n;

        self.cursor = cur;
        Ok(())
    }

    /// Scan forward to a sentinel byte, consuming everything before it.
    ///
    /// Normalizes bit state like [`Reader::read`], then scans byte-by-byte from the
    /// current offset until a byte equal to `sentinel` is found. The sentinel is
    /// exclusive: the window covers the scanned distance, and the next `read` will
    /// start at the sentinel byte itself.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the sentinel does not occur before
    /// the end of the buffer. The cursor is unchanged on failure.
    pub fn read_until(&mut self, sentinel: u8) -> Result<()> {
        let mut cur = self.cursor;
        cur.advance_past_read();
        cur.bit_offset = 0;

        let mut pos = cur.byte_offset;
        while pos < self.data.len() {
            if self.data[pos] == sentinel {
                cur.byte_size = pos - cur.byte_offset;
                self.cursor = cur;
                return Ok(());
            }
            pos += 1;
        }
        Err(Error::OutOfBounds)
    }

    /// Move the cursor to an absolute byte offset, resetting all window state.
    ///
    /// An offset exactly equal to the buffer length is permitted and represents
    /// end of file.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] for a negative offset and
    /// [`crate::Error::OutOfBounds`] for an offset past the end of the buffer.
    /// The cursor is unchanged on failure.
    pub fn set_offset(&mut self, offset: i64) -> Result<()> {
        if offset < 0 {
            return Err(invalid_argument_error!("offset must not be negative, got {offset}"));
        }
        #[allow(clippy::cast_sign_loss)] // non-negative verified above
        let offset = offset as usize;
        if offset > self.data.len() {
            return Err(Error::OutOfBounds);
        }
        self.cursor.byte_offset = offset;
        self.cursor.byte_size = 0;
        self.cursor.bit_offset = 0;
        self.cursor.bit_size = 0;
        Ok(())
    }

    /// The current absolute byte offset (first byte of the last read).
    #[must_use]
    pub fn offset(&self) -> usize {
        self.cursor.byte_offset
    }

    /// Switch the byte order for subsequent multi-byte value decodes.
    ///
    /// Accepts the tokens `"little"` and `"big"`.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] for any other token.
    pub fn set_endianness(&mut self, token: &str) -> Result<()> {
        let endian: Endianness = token
            .parse()
            .map_err(|_| invalid_argument_error!("unknown endianness token '{token}'"))?;
        self.cursor.endian = endian;
        Ok(())
    }

    /// Switch the byte order with a typed value instead of a token.
    pub fn set_endian(&mut self, endian: Endianness) {
        self.cursor.endian = endian;
    }

    /// The byte order currently applied to multi-byte value decodes.
    #[must_use]
    pub fn endian(&self) -> Endianness {
        self.cursor.endian
    }

    /// Returns `true` once the current window reaches (or passes) the buffer end.
    #[must_use]
    pub fn end_of_file(&self) -> bool {
        self.cursor.byte_offset + self.cursor.byte_size >= self.data.len()
    }

    /// Returns the number of bytes between the current offset and the buffer end.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.cursor.byte_offset)
    }

    /// Peek at the byte under the current offset without consuming anything.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the offset is at or beyond the
    /// buffer end.
    pub fn peek_byte(&self) -> Result<u8> {
        if self.cursor.byte_offset >= self.data.len() {
            return Err(Error::OutOfBounds);
        }
        Ok(self.data[self.cursor.byte_offset])
    }

    /// Ensures that at least `needed` bytes remain from the current offset.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `needed` bytes remain.
    pub fn ensure_remaining(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(Error::OutOfBounds);
        }
        Ok(())
    }

    /// The bytes of the current byte-wise window.
    pub(crate) fn byte_window(&self) -> Result<&'a [u8]> {
        let end = self
            .cursor
            .byte_offset
            .checked_add(self.cursor.byte_size)
            .ok_or(Error::OutOfBounds)?;
        if end > self.data.len() {
            return Err(Error::OutOfBounds);
        }
        Ok(&self.data[self.cursor.byte_offset..end])
    }

    /// Validates that the current bit-wise window lies inside the buffer.
    pub(crate) fn ensure_bit_window(&self) -> Result<()> {
        let end_bit = self
            .cursor
            .byte_offset
            .checked_mul(8)
            .and_then(|b| b.checked_add(self.cursor.bit_offset))
            .and_then(|b| b.checked_add(self.cursor.bit_size))
            .ok_or(Error::OutOfBounds)?;
        if end_bit > self.data.len() * 8 {
            return Err(Error::OutOfBounds);
        }
        Ok(())
    }

    /// Bit `i` of the current bit-wise window, counted least-significant-first
    /// from the window start. Callers must have validated the window.
    pub(crate) fn window_bit(&self, i: usize) -> bool {
        let abs = self.cursor.byte_offset * 8 + self.cursor.bit_offset + i;
        debug_assert!(abs < self.data.len() * 8);
        (self.data[abs / 8] >> (abs % 8)) & 1 == 1
    }
}
