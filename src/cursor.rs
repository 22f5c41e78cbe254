//! Cursor state for byte- and bit-wise reading.
//!
//! This module provides the [`crate::cursor::Cursor`] type, the explicit state block
//! describing the most recently read region of a buffer: the byte offset and size of
//! the last byte-wise read, the bit offset and size of the last bit-wise read, the
//! relative-display baseline, and the active endianness. A byte-wise and a bit-wise
//! read are mutually exclusive at any instant: outside the transient reset state,
//! exactly one of `byte_size` and `bit_size` is non-zero.
//!
//! The cursor deliberately carries no buffer reference. [`crate::Reader`] couples a
//! cursor with a byte slice; lazy detail sections capture a [`CursorSnapshot`] at
//! declaration time and restore it when they are eventually expanded, which is why
//! snapshot and restore live here rather than on the reader.

use strum::{Display, EnumString};

/// Byte order applied to multi-byte reads.
///
/// Process-wide for a given parse pass and mutable by the decode script at any
/// point, affecting all subsequent multi-byte value decodes. Bit-wise reads are
/// unaffected: bits are always consumed least-significant-bit-first regardless of
/// this flag.
///
/// The string tokens accepted by [`crate::Reader::set_endianness`] are `"little"`
/// and `"big"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Endianness {
    /// Least-significant byte first (the default).
    #[default]
    Little,
    /// Most-significant byte first.
    Big,
}

/// The offset/size/bit-position state describing the most recently read region.
///
/// All reader operations update this state and all value decoders interpret the
/// window it describes without advancing it. The invariant
/// `byte_offset + ceil((bit_offset + bit_size) / 8) <= buffer.len()` holds at all
/// times; any read that would break it fails before the cursor is mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Index of the first byte of the last read.
    pub byte_offset: usize,
    /// Number of bytes consumed by the last byte-wise read. Zero while a bit-wise
    /// read is active.
    pub byte_size: usize,
    /// Sub-byte bit position within `byte_offset` where the last bit-wise read
    /// began. Always in `0..8`.
    pub bit_offset: usize,
    /// Number of bits consumed by the last bit-wise read. Zero while a byte-wise
    /// read is active.
    pub bit_size: usize,
    /// Baseline offset of the current nesting level. Only used to compute the
    /// relative display offset; never affects buffer addressing.
    pub start_offset: usize,
    /// Byte order for multi-byte value decodes.
    pub endian: Endianness,
}

/// The saved cursor state a lazy detail section needs to resume decoding later.
///
/// Captured at declaration time and consumed exactly once on expansion. Only the
/// three offset fields are part of the snapshot; the sizes restart at zero and the
/// endianness is whatever the parse pass last set it to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorSnapshot {
    /// Byte offset at declaration time.
    pub byte_offset: usize,
    /// Sub-byte bit offset at declaration time.
    pub bit_offset: usize,
    /// Relative-display baseline at declaration time.
    pub start_offset: usize,
}

impl Cursor {
    /// Create a cursor at the start of a buffer: all offsets and sizes zero,
    /// little-endian.
    #[must_use]
    pub fn new() -> Self {
        Cursor::default()
    }

    /// The display offset of the last read, relative to the current nesting
    /// level's baseline.
    ///
    /// Signed because a script may rewind below the baseline it started from.
    #[must_use]
    pub fn display_offset(&self) -> i64 {
        self.byte_offset as i64 - self.start_offset as i64
    }

    /// Capture the state a deferred detail section needs to resume from here.
    #[must_use]
    pub fn snapshot(&self) -> CursorSnapshot {
        CursorSnapshot {
            byte_offset: self.byte_offset,
            bit_offset: self.bit_offset,
            start_offset: self.start_offset,
        }
    }

    /// Restore a previously captured snapshot, zeroing both read sizes and
    /// keeping the current endianness.
    pub fn restore(&mut self, snapshot: CursorSnapshot) {
        self.byte_offset = snapshot.byte_offset;
        self.bit_offset = snapshot.bit_offset;
        self.start_offset = snapshot.start_offset;
        self.byte_size = 0;
        self.bit_size = 0;
    }

    /// Advance past the previous read so the next one starts behind it.
    ///
    /// Byte consumption moves `byte_offset` directly; accumulated bits carry into
    /// whole bytes with the remainder kept in `bit_offset`. Byte-wise operations
    /// additionally clear the remainder themselves (a byte read restarts at the
    /// byte containing any leftover bits).
    pub(crate) fn advance_past_read(&mut self) {
        self.byte_offset += self.byte_size;
        self.byte_size = 0;
        let total = self.bit_offset + self.bit_size;
        self.byte_offset += total / 8;
        self.bit_offset = total % 8;
        self.bit_size = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endianness_tokens() {
        assert_eq!("little".parse::<Endianness>().unwrap(), Endianness::Little);
        assert_eq!("big".parse::<Endianness>().unwrap(), Endianness::Big);
        assert!("middle".parse::<Endianness>().is_err());
        assert!("LITTLE ".parse::<Endianness>().is_err());
        assert_eq!(Endianness::Little.to_string(), "little");
        assert_eq!(Endianness::Big.to_string(), "big");
    }

    #[test]
    fn test_advance_past_byte_read() {
        let mut c = Cursor::new();
        c.byte_offset = 4;
        c.byte_size = 3;
        c.advance_past_read();
        assert_eq!(c.byte_offset, 7);
        assert_eq!(c.byte_size, 0);
        assert_eq!(c.bit_offset, 0);
        assert_eq!(c.bit_size, 0);
    }

    #[test]
    fn test_advance_carries_whole_bit_bytes() {
        // 3 offset bits + 13 read bits = 16 bits = 2 whole bytes, remainder 0
        let mut c = Cursor::new();
        c.byte_offset = 10;
        c.bit_offset = 3;
        c.bit_size = 13;
        c.advance_past_read();
        assert_eq!(c.byte_offset, 12);
        assert_eq!(c.bit_offset, 0);
        assert_eq!(c.bit_size, 0);
    }

    #[test]
    fn test_advance_keeps_bit_remainder() {
        // 1 offset bit + 5 read bits = 6 bits, no whole byte, remainder 6
        let mut c = Cursor::new();
        c.bit_offset = 1;
        c.bit_size = 5;
        c.advance_past_read();
        assert_eq!(c.byte_offset, 0);
        assert_eq!(c.bit_offset, 6);
        assert_eq!(c.bit_size, 0);
    }

    #[test]
    fn test_snapshot_restore_resets_sizes() {
        let mut c = Cursor::new();
        c.byte_offset = 8;
        c.bit_offset = 2;
        c.start_offset = 4;
        let snap = c.snapshot();

        c.byte_offset = 100;
        c.byte_size = 7;
        c.bit_offset = 5;
        c.bit_size = 3;
        c.endian = Endianness::Big;
        c.restore(snap);

        assert_eq!(c.byte_offset, 8);
        assert_eq!(c.bit_offset, 2);
        assert_eq!(c.start_offset, 4);
        assert_eq!(c.byte_size, 0);
        assert_eq!(c.bit_size, 0);
        // endianness is not part of the snapshot
        assert_eq!(c.endian, Endianness::Big);
    }

    #[test]
    fn test_display_offset_can_go_negative() {
        let mut c = Cursor::new();
        c.start_offset = 16;
        c.byte_offset = 12;
        assert_eq!(c.display_offset(), -4);
    }
}
