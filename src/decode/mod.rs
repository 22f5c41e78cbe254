//! Value decoders over the current read window.
//!
//! Every decoder interprets the window described by the reader's cursor — either
//! `byte_offset/byte_size` for byte-wise reads or `byte_offset/bit_offset/bit_size`
//! for bit-wise reads, never both — and none of them advances the cursor. This lets
//! one read be decoded several ways (hex, decimal, signed) without re-reading.
//!
//! # Key Components
//!
//! - [`crate::decode::Value`] - A decoded textual value with an optional hover
//!   annotation
//! - [`number`] - Native `f64` unsigned/signed decoding (approximate past 7 bytes)
//! - [`exact`] - Arbitrary-precision decimal and hex decoding, exact for any width
//! - [`float`] - IEEE-754 reconstruction for 4/8-byte and 32/64-bit windows
//! - [`bits`] - Bit-string rendering
//! - [`text`] - Raw byte-to-character strings
//! - [`series`] - Fixed-stride numeric sample extraction for charting

pub(crate) mod bits;
pub(crate) mod exact;
pub(crate) mod float;
pub(crate) mod number;
pub(crate) mod series;
pub(crate) mod text;

pub use series::SampleFormat;

use std::fmt;

use crate::{cursor::Endianness, reader::Reader, Result};

/// A decoded value: the primary textual representation plus an optional secondary
/// "hover" representation.
///
/// The hover text is not part of the value's identity; it is an auxiliary rendering
/// (say, the hex form of a decimal value) that the tree builder attaches to the row
/// so a UI can show it on demand. Decoders return it explicitly rather than
/// smuggling it on the primary value.
///
/// # Examples
///
/// ```rust
/// use bytescope::Value;
///
/// let plain: Value = "IHDR".into();
/// assert!(plain.hover.is_none());
///
/// let annotated = Value::new("4096").with_hover("Hex: 0x1000");
/// assert_eq!(annotated.to_string(), "4096");
/// assert_eq!(annotated.hover.as_deref(), Some("Hex: 0x1000"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    /// The primary textual representation.
    pub text: String,
    /// An optional secondary representation shown on demand.
    pub hover: Option<String>,
}

impl Value {
    /// Create a value with no hover annotation.
    pub fn new(text: impl Into<String>) -> Self {
        Value {
            text: text.into(),
            hover: None,
        }
    }

    /// Attach a hover annotation.
    #[must_use]
    pub fn with_hover(mut self, hover: impl Into<String>) -> Self {
        self.hover = Some(hover.into());
        self
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::new(text)
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::new(text)
    }
}

impl<'a> Reader<'a> {
    /// The window's bytes normalized to most-significant-byte-first display order.
    ///
    /// Byte-wise windows are reordered when the active endianness is little; a
    /// bit-wise window packs its bits (consumed least-significant-first) into
    /// `ceil(n/8)` bytes, most-significant group first. This is the canonical form
    /// the exact decimal/hex decoders and the bit-string renderer work from.
    pub(crate) fn window_bytes_be(&self) -> Result<Vec<u8>> {
        if self.cursor().bit_size > 0 {
            self.ensure_bit_window()?;
            let n = self.cursor().bit_size;
            let mut packed = vec![0u8; n.div_ceil(8)];
            for i in 0..n {
                if self.window_bit(i) {
                    packed[i / 8] |= 1 << (i % 8);
                }
            }
            packed.reverse();
            Ok(packed)
        } else {
            let window = self.byte_window()?;
            let mut bytes = window.to_vec();
            if self.cursor().endian == Endianness::Little {
                bytes.reverse();
            }
            Ok(bytes)
        }
    }

    /// Total number of bits covered by the current window.
    pub(crate) fn window_bit_len(&self) -> usize {
        if self.cursor().bit_size > 0 {
            self.cursor().bit_size
        } else {
            self.cursor().byte_size * 8
        }
    }
}
