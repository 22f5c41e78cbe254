//! IEEE-754 float reconstruction.
//!
//! Supported window shapes: exactly 4 or 8 bytes, or exactly 32 or 64 bits with a
//! zero bit offset (only byte-aligned bit windows carry a float). The window bytes
//! are first normalized to big-endian order, then sign, exponent and mantissa are
//! extracted manually and the value rebuilt, including the special cases: an
//! all-ones exponent is ±infinity (zero mantissa) or NaN (non-zero mantissa), and
//! an all-zero exponent collapses to zero — denormals are not supported.

use crate::{cursor::Endianness, reader::Reader, Error, Result};

/// Rebuild an `f32`-shaped value from 4 big-endian bytes.
fn f32_from_be(be: &[u8]) -> f64 {
    let sign = if be[0] & 0x80 != 0 { -1.0 } else { 1.0 };
    let exponent = (u32::from(be[0] & 0x7F) << 1) | u32::from(be[1] >> 7);
    let mantissa =
        (u32::from(be[1] & 0x7F) << 16) | (u32::from(be[2]) << 8) | u32::from(be[3]);

    if exponent == 0xFF {
        return if mantissa == 0 {
            sign * f64::INFINITY
        } else {
            f64::NAN
        };
    }
    if exponent == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_possible_wrap)] // exponent <= 0xFE
    let scale = 2f64.powi(exponent as i32 - 127);
    sign * (1.0 + f64::from(mantissa) / f64::from(1u32 << 23)) * scale
}

/// Rebuild an `f64`-shaped value from 8 big-endian bytes.
fn f64_from_be(be: &[u8]) -> f64 {
    let sign = if be[0] & 0x80 != 0 { -1.0 } else { 1.0 };
    let exponent = (u32::from(be[0] & 0x7F) << 4) | u32::from(be[1] >> 4);
    let mut mantissa = u64::from(be[1] & 0x0F);
    for &b in &be[2..8] {
        mantissa = (mantissa << 8) | u64::from(b);
    }

    if exponent == 0x7FF {
        return if mantissa == 0 {
            sign * f64::INFINITY
        } else {
            f64::NAN
        };
    }
    if exponent == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_possible_wrap)] // exponent <= 0x7FE
    let scale = 2f64.powi(exponent as i32 - 1023);
    #[allow(clippy::cast_precision_loss)] // 52-bit mantissa fits f64 exactly
    let fraction = mantissa as f64 / (1u64 << 52) as f64;
    sign * (1.0 + fraction) * scale
}

impl<'a> Reader<'a> {
    /// Decode the current window as an IEEE-754 float.
    ///
    /// Byte windows must be exactly 4 or 8 bytes wide; bit windows must be exactly
    /// 32 or 64 bits wide and start on a byte boundary. The bytes are normalized
    /// per the active endianness before the sign/exponent/mantissa fields are
    /// extracted.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnsupportedSize`] for any other window shape,
    /// [`crate::Error::PreconditionViolation`] for a bit window that does not start
    /// on a byte boundary, and [`crate::Error::OutOfBounds`] if the window does not
    /// lie inside the buffer.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bytescope::Reader;
    ///
    /// let data = [0x3F, 0x80, 0x00, 0x00];
    /// let mut reader = Reader::new(&data);
    /// reader.set_endianness("big")?;
    /// reader.read(4)?;
    /// assert_eq!(reader.float_value()?, 1.0);
    /// # Ok::<(), bytescope::Error>(())
    /// ```
    pub fn float_value(&self) -> Result<f64> {
        let cursor = self.cursor();
        let be: Vec<u8> = if cursor.bit_size > 0 {
            if cursor.bit_offset != 0 {
                return Err(precondition_error!(
                    "float decode requires a byte-aligned bit window, bit offset is {}",
                    cursor.bit_offset
                ));
            }
            if cursor.bit_size != 32 && cursor.bit_size != 64 {
                return Err(Error::UnsupportedSize {
                    byte_size: 0,
                    bit_size: cursor.bit_size,
                });
            }
            self.ensure_bit_window()?;
            let width = cursor.bit_size / 8;
            let mut bytes = self.data()[cursor.byte_offset..cursor.byte_offset + width].to_vec();
            if cursor.endian == Endianness::Little {
                bytes.reverse();
            }
            bytes
        } else {
            if cursor.byte_size != 4 && cursor.byte_size != 8 {
                return Err(Error::UnsupportedSize {
                    byte_size: cursor.byte_size,
                    bit_size: 0,
                });
            }
            self.window_bytes_be()?
        };

        Ok(if be.len() == 4 {
            f32_from_be(&be)
        } else {
            f64_from_be(&be)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_f32_be(bytes: [u8; 4]) -> f64 {
        let data = bytes;
        let mut reader = Reader::new(&data);
        reader.set_endianness("big").unwrap();
        reader.read(4).unwrap();
        reader.float_value().unwrap()
    }

    #[test]
    fn test_f32_one() {
        assert_eq!(read_f32_be([0x3F, 0x80, 0x00, 0x00]), 1.0);
    }

    #[test]
    fn test_f32_infinities_and_nan() {
        assert_eq!(read_f32_be([0x7F, 0x80, 0x00, 0x00]), f64::INFINITY);
        assert_eq!(read_f32_be([0xFF, 0x80, 0x00, 0x00]), f64::NEG_INFINITY);
        assert!(read_f32_be([0x7F, 0xFF, 0xFF, 0xFF]).is_nan());
    }

    #[test]
    fn test_f32_denormals_collapse_to_zero() {
        assert_eq!(read_f32_be([0x00, 0x00, 0x00, 0x01]), 0.0);
        assert_eq!(read_f32_be([0x80, 0x00, 0x00, 0x01]), 0.0);
    }

    #[test]
    fn test_f32_little_endian() {
        // -2.5f32 = 0xC0200000, stored little-endian
        let data = [0x00, 0x00, 0x20, 0xC0];
        let mut reader = Reader::new(&data);
        reader.read(4).unwrap();
        assert_eq!(reader.float_value().unwrap(), -2.5);
    }

    #[test]
    fn test_f32_matches_native_for_normals() {
        for v in [0.5f32, 1.5, -3.75, 1024.125, 3.14159] {
            let be = v.to_be_bytes();
            assert_eq!(read_f32_be(be), f64::from(v), "value {v}");
        }
    }

    #[test]
    fn test_f64_values() {
        for v in [1.0f64, -0.25, 6.02214076e23, -1.7e300] {
            let data = v.to_le_bytes();
            let mut reader = Reader::new(&data);
            reader.read(8).unwrap();
            assert_eq!(reader.float_value().unwrap(), v, "value {v}");
        }
    }

    #[test]
    fn test_f64_specials() {
        let data = f64::INFINITY.to_be_bytes();
        let mut reader = Reader::new(&data);
        reader.set_endianness("big").unwrap();
        reader.read(8).unwrap();
        assert_eq!(reader.float_value().unwrap(), f64::INFINITY);

        let data = f64::NAN.to_be_bytes();
        let mut reader = Reader::new(&data);
        reader.set_endianness("big").unwrap();
        reader.read(8).unwrap();
        assert!(reader.float_value().unwrap().is_nan());
    }

    #[test]
    fn test_unsupported_sizes() {
        let data = [0u8; 16];
        let mut reader = Reader::new(&data);
        reader.read(3).unwrap();
        assert!(matches!(
            reader.float_value(),
            Err(Error::UnsupportedSize {
                byte_size: 3,
                bit_size: 0
            })
        ));

        let mut reader = Reader::new(&data);
        reader.read_bits(16).unwrap();
        assert!(matches!(
            reader.float_value(),
            Err(Error::UnsupportedSize {
                byte_size: 0,
                bit_size: 16
            })
        ));
    }

    #[test]
    fn test_bit_window_requires_alignment() {
        let data = [0u8; 16];
        let mut reader = Reader::new(&data);
        reader.read_bits(3).unwrap();
        reader.read_bits(32).unwrap();
        assert!(matches!(
            reader.float_value(),
            Err(Error::PreconditionViolation { .. })
        ));
    }

    #[test]
    fn test_aligned_bit_window() {
        let data = [0x00, 0x00, 0x80, 0x3F];
        let mut reader = Reader::new(&data);
        reader.read_bits(32).unwrap();
        assert_eq!(reader.float_value().unwrap(), 1.0);
    }
}
