//! Native numeric decoding with positional-weight summation.
//!
//! These decoders produce machine `f64` values. For byte windows of 7 bytes and
//! more the result is only approximately accurate (IEEE-754 double precision, not
//! exact); [`crate::decode::exact`] provides the exact decimal path for arbitrary
//! widths.

use crate::{cursor::Endianness, reader::Reader, Result};

/// Unsigned positional-weight sum over a byte slice.
pub(crate) fn unsigned_f64(bytes: &[u8], endian: Endianness) -> f64 {
    let mut value = 0.0;
    let mut weight = 1.0;
    match endian {
        Endianness::Little => {
            for &b in bytes {
                value += f64::from(b) * weight;
                weight *= 256.0;
            }
        }
        Endianness::Big => {
            for &b in bytes.iter().rev() {
                value += f64::from(b) * weight;
                weight *= 256.0;
            }
        }
    }
    value
}

/// Two's-complement positional-weight sum over a byte slice.
///
/// The sign-determining byte is the last byte in little-endian order and the first
/// in big-endian order. When its top bit is clear the value equals the unsigned
/// sum; otherwise the negative value is `-(sum of (255 - byte) * weight) - 1`,
/// which avoids forming `2^(8*width)` explicitly.
pub(crate) fn signed_f64(bytes: &[u8], endian: Endianness) -> f64 {
    if bytes.is_empty() {
        return 0.0;
    }
    let sign_byte = match endian {
        Endianness::Little => bytes[bytes.len() - 1],
        Endianness::Big => bytes[0],
    };
    if sign_byte <= 0x7F {
        return unsigned_f64(bytes, endian);
    }

    let mut value = 0.0;
    let mut weight = 1.0;
    let iter: Box<dyn Iterator<Item = &u8>> = match endian {
        Endianness::Little => Box::new(bytes.iter()),
        Endianness::Big => Box::new(bytes.iter().rev()),
    };
    for &b in iter {
        value += f64::from(255 - b) * weight;
        weight *= 256.0;
    }
    -value - 1.0
}

impl<'a> Reader<'a> {
    /// Decode the current window as an unsigned number.
    ///
    /// Byte-wise windows honor the active endianness; bit-wise windows are always
    /// consumed least-significant-bit-first from the window start, independent of
    /// the endianness flag. An empty window decodes to zero.
    ///
    /// Byte windows of 7 bytes and more lose precision to `f64` rounding; use
    /// [`Reader::decimal_value`] when the exact value matters.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the window does not lie inside the
    /// buffer.
    pub fn number_value(&self) -> Result<f64> {
        if self.cursor().bit_size > 0 {
            self.ensure_bit_window()?;
            let mut value = 0.0;
            let mut weight = 1.0;
            for i in 0..self.cursor().bit_size {
                if self.window_bit(i) {
                    value += weight;
                }
                weight *= 2.0;
            }
            return Ok(value);
        }
        Ok(unsigned_f64(self.byte_window()?, self.cursor().endian))
    }

    /// Decode the current window as a signed (two's-complement) number.
    ///
    /// For bit-wise windows the positive and negative candidates are accumulated
    /// in a single scan and the final (highest) bit selects between them. The same
    /// precision limits as [`Reader::number_value`] apply.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the window does not lie inside the
    /// buffer.
    pub fn signed_number_value(&self) -> Result<f64> {
        if self.cursor().bit_size > 0 {
            self.ensure_bit_window()?;
            let n = self.cursor().bit_size;
            let mut positive = 0.0;
            let mut complement = 0.0;
            let mut weight = 1.0;
            let mut sign_bit = false;
            for i in 0..n {
                let bit = self.window_bit(i);
                if bit {
                    positive += weight;
                } else {
                    complement += weight;
                }
                weight *= 2.0;
                sign_bit = bit;
            }
            return Ok(if sign_bit { -complement - 1.0 } else { positive });
        }
        Ok(signed_f64(self.byte_window()?, self.cursor().endian))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsigned_byte_windows() {
        let data = [0x34, 0x12, 0x00, 0x80];
        let mut reader = Reader::new(&data);

        reader.read(2).unwrap();
        assert_eq!(reader.number_value().unwrap(), 0x1234 as f64);

        reader.set_endianness("big").unwrap();
        assert_eq!(reader.number_value().unwrap(), 0x3412 as f64);

        reader.set_endianness("little").unwrap();
        reader.read(2).unwrap();
        assert_eq!(reader.number_value().unwrap(), 0x8000 as f64);
    }

    #[test]
    fn test_unsigned_widths_one_through_eight() {
        // value = sum byte[i] * 256^i for little-endian windows
        let data: Vec<u8> = (1..=8).collect();
        for width in 1..=8usize {
            let mut reader = Reader::new(&data);
            reader.read(width as i64).unwrap();
            let expected: f64 = data[..width]
                .iter()
                .enumerate()
                .map(|(i, &b)| f64::from(b) * 256f64.powi(i as i32))
                .sum();
            assert_eq!(reader.number_value().unwrap(), expected, "width {width}");
        }
    }

    #[test]
    fn test_unsigned_bit_window() {
        // 0b1111_0110 -> skip 1 bit, take 5: 11011 = 27
        let data = [0b1111_0110];
        let mut reader = Reader::new(&data);
        reader.read_bits(1).unwrap();
        reader.read_bits(5).unwrap();
        assert_eq!(reader.number_value().unwrap(), 27.0);
    }

    #[test]
    fn test_signed_single_byte() {
        let data = [0xFE];
        let mut reader = Reader::new(&data);
        reader.read(1).unwrap();
        assert_eq!(reader.signed_number_value().unwrap(), -2.0);

        reader.set_endianness("big").unwrap();
        assert_eq!(reader.signed_number_value().unwrap(), -2.0);
    }

    #[test]
    fn test_signed_multi_byte() {
        // 0xFFFE little-endian = -2; big-endian 0xFEFF = -257
        let data = [0xFE, 0xFF];
        let mut reader = Reader::new(&data);
        reader.read(2).unwrap();
        assert_eq!(reader.signed_number_value().unwrap(), -2.0);

        reader.set_endianness("big").unwrap();
        assert_eq!(reader.signed_number_value().unwrap(), -257.0);
    }

    #[test]
    fn test_signed_positive_stays_unsigned() {
        let data = [0x34, 0x12];
        let mut reader = Reader::new(&data);
        reader.read(2).unwrap();
        assert_eq!(reader.signed_number_value().unwrap(), 0x1234 as f64);
    }

    #[test]
    fn test_signed_equals_unsigned_minus_two_pow_width() {
        let data = [0x01, 0x02, 0x83, 0xF4];
        for width in 1..=4usize {
            let mut reader = Reader::new(&data);
            reader.read(width as i64).unwrap();
            let unsigned = reader.number_value().unwrap();
            let signed = reader.signed_number_value().unwrap();
            let top_set = data[width - 1] > 0x7F;
            let expected = if top_set {
                unsigned - 256f64.powi(width as i32)
            } else {
                unsigned
            };
            assert_eq!(signed, expected, "width {width}");
        }
    }

    #[test]
    fn test_signed_bit_window() {
        // 3 bits 0b110 (MSB first) stored LSB-first: value bits b0=0 b1=1 b2=1 -> -2
        let data = [0b0000_0110];
        let mut reader = Reader::new(&data);
        reader.read_bits(3).unwrap();
        assert_eq!(reader.signed_number_value().unwrap(), -2.0);

        // 3 bits 0b010 -> +2
        let data = [0b0000_0010];
        let mut reader = Reader::new(&data);
        reader.read_bits(3).unwrap();
        assert_eq!(reader.signed_number_value().unwrap(), 2.0);
    }

    #[test]
    fn test_empty_window_is_zero() {
        let data = [0xFF];
        let reader = Reader::new(&data);
        assert_eq!(reader.number_value().unwrap(), 0.0);
        assert_eq!(reader.signed_number_value().unwrap(), 0.0);
    }
}
