//! Bit-string rendering.

use crate::{reader::Reader, Result, Value};

impl<'a> Reader<'a> {
    /// Render the consumed bits as a `'0'`/`'1'` string, most-significant bit
    /// first, with a `_` separator between byte-sized groups.
    ///
    /// Works for both bit-wise and byte-wise windows (a byte window renders all
    /// of its bits). The exact hex representation of the same bits is accumulated
    /// alongside and attached as the hover annotation.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the window does not lie inside the
    /// buffer.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bytescope::Reader;
    ///
    /// let data = [0b1111_0110];
    /// let mut reader = Reader::new(&data);
    /// reader.read_bits(1)?;
    /// reader.read_bits(5)?;
    /// assert_eq!(reader.bits_value()?.text, "11011");
    /// # Ok::<(), bytescope::Error>(())
    /// ```
    pub fn bits_value(&self) -> Result<Value> {
        let bytes = self.window_bytes_be()?;
        let total = self.window_bit_len();

        let mut text = String::with_capacity(total + total / 8);
        for i in (0..total).rev() {
            let byte = bytes[bytes.len() - 1 - i / 8];
            text.push(if (byte >> (i % 8)) & 1 == 1 { '1' } else { '0' });
            if i != 0 && i % 8 == 0 {
                text.push('_');
            }
        }

        let hex = super::exact::hex_from_be_bytes(&bytes);
        Ok(Value::new(text).with_hover(format!("Hex: 0x{hex}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_window_rendering() {
        let data = [0b1111_0110];
        let mut reader = Reader::new(&data);
        reader.read_bits(1).unwrap();
        reader.read_bits(5).unwrap();
        let v = reader.bits_value().unwrap();
        assert_eq!(v.text, "11011");
        assert_eq!(v.hover.as_deref(), Some("Hex: 0x1B"));
    }

    #[test]
    fn test_groups_separated_every_eight_bits() {
        let data = [0xB5, 0x0A];
        let mut reader = Reader::new(&data);
        reader.read_bits(12).unwrap();
        // value 0xAB5 -> 1010 1011 0101, grouped from the least significant end
        let v = reader.bits_value().unwrap();
        assert_eq!(v.text, "1010_10110101");
        assert_eq!(v.hover.as_deref(), Some("Hex: 0x0AB5"));
    }

    #[test]
    fn test_byte_window_renders_all_bits() {
        let data = [0x0F, 0x80];
        let mut reader = Reader::new(&data);
        reader.read(2).unwrap();
        // little-endian: MSB byte is 0x80
        let v = reader.bits_value().unwrap();
        assert_eq!(v.text, "10000000_00001111");
    }

    #[test]
    fn test_empty_window() {
        let data = [0xFF];
        let reader = Reader::new(&data);
        let v = reader.bits_value().unwrap();
        assert_eq!(v.text, "");
    }
}
