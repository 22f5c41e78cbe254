//! Raw string decoding.

use crate::{reader::Reader, Result};

impl<'a> Reader<'a> {
    /// Decode the current byte-wise window as a string, one byte per character.
    ///
    /// No encoding validation takes place: every byte maps directly to the char
    /// with the same code point, so bytes above `0x7F` come out as the
    /// corresponding Latin-1 characters.
    ///
    /// # Errors
    /// Returns [`crate::Error::PreconditionViolation`] while a bit-wise read is
    /// active and [`crate::Error::OutOfBounds`] if the window does not lie inside
    /// the buffer.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bytescope::Reader;
    ///
    /// let data = [b'R', b'I', b'F', b'F'];
    /// let mut reader = Reader::new(&data);
    /// reader.read(4)?;
    /// assert_eq!(reader.string_value()?, "RIFF");
    /// # Ok::<(), bytescope::Error>(())
    /// ```
    pub fn string_value(&self) -> Result<String> {
        if self.cursor().bit_size > 0 {
            return Err(precondition_error!(
                "string decode requires a byte-wise read window"
            ));
        }
        Ok(self.byte_window()?.iter().map(|&b| b as char).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_ascii() {
        let data = b"MZ\x90\x00abc";
        let mut reader = Reader::new(data);
        reader.read(2).unwrap();
        assert_eq!(reader.string_value().unwrap(), "MZ");
    }

    #[test]
    fn test_high_bytes_map_to_latin1() {
        let data = [0x41, 0xE9, 0xFF];
        let mut reader = Reader::new(&data);
        reader.read(3).unwrap();
        assert_eq!(reader.string_value().unwrap(), "Aéÿ");
    }

    #[test]
    fn test_rejects_bit_window() {
        let data = [0xFF];
        let mut reader = Reader::new(&data);
        reader.read_bits(4).unwrap();
        assert!(matches!(
            reader.string_value(),
            Err(Error::PreconditionViolation { .. })
        ));
    }

    #[test]
    fn test_empty_window() {
        let data = [0x41];
        let reader = Reader::new(&data);
        assert_eq!(reader.string_value().unwrap(), "");
    }
}
