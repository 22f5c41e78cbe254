//! Arbitrary-precision decimal and hex decoding.
//!
//! Decimal and hex renderings must be bit-exact for windows of any byte length,
//! well past what native integers or `f64` can represent, so this module works on
//! raw byte arrays with limb arithmetic instead of machine numbers. Conversion to
//! decimal runs base-256 digits through an accumulator of base-10^9 limbs; signed
//! values negate exactly via byte-wise complement and carry.
//!
//! Hex output is always most-significant-byte first regardless of the source
//! endianness — the decoder reorders little-endian windows into display order.
//! Bit-wise windows pack their bits into byte-sized groups starting from the most
//! significant consumed bits.

use crate::{reader::Reader, Result, Value};

const LIMB_BASE: u64 = 1_000_000_000;

/// Exact decimal rendering of a most-significant-first byte array.
pub(crate) fn decimal_from_be_bytes(bytes: &[u8]) -> String {
    // Little-endian vector of base-10^9 limbs
    let mut limbs: Vec<u32> = vec![0];
    for &byte in bytes {
        let mut carry = u64::from(byte);
        for limb in &mut limbs {
            let v = u64::from(*limb) * 256 + carry;
            #[allow(clippy::cast_possible_truncation)] // < LIMB_BASE by construction
            {
                *limb = (v % LIMB_BASE) as u32;
            }
            carry = v / LIMB_BASE;
        }
        while carry > 0 {
            #[allow(clippy::cast_possible_truncation)]
            limbs.push((carry % LIMB_BASE) as u32);
            carry /= LIMB_BASE;
        }
    }

    let mut out = limbs[limbs.len() - 1].to_string();
    for limb in limbs.iter().rev().skip(1) {
        out.push_str(&format!("{limb:09}"));
    }
    out
}

/// Hex rendering of a most-significant-first byte array, two digits per byte.
pub(crate) fn hex_from_be_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        out.push_str(&format!("{byte:02X}"));
    }
    out
}

/// Exact two's-complement negation: complement every byte, mask the top byte down
/// to `bit_len` bits when the window is bit-wise, then add one with carry.
fn negate_twos_complement_be(bytes: &[u8], bit_len: usize) -> Vec<u8> {
    let mut magnitude: Vec<u8> = bytes.iter().map(|b| !b).collect();
    let top_bits = bit_len % 8;
    if top_bits != 0 && !magnitude.is_empty() {
        magnitude[0] &= (1 << top_bits) - 1;
    }
    for byte in magnitude.iter_mut().rev() {
        let (v, overflow) = byte.overflowing_add(1);
        *byte = v;
        if !overflow {
            return magnitude;
        }
    }
    magnitude.insert(0, 1);
    magnitude
}

impl<'a> Reader<'a> {
    /// Exact unsigned decimal string for the current window, any width.
    pub(crate) fn decimal_string(&self) -> Result<String> {
        Ok(decimal_from_be_bytes(&self.window_bytes_be()?))
    }

    /// Exact signed (two's-complement) decimal string for the current window.
    pub(crate) fn signed_decimal_string(&self) -> Result<String> {
        let bytes = self.window_bytes_be()?;
        let bit_len = self.window_bit_len();
        if bit_len == 0 {
            return Ok("0".to_string());
        }

        // Sign bit: the highest consumed bit of the normalized representation
        let top_bit_in_byte = (bit_len - 1) % 8;
        let negative = (bytes[0] >> top_bit_in_byte) & 1 == 1;
        if !negative {
            return Ok(decimal_from_be_bytes(&bytes));
        }
        let magnitude = negate_twos_complement_be(&bytes, bit_len);
        Ok(format!("-{}", decimal_from_be_bytes(&magnitude)))
    }

    /// Hex string for the current window, most-significant byte first.
    pub(crate) fn hex_string(&self) -> Result<String> {
        Ok(hex_from_be_bytes(&self.window_bytes_be()?))
    }

    /// Decode the current window as an exact decimal value.
    ///
    /// Bit-exact for any window width. The hex rendering of the same window is
    /// attached as the hover annotation.
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
    /// let data = [0x00, 0x10];
    /// let mut reader = Reader::new(&data);
    /// reader.read(2)?;
    /// let value = reader.decimal_value()?;
    /// assert_eq!(value.text, "4096");
    /// assert_eq!(value.hover.as_deref(), Some("Hex: 0x1000"));
    /// # Ok::<(), bytescope::Error>(())
    /// ```
    pub fn decimal_value(&self) -> Result<Value> {
        let text = self.decimal_string()?;
        let hex = self.hex_string()?;
        Ok(Value::new(text).with_hover(format!("Hex: 0x{hex}")))
    }

    /// Decode the current window as an exact signed decimal value.
    ///
    /// Mirrors the sign test of [`Reader::signed_number_value`] and negates with
    /// exact arithmetic, so any width stays bit-exact. The raw window's hex
    /// rendering is attached as the hover annotation.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the window does not lie inside the
    /// buffer.
    pub fn signed_decimal_value(&self) -> Result<Value> {
        let text = self.signed_decimal_string()?;
        let hex = self.hex_string()?;
        Ok(Value::new(text).with_hover(format!("Hex: 0x{hex}")))
    }

    /// Decode the current window as a hex value without a `0x` prefix.
    ///
    /// Each byte becomes two digits, most-significant byte first regardless of the
    /// source endianness. The exact decimal rendering is attached as the hover
    /// annotation.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the window does not lie inside the
    /// buffer.
    pub fn hex_value(&self) -> Result<Value> {
        let text = self.hex_string()?;
        let dec = self.decimal_string()?;
        Ok(Value::new(text).with_hover(format!("Dec: {dec}")))
    }

    /// Decode the current window as a hex value with a `0x` prefix.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the window does not lie inside the
    /// buffer.
    pub fn hex0x_value(&self) -> Result<Value> {
        let text = self.hex_string()?;
        let dec = self.decimal_string()?;
        Ok(Value::new(format!("0x{text}")).with_hover(format!("Dec: {dec}")))
    }
}
