//! Fixed-stride numeric sample extraction.
//!
//! Charting consumers need an entire numeric series out of one read window rather
//! than a single value. Extraction is byte-wise only: repeated fixed-width samples
//! starting at a relative offset inside the window, with an optional gap between
//! consecutive samples.

use strum::{Display, EnumString};

use crate::{
    decode::number::{signed_f64, unsigned_f64},
    reader::Reader,
    Result,
};

/// Interpretation of each extracted sample.
///
/// The string tokens accepted by [`Reader::data_series`] are `"u"` and `"i"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum SampleFormat {
    /// Unsigned samples.
    #[strum(serialize = "u")]
    Unsigned,
    /// Signed (two's-complement) samples.
    #[strum(serialize = "i")]
    Signed,
}

impl<'a> Reader<'a> {
    /// Extract repeated fixed-width samples from the current byte-wise window.
    ///
    /// Samples of `sample_size` bytes are decoded starting at `offset` bytes into
    /// the window, advancing by `sample_size + skip` between samples, until the
    /// next sample would pass the window end. Each sample honors the active
    /// endianness; `format` selects unsigned (`"u"`) or signed (`"i"`)
    /// interpretation. Samples wider than 7 bytes lose precision to `f64`
    /// rounding, like [`Reader::number_value`].
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] for a zero `sample_size` or an
    /// unknown format token, [`crate::Error::PreconditionViolation`] while a
    /// bit-wise read is active, and [`crate::Error::OutOfBounds`] if the window
    /// does not lie inside the buffer.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bytescope::Reader;
    ///
    /// let data = [0x01, 0x00, 0xFF, 0xFF, 0x10, 0x00];
    /// let mut reader = Reader::new(&data);
    /// reader.read_remaining()?;
    /// assert_eq!(reader.data_series(2, 0, "i", 0)?, vec![1.0, -1.0, 16.0]);
    /// # Ok::<(), bytescope::Error>(())
    /// ```
    pub fn data_series(
        &self,
        sample_size: usize,
        offset: usize,
        format: &str,
        skip: usize,
    ) -> Result<Vec<f64>> {
        if self.cursor().bit_size > 0 {
            return Err(precondition_error!(
                "sample extraction requires a byte-wise read window"
            ));
        }
        if sample_size == 0 {
            return Err(invalid_argument_error!("sample size must be at least 1"));
        }
        let format: SampleFormat = format
            .parse()
            .map_err(|_| invalid_argument_error!("unknown sample format '{format}'"))?;

        let window = self.byte_window()?;
        let endian = self.cursor().endian;
        let mut samples = Vec::new();
        let mut pos = offset;
        while pos + sample_size <= window.len() {
            let sample = &window[pos..pos + sample_size];
            samples.push(match format {
                SampleFormat::Unsigned => unsigned_f64(sample, endian),
                SampleFormat::Signed => signed_f64(sample, endian),
            });
            pos += sample_size + skip;
        }
        Ok(samples)
    }
}
