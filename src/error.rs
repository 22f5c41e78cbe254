use thiserror::Error;

macro_rules! invalid_argument_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::InvalidArgument {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidArgument {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! precondition_error {
    ($msg:expr) => {
        crate::Error::PreconditionViolation {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::PreconditionViolation {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all failures this library can
/// potentially return.
///
/// Every reader and decoder failure aborts the current decode callback; nothing is
/// retried internally and no default value is ever substituted. The tree builder keeps
/// whatever rows were completed before the failure so that prior siblings stay visible,
/// and the failure itself is handed back to the host for user-visible reporting.
///
/// # Error Categories
///
/// ## Cursor and Reader Errors
/// - [`Error::OutOfBounds`] - Read or seek exceeds the buffer bounds
/// - [`Error::InvalidArgument`] - Wrong argument shape (unknown endianness token,
///   negative offset, malformed sample series parameters)
///
/// ## Decoder Errors
/// - [`Error::UnsupportedSize`] - Float decode attempted on a window that is not
///   4/8 bytes or 32/64 bits
/// - [`Error::PreconditionViolation`] - Operation requirements not met, such as a
///   non-byte-aligned bit window for float decode or a details group with no
///   preceding row
///
/// ## Script Errors
/// - [`Error::Script`] - Failure raised by the decode callback itself
///
/// # Examples
///
/// ```rust
/// use bytescope::{Error, Reader};
///
/// let data = [0x01, 0x02];
/// let mut reader = Reader::new(&data);
///
/// match reader.read(8) {
///     Err(Error::OutOfBounds) => eprintln!("window exceeds the buffer"),
///     Err(e) => eprintln!("other failure: {}", e),
///     Ok(()) => unreachable!(),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// An out of bound access was attempted on the buffer.
    ///
    /// This error occurs when a read window or seek target would fall outside the
    /// buffer in either direction. It is raised before any cursor state is mutated,
    /// so a caught failure leaves the cursor exactly as it was.
    #[error("Out of bound read would have occurred!")]
    OutOfBounds,

    /// An argument had the wrong type or shape.
    ///
    /// Raised for unknown endianness tokens, negative seek offsets, zero-width
    /// sample sizes and similar malformed inputs. The error includes the source
    /// location where the bad argument was detected for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Invalid argument - {file}:{line}: {message}")]
    InvalidArgument {
        /// The message to be printed for the `InvalidArgument` error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A float decode was attempted on a window of an unsupported size.
    ///
    /// IEEE-754 reconstruction only works on windows of exactly 4 or 8 bytes, or
    /// 32 or 64 bits. The fields carry the offending window dimensions; exactly
    /// one of them is non-zero.
    #[error("Unsupported window size for float decode - {byte_size} bytes / {bit_size} bits")]
    UnsupportedSize {
        /// Byte width of the offending window (zero for a bit-wise window)
        byte_size: usize,
        /// Bit width of the offending window (zero for a byte-wise window)
        bit_size: usize,
    },

    /// A precondition of the requested operation was not met.
    ///
    /// Examples: decoding a float from a bit window that does not start on a byte
    /// boundary, or declaring a details group before any row exists to attach it to.
    #[error("Precondition violated - {file}:{line}: {message}")]
    PreconditionViolation {
        /// The message to be printed for the `PreconditionViolation` error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A failure raised by the decode callback itself.
    ///
    /// Decode scripts can abort with a custom message; the host surfaces it the
    /// same way as any engine failure.
    #[error("{0}")]
    Script(String),
}
