//! # bytescope Prelude
//!
//! A convenient prelude for the most commonly used types of the engine.
//! Import this module to write decode scripts without spelling out the
//! individual paths.
//!
//! ```rust
//! use bytescope::prelude::*;
//!
//! let data = [0x01u8, 0x02];
//! let doc = Document::parse(&data, ParseOptions::default(), |scope| {
//!     scope.read(2)?;
//!     scope.add_row("pair", scope.hex_value()?);
//!     Ok(())
//! });
//! assert!(doc.last_error().is_none());
//! ```

/// The error type for all engine operations
pub use crate::Error;

/// The result type used throughout the engine
pub use crate::Result;

/// Main entry point: one parse pass over one buffer
pub use crate::document::{Document, ParseOptions};

/// The capability set handed to decode scripts
pub use crate::script::{DetailsMode, Scope, ScriptRegistry};

/// Low-level positioning and windowing over the buffer
pub use crate::cursor::{Cursor, Endianness};
pub use crate::reader::Reader;

/// Decoded values and batch sample formats
pub use crate::decode::{SampleFormat, Value};

/// The display tree a parse pass produces
pub use crate::tree::{Node, NodeFlags, NodeId, Row, Tree};
