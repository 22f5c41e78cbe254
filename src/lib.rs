// Copyright 2026 The bytescope contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]
#![deny(unsafe_code)]

//! # bytescope
//!
//! A binary file decoding engine: point a small decode script at a byte
//! buffer and get back a hierarchical, human-readable table of offsets,
//! sizes, names, and values. Built for hex-viewer style tooling where the
//! user describes a format declaratively and the engine does the cursor
//! bookkeeping, the numeric decoding, and the lazy expansion of large
//! sub-sections.
//!
//! ## Features
//!
//! - **Byte and bit cursors** - interleave byte-wise and bit-wise reads with
//!   exact re-synchronization between the two
//! - **Exact numeric decoding** - arbitrary-width decimal and hex rendering
//!   beyond native integer precision, plus IEEE-754 floats and raw bit strings
//! - **Lazy detail sections** - defer decoding of large sub-structures until
//!   the user expands them, with correct offset bookkeeping across suspension
//! - **Atomic failure** - a read past the end of the buffer leaves the cursor
//!   untouched, and a failing script keeps every row decoded before the failure
//! - **No I/O** - the engine only ever sees a borrowed byte slice; files,
//!   clocks, and the environment stay with the host
//!
//! ## Quick Start
//!
//! Add `bytescope` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! bytescope = "0.1"
//! ```
//!
//! ### Decoding a buffer
//!
//! ```rust
//! use bytescope::prelude::*;
//!
//! let data = [0x89u8, b'P', b'N', b'G', 0x00, 0x00, 0x00, 0x0D];
//! let doc = Document::parse(&data, ParseOptions::default(), |scope| {
//!     scope.read(4)?;
//!     scope.add_row("magic", scope.hex_value()?);
//!     scope.set_endianness("big")?;
//!     scope.read(4)?;
//!     scope.add_row("length", scope.decimal_value()?);
//!     Ok(())
//! });
//!
//! assert!(doc.last_error().is_none());
//! for (depth, _, node) in doc.rows() {
//!     println!("{:indent$}{} = {}", "", node.row.name, node.row.value, indent = depth * 2);
//! }
//! ```
//!
//! ### Lazy sections
//!
//! A section declared with `opened = false` records a continuation instead of
//! decoding immediately. The host fires it when the user expands the row:
//!
//! ```rust
//! use bytescope::prelude::*;
//!
//! let data = [0x02u8, 0x10, 0x20];
//! let mut doc = Document::parse(&data, ParseOptions::default(), |scope| {
//!     scope.read(1)?;
//!     let count = scope.number_value()? as i64;
//!     scope.add_row("count", count.to_string());
//!     scope.add_details(move |s| {
//!         s.read(count)?;
//!         s.add_row("entries", s.hex_value()?);
//!         Ok(())
//!     }, false)?;
//!     Ok(())
//! });
//!
//! let placeholder = doc.tree().root()[0];
//! assert!(doc.expand(placeholder)?);   // runs the deferred callback
//! assert!(!doc.expand(placeholder)?);  // a second trigger is a no-op
//! # Ok::<(), bytescope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! The crate is layered bottom-up:
//!
//! - [`Cursor`] / [`Reader`] - positioning and windowing over the buffer
//! - [`mod@decode`] - value decoders over the current window; none of them
//!   move the cursor
//! - [`Tree`] / [`Scope`] - the display tree and the capability set handed
//!   to decode scripts
//! - [`Document`] - one parse pass over one buffer, plus pending lazy sections

#[macro_use]
pub(crate) mod error;

pub(crate) mod cursor;
pub(crate) mod reader;
pub(crate) mod tree;

/// Convenient re-exports of the most commonly used types.
pub mod prelude;

/// Value decoders over the reader's current window.
///
/// Every decoder renders the window selected by the last `read`/`read_bits`
/// call and leaves the cursor untouched, so the same region can be rendered
/// several ways (decimal, hex, bits) without re-reading.
///
/// # Key Types
///
/// - [`Value`] - decoded text plus an optional secondary hover representation
/// - [`SampleFormat`] - unsigned/signed token for batch series extraction
pub mod decode;

/// The execution boundary between decode scripts and the engine.
///
/// # Key Types
///
/// - [`Scope`] - the complete capability set a script runs against
/// - [`ScriptRegistry`] - named format parsers registered by the host
/// - [`DetailsMode`] - global eager/lazy override for detail sections
pub mod script;

/// A decoded document and its lazy-expansion surface.
pub mod document;

pub use cursor::{Cursor, CursorSnapshot, Endianness};
pub use decode::{SampleFormat, Value};
pub use document::{Document, ParseOptions};
pub use error::Error;
pub use reader::Reader;
pub use script::{DetailsMode, ParserFn, Scope, ScriptRegistry};
pub use tree::{Node, NodeFlags, NodeId, Row, Tree};

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
