//! The execution boundary between decode scripts and the engine.
//!
//! A decode script is ordinary Rust code handed to the engine as a callback. It
//! runs against a [`Scope`], which is the *complete* capability set a script is
//! given: every reader and decoder operation (forwarded to the underlying
//! [`Reader`]) plus the tree-building operations. Nothing else of the host is
//! reachable through a scope, so a script cannot touch files, the clock, or any
//! state outside its buffer and its tree.
//!
//! # Examples
//!
//! ```rust
//! use bytescope::{Document, ParseOptions};
//!
//! let data = [0x04u8, 0xD2, b'h', b'i'];
//! let doc = Document::parse(&data, ParseOptions::default(), |scope| {
//!     scope.set_endianness("big")?;
//!     scope.read(2)?;
//!     let id = scope.decimal_value()?;
//!     scope.add_row("id", id);
//!     scope.read(2)?;
//!     let tag = scope.string_value()?;
//!     scope.add_row("tag", tag);
//!     Ok(())
//! });
//! assert!(doc.last_error().is_none());
//! assert_eq!(doc.tree().root().len(), 2);
//! ```

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use crate::cursor::CursorSnapshot;
use crate::decode::Value;
use crate::reader::Reader;
use crate::tree::{NodeFlags, NodeId, Row, Tree};
use crate::Result;

/// Global override for how detail sections execute, regardless of what each
/// declaration asked for. Meant for debugging scripts: forcing everything eager
/// surfaces errors in deferred sections immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailsMode {
    /// Run every detail section synchronously at declaration.
    Eager,
    /// Defer every detail section until its expand trigger fires.
    Lazy,
}

/// A deferred detail section: the cursor state to resume from plus the callback
/// that produces the section's rows. Consumed exactly once.
pub(crate) struct Continuation<'d> {
    pub(crate) snapshot: CursorSnapshot,
    pub(crate) run: Box<dyn for<'s> FnOnce(&mut Scope<'s, 'd>) -> Result<()> + 'd>,
}

impl std::fmt::Debug for Continuation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Continuation")
            .field("snapshot", &self.snapshot)
            .finish_non_exhaustive()
    }
}

/// The capability set handed to a decode callback.
///
/// Dereferences to [`Reader`], so every reader and decoder operation is called
/// directly on the scope. The additional methods below build the display tree.
///
/// `'s` is the borrow of the engine state for this invocation; `'d` is the
/// lifetime of the byte buffer being decoded.
pub struct Scope<'s, 'd> {
    reader: &'s mut Reader<'d>,
    tree: &'s mut Tree,
    pending: &'s mut HashMap<NodeId, Continuation<'d>>,
    parent: Option<NodeId>,
    last_row: Option<NodeId>,
    details: Option<DetailsMode>,
}

impl<'d> Deref for Scope<'_, 'd> {
    type Target = Reader<'d>;

    fn deref(&self) -> &Reader<'d> {
        self.reader
    }
}

impl<'d> DerefMut for Scope<'_, 'd> {
    fn deref_mut(&mut self) -> &mut Reader<'d> {
        self.reader
    }
}

impl<'s, 'd> Scope<'s, 'd> {
    pub(crate) fn new(
        reader: &'s mut Reader<'d>,
        tree: &'s mut Tree,
        pending: &'s mut HashMap<NodeId, Continuation<'d>>,
        parent: Option<NodeId>,
        details: Option<DetailsMode>,
    ) -> Self {
        Scope {
            reader,
            tree,
            pending,
            parent,
            last_row: None,
            details,
        }
    }

    /// A row describing the region the cursor currently covers, under the
    /// current container.
    fn row_at_cursor(&self, name: &str) -> Row {
        let cur = self.reader.cursor();
        let (size, size_bits, bit_offset) = if cur.bit_size > 0 {
            (
                cur.bit_size / 8,
                (cur.bit_size % 8) as u8,
                Some((cur.bit_offset % 8) as u8),
            )
        } else {
            (cur.byte_size, 0, None)
        };
        Row {
            name: name.to_string(),
            offset: cur.display_offset(),
            bit_offset,
            size,
            size_bits,
            value: String::new(),
            hover: None,
            description: None,
        }
    }

    /// Append a completed row for the region just read.
    ///
    /// The row's offset is relative to the enclosing section's baseline and its
    /// size mirrors the cursor's current read window. Returns the row's id so a
    /// detail section can later be attached to it.
    pub fn add_row(&mut self, name: &str, value: impl Into<Value>) -> NodeId {
        let id = self.open_row(name);
        self.set_row_value(id, value);
        id
    }

    /// Append an empty row whose value is not known yet.
    ///
    /// Complete it later with [`Scope::set_row_value`] once the value has been
    /// produced, typically by nested parsing.
    pub fn open_row(&mut self, name: &str) -> NodeId {
        let row = self.row_at_cursor(name);
        let id = self.tree.push_node(self.parent, row, NodeFlags::empty());
        self.last_row = Some(id);
        id
    }

    /// Complete a row opened earlier, transferring the value's hover annotation
    /// onto the row.
    pub fn set_row_value(&mut self, id: NodeId, value: impl Into<Value>) {
        let value = value.into();
        let row = &mut self.tree.node_mut(id).row;
        row.value = value.text;
        row.hover = value.hover;
    }

    /// Attach a short description to a row.
    pub fn set_row_description(&mut self, id: NodeId, description: &str) {
        self.tree.node_mut(id).row.description = Some(description.to_string());
    }

    /// Attach a detail section to the most recently added row.
    ///
    /// With `opened` the section decodes immediately and starts out open;
    /// otherwise a placeholder is recorded and `f` is deferred until the row's
    /// expand trigger fires. A global [`DetailsMode`] override forces one
    /// behavior for every section.
    ///
    /// An eager section restores the caller's cursor afterwards, so the code
    /// following `add_details` continues exactly where it left off. The
    /// enclosing row's size is recomputed as the span the section consumed.
    ///
    /// # Errors
    /// Returns [`crate::Error::PreconditionViolation`] if no row has been added
    /// yet, or any error the eagerly-run callback raises.
    pub fn add_details<F>(&mut self, f: F, opened: bool) -> Result<()>
    where
        F: for<'a> FnOnce(&mut Scope<'a, 'd>) -> Result<()> + 'd,
    {
        let Some(container) = self.last_row else {
            return Err(precondition_error!(
                "add_details requires a preceding row"
            ));
        };
        let eager = match self.details {
            Some(DetailsMode::Eager) => true,
            Some(DetailsMode::Lazy) => false,
            None => opened,
        };
        if opened {
            self.tree.node_mut(container).flags.insert(NodeFlags::OPENED);
        }

        if eager {
            self.run_section(container, f)?;
            self.tree
                .node_mut(container)
                .flags
                .insert(NodeFlags::EXPANDED);
        } else {
            // The section resumes where an eager one would have started: past
            // the declaring row's read. Child offsets are relative to the byte
            // offset captured now, not at expansion time.
            let mut resumed = *self.reader.cursor();
            resumed.advance_past_read();
            let snapshot = CursorSnapshot {
                byte_offset: resumed.byte_offset,
                bit_offset: resumed.bit_offset,
                start_offset: resumed.byte_offset,
            };
            self.tree.node_mut(container).flags.insert(NodeFlags::LAZY);
            self.pending.insert(
                container,
                Continuation {
                    snapshot,
                    run: Box::new(f),
                },
            );
        }
        Ok(())
    }

    /// Open a row, decode its detail section immediately, and complete the row
    /// with the value the section returns.
    ///
    /// Unlike [`Scope::add_details`] the cursor is left after the parsed region,
    /// since the section *is* the read. The row's size spans everything the
    /// section consumed, trailing bit reads included.
    ///
    /// # Errors
    /// Propagates any error `f` raises; the opened row stays in the tree with
    /// whatever the section produced before failing.
    pub fn read_row_with_details<F>(&mut self, name: &str, f: F) -> Result<NodeId>
    where
        F: for<'a> FnOnce(&mut Scope<'a, 'd>) -> Result<Option<Value>> + 'd,
    {
        self.reader.cursor_mut().advance_past_read();
        let begin = self.reader.cursor().byte_offset;
        let saved_start = self.reader.cursor().start_offset;

        // The section determines the size; the offset is where it starts.
        let row = Row {
            name: name.to_string(),
            offset: begin as i64 - saved_start as i64,
            bit_offset: None,
            size: 0,
            size_bits: 0,
            value: String::new(),
            hover: None,
            description: None,
        };
        let container = self
            .tree
            .push_node(self.parent, row, NodeFlags::OPENED | NodeFlags::EXPANDED);

        let saved_parent = self.parent;
        let saved_last = self.last_row;
        self.reader.cursor_mut().start_offset = begin;
        self.parent = Some(container);
        self.last_row = None;

        let result = f(self);

        let end = *self.reader.cursor();
        self.tree.node_mut(container).row.fold_span(begin, &end);
        self.parent = saved_parent;
        self.last_row = saved_last;
        self.reader.cursor_mut().start_offset = saved_start;

        if let Some(value) = result? {
            self.set_row_value(container, value);
        }
        self.last_row = Some(container);
        Ok(container)
    }

    /// Emit the conventional top-of-table rows for a fresh parse pass: the
    /// whole-file size row.
    pub fn add_standard_header(&mut self) -> NodeId {
        let len = self.reader.len();
        let row = Row {
            name: "File size".to_string(),
            offset: 0,
            bit_offset: None,
            size: len,
            size_bits: 0,
            value: len.to_string(),
            hover: Some(format!("Hex: 0x{len:X}")),
            description: None,
        };
        let id = self.tree.push_node(self.parent, row, NodeFlags::empty());
        self.last_row = Some(id);
        id
    }

    /// Run `f` as the detail section of `container`: move the cursor past the
    /// row's own read, rebase the display baseline, run, fold the consumed span
    /// into the row's size, and put the caller's cursor back.
    fn run_section<F>(&mut self, container: NodeId, f: F) -> Result<()>
    where
        F: for<'a> FnOnce(&mut Scope<'a, 'd>) -> Result<()>,
    {
        let saved_cursor = *self.reader.cursor();
        let saved_parent = self.parent;
        let saved_last = self.last_row;

        self.reader.cursor_mut().advance_past_read();
        let begin = self.reader.cursor().byte_offset;
        self.reader.cursor_mut().start_offset = begin;
        self.parent = Some(container);
        self.last_row = None;

        let result = f(self);

        let end = *self.reader.cursor();
        self.tree.node_mut(container).row.fold_span(begin, &end);
        self.parent = saved_parent;
        self.last_row = saved_last;
        *self.reader.cursor_mut() = saved_cursor;
        result
    }
}

/// Type-erased parser callback a host registers for a file format.
pub type ParserFn = Box<dyn for<'s, 'd> Fn(&mut Scope<'s, 'd>) -> Result<()> + Send + Sync>;

/// Registry of named format parsers.
///
/// The hosting shell registers one parser per recognized file format and looks
/// the right one up when a file is opened. Which parser applies to which file is
/// the host's decision; the registry only stores and retrieves them.
#[derive(Default)]
pub struct ScriptRegistry {
    parsers: HashMap<String, ParserFn>,
}

impl std::fmt::Debug for ScriptRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptRegistry")
            .field("parsers", &self.parsers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ScriptRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        ScriptRegistry::default()
    }

    /// Register a parser under `name`, replacing any previous registration.
    pub fn register_parser<F>(&mut self, name: &str, parser: F)
    where
        F: for<'s, 'd> Fn(&mut Scope<'s, 'd>) -> Result<()> + Send + Sync + 'static,
    {
        self.parsers.insert(name.to_string(), Box::new(parser));
    }

    /// Look up a registered parser.
    #[must_use]
    pub fn parser(&self, name: &str) -> Option<&ParserFn> {
        self.parsers.get(name)
    }

    /// Names of all registered parsers, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parsers.keys().map(String::as_str)
    }
}
