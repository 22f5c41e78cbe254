//! A decoded document: the tree produced by one parse pass over one buffer,
//! plus whatever lazy sections are still waiting for their expand trigger.
//!
//! The host runs [`Document::parse`] once when a file is opened and keeps the
//! returned [`Document`] alive for the whole viewing session. Expanding a
//! collapsed lazy row in the UI maps to [`Document::expand`]; everything else is
//! read-only rendering off [`Document::tree`].

use std::collections::HashMap;

use crate::reader::Reader;
use crate::script::{Continuation, DetailsMode, Scope};
use crate::tree::{Node, NodeFlags, NodeId, Tree};
use crate::{Error, Result};

/// Options controlling a parse pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Force every detail section eager or lazy, overriding the per-section
    /// declarations. `None` leaves each declaration as written.
    pub details_override: Option<DetailsMode>,
}

impl ParseOptions {
    /// Options with a global [`DetailsMode`] override.
    #[must_use]
    pub fn with_details(mode: DetailsMode) -> Self {
        ParseOptions {
            details_override: Some(mode),
        }
    }
}

/// The result of decoding one buffer with one script.
///
/// Holds the display tree, the continuations of not-yet-expanded lazy sections,
/// and the cursor state those continuations resume against. The buffer itself is
/// borrowed for the document's whole lifetime and never mutated.
pub struct Document<'d> {
    reader: Reader<'d>,
    tree: Tree,
    pending: HashMap<NodeId, Continuation<'d>>,
    options: ParseOptions,
    last_error: Option<Error>,
}

impl std::fmt::Debug for Document<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("len", &self.reader.len())
            .field("rows", &self.tree.len())
            .field("pending", &self.pending.len())
            .field("last_error", &self.last_error)
            .finish()
    }
}

impl<'d> Document<'d> {
    /// Run the root parse pass of `callback` over `data`.
    ///
    /// A document is always produced. If the callback fails partway through,
    /// every row it emitted before the failure stays in the tree and the error
    /// is recorded; inspect [`Document::last_error`] to surface it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bytescope::{Document, ParseOptions};
    ///
    /// let data = [0x2Au8, 0x00];
    /// let doc = Document::parse(&data, ParseOptions::default(), |scope| {
    ///     scope.read(1)?;
    ///     let answer = scope.decimal_value()?;
    ///     scope.add_row("answer", answer);
    ///     Ok(())
    /// });
    /// assert!(doc.last_error().is_none());
    /// assert_eq!(doc.tree().node(doc.tree().root()[0]).row.value, "42");
    /// ```
    pub fn parse<F>(data: &'d [u8], options: ParseOptions, callback: F) -> Document<'d>
    where
        F: for<'s> FnOnce(&mut Scope<'s, 'd>) -> Result<()>,
    {
        let mut reader = Reader::new(data);
        let mut tree = Tree::new();
        let mut pending = HashMap::new();
        let result = {
            let mut scope = Scope::new(
                &mut reader,
                &mut tree,
                &mut pending,
                None,
                options.details_override,
            );
            callback(&mut scope)
        };
        Document {
            reader,
            tree,
            pending,
            options,
            last_error: result.err(),
        }
    }

    /// Fire the expand trigger for a lazy row.
    ///
    /// Runs the deferred section exactly once: the cursor state captured at
    /// declaration time is restored (the endianness stays whatever the pass
    /// last set), the callback decodes the section's rows in their declared
    /// slot, and the span it consumed is folded into the placeholder row's
    /// size. Returns `Ok(true)` when a section actually ran; `Ok(false)` for a
    /// row that is not lazy or was already expanded, without touching anything.
    ///
    /// # Errors
    /// Returns the error the section's callback raised. The rows it produced
    /// before failing stay in the tree, and the rest of the document remains
    /// usable; the continuation is still consumed.
    pub fn expand(&mut self, id: NodeId) -> Result<bool> {
        let Some(cont) = self.pending.remove(&id) else {
            return Ok(false);
        };
        self.reader.cursor_mut().restore(cont.snapshot);
        let begin = cont.snapshot.byte_offset;
        let result = {
            let mut scope = Scope::new(
                &mut self.reader,
                &mut self.tree,
                &mut self.pending,
                Some(id),
                self.options.details_override,
            );
            (cont.run)(&mut scope)
        };
        let end = *self.reader.cursor();
        let node = self.tree.node_mut(id);
        node.row.fold_span(begin, &end);
        node.flags.insert(NodeFlags::EXPANDED | NodeFlags::OPENED);
        result.map(|()| true)
    }

    /// The display tree produced so far.
    #[must_use]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Every node in declaration order, depth-first, with its nesting depth.
    pub fn rows(&self) -> std::vec::IntoIter<(usize, NodeId, &Node)> {
        let mut order = Vec::with_capacity(self.tree.len());
        self.tree
            .walk(|depth, id, node| order.push((depth, id, node)));
        order.into_iter()
    }

    /// Returns `true` if `id` is a lazy row whose section has not run yet.
    #[must_use]
    pub fn is_pending(&self, id: NodeId) -> bool {
        self.pending.contains_key(&id)
    }

    /// The error the root parse pass left behind, if any.
    ///
    /// Only [`Document::parse`] records here; a failing expansion reports
    /// through the `Result` of [`Document::expand`] instead.
    #[must_use]
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// The buffer this document was decoded from.
    #[must_use]
    pub fn data(&self) -> &'d [u8] {
        self.reader.data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_parse_failure_keeps_prior_rows() {
        let data = [1u8, 2, 3];
        let doc = Document::parse(&data, ParseOptions::default(), |scope| {
            scope.read(2)?;
            scope.add_row("ok", scope.hex_value()?);
            scope.read(8)?; // past end
            scope.add_row("never", "");
            Ok(())
        });
        assert!(matches!(doc.last_error(), Some(Error::OutOfBounds)));
        assert_eq!(doc.tree().root().len(), 1);
        assert_eq!(doc.tree().node(doc.tree().root()[0]).row.value, "0201");
    }

    #[test]
    fn test_expand_runs_once_and_folds_size() {
        let data = [0x02u8, 0x10, 0x20, 0xFF];
        let mut doc = Document::parse(&data, ParseOptions::default(), |scope| {
            scope.read(1)?;
            let count = scope.number_value()? as i64;
            scope.add_row("count", count.to_string());
            scope.add_details(
                move |s| {
                    s.read(count)?;
                    s.add_row("entries", s.hex_value()?);
                    Ok(())
                },
                false,
            )?;
            Ok(())
        });
        let id = doc.tree().root()[0];
        assert!(doc.is_pending(id));

        assert!(doc.expand(id).unwrap());
        assert!(!doc.is_pending(id));
        let node = doc.tree().node(id);
        assert_eq!(node.row.size, 2);
        assert!(node.flags().contains(NodeFlags::EXPANDED | NodeFlags::OPENED));
        assert_eq!(node.children.len(), 1);
        let child = doc.tree().node(node.children[0]);
        assert_eq!(child.row.value, "2010");
        assert_eq!(child.row.offset, 0);

        // a repeat trigger is a no-op
        assert!(!doc.expand(id).unwrap());
        assert_eq!(doc.tree().node(id).children.len(), 1);
    }

    #[test]
    fn test_expand_non_lazy_row_is_noop() {
        let data = [0u8; 4];
        let mut doc = Document::parse(&data, ParseOptions::default(), |scope| {
            scope.read(4)?;
            scope.add_row("plain", "");
            Ok(())
        });
        let id = doc.tree().root()[0];
        assert!(!doc.expand(id).unwrap());
    }

    #[test]
    fn test_expand_error_consumes_continuation_and_keeps_tree() {
        let data = [0u8, 1, 2, 3];
        let mut doc = Document::parse(&data, ParseOptions::default(), |scope| {
            scope.read(1)?;
            scope.add_row("head", scope.hex_value()?);
            scope.add_details(
                |s| {
                    s.read(2)?;
                    s.add_row("partial", s.hex_value()?);
                    s.read(100)?;
                    Ok(())
                },
                false,
            )?;
            scope.read(1)?;
            scope.add_row("tail", scope.hex_value()?);
            Ok(())
        });
        let id = doc.tree().root()[0];
        let result = doc.expand(id);
        assert!(matches!(result, Err(Error::OutOfBounds)));
        // the row decoded before the failure stays
        assert_eq!(doc.tree().node(id).children.len(), 1);
        // the rest of the tree is untouched and the trigger is spent
        assert_eq!(doc.tree().root().len(), 2);
        assert!(!doc.expand(id).unwrap());
    }

    #[test]
    fn test_details_override_forces_lazy() {
        let data = [0u8; 8];
        let mut doc = Document::parse(
            &data,
            ParseOptions::with_details(DetailsMode::Lazy),
            |scope| {
                scope.read(2)?;
                scope.add_row("section", "");
                // declared eager, forced lazy by the override
                scope.add_details(
                    |s| {
                        s.read(2)?;
                        s.add_row("inner", s.hex_value()?);
                        Ok(())
                    },
                    true,
                )?;
                Ok(())
            },
        );
        let id = doc.tree().root()[0];
        assert!(doc.is_pending(id));
        assert_eq!(doc.tree().node(id).children.len(), 0);
        assert!(doc.expand(id).unwrap());
        assert_eq!(doc.tree().node(id).children.len(), 1);
    }

    #[test]
    fn test_rows_iterates_declaration_order() {
        let data = [0u8; 8];
        let doc = Document::parse(&data, ParseOptions::default(), |scope| {
            scope.read(2)?;
            scope.add_row("a", "");
            scope.add_details(
                |s| {
                    s.read(1)?;
                    s.add_row("a.1", "");
                    Ok(())
                },
                true,
            )?;
            scope.read(2)?;
            scope.add_row("b", "");
            Ok(())
        });
        let names: Vec<(usize, String)> = doc
            .rows()
            .map(|(depth, _, node)| (depth, node.row.name.clone()))
            .collect();
        assert_eq!(
            names,
            vec![
                (0, "a".to_string()),
                (1, "a.1".to_string()),
                (0, "b".to_string()),
            ]
        );
    }
}
