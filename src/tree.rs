//! The display tree: rows, nested detail sections, and their bookkeeping.
//!
//! A parse pass produces a tree of [`Row`]s. Each row may own child rows — its
//! *details* — which form a named, collapsible section. Rows and sections appear
//! in the exact order their declaring calls occur; a lazily decoded section keeps
//! its declared position in the tree regardless of when it is later expanded.
//!
//! Nodes live in an index arena owned by [`Tree`]; [`NodeId`]s are stable for the
//! lifetime of the document and double as the handles the host passes to
//! [`crate::Document::expand`].

use bitflags::bitflags;

use crate::cursor::Cursor;

bitflags! {
    /// Presentation and lifecycle state of a tree node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct NodeFlags: u8 {
        /// The section under this row starts out open in the UI.
        const OPENED = 1 << 0;
        /// The section's content is deferred until an expand trigger fires.
        const LAZY = 1 << 1;
        /// The section's content has been decoded (eagerly or by expansion).
        const EXPANDED = 1 << 2;
    }
}

/// Stable handle to a node in the display tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// A single display record: one line of the decoded table.
///
/// Created in two phases — an empty row may be completed later once its value is
/// known, which happens when the value is produced by nested parsing. Sizes are
/// kept as a whole-byte count plus a leftover bit remainder so bit-wise reads and
/// sections with trailing bit reads display exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Field name.
    pub name: String,
    /// Display offset, relative to the enclosing section's baseline. Signed
    /// because a script may rewind below the baseline.
    pub offset: i64,
    /// Sub-byte bit position of a bit-wise read, `None` for byte-wise rows.
    pub bit_offset: Option<u8>,
    /// Whole-byte display size.
    pub size: usize,
    /// Leftover bits past the whole-byte size, always in `0..8`.
    pub size_bits: u8,
    /// Decoded value text. Empty while the row awaits completion.
    pub value: String,
    /// Optional secondary representation shown on demand.
    pub hover: Option<String>,
    /// Optional short description column.
    pub description: Option<String>,
}

impl Row {
    /// Fold the span a section consumed into this row's display size.
    ///
    /// The span runs from `begin_offset` to the end of the closing cursor's
    /// window; trailing bits merge into whole bytes with the remainder kept.
    pub(crate) fn fold_span(&mut self, begin_offset: usize, end: &Cursor) {
        let whole = (end.byte_offset + end.byte_size).saturating_sub(begin_offset);
        let total_bits = end.bit_size + end.bit_offset;
        self.size = whole + total_bits / 8;
        self.size_bits = (total_bits % 8) as u8;
    }
}

/// A row plus its detail section.
#[derive(Debug)]
pub struct Node {
    /// The display record for this line.
    pub row: Row,
    /// Child rows of the detail section under this row, in declaration order.
    pub children: Vec<NodeId>,
    pub(crate) flags: NodeFlags,
}

impl Node {
    /// Presentation and lifecycle flags of this node.
    #[must_use]
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }
}

/// The arena of all nodes produced by one parse pass.
#[derive(Debug, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    root: Vec<NodeId>,
}

impl Tree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Tree::default()
    }

    /// Number of nodes in the tree, across all nesting levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no rows have been emitted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The top-level rows, in declaration order.
    #[must_use]
    pub fn root(&self) -> &[NodeId] {
        &self.root
    }

    /// Look up a node by id.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Append a new row under `parent` (or at the root) and return its id.
    pub(crate) fn push_node(&mut self, parent: Option<NodeId>, row: Row, flags: NodeFlags) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            row,
            children: Vec::new(),
            flags,
        });
        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.root.push(id),
        }
        id
    }

    /// Visit every node depth-first in declaration order, with its nesting depth.
    /// The node reference borrows from the tree, so a visitor may collect it.
    pub fn walk<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(usize, NodeId, &'a Node),
    {
        let mut stack: Vec<(usize, NodeId)> =
            self.root.iter().rev().map(|&id| (0, id)).collect();
        while let Some((depth, id)) = stack.pop() {
            let node = self.node(id);
            visit(depth, id, node);
            for &child in node.children.iter().rev() {
                stack.push((depth + 1, child));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str) -> Row {
        Row {
            name: name.to_string(),
            offset: 0,
            bit_offset: None,
            size: 0,
            size_bits: 0,
            value: String::new(),
            hover: None,
            description: None,
        }
    }

    #[test]
    fn test_push_and_walk_order() {
        let mut tree = Tree::new();
        let a = tree.push_node(None, row("a"), NodeFlags::empty());
        let _a1 = tree.push_node(Some(a), row("a1"), NodeFlags::empty());
        let _a2 = tree.push_node(Some(a), row("a2"), NodeFlags::empty());
        let _b = tree.push_node(None, row("b"), NodeFlags::empty());

        let mut seen = Vec::new();
        tree.walk(|depth, _, node| seen.push((depth, node.row.name.clone())));
        assert_eq!(
            seen,
            vec![
                (0, "a".to_string()),
                (1, "a1".to_string()),
                (1, "a2".to_string()),
                (0, "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_fold_span_whole_bytes() {
        let mut r = row("x");
        let mut end = Cursor::new();
        end.byte_offset = 10;
        end.byte_size = 2;
        r.fold_span(4, &end);
        assert_eq!(r.size, 8);
        assert_eq!(r.size_bits, 0);
    }

    #[test]
    fn test_fold_span_merges_trailing_bits() {
        // section consumed 3 bytes plus a bit read of 11 bits at bit offset 2:
        // 13 trailing bits = 1 byte + 5 bits
        let mut r = row("x");
        let mut end = Cursor::new();
        end.byte_offset = 7;
        end.bit_offset = 2;
        end.bit_size = 11;
        r.fold_span(4, &end);
        assert_eq!(r.size, 4);
        assert_eq!(r.size_bits, 5);
    }

    #[test]
    fn test_fold_span_rewound_section_clamps_to_zero() {
        let mut r = row("x");
        let mut end = Cursor::new();
        end.byte_offset = 2;
        r.fold_span(4, &end);
        assert_eq!(r.size, 0);
    }
}
