//! Node layout, construction and read-only queries.

use arbor_span::{Length, Symbol};
use text_size::TextSize;

use crate::{Language, TreeId, TreePool};

/// A node of the concrete syntax tree.
///
/// Positions are relative: a node only knows the length of its leading
/// padding and of its content, never its absolute offset in the document.
#[derive(Debug, Default)]
pub struct Tree {
    pub symbol: Symbol,
    /// Leading trivia before the node's content.
    pub padding: Length,
    /// The node's content, excluding padding.
    pub size: Length,
    /// How far past the start of the padding the scanner read to produce
    /// this node. Never less than `padding.bytes + size.bytes`.
    pub bytes_scanned: TextSize,
    pub visible: bool,
    pub named: bool,
    pub extra: bool,
    pub fragile_left: bool,
    pub fragile_right: bool,
    pub has_changes: bool,
    pub has_external_tokens: bool,
    /// The character an error leaf stopped at.
    pub lookahead_char: Option<char>,
    pub visible_child_count: u32,
    pub named_child_count: u32,
    pub(crate) children: Vec<TreeId>,
}

impl Tree {
    #[inline]
    pub fn children(&self) -> &[TreeId] {
        &self.children
    }

    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.symbol.is_error()
    }

    /// Padding and content together.
    #[inline]
    pub fn total_size(&self) -> Length {
        self.padding + self.size
    }

    #[inline]
    pub fn total_bytes(&self) -> TextSize {
        self.padding.bytes + self.size.bytes
    }
}

impl TreePool {
    /// Builds a token node.
    pub fn make_leaf(
        &mut self,
        symbol: Symbol,
        padding: Length,
        size: Length,
        language: &Language,
    ) -> TreeId {
        let metadata = language.symbol_metadata(symbol);
        let id = self.acquire();
        self[id] = Tree {
            symbol,
            padding,
            size,
            bytes_scanned: padding.bytes + size.bytes,
            visible: metadata.visible,
            named: metadata.named,
            ..Tree::default()
        };
        id
    }

    /// Builds a leaf covering text the parser could not make sense of.
    ///
    /// Both edges are fragile.
    pub fn make_error(
        &mut self,
        padding: Length,
        size: Length,
        lookahead_char: Option<char>,
        language: &Language,
    ) -> TreeId {
        let id = self.make_leaf(Symbol::ERROR, padding, size, language);
        let tree = &mut self[id];
        tree.fragile_left = true;
        tree.fragile_right = true;
        tree.lookahead_char = lookahead_char;
        id
    }

    /// Builds an internal node that takes over one reference to each child.
    ///
    /// Callers that keep using a child must retain it beforehand.
    pub fn make_node(
        &mut self,
        symbol: Symbol,
        children: Vec<TreeId>,
        language: &Language,
    ) -> TreeId {
        debug_assert!(!children.is_empty(), "internal nodes need at least one child");

        let metadata = language.symbol_metadata(symbol);
        let mut visible_child_count = 0;
        let mut named_child_count = 0;
        for &child in &children {
            let child = &self[child];
            if child.visible {
                visible_child_count += 1;
                named_child_count += u32::from(child.named);
            } else {
                visible_child_count += child.visible_child_count;
                named_child_count += child.named_child_count;
            }
        }

        // Fragility leaks out through the run of extras at each edge.
        let fragile_left = children
            .iter()
            .map(|&child| &self[child])
            .take_while(|child| child.extra)
            .any(|child| child.fragile_left);
        let fragile_right = children
            .iter()
            .rev()
            .map(|&child| &self[child])
            .take_while(|child| child.extra)
            .any(|child| child.fragile_right);

        let id = self.acquire();
        self[id] = Tree {
            symbol,
            visible: metadata.visible,
            named: metadata.named,
            fragile_left,
            fragile_right,
            visible_child_count,
            named_child_count,
            children,
            ..Tree::default()
        };
        self.summarize_children(id);
        id
    }

    /// Re-derives `padding`, `size` and `bytes_scanned` of an internal node
    /// from its children.
    pub(crate) fn summarize_children(&mut self, id: TreeId) {
        let mut padding = Length::ZERO;
        let mut size = Length::ZERO;
        let mut total = Length::ZERO;
        let mut bytes_scanned = TextSize::new(0);

        for (index, &child) in self[id].children.iter().enumerate() {
            let child = &self[child];
            bytes_scanned = bytes_scanned.max(total.bytes + child.bytes_scanned);
            if index == 0 {
                padding = child.padding;
                size = child.size;
            } else {
                size += child.total_size();
            }
            total += child.total_size();
        }

        let tree = &mut self[id];
        tree.padding = padding;
        tree.size = size;
        tree.bytes_scanned = bytes_scanned.max(total.bytes);
    }

    /// Structural equality.
    ///
    /// Compares symbol, visibility, byte lengths and children in order.
    /// Row/column extents are not compared.
    pub fn eq(&self, a: TreeId, b: TreeId) -> bool {
        let mut stack = vec![(a, b)];
        while let Some((a, b)) = stack.pop() {
            if a == b {
                continue;
            }

            let (left, right) = (&self[a], &self[b]);
            let shallow_eq = left.symbol == right.symbol
                && left.visible == right.visible
                && left.padding.bytes == right.padding.bytes
                && left.size.bytes == right.size.bytes
                && left.children.len() == right.children.len();
            if !shallow_eq {
                return false;
            }
            stack.extend(left.children.iter().copied().zip(right.children.iter().copied()));
        }
        true
    }

    /// Finds the last node, in document order, produced by an external
    /// scanner.
    ///
    /// The search is depth-first from the right, so a node is reported
    /// before anything that precedes it.
    pub fn last_external_token(&self, tree: TreeId) -> Option<TreeId> {
        let mut stack = vec![tree];
        while let Some(id) = stack.pop() {
            let node = &self[id];
            if node.has_external_tokens {
                return Some(id);
            }
            stack.extend_from_slice(&node.children);
        }
        None
    }
}
