//! Propagation of text edits through an existing tree.
//!
//! An edit rewrites the lengths of every node it touches and flags those
//! nodes with `has_changes`, leaving the tree shaped as before so that the
//! parser can decide what to reuse. Nodes whose scanner lookahead reached
//! into the edited range are flagged as well.
//!
//! Propagation runs on an explicit work stack, so tree depth is bounded by
//! memory rather than by the call stack.

use arbor_span::{InputEdit, Length};
use text_size::TextSize;

use crate::{TreeId, TreePool};

#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("edit ends at byte {old_end_byte:?} but the tree only spans {total_bytes:?} bytes")]
    OutOfBounds { old_end_byte: TextSize, total_bytes: TextSize },
    #[error("edit at byte {start_byte:?} with length {len:?} overflows the offset range")]
    Overflow { start_byte: TextSize, len: TextSize },
}

/// Where a node visited by the edit hangs in the tree.
#[derive(Clone, Copy)]
enum Parent {
    Root,
    Child { parent: TreeId, index: usize },
}

enum Step {
    /// Rewrite the lengths of a node the edit reaches.
    Edit { id: TreeId, parent: Parent, edit: InputEdit },
    /// Flag a node preceding the edit if its scanner read `offset` or beyond.
    Invalidate { id: TreeId, parent: Parent, offset: TextSize },
    /// Re-derive an internal node once all of its children are done.
    Summarize(TreeId),
}

impl TreePool {
    /// Applies `edit` to `tree` and returns the edited tree.
    ///
    /// Shared nodes on the edited path are copied first, so the returned id
    /// differs from `tree` when the root itself was shared. A rejected edit
    /// leaves the tree untouched.
    pub fn edit(&mut self, tree: TreeId, edit: &InputEdit) -> Result<TreeId, EditError> {
        let overflow = |len| EditError::Overflow { start_byte: edit.start_byte, len };
        let old_end_byte =
            edit.start_byte.checked_add(edit.bytes_removed).ok_or(overflow(edit.bytes_removed))?;
        let new_end_byte =
            edit.start_byte.checked_add(edit.bytes_added).ok_or(overflow(edit.bytes_added))?;

        let total_bytes = self[tree].total_bytes();
        if old_end_byte > total_bytes {
            return Err(EditError::OutOfBounds { old_end_byte, total_bytes });
        }
        (total_bytes - old_end_byte).checked_add(new_end_byte).ok_or(overflow(edit.bytes_added))?;

        if edit.is_noop() {
            tracing::trace!(start_byte = u32::from(edit.start_byte), "skipping empty edit");
            return Ok(tree);
        }

        tracing::trace!(
            start_byte = u32::from(edit.start_byte),
            bytes_removed = u32::from(edit.bytes_removed),
            bytes_added = u32::from(edit.bytes_added),
            "applying edit"
        );

        let mut root = tree;
        let mut stack = vec![Step::Edit { id: tree, parent: Parent::Root, edit: *edit }];
        while let Some(step) = stack.pop() {
            match step {
                Step::Edit { id, parent, edit } => {
                    let id = self.make_unique(id);
                    self.attach(parent, id, &mut root);
                    self.resize(id, &edit);
                    if !self[id].is_leaf() {
                        stack.push(Step::Summarize(id));
                        self.split_edit(id, &edit, &mut stack);
                    }
                }
                Step::Invalidate { id, parent, offset } => {
                    if offset >= self[id].bytes_scanned {
                        continue;
                    }
                    let id = self.make_unique(id);
                    self.attach(parent, id, &mut root);
                    self[id].has_changes = true;

                    let mut child_start = TextSize::new(0);
                    for (index, &child) in self[id].children.iter().enumerate() {
                        if child_start > offset {
                            break;
                        }
                        stack.push(Step::Invalidate {
                            id: child,
                            parent: Parent::Child { parent: id, index },
                            offset: offset - child_start,
                        });
                        child_start += self[child].total_bytes();
                    }
                }
                Step::Summarize(id) => self.summarize_children(id),
            }
        }
        Ok(root)
    }

    fn attach(&mut self, parent: Parent, id: TreeId, root: &mut TreeId) {
        match parent {
            Parent::Root => *root = id,
            Parent::Child { parent, index } => self[parent].children[index] = id,
        }
    }

    /// Rewrites the padding and size of `id` itself.
    fn resize(&mut self, id: TreeId, edit: &InputEdit) {
        let old_end = Length::new(edit.old_end_byte(), edit.old_end_point());
        let new_end = Length::new(edit.new_end_byte(), edit.new_end_point());

        let tree = &mut self[id];
        tree.has_changes = true;
        if edit.start_byte < tree.padding.bytes {
            if tree.padding.bytes >= old_end.bytes {
                // The removed range ends inside the padding.
                let trailing_padding = tree.padding - old_end;
                tree.padding = new_end + trailing_padding;
            } else {
                // The removed range eats into the content, which becomes padding.
                let removed_content = old_end - tree.padding;
                tree.size = tree.size - removed_content;
                tree.padding = new_end;
            }
        } else if edit.start_byte == tree.padding.bytes && edit.bytes_removed == TextSize::new(0) {
            tree.padding += edit.added();
        } else {
            let trailing_content = tree.total_size() - old_end;
            tree.size = (new_end + trailing_content) - tree.padding;
        }

        if tree.is_leaf() {
            tree.bytes_scanned = tree.bytes_scanned.max(tree.total_bytes());
        }
    }

    /// Queues the part of `edit` that falls on each child of `id`.
    ///
    /// Child offsets are taken from the lengths before the edit.
    fn split_edit(&self, id: TreeId, edit: &InputEdit, stack: &mut Vec<Step>) {
        let old_end = Length::new(edit.old_end_byte(), edit.old_end_point());
        let mut found_first_child = false;
        let mut remaining_to_remove = Length::ZERO;
        let mut child_right = Length::ZERO;

        for (index, &child) in self[id].children.iter().enumerate() {
            let parent = Parent::Child { parent: id, index };
            let child_total = self[child].total_size();
            let child_left = child_right;
            child_right = child_left + child_total;

            let step = if !found_first_child && child_right.bytes >= edit.start_byte {
                // The first child reaching the edit takes all of the inserted text.
                found_first_child = true;
                let mut child_edit = InputEdit {
                    start_byte: edit.start_byte - child_left.bytes,
                    start_point: edit.start_point - child_left.extent,
                    ..*edit
                };
                if old_end.bytes > child_right.bytes {
                    child_edit.bytes_removed = child_right.bytes - edit.start_byte;
                    child_edit.extent_removed = child_right.extent - edit.start_point;
                    remaining_to_remove = old_end - child_right;
                }
                Step::Edit { id: child, parent, edit: child_edit }
            } else if !remaining_to_remove.is_empty() {
                let removed = Length::new(
                    remaining_to_remove.bytes.min(child_total.bytes),
                    remaining_to_remove.extent.min(child_total.extent),
                );
                remaining_to_remove = remaining_to_remove - removed;
                let child_edit = InputEdit {
                    bytes_removed: removed.bytes,
                    extent_removed: removed.extent,
                    ..InputEdit::default()
                };
                Step::Edit { id: child, parent, edit: child_edit }
            } else if let Some(offset) = edit.start_byte.checked_sub(child_left.bytes) {
                Step::Invalidate { id: child, parent, offset }
            } else {
                break;
            };
            stack.push(step);
        }
    }
}
