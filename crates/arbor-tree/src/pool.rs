//! Reference-counted node storage.
//!
//! Nodes live in slots addressed by [`TreeId`]. A slot is reused once its
//! count drops to zero, and its generation is bumped so that handles to the
//! previous occupant are rejected instead of silently aliasing the new one.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::Tree;

const DEFAULT_POOL_CAPACITY: usize = 1024;
const DEFAULT_CHILDREN_BUFFER_LIMIT: usize = 128;
const DEFAULT_CHILDREN_LEN: usize = 4;

/// Sizing knobs for a [`TreePool`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    /// Number of slots reserved up front.
    pub capacity: usize,
    /// Maximum number of child buffers kept for reuse.
    pub children_buffer_limit: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_POOL_CAPACITY,
            children_buffer_limit: DEFAULT_CHILDREN_BUFFER_LIMIT,
        }
    }
}

/// Owning handle to a node in a [`TreePool`].
///
/// Each handle held by a caller accounts for one unit of the node's
/// reference count. Copying the id does not retain the node.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TreeId {
    index: u32,
    generation: u32,
}

struct Slot {
    generation: u32,
    ref_count: u32,
    tree: Tree,
}

/// Allocator and owner of every node of one or more trees.
pub struct TreePool {
    slots: Vec<Slot>,
    free: Vec<u32>,
    children_pool: Vec<Vec<TreeId>>,
    release_stack: Vec<TreeId>,
    config: PoolConfig,
}

impl TreePool {
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    pub fn with_config(config: PoolConfig) -> Self {
        Self {
            slots: Vec::with_capacity(config.capacity),
            free: Vec::new(),
            children_pool: Vec::with_capacity(config.children_buffer_limit),
            release_stack: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Returns a blank node with a reference count of one.
    pub fn acquire(&mut self) -> TreeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            debug_assert_eq!(slot.ref_count, 0, "free slot {index} is still referenced");
            slot.ref_count = 1;
            return TreeId { index, generation: slot.generation };
        }

        let index = u32::try_from(self.slots.len())
            .unwrap_or_else(|_| panic!("tree pool exhausted at {} slots", self.slots.len()));
        self.slots.push(Slot { generation: 0, ref_count: 1, tree: Tree::default() });
        TreeId { index, generation: 0 }
    }

    /// Adds one unit of ownership to `id`.
    #[track_caller]
    pub fn retain(&mut self, id: TreeId) {
        let slot = self.live_slot_mut(id);
        slot.ref_count = slot
            .ref_count
            .checked_add(1)
            .unwrap_or_else(|| panic!("reference count overflow for {id:?}"));
    }

    /// Gives up one unit of ownership of `id`.
    ///
    /// When the last unit is released the node's children are released in
    /// turn and its slot is returned to the free list.
    #[track_caller]
    pub fn release(&mut self, id: TreeId) {
        let mut stack = std::mem::take(&mut self.release_stack);
        stack.push(id);

        while let Some(id) = stack.pop() {
            let slot = self.live_slot_mut(id);
            slot.ref_count -= 1;
            if slot.ref_count > 0 {
                continue;
            }

            slot.generation = slot.generation.wrapping_add(1);
            let mut children = std::mem::take(&mut slot.tree).children;
            stack.append(&mut children);
            self.recycle_children_vec(children);
            self.free.push(id.index);
        }

        self.release_stack = stack;
    }

    /// Current reference count of `id`, or zero if it has been released.
    pub fn ref_count(&self, id: TreeId) -> u32 {
        self.slot(id).map_or(0, |slot| slot.ref_count)
    }

    pub fn is_live(&self, id: TreeId) -> bool {
        self.slot(id).is_some()
    }

    /// Number of nodes currently referenced.
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn get(&self, id: TreeId) -> Option<&Tree> {
        self.slot(id).map(|slot| &slot.tree)
    }

    pub fn get_mut(&mut self, id: TreeId) -> Option<&mut Tree> {
        self.slot_mut(id).map(|slot| &mut slot.tree)
    }

    /// Retrieves a recycled children buffer or allocates a new one.
    pub fn new_children_vec(&mut self) -> Vec<TreeId> {
        self.children_pool.pop().unwrap_or_else(|| Vec::with_capacity(DEFAULT_CHILDREN_LEN))
    }

    /// Returns a children buffer to the pool.
    fn recycle_children_vec(&mut self, mut vec: Vec<TreeId>) {
        if vec.capacity() > 0 && self.children_pool.len() < self.config.children_buffer_limit {
            vec.clear();
            self.children_pool.push(vec);
        }
    }

    /// Returns an id whose node is owned only by the caller.
    ///
    /// A shared node is copied: the copy retains the original's children and
    /// takes over the caller's unit of ownership.
    pub(crate) fn make_unique(&mut self, id: TreeId) -> TreeId {
        if self.live_slot(id).ref_count == 1 {
            return id;
        }

        let mut children = self.new_children_vec();
        children.extend_from_slice(self[id].children());
        for &child in &children {
            self.retain(child);
        }
        let tree = Tree { children, ..self[id] };

        let copy = self.acquire();
        self[copy] = tree;
        self.release(id);
        tracing::trace!(?id, ?copy, "copied shared tree before mutation");
        copy
    }

    fn slot(&self, id: TreeId) -> Option<&Slot> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation && slot.ref_count > 0)
    }

    fn slot_mut(&mut self, id: TreeId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation && slot.ref_count > 0)
    }

    #[track_caller]
    fn live_slot(&self, id: TreeId) -> &Slot {
        self.slot(id).unwrap_or_else(|| panic!("use of released tree {id:?}"))
    }

    #[track_caller]
    fn live_slot_mut(&mut self, id: TreeId) -> &mut Slot {
        self.slot_mut(id).unwrap_or_else(|| panic!("use of released tree {id:?}"))
    }
}

impl Default for TreePool {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TreePool {
    fn drop(&mut self) {
        let live = self.live_count();
        if live > 0 {
            tracing::debug!(live, slots = self.slots.len(), "tree pool dropped with live trees");
        }
    }
}

impl fmt::Debug for TreePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreePool")
            .field("slots", &self.slots.len())
            .field("live", &self.live_count())
            .finish_non_exhaustive()
    }
}

impl Index<TreeId> for TreePool {
    type Output = Tree;

    #[track_caller]
    fn index(&self, id: TreeId) -> &Tree {
        &self.live_slot(id).tree
    }
}

impl IndexMut<TreeId> for TreePool {
    #[track_caller]
    fn index_mut(&mut self, id: TreeId) -> &mut Tree {
        &mut self.live_slot_mut(id).tree
    }
}
