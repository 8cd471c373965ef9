//! Node storage and the structural primitives of the tree.
//!
//! Nodes live in a slot arena and refer to each other by [`NodeId`]. A node's
//! `parent` link is a plain back reference, so rotating never moves ownership
//! around: it only rewrites indices. Erased slots are threaded onto a free list
//! and reused by later inserts.

use std::mem;

/// Handle to a node inside [`Nodes`]. Stays the same for the whole life of the
/// node, however often it is rotated.
///
/// The `generation` is that of the slot when the node was stored. Releasing a
/// node bumps its slot's generation, so a handle kept past the release never
/// matches whatever key the slot holds next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId {
    index: usize,
    generation: u64,
}

#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    pub(crate) key: K,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    /// How many nodes are in the subtree rooted here, counting this one.
    pub(crate) size: usize,
}

#[derive(Clone, Debug)]
enum Slot<K> {
    Occupied {
        generation: u64,
        node: Node<K>,
    },
    Vacant {
        generation: u64,
        next_free: Option<usize>,
    },
}

impl<K> Slot<K> {
    fn generation(&self) -> u64 {
        match self {
            Slot::Occupied { generation, .. } | Slot::Vacant { generation, .. } => *generation,
        }
    }
}

/// Stands in for the parent of the root. The root is the only node whose
/// `parent` is `None`, and `leftmost`/`rightmost` always name the nodes reached
/// by walking all-left/all-right from it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Header {
    pub(crate) root: Option<NodeId>,
    pub(crate) leftmost: Option<NodeId>,
    pub(crate) rightmost: Option<NodeId>,
}

impl Header {
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Nodes<K> {
    slots: Vec<Slot<K>>,
    free: Option<usize>,
    occupied: usize,
}

impl<K> Default for Nodes<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Nodes<K> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: None,
            occupied: 0,
        }
    }

    /// Stores `key` in a detached leaf of size 1.
    pub(crate) fn alloc(&mut self, key: K) -> NodeId {
        let node = Node {
            key,
            parent: None,
            left: None,
            right: None,
            size: 1,
        };
        self.occupied += 1;
        match self.free {
            Some(index) => {
                let generation = self.slots[index].generation();
                let slot = Slot::Occupied { generation, node };
                match mem::replace(&mut self.slots[index], slot) {
                    Slot::Vacant { next_free, .. } => self.free = next_free,
                    Slot::Occupied { .. } => panic!("free list points at occupied slot {index}"),
                }
                NodeId { index, generation }
            }
            None => {
                self.slots.push(Slot::Occupied {
                    generation: 0,
                    node,
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    /// Frees the slot of `id` and hands back its key. The caller must already
    /// have unlinked the node from the tree.
    pub(crate) fn release(&mut self, id: NodeId) -> K {
        match self.slots.get(id.index) {
            Some(Slot::Occupied { generation, .. }) if *generation == id.generation => {}
            _ => panic!("node {id:?} was already released"),
        }
        let vacant = Slot::Vacant {
            generation: id.generation.wrapping_add(1),
            next_free: self.free,
        };
        match mem::replace(&mut self.slots[id.index], vacant) {
            Slot::Occupied { node, .. } => {
                self.free = Some(id.index);
                self.occupied -= 1;
                node.key
            }
            Slot::Vacant { .. } => unreachable!("checked above"),
        }
    }

    /// Drops every node but keeps the slots, with their generations bumped, on
    /// the free list.
    pub(crate) fn clear(&mut self) {
        let mut free = None;
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            let generation = match slot {
                Slot::Occupied { generation, .. } => generation.wrapping_add(1),
                Slot::Vacant { generation, .. } => *generation,
            };
            *slot = Slot::Vacant {
                generation,
                next_free: free,
            };
            free = Some(index);
        }
        self.free = free;
        self.occupied = 0;
    }

    pub(crate) fn occupied(&self) -> usize {
        self.occupied
    }

    /// ## Panics
    ///
    /// When `id` was released, even if its slot has been reused since.
    pub(crate) fn node(&self, id: NodeId) -> &Node<K> {
        match self.slots.get(id.index) {
            Some(Slot::Occupied { generation, node }) if *generation == id.generation => node,
            _ => panic!("node {id:?} is not in the tree"),
        }
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<K> {
        match self.slots.get_mut(id.index) {
            Some(Slot::Occupied { generation, node }) if *generation == id.generation => node,
            _ => panic!("node {id:?} is not in the tree"),
        }
    }

    pub(crate) fn key(&self, id: NodeId) -> &K {
        &self.node(id).key
    }

    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub(crate) fn left(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).left
    }

    pub(crate) fn right(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).right
    }

    pub(crate) fn size_of(&self, id: Option<NodeId>) -> usize {
        id.map_or(0, |id| self.node(id).size)
    }

    /// Recomputes the size of `id` from its children.
    pub(crate) fn fix_size(&mut self, id: NodeId) {
        let left = self.size_of(self.left(id));
        let right = self.size_of(self.right(id));
        self.node_mut(id).size = left + right + 1;
    }

    pub(crate) fn is_left_child(&self, id: NodeId) -> bool {
        self.parent(id)
            .is_some_and(|parent| self.left(parent) == Some(id))
    }

    /// Hangs the detached node `child` under `parent` on the given side.
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId, left: bool) {
        let slot = if left {
            &mut self.node_mut(parent).left
        } else {
            &mut self.node_mut(parent).right
        };
        debug_assert!(slot.is_none(), "attaching over an existing child");
        *slot = Some(child);
        self.node_mut(child).parent = Some(parent);
    }

    pub(crate) fn minimum(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.left(id) {
            id = left;
        }
        id
    }

    pub(crate) fn maximum(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.right(id) {
            id = right;
        }
        id
    }

    /// In-order successor, found through child and parent links only.
    pub(crate) fn successor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(right) = self.right(id) {
            return Some(self.minimum(right));
        }
        let mut curr = id;
        while let Some(parent) = self.parent(curr) {
            if self.left(parent) == Some(curr) {
                return Some(parent);
            }
            curr = parent;
        }
        None
    }

    /// In-order predecessor.
    pub(crate) fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(left) = self.left(id) {
            return Some(self.maximum(left));
        }
        let mut curr = id;
        while let Some(parent) = self.parent(curr) {
            if self.right(parent) == Some(curr) {
                return Some(parent);
            }
            curr = parent;
        }
        None
    }

    /// Points whichever child link of `parent` held `old` at `new`. Does nothing
    /// when `old` was a root.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: NodeId) {
        let Some(parent) = parent else {
            return;
        };
        let node = self.node_mut(parent);
        if node.left == Some(old) {
            node.left = Some(new);
        } else {
            debug_assert_eq!(node.right, Some(old), "parent does not own child");
            node.right = Some(new);
        }
    }

    /// Rotate `x` to the left. This moves its right child up and `x` down,
    /// and returns the promoted child.
    ///
    /// ## Panics
    ///
    /// When `x` has no right child.
    ///
    /// # Diagram
    ///
    /// ```text
    ///   Option<parent>          Option<parent>
    ///        /                       /
    ///       x                       y
    ///      / \                     / \
    ///     a   y      rotate ->    x   c
    ///        / \                 / \
    ///       b   c               a   b
    /// ```
    pub(crate) fn rotate_left(&mut self, x: NodeId) -> NodeId {
        let y = self.right(x).expect("Rotate left => right child");
        let inner = self.left(y);
        let parent = self.parent(x);

        self.node_mut(x).right = inner;
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(x);
        }

        self.replace_child(parent, x, y);
        self.node_mut(y).parent = parent;
        self.node_mut(y).left = Some(x);
        self.node_mut(x).parent = Some(y);

        self.node_mut(y).size = self.node(x).size;
        self.fix_size(x);
        self.check_sizes(y);
        y
    }

    /// Mirror image of [`Nodes::rotate_left`]: the left child of `x` moves up.
    ///
    /// ## Panics
    ///
    /// When `x` has no left child.
    pub(crate) fn rotate_right(&mut self, x: NodeId) -> NodeId {
        let y = self.left(x).expect("Rotate right => left child");
        let inner = self.right(y);
        let parent = self.parent(x);

        self.node_mut(x).left = inner;
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(x);
        }

        self.replace_child(parent, x, y);
        self.node_mut(y).parent = parent;
        self.node_mut(y).right = Some(x);
        self.node_mut(x).parent = Some(y);

        self.node_mut(y).size = self.node(x).size;
        self.fix_size(x);
        self.check_sizes(y);
        y
    }

    /// Rotates `x` above its parent.
    ///
    /// ## Panics
    ///
    /// When `x` has no parent.
    pub(crate) fn rotate_up(&mut self, x: NodeId) {
        let parent = self.parent(x).expect("Rotating up requires a parent");
        if self.left(parent) == Some(x) {
            self.rotate_right(parent);
        } else {
            self.rotate_left(parent);
        }
    }

    /// Moves `x` to the top of the (sub)tree it lives in, i.e. until it has no
    /// parent. In-order sequence and all subtree sizes are preserved. The
    /// caller records `x` as the new root.
    pub(crate) fn splay(&mut self, x: NodeId) {
        while let Some(parent) = self.parent(x) {
            if self.parent(parent).is_none() {
                // zig
                self.rotate_up(x);
            } else if self.is_left_child(x) == self.is_left_child(parent) {
                // zig-zig
                self.rotate_up(parent);
                self.rotate_up(x);
            } else {
                // zig-zag
                self.rotate_up(x);
                self.rotate_up(x);
            }
        }
    }

    /// Walks the subtree under `root` without recursion, asserting that child
    /// and parent links agree and that every cached size is right. Returns the
    /// number of nodes visited.
    pub(crate) fn check_links(&self, root: Option<NodeId>) -> usize {
        let mut visited = 0;
        let mut stack: Vec<NodeId> = root.into_iter().collect();
        while let Some(id) = stack.pop() {
            visited += 1;
            assert!(visited <= self.occupied, "cycle in the tree links");
            for child in [self.left(id), self.right(id)].into_iter().flatten() {
                assert_eq!(self.parent(child), Some(id), "child {child:?} lost its parent");
                stack.push(child);
            }
            let node = self.node(id);
            assert_eq!(
                node.size,
                self.size_of(node.left) + self.size_of(node.right) + 1,
                "stale size at {id:?}"
            );
        }
        visited
    }

    fn check_sizes(&self, id: NodeId) {
        if cfg!(debug_assertions) {
            let node = self.node(id);
            assert_eq!(node.size, self.size_of(node.left) + self.size_of(node.right) + 1);
        }
    }
}
