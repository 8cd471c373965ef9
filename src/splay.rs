//! A splay tree whose nodes cache the size of their subtree, giving an ordered
//! set with order-statistics queries.
//!
//! Every lookup moves the node it lands on to the root through a series of
//! rotations ("splaying"). Single operations may take `O(n)`, but any sequence
//! of operations costs `O(log n)` amortized per operation, and recently used
//! keys stay cheap to reach.
//!
//! # Examples
//!
//! ```
//! use ost::{Error, Tree};
//!
//! let mut tree = Tree::new();
//! for key in [40, 10, 30, 20, 50] {
//!     tree.insert(key).unwrap();
//! }
//!
//! // Keys are unique.
//! assert_eq!(tree.insert(30), Err(Error::DuplicateKey));
//!
//! // 1-based positions in sorted order.
//! assert_eq!(tree.rank_of(&30), Ok(3));
//! let second = tree.select(2);
//! assert_eq!(tree.get(second), Some(&20));
//! assert_eq!(tree.count_less_than(&35), 3);
//!
//! assert_eq!(tree.erase(&10), Ok(10));
//! assert_eq!(tree.erase(&10), Err(Error::KeyNotFound));
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [20, 30, 40, 50]);
//! ```

use std::cmp::Ordering;
use std::fmt;

use log::trace;

use crate::compare::{Compare, Natural};
use crate::error::Error;
use crate::iter::{Cursor, Iter};
use crate::node::{Header, NodeId, Nodes};

/// An ordered set of unique keys stored in a size-augmented splay tree.
///
/// Lookups take `&mut self` because they restructure the tree. The set of keys
/// and every [`Cursor`] into it are unaffected by that restructuring.
#[derive(Clone)]
pub struct Tree<K, C = Natural> {
    nodes: Nodes<K>,
    header: Header,
    len: usize,
    compare: C,
}

/// Where a binary search for a key ended.
enum Search {
    /// A node holds the key.
    Found(NodeId),
    /// No node holds the key. It would hang off `parent` (on the left when
    /// `left` is set), or become the root when `parent` is `None`.
    Vacant { parent: Option<NodeId>, left: bool },
}

impl<K> Tree<K> {
    /// Generate a new, empty `Tree` ordered by [`Ord`].
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<K, C: Default> Default for Tree<K, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, C> Tree<K, C> {
    /// Generate a new, empty `Tree` ordered by `compare`.
    pub fn with_comparator(compare: C) -> Self {
        Self {
            nodes: Nodes::new(),
            header: Header::default(),
            len: 0,
            compare,
        }
    }

    /// The number of keys in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        trace!("clearing {} nodes", self.len);
        self.nodes.clear();
        self.header.reset();
        self.len = 0;
    }

    /// The position of the smallest key, or [`Tree::end`] when empty.
    pub fn begin(&self) -> Cursor {
        Cursor(self.header.leftmost)
    }

    /// The position one past the largest key.
    pub fn end(&self) -> Cursor {
        Cursor::END
    }

    /// The position after `cursor` in key order. The end position is its own
    /// successor.
    pub fn next(&self, cursor: Cursor) -> Cursor {
        Cursor(cursor.0.and_then(|id| self.nodes.successor(id)))
    }

    /// The position before `cursor` in key order. Stepping back from the end
    /// gives the largest key, and stepping back from the smallest key gives the
    /// end.
    pub fn prev(&self, cursor: Cursor) -> Cursor {
        match cursor.0 {
            Some(id) => Cursor(self.nodes.predecessor(id)),
            None => Cursor(self.header.rightmost),
        }
    }

    /// The key at `cursor`, or `None` for the end position.
    ///
    /// ## Panics
    ///
    /// When the key `cursor` named has been erased.
    pub fn get(&self, cursor: Cursor) -> Option<&K> {
        cursor.0.map(|id| self.nodes.key(id))
    }

    /// The smallest key.
    pub fn first(&self) -> Option<&K> {
        self.get(self.begin())
    }

    /// The largest key.
    pub fn last(&self) -> Option<&K> {
        self.get(self.prev(self.end()))
    }

    /// Iterates over the keys in order. Use `.rev()` for descending order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(
            &self.nodes,
            self.header.leftmost,
            self.header.rightmost,
            self.len,
        )
    }

    /// Removes and returns the key at `cursor`.
    ///
    /// ## Panics
    ///
    /// When `cursor` is the end position or names a key that was already
    /// erased, even if a later insert has reused its storage.
    pub fn erase_at(&mut self, cursor: Cursor) -> K {
        let id = cursor.0.expect("Cannot erase the end position");
        self.erase_node(id)
    }

    /// Removes and returns the smallest key.
    pub fn pop_first(&mut self) -> Option<K> {
        self.header.leftmost.map(|id| self.erase_node(id))
    }

    /// Removes and returns the largest key.
    pub fn pop_last(&mut self) -> Option<K> {
        self.header.rightmost.map(|id| self.erase_node(id))
    }

    /// The 1-based position of the key at `cursor` in sorted order. The node is
    /// splayed to the root afterwards, so asking again is `O(1)`.
    ///
    /// Returns [`Error::KeyNotFound`] for the end position.
    pub fn rank(&mut self, cursor: Cursor) -> Result<usize, Error> {
        let Some(x) = cursor.0 else {
            return Err(Error::KeyNotFound);
        };

        // Everything left of `x` inside its own subtree, plus, for each
        // ancestor we reach from its right side, that ancestor and its left
        // subtree.
        let mut rank = self.nodes.size_of(self.nodes.left(x)) + 1;
        let mut curr = x;
        while let Some(parent) = self.nodes.parent(curr) {
            if self.nodes.right(parent) == Some(curr) {
                rank += self.nodes.size_of(self.nodes.left(parent)) + 1;
            }
            curr = parent;
        }

        self.splay(x);
        if cfg!(debug_assertions) {
            assert_eq!(rank, self.nodes.size_of(self.nodes.left(x)) + 1);
        }
        Ok(rank)
    }

    /// The position of the key with the given 1-based `rank`, splayed to the
    /// root. Ranks of 0 or greater than [`Tree::len`] give [`Tree::end`].
    pub fn select(&mut self, rank: usize) -> Cursor {
        match self.select_node(rank) {
            Some(id) => {
                self.splay(id);
                Cursor(Some(id))
            }
            None => {
                trace!("select: rank {rank} is outside 1..={}", self.len);
                Cursor::END
            }
        }
    }

    /// Like [`Tree::select`] but reports a bad rank as [`Error::OutOfRange`].
    pub fn try_select(&mut self, rank: usize) -> Result<Cursor, Error> {
        match self.select(rank) {
            cursor if cursor.is_end() => Err(Error::OutOfRange {
                rank,
                len: self.len,
            }),
            cursor => Ok(cursor),
        }
    }

    /// Panics if any structural invariant is broken: links that disagree,
    /// stale subtree sizes, wrong bounds, a wrong length, or keys out of
    /// order.
    pub fn assert_invariants(&self)
    where
        C: Compare<K>,
    {
        let reachable = self.nodes.check_links(self.header.root);
        assert_eq!(reachable, self.len, "len disagrees with the tree");
        assert_eq!(self.nodes.occupied(), self.len, "unreachable nodes");

        match self.header.root {
            Some(root) => {
                assert_eq!(self.nodes.parent(root), None, "root has a parent");
                assert_eq!(self.nodes.node(root).size, self.len);
                assert_eq!(self.header.leftmost, Some(self.nodes.minimum(root)));
                assert_eq!(self.header.rightmost, Some(self.nodes.maximum(root)));
            }
            None => assert_eq!(self.header, Header::default(), "empty tree has bounds"),
        }

        let mut keys = self.iter();
        if let Some(mut prev) = keys.next() {
            for key in keys {
                assert_eq!(
                    self.compare.compare(prev, key),
                    Ordering::Less,
                    "keys out of order"
                );
                prev = key;
            }
        }
    }

    /// Splays `id` to the root of the whole tree.
    fn splay(&mut self, id: NodeId) {
        self.nodes.splay(id);
        self.header.root = Some(id);
    }

    fn select_node(&self, mut rank: usize) -> Option<NodeId> {
        if rank == 0 || rank > self.len {
            return None;
        }
        let mut curr = self.header.root?;
        loop {
            let here = self.nodes.size_of(self.nodes.left(curr)) + 1;
            curr = match rank.cmp(&here) {
                Ordering::Equal => return Some(curr),
                Ordering::Less => self.nodes.left(curr).expect("Sizes => left child"),
                Ordering::Greater => {
                    rank -= here;
                    self.nodes.right(curr).expect("Sizes => right child")
                }
            };
        }
    }

    /// Unlinks `x` and returns its key. `x` is splayed to the root first so
    /// only its two subtrees need joining.
    fn erase_node(&mut self, x: NodeId) -> K {
        self.splay(x);

        match (self.nodes.left(x), self.nodes.right(x)) {
            (None, None) => self.header.reset(),
            // `x` is the root with nothing on its left, so it was the minimum.
            (None, Some(right)) => {
                self.nodes.node_mut(right).parent = None;
                self.header.root = Some(right);
                self.header.leftmost = Some(self.nodes.minimum(right));
            }
            (Some(left), None) => {
                self.nodes.node_mut(left).parent = None;
                self.header.root = Some(left);
                self.header.rightmost = Some(self.nodes.maximum(left));
            }
            (Some(left), Some(right)) => {
                self.nodes.node_mut(left).parent = None;
                self.nodes.node_mut(right).parent = None;

                // The largest key on the left, once on top of its subtree, has
                // no right child and can adopt the whole right subtree.
                let joint = self.nodes.maximum(left);
                self.nodes.splay(joint);
                self.nodes.attach(joint, right, false);
                self.nodes.fix_size(joint);
                self.header.root = Some(joint);
            }
        }

        self.len -= 1;
        trace!("erased node {:?}, {} keys left", x, self.len);
        self.nodes.release(x)
    }
}

impl<K, C: Compare<K>> Tree<K, C> {
    /// Inserts `key`, splays it to the root and returns its position.
    ///
    /// If an equal key is already stored, nothing is inserted and
    /// [`Error::DuplicateKey`] is returned. The stored key is still splayed to
    /// the root, as a successful [`Tree::find`] would.
    ///
    /// # Examples
    ///
    /// ```
    /// use ost::{Error, Tree};
    ///
    /// let mut tree = Tree::new();
    /// let at = tree.insert("b").unwrap();
    /// assert_eq!(tree.get(at), Some(&"b"));
    ///
    /// assert_eq!(tree.insert("b"), Err(Error::DuplicateKey));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K) -> Result<Cursor, Error> {
        let (parent, left) = match self.search(&key) {
            Search::Found(id) => {
                trace!("insert: key already stored at {:?}", id);
                self.splay(id);
                return Err(Error::DuplicateKey);
            }
            Search::Vacant { parent, left } => (parent, left),
        };

        let id = self.nodes.alloc(key);
        match parent {
            None => {
                self.header = Header {
                    root: Some(id),
                    leftmost: Some(id),
                    rightmost: Some(id),
                }
            }
            Some(parent) => {
                self.nodes.attach(parent, id, left);
                let mut ancestor = Some(parent);
                while let Some(a) = ancestor {
                    self.nodes.node_mut(a).size += 1;
                    ancestor = self.nodes.parent(a);
                }
                if left && self.header.leftmost == Some(parent) {
                    self.header.leftmost = Some(id);
                }
                if !left && self.header.rightmost == Some(parent) {
                    self.header.rightmost = Some(id);
                }
            }
        }
        self.len += 1;
        self.splay(id);

        trace!("inserted node {:?}, {} keys", id, self.len);
        Ok(Cursor(Some(id)))
    }

    /// Removes `key` and returns the stored key equal to it.
    ///
    /// Returns [`Error::KeyNotFound`] if no such key is stored.
    pub fn erase(&mut self, key: &K) -> Result<K, Error> {
        match self.search(key) {
            Search::Found(id) => Ok(self.erase_node(id)),
            Search::Vacant { parent, .. } => {
                if let Some(parent) = parent {
                    self.splay(parent);
                }
                trace!("erase: key not found");
                Err(Error::KeyNotFound)
            }
        }
    }

    /// The position of `key`, or [`Tree::end`] if it is not stored.
    ///
    /// The found node is splayed to the root. On a miss the last node the
    /// search looked at is splayed instead.
    pub fn find(&mut self, key: &K) -> Cursor {
        match self.search(key) {
            Search::Found(id) => {
                self.splay(id);
                Cursor(Some(id))
            }
            Search::Vacant { parent, .. } => {
                if let Some(parent) = parent {
                    self.splay(parent);
                }
                Cursor::END
            }
        }
    }

    /// Whether `key` is stored.
    pub fn contains(&mut self, key: &K) -> bool {
        !self.find(key).is_end()
    }

    /// The position of the smallest key not less than `key`, splayed to the
    /// root, or [`Tree::end`] if there is none.
    pub fn lower_bound(&mut self, key: &K) -> Cursor {
        self.bound(|compare, node_key| compare.compare(node_key, key) != Ordering::Less)
    }

    /// The position of the smallest key greater than `key`, splayed to the
    /// root, or [`Tree::end`] if there is none.
    pub fn upper_bound(&mut self, key: &K) -> Cursor {
        self.bound(|compare, node_key| compare.compare(key, node_key) == Ordering::Less)
    }

    /// The 1-based position of `key` in sorted order.
    ///
    /// Returns [`Error::KeyNotFound`] if `key` is not stored.
    pub fn rank_of(&mut self, key: &K) -> Result<usize, Error> {
        let cursor = self.find(key);
        self.rank(cursor)
    }

    /// The number of stored keys strictly less than `key`.
    pub fn count_less_than(&mut self, key: &K) -> usize {
        let bound = self.lower_bound(key);
        let predecessor = self.prev(bound);
        self.rank(predecessor).unwrap_or(0)
    }

    /// The number of stored keys between `a` and `b`, both included. The
    /// bounds may be given in either order.
    pub fn count_in_range(&mut self, a: &K, b: &K) -> usize {
        let (low, high) = match self.compare.compare(a, b) {
            Ordering::Greater => (b, a),
            _ => (a, b),
        };
        let bound = self.upper_bound(high);
        let predecessor = self.prev(bound);
        let up_to_high = self.rank(predecessor).unwrap_or(0);
        up_to_high - self.count_less_than(low)
    }

    fn search(&self, key: &K) -> Search {
        let mut parent = None;
        let mut left = false;
        let mut curr = self.header.root;
        while let Some(id) = curr {
            match self.compare.compare(key, self.nodes.key(id)) {
                Ordering::Equal => return Search::Found(id),
                Ordering::Less => {
                    left = true;
                    curr = self.nodes.left(id);
                }
                Ordering::Greater => {
                    left = false;
                    curr = self.nodes.right(id);
                }
            }
            parent = Some(id);
        }
        Search::Vacant { parent, left }
    }

    /// Finds the smallest key for which `qualifies` holds, assuming it holds
    /// for a suffix of the keys, and splays it to the root.
    fn bound(&mut self, qualifies: impl Fn(&C, &K) -> bool) -> Cursor {
        let mut best = None;
        let mut curr = self.header.root;
        while let Some(id) = curr {
            if qualifies(&self.compare, self.nodes.key(id)) {
                best = Some(id);
                curr = self.nodes.left(id);
            } else {
                curr = self.nodes.right(id);
            }
        }
        if let Some(best) = best {
            self.splay(best);
        }
        Cursor(best)
    }
}

impl<K, C> PartialEq for Tree<K, C>
where
    K: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K: Eq, C> Eq for Tree<K, C> {}

impl<K, C> fmt::Debug for Tree<K, C>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, C: Compare<K>> Extend<K> for Tree<K, C> {
    /// Inserts every key, skipping the ones already stored.
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            let _ = self.insert(key);
        }
    }
}

impl<K, C: Compare<K> + Default> FromIterator<K> for Tree<K, C> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);
        tree
    }
}
