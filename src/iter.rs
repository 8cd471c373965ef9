//! Positions and iterators over a [`Tree`].

use std::iter::FusedIterator;

use crate::node::{NodeId, Nodes};
use crate::splay::Tree;

/// A position in a [`Tree`]: either one of its keys or the end position just
/// past the largest key.
///
/// Cursors are plain tokens. They do not borrow the tree, so they can be held
/// across operations that splay. Splaying only moves nodes around, never
/// changes which key a node holds, so a cursor keeps naming the same key until
/// that key is erased. Using a cursor to an erased key panics, even after a
/// later insert has taken over its storage.
///
/// ```
/// use ost::Tree;
///
/// let mut tree: Tree<i32> = (1..=5).collect();
/// let three = tree.find(&3);
///
/// // Splays other keys to the root.
/// tree.find(&5);
/// tree.select(1);
///
/// assert_eq!(tree.get(three), Some(&3));
/// assert_eq!(tree.get(tree.next(three)), Some(&4));
/// assert_eq!(tree.get(tree.prev(three)), Some(&2));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cursor(pub(crate) Option<NodeId>);

impl Cursor {
    pub(crate) const END: Self = Self(None);

    /// Whether this is the end position of its tree.
    pub fn is_end(&self) -> bool {
        self.0.is_none()
    }
}

/// In-order iterator over the keys of a [`Tree`], created by [`Tree::iter`].
/// Reverse iteration (`rbegin`..`rend`) is `tree.iter().rev()`.
pub struct Iter<'a, K> {
    nodes: &'a Nodes<K>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    pub(crate) fn new(
        nodes: &'a Nodes<K>,
        front: Option<NodeId>,
        back: Option<NodeId>,
        remaining: usize,
    ) -> Self {
        Self {
            nodes,
            front,
            back,
            remaining,
        }
    }
}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        self.front = self.nodes.successor(id);
        self.remaining -= 1;
        Some(self.nodes.key(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> DoubleEndedIterator for Iter<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        self.back = self.nodes.predecessor(id);
        self.remaining -= 1;
        Some(self.nodes.key(id))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}

/// Owning iterator over the keys of a [`Tree`] in order.
pub struct IntoIter<K, C> {
    tree: Tree<K, C>,
}

impl<K, C> IntoIter<K, C> {
    pub(crate) fn new(tree: Tree<K, C>) -> Self {
        Self { tree }
    }
}

impl<K, C> Iterator for IntoIter<K, C> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.tree.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len(), Some(self.tree.len()))
    }
}

impl<K, C> DoubleEndedIterator for IntoIter<K, C> {
    fn next_back(&mut self) -> Option<K> {
        self.tree.pop_last()
    }
}

impl<K, C> ExactSizeIterator for IntoIter<K, C> {}

impl<K, C> FusedIterator for IntoIter<K, C> {}

impl<'a, K, C> IntoIterator for &'a Tree<K, C> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

impl<K, C> IntoIterator for Tree<K, C> {
    type Item = K;
    type IntoIter = IntoIter<K, C>;

    fn into_iter(self) -> IntoIter<K, C> {
        IntoIter::new(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::Tree;

    #[test]
    fn iterates_in_both_directions() {
        let tree: Tree<i32> = [5, 1, 4, 2, 3].into_iter().collect();

        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4, 5]);
        assert_eq!(tree.iter().rev().copied().collect::<Vec<_>>(), [5, 4, 3, 2, 1]);
    }

    #[test]
    fn front_and_back_meet_in_the_middle() {
        let tree: Tree<i32> = (1..=4).collect();
        let mut iter = tree.iter();

        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.next_back(), Some(&3));
        assert_eq!(iter.len(), 1);
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let tree: Tree<u8> = Tree::new();
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.iter().next_back(), None);
        assert_eq!(tree.into_iter().next(), None);
    }

    #[test]
    fn into_iter_drains_in_order() {
        let tree: Tree<String> = ["b", "d", "a", "c"].iter().map(|s| s.to_string()).collect();
        let mut iter = tree.into_iter();

        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next().as_deref(), Some("a"));
        assert_eq!(iter.next_back().as_deref(), Some("d"));
        assert_eq!(iter.collect::<Vec<_>>(), ["b", "c"]);
    }

    #[test]
    fn for_loop_over_reference() {
        let tree: Tree<i32> = [3, 1, 2].into_iter().collect();
        let mut seen = Vec::new();
        for key in &tree {
            seen.push(*key);
        }
        assert_eq!(seen, [1, 2, 3]);
    }

    #[test]
    fn cursors_survive_splaying() {
        let mut tree: Tree<i32> = (0..20).collect();
        let cursors: Vec<_> = (0..20).map(|key| tree.find(&key)).collect();

        for rank in (1..=20).rev() {
            tree.select(rank);
        }
        tree.lower_bound(&7);

        for (key, cursor) in (0..20).zip(cursors) {
            assert_eq!(tree.get(cursor), Some(&key));
        }
    }
}
