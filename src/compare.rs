//! Key ordering used by [`Tree`][crate::Tree].

use std::cmp::Ordering;

/// A total order over `K`. The tree never stores two keys that compare
/// [`Ordering::Equal`].
///
/// Any closure of type `Fn(&K, &K) -> Ordering` is a `Compare<K>`, so a tree
/// sorted in reverse can be built with:
///
/// ```
/// use ost::Tree;
///
/// let mut tree = Tree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
/// tree.extend([1, 3, 2]);
///
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [3, 2, 1]);
/// ```
pub trait Compare<K: ?Sized> {
    /// Compares `a` with `b`.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

impl<K, F> Compare<K> for F
where
    K: ?Sized,
    F: Fn(&K, &K) -> Ordering,
{
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

/// The natural [`Ord`] ordering. This is the comparator used by
/// [`Tree::new`][crate::Tree::new].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}
