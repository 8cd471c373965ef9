//! Property tests driving the public API of [`ost::Tree`] against
//! `std::collections::BTreeSet`.

mod splay;

use quickcheck::{Arbitrary, Gen};

/// An enum for the various kinds of "things" to do to
/// a tree in a quicktest.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Op<K> {
    /// Insert the K into the tree
    Insert(K),
    /// Erase the K from the tree
    Erase(K),
    /// Erase through the cursor returned by `find`
    EraseAt(K),
    /// Count keys between the two Ks
    CountInRange(K, K),
}

impl<K> Arbitrary for Op<K>
where
    K: Arbitrary,
{
    fn arbitrary(g: &mut Gen) -> Self {
        match g.choose(&[0, 0, 1, 2, 3]).unwrap() {
            0 => Op::Insert(K::arbitrary(g)),
            1 => Op::Erase(K::arbitrary(g)),
            2 => Op::EraseAt(K::arbitrary(g)),
            3 => Op::CountInRange(K::arbitrary(g), K::arbitrary(g)),
            _ => unreachable!(),
        }
    }
}
