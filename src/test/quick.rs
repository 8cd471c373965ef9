use quickcheck::{Arbitrary, Gen};

/// An enum for the various kinds of "things" to do to
/// a tree in a quicktest.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Op<K> {
    /// Insert the K into the tree
    Insert(K),
    /// Erase the K from the tree
    Erase(K),
    /// Look the K up
    Find(K),
    /// Smallest key not less than K
    LowerBound(K),
    /// Smallest key greater than K
    UpperBound(K),
    /// Rank of the K
    Rank(K),
    /// Key at the given 1-based rank
    Select(usize),
    /// How many keys are below K
    CountLessThan(K),
    /// Remove the smallest key
    PopFirst,
    /// Remove the largest key
    PopLast,
    /// Compare iterators
    Iter,
}

impl<K> Arbitrary for Op<K>
where
    K: Arbitrary,
{
    /// Tells quickcheck how to randomly choose an operation. Inserts are
    /// weighted up so trees get big enough to be interesting.
    fn arbitrary(g: &mut Gen) -> Self {
        match g.choose(&[0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10]).unwrap() {
            0 => Op::Insert(K::arbitrary(g)),
            1 => Op::Erase(K::arbitrary(g)),
            2 => Op::Find(K::arbitrary(g)),
            3 => Op::LowerBound(K::arbitrary(g)),
            4 => Op::UpperBound(K::arbitrary(g)),
            5 => Op::Rank(K::arbitrary(g)),
            6 => Op::Select(u8::arbitrary(g) as usize % 64),
            7 => Op::CountLessThan(K::arbitrary(g)),
            8 => Op::PopFirst,
            9 => Op::PopLast,
            10 => Op::Iter,
            _ => unreachable!(),
        }
    }
}
