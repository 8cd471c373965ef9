use ost::{Error, Tree};
use quickcheck_macros::quickcheck;

use std::collections::BTreeSet;

use crate::Op;

/// Applies a set of operations to a tree and a set.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we have the same set of keys in both.
fn do_ops<K>(ops: &[Op<K>], tree: &mut Tree<K>, set: &mut BTreeSet<K>)
where
    K: Ord + Clone + std::fmt::Debug,
{
    for op in ops {
        match op {
            Op::Insert(k) => {
                assert_eq!(tree.insert(k.clone()).is_ok(), set.insert(k.clone()));
            }
            Op::Erase(k) => {
                assert_eq!(tree.erase(k).ok(), set.take(k));
            }
            Op::EraseAt(k) => {
                let at = tree.find(k);
                if at.is_end() {
                    assert!(!set.contains(k));
                } else {
                    assert_eq!(tree.erase_at(at), set.take(k).unwrap());
                }
            }
            Op::CountInRange(a, b) => {
                let (low, high) = if a <= b { (a, b) } else { (b, a) };
                assert_eq!(tree.count_in_range(a, b), set.range(low..=high).count());
            }
        }
        tree.assert_invariants();
    }
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new();
    let mut set = BTreeSet::new();

    do_ops(&ops, &mut tree, &mut set);
    tree.len() == set.len() && tree.iter().eq(set.iter())
}

#[quickcheck]
fn sorted_round_trip(xs: Vec<i32>) -> bool {
    let tree: Tree<i32> = xs.iter().copied().collect();
    let set: BTreeSet<i32> = xs.into_iter().collect();

    tree.iter().eq(set.iter()) && tree.into_iter().rev().eq(set.into_iter().rev())
}

#[quickcheck]
fn erase_everything_leaves_fresh_tree(xs: Vec<i8>, order: Vec<i8>) -> bool {
    let mut tree: Tree<i8> = xs.iter().copied().collect();
    for x in order.iter().chain(&xs) {
        let _ = tree.erase(x);
        tree.assert_invariants();
    }

    tree.is_empty() && tree == Tree::new() && tree.begin() == tree.end()
}

#[quickcheck]
fn failed_insert_is_idempotent(xs: Vec<i8>) -> bool {
    let mut tree: Tree<i8> = xs.iter().copied().collect();
    let before: Vec<i8> = tree.iter().copied().collect();

    xs.iter().all(|x| tree.insert(*x) == Err(Error::DuplicateKey))
        && tree.iter().copied().eq(before)
}

#[quickcheck]
fn rank_select_duality(xs: Vec<u16>) -> bool {
    let mut tree: Tree<u16> = xs.into_iter().collect();
    (1..=tree.len()).all(|rank| {
        let at = tree.select(rank);
        tree.rank(at) == Ok(rank)
    })
}

#[quickcheck]
fn count_less_than_matches_set(xs: Vec<i8>, queries: Vec<i8>) -> bool {
    let mut tree: Tree<i8> = xs.iter().copied().collect();
    let set: BTreeSet<i8> = xs.into_iter().collect();

    queries
        .iter()
        .all(|p| tree.count_less_than(p) == set.range(..p).count())
}
