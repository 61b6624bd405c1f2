//! A total-order adapter for partially-ordered keys.

use core::cmp::Ordering;

/// A pair of associated data and a key, ordered ascending by the key alone.
///
/// This lets float-keyed records live in a `BinaryHeap` and feed `sort_by_key`
/// even though floats are only `PartialOrd`. An incomparable key (NaN) is
/// treated as greater than every other key, so it loses any search for a
/// minimum and floats to the root of a max-heap where a bounded heap evicts
/// it first.
///
/// # Type Parameters
///
/// - `A`: The associated data. Ignored when ordering.
/// - `T`: The key by which items are ordered.
#[derive(Clone, Copy, Debug)]
pub struct MinItem<A, T: PartialOrd>(pub A, pub T);

impl<A, T: PartialOrd> PartialEq for MinItem<A, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<A, T: PartialOrd> Eq for MinItem<A, T> {}

impl<A, T: PartialOrd> PartialOrd for MinItem<A, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A, T: PartialOrd> Ord for MinItem<A, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.1.partial_cmp(&other.1).unwrap_or(Ordering::Greater)
    }
}
