//! A helper struct for maintaining a max heap of an optionally fixed size.

use std::collections::BinaryHeap;

use super::MinItem;

/// A binary heap over `(data, key)` records, optionally bounded in size.
///
/// In bounded mode the heap keeps the `k` records with the smallest keys: the
/// record with the largest key sits at the root and is evicted when a smaller
/// key arrives. This maintains the `k` nearest neighbors during a search.
///
/// Wrapping the key in [`core::cmp::Reverse`] flips both roles: the heap keeps
/// the `k` largest keys, the root holds the smallest, and [`SizedHeap::pop`]
/// returns records in ascending key order. The unbounded `Reverse` form is the
/// best-bin-first search frontier; the bounded `Reverse` form holds the
/// top-variance split candidates during tree construction.
///
/// # Type Parameters
///
/// - `A`: The type of the associated data with each item in the heap. This is
///   ignored when determining the ordering of the heap.
/// - `T`: The type of the keys by which the heap is ordered.
#[derive(Debug)]
pub struct SizedHeap<A, T: PartialOrd> {
    /// The heap of items.
    heap: BinaryHeap<MinItem<A, T>>,
    /// The maximum size of the heap.
    k: usize,
}

impl<A, T: PartialOrd> SizedHeap<A, T> {
    /// Creates a new `SizedHeap`, bounded to `k` items if `k` is `Some`.
    #[must_use]
    pub fn new(k: Option<usize>) -> Self {
        k.map_or_else(
            || Self {
                heap: BinaryHeap::new(),
                k: usize::MAX,
            },
            |k| Self {
                heap: BinaryHeap::with_capacity(k),
                k,
            },
        )
    }

    /// Reserves capacity for at least `additional` more items.
    pub fn reserve(&mut self, additional: usize) {
        self.heap.reserve(additional);
    }

    /// Pushes an item onto the heap, maintaining the max size.
    pub fn push(&mut self, (a, item): (A, T)) {
        if self.heap.len() < self.k {
            self.heap.push(MinItem(a, item));
        } else if let Some(top) = self.heap.peek()
            && item < top.1
        {
            self.heap.pop();
            self.heap.push(MinItem(a, item));
        }
    }

    /// Peeks at the root item of the heap.
    #[must_use]
    pub fn peek(&self) -> Option<(&A, &T)> {
        self.heap.peek().map(|MinItem(a, x)| (a, x))
    }

    /// Pops the root item from the heap.
    pub fn pop(&mut self) -> Option<(A, T)> {
        self.heap.pop().map(|MinItem(a, x)| (a, x))
    }

    /// Removes all items, keeping the allocated capacity.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Returns the number of items in the heap.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns whether the heap is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns whether the heap is full.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.k
    }

    /// Consumes the heap and returns its items sorted ascending by key.
    #[must_use]
    pub fn into_sorted(self) -> Vec<(A, T)> {
        self.heap.into_sorted_vec().into_iter().map(|MinItem(a, x)| (a, x)).collect()
    }
}
