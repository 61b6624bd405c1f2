//! Construction of a single randomized KD-tree.

use core::cmp::Reverse;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    forest::Thresholding,
    metric::CoordinateValue,
    utils::{MinItem, SizedHeap},
};

use super::{Node, Tree};

/// Build-time state for one tree: the data being indexed, the split policy,
/// and the scratch the recursion reuses.
///
/// Each tree build owns its scratch and random source, so the trees of a
/// forest can be built concurrently without synchronization.
pub(crate) struct TreeBuilder<'b, U> {
    /// The point data, row-major, `cardinality * dimension` elements.
    data: &'b [U],
    /// The dimensionality of each point.
    dimension: usize,
    /// How split thresholds are chosen.
    thresholding: Thresholding,
    /// How many of the highest-variance dimensions to choose among at a split.
    num_candidates: usize,
    /// The random source for split-dimension choice.
    rng: StdRng,
    /// Scratch: the per-dimension means from the most recent variance scan.
    means: Vec<U>,
}

impl<'b, U: CoordinateValue> TreeBuilder<'b, U> {
    /// Creates a builder for one tree.
    pub(crate) fn new(data: &'b [U], dimension: usize, thresholding: Thresholding, num_candidates: usize, seed: u64) -> Self {
        Self {
            data,
            dimension,
            thresholding,
            num_candidates,
            rng: StdRng::seed_from_u64(seed),
            means: vec![U::zero(); dimension],
        }
    }

    /// Builds the tree over all `cardinality` points.
    pub(crate) fn build(mut self, cardinality: usize) -> Tree<U> {
        let mut tree = Tree::with_capacity(cardinality);
        self.split(&mut tree, 0, cardinality, 0);
        tree
    }

    /// The coordinate of point `index` along `dim`.
    fn coordinate(&self, index: usize, dim: usize) -> U {
        self.data[index * self.dimension + dim]
    }

    /// Recursively partitions `permutation[begin..end]` into a subtree and
    /// returns the arena index of the subtree's root.
    ///
    /// Slices of at most one point become leaves, as do slices whose points
    /// are coincident in every dimension.
    fn split(&mut self, tree: &mut Tree<U>, begin: usize, end: usize, depth: usize) -> usize {
        let index = tree.alloc();

        if end - begin <= 1 {
            tree.seal_leaf(index, begin, end, depth);
            return index;
        }

        // Scan every dimension for the mean and variance of the slice's
        // coordinates, keeping the highest-variance dimensions as split
        // candidates. Zero-variance dimensions cannot separate the slice.
        let mut candidates = SizedHeap::<usize, Reverse<U>>::new(Some(self.num_candidates));
        for dim in 0..self.dimension {
            let (mean, variance) = self.moments(tree, begin, end, dim);
            self.means[dim] = mean;
            if variance > U::zero() {
                candidates.push((dim, Reverse(variance)));
            }
        }

        if candidates.is_empty() {
            tree.seal_leaf(index, begin, end, depth);
            return index;
        }

        let split_dimension = self.choose_dimension(candidates);

        // Sort the slice by the chosen coordinate so a threshold splits it at
        // a single cut point.
        tree.permutation[begin..end].sort_by_key(|&i| MinItem((), self.coordinate(i, split_dimension)));

        let (split_index, threshold) = self.threshold(tree, begin, end, split_dimension);

        let lower_child = self.split(tree, begin, split_index + 1, depth + 1);
        let upper_child = self.split(tree, split_index + 1, end, depth + 1);

        // The region bounds are filled in by `Tree::compute_bounds` once the
        // whole tree is laid out.
        tree.nodes[index] = Node::Interior {
            lower_child,
            upper_child,
            split_dimension,
            threshold,
            lower_bound: U::neg_infinity(),
            upper_bound: U::infinity(),
        };
        index
    }

    /// Picks the split dimension uniformly among the top-variance candidates.
    ///
    /// This choice is the source of diversity among the trees of a forest.
    fn choose_dimension(&mut self, candidates: SizedHeap<usize, Reverse<U>>) -> usize {
        let dims = candidates.into_sorted().into_iter().map(|(dim, _)| dim).collect::<Vec<_>>();
        dims[self.rng.random_range(0..dims.len())]
    }

    /// Computes the mean and variance of the slice's coordinates along `dim`.
    fn moments(&self, tree: &Tree<U>, begin: usize, end: usize, dim: usize) -> (U, U) {
        let slice = &tree.permutation[begin..end];
        let len = U::from_usize(slice.len()).unwrap_or_else(U::one);
        let mean = slice.iter().fold(U::zero(), |acc, &i| acc + self.coordinate(i, dim)) / len;
        let variance = slice
            .iter()
            .fold(U::zero(), |acc, &i| {
                let gap = self.coordinate(i, dim) - mean;
                acc + gap * gap
            })
            / len;
        (mean, variance)
    }

    /// Chooses the split threshold and cut point for a sorted slice.
    ///
    /// Returns `(split_index, threshold)`: the lower child takes
    /// `[begin, split_index + 1)` and the upper child `[split_index + 1, end)`,
    /// so both sides are always non-empty.
    fn threshold(&self, tree: &Tree<U>, begin: usize, end: usize, dim: usize) -> (usize, U) {
        match self.thresholding {
            Thresholding::Median => self.median_split(tree, begin, end, dim),
            // The mean of floating-point coordinates can drift outside the
            // empirical range of the slice, which would leave one side empty;
            // fall back to the median in that case.
            Thresholding::Mean => self
                .mean_split(tree, begin, end, dim)
                .unwrap_or_else(|| self.median_split(tree, begin, end, dim)),
        }
    }

    /// Splits at the median: the threshold is the coordinate of the middle entry.
    fn median_split(&self, tree: &Tree<U>, begin: usize, end: usize, dim: usize) -> (usize, U) {
        let split_index = (begin + end - 1) / 2;
        (split_index, self.coordinate(tree.permutation[split_index], dim))
    }

    /// Splits after the last coordinate at most the slice's mean, or `None`
    /// if every point would land on one side.
    fn mean_split(&self, tree: &Tree<U>, begin: usize, end: usize, dim: usize) -> Option<(usize, U)> {
        let threshold = self.means[dim];
        let cut = tree.permutation[begin..end].partition_point(|&i| self.coordinate(i, dim) <= threshold);
        if cut == 0 || begin + cut >= end {
            None
        } else {
            Some((begin + cut - 1, threshold))
        }
    }
}
