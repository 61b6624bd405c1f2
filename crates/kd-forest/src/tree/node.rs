//! A node in a randomized KD-tree.

/// A node in a [`Tree`](super::Tree)'s arena.
///
/// An interior node splits its region in two along a single dimension and
/// records the extent of that region along the same dimension, inherited from
/// the splits of its ancestors. A leaf owns a half-open range of the tree's
/// point-index permutation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Node<U> {
    /// A leaf owning the points at `permutation[begin..end]`.
    Leaf {
        /// The start of the leaf's range in the permutation.
        begin: usize,
        /// One past the end of the leaf's range in the permutation.
        end: usize,
    },
    /// An interior node splitting its region along `split_dimension`.
    Interior {
        /// Arena index of the child holding coordinates at most `threshold`.
        lower_child: usize,
        /// Arena index of the child holding coordinates above `threshold`.
        upper_child: usize,
        /// The dimension this node splits along.
        split_dimension: usize,
        /// The coordinate value separating the two children.
        threshold: U,
        /// The lower extent of this node's region along `split_dimension`.
        lower_bound: U,
        /// The upper extent of this node's region along `split_dimension`.
        upper_bound: U,
    },
}
