//! Configuration for building a forest.

use core::fmt::{Display, Formatter};

use crate::metric::Distance;

/// How a split threshold is chosen from a slice's coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Thresholding {
    /// Split at the median coordinate. Keeps the trees balanced.
    #[default]
    Median,
    /// Split at the mean coordinate, falling back to the median whenever the
    /// mean would leave one side of the split empty.
    Mean,
}

impl Display for Thresholding {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Median => write!(f, "Median"),
            Self::Mean => write!(f, "Mean"),
        }
    }
}

/// Parameters for building a [`Forest`](crate::Forest).
///
/// The defaults build a single tree with median thresholding under the
/// squared Euclidean distance, searched exactly.
#[must_use]
#[derive(Clone, Copy, Debug)]
pub struct ForestParams {
    /// The number of trees to build.
    num_trees: usize,
    /// The distance function to bind.
    distance: Distance,
    /// How split thresholds are chosen.
    thresholding: Thresholding,
    /// The per-query cap on distance comparisons; `0` means unbounded.
    max_comparisons: usize,
    /// The seed for the split-dimension random source.
    seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            num_trees: 1,
            distance: Distance::default(),
            thresholding: Thresholding::default(),
            max_comparisons: 0,
            seed: 0,
        }
    }
}

impl ForestParams {
    /// Sets the number of trees to build.
    pub const fn with_num_trees(mut self, num_trees: usize) -> Self {
        self.num_trees = num_trees;
        self
    }

    /// Sets the distance function to bind.
    pub const fn with_distance(mut self, distance: Distance) -> Self {
        self.distance = distance;
        self
    }

    /// Sets how split thresholds are chosen.
    pub const fn with_thresholding(mut self, thresholding: Thresholding) -> Self {
        self.thresholding = thresholding;
        self
    }

    /// Sets the per-query cap on distance comparisons; `0` means unbounded.
    pub const fn with_max_comparisons(mut self, max_comparisons: usize) -> Self {
        self.max_comparisons = max_comparisons;
        self
    }

    /// Sets the seed for the split-dimension random source.
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The number of trees to build.
    #[must_use]
    pub const fn num_trees(&self) -> usize {
        self.num_trees
    }

    /// The distance function to bind.
    #[must_use]
    pub const fn distance(&self) -> Distance {
        self.distance
    }

    /// How split thresholds are chosen.
    #[must_use]
    pub const fn thresholding(&self) -> Thresholding {
        self.thresholding
    }

    /// The per-query cap on distance comparisons; `0` means unbounded.
    #[must_use]
    pub const fn max_comparisons(&self) -> usize {
        self.max_comparisons
    }

    /// The seed for the split-dimension random source.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// How many top-variance dimensions each split chooses among.
    ///
    /// A single tree gains nothing from randomization, so it considers only
    /// the highest-variance dimension; larger forests consider up to five.
    pub(crate) fn num_split_candidates(&self) -> usize {
        self.num_trees.min(5)
    }
}
