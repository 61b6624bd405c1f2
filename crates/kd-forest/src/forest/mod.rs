//! A forest of independently-randomized KD-trees over one point set.

use rayon::prelude::*;

use crate::{
    metric::{CoordinateValue, Distance},
    tree::{Tree, TreeBuilder},
};

mod params;

pub use params::{ForestParams, Thresholding};

/// A forest of randomized KD-trees over a borrowed point set.
///
/// The data is `cardinality * dimension` elements, row-major, and must outlive
/// the forest; the forest stores only the borrow. Construction builds every
/// tree, so a forest value is always searchable: [`Forest::searcher`] hands
/// out query scratch tied to the forest's lifetime, and re-indexing different
/// data means building a fresh forest.
pub struct Forest<'a, U: CoordinateValue> {
    /// The indexed point data, row-major.
    data: &'a [U],
    /// The dimensionality of each point.
    dimension: usize,
    /// The number of indexed points.
    cardinality: usize,
    /// The distance function bound at construction.
    distance: Distance,
    /// The per-query cap on distance comparisons; `0` means unbounded.
    max_comparisons: usize,
    /// The thresholding method the trees were built with.
    thresholding: Thresholding,
    /// The independently-built trees.
    trees: Vec<Tree<U>>,
    /// The total node count across all trees; sizes searcher frontiers.
    num_nodes: usize,
}

impl<'a, U: CoordinateValue> Forest<'a, U> {
    /// Builds a forest over `data`.
    ///
    /// # Errors
    ///
    /// - If `dimension` is zero.
    /// - If `params` asks for zero trees.
    /// - If `data` is empty or its length is not a multiple of `dimension`.
    pub fn new(data: &'a [U], dimension: usize, params: &ForestParams) -> Result<Self, String> {
        let cardinality = validate(data, dimension, params)?;
        ftlog::info!(
            "Building a forest of {} trees over {cardinality} points in {dimension} dimensions ({} thresholding, {}).",
            params.num_trees(),
            params.thresholding(),
            params.distance(),
        );

        let trees = (0..params.num_trees())
            .map(|i| grow_tree(data, dimension, cardinality, params, i))
            .collect();

        Ok(Self::assemble(data, dimension, cardinality, params, trees))
    }

    /// Parallel version of [`Forest::new`]: the trees are built concurrently.
    ///
    /// The per-tree random seeds are derived the same way as in
    /// [`Forest::new`], so both constructors grow identical forests.
    ///
    /// # Errors
    ///
    /// See [`Forest::new`].
    pub fn par_new(data: &'a [U], dimension: usize, params: &ForestParams) -> Result<Self, String>
    where
        U: Send + Sync,
    {
        let cardinality = validate(data, dimension, params)?;
        ftlog::info!(
            "Building a forest of {} trees over {cardinality} points in {dimension} dimensions ({} thresholding, {}), in parallel.",
            params.num_trees(),
            params.thresholding(),
            params.distance(),
        );

        let trees = (0..params.num_trees())
            .into_par_iter()
            .map(|i| grow_tree(data, dimension, cardinality, params, i))
            .collect();

        Ok(Self::assemble(data, dimension, cardinality, params, trees))
    }

    /// Assembles the forest once its trees are built.
    fn assemble(data: &'a [U], dimension: usize, cardinality: usize, params: &ForestParams, trees: Vec<Tree<U>>) -> Self {
        let num_nodes = trees.iter().map(Tree::num_nodes).sum();
        Self {
            data,
            dimension,
            cardinality,
            distance: params.distance(),
            max_comparisons: params.max_comparisons(),
            thresholding: params.thresholding(),
            trees,
            num_nodes,
        }
    }

    /// The dimensionality of the indexed points.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// The number of indexed points.
    #[must_use]
    pub const fn cardinality(&self) -> usize {
        self.cardinality
    }

    /// The number of trees in the forest.
    #[must_use]
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// The total number of nodes across all trees.
    #[must_use]
    pub const fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// The distance function bound at construction.
    #[must_use]
    pub const fn distance(&self) -> Distance {
        self.distance
    }

    /// The thresholding method the trees were built with.
    #[must_use]
    pub const fn thresholding(&self) -> Thresholding {
        self.thresholding
    }

    /// The per-query cap on distance comparisons; `0` means unbounded.
    #[must_use]
    pub const fn max_comparisons(&self) -> usize {
        self.max_comparisons
    }

    /// Caps the number of distance comparisons per query; `0` means unbounded.
    ///
    /// The cap bounds query time at the cost of exactness. It is read at the
    /// start of each query, so it cannot change while searchers exist.
    pub fn set_max_comparisons(&mut self, max_comparisons: usize) {
        self.max_comparisons = max_comparisons;
    }

    /// The maximum leaf depth of the tree at `index`, or `None` if the forest
    /// has no such tree.
    #[must_use]
    pub fn tree_depth(&self, index: usize) -> Option<usize> {
        self.trees.get(index).map(Tree::depth)
    }

    /// The node count of the tree at `index`, or `None` if the forest has no
    /// such tree.
    #[must_use]
    pub fn tree_num_nodes(&self, index: usize) -> Option<usize> {
        self.trees.get(index).map(Tree::num_nodes)
    }

    /// The coordinates of the indexed point at `index`.
    ///
    /// # Panics
    ///
    /// If `index` is not below the forest's cardinality.
    #[must_use]
    pub fn point(&self, index: usize) -> &'a [U] {
        &self.data[index * self.dimension..(index + 1) * self.dimension]
    }

    /// The tree at `index`.
    pub(crate) fn tree(&self, index: usize) -> &Tree<U> {
        &self.trees[index]
    }
}

/// Checks the build preconditions and returns the cardinality.
fn validate<U: CoordinateValue>(data: &[U], dimension: usize, params: &ForestParams) -> Result<usize, String> {
    if dimension == 0 {
        return Err("The dimension must be at least 1.".to_string());
    }
    if params.num_trees() == 0 {
        return Err("A forest must have at least one tree.".to_string());
    }
    if data.is_empty() {
        return Err("Cannot build a forest over an empty point set.".to_string());
    }
    if !data.len().is_multiple_of(dimension) {
        return Err(format!(
            "The data length {} is not a multiple of the dimension {dimension}.",
            data.len()
        ));
    }
    Ok(data.len() / dimension)
}

/// Builds one tree and computes its region bounds.
fn grow_tree<U: CoordinateValue>(data: &[U], dimension: usize, cardinality: usize, params: &ForestParams, index: usize) -> Tree<U> {
    let builder = TreeBuilder::new(
        data,
        dimension,
        params.thresholding(),
        params.num_split_candidates(),
        tree_seed(params.seed(), index),
    );
    let mut tree = builder.build(cardinality);
    tree.compute_bounds(dimension);
    ftlog::debug!("Tree {index}: {} nodes, leaf depth {}.", tree.num_nodes(), tree.depth());
    tree
}

/// Derives a per-tree seed, so sequential and parallel builds agree tree by tree.
const fn tree_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
