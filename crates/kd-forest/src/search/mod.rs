//! Best-bin-first k-nearest-neighbor search over a forest.

use core::cmp::Reverse;

use rayon::prelude::*;

use crate::{
    forest::Forest,
    metric::CoordinateValue,
    tree::{Node, Tree},
    utils::SizedHeap,
};

/// A single search result: an indexed point and its distance to the query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor<U> {
    /// The index of the point in the forest's data.
    pub index: usize,
    /// The distance from the query to the point, in the forest's norm.
    pub distance: U,
}

/// Counters describing the work done by a searcher's most recent query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// The number of leaf points whose full distance was computed.
    comparisons: usize,
    /// The number of tree nodes stepped through during descents.
    recursions: usize,
    /// The number of sub-regions pruned without being visited.
    simplifications: usize,
}

impl SearchStats {
    /// The number of leaf points whose full distance to the query was
    /// computed. This is the count a comparison budget caps.
    #[must_use]
    pub const fn comparisons(&self) -> usize {
        self.comparisons
    }

    /// The number of tree nodes stepped through while descending to leaves.
    #[must_use]
    pub const fn recursions(&self) -> usize {
        self.recursions
    }

    /// The number of sub-regions pruned because their lower bound could not
    /// improve on the worst kept neighbor.
    #[must_use]
    pub const fn simplifications(&self) -> usize {
        self.simplifications
    }
}

/// Query-time scratch bound to a forest.
///
/// A searcher owns the best-bin-first frontier, the per-point bookkeeping that
/// prevents comparing a point twice when several trees reach it, and the work
/// counters of its most recent query. Searchers borrow their forest, so the
/// forest outlives every searcher; create one searcher per thread to query the
/// same forest concurrently.
pub struct Searcher<'f, 'a, U: CoordinateValue> {
    /// The forest being searched.
    forest: &'f Forest<'a, U>,
    /// The search frontier: `(tree, node)` states keyed by lower-bound distance.
    frontier: SizedHeap<(usize, usize), Reverse<U>>,
    /// For each point, the id of the most recent query that compared it.
    visited: Vec<u64>,
    /// The id of the current query; lets `visited` survive across queries
    /// without being cleared.
    query_id: u64,
    /// Work counters for the most recent query.
    stats: SearchStats,
}

impl<'f, 'a, U: CoordinateValue> Searcher<'f, 'a, U> {
    /// Creates a searcher against `forest`. Use [`Forest::searcher`].
    pub(crate) fn new(forest: &'f Forest<'a, U>) -> Self {
        let mut frontier = SizedHeap::new(None);
        frontier.reserve(forest.num_nodes());
        Self {
            forest,
            frontier,
            visited: vec![0; forest.cardinality()],
            query_id: 0,
            stats: SearchStats::default(),
        }
    }

    /// The forest this searcher queries.
    #[must_use]
    pub const fn forest(&self) -> &'f Forest<'a, U> {
        self.forest
    }

    /// The work counters of the most recent query.
    #[must_use]
    pub const fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Finds the `k` indexed points nearest to `query`.
    ///
    /// Returns neighbors sorted by ascending distance. Under exact search
    /// (an unbounded comparison budget) the result holds `min(k, cardinality)`
    /// entries; a budgeted query that is cut short may return fewer.
    ///
    /// # Errors
    ///
    /// - If `k` is zero.
    /// - If `query`'s length differs from the forest's dimension.
    pub fn query(&mut self, query: &[U], k: usize) -> Result<Vec<Neighbor<U>>, String> {
        if k == 0 {
            return Err("Cannot search for zero neighbors.".to_string());
        }
        if query.len() != self.forest.dimension() {
            return Err(format!(
                "The query has {} coordinates but the forest indexes {}-dimensional points.",
                query.len(),
                self.forest.dimension()
            ));
        }

        self.query_id += 1;
        self.stats = SearchStats::default();
        self.frontier.clear();

        let budget = self.forest.max_comparisons();
        let mut hits = SizedHeap::new(Some(k));

        // Every tree's root is an unexplored region at distance zero.
        for tree_index in 0..self.forest.num_trees() {
            self.frontier.push(((tree_index, Tree::<U>::ROOT), Reverse(U::zero())));
        }

        while let Some(((tree_index, node_index), Reverse(bound))) = self.frontier.pop() {
            if budget > 0 && self.stats.comparisons >= budget {
                break;
            }
            // The frontier pops regions in ascending lower-bound order, so
            // once the closest unexplored region cannot beat the worst kept
            // neighbor, none can.
            if hits.is_full() {
                let worst = hits.peek().map_or_else(|| unreachable!("`hits` is full"), |(_, &d)| d);
                if bound >= worst {
                    self.stats.simplifications += 1;
                    break;
                }
            }
            self.descend(tree_index, node_index, bound, query, budget, &mut hits);
        }

        Ok(hits
            .into_sorted()
            .into_iter()
            .map(|(index, distance)| Neighbor { index, distance })
            .collect())
    }

    /// Walks one root-to-leaf path of a tree.
    ///
    /// `dist` is the admissible lower bound the popped frontier state carried:
    /// the accumulated contribution of the dimensions along which the query
    /// already lies outside this sub-region. At each interior node the walk
    /// follows the side of the threshold the query falls on and pushes the
    /// sibling onto the frontier when its region could still hold a closer
    /// point than the worst kept neighbor. At the leaf it compares the
    /// query against each not-yet-visited point, within the budget.
    fn descend(&mut self, tree_index: usize, node_index: usize, dist: U, query: &[U], budget: usize, hits: &mut SizedHeap<usize, U>) {
        let forest = self.forest;
        let tree = forest.tree(tree_index);
        let distance = forest.distance();

        let mut node_index = node_index;
        loop {
            self.stats.recursions += 1;
            match tree.node(node_index) {
                Node::Leaf { begin, end } => {
                    for &point_index in &tree.permutation()[begin..end] {
                        if budget > 0 && self.stats.comparisons >= budget {
                            return;
                        }
                        // A point reachable through several trees is compared
                        // at most once per query.
                        if self.visited[point_index] == self.query_id {
                            continue;
                        }
                        self.visited[point_index] = self.query_id;

                        let d = distance.between(query, forest.point(point_index));
                        self.stats.comparisons += 1;
                        hits.push((point_index, d));
                    }
                    return;
                }
                Node::Interior {
                    lower_child,
                    upper_child,
                    split_dimension,
                    threshold,
                    lower_bound,
                    upper_bound,
                } => {
                    let q = query[split_dimension];

                    // An admissible lower bound on the distance from the query
                    // to any point in the sibling's region: only the split
                    // dimension's contribution changes between the two sides.
                    let mut save_dist = dist + distance.axis(q, threshold);
                    let (chosen, sibling) = if q <= threshold {
                        if q <= lower_bound {
                            // The query is already outside the region along
                            // this dimension, so part of the threshold term is
                            // already accounted for in `dist`.
                            save_dist -= distance.axis(q, lower_bound);
                        }
                        (lower_child, upper_child)
                    } else {
                        if q > upper_bound {
                            save_dist -= distance.axis(q, upper_bound);
                        }
                        (upper_child, lower_child)
                    };

                    let keep_sibling = !hits.is_full()
                        || hits.peek().map_or_else(|| unreachable!("`hits` is full"), |(_, &worst)| worst > save_dist);
                    if keep_sibling {
                        self.frontier.push(((tree_index, sibling), Reverse(save_dist)));
                    } else {
                        self.stats.simplifications += 1;
                    }

                    node_index = chosen;
                }
            }
        }
    }
}

impl<'a, U: CoordinateValue> Forest<'a, U> {
    /// Creates a searcher against this forest.
    ///
    /// Any number of searchers may exist at once, each with its own scratch.
    #[must_use]
    pub fn searcher(&self) -> Searcher<'_, 'a, U> {
        Searcher::new(self)
    }

    /// Answers every query in order with a single searcher.
    ///
    /// # Errors
    ///
    /// If any query fails; see [`Searcher::query`].
    pub fn batch_query<Q: AsRef<[U]>>(&self, queries: &[Q], k: usize) -> Result<Vec<Vec<Neighbor<U>>>, String> {
        let mut searcher = self.searcher();
        queries.iter().map(|query| searcher.query(query.as_ref(), k)).collect()
    }

    /// Parallel version of [`Forest::batch_query`], with one searcher per
    /// worker thread.
    ///
    /// # Errors
    ///
    /// If any query fails; see [`Searcher::query`].
    pub fn par_batch_query<Q>(&self, queries: &[Q], k: usize) -> Result<Vec<Vec<Neighbor<U>>>, String>
    where
        U: Send + Sync,
        Q: AsRef<[U]> + Send + Sync,
    {
        queries
            .par_iter()
            .map_init(|| self.searcher(), |searcher, query| searcher.query(query.as_ref(), k))
            .collect()
    }
}
