//! A forest of randomized KD-trees for approximate nearest-neighbor search.
//!
//! A [`Forest`] indexes a borrowed set of fixed-dimensional vectors and answers
//! k-nearest-neighbor queries under the L1 or squared-L2 norm. Each tree in the
//! forest partitions the same point set with axis-aligned splits, choosing the
//! split dimension at random among the highest-variance dimensions so that the
//! trees prune differently. Queries run best-bin-first: a single priority
//! frontier shared across all trees always expands the sub-region with the
//! smallest admissible lower bound, as in Beis & Lowe (1997) and Silpa-Anan &
//! Hartley (2008).
//!
//! Search is exact by default. Capping the number of leaf-point distance
//! comparisons per query (see [`ForestParams::with_max_comparisons`]) trades
//! accuracy for bounded query time.
//!
//! ```
//! use kd_forest::{Distance, Forest, ForestParams};
//!
//! // Four points on a line, stored row-major.
//! let data: Vec<f32> = vec![0.0, 1.0, 2.0, 7.0];
//! let params = ForestParams::default().with_num_trees(2).with_seed(42);
//! let forest = Forest::new(&data, 1, &params).unwrap();
//!
//! let mut searcher = forest.searcher();
//! let hits = searcher.query(&[1.4], 2).unwrap();
//!
//! assert_eq!(hits[0].index, 1);
//! assert_eq!(hits[1].index, 2);
//! ```

mod forest;
mod metric;
mod search;
mod tree;
mod utils;

pub use forest::{Forest, ForestParams, Thresholding};
pub use metric::{CoordinateValue, Distance};
pub use search::{Neighbor, SearchStats, Searcher};
