//! Shared helpers for the integration tests.

pub mod data_gen;

use kd_forest::{CoordinateValue, Distance, Neighbor};
use ordered_float::OrderedFloat;

/// Brute-force k-nearest neighbors: the oracle the forest is checked against.
#[allow(dead_code)]
pub fn exact_knn<U>(data: &[U], dimension: usize, query: &[U], k: usize, distance: Distance) -> Vec<Neighbor<U>>
where
    U: CoordinateValue + num_traits::float::FloatCore,
{
    let mut hits = (0..data.len() / dimension)
        .map(|index| Neighbor {
            index,
            distance: distance.between(query, &data[index * dimension..(index + 1) * dimension]),
        })
        .collect::<Vec<_>>();
    hits.sort_by_key(|n| OrderedFloat(n.distance));
    hits.truncate(k);
    hits
}

/// Asserts that a result is sorted by non-decreasing distance.
#[allow(dead_code)]
pub fn assert_sorted<U: CoordinateValue>(hits: &[Neighbor<U>]) {
    for window in hits.windows(2) {
        assert!(
            window[0].distance <= window[1].distance,
            "results are not sorted by distance: {} then {}",
            window[0].distance,
            window[1].distance,
        );
    }
}

/// Asserts that no point index appears twice in a result.
#[allow(dead_code)]
pub fn assert_distinct<U: CoordinateValue>(hits: &[Neighbor<U>]) {
    let mut indices = hits.iter().map(|n| n.index).collect::<Vec<_>>();
    indices.sort_unstable();
    let total = indices.len();
    indices.dedup();
    assert_eq!(indices.len(), total, "a point index appears more than once");
}
