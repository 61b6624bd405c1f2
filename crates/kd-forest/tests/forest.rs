//! Tests for forest construction and the accessor surface.

use kd_forest::{Distance, Forest, ForestParams, Thresholding};
use test_case::test_case;

mod common;

#[test]
fn validation_errors() {
    let data = vec![0.0_f32; 12];

    assert!(Forest::new(&data, 0, &ForestParams::default()).is_err(), "zero dimension");
    assert!(
        Forest::new(&data, 3, &ForestParams::default().with_num_trees(0)).is_err(),
        "zero trees"
    );
    assert!(Forest::new(&[] as &[f32], 3, &ForestParams::default()).is_err(), "empty data");
    assert!(Forest::new(&data[..10], 4, &ForestParams::default()).is_err(), "ragged data");
}

#[test]
fn query_errors() -> Result<(), String> {
    let data = vec![0.0_f32; 12];
    let forest = Forest::new(&data, 3, &ForestParams::default())?;
    let mut searcher = forest.searcher();

    assert!(searcher.query(&[0.0; 3], 0).is_err(), "k = 0");
    assert!(searcher.query(&[0.0; 4], 1).is_err(), "query dimension mismatch");

    Ok(())
}

#[test]
fn accessors() -> Result<(), String> {
    let (car, dim) = (64, 3);
    let data = common::data_gen::tabular_f64(car, dim, -1.0, 1.0, 21);
    let params = ForestParams::default()
        .with_num_trees(2)
        .with_distance(Distance::L1)
        .with_thresholding(Thresholding::Mean)
        .with_max_comparisons(32)
        .with_seed(21);
    let mut forest = Forest::new(&data, dim, &params)?;

    assert_eq!(forest.dimension(), dim);
    assert_eq!(forest.cardinality(), car);
    assert_eq!(forest.num_trees(), 2);
    assert_eq!(forest.distance(), Distance::L1);
    assert_eq!(forest.thresholding(), Thresholding::Mean);

    assert_eq!(forest.max_comparisons(), 32);
    forest.set_max_comparisons(0);
    assert_eq!(forest.max_comparisons(), 0);

    let mut total = 0;
    for t in 0..forest.num_trees() {
        let num_nodes = forest.tree_num_nodes(t).ok_or("missing tree")?;
        assert!(num_nodes <= 2 * car - 1, "arena larger than 2N - 1");
        assert!(forest.tree_depth(t).ok_or("missing tree")? < car);
        total += num_nodes;
    }
    assert_eq!(total, forest.num_nodes());

    assert!(forest.tree_depth(2).is_none());
    assert!(forest.tree_num_nodes(2).is_none());

    assert_eq!(forest.point(3), &data[3 * dim..4 * dim]);

    Ok(())
}

#[test_case(1; "one tree")]
#[test_case(4; "four trees")]
fn deterministic_builds(num_trees: usize) -> Result<(), String> {
    let (car, dim, k) = (300, 8, 5);
    let data = common::data_gen::tabular_f32(car, dim, -1.0, 1.0, 42);
    let queries = common::data_gen::rows_f32(20, dim, -1.0, 1.0, 43);
    let params = ForestParams::default().with_num_trees(num_trees).with_seed(17);

    let a = Forest::new(&data, dim, &params)?;
    let b = Forest::new(&data, dim, &params)?;
    let c = Forest::par_new(&data, dim, &params)?;

    for t in 0..num_trees {
        assert_eq!(a.tree_num_nodes(t), b.tree_num_nodes(t), "rebuild changed tree {t}");
        assert_eq!(a.tree_depth(t), b.tree_depth(t), "rebuild changed tree {t}");
        assert_eq!(a.tree_num_nodes(t), c.tree_num_nodes(t), "parallel build changed tree {t}");
        assert_eq!(a.tree_depth(t), c.tree_depth(t), "parallel build changed tree {t}");
    }

    // Identical forests answer identically, whichever way they are queried.
    let hits_a = a.batch_query(&queries, k)?;
    let hits_b = b.batch_query(&queries, k)?;
    let hits_c = c.par_batch_query(&queries, k)?;
    assert_eq!(hits_a, hits_b);
    assert_eq!(hits_a, hits_c);

    Ok(())
}
