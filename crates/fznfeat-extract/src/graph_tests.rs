use std::time::Duration;

use fznfeat_core::{FeatureMap, Variant};
use indexmap::IndexSet;

use crate::graph::{GraphInputs, GraphOutcome, analyse};

const BUDGET: Duration = Duration::from_secs(2);

fn run(num_vars: usize, edges: &[(u32, u32)], cons_vars: &[Vec<u32>]) -> (FeatureMap, GraphOutcome) {
    let mut features = FeatureMap::new(Variant::Full);
    let vg_edges: IndexSet<(u32, u32)> = edges.iter().copied().collect();
    let inputs = GraphInputs { num_vars, vg_edges: &vg_edges, cons_vars };
    let outcome = analyse(&mut features, &inputs, BUDGET);
    (features, outcome)
}

#[test]
fn empty_inputs_keep_all_sentinels() {
    let (features, outcome) = run(0, &[], &[]);
    assert_eq!(outcome, GraphOutcome::Completed);
    for (key, value) in features.iter() {
        if key.starts_with("gr_") {
            assert_eq!(value, -1.0, "{key}");
        }
    }
}

#[test]
fn path_graph_degrees_and_diameters() {
    // 0 - 1 - 2
    let (f, outcome) = run(3, &[(0, 1), (1, 2)], &[]);
    assert_eq!(outcome, GraphOutcome::Completed);
    assert_eq!(f.get("gr_min_deg_vg"), 1.0);
    assert_eq!(f.get("gr_max_deg_vg"), 2.0);
    assert!((f.get("gr_avg_deg_vg") - 4.0 / 3.0).abs() < 1e-12);
    // Eccentricities 2, 1, 2.
    assert_eq!(f.get("gr_min_diam_vg"), 1.0);
    assert_eq!(f.get("gr_max_diam_vg"), 2.0);
    assert!((f.get("gr_avg_diam_vg") - 5.0 / 3.0).abs() < 1e-12);
    // CG untouched without constraints.
    assert_eq!(f.get("gr_min_deg_cg"), -1.0);
}

#[test]
fn isolated_vertices_join_the_variable_graph() {
    let (f, _) = run(3, &[(0, 1)], &[]);
    assert_eq!(f.get("gr_min_deg_vg"), 0.0);
    assert_eq!(f.get("gr_max_deg_vg"), 1.0);
    // The isolated vertex reaches nothing: eccentricity 0.
    assert_eq!(f.get("gr_min_diam_vg"), 0.0);
}

#[test]
fn disconnected_components_have_local_diameters() {
    // Two disjoint edges.
    let (f, _) = run(4, &[(0, 1), (2, 3)], &[]);
    assert_eq!(f.get("gr_max_diam_vg"), 1.0);
    assert_eq!(f.get("gr_min_diam_vg"), 1.0);
}

#[test]
fn constraint_graph_from_shared_variables() {
    // Constraints {0,1}, {1,2}, {3}: the first two share variable 1.
    let cons = vec![vec![0, 1], vec![1, 2], vec![3]];
    let (f, outcome) = run(4, &[], &cons);
    assert_eq!(outcome, GraphOutcome::Completed);
    assert_eq!(f.get("gr_min_deg_cg"), 0.0);
    assert_eq!(f.get("gr_max_deg_cg"), 1.0);
    assert!((f.get("gr_avg_deg_cg") - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn triangle_constraint_graph_clusters_fully() {
    // Pairwise-overlapping constraints: a CG triangle.
    let cons = vec![vec![0, 1], vec![1, 2], vec![0, 2]];
    let (f, _) = run(3, &[], &cons);
    assert_eq!(f.get("gr_min_deg_cg"), 2.0);
    assert_eq!(f.get("gr_max_deg_cg"), 2.0);
    assert_eq!(f.get("gr_min_clust_cg"), 1.0);
    assert_eq!(f.get("gr_max_clust_cg"), 1.0);
    assert_eq!(f.get("gr_avg_clust_cg"), 1.0);
    assert_eq!(f.get("gr_cv_clust_cg"), 0.0);
    assert!(f.get("gr_ent_clust_cg").abs() < 1e-12);
}

#[test]
fn open_triple_has_zero_clustering() {
    // Constraints sharing through the middle only: a CG path.
    let cons = vec![vec![0, 1], vec![1, 2], vec![2, 3]];
    let (f, _) = run(4, &[], &cons);
    assert_eq!(f.get("gr_min_clust_cg"), 0.0);
    assert_eq!(f.get("gr_max_clust_cg"), 0.0);
}

#[test]
fn disjoint_id_sets_produce_no_cg_edges() {
    let cons = vec![vec![0, 1], vec![2, 3], vec![4, 9]];
    let (f, _) = run(10, &[], &cons);
    assert_eq!(f.get("gr_max_deg_cg"), 0.0);
}

#[test]
fn single_constraint_graph() {
    let cons = vec![vec![0, 1]];
    let (f, _) = run(2, &[(0, 1)], &cons);
    // One vertex of degree 0; all statistics degenerate to zero.
    assert_eq!(f.get("gr_min_deg_cg"), 0.0);
    assert_eq!(f.get("gr_max_deg_cg"), 0.0);
    assert_eq!(f.get("gr_avg_deg_cg"), 0.0);
    assert_eq!(f.get("gr_cv_deg_cg"), 0.0);
    assert_eq!(f.get("gr_ent_deg_cg"), 0.0);
}

#[test]
fn zero_budget_times_out_and_keeps_sentinels() {
    let mut features = FeatureMap::new(Variant::Full);
    let vg_edges: IndexSet<(u32, u32)> = [(0, 1)].into_iter().collect();
    let cons = vec![vec![0, 1]];
    let inputs = GraphInputs { num_vars: 2, vg_edges: &vg_edges, cons_vars: &cons };
    let outcome = analyse(&mut features, &inputs, Duration::ZERO);
    assert_eq!(outcome, GraphOutcome::TimedOut);
    for (key, value) in features.iter() {
        if key.starts_with("gr_") {
            assert_eq!(value, -1.0, "{key}");
        }
    }
}
