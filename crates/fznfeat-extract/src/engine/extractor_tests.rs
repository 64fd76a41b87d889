use fznfeat_core::{Expr, Variant};

use super::{ArrayDecl, FeatureExtractor, SolveGoal, VarDecl, VarKind};

fn int_decl(name: &str, dom_size: f64) -> VarDecl {
    VarDecl {
        name: name.to_owned(),
        kind: VarKind::Int,
        dom_size,
        anns: Vec::new(),
    }
}

fn bool_decl(name: &str) -> VarDecl {
    VarDecl {
        name: name.to_owned(),
        kind: VarKind::Bool,
        dom_size: 2.0,
        anns: Vec::new(),
    }
}

/// `name(args...)` as the engine's constraint parameter list.
fn cons(name: &str, args: &[&str]) -> Vec<Expr> {
    let mut params = vec![Expr::str(name)];
    params.extend(args.iter().map(|a| Expr::str(*a)));
    params
}

#[test]
fn empty_model() {
    let mut engine = FeatureExtractor::new(Variant::Full);
    engine.set_solve_goal(SolveGoal::Satisfy);
    let extraction = engine.finalise();
    let f = &extraction.features;

    assert_eq!(f.get("v_num_vars"), 0.0);
    assert_eq!(f.get("c_num_cons"), 0.0);
    assert_eq!(f.get("s_goal"), 1.0);
    assert_eq!(f.get("v_ratio_vars"), 0.0);
    assert_eq!(f.get("c_ratio_cons"), 0.0);
    assert_eq!(f.get("v_ratio_bounded"), 0.0);
    assert_eq!(f.get("gc_ratio_globs"), 0.0);
    assert_eq!(f.get("gc_ratio_diff"), 0.0);
    for kind in ["bool", "float", "int", "set"] {
        assert_eq!(f.get(&format!("d_ratio_{kind}_vars")), 0.0);
    }
    // No vertices anywhere: the graph features keep their sentinels.
    for key in ["gr_min_deg_vg", "gr_avg_deg_cg", "gr_max_diam_vg", "gr_ent_clust_cg"] {
        assert_eq!(f.get(key), -1.0);
    }
}

#[test]
fn single_bool_variable() {
    let mut engine = FeatureExtractor::new(Variant::Full);
    engine.update_variable(bool_decl("b"));
    engine.set_solve_goal(SolveGoal::Satisfy);
    let f = engine.finalise().features;

    assert_eq!(f.get("d_bool_vars"), 1.0);
    assert_eq!(f.get("v_num_vars"), 1.0);
    assert_eq!(f.get("v_min_dom_vars"), 2.0);
    assert_eq!(f.get("v_max_dom_vars"), 2.0);
    assert_eq!(f.get("c_num_cons"), 0.0);
    // Objective features are absent for a satisfaction goal.
    for key in ["o_dom", "o_deg", "o_dom_avg", "o_deg_cons"] {
        assert_eq!(f.get(key), 0.0);
    }
}

#[test]
fn two_variables_one_equality() {
    let mut engine = FeatureExtractor::new(Variant::Full);
    engine.update_variable(int_decl("x", 10.0));
    engine.update_variable(int_decl("y", 10.0));
    engine.update_constraint(cons("int_eq", &["x", "y"]), &[]);
    engine.set_solve_goal(SolveGoal::Satisfy);
    let f = engine.finalise().features;

    assert_eq!(f.get("c_num_cons"), 1.0);
    assert_eq!(f.get("d_int_cons"), 1.0);
    let expected_dom = 2.0 * 10.0f64.log2();
    assert!((f.get("c_sum_dom_cons") - expected_dom).abs() < 1e-9);
    assert_eq!(f.get("c_min_deg_cons"), 2.0);
    assert_eq!(f.get("c_max_deg_cons"), 2.0);
    assert_eq!(f.get("c_sum_ari_cons"), 2.0);

    // VG: two vertices, one edge. CG: one vertex of degree 0.
    assert_eq!(f.get("gr_min_deg_vg"), 1.0);
    assert_eq!(f.get("gr_max_deg_vg"), 1.0);
    assert_eq!(f.get("gr_min_deg_cg"), 0.0);
    assert_eq!(f.get("gr_max_deg_cg"), 0.0);
    assert_eq!(f.get("gr_ent_deg_cg"), 0.0);
}

#[test]
fn global_array_constraint_with_objective() {
    let mut engine = FeatureExtractor::new(Variant::Full);
    engine.update_var_array(ArrayDecl {
        name: "a".to_owned(),
        kind: VarKind::Int,
        dom_size: 5.0,
        begin: 1,
        end: 5,
        anns: Vec::new(),
    });
    engine.update_constraint(cons("fzn_all_different_int", &["a"]), &[]);
    engine.set_solve_goal(SolveGoal::Minimize);
    engine.set_objective_variable("a[1]");
    let f = engine.finalise().features;

    assert_eq!(f.get("gc_global_cons"), 1.0);
    assert_eq!(f.get("gc_diff_globs"), 1.0);
    assert_eq!(f.get("gc_ratio_diff"), 1.0);
    assert_eq!(f.get("d_int_vars"), 5.0);
    assert_eq!(f.get("v_min_deg_vars"), 1.0);
    assert_eq!(f.get("v_max_deg_vars"), 1.0);
    assert_eq!(f.get("o_deg"), 1.0);
    assert_eq!(f.get("o_dom"), 5.0);
    assert_eq!(f.get("s_goal"), 2.0);
    // One constraint over five variables.
    assert_eq!(f.get("c_min_deg_cons"), 5.0);
    assert_eq!(f.get("o_deg_cons"), 1.0);
}

#[test]
fn alias_cluster_collapses_to_one_hop() {
    let mut engine = FeatureExtractor::new(Variant::Full);
    engine.update_variable(int_decl("z", 3.0));
    engine.update_assigned_variable(int_decl("y", 3.0), &Expr::str("z"));
    engine.update_assigned_variable(int_decl("x", 3.0), &Expr::str("y"));

    let x = engine.symbols().get("x").unwrap();
    let target = x.alias.as_ref().unwrap();
    assert_eq!(target.name, "z");
    assert!(target.alias.is_none());

    engine.set_solve_goal(SolveGoal::Satisfy);
    let f = engine.finalise().features;
    assert_eq!(f.get("v_num_aliases"), 2.0);
    assert_eq!(f.get("v_num_vars"), 1.0);
}

#[test]
fn aliases_count_once_per_constraint() {
    let mut engine = FeatureExtractor::new(Variant::Full);
    engine.update_variable(int_decl("z", 4.0));
    engine.update_assigned_variable(int_decl("x", 4.0), &Expr::str("z"));
    // Both names resolve to z: degree 1, not 2.
    engine.update_constraint(cons("int_eq", &["x", "z"]), &[]);
    engine.set_solve_goal(SolveGoal::Satisfy);

    let f = engine.finalise().features;
    assert_eq!(f.get("c_num_cons"), 1.0);
    assert_eq!(f.get("c_min_deg_cons"), 1.0);
    assert_eq!(f.get("v_max_deg_vars"), 1.0);
}

#[test]
fn degree_zero_constraint_leaves_the_row_unchanged() {
    let mut engine = FeatureExtractor::new(Variant::NoGraph);
    engine.update_variable(int_decl("x", 4.0));
    engine.set_solve_goal(SolveGoal::Satisfy);
    let baseline = engine.features().clone();

    engine.update_constraint(
        vec![Expr::str("int_lt"), Expr::Int(1), Expr::Int(2)],
        &[Expr::str("domain")],
    );
    let after: Vec<(&str, f64)> = engine.features().iter().collect();
    let before: Vec<(&str, f64)> = baseline.iter().collect();
    assert_eq!(before, after);
}

#[test]
fn unknown_references_are_ignored() {
    let mut engine = FeatureExtractor::new(Variant::Full);
    engine.update_variable(int_decl("x", 4.0));
    engine.update_constraint(cons("int_eq", &["x", "ghost"]), &[]);
    engine.set_solve_goal(SolveGoal::Satisfy);
    let f = engine.finalise().features;
    assert_eq!(f.get("c_num_cons"), 1.0);
    assert_eq!(f.get("c_min_deg_cons"), 1.0);
}

#[test]
fn assigned_variables_do_not_join_constraints() {
    let mut engine = FeatureExtractor::new(Variant::Full);
    engine.update_assigned_variable(int_decl("k", 4.0), &Expr::Int(2));
    engine.update_constraint(cons("int_eq", &["k"]), &[]);
    engine.set_solve_goal(SolveGoal::Satisfy);
    let f = engine.finalise().features;
    // Only a constant was referenced: the constraint was dropped.
    assert_eq!(f.get("c_num_cons"), 0.0);
    assert_eq!(f.get("v_num_consts"), 1.0);
}

#[test]
fn vg_edge_insertion_is_idempotent() {
    let mut engine = FeatureExtractor::new(Variant::Full);
    engine.update_variable(int_decl("x", 4.0));
    engine.update_variable(int_decl("y", 4.0));
    engine.update_variable(int_decl("z", 4.0));

    engine.update_constraint(cons("int_plus", &["x", "y", "z"]), &[]);
    let edges_once = engine.vg_edges.len();
    assert_eq!(edges_once, 3);

    // Re-ingesting the same constraint adds no VG edges.
    engine.update_constraint(cons("int_plus", &["x", "y", "z"]), &[]);
    assert_eq!(engine.vg_edges.len(), edges_once);
    assert_eq!(engine.cons_vars.len(), 2);
}

#[test]
fn annotation_counters() {
    let mut engine = FeatureExtractor::new(Variant::Full);
    engine.update_variable(int_decl("x", 4.0));
    let priority = Expr::Array(vec![Expr::str("priority"), Expr::Int(3)]);
    engine.update_constraint(
        cons("int_eq", &["x"]),
        &[priority, Expr::str("boundsR"), Expr::str("domain")],
    );
    engine.set_solve_goal(SolveGoal::Satisfy);
    let f = engine.finalise().features;

    assert_eq!(f.get("c_priority"), 1.0);
    // Only the first bounds/domain tag counts.
    assert_eq!(f.get("c_bounds_r"), 1.0);
    assert_eq!(f.get("c_domain"), 0.0);
}

#[test]
fn declaration_annotations_scale_with_array_length() {
    let mut engine = FeatureExtractor::new(Variant::Full);
    engine.update_var_array(ArrayDecl {
        name: "a".to_owned(),
        kind: VarKind::Bool,
        dom_size: 2.0,
        begin: 1,
        end: 3,
        anns: vec![Expr::str("var_is_introduced"), Expr::str("is_defined_var")],
    });
    engine.update_assigned_variable(
        VarDecl {
            name: "d".to_owned(),
            kind: VarKind::Bool,
            dom_size: 2.0,
            anns: vec![Expr::str("is_defined_var")],
        },
        &Expr::Bool(true),
    );
    engine.set_solve_goal(SolveGoal::Satisfy);
    let f = engine.finalise().features;

    assert_eq!(f.get("v_intro_vars"), 3.0);
    assert_eq!(f.get("v_def_vars"), 4.0);
}

#[test]
fn search_annotations() {
    let mut engine = FeatureExtractor::new(Variant::Full);
    engine.update_variable(int_decl("x", 4.0));
    engine.update_variable(int_decl("y", 4.0));
    engine.update_variable(bool_decl("b"));

    // seq_search([int_search([x, x, y], input_order, indomain_min, complete),
    //             bool_search([b], first_fail, indomain_max, complete)])
    let int_search = Expr::Array(vec![
        Expr::str("int_search"),
        Expr::Array(vec![Expr::str("x"), Expr::str("x"), Expr::str("y")]),
        Expr::str("input_order"),
        Expr::str("indomain_min"),
        Expr::str("complete"),
    ]);
    let bool_search = Expr::Array(vec![
        Expr::str("bool_search"),
        Expr::Array(vec![Expr::str("b")]),
        Expr::str("first_fail"),
        Expr::str("indomain_max"),
        Expr::str("complete"),
    ]);
    let seq = Expr::Array(vec![
        Expr::str("seq_search"),
        Expr::Array(vec![int_search, bool_search]),
    ]);
    engine.set_solve_goal(SolveGoal::Satisfy);
    engine.update_solve(&[seq]);
    let f = engine.finalise().features;

    assert_eq!(f.get("s_int_search"), 1.0);
    assert_eq!(f.get("s_bool_search"), 1.0);
    // x is listed twice but labelled once.
    assert_eq!(f.get("s_labeled_vars"), 3.0);
    assert_eq!(f.get("s_input_order"), 1.0);
    assert_eq!(f.get("s_first_fail"), 1.0);
    assert_eq!(f.get("s_indomain_min"), 1.0);
    assert_eq!(f.get("s_indomain_max"), 1.0);
    assert_eq!(f.get("s_other_var"), 0.0);
    assert_eq!(f.get("s_other_val"), 0.0);
}

#[test]
fn objective_resolves_through_aliases() {
    let mut engine = FeatureExtractor::new(Variant::Full);
    engine.update_variable(int_decl("z", 8.0));
    engine.update_variable(int_decl("w", 8.0));
    engine.update_assigned_variable(int_decl("obj", 8.0), &Expr::str("z"));
    engine.update_constraint(cons("int_le", &["z", "w"]), &[]);
    engine.set_solve_goal(SolveGoal::Maximize);
    engine.set_objective_variable("obj");
    let f = engine.finalise().features;

    assert_eq!(f.get("s_goal"), 3.0);
    assert_eq!(f.get("o_dom"), 8.0);
    assert_eq!(f.get("o_deg"), 1.0);
}

#[test]
fn conservation_invariants() {
    let mut engine = FeatureExtractor::new(Variant::Full);
    engine.update_variable(bool_decl("b"));
    engine.update_variable(int_decl("x", 10.0));
    engine.update_variable(int_decl("y", 7.0));
    engine.update_variable(VarDecl {
        name: "s".to_owned(),
        kind: VarKind::Set,
        dom_size: 8.0,
        anns: Vec::new(),
    });
    engine.update_constraint(cons("int_eq", &["x", "y"]), &[]);
    engine.update_constraint(cons("bool_not", &["b"]), &[]);
    engine.update_constraint(cons("fzn_all_different_int", &["x", "y"]), &[]);
    engine.set_solve_goal(SolveGoal::Satisfy);
    let f = engine.finalise().features;

    // v_num_vars is the sum of the per-kind counters.
    let kind_sum = f.get("d_bool_vars")
        + f.get("d_int_vars")
        + f.get("d_float_vars")
        + f.get("d_set_vars");
    assert_eq!(f.get("v_num_vars"), kind_sum);

    // Every counted constraint is classified exactly once.
    let class_sum = f.get("d_array_cons")
        + f.get("d_bool_cons")
        + f.get("d_float_cons")
        + f.get("d_int_cons")
        + f.get("d_set_cons")
        + f.get("gc_global_cons");
    assert_eq!(f.get("c_num_cons"), class_sum);

    // Kind ratios partition the unit interval.
    let ratio_sum: f64 = ["bool", "float", "int", "set"]
        .iter()
        .map(|k| f.get(&format!("d_ratio_{k}_vars")))
        .sum();
    assert!((ratio_sum - 1.0).abs() < 1e-12);
    for kind in ["bool", "float", "int", "set"] {
        let r = f.get(&format!("d_ratio_{kind}_vars"));
        assert!((0.0..=1.0).contains(&r));
    }

    // Moment ordering for every populated metric.
    for metric in ["dom_vars", "deg_vars", "dom_cons", "deg_cons", "domdeg_cons"] {
        let min = f.get(&format!("{}_min_{metric}", prefix(metric)));
        let avg = f.get(&format!("{}_avg_{metric}", prefix(metric)));
        let max = f.get(&format!("{}_max_{metric}", prefix(metric)));
        let cv = f.get(&format!("{}_cv_{metric}", prefix(metric)));
        assert!(min <= avg && avg <= max, "ordering violated for {metric}");
        assert!(cv >= 0.0);
    }
}

fn prefix(metric: &str) -> &'static str {
    if metric.ends_with("vars") { "v" } else { "c" }
}

#[test]
fn identical_populations_have_zero_variation() {
    // Power-of-two domains keep every sum and log exact.
    let mut engine = FeatureExtractor::new(Variant::Full);
    for i in 0..4 {
        engine.update_variable(int_decl(&format!("v{i}"), 4.0));
    }
    for _ in 0..4 {
        engine.update_constraint(cons("int_eq", &["v0", "v1"]), &[]);
    }
    engine.set_solve_goal(SolveGoal::Satisfy);
    let f = engine.finalise().features;

    assert_eq!(f.get("v_cv_dom_vars"), 0.0);
    assert_eq!(f.get("v_ent_dom_vars"), 0.0);
    assert_eq!(f.get("c_cv_dom_cons"), 0.0);
    assert_eq!(f.get("c_ent_dom_cons"), 0.0);
}

#[test]
fn no_graph_variant_skips_analysis() {
    let mut engine = FeatureExtractor::new(Variant::NoGraph);
    engine.update_variable(int_decl("x", 4.0));
    engine.update_variable(int_decl("y", 4.0));
    engine.update_constraint(cons("int_eq", &["x", "y"]), &[]);
    engine.set_solve_goal(SolveGoal::Satisfy);
    let extraction = engine.finalise();
    assert_eq!(extraction.graph, crate::graph::GraphOutcome::Skipped);
    assert_eq!(extraction.features.len(), 95);
}

#[test]
fn assigned_array_elements_become_aliases_and_constants() {
    let mut engine = FeatureExtractor::new(Variant::Full);
    engine.update_variable(int_decl("x", 5.0));
    engine.update_assigned_var_array(
        ArrayDecl {
            name: "a".to_owned(),
            kind: VarKind::Int,
            dom_size: 5.0,
            begin: 1,
            end: 2,
            anns: Vec::new(),
        },
        &[Expr::str("x"), Expr::Int(3)],
    );
    engine.update_constraint(cons("int_eq", &["a"]), &[]);
    engine.set_solve_goal(SolveGoal::Satisfy);

    let f = engine.finalise().features;
    assert_eq!(f.get("v_num_aliases"), 1.0);
    assert_eq!(f.get("v_num_consts"), 1.0);
    // The whole-array argument expands to its elements; only the alias
    // target x survives into the constraint.
    assert_eq!(f.get("c_num_cons"), 1.0);
    assert_eq!(f.get("c_min_deg_cons"), 1.0);
}
