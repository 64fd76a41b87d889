//! Streaming feature-extraction engine.
//!
//! The parser replays a model as a sequence of events (variable and array
//! declarations, constraints, solve goal); the engine folds each event into
//! a symbol table, the feature accumulator, side histograms, and the edge
//! sets of the two derived graphs. `finalise` closes the running sums into
//! means / coefficients of variation / entropies, computes the objective
//! features, and hands the graphs to the bounded-time analyser.
//!
//! ```text
//! parser events -> SymbolTable + FeatureMap + histograms + VG/CG edges
//!                      |
//!                  finalise() -> graph::analyse -> Extraction
//! ```
//!
//! Nothing here performs I/O: warnings go through `tracing` and the
//! finished row is returned to the caller.

mod symbols;

#[cfg(test)]
mod extractor_tests;

use std::collections::{BTreeSet, HashSet};
use std::time::Duration;

use fznfeat_core::expr::distinct;
use fznfeat_core::{Expr, FeatureMap, GlobalCatalogue, Variant};
use indexmap::IndexSet;
use tracing::warn;

use crate::graph::{self, GraphInputs, GraphOutcome};
use crate::stats::{Histogram, coeff_of_variation};

pub use symbols::{SymbolTable, VarInfo, VarKind};

/// Wall-clock budget per graph metric.
pub const DEFAULT_METRIC_BUDGET: Duration = Duration::from_secs(2);

/// The solve goal of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveGoal {
    Satisfy,
    Minimize,
    Maximize,
}

impl SolveGoal {
    /// Feature encoding: 1 = satisfy, 2 = minimize, 3 = maximize.
    pub fn as_feature(self) -> f64 {
        match self {
            SolveGoal::Satisfy => 1.0,
            SolveGoal::Minimize => 2.0,
            SolveGoal::Maximize => 3.0,
        }
    }

    pub fn is_optimisation(self) -> bool {
        !matches!(self, SolveGoal::Satisfy)
    }
}

/// A scalar variable declaration, as handed over by the parser.
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub name: String,
    pub kind: VarKind,
    pub dom_size: f64,
    pub anns: Vec<Expr>,
}

/// A variable-array declaration with its inclusive index range.
#[derive(Debug, Clone)]
pub struct ArrayDecl {
    pub name: String,
    pub kind: VarKind,
    pub dom_size: f64,
    pub begin: i64,
    pub end: i64,
    pub anns: Vec<Expr>,
}

/// The finished row plus the graph-analysis verdict.
#[derive(Debug)]
pub struct Extraction {
    pub features: FeatureMap,
    pub graph: GraphOutcome,
}

/// The extraction engine. One instance per model.
pub struct FeatureExtractor {
    features: FeatureMap,
    symbols: SymbolTable,
    globals: GlobalCatalogue,
    seen_globals: HashSet<String>,
    next_var_id: i64,

    // Squared sums; the linear sums live in the feature map.
    sum_dom_vars2: f64,
    sum_deg_vars2: f64,
    sum_domdeg_vars2: f64,
    sum_dom_cons2: f64,
    sum_deg_cons: f64,
    sum_deg_cons2: f64,
    sum_domdeg_cons2: f64,

    count_dom_vars: Histogram,
    count_deg_vars: Histogram,
    count_domdeg_vars: Histogram,
    count_dom_cons: Histogram,
    count_deg_cons: Histogram,
    count_domdeg_cons: Histogram,

    /// Per-constraint sorted variable ids; input to CG construction.
    cons_vars: Vec<Vec<u32>>,
    /// Variable-graph edges as ordered pairs (lo, hi); the set makes edge
    /// insertion idempotent across repeated constraints.
    vg_edges: IndexSet<(u32, u32)>,

    objective: Option<String>,
    metric_budget: Duration,
}

impl FeatureExtractor {
    pub fn new(variant: Variant) -> Self {
        Self::with_catalogue(variant, GlobalCatalogue::standard().clone())
    }

    /// Uses an explicit global-constraint catalogue (probe catalogues in
    /// tests, alternative solver dialects).
    pub fn with_catalogue(variant: Variant, globals: GlobalCatalogue) -> Self {
        FeatureExtractor {
            features: FeatureMap::new(variant),
            symbols: SymbolTable::new(),
            globals,
            seen_globals: HashSet::new(),
            next_var_id: 0,
            sum_dom_vars2: 0.0,
            sum_deg_vars2: 0.0,
            sum_domdeg_vars2: 0.0,
            sum_dom_cons2: 0.0,
            sum_deg_cons: 0.0,
            sum_deg_cons2: 0.0,
            sum_domdeg_cons2: 0.0,
            count_dom_vars: Histogram::new(),
            count_deg_vars: Histogram::new(),
            count_domdeg_vars: Histogram::new(),
            count_dom_cons: Histogram::new(),
            count_deg_cons: Histogram::new(),
            count_domdeg_cons: Histogram::new(),
            cons_vars: Vec::new(),
            vg_edges: IndexSet::new(),
            objective: None,
            metric_budget: DEFAULT_METRIC_BUDGET,
        }
    }

    /// Overrides the per-metric graph budget (tests use tiny budgets).
    pub fn set_metric_budget(&mut self, budget: Duration) {
        self.metric_budget = budget;
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn features(&self) -> &FeatureMap {
        &self.features
    }

    /// A variable declaration without an assignment.
    pub fn update_variable(&mut self, decl: VarDecl) {
        if self.warn_duplicate(&decl.name) {
            return;
        }
        let anns = dedup_anns(decl.anns);
        let vi = VarInfo {
            name: decl.name,
            kind: decl.kind,
            dom_size: decl.dom_size,
            degree: 0,
            assigned: false,
            alias: None,
            array: false,
            begin: 0,
            end: 0,
            anns,
            id: self.next_var_id,
        };
        self.next_var_id += 1;

        self.features.add(kind_var_key(vi.kind), 1.0);
        self.record_var_domain(vi.dom_size, 1.0);
        self.count_declaration_anns(&vi.anns, 1.0);
        self.symbols.insert(vi);
    }

    /// A variable fixed at declaration to a constant or to another
    /// variable (a string right-hand side is an alias).
    pub fn update_assigned_variable(&mut self, decl: VarDecl, rhs: &Expr) {
        if self.warn_duplicate(&decl.name) {
            return;
        }
        let alias = self.make_alias(rhs);
        let vi = VarInfo {
            name: decl.name,
            kind: decl.kind,
            dom_size: decl.dom_size,
            degree: 0,
            assigned: true,
            alias,
            array: false,
            begin: 0,
            end: 0,
            anns: dedup_anns(decl.anns),
            id: -1,
        };
        self.count_declaration_anns(&vi.anns, 1.0);
        self.symbols.insert(vi);
    }

    /// An array declaration: records the header, then synthesises one
    /// record per index in `[begin, end]` under the name `A[i]`.
    pub fn update_var_array(&mut self, decl: ArrayDecl) {
        if self.warn_duplicate(&decl.name) {
            return;
        }
        let anns = dedup_anns(decl.anns);
        let header = VarInfo {
            name: decl.name.clone(),
            kind: decl.kind,
            dom_size: decl.dom_size,
            degree: 0,
            assigned: false,
            alias: None,
            array: true,
            begin: decl.begin,
            end: decl.end,
            anns: anns.clone(),
            id: -1,
        };
        self.symbols.insert(header);

        for i in decl.begin..=decl.end {
            let vi = VarInfo {
                name: format!("{}[{}]", decl.name, i),
                kind: decl.kind,
                dom_size: decl.dom_size,
                degree: 0,
                assigned: false,
                alias: None,
                array: false,
                begin: 0,
                end: 0,
                anns: anns.clone(),
                id: self.next_var_id,
            };
            self.next_var_id += 1;
            self.symbols.insert(vi);
        }

        let n = (decl.end - decl.begin + 1).max(0) as f64;
        self.features.add(kind_var_key(decl.kind), n);
        self.record_var_domain(decl.dom_size, n);
        self.count_declaration_anns(&anns, n);
    }

    /// An assigned array declaration: every element is either an alias
    /// (string entry) or a constant.
    pub fn update_assigned_var_array(&mut self, decl: ArrayDecl, elements: &[Expr]) {
        if self.warn_duplicate(&decl.name) {
            return;
        }
        let anns = dedup_anns(decl.anns);
        let header = VarInfo {
            name: decl.name.clone(),
            kind: decl.kind,
            dom_size: decl.dom_size,
            degree: 0,
            assigned: true,
            alias: None,
            array: true,
            begin: decl.begin,
            end: decl.end,
            anns: anns.clone(),
            id: -1,
        };
        self.symbols.insert(header);

        for (offset, element) in elements.iter().enumerate() {
            let alias = self.make_alias(element);
            let vi = VarInfo {
                name: format!("{}[{}]", decl.name, decl.begin + offset as i64),
                kind: decl.kind,
                dom_size: decl.dom_size,
                degree: 0,
                assigned: true,
                alias,
                array: false,
                begin: 0,
                end: 0,
                anns: anns.clone(),
                id: -1,
            };
            self.symbols.insert(vi);
        }

        let n = (decl.end - decl.begin + 1).max(0) as f64;
        self.count_declaration_anns(&anns, n);
    }

    /// A constraint: `params` starts with the constraint name, followed by
    /// the arguments; `annots` is the annotation list.
    pub fn update_constraint(&mut self, mut params: Vec<Expr>, annots: &[Expr]) {
        if params.is_empty() {
            warn!("constraint without a name, skipped");
            return;
        }
        let head = params.remove(0);
        let Some(name) = head.as_str() else {
            warn!("constraint name is not a string, skipped");
            return;
        };
        let name = name.to_owned();

        // Collect the distinct referenced variables and the constraint
        // domain (sum of log2 domain sizes).
        let mut con_vars: BTreeSet<u32> = BTreeSet::new();
        let mut dom = 0.0;
        for arg in &params {
            match arg {
                Expr::Array(items) => {
                    for item in items {
                        if let Expr::Str(var) = item {
                            self.reference_var(var, &mut con_vars, &mut dom);
                        }
                    }
                }
                Expr::Str(var) => {
                    let span = self
                        .symbols
                        .get(var)
                        .filter(|vi| vi.array)
                        .map(|vi| (vi.begin, vi.end));
                    match span {
                        Some((begin, end)) => {
                            for i in begin..=end {
                                let element = format!("{var}[{i}]");
                                self.reference_var(&element, &mut con_vars, &mut dom);
                            }
                        }
                        None => self.reference_var(var, &mut con_vars, &mut dom),
                    }
                }
                _ => {}
            }
        }

        // A constraint that involves no variables leaves the row untouched.
        if con_vars.is_empty() {
            warn!(constraint = %name, "constraint has degree 0, skipped");
            return;
        }
        let deg = con_vars.len() as f64;

        if self.globals.contains(&name) {
            self.features.add("gc_global_cons", 1.0);
            if self.seen_globals.insert(name.clone()) {
                self.features.add("gc_diff_globs", 1.0);
            }
        } else if let Some(key) = prefix_cons_key(&name) {
            self.features.add(key, 1.0);
        }

        self.scan_constraint_anns(annots);

        self.features.add("c_num_cons", 1.0);
        self.features.add("c_sum_dom_cons", dom);
        self.sum_dom_cons2 += dom * dom;
        if dom > 0.0 {
            self.features.add("c_logprod_dom_cons", dom.log2());
        }
        self.features.min_assign("c_min_dom_cons", dom);
        self.features.max_assign("c_max_dom_cons", dom);
        self.count_dom_cons.bump(dom);

        self.features.add("c_sum_ari_cons", params.len() as f64);
        self.sum_deg_cons += deg;
        self.sum_deg_cons2 += deg * deg;
        self.features.add("c_logprod_deg_cons", deg.log2());
        self.features.min_assign("c_min_deg_cons", deg);
        self.features.max_assign("c_max_deg_cons", deg);
        self.count_deg_cons.bump(deg);

        let domdeg = dom / deg;
        self.features.add("c_sum_domdeg_cons", domdeg);
        self.sum_domdeg_cons2 += domdeg * domdeg;
        self.features.min_assign("c_min_domdeg_cons", domdeg);
        self.features.max_assign("c_max_domdeg_cons", domdeg);
        self.count_domdeg_cons.bump(domdeg.round());

        // Graph side-effects: remember the vertex set for CG construction
        // and extend the variable graph with the clique over it.
        let ids: Vec<u32> = con_vars.into_iter().collect();
        for (i, &u) in ids.iter().enumerate() {
            for &v in &ids[i + 1..] {
                self.vg_edges.insert((u, v));
            }
        }
        self.cons_vars.push(ids);
    }

    /// The solve item's annotation list.
    pub fn update_solve(&mut self, anns: &[Expr]) {
        let Some(first) = anns.first() else {
            return;
        };
        let Some(list) = first.as_array() else {
            warn!("solve annotation is not a call, ignored");
            return;
        };
        let Some(head) = list.first().and_then(Expr::as_str) else {
            warn!("solve annotation has no head, ignored");
            return;
        };
        if head == "seq_search" {
            for sub in &list[1..] {
                if let Expr::Array(inner) = sub {
                    self.update_search(inner);
                }
            }
        } else {
            self.update_search(list);
        }
    }

    /// 1 = satisfy, 2 = minimize, 3 = maximize. Set before `update_solve`.
    pub fn set_solve_goal(&mut self, goal: SolveGoal) {
        self.features.set("s_goal", goal.as_feature());
    }

    /// Name of the objective variable; only meaningful for optimisation
    /// goals. Resolved at finalisation, once degrees are complete.
    pub fn set_objective_variable(&mut self, name: &str) {
        self.objective = Some(name.to_owned());
    }

    /// Closes the running statistics, computes objective features, runs
    /// the bounded-time graph analysis, and yields the finished row.
    pub fn finalise(mut self) -> Extraction {
        self.final_update_vars();
        self.final_update_cons();
        if self.features.get("s_goal") > 1.0 {
            self.final_update_obj();
        }
        let graph = if self.features.variant().has_graphs() {
            graph::analyse(
                &mut self.features,
                &GraphInputs {
                    num_vars: self.next_var_id.max(0) as usize,
                    vg_edges: &self.vg_edges,
                    cons_vars: &self.cons_vars,
                },
                self.metric_budget,
            )
        } else {
            GraphOutcome::Skipped
        };
        Extraction { features: self.features, graph }
    }

    // ------------------------------------------------------------------
    // Event helpers
    // ------------------------------------------------------------------

    fn warn_duplicate(&self, name: &str) -> bool {
        if self.symbols.contains(name) {
            warn!(variable = %name, "duplicate declaration, ignored");
            return true;
        }
        false
    }

    /// Builds the owned alias record for an assignment right-hand side.
    /// Strings alias another variable; anything else is a constant.
    fn make_alias(&mut self, rhs: &Expr) -> Option<Box<VarInfo>> {
        match rhs {
            Expr::Str(target) => {
                self.features.add("v_num_aliases", 1.0);
                Some(Box::new(self.symbols.resolve_target(target)))
            }
            _ => {
                self.features.add("v_num_consts", 1.0);
                None
            }
        }
    }

    fn record_var_domain(&mut self, dom: f64, n: f64) {
        self.features.add("v_sum_dom_vars", dom * n);
        self.features.add("v_logprod_dom_vars", dom.log2() * n);
        self.sum_dom_vars2 += dom * dom * n;
        self.features.min_assign("v_min_dom_vars", dom);
        self.features.max_assign("v_max_dom_vars", dom);
        self.count_dom_vars.bump_by(dom, n);
    }

    fn count_declaration_anns(&mut self, anns: &[Expr], n: f64) {
        for ann in anns {
            match ann.as_str() {
                Some("is_defined_var") => self.features.add("v_def_vars", n),
                Some("var_is_introduced") => self.features.add("v_intro_vars", n),
                _ => {}
            }
        }
    }

    /// Single pass over the (deduplicated) constraint annotations: one
    /// priority check on the first array annotation, at most one
    /// bounds/domain tag.
    fn scan_constraint_anns(&mut self, annots: &[Expr]) {
        let anns = distinct(annots);
        let mut priority_pending = true;
        let mut bounds_pending = true;
        for ann in anns {
            if !priority_pending && !bounds_pending {
                break;
            }
            match ann {
                Expr::Array(_) if priority_pending => {
                    if ann.head_str() == Some("priority") {
                        self.features.add("c_priority", 1.0);
                    }
                    priority_pending = false;
                }
                Expr::Str(tag) if bounds_pending => {
                    let key = match tag.as_str() {
                        "bounds" | "boundsZ" => Some("c_bounds_z"),
                        "boundsR" => Some("c_bounds_r"),
                        "boundsD" => Some("c_bounds_d"),
                        "domain" => Some("c_domain"),
                        _ => None,
                    };
                    if let Some(key) = key {
                        self.features.add(key, 1.0);
                        bounds_pending = false;
                    }
                }
                _ => {}
            }
        }
    }

    /// One referenced variable inside a constraint. Aliases collapse to
    /// their target so an alias group counts once per constraint; assigned
    /// and unknown names are skipped.
    fn reference_var(&mut self, name: &str, con_vars: &mut BTreeSet<u32>, dom: &mut f64) {
        let Some(vi) = self.symbols.get(name) else {
            return;
        };
        let (id, canonical) = match &vi.alias {
            Some(target) => (target.id, target.name.clone()),
            None if vi.assigned => return,
            None => (vi.id, vi.name.clone()),
        };
        if id < 0 {
            // Alias whose target is itself assigned (or unknown).
            return;
        }
        if con_vars.insert(id as u32) {
            if let Some(dom_size) = self.symbols.bump_degree(&canonical) {
                *dom += dom_size.log2();
            }
        }
    }

    /// One search annotation, `[kind, vars, var_choice, val_choice, ...]`.
    /// A leading array means a nested annotation list; recurse into each
    /// array element instead.
    fn update_search(&mut self, e: &[Expr]) {
        let Some(first) = e.first() else {
            return;
        };
        if matches!(first, Expr::Array(_)) {
            for el in e {
                if let Expr::Array(inner) = el {
                    self.update_search(inner);
                }
            }
            return;
        }
        let key = match first.as_str() {
            Some("bool_search") => "s_bool_search",
            Some("int_search") => "s_int_search",
            Some("set_search") => "s_set_search",
            _ => return,
        };
        self.features.add(key, 1.0);

        match e.get(1) {
            Some(Expr::Array(vars)) => {
                let labelled = distinct(vars).len() as f64;
                self.features.add("s_labeled_vars", labelled);
            }
            Some(_) => self.features.add("s_labeled_vars", 1.0),
            None => {
                warn!("search annotation without variables");
                return;
            }
        }

        match e.get(2) {
            Some(choice) => {
                let key = match choice.as_str() {
                    Some("input_order") => "s_input_order",
                    Some("first_fail") => "s_first_fail",
                    _ => "s_other_var",
                };
                self.features.add(key, 1.0);
            }
            None => {
                warn!("search annotation without a variable-choice argument");
                return;
            }
        }

        match e.get(3) {
            Some(choice) => {
                let key = match choice.as_str() {
                    Some("indomain_min") => "s_indomain_min",
                    Some("indomain_max") => "s_indomain_max",
                    _ => "s_other_val",
                };
                self.features.add(key, 1.0);
            }
            None => warn!("search annotation without a value-choice argument"),
        }
    }

    // ------------------------------------------------------------------
    // Finalisation
    // ------------------------------------------------------------------

    fn final_update_vars(&mut self) {
        let n = self.features.get("d_bool_vars")
            + self.features.get("d_float_vars")
            + self.features.get("d_int_vars")
            + self.features.get("d_set_vars");
        self.features.set("v_num_vars", n);

        let c = self.features.get("c_num_cons");
        let g = self.features.get("gc_global_cons");

        if n > 0.0 {
            let bounded =
                self.features.get("v_num_aliases") + self.features.get("v_num_consts");
            self.features.set("v_ratio_bounded", bounded / n);
            self.features.set("c_ratio_cons", c / n);
            for kind in ["bool", "float", "int", "set"] {
                let count = self.features.get(&format!("d_{kind}_vars"));
                self.features.set(&format!("d_ratio_{kind}_vars"), count / n);
            }
        }
        if c > 0.0 {
            self.features.set("v_ratio_vars", n / c);
            self.features.set("gc_ratio_globs", g / c);
            for kind in ["array", "bool", "float", "int", "set"] {
                let count = self.features.get(&format!("d_{kind}_cons"));
                self.features.set(&format!("d_ratio_{kind}_cons"), count / c);
            }
        }
        if g > 0.0 {
            let diff = self.features.get("gc_diff_globs");
            self.features.set("gc_ratio_diff", diff / g);
        }

        if n == 0.0 {
            return;
        }

        let mean_dom = self.features.get("v_sum_dom_vars") / n;
        self.features.set("v_avg_dom_vars", mean_dom);
        self.features.set(
            "v_cv_dom_vars",
            coeff_of_variation(self.sum_dom_vars2, mean_dom, n),
        );
        self.features.set("v_ent_dom_vars", self.count_dom_vars.entropy(n));

        // Per-variable degree pass: degrees are only complete once every
        // constraint has been ingested.
        for vi in self.symbols.iter() {
            if vi.array {
                continue;
            }
            let deg = vi.degree as f64;
            self.features.min_assign("v_min_deg_vars", deg);
            self.features.max_assign("v_max_deg_vars", deg);
            self.features.add("v_sum_deg_vars", deg);
            self.sum_deg_vars2 += deg * deg;
            if deg > 0.0 {
                self.count_deg_vars.bump(deg);
                self.features.add("v_logprod_deg_vars", deg.log2());
                let domdeg = vi.dom_size / deg;
                self.features.add("v_sum_domdeg_vars", domdeg);
                self.sum_domdeg_vars2 += domdeg * domdeg;
                self.features.min_assign("v_min_domdeg_vars", domdeg);
                self.features.max_assign("v_max_domdeg_vars", domdeg);
                self.count_domdeg_vars.bump(domdeg.round());
            } else if !vi.assigned {
                warn!(variable = %vi.name, "variable has degree 0");
            }
        }

        let mean_deg = self.features.get("v_sum_deg_vars") / n;
        self.features.set("v_avg_deg_vars", mean_deg);
        self.features.set(
            "v_cv_deg_vars",
            coeff_of_variation(self.sum_deg_vars2, mean_deg, n),
        );
        self.features.set("v_ent_deg_vars", self.count_deg_vars.entropy(n));

        let mean_domdeg = self.features.get("v_sum_domdeg_vars") / n;
        self.features.set("v_avg_domdeg_vars", mean_domdeg);
        self.features.set(
            "v_cv_domdeg_vars",
            coeff_of_variation(self.sum_domdeg_vars2, mean_domdeg, n),
        );
        self.features
            .set("v_ent_domdeg_vars", self.count_domdeg_vars.entropy(n));
    }

    fn final_update_cons(&mut self) {
        let n = self.features.get("c_num_cons");
        if n == 0.0 {
            return;
        }

        let mean_dom = self.features.get("c_sum_dom_cons") / n;
        self.features.set("c_avg_dom_cons", mean_dom);
        self.features.set(
            "c_cv_dom_cons",
            coeff_of_variation(self.sum_dom_cons2, mean_dom, n),
        );
        self.features.set("c_ent_dom_cons", self.count_dom_cons.entropy(n));

        let mean_deg = self.sum_deg_cons / n;
        self.features.set("c_avg_deg_cons", mean_deg);
        self.features.set(
            "c_cv_deg_cons",
            coeff_of_variation(self.sum_deg_cons2, mean_deg, n),
        );
        self.features.set("c_ent_deg_cons", self.count_deg_cons.entropy(n));

        let mean_domdeg = self.features.get("c_sum_domdeg_cons") / n;
        self.features.set("c_avg_domdeg_cons", mean_domdeg);
        self.features.set(
            "c_cv_domdeg_cons",
            coeff_of_variation(self.sum_domdeg_cons2, mean_domdeg, n),
        );
        self.features
            .set("c_ent_domdeg_cons", self.count_domdeg_cons.entropy(n));
    }

    fn final_update_obj(&mut self) {
        let Some(name) = self.objective.clone() else {
            warn!("optimisation goal without an objective variable");
            return;
        };
        let target = self.symbols.resolve_target(&name);
        if !self.symbols.contains(&name) {
            warn!(objective = %name, "objective variable is not declared");
            return;
        }

        let dom = target.dom_size;
        let deg = target.degree as f64;
        let avg_dom = self.features.get("v_avg_dom_vars");
        let std_dom = self.features.get("v_cv_dom_vars") * avg_dom;
        let avg_deg = self.features.get("v_avg_deg_vars");
        let std_deg = self.features.get("v_cv_deg_vars") * avg_deg;
        let c = self.features.get("c_num_cons");

        self.features.set("o_dom", dom);
        self.features.set("o_dom_avg", guarded_div(dom, avg_dom));
        self.features.set("o_dom_std", guarded_div(dom - avg_dom, std_dom));
        self.features.set("o_dom_deg", guarded_div(dom, deg));

        self.features.set("o_deg", deg);
        self.features.set("o_deg_avg", guarded_div(deg, avg_deg));
        self.features.set("o_deg_std", guarded_div(deg - avg_deg, std_deg));
        self.features.set("o_deg_cons", guarded_div(deg, c));
    }
}

fn guarded_div(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

fn kind_var_key(kind: VarKind) -> &'static str {
    match kind {
        VarKind::Bool => "d_bool_vars",
        VarKind::Int => "d_int_vars",
        VarKind::Float => "d_float_vars",
        VarKind::Set => "d_set_vars",
    }
}

/// Classifies a non-global constraint by the prefix before the first `_`.
fn prefix_cons_key(name: &str) -> Option<&'static str> {
    match name.split('_').next().unwrap_or("") {
        "array" => Some("d_array_cons"),
        "bool" => Some("d_bool_cons"),
        "float" => Some("d_float_cons"),
        "int" => Some("d_int_cons"),
        "set" => Some("d_set_cons"),
        _ => None,
    }
}

fn dedup_anns(anns: Vec<Expr>) -> Vec<Expr> {
    distinct(&anns).into_iter().cloned().collect()
}
