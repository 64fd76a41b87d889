//! The fixed feature catalogue and the ordered accumulator.
//!
//! Every feature the extractor can emit is declared here, once, together
//! with its initial value and its one-line description. The accumulator
//! ([`FeatureMap`]) is constructed over this catalogue and never gains or
//! loses a key afterwards: downstream consumers rely on a dense row with a
//! stable, lexicographic key order.
//!
//! Initial values encode the accumulator role of each key:
//! - `0.0` for counters and sums,
//! - `+inf` for running minima,
//! - `-1.0` for graph features ("could not compute" sentinel).

use indexmap::IndexMap;

/// Which key set the accumulator carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// All features, including the 20 `gr_*` graph features.
    #[default]
    Full,
    /// The 95 base features; graph analysis is skipped entirely.
    NoGraph,
}

impl Variant {
    pub fn has_graphs(self) -> bool {
        matches!(self, Variant::Full)
    }
}

/// One catalogue entry: key, initial value, description for `pp` output.
#[derive(Debug, Clone, Copy)]
pub struct FeatureDef {
    pub key: &'static str,
    pub init: f64,
    pub descr: &'static str,
}

const INF: f64 = f64::INFINITY;

const fn def(key: &'static str, init: f64, descr: &'static str) -> FeatureDef {
    FeatureDef { key, init, descr }
}

/// The full catalogue, in lexicographic key order.
///
/// The `gr_*` block is contiguous; [`FeatureMap::new`] filters it out for
/// the no-graph variant without disturbing the order of the rest.
pub static CATALOGUE: &[FeatureDef] = &[
    def("c_avg_deg_cons", 0.0, "Average of the constraints degree"),
    def("c_avg_dom_cons", 0.0, "Average of the constraints domain"),
    def("c_avg_domdeg_cons", 0.0, "Average of the ratio constraints domain/degree"),
    def("c_bounds_d", 0.0, "No of constraints using 'boundsD' annotation"),
    def("c_bounds_r", 0.0, "No of constraints using 'boundsR' annotation"),
    def("c_bounds_z", 0.0, "No of constraints using 'boundsZ' or 'bounds' annotation"),
    def("c_cv_deg_cons", 0.0, "Coefficient of Variation of constraints degree"),
    def("c_cv_dom_cons", 0.0, "Coefficient of Variation of constraints domain"),
    def("c_cv_domdeg_cons", 0.0, "Coefficient of Variation of the ratio constraints domain/degree"),
    def("c_domain", 0.0, "No of constraints using 'domain' annotation"),
    def("c_ent_deg_cons", 0.0, "Entropy of constraints degree"),
    def("c_ent_dom_cons", 0.0, "Entropy of constraints domain"),
    def("c_ent_domdeg_cons", 0.0, "Entropy of the ratio constraints domain/degree"),
    def("c_logprod_deg_cons", 0.0, "Logarithm of the product of constraints degree"),
    def("c_logprod_dom_cons", 0.0, "Logarithm of the product of constraints domain"),
    def("c_max_deg_cons", 0.0, "Maximum of the constraints degree"),
    def("c_max_dom_cons", 0.0, "Maximum of the constraints domain"),
    def("c_max_domdeg_cons", 0.0, "Maximum of the ratio constraints domain/degree"),
    def("c_min_deg_cons", INF, "Minimum of the constraints degree"),
    def("c_min_dom_cons", INF, "Minimum of the constraints domain"),
    def("c_min_domdeg_cons", INF, "Minimum of the ratio constraints domain/degree"),
    def("c_num_cons", 0.0, "Total no of constraints"),
    def("c_priority", 0.0, "No of constraints using 'priority' annotation"),
    def("c_ratio_cons", 0.0, "Ratio no of constraints / no of variables"),
    def("c_sum_ari_cons", 0.0, "Sum of constraints arity"),
    def("c_sum_dom_cons", 0.0, "Sum of constraints domain"),
    def("c_sum_domdeg_cons", 0.0, "Sum of the ratio constraints domain/degree"),
    def("d_array_cons", 0.0, "No of array constraints"),
    def("d_bool_cons", 0.0, "No of boolean constraints"),
    def("d_bool_vars", 0.0, "No of boolean variables"),
    def("d_float_cons", 0.0, "No of float constraints"),
    def("d_float_vars", 0.0, "No of float variables"),
    def("d_int_cons", 0.0, "No of integer constraints"),
    def("d_int_vars", 0.0, "No of integer variables"),
    def("d_ratio_array_cons", 0.0, "Ratio array constraints / total no of constraints"),
    def("d_ratio_bool_cons", 0.0, "Ratio boolean constraints / total no of constraints"),
    def("d_ratio_bool_vars", 0.0, "Ratio boolean variables / total no of variables"),
    def("d_ratio_float_cons", 0.0, "Ratio float constraints / total no of constraints"),
    def("d_ratio_float_vars", 0.0, "Ratio float variables / total no of variables"),
    def("d_ratio_int_cons", 0.0, "Ratio integer constraints / total no of constraints"),
    def("d_ratio_int_vars", 0.0, "Ratio integer variables / total no of variables"),
    def("d_ratio_set_cons", 0.0, "Ratio set constraints / total no of constraints"),
    def("d_ratio_set_vars", 0.0, "Ratio set variables / total no of variables"),
    def("d_set_cons", 0.0, "No of set constraints"),
    def("d_set_vars", 0.0, "No of set variables"),
    def("gc_diff_globs", 0.0, "No of different global constraints"),
    def("gc_global_cons", 0.0, "Total no of global constraints"),
    def("gc_ratio_diff", 0.0, "Ratio different global constraints / no of global constraints"),
    def("gc_ratio_globs", 0.0, "Ratio no of global constraints / total no of constraints"),
    def("gr_avg_clust_cg", -1.0, "Average of the constraints graph clustering coefficient"),
    def("gr_avg_deg_cg", -1.0, "Average of the constraints graph degree"),
    def("gr_avg_deg_vg", -1.0, "Average of the variables graph degree"),
    def("gr_avg_diam_vg", -1.0, "Average of the variables graph diameter"),
    def("gr_cv_clust_cg", -1.0, "Coefficient of Variation of the constraints graph clustering coefficient"),
    def("gr_cv_deg_cg", -1.0, "Coefficient of Variation of the constraints graph degree"),
    def("gr_cv_deg_vg", -1.0, "Coefficient of Variation of the variables graph degree"),
    def("gr_cv_diam_vg", -1.0, "Coefficient of Variation of the variables graph diameter"),
    def("gr_ent_clust_cg", -1.0, "Entropy of the constraints graph clustering coefficient"),
    def("gr_ent_deg_cg", -1.0, "Entropy of the constraints graph degree"),
    def("gr_ent_deg_vg", -1.0, "Entropy of the variables graph degree"),
    def("gr_ent_diam_vg", -1.0, "Entropy of the variables graph diameter"),
    def("gr_max_clust_cg", -1.0, "Maximum of the constraints graph clustering coefficient"),
    def("gr_max_deg_cg", -1.0, "Maximum of the constraints graph degree"),
    def("gr_max_deg_vg", -1.0, "Maximum of the variables graph degree"),
    def("gr_max_diam_vg", -1.0, "Maximum of the variables graph diameter"),
    def("gr_min_clust_cg", -1.0, "Minimum of the constraints graph clustering coefficient"),
    def("gr_min_deg_cg", -1.0, "Minimum of the constraints graph degree"),
    def("gr_min_deg_vg", -1.0, "Minimum of the variables graph degree"),
    def("gr_min_diam_vg", -1.0, "Minimum of the variables graph diameter"),
    def("o_deg", 0.0, "Degree of the objective variable"),
    def("o_deg_avg", 0.0, "Ratio degree of the objective variable / average of var degree"),
    def("o_deg_cons", 0.0, "Ratio degree of the objective variable / number of constraints"),
    def("o_deg_std", 0.0, "Standardization of the degree of the objective variable"),
    def("o_dom", 0.0, "Domain size of the objective variable"),
    def("o_dom_avg", 0.0, "Ratio domain of the objective variable / average of var domain"),
    def("o_dom_deg", 0.0, "Ratio domain of the objective variable / degree of the obj var"),
    def("o_dom_std", 0.0, "Standardization of the domain of the objective variable"),
    def("s_bool_search", 0.0, "Number of 'bool_search' annotations"),
    def("s_first_fail", 0.0, "Number of 'first_fail' annotations"),
    def("s_goal", 0.0, "Solve goal (1 = satisfy, 2 = minimize, 3 = maximize)"),
    def("s_indomain_max", 0.0, "Number of 'indomain_max' annotations"),
    def("s_indomain_min", 0.0, "Number of 'indomain_min' annotations"),
    def("s_input_order", 0.0, "Number of 'input_order' annotations"),
    def("s_int_search", 0.0, "Number of 'int_search' annotations"),
    def("s_labeled_vars", 0.0, "Number of variables to be assigned"),
    def("s_other_val", 0.0, "Number of other value search heuristics"),
    def("s_other_var", 0.0, "Number of other variable search heuristics"),
    def("s_set_search", 0.0, "Number of 'set_search' annotations"),
    def("v_avg_deg_vars", 0.0, "Average of the variables degree"),
    def("v_avg_dom_vars", 0.0, "Average of the variables domain"),
    def("v_avg_domdeg_vars", 0.0, "Average of the ratio variables domain/degree"),
    def("v_cv_deg_vars", 0.0, "Coefficient of Variation of variables degree"),
    def("v_cv_dom_vars", 0.0, "Coefficient of Variation of variables domain"),
    def("v_cv_domdeg_vars", 0.0, "Coefficient of Variation of the ratio variables domain/degree"),
    def("v_def_vars", 0.0, "Number of defined variables"),
    def("v_ent_deg_vars", 0.0, "Entropy of variables degree"),
    def("v_ent_dom_vars", 0.0, "Entropy of variables domain"),
    def("v_ent_domdeg_vars", 0.0, "Entropy of the ratio variables domain/degree"),
    def("v_intro_vars", 0.0, "Number of introduced variables"),
    def("v_logprod_deg_vars", 0.0, "Logarithm of the product of variables degree"),
    def("v_logprod_dom_vars", 0.0, "Logarithm of the product of variables domain"),
    def("v_max_deg_vars", 0.0, "Maximum of the variables degree"),
    def("v_max_dom_vars", 0.0, "Maximum of the variables domain"),
    def("v_max_domdeg_vars", 0.0, "Maximum of the ratio variables domain/degree"),
    def("v_min_deg_vars", INF, "Minimum of the variables degree"),
    def("v_min_dom_vars", INF, "Minimum of the variables domain"),
    def("v_min_domdeg_vars", INF, "Minimum of the ratio variables domain/degree"),
    def("v_num_aliases", 0.0, "Number of alias variables"),
    def("v_num_consts", 0.0, "Number of constant variables"),
    def("v_num_vars", 0.0, "Total no of variables"),
    def("v_ratio_bounded", 0.0, "Ratio (aliases + constants) / total no of variables"),
    def("v_ratio_vars", 0.0, "Ratio no of variables / no of constraints"),
    def("v_sum_deg_vars", 0.0, "Sum of variables degree"),
    def("v_sum_dom_vars", 0.0, "Sum of variables domain"),
    def("v_sum_domdeg_vars", 0.0, "Sum of the ratio variables domain/degree"),
];

/// Description for a key, for the `pp` output format.
pub fn description(key: &str) -> &'static str {
    CATALOGUE
        .iter()
        .find(|d| d.key == key)
        .map(|d| d.descr)
        .unwrap_or("")
}

/// The dense feature row: key -> value, keys fixed at construction.
///
/// Keys come from [`CATALOGUE`] and are stored in its (lexicographic)
/// order, so iteration doubles as the output order. All write accessors
/// require a catalogue key; an unknown key is a programming error and
/// panics, it can never be triggered by model input.
#[derive(Debug, Clone)]
pub struct FeatureMap {
    variant: Variant,
    values: IndexMap<&'static str, f64>,
}

impl FeatureMap {
    pub fn new(variant: Variant) -> Self {
        let values = CATALOGUE
            .iter()
            .filter(|d| variant.has_graphs() || !d.key.starts_with("gr_"))
            .map(|d| (d.key, d.init))
            .collect();
        Self { variant, values }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, key: &str) -> f64 {
        self.values.get(key).copied().unwrap_or_else(|| {
            panic!("feature key `{key}` is not in the catalogue")
        })
    }

    fn slot(&mut self, key: &str) -> &mut f64 {
        self.values.get_mut(key).unwrap_or_else(|| {
            panic!("feature key `{key}` is not in the catalogue")
        })
    }

    pub fn set(&mut self, key: &str, value: f64) {
        *self.slot(key) = value;
    }

    pub fn add(&mut self, key: &str, delta: f64) {
        *self.slot(key) += delta;
    }

    /// Lowers the stored value if `value` is smaller (running minimum).
    pub fn min_assign(&mut self, key: &str, value: f64) {
        let slot = self.slot(key);
        if value < *slot {
            *slot = value;
        }
    }

    /// Raises the stored value if `value` is larger (running maximum).
    pub fn max_assign(&mut self, key: &str, value: f64) {
        let slot = self.slot(key);
        if value > *slot {
            *slot = value;
        }
    }

    /// Key/value pairs in lexicographic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }
}
