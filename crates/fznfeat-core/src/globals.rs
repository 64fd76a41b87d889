//! Catalogue of recognised global-constraint names.
//!
//! Constraints whose name appears here count towards `gc_global_cons`
//! instead of the prefix-classified `d_*_cons` counters. The list covers
//! the `fzn_*` decompositions shipped with MiniZinc plus the `gecode_*`
//! natives. Process-wide immutable state, built once on first use.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Names recognised as global constraints.
#[derive(Debug, Clone)]
pub struct GlobalCatalogue {
    names: HashSet<&'static str>,
}

impl GlobalCatalogue {
    /// The standard catalogue, built once.
    pub fn standard() -> &'static GlobalCatalogue {
        static STANDARD: LazyLock<GlobalCatalogue> = LazyLock::new(|| GlobalCatalogue {
            names: GLOBAL_NAMES.iter().copied().collect(),
        });
        &STANDARD
    }

    /// A catalogue over an explicit name list (probe catalogues in tests).
    pub fn from_names(names: &[&'static str]) -> Self {
        Self {
            names: names.iter().copied().collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

static GLOBAL_NAMES: &[&str] = &[
    "fzn_alldifferent_except_0",
    "fzn_all_different_int",
    "fzn_all_equal_int",
    "fzn_among",
    "fzn_arg_max_bool",
    "fzn_arg_max_int",
    "fzn_arg_min_bool",
    "fzn_arg_min_int",
    "fzn_at_least_int",
    "fzn_at_least_set",
    "fzn_at_most_int",
    "fzn_at_most_set",
    "fzn_bin_packing",
    "fzn_bin_packing_capa",
    "fzn_bin_packing_load",
    "fzn_circuit",
    "fzn_count_eq",
    "fzn_count_eq_reif",
    "fzn_cumulative",
    "fzn_cumulative_opt",
    "fzn_decreasing_bool",
    "fzn_decreasing_int",
    "fzn_diffn",
    "fzn_disjoint",
    "fzn_disjunctive_strict",
    "fzn_disjunctive_strict_opt",
    "fzn_exactly_set",
    "fzn_global_cardinality",
    "fzn_global_cardinality_closed",
    "fzn_global_cardinality_low_up",
    "fzn_global_cardinality_low_up_closed",
    "fzn_increasing_bool",
    "fzn_increasing_int",
    "fzn_int_set_channel",
    "fzn_inverse",
    "fzn_inverse_set",
    "fzn_lex_less_bool",
    "fzn_lex_lesseq_bool",
    "fzn_lex_lesseq_int",
    "fzn_lex_less_int",
    "fzn_link_set_to_booleans",
    "fzn_member_bool",
    "fzn_member_bool_reif",
    "fzn_member_int",
    "fzn_member_int_reif",
    "fzn_nvalue",
    "fzn_partition_set",
    "fzn_range",
    "fzn_regular",
    "fzn_roots",
    "fzn_sort",
    "fzn_sum_pred",
    "fzn_sum_set",
    "fzn_table_bool",
    "fzn_table_bool_reif",
    "fzn_table_int",
    "fzn_table_int_reif",
    "fzn_value_precede_int",
    "fzn_value_precede_set",
    "gecode_among_seq_bool",
    "gecode_among_seq_int",
    "gecode_array_set_element_intersect",
    "gecode_array_set_element_intersect_in",
    "gecode_array_set_element_partition",
    "gecode_array_set_element_union",
    "gecode_bin_packing_load",
    "gecode_bool_element",
    "gecode_bool_element2d",
    "gecode_circuit",
    "gecode_circuit_cost",
    "gecode_circuit_cost_array",
    "gecode_cumulatives",
    "gecode_global_cardinality",
    "gecode_global_cardinality_closed",
    "gecode_int_element",
    "gecode_int_element2d",
    "gecode_int_pow",
    "gecode_int_set_channel",
    "gecode_inverse_set",
    "gecode_link_set_to_booleans",
    "gecode_maximum_arg_bool_offset",
    "gecode_maximum_arg_int_offset",
    "gecode_member_bool_reif",
    "gecode_member_int_reif",
    "gecode_minimum_arg_bool_offset",
    "gecode_minimum_arg_int_offset",
    "gecode_nooverlap",
    "gecode_precede",
    "gecode_precede_set",
    "gecode_range",
    "gecode_regular",
    "gecode_schedule_cumulative_optional",
    "gecode_schedule_unary",
    "gecode_schedule_unary_optional",
    "gecode_set_weights",
    "gecode_table_bool",
    "gecode_table_bool_imp",
    "gecode_table_bool_reif",
    "gecode_table_int",
    "gecode_table_int_imp",
    "gecode_table_int_reif",
];
