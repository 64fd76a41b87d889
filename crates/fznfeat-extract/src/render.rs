//! Rendering of the finished feature row.
//!
//! Three formats, all over the accumulator's lexicographic key order:
//! `csv` (one separated line), `dict` (a Python-style dictionary literal),
//! and `pp` (a three-column table with per-feature descriptions). Values
//! use the default `f64` formatting; `inf` and sentinels pass through
//! untouched.

use std::fmt::Write;

use fznfeat_core::FeatureMap;
use fznfeat_core::features::description;

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Dict,
    Pp,
}

pub fn render(features: &FeatureMap, format: OutputFormat, sep: char) -> String {
    match format {
        OutputFormat::Csv => csv_row(features, sep),
        OutputFormat::Dict => dict_row(features),
        OutputFormat::Pp => pretty_table(features),
    }
}

/// One line of values in key order, `sep`-separated.
pub fn csv_row(features: &FeatureMap, sep: char) -> String {
    let mut row = String::new();
    for (i, (_, value)) in features.iter().enumerate() {
        if i > 0 {
            row.push(sep);
        }
        let _ = write!(row, "{value}");
    }
    row.push('\n');
    row
}

/// `{'key': value, ...}` on a single line.
pub fn dict_row(features: &FeatureMap) -> String {
    let mut row = String::from("{");
    for (i, (key, value)) in features.iter().enumerate() {
        if i > 0 {
            row.push_str(", ");
        }
        let _ = write!(row, "'{key}': {value}");
    }
    row.push_str("}\n");
    row
}

/// Three-column table: identifier, value, description.
pub fn pretty_table(features: &FeatureMap) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>15}{:>20}{:>40}", "IDENTIFIER", "VALUE", "DESCRIPTION");
    let _ = writeln!(out, "{}", "=".repeat(107));
    for (key, value) in features.iter() {
        let _ = writeln!(out, "{key:<21}{:<23}{}", format!("{value}"), description(key));
    }
    out
}
