//! Expression values produced by the parser.
//!
//! A small tagged variant covering everything a flattened constraint model
//! can put in an argument or annotation position. Expressions are owned
//! trees; the parser builds them and the engine only ever reads them.
//!
//! Equality is structural throughout. Sets compare as multisets: element
//! order is irrelevant, multiplicity is not.

/// A parsed FlatZinc expression.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(serde::Serialize))]
pub enum Expr {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Ordered sequence, `[a, b, c]`. Also carries annotation calls as
    /// `[name, arg, ...]` with the name in head position.
    Array(Vec<Expr>),
    /// Unordered collection, `{a, b, c}`.
    Set(Vec<Expr>),
}

impl Expr {
    /// Convenience constructor for string payloads.
    pub fn str(s: impl Into<String>) -> Self {
        Expr::Str(s.into())
    }

    /// The string payload, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expr::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The element list, if this is an `Array`.
    pub fn as_array(&self) -> Option<&[Expr]> {
        match self {
            Expr::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Head string of an annotation call `[name, arg, ...]`.
    pub fn head_str(&self) -> Option<&str> {
        self.as_array()?.first()?.as_str()
    }

    fn count_in(&self, items: &[Expr]) -> usize {
        items.iter().filter(|e| *e == self).count()
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expr::Bool(a), Expr::Bool(b)) => a == b,
            (Expr::Int(a), Expr::Int(b)) => a == b,
            // Bit-exact, no tolerance.
            (Expr::Float(a), Expr::Float(b)) => a.to_bits() == b.to_bits(),
            (Expr::Str(a), Expr::Str(b)) => a == b,
            (Expr::Array(a), Expr::Array(b)) => a == b,
            (Expr::Set(a), Expr::Set(b)) => {
                a.len() == b.len() && a.iter().all(|e| e.count_in(a) == e.count_in(b))
            }
            _ => false,
        }
    }
}

impl Eq for Expr {}

/// Deduplicates by structural equality, keeping first occurrences in order.
///
/// Quadratic, which is fine for the short annotation and search-variable
/// lists this is applied to.
pub fn distinct(items: &[Expr]) -> Vec<&Expr> {
    let mut out: Vec<&Expr> = Vec::with_capacity(items.len());
    for item in items {
        if !out.iter().any(|seen| *seen == item) {
            out.push(item);
        }
    }
    out
}
