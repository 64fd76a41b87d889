//! Symbol table: per-variable records and alias resolution.
//!
//! One [`VarInfo`] per declared name. Array declarations produce one record
//! for the array header (`array = true`) plus one record per element under
//! the synthesised name `A[i]`. Alias chains are collapsed at insertion
//! time, so a stored `alias` always points at a record that is itself not
//! aliased.

use fznfeat_core::Expr;
use indexmap::IndexMap;

/// Variable kind, mirroring the four FlatZinc variable domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Bool,
    Int,
    Float,
    Set,
}

/// Everything the engine tracks per declared name.
#[derive(Debug, Clone)]
pub struct VarInfo {
    pub name: String,
    pub kind: VarKind,
    /// Domain cardinality; `+inf` for unbounded domains.
    pub dom_size: f64,
    /// Number of distinct constraints referencing the variable.
    pub degree: u32,
    /// Fixed at declaration, to a constant or to another variable.
    pub assigned: bool,
    /// Resolved alias target; never itself aliased.
    pub alias: Option<Box<VarInfo>>,
    /// True for the array header record (not for elements).
    pub array: bool,
    pub begin: i64,
    pub end: i64,
    /// Declaration annotations, deduplicated structurally.
    pub anns: Vec<Expr>,
    /// Dense graph vertex id; -1 for assigned variables and array headers.
    pub id: i64,
}

impl VarInfo {
    /// Sentinel for names that were never declared. `assigned` is set so
    /// that constraint ingestion silently skips the reference.
    pub fn unknown(name: &str) -> Self {
        VarInfo {
            name: name.to_owned(),
            kind: VarKind::Int,
            dom_size: 0.0,
            degree: 0,
            assigned: true,
            alias: None,
            array: false,
            begin: 0,
            end: 0,
            anns: Vec::new(),
            id: -1,
        }
    }
}

/// Name -> record map. Iteration follows declaration order, which keeps
/// the finaliser's floating-point sums reproducible for a given model.
#[derive(Debug, Default)]
pub struct SymbolTable {
    vars: IndexMap<String, VarInfo>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record. Duplicate declarations are a model defect; the
    /// newer record wins and the caller is expected to have warned.
    pub fn insert(&mut self, vi: VarInfo) {
        debug_assert!(
            !self.vars.contains_key(&vi.name),
            "duplicate declaration of `{}`",
            vi.name
        );
        self.vars.insert(vi.name.clone(), vi);
    }

    pub fn get(&self, name: &str) -> Option<&VarInfo> {
        self.vars.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Resolves `name` through at most one alias hop and returns an owned
    /// copy of the terminal record. Unknown names yield the sentinel.
    pub fn resolve_target(&self, name: &str) -> VarInfo {
        match self.vars.get(name) {
            Some(vi) => match &vi.alias {
                Some(target) => (**target).clone(),
                None => vi.clone(),
            },
            None => VarInfo::unknown(name),
        }
    }

    /// Increments the degree of `name` and returns its domain size.
    pub fn bump_degree(&mut self, name: &str) -> Option<f64> {
        let vi = self.vars.get_mut(name)?;
        vi.degree += 1;
        Some(vi.dom_size)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Records in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &VarInfo> {
        self.vars.values()
    }
}
