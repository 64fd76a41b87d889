//! Bounded-time analysis of the two derived graphs.
//!
//! - **VG** (variable graph): one vertex per non-assigned variable, an edge
//!   whenever two variables co-occur in a constraint.
//! - **CG** (constraint graph): one vertex per counted constraint, an edge
//!   whenever two constraints share a variable.
//!
//! Four metrics run as a pipeline of states, each under its own wall-clock
//! budget with a cooperative deadline check at every vertex boundary:
//!
//! ```text
//! Idle -> CgDegree -> CgClustering -> VgDegree -> VgDiameter -> Done
//! ```
//!
//! A timed-out metric leaves its five features at the -1 sentinel and skips
//! the rest of its phase; a CG timeout does not abort the VG phase. The
//! caller learns about timeouts through [`GraphOutcome`] and decides what
//! to emit (the engine itself never prints).

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use fznfeat_core::FeatureMap;
use indexmap::IndexSet;
use petgraph::graph::{NodeIndex, UnGraph};
use tracing::warn;

use crate::stats::{Distribution, Summary};

/// Verdict of the graph phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphOutcome {
    /// Every metric finished within its budget.
    Completed,
    /// At least one metric hit its budget; its features stay at -1.
    TimedOut,
    /// Graph analysis was not requested (no-graph variant).
    Skipped,
}

/// Graph raw material collected by the engine during ingestion.
pub struct GraphInputs<'a> {
    /// Vertex count of the VG (the number of issued variable ids).
    pub num_vars: usize,
    /// De-duplicated VG edges as (lo, hi) id pairs.
    pub vg_edges: &'a IndexSet<(u32, u32)>,
    /// Per-constraint sorted variable-id sets, indexed by constraint id.
    pub cons_vars: &'a [Vec<u32>],
}

/// Cooperative wall-clock deadline, checked at per-vertex boundaries.
#[derive(Debug, Clone, Copy)]
struct Deadline {
    end: Instant,
}

impl Deadline {
    fn after(budget: Duration) -> Self {
        Deadline { end: Instant::now() + budget }
    }

    fn check(self) -> Result<(), MetricTimeout> {
        if Instant::now() >= self.end {
            Err(MetricTimeout)
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct MetricTimeout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    CgDegree,
    CgClustering,
    VgDegree,
    VgDiameter,
    Done,
}

/// Runs the metric pipeline, writing each finished metric's five `gr_*`
/// features. `budget` applies to every metric separately.
pub fn analyse(features: &mut FeatureMap, inputs: &GraphInputs, budget: Duration) -> GraphOutcome {
    let mut timed_out = false;
    let mut cg: Option<UnGraph<(), ()>> = None;
    let mut vg: Option<UnGraph<(), ()>> = None;
    let mut stage = Stage::CgDegree;

    loop {
        match stage {
            Stage::CgDegree => {
                if inputs.cons_vars.is_empty() {
                    stage = Stage::VgDegree;
                    continue;
                }
                let deadline = Deadline::after(budget);
                let result = build_cg(inputs.cons_vars, deadline)
                    .and_then(|g| degree_stats(&g, deadline).map(|s| (g, s)));
                match result {
                    Ok((g, summary)) => {
                        write_summary(features, "deg_cg", summary);
                        cg = Some(g);
                        stage = Stage::CgClustering;
                    }
                    Err(MetricTimeout) => {
                        warn!("constraint-graph degree analysis timed out");
                        timed_out = true;
                        stage = Stage::VgDegree;
                    }
                }
            }
            Stage::CgClustering => {
                // Only reachable right after a completed CgDegree.
                let Some(g) = cg.as_ref() else {
                    stage = Stage::VgDegree;
                    continue;
                };
                match clustering_stats(g, Deadline::after(budget)) {
                    Ok(summary) => write_summary(features, "clust_cg", summary),
                    Err(MetricTimeout) => {
                        warn!("constraint-graph clustering analysis timed out");
                        timed_out = true;
                    }
                }
                stage = Stage::VgDegree;
            }
            Stage::VgDegree => {
                if inputs.num_vars == 0 {
                    stage = Stage::Done;
                    continue;
                }
                let deadline = Deadline::after(budget);
                let g = build_vg(inputs.num_vars, inputs.vg_edges);
                match degree_stats(&g, deadline) {
                    Ok(summary) => {
                        write_summary(features, "deg_vg", summary);
                        vg = Some(g);
                        stage = Stage::VgDiameter;
                    }
                    Err(MetricTimeout) => {
                        warn!("variable-graph degree analysis timed out");
                        timed_out = true;
                        stage = Stage::Done;
                    }
                }
            }
            Stage::VgDiameter => {
                let Some(g) = vg.as_ref() else {
                    stage = Stage::Done;
                    continue;
                };
                match diameter_stats(g, Deadline::after(budget)) {
                    Ok(summary) => write_summary(features, "diam_vg", summary),
                    Err(MetricTimeout) => {
                        warn!("variable-graph diameter analysis timed out");
                        timed_out = true;
                    }
                }
                stage = Stage::Done;
            }
            Stage::Done => break,
        }
    }

    if timed_out { GraphOutcome::TimedOut } else { GraphOutcome::Completed }
}

fn write_summary(features: &mut FeatureMap, metric: &str, s: Summary) {
    features.set(&format!("gr_min_{metric}"), s.min);
    features.set(&format!("gr_max_{metric}"), s.max);
    features.set(&format!("gr_avg_{metric}"), s.avg);
    features.set(&format!("gr_cv_{metric}"), s.cv);
    features.set(&format!("gr_ent_{metric}"), s.ent);
}

/// Builds the constraint graph: an edge between every pair of constraints
/// with non-disjoint variable sets.
fn build_cg(cons_vars: &[Vec<u32>], deadline: Deadline) -> Result<UnGraph<(), ()>, MetricTimeout> {
    let n = cons_vars.len();
    let mut g = UnGraph::with_capacity(n, n);
    for _ in 0..n {
        g.add_node(());
    }
    for i in 0..n {
        deadline.check()?;
        for j in (i + 1)..n {
            if !disjoint(&cons_vars[i], &cons_vars[j]) {
                g.add_edge(NodeIndex::new(i), NodeIndex::new(j), ());
            }
        }
    }
    Ok(g)
}

/// Two-pointer disjointness over sorted id sets, short-circuited by
/// comparing extremes.
fn disjoint(a: &[u32], b: &[u32]) -> bool {
    let (Some(&a_first), Some(&b_first)) = (a.first(), b.first()) else {
        return true;
    };
    let (Some(&a_last), Some(&b_last)) = (a.last(), b.last()) else {
        return true;
    };
    if a_first > b_last || b_first > a_last {
        return true;
    }
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            return false;
        }
        if a[i] < b[j] {
            i += 1;
        } else {
            j += 1;
        }
    }
    true
}

/// Builds the variable graph over `num_vars` vertices, including the
/// isolated ones no edge ever touched.
fn build_vg(num_vars: usize, edges: &IndexSet<(u32, u32)>) -> UnGraph<(), ()> {
    let mut g = UnGraph::with_capacity(num_vars, edges.len());
    for _ in 0..num_vars {
        g.add_node(());
    }
    for &(u, v) in edges {
        g.add_edge(NodeIndex::new(u as usize), NodeIndex::new(v as usize), ());
    }
    g
}

fn degree_stats(g: &UnGraph<(), ()>, deadline: Deadline) -> Result<Summary, MetricTimeout> {
    let mut dist = Distribution::new();
    for v in g.node_indices() {
        deadline.check()?;
        let d = g.neighbors(v).count() as f64;
        dist.record(d, d);
    }
    Ok(dist.summary())
}

/// Per-vertex clustering coefficient `2*tri / (d*(d-1))`, zero below
/// degree 2. Histogram buckets are rounded to unitary bins.
fn clustering_stats(g: &UnGraph<(), ()>, deadline: Deadline) -> Result<Summary, MetricTimeout> {
    let mut dist = Distribution::new();
    for v in g.node_indices() {
        deadline.check()?;
        let neighbours: Vec<NodeIndex> = g.neighbors(v).collect();
        let d = neighbours.len();
        let coefficient = if d < 2 {
            0.0
        } else {
            let mut triangles: u64 = 0;
            for (i, &u) in neighbours.iter().enumerate() {
                for &w in &neighbours[i + 1..] {
                    if g.contains_edge(u, w) {
                        triangles += 1;
                    }
                }
            }
            2.0 * triangles as f64 / (d * (d - 1)) as f64
        };
        dist.record(coefficient, coefficient.round());
    }
    Ok(dist.summary())
}

/// Per-vertex eccentricity (longest shortest path to any reachable vertex)
/// by breadth-first search; unreachable vertices contribute distance 0.
fn diameter_stats(g: &UnGraph<(), ()>, deadline: Deadline) -> Result<Summary, MetricTimeout> {
    let n = g.node_count();
    let mut dist = Distribution::new();
    let mut distances: Vec<i64> = vec![-1; n];
    let mut queue: VecDeque<NodeIndex> = VecDeque::new();

    for source in g.node_indices() {
        deadline.check()?;
        distances.fill(-1);
        queue.clear();
        distances[source.index()] = 0;
        queue.push_back(source);
        let mut eccentricity: i64 = 0;
        while let Some(u) = queue.pop_front() {
            let du = distances[u.index()];
            for v in g.neighbors(u) {
                if distances[v.index()] < 0 {
                    distances[v.index()] = du + 1;
                    eccentricity = eccentricity.max(du + 1);
                    queue.push_back(v);
                }
            }
        }
        dist.record(eccentricity as f64, eccentricity as f64);
    }
    Ok(dist.summary())
}
