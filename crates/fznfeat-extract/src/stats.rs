//! Running-statistics algebra.
//!
//! The engine keeps linear sums in the feature map itself and the squared
//! sums plus value histograms on the side; this module holds the closing
//! formulas (coefficient of variation, Shannon entropy) and a small
//! [`Distribution`] accumulator used by the graph analyser, which collects
//! a whole value population before closing it.

use indexmap::IndexMap;

/// Coefficient of variation sigma/mu, with sigma = sqrt(sum2/n - mu^2).
///
/// Returns 0.0 for an empty population or a zero mean; the subtraction is
/// clamped at zero to absorb floating-point cancellation.
pub fn coeff_of_variation(sum2: f64, mean: f64, n: f64) -> f64 {
    if n <= 0.0 || mean == 0.0 {
        return 0.0;
    }
    let variance = (sum2 / n - mean * mean).max(0.0);
    variance.sqrt() / mean
}

/// Value histogram: bucket -> mass.
///
/// Buckets are raw `f64` values (callers round where unitary bins are
/// wanted). Keyed by bit pattern so that `inf` and fractional buckets work;
/// insertion order is kept so entropy sums are reproducible run to run.
#[derive(Debug, Clone, Default)]
pub struct Histogram {
    buckets: IndexMap<u64, f64>,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bump(&mut self, bucket: f64) {
        self.bump_by(bucket, 1.0);
    }

    pub fn bump_by(&mut self, bucket: f64, mass: f64) {
        *self.buckets.entry(Self::key(bucket)).or_insert(0.0) += mass;
    }

    /// Shannon entropy over the bucket masses: `log2(n) - (sum c*log2(c))/n`.
    ///
    /// Zero for an empty histogram and for a single bucket holding all mass.
    pub fn entropy(&self, n: f64) -> f64 {
        if n <= 0.0 {
            return 0.0;
        }
        let weighted: f64 = self.buckets.values().map(|c| c * c.log2()).sum();
        n.log2() - weighted / n
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    fn key(value: f64) -> u64 {
        // Collapse -0.0 into +0.0 so the two land in one bucket.
        (value + 0.0).to_bits()
    }
}

/// Closed summary of a value population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub cv: f64,
    pub ent: f64,
}

/// Whole-population accumulator for the graph metrics: record every value
/// (with its histogram bucket), then close into a [`Summary`].
#[derive(Debug, Clone, Default)]
pub struct Distribution {
    sum: f64,
    sum2: f64,
    min: f64,
    max: f64,
    n: f64,
    hist: Histogram,
}

impl Distribution {
    pub fn new() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            ..Self::default()
        }
    }

    pub fn record(&mut self, value: f64, bucket: f64) {
        self.sum += value;
        self.sum2 += value * value;
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
        self.n += 1.0;
        self.hist.bump(bucket);
    }

    pub fn summary(&self) -> Summary {
        if self.n <= 0.0 {
            return Summary { min: 0.0, max: 0.0, avg: 0.0, cv: 0.0, ent: 0.0 };
        }
        let avg = self.sum / self.n;
        Summary {
            min: self.min,
            max: self.max,
            avg,
            cv: coeff_of_variation(self.sum2, avg, self.n),
            ent: self.hist.entropy(self.n),
        }
    }
}
