//! Element-wise comparison of the two strategies' final vectors. A
//! mismatch is a verification finding, not an error: it is reported as
//! a warning and never aborts the run.

use approx::AbsDiffEq;

use crate::Vector;

/// Absolute tolerance for declaring two entries equal.
pub const TOLERANCE: f64 = 1e-6;

/// How many offending entries to keep for the report.
const SAMPLE_LIMIT: usize = 4;

#[derive(Debug, Clone)]
pub struct Verification {
    pub mismatches: usize,
    /// The first few offending entries as (index, sparse, dense).
    pub samples: Vec<(usize, f64, f64)>,
}

impl Verification {
    pub fn is_success(&self) -> bool {
        self.mismatches == 0
    }

    /// Emits the verification outcome, coordinator-side only. A
    /// mismatch is a finding, not an error, so it never affects control
    /// flow.
    pub fn print(&self) {
        for &(i, sparse, dense) in self.samples.iter() {
            println!("mismatch at index {i}: sparse={sparse:.6}, dense={dense:.6}");
        }
        if self.is_success() {
            println!("verification success: sparse and dense results match");
        } else {
            println!("warning: found {} mismatches", self.mismatches);
        }
    }
}

/// Compares the two final vectors entry by entry with an absolute
/// tolerance. A zero-length input verifies vacuously.
pub fn compare(sparse: &Vector, dense: &Vector, tolerance: f64) -> Verification {
    assert_eq!(sparse.len(), dense.len());
    let mut mismatches = 0;
    let mut samples = Vec::new();
    for (i, (&a, &b)) in sparse.iter().zip(dense.iter()).enumerate() {
        if a.abs_diff_ne(&b, tolerance) {
            if samples.len() < SAMPLE_LIMIT {
                samples.push((i, a, b));
            }
            mismatches += 1;
        }
    }
    Verification {
        mismatches,
        samples,
    }
}
