//! Per-phase duration record, populated only by the coordinator and
//! printed after verification. No timer state is shared across ranks.

use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct PhaseTimings {
    pub csr_build: Duration,
    pub distribution: Duration,
    pub sparse_compute: Duration,
    pub sparse_total: Duration,
    pub dense_total: Duration,
}

impl PhaseTimings {
    /// Emits the result lines, coordinator-side only.
    pub fn print(&self, n: usize, sparsity: f64, iterations: usize, ranks: usize) {
        println!("results: n={n}, sparsity={sparsity:.2}, iterations={iterations}, ranks={ranks}");
        println!("time_csr_build:    {:.6}", self.csr_build.as_secs_f64());
        println!("time_distribution: {:.6}", self.distribution.as_secs_f64());
        println!("time_sparse_calc:  {:.6}", self.sparse_compute.as_secs_f64());
        println!("time_sparse_total: {:.6}", self.sparse_total.as_secs_f64());
        println!("time_dense_total:  {:.6}", self.dense_total.as_secs_f64());
    }
}
