//! Benchmarks and cross-validates two strategies for distributed
//! matrix-vector multiplication over a fixed group of MPI ranks: a
//! sparse strategy working on compressed sparse row (CSR) slices and a
//! dense strategy working on contiguous row-blocks of the full matrix.
//!
//! The coordinator (rank 0) generates an integer matrix, converts it to
//! CSR, plans the irregular per-rank transfer sizes, and scatters the
//! slices. Every rank then runs a fixed number of rounds of
//! {local multiply, all-gather merge} for each strategy, starting from
//! an all-ones seed vector. Row ownership is balanced to within one row
//! and computed identically on every rank without communication, so the
//! coordinator's transfer plan and each worker's local expectations
//! agree by construction. After both round sequences complete the
//! coordinator compares the two final vectors element-wise and reports
//! per-phase timings.

use ndarray::{Array1, Array2};
use sprs::CsMatBase;

#[macro_use]
extern crate log;
extern crate approx;

pub mod csr;
pub mod distribute;
pub mod engine;
pub mod kernels;
pub mod partition;
pub mod report;
pub mod slice;
pub mod utils;
pub mod verify;

/// Matrix entries are fixed-precision integers; the iterated vector is real.
pub type DenseMatrix = Array2<i32>;
pub type Vector = Array1<f64>;
pub type CsrMatrix = CsMatBase<i32, usize, Vec<usize>, Vec<usize>, Vec<i32>, usize>;
