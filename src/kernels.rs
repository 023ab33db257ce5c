//! The two interchangeable single-rank multiply routines. Both take the
//! shared input vector of length n and produce a partial output of
//! length `local_rows`; for the same logical rows of the same logical
//! matrix they are mathematically identical, which is what the verifier
//! checks end to end.

use crate::slice::{CsrSlice, DenseBlock};
use crate::Vector;

/// Sparse local multiply: for each local row, sum `value * x[column]`
/// over the row's half-open slice of the local arrays. Empty rows
/// contribute zero.
pub fn spmv_csr(slice: &CsrSlice, x: &Vector) -> Vector {
    let y: Vec<f64> = (0..slice.rows())
        .map(|i| {
            let (values, cols) = slice.row(i);
            values
                .iter()
                .zip(cols)
                .map(|(&value, &j)| f64::from(value) * x[j])
                .sum()
        })
        .collect();
    Vector::from(y)
}

/// Dense local multiply over a contiguous row-block.
pub fn mv_dense(block: &DenseBlock, x: &Vector) -> Vector {
    let y: Vec<f64> = (0..block.rows())
        .map(|i| {
            block
                .row(i)
                .iter()
                .zip(x.iter())
                .map(|(&entry, &xj)| f64::from(entry) * xj)
                .sum()
        })
        .collect();
    Vector::from(y)
}
