//! Conversion of the coordinator's dense matrix into compressed sparse
//! row form. The scan is row-major so the slice of `values` between two
//! row offsets corresponds exactly to that dense row's nonzeros, which
//! the slice planner and the scatter both rely on.

use crate::{CsrMatrix, DenseMatrix};

/// Builds the CSR representation in a single left-to-right,
/// top-to-bottom scan. `row_offsets[i + 1]` is the running nonzero
/// count after row `i`, so `row_offsets` is monotone with
/// `row_offsets[0] == 0` and `row_offsets[n] == nnz`.
pub fn from_dense(dense: &DenseMatrix) -> CsrMatrix {
    let n = dense.nrows();
    let nnz = count_nonzeros(dense);
    let mut values = Vec::with_capacity(nnz);
    let mut col_indices = Vec::with_capacity(nnz);
    let mut row_offsets = Vec::with_capacity(n + 1);
    row_offsets.push(0);
    for row in dense.outer_iter() {
        for (j, &entry) in row.iter().enumerate() {
            if entry != 0 {
                values.push(entry);
                col_indices.push(j);
            }
        }
        row_offsets.push(values.len());
    }
    CsrMatrix::new((n, dense.ncols()), row_offsets, col_indices, values)
}

pub fn count_nonzeros(dense: &DenseMatrix) -> usize {
    dense.iter().filter(|&&entry| entry != 0).count()
}
