//! The fixed-round iterate/merge loop. Each round applies the active
//! local kernel to the current shared vector and merges every rank's
//! partial output back into a complete copy of the vector, which feeds
//! the next round. The iteration count is an external parameter, not a
//! convergence test.

use mpi::datatype::PartitionMut;
use mpi::traits::*;

use crate::partition::RowPartition;
use crate::Vector;

/// Runs `rounds` rounds of {kernel, merge} in place on `x`.
///
/// The merge seam takes the rank's partial output and the shared vector
/// and must leave `x` as the fully assembled next-round input. In the
/// distributed setting this is [`allgather_merge`]; single-rank callers
/// can pass a plain copy.
pub fn run_rounds<K, M>(rounds: usize, x: &mut Vector, kernel: K, mut merge: M)
where
    K: Fn(&Vector) -> Vector,
    M: FnMut(&Vector, &mut Vector),
{
    for _ in 0..rounds {
        let y_local = kernel(x);
        merge(&y_local, x);
    }
}

/// The distributed merge: a variable-count all-gather that places each
/// rank's partial at its partition displacement. Blocking, so no rank
/// observes the next round's vector before every contribution has been
/// incorporated.
pub fn allgather_merge<'a, C: Communicator>(
    world: &'a C,
    partition: &'a RowPartition,
) -> impl FnMut(&Vector, &mut Vector) + 'a {
    move |y_local: &Vector, x: &mut Vector| {
        let mut assembled = PartitionMut::new(
            x.as_slice_mut().expect("vector is contiguous"),
            partition.counts(),
            partition.displs(),
        );
        world.all_gather_varcount_into(
            y_local.as_slice().expect("partial output is contiguous"),
            &mut assembled,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slice::CsrSlice;
    use crate::utils::{ones, random_sparse_matrix};
    use crate::{csr, kernels};
    use approx::assert_abs_diff_eq;

    fn single_rank_slice(mat: &crate::CsrMatrix) -> CsrSlice {
        CsrSlice::from_global_offsets(
            mat.data().to_vec(),
            mat.indices().to_vec(),
            mat.indptr().raw_storage().to_vec(),
        )
    }

    #[test]
    fn k_rounds_equal_k_sequential_products() {
        let n = 12;
        let dense = random_sparse_matrix(n, 0.5);
        let mat = csr::from_dense(&dense);
        let slice = single_rank_slice(&mat);

        let mut x = ones(n);
        run_rounds(
            3,
            &mut x,
            |x| kernels::spmv_csr(&slice, x),
            |y, x| x.assign(y),
        );

        let mut expected = ones(n);
        for _ in 0..3 {
            expected = kernels::spmv_csr(&slice, &expected);
        }
        assert_abs_diff_eq!(x, expected, epsilon = 1e-6);
    }

    #[test]
    fn scaled_identity_maps_ones_to_the_diagonal() {
        // 2 * I, one round, all-ones seed
        let dense = crate::DenseMatrix::from_diag(&ndarray::Array1::from_elem(4, 2));
        let mat = csr::from_dense(&dense);
        let slice = single_rank_slice(&mat);

        let mut x = ones(4);
        run_rounds(
            1,
            &mut x,
            |x| kernels::spmv_csr(&slice, x),
            |y, x| x.assign(y),
        );
        assert_eq!(x.to_vec(), vec![2.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn one_by_one_matrix_iterates_to_a_power() {
        let dense = crate::DenseMatrix::from_elem((1, 1), 3);
        let mat = csr::from_dense(&dense);
        let slice = single_rank_slice(&mat);

        let mut x = ones(1);
        run_rounds(
            5,
            &mut x,
            |x| kernels::spmv_csr(&slice, x),
            |y, x| x.assign(y),
        );
        assert_abs_diff_eq!(x[0], 3.0_f64.powi(5), epsilon = 1e-6);
    }

    /// Slices the global CSR arrays for every rank the way distribution
    /// does, then plays the round sequence with an in-process merge.
    fn simulate_rounds(dense: &crate::DenseMatrix, ranks: usize, rounds: usize) -> Vector {
        use crate::partition::{NnzPlan, RowPartition};

        let n = dense.nrows();
        let mat = csr::from_dense(dense);
        let part = RowPartition::new(n, ranks);
        let plan = NnzPlan::new(mat.indptr().raw_storage(), &part);
        let slices: Vec<CsrSlice> = (0..ranks)
            .map(|rank| {
                let first = part.first_row(rank);
                let last = first + part.rows_of(rank);
                let lo = plan.displs()[rank] as usize;
                let hi = lo + plan.nnz_of(rank);
                CsrSlice::from_global_offsets(
                    mat.data()[lo..hi].to_vec(),
                    mat.indices()[lo..hi].to_vec(),
                    mat.indptr().raw_storage()[first..=last].to_vec(),
                )
            })
            .collect();

        let mut x = ones(n);
        for _ in 0..rounds {
            let merged: Vec<f64> = slices
                .iter()
                .flat_map(|slice| kernels::spmv_csr(slice, &x).to_vec())
                .collect();
            x = Vector::from(merged);
        }
        x
    }

    #[test]
    fn two_rank_partition_reproduces_the_global_product() {
        // 2 * I over two ranks, one round, all-ones seed
        let dense = crate::DenseMatrix::from_diag(&ndarray::Array1::from_elem(4, 2));
        let x = simulate_rounds(&dense, 2, 1);
        assert_eq!(x.to_vec(), vec![2.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn oversubscribed_group_still_produces_a_full_result() {
        let dense = random_sparse_matrix(3, 0.4);
        let mat = csr::from_dense(&dense);
        let slice = single_rank_slice(&mat);
        let mut expected = ones(3);
        for _ in 0..2 {
            expected = kernels::spmv_csr(&slice, &expected);
        }

        // five ranks for three rows; ranks 3 and 4 own nothing
        let x = simulate_rounds(&dense, 5, 2);
        assert_eq!(x.len(), 3);
        assert_abs_diff_eq!(x, expected, epsilon = 1e-6);
    }

    #[test]
    fn empty_problem_terminates_immediately() {
        let dense = crate::DenseMatrix::zeros((0, 0));
        let mat = csr::from_dense(&dense);
        let slice = single_rank_slice(&mat);

        let mut x = ones(0);
        run_rounds(
            4,
            &mut x,
            |x| kernels::spmv_csr(&slice, x),
            |y, x| x.assign(y),
        );
        assert_eq!(x.len(), 0);
    }
}
