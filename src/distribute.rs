//! One-shot movement of the global structures from the coordinator to
//! every rank: broadcast of the shared vector, scalar scatter of the
//! per-rank nonzero counts, variable-count scatter of values and column
//! indices with one plan for both arrays, point-to-point transfer of
//! each rank's row-offset window, and a separate variable-count scatter
//! of dense row-blocks for the dense strategy.
//!
//! Rank 0's root-only paths live on [`Coordinator`]; every other rank
//! drives the matching side through [`Worker`]. The two must be called
//! in the same order on all ranks, since every transfer here is a
//! blocking collective (or a paired send/receive).

use mpi::datatype::Partition;
use mpi::traits::*;
use mpi::Count;

use crate::partition::{NnzPlan, RowPartition};
use crate::slice::{CsrSlice, DenseBlock};
use crate::{CsrMatrix, DenseMatrix, Vector};

pub const COORDINATOR_RANK: i32 = 0;

/// Rank 0's side of distribution. Owns no data; borrows the world and
/// the row partition for the duration of the transfers.
pub struct Coordinator<'w, C: Communicator> {
    world: &'w C,
    partition: &'w RowPartition,
}

impl<'w, C: Communicator> Coordinator<'w, C> {
    pub fn new(world: &'w C, partition: &'w RowPartition) -> Self {
        Self { world, partition }
    }

    /// Broadcasts the shared vector; afterwards every rank holds an
    /// identical copy.
    pub fn broadcast_vector(&self, x: &mut Vector) {
        let root = self.world.process_at_rank(COORDINATOR_RANK);
        root.broadcast_into(x.as_slice_mut().expect("vector is contiguous"));
    }

    /// Scatters the CSR slices and returns the coordinator's own.
    ///
    /// Values and column indices move with the same counts and
    /// displacements, preserving their index correspondence. The
    /// row-offset windows go point-to-point because each rank's window
    /// overlaps its neighbour's by the shared sentinel entry; the
    /// coordinator just copies its own window.
    pub fn scatter_csr(&self, mat: &CsrMatrix, plan: &NnzPlan) -> CsrSlice {
        debug!(
            "scattering {} nonzeros across {} ranks",
            plan.total_nnz(),
            self.partition.ranks()
        );
        let root = self.world.process_at_rank(COORDINATOR_RANK);

        let mut own_nnz: Count = 0;
        root.scatter_into_root(plan.counts(), &mut own_nnz);

        let mut values = vec![0i32; own_nnz as usize];
        let send = Partition::new(mat.data(), plan.counts(), plan.displs());
        root.scatter_varcount_into_root(&send, &mut values[..]);

        let mut col_indices = vec![0usize; own_nnz as usize];
        let send = Partition::new(mat.indices(), plan.counts(), plan.displs());
        root.scatter_varcount_into_root(&send, &mut col_indices[..]);

        let indptr = mat.indptr();
        let offsets = indptr.raw_storage();
        for rank in 1..self.partition.ranks() {
            let first = self.partition.first_row(rank);
            let last = first + self.partition.rows_of(rank);
            self.world
                .process_at_rank(rank as i32)
                .send(&offsets[first..=last]);
        }

        let own_rows = self.partition.rows_of(0);
        CsrSlice::from_global_offsets(values, col_indices, offsets[..=own_rows].to_vec())
    }

    /// Scatters contiguous row-blocks of the dense matrix and returns
    /// the coordinator's own block.
    pub fn scatter_dense(&self, dense: &DenseMatrix) -> DenseBlock {
        let root = self.world.process_at_rank(COORDINATOR_RANK);
        let width = dense.ncols();
        let (counts, displs) = self.partition.scaled_extents(width);
        let mut entries = vec![0i32; self.partition.rows_of(0) * width];
        let send = Partition::new(
            dense.as_slice().expect("dense matrix is row-major"),
            &counts[..],
            &displs[..],
        );
        root.scatter_varcount_into_root(&send, &mut entries[..]);
        DenseBlock::new(entries, width)
    }
}

/// A non-coordinating rank's side of distribution.
pub struct Worker<'w, C: Communicator> {
    world: &'w C,
    partition: &'w RowPartition,
    rank: usize,
}

impl<'w, C: Communicator> Worker<'w, C> {
    pub fn new(world: &'w C, partition: &'w RowPartition, rank: usize) -> Self {
        Self {
            world,
            partition,
            rank,
        }
    }

    pub fn broadcast_vector(&self, x: &mut Vector) {
        let root = self.world.process_at_rank(COORDINATOR_RANK);
        root.broadcast_into(x.as_slice_mut().expect("vector is contiguous"));
    }

    /// Receives this rank's CSR slice. The nonzero count arrives first
    /// so the value/column buffers can be sized; a rank owning no
    /// nonzeros (or no rows at all) ends up with empty buffers.
    pub fn receive_csr(&self) -> CsrSlice {
        let root = self.world.process_at_rank(COORDINATOR_RANK);

        let mut nnz: Count = 0;
        root.scatter_into(&mut nnz);

        let mut values = vec![0i32; nnz as usize];
        root.scatter_varcount_into(&mut values[..]);

        let mut col_indices = vec![0usize; nnz as usize];
        root.scatter_varcount_into(&mut col_indices[..]);

        let rows = self.partition.rows_of(self.rank);
        let mut offsets = vec![0usize; rows + 1];
        root.receive_into(&mut offsets[..]);

        CsrSlice::from_global_offsets(values, col_indices, offsets)
    }

    pub fn receive_dense(&self, width: usize) -> DenseBlock {
        let root = self.world.process_at_rank(COORDINATOR_RANK);
        let mut entries = vec![0i32; self.partition.rows_of(self.rank) * width];
        root.scatter_varcount_into(&mut entries[..]);
        DenseBlock::new(entries, width)
    }
}
