//! Row ownership and nonzero transfer planning. `RowPartition` is the
//! fixed, communication-free assignment of matrix rows to ranks;
//! `NnzPlan` reconciles that assignment with the irregular nonzero
//! counts that are only known once the CSR representation exists.

use mpi::Count;

/// Balanced assignment of `n` contiguous rows to `ranks` workers.
///
/// The first `n % ranks` workers receive one extra row, so counts never
/// differ by more than one. Every rank computes the same partition from
/// (n, ranks) alone, which is what lets the coordinator's scatter plan
/// and each worker's local buffer sizes agree without any exchange.
#[derive(Debug, Clone)]
pub struct RowPartition {
    counts: Vec<Count>,
    displs: Vec<Count>,
}

impl RowPartition {
    pub fn new(n: usize, ranks: usize) -> Self {
        assert!(ranks >= 1);
        let base = n / ranks;
        let extra = n % ranks;
        let mut counts = Vec::with_capacity(ranks);
        let mut displs = Vec::with_capacity(ranks);
        let mut offset = 0usize;
        for rank in 0..ranks {
            let rows = base + usize::from(rank < extra);
            counts.push(rows as Count);
            displs.push(offset as Count);
            offset += rows;
        }
        Self { counts, displs }
    }

    pub fn ranks(&self) -> usize {
        self.counts.len()
    }

    /// Number of rows owned by `rank`.
    pub fn rows_of(&self, rank: usize) -> usize {
        self.counts[rank] as usize
    }

    /// Global index of the first row owned by `rank`.
    pub fn first_row(&self, rank: usize) -> usize {
        self.displs[rank] as usize
    }

    pub fn total_rows(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    /// Per-rank row counts, in the element counts MPI expects.
    pub fn counts(&self) -> &[Count] {
        &self.counts
    }

    /// Exclusive prefix sum of the counts, in rank order.
    pub fn displs(&self) -> &[Count] {
        &self.displs
    }

    /// Counts and displacements scaled by `width` elements per row, for
    /// scattering contiguous row-blocks of a row-major dense matrix.
    pub fn scaled_extents(&self, width: usize) -> (Vec<Count>, Vec<Count>) {
        let counts: Vec<Count> = self.counts.iter().map(|&c| c * width as Count).collect();
        let mut displs = Vec::with_capacity(counts.len());
        let mut sum = 0;
        for &c in counts.iter() {
            displs.push(sum);
            sum += c;
        }
        (counts, displs)
    }
}

/// Per-rank nonzero counts and displacements for the variable-count
/// scatter of CSR values and column indices. Derived coordinator-side
/// from the global row offsets; workers learn their count through a
/// scalar scatter before the slices themselves move.
#[derive(Debug, Clone)]
pub struct NnzPlan {
    counts: Vec<Count>,
    displs: Vec<Count>,
}

impl NnzPlan {
    pub fn new(row_offsets: &[usize], partition: &RowPartition) -> Self {
        let mut counts = Vec::with_capacity(partition.ranks());
        let mut displs = Vec::with_capacity(partition.ranks());
        let mut sum = 0usize;
        for rank in 0..partition.ranks() {
            let first = partition.first_row(rank);
            let last = first + partition.rows_of(rank);
            let nnz = row_offsets[last] - row_offsets[first];
            counts.push(nnz as Count);
            displs.push(sum as Count);
            sum += nnz;
        }
        Self { counts, displs }
    }

    pub fn counts(&self) -> &[Count] {
        &self.counts
    }

    pub fn displs(&self) -> &[Count] {
        &self.displs
    }

    pub fn nnz_of(&self, rank: usize) -> usize {
        self.counts[rank] as usize
    }

    pub fn total_nnz(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csr;
    use crate::utils::random_sparse_matrix;

    #[test]
    fn counts_sum_to_n_and_are_balanced() {
        for n in [0usize, 1, 4, 7, 100, 101] {
            for ranks in [1usize, 2, 3, 8] {
                let part = RowPartition::new(n, ranks);
                assert_eq!(part.total_rows(), n);
                let floor = n / ranks;
                for rank in 0..ranks {
                    let expected = floor + usize::from(rank < n % ranks);
                    assert_eq!(part.rows_of(rank), expected);
                }
            }
        }
    }

    #[test]
    fn displacements_are_exclusive_prefix_sums() {
        let part = RowPartition::new(10, 4);
        assert_eq!(part.displs(), &[0, 3, 6, 8]);
        assert_eq!(part.counts(), &[3, 3, 2, 2]);
        for rank in 1..4 {
            assert_eq!(
                part.first_row(rank),
                part.first_row(rank - 1) + part.rows_of(rank - 1)
            );
        }
    }

    #[test]
    fn oversubscribed_partition_has_zero_row_ranks() {
        let part = RowPartition::new(3, 5);
        assert_eq!(part.counts(), &[1, 1, 1, 0, 0]);
        assert_eq!(part.total_rows(), 3);
    }

    #[test]
    fn scaled_extents_cover_the_dense_matrix() {
        let part = RowPartition::new(7, 3);
        let (counts, displs) = part.scaled_extents(7);
        assert_eq!(counts, vec![21, 14, 14]);
        assert_eq!(displs, vec![0, 21, 35]);
        assert_eq!(counts.iter().sum::<i32>(), 49);
    }

    #[test]
    fn plan_conserves_total_nonzero_count() {
        let dense = random_sparse_matrix(23, 0.7);
        let mat = csr::from_dense(&dense);
        let offsets = mat.indptr().raw_storage().to_vec();
        for ranks in [1usize, 2, 5, 23, 30] {
            let part = RowPartition::new(23, ranks);
            let plan = NnzPlan::new(&offsets, &part);
            assert_eq!(plan.total_nnz(), mat.nnz());
        }
    }

    #[test]
    fn plan_counts_match_row_ranges() {
        // rows with 1, 0, 2, 3 nonzeros
        let offsets = vec![0usize, 1, 1, 3, 6];
        let part = RowPartition::new(4, 2);
        let plan = NnzPlan::new(&offsets, &part);
        assert_eq!(plan.counts(), &[1, 5]);
        assert_eq!(plan.displs(), &[0, 1]);
    }
}
