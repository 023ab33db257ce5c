//! Per-rank slices of the global problem, exclusively owned by one
//! worker after distribution.

/// A worker's rows of the CSR matrix. Row offsets are zero-based by
/// construction: the only constructor subtracts the slice's first
/// global offset from every entry, so the local column/value arrays can
/// be indexed directly without knowing the rank's global starting
/// nonzero index.
#[derive(Debug, Clone)]
pub struct CsrSlice {
    values: Vec<i32>,
    col_indices: Vec<usize>,
    row_offsets: Vec<usize>,
}

impl CsrSlice {
    /// `row_offsets` is the transferred slice of the global offsets,
    /// `local_rows + 1` entries including the trailing sentinel.
    pub fn from_global_offsets(
        values: Vec<i32>,
        col_indices: Vec<usize>,
        mut row_offsets: Vec<usize>,
    ) -> Self {
        assert_eq!(values.len(), col_indices.len());
        assert!(!row_offsets.is_empty());
        let base = row_offsets[0];
        for offset in row_offsets.iter_mut() {
            *offset -= base;
        }
        debug_assert_eq!(*row_offsets.last().unwrap(), values.len());
        Self {
            values,
            col_indices,
            row_offsets,
        }
    }

    pub fn rows(&self) -> usize {
        self.row_offsets.len() - 1
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Values and column indices of local row `i`. Empty rows yield
    /// empty slices, never an out-of-bounds access.
    pub fn row(&self, i: usize) -> (&[i32], &[usize]) {
        let range = self.row_offsets[i]..self.row_offsets[i + 1];
        (&self.values[range.clone()], &self.col_indices[range])
    }

    pub fn row_offsets(&self) -> &[usize] {
        &self.row_offsets
    }
}

/// A worker's contiguous row-block of the dense matrix, row-major.
#[derive(Debug, Clone)]
pub struct DenseBlock {
    entries: Vec<i32>,
    width: usize,
}

impl DenseBlock {
    pub fn new(entries: Vec<i32>, width: usize) -> Self {
        if width > 0 {
            assert_eq!(entries.len() % width, 0);
        }
        Self { entries, width }
    }

    pub fn rows(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.entries.len() / self.width
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn row(&self, i: usize) -> &[i32] {
        &self.entries[i * self.width..(i + 1) * self.width]
    }
}
