//! Coordinator-side input generation and the shared seed vector.

use rand::Rng;

use crate::{DenseMatrix, Vector};

/// Random n-by-n integer matrix. Each entry is zeroed with probability
/// `sparsity`, otherwise drawn uniformly from [1, 10].
pub fn random_sparse_matrix(n: usize, sparsity: f64) -> DenseMatrix {
    let mut rng = rand::thread_rng();
    DenseMatrix::from_shape_fn((n, n), |_| {
        if rng.gen::<f64>() > sparsity {
            rng.gen_range(1..=10)
        } else {
            0
        }
    })
}

/// The all-ones seed vector both strategies start from.
pub fn ones(n: usize) -> Vector {
    Vector::from_elem(n, 1.0)
}
