use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use super::error::{PipelineError, Result};

/// Row indices of the training and holdout partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPartition {
    pub train: Vec<usize>,
    pub holdout: Vec<usize>,
}

/// Holdout size for `n_rows`: `ceil(test_size * n_rows)`.
pub fn holdout_size(n_rows: usize, test_size: f64) -> usize {
    (test_size * n_rows as f64).ceil() as usize
}

/// Shuffle `0..n_rows` with a seeded generator and cut off the holdout.
///
/// The same `n_rows` and `seed` always give the same partition.
pub fn train_test_split(n_rows: usize, test_size: f64, seed: u64) -> Result<SplitPartition> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(PipelineError::InvalidTestSize(test_size));
    }
    if n_rows < 2 {
        return Err(PipelineError::NotEnoughRows {
            required: 2,
            actual: n_rows,
        });
    }

    let n_holdout = holdout_size(n_rows, test_size);
    if n_holdout >= n_rows {
        return Err(PipelineError::NotEnoughRows {
            required: n_holdout + 1,
            actual: n_rows,
        });
    }

    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_holdout);
    Ok(SplitPartition {
        train,
        holdout: indices,
    })
}
