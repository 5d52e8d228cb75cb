//! Seeded Train/Test Split
//!
//! Shuffles row indices with a fixed seed and carves off the test partition
//! from the front of the permutation:
//!     n_test  = ceil(n * test_fraction)
//!     n_train = n - n_test

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Row indices for each partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Number of test rows for `n` rows at `test_fraction`
///
/// # Examples
/// ```
/// use f1predict::core::split::test_size;
/// assert_eq!(test_size(10, 0.2), 2);
/// assert_eq!(test_size(11, 0.2), 3);
/// ```
pub fn test_size(n: usize, test_fraction: f64) -> usize {
    ((n as f64 * test_fraction).ceil() as usize).min(n)
}

/// Split `n` row indices into train and test partitions
///
/// The same `seed` always produces the same partitions.
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> Split {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(test_size(n, test_fraction));
    Split {
        train,
        test: indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_split_sizes() {
        let split = train_test_split(100, 0.2, 42);
        assert_eq!(split.test.len(), 20);
        assert_eq!(split.train.len(), 80);
    }

    #[test]
    fn test_split_rounds_test_size_up() {
        let split = train_test_split(7, 0.2, 42);
        assert_eq!(split.test.len(), 2);
        assert_eq!(split.train.len(), 5);
    }

    #[test]
    fn test_split_is_partition() {
        let split = train_test_split(53, 0.2, 7);
        let train: HashSet<_> = split.train.iter().copied().collect();
        let test: HashSet<_> = split.test.iter().copied().collect();

        assert!(train.is_disjoint(&test));
        assert_eq!(train.len() + test.len(), 53);
        assert!((0..53).all(|i| train.contains(&i) || test.contains(&i)));
    }

    #[test]
    fn test_split_deterministic() {
        assert_eq!(train_test_split(40, 0.2, 42), train_test_split(40, 0.2, 42));
        assert_ne!(train_test_split(40, 0.2, 42), train_test_split(40, 0.2, 43));
    }

    #[test]
    fn test_split_empty() {
        let split = train_test_split(0, 0.2, 42);
        assert!(split.train.is_empty());
        assert!(split.test.is_empty());
    }

    #[test]
    fn test_single_row_goes_to_test() {
        let split = train_test_split(1, 0.2, 42);
        assert_eq!(split.test, vec![0]);
        assert!(split.train.is_empty());
    }
}
