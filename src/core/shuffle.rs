//! Secure row shuffle
//!
//! Produces the row order of each fragment store. The permutation must be
//! unpredictable: a guessable order would let an observer line rows of one
//! store up with the input, or with another store.

use crate::core::entropy::SecureRng;
use crate::domain::{IdFactorError, Result};
use rand::{CryptoRng, RngCore};

/// Returns an unpredictable permutation of `[0, n)` drawn from the OS
/// entropy source
///
/// # Errors
///
/// - [`IdFactorError::InvalidShuffleSize`] if `n == 0`
/// - [`IdFactorError::RandomSourceFailure`] if entropy cannot be read
///
/// # Examples
///
/// ```
/// use idfactor::core::shuffle::shuffle;
///
/// let mut order = shuffle(5).unwrap();
/// order.sort_unstable();
/// assert_eq!(order, vec![0, 1, 2, 3, 4]);
/// ```
pub fn shuffle(n: usize) -> Result<Vec<usize>> {
    shuffle_with(n, &mut SecureRng::os())
}

/// Fisher-Yates over the identity permutation using the given source
///
/// For each `i`, `j` is drawn uniformly from `[0, i]` and `a[i]` swapped with
/// `a[j]`, giving each of the `n!` orders equal probability.
pub fn shuffle_with<R: RngCore + CryptoRng>(
    n: usize,
    rng: &mut SecureRng<R>,
) -> Result<Vec<usize>> {
    if n < 1 {
        return Err(IdFactorError::InvalidShuffleSize(n));
    }

    let mut order: Vec<usize> = (0..n).collect();
    for i in 1..n {
        let j = rng.below(i as u64 + 1)? as usize;
        order.swap(i, j);
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entropy::testing::ExhaustedSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_permutation(order: &[usize]) {
        let mut sorted = order.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..order.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffle_is_permutation() {
        for n in [1usize, 2, 3, 10, 257, 4096] {
            assert_permutation(&shuffle(n).unwrap());
        }
    }

    #[test]
    fn test_shuffle_single_element() {
        assert_eq!(shuffle(1).unwrap(), vec![0]);
    }

    #[test]
    fn test_shuffle_zero_rejected() {
        assert!(matches!(
            shuffle(0),
            Err(IdFactorError::InvalidShuffleSize(0))
        ));
    }

    #[test]
    fn test_shuffle_source_failure_is_fatal() {
        let mut rng = SecureRng::from_rng(ExhaustedSource);
        let err = shuffle_with(5, &mut rng).unwrap_err();
        assert!(matches!(err, IdFactorError::RandomSourceFailure(_)));
    }

    #[test]
    fn test_shuffle_single_needs_no_entropy() {
        let mut rng = SecureRng::from_rng(ExhaustedSource);
        assert_eq!(shuffle_with(1, &mut rng).unwrap(), vec![0]);
    }

    #[test]
    fn test_seeded_source_gives_permutation() {
        let mut rng = SecureRng::from_rng(StdRng::seed_from_u64(42));
        assert_permutation(&shuffle_with(100, &mut rng).unwrap());
    }

    #[test]
    fn test_large_shuffle_moves_rows() {
        // Identity order out of 1000! permutations would indicate a broken source.
        let order = shuffle(1000).unwrap();
        assert_ne!(order, (0..1000).collect::<Vec<_>>());
    }
}
