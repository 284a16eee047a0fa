//! Cryptographically secure randomness
//!
//! Every random draw in idfactor goes through [`SecureRng`]. The wrapped
//! generator must implement [`CryptoRng`], so a fast non-cryptographic PRNG
//! cannot be plugged in. All draws use the fallible `try_fill_bytes` path:
//! an entropy failure surfaces as [`IdFactorError::RandomSourceFailure`]
//! instead of a panic or a silent fallback.

use crate::domain::{IdFactorError, Result};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

/// Fallible wrapper around a cryptographically secure generator
#[derive(Debug, Default)]
pub struct SecureRng<R = OsRng> {
    inner: R,
}

impl SecureRng<OsRng> {
    /// Reads directly from the operating system's entropy source
    pub fn os() -> Self {
        Self { inner: OsRng }
    }
}

impl<R: RngCore + CryptoRng> SecureRng<R> {
    /// Wraps an arbitrary cryptographic generator
    pub fn from_rng(inner: R) -> Self {
        Self { inner }
    }

    /// Fills `dest` with random bytes
    pub fn fill(&mut self, dest: &mut [u8]) -> Result<()> {
        self.inner.try_fill_bytes(dest)?;
        Ok(())
    }

    /// Draws a uniformly distributed `u64`
    pub fn next_u64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.fill(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    /// Draws an integer uniformly from `[0, bound)`
    ///
    /// Rejection sampling keeps the result free of modulo bias.
    pub fn below(&mut self, bound: u64) -> Result<u64> {
        if bound == 0 {
            return Err(IdFactorError::Validation(
                "random bound must be positive".to_string(),
            ));
        }
        // Largest multiple of `bound` that fits; draws at or above it are retried.
        let zone = u64::MAX - (u64::MAX % bound);
        loop {
            let value = self.next_u64()?;
            if value < zone {
                return Ok(value % bound);
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ExhaustedSource;
    use super::*;

    #[test]
    fn test_below_stays_in_range() {
        let mut rng = SecureRng::os();
        for bound in [1u64, 2, 3, 7, 1000, u64::MAX] {
            for _ in 0..200 {
                assert!(rng.below(bound).unwrap() < bound);
            }
        }
    }

    #[test]
    fn test_below_one_is_zero() {
        let mut rng = SecureRng::os();
        assert_eq!(rng.below(1).unwrap(), 0);
    }

    #[test]
    fn test_below_zero_rejected() {
        let mut rng = SecureRng::os();
        assert!(rng.below(0).is_err());
    }

    #[test]
    fn test_source_failure_propagates() {
        let mut rng = SecureRng::from_rng(ExhaustedSource);
        let err = rng.next_u64().unwrap_err();
        assert!(matches!(err, IdFactorError::RandomSourceFailure(_)));
        assert!(err.to_string().contains("exhausted"));
    }
}
