//! Surrogate identifier generation
//!
//! One fresh version 4 UUID per emitted fragment. 122 of the 128 bits come
//! from the secure source; uniqueness is not checked against earlier output.

use crate::core::entropy::SecureRng;
use crate::domain::{Result, SurrogateId};
use rand::{CryptoRng, RngCore};

/// Generates a surrogate id from the OS entropy source
///
/// # Examples
///
/// ```
/// use idfactor::core::surrogate::new_id;
///
/// let id = new_id().unwrap();
/// assert_eq!(id.as_uuid().get_version_num(), 4);
/// ```
pub fn new_id() -> Result<SurrogateId> {
    new_id_with(&mut SecureRng::os())
}

/// Generates a surrogate id from the given source
pub fn new_id_with<R: RngCore + CryptoRng>(rng: &mut SecureRng<R>) -> Result<SurrogateId> {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes)?;
    Ok(SurrogateId::from_random_bytes(bytes))
}
