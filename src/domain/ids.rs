//! Domain identifier types
//!
//! Newtype wrappers keep surrogate identifiers from being mixed up with the
//! record identifiers they stand in for.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Surrogate identifier assigned to a single emitted fragment
///
/// Always an RFC 4122 version 4 UUID, rendered in canonical lowercase
/// hyphenated form.
///
/// # Examples
///
/// ```
/// use idfactor::domain::ids::SurrogateId;
///
/// let id = SurrogateId::from_random_bytes([0xff; 16]);
/// assert_eq!(id.to_string(), "ffffffff-ffff-4fff-bfff-ffffffffffff");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurrogateId(Uuid);

impl SurrogateId {
    /// Builds a surrogate id from 16 random bytes, forcing the version and
    /// variant bits
    pub fn from_random_bytes(bytes: [u8; 16]) -> Self {
        Self(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }

    /// Returns the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SurrogateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for SurrogateId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::parse_str(s).map_err(|e| format!("Invalid surrogate id '{s}': {e}"))?;
        if uuid.get_version_num() != 4 {
            return Err(format!("Surrogate id '{s}' is not a version 4 UUID"));
        }
        Ok(Self(uuid))
    }
}
