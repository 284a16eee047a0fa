//! Result type alias for idfactor

use super::errors::IdFactorError;

/// Result type alias for idfactor operations
///
/// # Examples
///
/// ```
/// use idfactor::domain::result::Result;
/// use idfactor::domain::errors::IdFactorError;
///
/// fn failing_function() -> Result<()> {
///     Err(IdFactorError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, IdFactorError>;
