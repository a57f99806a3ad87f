//! Result type alias for PALoSA

use super::errors::PalosaError;

/// Result type alias for PALoSA operations
///
/// # Examples
///
/// ```
/// use palosa::domain::result::Result;
/// use palosa::domain::errors::PalosaError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(PalosaError::UnknownConfigType("yaml".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, PalosaError>;
