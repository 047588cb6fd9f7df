//! Result type alias for Anonymap

use super::errors::AnonymapError;

/// Result type alias for Anonymap operations
///
/// # Examples
///
/// ```
/// use anonymap::domain::result::Result;
/// use anonymap::domain::errors::AnonymapError;
///
/// fn failing_function() -> Result<()> {
///     Err(AnonymapError::EmptyInput)
/// }
/// ```
pub type Result<T> = std::result::Result<T, AnonymapError>;
