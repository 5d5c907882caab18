//! Result type alias for medsync
//!
//! This module provides a convenient Result type alias that uses MedsyncError
//! as the error type.

use super::errors::MedsyncError;

/// Result type alias for medsync operations
///
/// This is a convenience type alias that uses `MedsyncError` as the error
/// type. Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use medsync::domain::result::Result;
/// use medsync::domain::errors::MedsyncError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(MedsyncError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, MedsyncError>;
