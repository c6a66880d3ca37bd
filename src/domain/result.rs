//! Result type alias for stockfeed

use super::errors::StockfeedError;

/// Result type alias for stockfeed operations
///
/// # Examples
///
/// ```
/// use stockfeed::domain::result::Result;
/// use stockfeed::domain::errors::StockfeedError;
///
/// fn failing_function() -> Result<()> {
///     Err(StockfeedError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, StockfeedError>;
