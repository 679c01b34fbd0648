//! SQL endpoint port.

use crate::error::ApiError;

/// Read-only scalar access to the SQL analytics endpoint.
///
/// Validation only ever asks for a single number (a count or a probe),
/// so that is the whole port.
pub trait SqlEndpoint {
    /// Run `sql` and return the first column of the first row as an integer.
    fn query_scalar(&self, sql: &str) -> Result<i64, ApiError>;
}
