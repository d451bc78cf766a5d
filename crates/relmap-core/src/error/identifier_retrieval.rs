use super::Error;

/// Error when an insert succeeded but neither the driver's generated keys nor the
/// fallback query produced the new row's identifier.
#[derive(Debug)]
pub(super) struct IdentifierRetrievalError {
    sql: Box<str>,
}

impl std::error::Error for IdentifierRetrievalError {}

impl core::fmt::Display for IdentifierRetrievalError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "cannot retrieve generated identifier for `{}`", self.sql)
    }
}

impl Error {
    /// Creates an identifier retrieval error for the given insert statement.
    pub fn identifier_retrieval(sql: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::IdentifierRetrieval(
            IdentifierRetrievalError {
                sql: sql.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an identifier retrieval error.
    pub fn is_identifier_retrieval(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::IdentifierRetrieval(_))
    }
}
