use super::Error;

/// Error when preparing, binding or executing a statement fails.
#[derive(Debug)]
pub(super) struct QueryExecutionError {
    sql: Box<str>,
}

impl std::error::Error for QueryExecutionError {}

impl core::fmt::Display for QueryExecutionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "query failed `{}`", self.sql)
    }
}

impl Error {
    /// Creates a query execution error for the given statement text.
    pub fn query_execution(sql: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::QueryExecution(QueryExecutionError {
            sql: sql.into().into(),
        }))
    }

    /// Returns `true` if this error is a query execution error.
    pub fn is_query_execution(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::QueryExecution(_))
    }
}
