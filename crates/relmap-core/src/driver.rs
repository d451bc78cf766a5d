mod capability;
pub use capability::Capability;

use crate::{stmt::WireType, Result};

/// Sink for positional statement parameters.
///
/// Indices are zero based. Type serializers' encoders call exactly one of the typed
/// setters for the value they are given.
pub trait Bind {
    fn bind_null(&mut self, index: usize, wire_type: WireType) -> Result<()>;

    fn bind_bool(&mut self, index: usize, value: bool) -> Result<()>;

    fn bind_i16(&mut self, index: usize, value: i16) -> Result<()>;

    fn bind_i32(&mut self, index: usize, value: i32) -> Result<()>;

    fn bind_i64(&mut self, index: usize, value: i64) -> Result<()>;

    fn bind_f32(&mut self, index: usize, value: f32) -> Result<()>;

    fn bind_f64(&mut self, index: usize, value: f64) -> Result<()>;

    fn bind_text(&mut self, index: usize, value: &str) -> Result<()>;

    fn bind_bytes(&mut self, index: usize, value: &[u8]) -> Result<()>;
}

/// A single row of a result set.
///
/// Getters return `Ok(None)` for SQL `NULL` and an error when the stored value cannot
/// be read as the requested type.
pub trait Row {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_bool(&self, index: usize) -> Result<Option<bool>>;

    fn get_i16(&self, index: usize) -> Result<Option<i16>>;

    fn get_i32(&self, index: usize) -> Result<Option<i32>>;

    fn get_i64(&self, index: usize) -> Result<Option<i64>>;

    fn get_f32(&self, index: usize) -> Result<Option<f32>>;

    fn get_f64(&self, index: usize) -> Result<Option<f64>>;

    fn get_text(&self, index: usize) -> Result<Option<String>>;

    fn get_bytes(&self, index: usize) -> Result<Option<Vec<u8>>>;
}

/// Cursor over the rows produced by a query.
pub trait ResultSet {
    /// Column labels, in select order.
    fn columns(&self) -> &[String];

    /// Advances to the next row.
    fn next(&mut self) -> Result<Option<&dyn Row>>;
}

/// A prepared statement.
///
/// Dropping the statement releases it; [`Statement::close`] does the same but reports
/// failures.
pub trait Statement {
    /// Parameter sink for the next execution.
    fn params(&mut self) -> &mut dyn Bind;

    fn clear_params(&mut self) -> Result<()>;

    /// Executes a statement that returns no rows, returning the affected row count.
    fn execute_update(&mut self) -> Result<u64>;

    fn execute_query(&mut self) -> Result<Box<dyn ResultSet + '_>>;

    /// Queues the currently bound parameters as one batch entry.
    fn add_batch(&mut self) -> Result<()>;

    /// Executes every queued entry, returning one update count per entry.
    fn execute_batch(&mut self) -> Result<Vec<u64>>;

    /// Keys generated by the last `execute_update`.
    ///
    /// `Ok(None)` when the statement was not prepared for key retrieval or the
    /// driver has nothing to report.
    fn generated_keys(&mut self) -> Result<Option<Box<dyn ResultSet + '_>>>;

    /// Executes a statement that may produce any mix of result sets and update counts.
    ///
    /// Returns `true` when the first result is a result set.
    fn execute(&mut self) -> Result<bool>;

    /// Takes the current result when it is a result set.
    fn result_set(&mut self) -> Result<Option<Box<dyn ResultSet + '_>>>;

    /// The current result's update count, `None` when it is a result set or when no
    /// results remain.
    fn update_count(&mut self) -> Result<Option<u64>>;

    /// Advances to the next result, returning `true` when it is a result set.
    fn more_results(&mut self) -> Result<bool>;

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A live database connection.
pub trait Connection {
    fn capability(&self) -> &'static Capability;

    /// Prepares `sql`, optionally asking the driver to track generated keys.
    fn prepare<'a>(&'a mut self, sql: &str, generated_keys: bool)
        -> Result<Box<dyn Statement + 'a>>;

    /// Prepares a stored procedure call.
    fn prepare_call<'a>(&'a mut self, sql: &str) -> Result<Box<dyn Statement + 'a>> {
        self.prepare(sql, false)
    }
}
