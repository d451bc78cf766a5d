use crate::{ExecLog, Op};
use relmap_core::{
    driver::{Bind, Capability, ResultSet, Statement},
    Connection, Result,
};

/// A connection wrapper that logs all statements for testing purposes.
pub struct LoggingConnection {
    /// The underlying connection that actually executes statements
    inner: Box<dyn Connection>,

    log: ExecLog,
}

impl LoggingConnection {
    pub fn new(inner: Box<dyn Connection>) -> (Self, ExecLog) {
        let log = ExecLog::default();
        let connection = Self {
            inner,
            log: log.clone(),
        };
        (connection, log)
    }
}

impl Connection for LoggingConnection {
    fn capability(&self) -> &'static Capability {
        self.inner.capability()
    }

    fn prepare<'a>(&'a mut self, sql: &str, generated_keys: bool) -> Result<Box<dyn Statement + 'a>> {
        self.log.push(Op::Prepare {
            sql: sql.to_string(),
            generated_keys,
        });
        let inner = self.inner.prepare(sql, generated_keys)?;
        Ok(Box::new(LoggingStatement::new(inner, sql, self.log.clone())))
    }

    fn prepare_call<'a>(&'a mut self, sql: &str) -> Result<Box<dyn Statement + 'a>> {
        self.log.push(Op::PrepareCall {
            sql: sql.to_string(),
        });
        let inner = self.inner.prepare_call(sql)?;
        Ok(Box::new(LoggingStatement::new(inner, sql, self.log.clone())))
    }
}

/// Records batch executions and the release of the wrapped statement.
struct LoggingStatement<'a> {
    inner: Box<dyn Statement + 'a>,
    sql: String,
    log: ExecLog,
    queued: usize,
}

impl<'a> LoggingStatement<'a> {
    fn new(inner: Box<dyn Statement + 'a>, sql: &str, log: ExecLog) -> Self {
        Self {
            inner,
            sql: sql.to_string(),
            log,
            queued: 0,
        }
    }
}

impl Statement for LoggingStatement<'_> {
    fn params(&mut self) -> &mut dyn Bind {
        self.inner.params()
    }

    fn clear_params(&mut self) -> Result<()> {
        self.inner.clear_params()
    }

    fn execute_update(&mut self) -> Result<u64> {
        self.inner.execute_update()
    }

    fn execute_query(&mut self) -> Result<Box<dyn ResultSet + '_>> {
        self.inner.execute_query()
    }

    fn add_batch(&mut self) -> Result<()> {
        self.queued += 1;
        self.inner.add_batch()
    }

    fn execute_batch(&mut self) -> Result<Vec<u64>> {
        self.log.push(Op::Batch {
            sql: self.sql.clone(),
            rows: std::mem::take(&mut self.queued),
        });
        self.inner.execute_batch()
    }

    fn generated_keys(&mut self) -> Result<Option<Box<dyn ResultSet + '_>>> {
        self.inner.generated_keys()
    }

    fn execute(&mut self) -> Result<bool> {
        self.inner.execute()
    }

    fn result_set(&mut self) -> Result<Option<Box<dyn ResultSet + '_>>> {
        self.inner.result_set()
    }

    fn update_count(&mut self) -> Result<Option<u64>> {
        self.inner.update_count()
    }

    fn more_results(&mut self) -> Result<bool> {
        self.inner.more_results()
    }

    fn close(&mut self) -> Result<()> {
        self.log.push(Op::Close {
            sql: self.sql.clone(),
        });
        self.inner.close()
    }
}
