mod prepared;
use prepared::Prepared;

use relmap_core::{
    driver::{Capability, ResultSet, Row, Statement},
    stmt::{BatchQuery, Query, QueryParameter},
    Connection, Error, Result,
};
use std::sync::Arc;

/// Number of rows bound into a single batch execution.
pub const BATCH_CHUNK_SIZE: usize = 1000;

/// Rewrites a parameter just before it is bound.
pub type PreEncode = Arc<dyn Fn(&mut QueryParameter) + Send + Sync>;

/// Executes [`Query`] values on one connection.
///
/// Every call prepares its own statement and releases it before returning, on
/// success and on failure alike. Statements never overlap on the connection.
pub struct Driver<'a> {
    connection: &'a mut dyn Connection,
    pre_encode: Option<PreEncode>,
}

impl<'a> Driver<'a> {
    pub fn new(connection: &'a mut dyn Connection) -> Self {
        Self {
            connection,
            pre_encode: None,
        }
    }

    /// Installs a hook that sees every parameter before it is encoded.
    pub fn with_pre_encode(
        mut self,
        hook: impl Fn(&mut QueryParameter) + Send + Sync + 'static,
    ) -> Self {
        self.pre_encode = Some(Arc::new(hook));
        self
    }

    pub fn capability(&self) -> &'static Capability {
        self.connection.capability()
    }

    /// Executes a statement that returns no rows, returning the affected row count.
    pub fn update(&mut self, query: &Query) -> Result<u64> {
        log_query(query);

        let mut statement = prepare(&mut *self.connection, &query.sql, false)?;
        bind(&mut *statement, &query.params, self.pre_encode.as_ref())
            .and_then(|_| statement.execute_update())
            .map_err(|err| err.context(Error::query_execution(&query.sql)))
    }

    /// Executes a query and hands its result set to `decode`.
    pub fn query<T>(
        &mut self,
        query: &Query,
        decode: impl FnOnce(&mut dyn ResultSet) -> Result<T>,
    ) -> Result<T> {
        log_query(query);

        let mut statement = prepare(&mut *self.connection, &query.sql, false)?;
        bind(&mut *statement, &query.params, self.pre_encode.as_ref())
            .map_err(|err| err.context(Error::query_execution(&query.sql)))?;

        let mut results = statement
            .execute_query()
            .map_err(|err| err.context(Error::query_execution(&query.sql)))?;
        decode(&mut *results)
    }

    /// Executes a query, decoding every row with `decode`.
    pub fn query_rows<T>(
        &mut self,
        query: &Query,
        mut decode: impl FnMut(&dyn Row) -> Result<T>,
    ) -> Result<Vec<T>> {
        self.query(query, |results| {
            let mut rows = vec![];
            while let Some(row) = results.next()? {
                rows.push(decode(row)?);
            }
            Ok(rows)
        })
    }

    /// Executes an insert and returns the key generated for the new row.
    ///
    /// The connection's native key retrieval is tried first; when it is not
    /// supported or reports nothing, `fallback` runs once on the same connection
    /// and its first row is decoded instead. Returns `Ok(None)` when the insert
    /// affected no rows.
    pub fn insert<K>(
        &mut self,
        query: &Query,
        fallback: &Query,
        decode: impl FnMut(&dyn Row) -> Result<K>,
    ) -> Result<Option<K>> {
        let native = self.capability().generated_keys;
        self.insert_with_keys(query, fallback, native, decode)
    }

    /// Like [`Driver::insert`], but always reads the key with `key_query`.
    ///
    /// Used for keys that are not reported by native key retrieval, such as
    /// database-generated UUIDs.
    pub fn insert_with_key_query<K>(
        &mut self,
        query: &Query,
        key_query: &Query,
        decode: impl FnMut(&dyn Row) -> Result<K>,
    ) -> Result<Option<K>> {
        self.insert_with_keys(query, key_query, false, decode)
    }

    fn insert_with_keys<K>(
        &mut self,
        query: &Query,
        fallback: &Query,
        native: bool,
        mut decode: impl FnMut(&dyn Row) -> Result<K>,
    ) -> Result<Option<K>> {
        log_query(query);

        {
            let mut statement = prepare(&mut *self.connection, &query.sql, native)?;
            let count = bind(&mut *statement, &query.params, self.pre_encode.as_ref())
                .and_then(|_| statement.execute_update())
                .map_err(|err| err.context(Error::query_execution(&query.sql)))?;

            if count == 0 {
                return Ok(None);
            }

            if native {
                match statement.generated_keys() {
                    Ok(Some(mut keys)) => match keys.next() {
                        Ok(Some(row)) => return decode(row).map(Some),
                        Ok(None) => log::warn!("no generated keys reported; sql={}", query.sql),
                        Err(err) => {
                            log::warn!("failed to read generated keys; sql={}; err={err}", query.sql)
                        }
                    },
                    Ok(None) => log::warn!("no generated keys reported; sql={}", query.sql),
                    Err(err) => {
                        log::warn!("failed to read generated keys; sql={}; err={err}", query.sql)
                    }
                }
            }
        }

        let key = self.query(fallback, |results| match results.next()? {
            Some(row) => decode(row).map(Some),
            None => Ok(None),
        });

        match key {
            Ok(Some(key)) => Ok(Some(key)),
            Ok(None) => Err(Error::identifier_retrieval(&query.sql)),
            Err(err) => Err(err.context(Error::identifier_retrieval(&query.sql))),
        }
    }

    /// Executes every row of `batch`, [`BATCH_CHUNK_SIZE`] rows per round trip,
    /// returning the total affected row count.
    pub fn batch(&mut self, batch: &BatchQuery) -> Result<u64> {
        if batch.is_empty() {
            return Ok(0);
        }

        log::debug!(
            "{}; rows={}",
            collapse_whitespace(&batch.sql),
            batch.value_matrix.len()
        );

        let mut statement = prepare(&mut *self.connection, &batch.sql, false)?;
        let mut total = 0;

        for (index, chunk) in batch.value_matrix.chunks(BATCH_CHUNK_SIZE).enumerate() {
            log::trace!("batch chunk; index={index}; rows={}", chunk.len());

            let counts = chunk
                .iter()
                .try_for_each(|params| {
                    bind(&mut *statement, params, self.pre_encode.as_ref())?;
                    statement.add_batch()
                })
                .and_then(|_| statement.execute_batch())
                .map_err(|err| err.context(Error::query_execution(&batch.sql)))?;

            total += counts.iter().sum::<u64>();
        }

        Ok(total)
    }

    /// Executes a statement that may yield several results, handing each result set
    /// to `decode` with its ordinal.
    ///
    /// Update counts between result sets are skipped and do not advance the ordinal.
    pub fn execute<T>(
        &mut self,
        query: &Query,
        decode: impl FnMut(usize, &mut dyn ResultSet) -> Result<T>,
    ) -> Result<Vec<T>> {
        self.multi(query, false, decode)
    }

    /// Calls a stored procedure; see [`Driver::execute`].
    pub fn call<T>(
        &mut self,
        query: &Query,
        decode: impl FnMut(usize, &mut dyn ResultSet) -> Result<T>,
    ) -> Result<Vec<T>> {
        self.multi(query, true, decode)
    }

    fn multi<T>(
        &mut self,
        query: &Query,
        call: bool,
        mut decode: impl FnMut(usize, &mut dyn ResultSet) -> Result<T>,
    ) -> Result<Vec<T>> {
        log_query(query);

        let statement = if call {
            self.connection.prepare_call(&query.sql)
        } else {
            self.connection.prepare(&query.sql, false)
        };
        let mut statement = Prepared::new(
            statement.map_err(|err| err.context(Error::query_execution(&query.sql)))?,
        );

        let failed = |err: Error| err.context(Error::query_execution(&query.sql));

        bind(&mut *statement, &query.params, self.pre_encode.as_ref()).map_err(failed)?;
        let mut is_result_set = statement.execute().map_err(failed)?;

        let mut outputs = vec![];
        loop {
            if is_result_set {
                let Some(mut results) = statement.result_set().map_err(failed)? else {
                    break;
                };
                outputs.push(decode(outputs.len(), &mut *results)?);
            } else if statement.update_count().map_err(failed)?.is_none() {
                break;
            }

            is_result_set = statement.more_results().map_err(failed)?;
        }

        Ok(outputs)
    }
}

impl core::fmt::Debug for Driver<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("Driver")
            .field("capability", self.connection.capability())
            .field("pre_encode", &self.pre_encode.is_some())
            .finish()
    }
}

fn prepare<'c>(connection: &'c mut dyn Connection, sql: &str, keys: bool) -> Result<Prepared<'c>> {
    connection
        .prepare(sql, keys)
        .map(Prepared::new)
        .map_err(|err| err.context(Error::query_execution(sql)))
}

fn bind(
    statement: &mut dyn Statement,
    params: &[QueryParameter],
    pre_encode: Option<&PreEncode>,
) -> Result<()> {
    statement.clear_params()?;

    for (index, param) in params.iter().enumerate() {
        match pre_encode {
            Some(hook) => {
                let mut param = param.clone();
                hook(&mut param);
                encode(statement, index, &param)?;
            }
            None => encode(statement, index, param)?,
        }
    }

    Ok(())
}

fn encode(statement: &mut dyn Statement, index: usize, param: &QueryParameter) -> Result<()> {
    if param.value.is_null() {
        statement.params().bind_null(index, param.wire_type)
    } else {
        (param.encoder)(statement.params(), index, &param.value)
            .map_err(|err| err.context(relmap_core::err!("binding parameter `{}`", param.name)))
    }
}

fn log_query(query: &Query) {
    if log::log_enabled!(log::Level::Debug) {
        log::debug!("{}", collapse_whitespace(&query.interpolated()));
    }
}

fn collapse_whitespace(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}
