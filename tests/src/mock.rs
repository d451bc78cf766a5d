use crate::{ExecLog, Op};
use relmap_core::{
    driver::{Bind, Capability, ResultSet, Row, Statement},
    schema::Field,
    stmt::{Value, WireType},
    Connection, Error, Result,
};
use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

/// One result of a scripted multi-result execution.
#[derive(Debug, Clone)]
pub enum MockResult {
    Rows(Vec<String>, Vec<Vec<Value>>),
    Count(u64),
}

impl MockResult {
    pub fn rows(columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        MockResult::Rows(columns.iter().map(|c| c.to_string()).collect(), rows)
    }
}

#[derive(Debug, Clone, Default)]
struct Script {
    update_count: u64,
    generated_keys: Option<Vec<Value>>,
    rows: Option<(Vec<String>, Vec<Vec<Value>>)>,
    results: Vec<MockResult>,
    error: Option<String>,
    succeed: usize,
}

/// A connection answering each statement from a script keyed by its SQL.
///
/// Preparing a statement without a script fails.
#[derive(Debug)]
pub struct MockConnection {
    capability: &'static Capability,
    scripts: HashMap<String, Script>,
    log: ExecLog,
    bound: Arc<Mutex<Vec<Vec<Value>>>>,
}

impl MockConnection {
    pub fn new(capability: &'static Capability) -> (Self, ExecLog) {
        let log = ExecLog::default();
        let connection = Self {
            capability,
            scripts: HashMap::new(),
            log: log.clone(),
            bound: Arc::default(),
        };
        (connection, log)
    }

    fn script(&mut self, sql: &str) -> &mut Script {
        self.scripts.entry(sql.to_string()).or_default()
    }

    /// `sql` affects `count` rows per execution.
    pub fn on_update(mut self, sql: &str, count: u64) -> Self {
        self.script(sql).update_count = count;
        self
    }

    /// `sql` reports `keys` through native key retrieval.
    pub fn with_generated_keys(mut self, sql: &str, keys: Vec<Value>) -> Self {
        self.script(sql).generated_keys = Some(keys);
        self
    }

    pub fn on_query(mut self, sql: &str, columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        let columns = columns.iter().map(|c| c.to_string()).collect();
        self.script(sql).rows = Some((columns, rows));
        self
    }

    pub fn on_execute(mut self, sql: &str, results: Vec<MockResult>) -> Self {
        self.script(sql).results = results;
        self
    }

    /// Every execution of `sql` fails with a driver error.
    pub fn failing(self, sql: &str, message: &str) -> Self {
        self.failing_after(sql, 0, message)
    }

    /// A prepared `sql` runs `rows` parameter sets, then fails with a driver error.
    pub fn failing_after(mut self, sql: &str, rows: usize, message: &str) -> Self {
        let script = self.script(sql);
        script.error = Some(message.to_string());
        script.succeed = rows;
        self
    }

    /// Parameters of every execution, oldest first.
    pub fn bound(&self) -> Arc<Mutex<Vec<Vec<Value>>>> {
        self.bound.clone()
    }

    fn statement(&mut self, sql: &str) -> Result<Box<dyn Statement + '_>> {
        let Some(script) = self.scripts.get(sql) else {
            relmap_core::bail!("unexpected statement `{sql}`");
        };

        Ok(Box::new(MockStatement {
            sql: sql.to_string(),
            script,
            log: self.log.clone(),
            executed: 0,
            params: MockParams::default(),
            batch: vec![],
            bound: self.bound.clone(),
            inserted: false,
            results: VecDeque::new(),
            current: None,
        }))
    }
}

impl Connection for MockConnection {
    fn capability(&self) -> &'static Capability {
        self.capability
    }

    fn prepare<'a>(&'a mut self, sql: &str, generated_keys: bool) -> Result<Box<dyn Statement + 'a>> {
        self.log.push(Op::Prepare {
            sql: sql.to_string(),
            generated_keys,
        });
        self.statement(sql)
    }

    fn prepare_call<'a>(&'a mut self, sql: &str) -> Result<Box<dyn Statement + 'a>> {
        self.log.push(Op::PrepareCall {
            sql: sql.to_string(),
        });
        self.statement(sql)
    }
}

#[derive(Debug, Default, Clone)]
struct MockParams(Vec<Value>);

impl MockParams {
    fn set(&mut self, index: usize, value: Value) -> Result<()> {
        if self.0.len() <= index {
            self.0.resize(index + 1, Value::Null);
        }
        self.0[index] = value;
        Ok(())
    }
}

impl Bind for MockParams {
    fn bind_null(&mut self, index: usize, _: WireType) -> Result<()> {
        self.set(index, Value::Null)
    }

    fn bind_bool(&mut self, index: usize, value: bool) -> Result<()> {
        self.set(index, Value::Bool(value))
    }

    fn bind_i16(&mut self, index: usize, value: i16) -> Result<()> {
        self.set(index, Value::I16(value))
    }

    fn bind_i32(&mut self, index: usize, value: i32) -> Result<()> {
        self.set(index, Value::I32(value))
    }

    fn bind_i64(&mut self, index: usize, value: i64) -> Result<()> {
        self.set(index, Value::I64(value))
    }

    fn bind_f32(&mut self, index: usize, value: f32) -> Result<()> {
        self.set(index, Value::F32(value))
    }

    fn bind_f64(&mut self, index: usize, value: f64) -> Result<()> {
        self.set(index, Value::F64(value))
    }

    fn bind_text(&mut self, index: usize, value: &str) -> Result<()> {
        self.set(index, Value::String(value.to_string()))
    }

    fn bind_bytes(&mut self, index: usize, value: &[u8]) -> Result<()> {
        self.set(index, Value::Bytes(value.to_vec()))
    }
}

struct MockStatement<'a> {
    sql: String,
    script: &'a Script,
    log: ExecLog,
    executed: usize,
    params: MockParams,
    batch: Vec<MockParams>,
    bound: Arc<Mutex<Vec<Vec<Value>>>>,
    inserted: bool,
    results: VecDeque<MockResult>,
    current: Option<MockResult>,
}

impl MockStatement<'_> {
    fn run(&mut self, params: MockParams) -> Result<u64> {
        if let Some(message) = &self.script.error {
            if self.executed >= self.script.succeed {
                return Err(Error::driver(std::io::Error::other(message.clone())));
            }
        }
        self.executed += 1;
        self.bound.lock().unwrap().push(params.0);
        Ok(self.script.update_count)
    }
}

impl Statement for MockStatement<'_> {
    fn params(&mut self) -> &mut dyn Bind {
        &mut self.params
    }

    fn clear_params(&mut self) -> Result<()> {
        self.params.0.clear();
        Ok(())
    }

    fn execute_update(&mut self) -> Result<u64> {
        let count = self.run(self.params.clone())?;
        self.inserted = true;
        Ok(count)
    }

    fn execute_query(&mut self) -> Result<Box<dyn ResultSet + '_>> {
        self.run(self.params.clone())?;
        let (columns, rows) = self.script.rows.clone().unwrap_or_default();
        Ok(Box::new(MockRows::new(columns, rows)))
    }

    fn add_batch(&mut self) -> Result<()> {
        self.batch.push(self.params.clone());
        Ok(())
    }

    fn execute_batch(&mut self) -> Result<Vec<u64>> {
        std::mem::take(&mut self.batch)
            .into_iter()
            .map(|params| self.run(params))
            .collect()
    }

    fn generated_keys(&mut self) -> Result<Option<Box<dyn ResultSet + '_>>> {
        match &self.script.generated_keys {
            Some(keys) if self.inserted => {
                let rows = keys.iter().map(|key| vec![key.clone()]).collect();
                Ok(Some(Box::new(MockRows::new(
                    vec!["GENERATED_KEY".to_string()],
                    rows,
                ))))
            }
            _ => Ok(None),
        }
    }

    fn execute(&mut self) -> Result<bool> {
        self.run(self.params.clone())?;
        self.results = self.script.results.iter().cloned().collect();
        self.more_results()
    }

    fn result_set(&mut self) -> Result<Option<Box<dyn ResultSet + '_>>> {
        match self.current.take() {
            Some(MockResult::Rows(columns, rows)) => Ok(Some(Box::new(MockRows::new(columns, rows)))),
            current => {
                self.current = current;
                Ok(None)
            }
        }
    }

    fn update_count(&mut self) -> Result<Option<u64>> {
        match self.current {
            Some(MockResult::Count(count)) => Ok(Some(count)),
            _ => Ok(None),
        }
    }

    fn more_results(&mut self) -> Result<bool> {
        self.current = self.results.pop_front();
        Ok(matches!(self.current, Some(MockResult::Rows(..))))
    }

    fn close(&mut self) -> Result<()> {
        self.log.push(Op::Close {
            sql: self.sql.clone(),
        });
        Ok(())
    }
}

struct MockRows {
    columns: Vec<String>,
    rows: VecDeque<MockRow>,
    current: Option<MockRow>,
}

impl MockRows {
    fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns,
            rows: rows.into_iter().map(MockRow).collect(),
            current: None,
        }
    }
}

impl ResultSet for MockRows {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn next(&mut self) -> Result<Option<&dyn Row>> {
        self.current = self.rows.pop_front();
        Ok(self.current.as_ref().map(|row| row as &dyn Row))
    }
}

struct MockRow(Vec<Value>);

impl MockRow {
    fn get<T: Field>(&self, index: usize) -> Result<Option<T>> {
        match self.0.get(index) {
            Some(value) => <Option<T>>::from_value(value.clone()),
            None => relmap_core::bail!("no column at index {index}"),
        }
    }
}

impl Row for MockRow {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn get_bool(&self, index: usize) -> Result<Option<bool>> {
        self.get(index)
    }

    fn get_i16(&self, index: usize) -> Result<Option<i16>> {
        self.get(index)
    }

    fn get_i32(&self, index: usize) -> Result<Option<i32>> {
        self.get(index)
    }

    fn get_i64(&self, index: usize) -> Result<Option<i64>> {
        self.get(index)
    }

    fn get_f32(&self, index: usize) -> Result<Option<f32>> {
        self.get(index)
    }

    fn get_f64(&self, index: usize) -> Result<Option<f64>> {
        self.get(index)
    }

    fn get_text(&self, index: usize) -> Result<Option<String>> {
        self.get(index)
    }

    fn get_bytes(&self, index: usize) -> Result<Option<Vec<u8>>> {
        self.get(index)
    }
}
