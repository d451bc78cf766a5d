use relmap_core::{
    driver::{Bind, ResultSet, Row},
    stmt::{Value, WireType},
    Error, Result,
};
use rusqlite::types::Value as SqlValue;
use std::collections::VecDeque;

/// Positional parameters collected before execution.
#[derive(Debug, Default, Clone)]
pub(crate) struct Params(pub(crate) Vec<SqlValue>);

impl Params {
    fn set(&mut self, index: usize, value: SqlValue) -> Result<()> {
        if self.0.len() <= index {
            self.0.resize(index + 1, SqlValue::Null);
        }
        self.0[index] = value;
        Ok(())
    }
}

impl Bind for Params {
    fn bind_null(&mut self, index: usize, _: WireType) -> Result<()> {
        self.set(index, SqlValue::Null)
    }

    fn bind_bool(&mut self, index: usize, value: bool) -> Result<()> {
        self.set(index, SqlValue::Integer(value as i64))
    }

    fn bind_i16(&mut self, index: usize, value: i16) -> Result<()> {
        self.set(index, SqlValue::Integer(value.into()))
    }

    fn bind_i32(&mut self, index: usize, value: i32) -> Result<()> {
        self.set(index, SqlValue::Integer(value.into()))
    }

    fn bind_i64(&mut self, index: usize, value: i64) -> Result<()> {
        self.set(index, SqlValue::Integer(value))
    }

    fn bind_f32(&mut self, index: usize, value: f32) -> Result<()> {
        self.set(index, SqlValue::Real(value.into()))
    }

    fn bind_f64(&mut self, index: usize, value: f64) -> Result<()> {
        self.set(index, SqlValue::Real(value))
    }

    fn bind_text(&mut self, index: usize, value: &str) -> Result<()> {
        self.set(index, SqlValue::Text(value.to_string()))
    }

    fn bind_bytes(&mut self, index: usize, value: &[u8]) -> Result<()> {
        self.set(index, SqlValue::Blob(value.to_vec()))
    }
}

/// One fetched row.
#[derive(Debug, Clone)]
pub(crate) struct SqliteRow(pub(crate) Vec<SqlValue>);

impl SqliteRow {
    fn value(&self, index: usize) -> Result<&SqlValue> {
        self.0.get(index).ok_or_else(|| {
            relmap_core::err!(
                "column index {index} out of range for a row of {} columns",
                self.0.len()
            )
        })
    }

    fn integer<T: TryFrom<i64>>(&self, index: usize, ty: &'static str) -> Result<Option<T>> {
        match self.value(index)? {
            SqlValue::Null => Ok(None),
            SqlValue::Integer(v) => T::try_from(*v)
                .map(Some)
                .map_err(|_| Error::type_conversion(Value::I64(*v), ty)),
            other => Err(mismatch(other, ty)),
        }
    }
}

impl Row for SqliteRow {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn get_bool(&self, index: usize) -> Result<Option<bool>> {
        match self.value(index)? {
            SqlValue::Null => Ok(None),
            SqlValue::Integer(v) => Ok(Some(*v != 0)),
            other => Err(mismatch(other, "bool")),
        }
    }

    fn get_i16(&self, index: usize) -> Result<Option<i16>> {
        self.integer(index, "i16")
    }

    fn get_i32(&self, index: usize) -> Result<Option<i32>> {
        self.integer(index, "i32")
    }

    fn get_i64(&self, index: usize) -> Result<Option<i64>> {
        self.integer(index, "i64")
    }

    fn get_f32(&self, index: usize) -> Result<Option<f32>> {
        Ok(self.get_f64(index)?.map(|v| v as f32))
    }

    fn get_f64(&self, index: usize) -> Result<Option<f64>> {
        match self.value(index)? {
            SqlValue::Null => Ok(None),
            SqlValue::Real(v) => Ok(Some(*v)),
            SqlValue::Integer(v) => Ok(Some(*v as f64)),
            other => Err(mismatch(other, "f64")),
        }
    }

    fn get_text(&self, index: usize) -> Result<Option<String>> {
        match self.value(index)? {
            SqlValue::Null => Ok(None),
            SqlValue::Text(v) => Ok(Some(v.clone())),
            other => Err(mismatch(other, "String")),
        }
    }

    fn get_bytes(&self, index: usize) -> Result<Option<Vec<u8>>> {
        match self.value(index)? {
            SqlValue::Null => Ok(None),
            SqlValue::Blob(v) => Ok(Some(v.clone())),
            SqlValue::Text(v) => Ok(Some(v.clone().into_bytes())),
            other => Err(mismatch(other, "Vec<u8>")),
        }
    }
}

fn mismatch(value: &SqlValue, ty: &'static str) -> Error {
    let value = match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(v) => Value::I64(*v),
        SqlValue::Real(v) => Value::F64(*v),
        SqlValue::Text(v) => Value::String(v.clone()),
        SqlValue::Blob(v) => Value::Bytes(v.clone()),
    };
    Error::type_conversion(value, ty)
}

/// A fully fetched result set.
#[derive(Debug)]
pub(crate) struct Rows {
    columns: Vec<String>,
    rows: VecDeque<SqliteRow>,
    current: Option<SqliteRow>,
}

impl Rows {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<SqliteRow>) -> Self {
        Self {
            columns,
            rows: rows.into(),
            current: None,
        }
    }
}

impl ResultSet for Rows {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn next(&mut self) -> Result<Option<&dyn Row>> {
        self.current = self.rows.pop_front();
        Ok(self.current.as_ref().map(|row| row as &dyn Row))
    }
}
