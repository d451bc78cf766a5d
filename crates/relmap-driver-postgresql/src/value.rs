use postgres::types::{accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type};
use relmap_core::{
    driver::{Bind, ResultSet, Row},
    stmt::{Value as CoreValue, WireType},
    Error, Result,
};
use std::collections::VecDeque;

/// A bound parameter, converted to the column type PostgreSQL inferred for it.
#[derive(Debug, Clone)]
pub(crate) enum Value {
    Null(WireType),
    Bool(bool),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Text(String),
    Bytes(Vec<u8>),
}

type BoxError = Box<dyn std::error::Error + Sync + Send>;

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError>
    where
        Self: Sized,
    {
        match self {
            Value::Null(_) => Ok(IsNull::Yes),
            Value::Bool(value) => value.to_sql_checked(ty, out),
            Value::I16(value) => match *ty {
                Type::INT4 => i32::from(*value).to_sql(ty, out),
                Type::INT8 => i64::from(*value).to_sql(ty, out),
                _ => value.to_sql_checked(ty, out),
            },
            Value::I32(value) => match *ty {
                Type::INT2 => i16::try_from(*value)?.to_sql(ty, out),
                Type::INT8 => i64::from(*value).to_sql(ty, out),
                _ => value.to_sql_checked(ty, out),
            },
            Value::I64(value) => match *ty {
                Type::INT2 => i16::try_from(*value)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*value)?.to_sql(ty, out),
                _ => value.to_sql_checked(ty, out),
            },
            Value::F32(value) => match *ty {
                Type::FLOAT8 => f64::from(*value).to_sql(ty, out),
                _ => value.to_sql_checked(ty, out),
            },
            Value::F64(value) => value.to_sql_checked(ty, out),
            Value::Text(value) => value.to_sql_checked(ty, out),
            Value::Bytes(value) => value.to_sql_checked(ty, out),
        }
    }

    accepts!(
        BOOL, INT2, INT4, INT8, FLOAT4, FLOAT8, TEXT, VARCHAR, BPCHAR, NAME, UNKNOWN, BYTEA
    );
    to_sql_checked!();
}

/// Positional parameters collected before execution.
#[derive(Debug, Default, Clone)]
pub(crate) struct Params(pub(crate) Vec<Value>);

impl Params {
    fn set(&mut self, index: usize, value: Value) -> Result<()> {
        if self.0.len() <= index {
            self.0.resize(index + 1, Value::Null(WireType::Text));
        }
        self.0[index] = value;
        Ok(())
    }

    pub(crate) fn as_args(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.0
            .iter()
            .map(|param| param as &(dyn ToSql + Sync))
            .collect()
    }
}

impl Bind for Params {
    fn bind_null(&mut self, index: usize, wire_type: WireType) -> Result<()> {
        self.set(index, Value::Null(wire_type))
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
        self.set(index, Value::Text(value.to_string()))
    }

    fn bind_bytes(&mut self, index: usize, value: &[u8]) -> Result<()> {
        self.set(index, Value::Bytes(value.to_vec()))
    }
}

/// One fetched row.
pub(crate) struct PgRow(postgres::Row);

impl PgRow {
    fn ty(&self, index: usize) -> Result<&Type> {
        self.0
            .columns()
            .get(index)
            .map(|column| column.type_())
            .ok_or_else(|| {
                relmap_core::err!(
                    "column index {index} out of range for a row of {} columns",
                    self.0.len()
                )
            })
    }

    fn get<'a, T: FromSql<'a>>(&'a self, index: usize) -> Result<Option<T>> {
        self.0
            .try_get::<_, Option<T>>(index)
            .map_err(Error::driver)
    }

    /// Reads any integer column as `i64`.
    fn integer(&self, index: usize) -> Result<Option<i64>> {
        match *self.ty(index)? {
            Type::INT2 => Ok(self.get::<i16>(index)?.map(i64::from)),
            Type::INT4 => Ok(self.get::<i32>(index)?.map(i64::from)),
            _ => self.get::<i64>(index),
        }
    }

    fn narrow<T: TryFrom<i64>>(&self, index: usize, ty: &'static str) -> Result<Option<T>> {
        self.integer(index)?
            .map(|value| {
                T::try_from(value).map_err(|_| Error::type_conversion(CoreValue::I64(value), ty))
            })
            .transpose()
    }
}

impl Row for PgRow {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn get_bool(&self, index: usize) -> Result<Option<bool>> {
        self.get(index)
    }

    fn get_i16(&self, index: usize) -> Result<Option<i16>> {
        self.narrow(index, "i16")
    }

    fn get_i32(&self, index: usize) -> Result<Option<i32>> {
        self.narrow(index, "i32")
    }

    fn get_i64(&self, index: usize) -> Result<Option<i64>> {
        self.integer(index)
    }

    fn get_f32(&self, index: usize) -> Result<Option<f32>> {
        match *self.ty(index)? {
            Type::FLOAT8 => Ok(self.get::<f64>(index)?.map(|value| value as f32)),
            _ => self.get(index),
        }
    }

    fn get_f64(&self, index: usize) -> Result<Option<f64>> {
        match *self.ty(index)? {
            Type::FLOAT4 => Ok(self.get::<f32>(index)?.map(f64::from)),
            _ => self.get(index),
        }
    }

    fn get_text(&self, index: usize) -> Result<Option<String>> {
        self.get(index)
    }

    fn get_bytes(&self, index: usize) -> Result<Option<Vec<u8>>> {
        self.get(index)
    }
}

/// A fully fetched result set.
pub(crate) struct Rows {
    columns: Vec<String>,
    rows: VecDeque<PgRow>,
    current: Option<PgRow>,
}

impl Rows {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<postgres::Row>) -> Self {
        Self {
            columns,
            rows: rows.into_iter().map(PgRow).collect(),
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
