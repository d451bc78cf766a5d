//! Built-in type serializers.
//!
//! [`basic`] covers every [`Field`](super::Field) type shipped with the crate;
//! [`postgresql`] is the same set with PostgreSQL column types. Tables and
//! schemas can register their own entries to override any of them, e.g. a
//! [`varchar`] with a specific width.

use super::TypeSerializer;
use crate::{
    driver::{Bind, Row},
    stmt::{Value, WireType},
    Error, Result,
};
use uuid::Uuid;

/// Every built-in serializer.
pub fn basic() -> Vec<TypeSerializer> {
    vec![
        boolean(),
        int16(),
        int32(),
        int64(),
        float32(),
        float64(),
        text(),
        bytes(),
        uuid(),
    ]
}

/// [`basic`] with the column types PostgreSQL spells differently.
pub fn postgresql() -> Vec<TypeSerializer> {
    basic()
        .into_iter()
        .map(|serializer| {
            if serializer.db_type == "BLOB" {
                serializer.with_db_type("BYTEA")
            } else {
                serializer
            }
        })
        .collect()
}

pub fn boolean() -> TypeSerializer {
    TypeSerializer::new::<bool>("BOOLEAN", WireType::Boolean, encode_bool, decode_bool)
}

pub fn int16() -> TypeSerializer {
    TypeSerializer::new::<i16>("SMALLINT", WireType::SmallInt, encode_i16, decode_i16)
}

pub fn int32() -> TypeSerializer {
    TypeSerializer::new::<i32>("INTEGER", WireType::Integer, encode_i32, decode_i32)
}

pub fn int64() -> TypeSerializer {
    TypeSerializer::new::<i64>("BIGINT", WireType::BigInt, encode_i64, decode_i64)
}

pub fn float32() -> TypeSerializer {
    TypeSerializer::new::<f32>("REAL", WireType::Real, encode_f32, decode_f32)
}

pub fn float64() -> TypeSerializer {
    TypeSerializer::new::<f64>(
        "DOUBLE PRECISION",
        WireType::Double,
        encode_f64,
        decode_f64,
    )
}

pub fn text() -> TypeSerializer {
    TypeSerializer::new::<String>("TEXT", WireType::Varchar, encode_text, decode_text)
}

/// `String` stored as `VARCHAR(width)`; binds exactly like [`text`].
pub fn varchar(width: usize) -> TypeSerializer {
    text().with_db_type(format!("VARCHAR({width})"))
}

pub fn bytes() -> TypeSerializer {
    TypeSerializer::new::<Vec<u8>>("BLOB", WireType::Blob, encode_bytes, decode_bytes)
}

/// UUIDs travel as their 36 character hyphenated text form.
pub fn uuid() -> TypeSerializer {
    TypeSerializer::new::<Uuid>("CHAR(36)", WireType::Char, encode_uuid, decode_uuid)
}

fn encode_bool(params: &mut dyn Bind, index: usize, value: &Value) -> Result<()> {
    params.bind_bool(index, value.clone().to_bool()?)
}

fn decode_bool(row: &dyn Row, index: usize) -> Result<Value> {
    Ok(Value::from(row.get_bool(index)?))
}

fn encode_i16(params: &mut dyn Bind, index: usize, value: &Value) -> Result<()> {
    params.bind_i16(index, value.clone().to_i16()?)
}

fn decode_i16(row: &dyn Row, index: usize) -> Result<Value> {
    Ok(Value::from(row.get_i16(index)?))
}

fn encode_i32(params: &mut dyn Bind, index: usize, value: &Value) -> Result<()> {
    params.bind_i32(index, value.clone().to_i32()?)
}

fn decode_i32(row: &dyn Row, index: usize) -> Result<Value> {
    Ok(Value::from(row.get_i32(index)?))
}

fn encode_i64(params: &mut dyn Bind, index: usize, value: &Value) -> Result<()> {
    params.bind_i64(index, value.clone().to_i64()?)
}

fn decode_i64(row: &dyn Row, index: usize) -> Result<Value> {
    Ok(Value::from(row.get_i64(index)?))
}

fn encode_f32(params: &mut dyn Bind, index: usize, value: &Value) -> Result<()> {
    params.bind_f32(index, value.clone().to_f32()?)
}

fn decode_f32(row: &dyn Row, index: usize) -> Result<Value> {
    Ok(Value::from(row.get_f32(index)?))
}

fn encode_f64(params: &mut dyn Bind, index: usize, value: &Value) -> Result<()> {
    params.bind_f64(index, value.clone().to_f64()?)
}

fn decode_f64(row: &dyn Row, index: usize) -> Result<Value> {
    Ok(Value::from(row.get_f64(index)?))
}

fn encode_text(params: &mut dyn Bind, index: usize, value: &Value) -> Result<()> {
    match value {
        Value::String(value) => params.bind_text(index, value),
        value => Err(Error::type_conversion(value.clone(), "String")),
    }
}

fn decode_text(row: &dyn Row, index: usize) -> Result<Value> {
    Ok(Value::from(row.get_text(index)?))
}

fn encode_bytes(params: &mut dyn Bind, index: usize, value: &Value) -> Result<()> {
    match value {
        Value::Bytes(value) => params.bind_bytes(index, value),
        value => Err(Error::type_conversion(value.clone(), "Vec<u8>")),
    }
}

fn decode_bytes(row: &dyn Row, index: usize) -> Result<Value> {
    Ok(Value::from(row.get_bytes(index)?))
}

fn encode_uuid(params: &mut dyn Bind, index: usize, value: &Value) -> Result<()> {
    let value = value.clone().to_uuid()?;
    params.bind_text(index, &value.hyphenated().to_string())
}

fn decode_uuid(row: &dyn Row, index: usize) -> Result<Value> {
    match row.get_text(index)? {
        Some(text) => Ok(Value::Uuid(Uuid::parse_str(&text)?)),
        None => Ok(Value::Null),
    }
}
