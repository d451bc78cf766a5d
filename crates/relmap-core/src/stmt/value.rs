use crate::{Error, Result};
use uuid::Uuid;

/// A database value as it travels between a model property and a statement.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Signed 16-bit integer
    I16(i16),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// 32-bit float
    F32(f32),

    /// 64-bit float
    F64(f64),

    /// String value
    String(String),

    /// Raw bytes
    Bytes(Vec<u8>),

    /// A UUID
    Uuid(Uuid),

    /// Null value
    #[default]
    Null,
}

impl Value {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the variant, used in conversion errors.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "Bool",
            Value::I16(_) => "I16",
            Value::I32(_) => "I32",
            Value::I64(_) => "I64",
            Value::F32(_) => "F32",
            Value::F64(_) => "F64",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Uuid(_) => "Uuid",
            Value::Null => "Null",
        }
    }

    pub fn to_bool(self) -> Result<bool> {
        match self {
            Value::Bool(v) => Ok(v),
            Value::I16(v @ 0..=1) => Ok(v == 1),
            Value::I32(v @ 0..=1) => Ok(v == 1),
            Value::I64(v @ 0..=1) => Ok(v == 1),
            value => Err(Error::type_conversion(value, "bool")),
        }
    }

    pub fn to_i16(self) -> Result<i16> {
        let converted = match &self {
            Value::I16(v) => Some(*v),
            Value::I32(v) => i16::try_from(*v).ok(),
            Value::I64(v) => i16::try_from(*v).ok(),
            _ => None,
        };
        converted.ok_or_else(|| Error::type_conversion(self, "i16"))
    }

    pub fn to_i32(self) -> Result<i32> {
        let converted = match &self {
            Value::I16(v) => Some(i32::from(*v)),
            Value::I32(v) => Some(*v),
            Value::I64(v) => i32::try_from(*v).ok(),
            _ => None,
        };
        converted.ok_or_else(|| Error::type_conversion(self, "i32"))
    }

    pub fn to_i64(self) -> Result<i64> {
        match self {
            Value::I16(v) => Ok(i64::from(v)),
            Value::I32(v) => Ok(i64::from(v)),
            Value::I64(v) => Ok(v),
            value => Err(Error::type_conversion(value, "i64")),
        }
    }

    pub fn to_f32(self) -> Result<f32> {
        match self {
            Value::F32(v) => Ok(v),
            Value::F64(v) => Ok(v as f32),
            value => Err(Error::type_conversion(value, "f32")),
        }
    }

    pub fn to_f64(self) -> Result<f64> {
        match self {
            Value::F32(v) => Ok(f64::from(v)),
            Value::F64(v) => Ok(v),
            value => Err(Error::type_conversion(value, "f64")),
        }
    }

    pub fn into_string(self) -> Result<String> {
        match self {
            Value::String(v) => Ok(v),
            value => Err(Error::type_conversion(value, "String")),
        }
    }

    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Value::Bytes(v) => Ok(v),
            value => Err(Error::type_conversion(value, "Vec<u8>")),
        }
    }

    pub fn to_uuid(self) -> Result<Uuid> {
        match self {
            Value::Uuid(v) => Ok(v),
            Value::String(v) => Ok(Uuid::parse_str(&v)?),
            value => Err(Error::type_conversion(value, "Uuid")),
        }
    }

    /// Renders the value as a SQL literal.
    ///
    /// Only used to make logged statements readable; never sent to a database.
    pub fn escaped(&self) -> String {
        match self {
            Value::Bool(v) => v.to_string(),
            Value::I16(v) => v.to_string(),
            Value::I32(v) => v.to_string(),
            Value::I64(v) => v.to_string(),
            Value::F32(v) => v.to_string(),
            Value::F64(v) => v.to_string(),
            Value::String(v) => format!("'{}'", v.replace('\'', "''")),
            Value::Bytes(v) => {
                let hex: String = v.iter().map(|byte| format!("{byte:02x}")).collect();
                format!("x'{hex}'")
            }
            Value::Uuid(v) => format!("'{v}'"),
            Value::Null => "NULL".to_string(),
        }
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<i16> for Value {
    fn from(src: i16) -> Self {
        Self::I16(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::I32(src)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::I64(src)
    }
}

impl From<f32> for Value {
    fn from(src: f32) -> Self {
        Self::F32(src)
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::F64(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(src: Vec<u8>) -> Self {
        Self::Bytes(src)
    }
}

impl From<Uuid> for Value {
    fn from(src: Uuid) -> Self {
        Self::Uuid(src)
    }
}

impl<T> From<Option<T>> for Value
where
    Value: From<T>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Value::from(value),
            None => Value::Null,
        }
    }
}
