use super::{Field, TypeKey};
use crate::{
    driver::{Bind, Row},
    stmt::{Value, WireType},
    Error, Result,
};

/// Writes a non-null value into the parameter at `index`.
pub type Encoder = fn(&mut dyn Bind, usize, &Value) -> Result<()>;

/// Reads the column at `index` of a row, yielding [`Value::Null`] for SQL `NULL`.
pub type Decoder = fn(&dyn Row, usize) -> Result<Value>;

/// Converts one Rust type to and from a database column type.
#[derive(Clone)]
pub struct TypeSerializer {
    pub ty: TypeKey,

    /// Parameter type used when binding, including typed `NULL`s.
    pub wire_type: WireType,

    /// Column type emitted in DDL, e.g. `VARCHAR(255)`.
    pub db_type: String,

    pub encoder: Encoder,
    pub decoder: Decoder,
}

impl TypeSerializer {
    pub fn new<T: Field>(
        db_type: impl Into<String>,
        wire_type: WireType,
        encoder: Encoder,
        decoder: Decoder,
    ) -> Self {
        Self {
            ty: T::ty(),
            wire_type,
            db_type: db_type.into(),
            encoder,
            decoder,
        }
    }

    /// Copy of this serializer emitting a different column type.
    pub fn with_db_type(&self, db_type: impl Into<String>) -> Self {
        Self {
            db_type: db_type.into(),
            ..self.clone()
        }
    }

    /// Binds `value`, sending `NULL` straight to the driver.
    pub fn encode(&self, params: &mut dyn Bind, index: usize, value: &Value) -> Result<()> {
        if value.is_null() {
            params.bind_null(index, self.wire_type)
        } else {
            (self.encoder)(params, index, value)
        }
    }

    pub fn decode(&self, row: &dyn Row, index: usize) -> Result<Value> {
        (self.decoder)(row, index)
    }
}

impl PartialEq for TypeSerializer {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.wire_type == other.wire_type && self.db_type == other.db_type
    }
}

impl core::fmt::Debug for TypeSerializer {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("TypeSerializer")
            .field("ty", &self.ty)
            .field("wire_type", &self.wire_type)
            .field("db_type", &self.db_type)
            .finish()
    }
}

/// Finds the serializer for `ty`, preferring the narrowest scope.
///
/// `scopes` are searched in order, so pass table-local lists before schema-local
/// ones and the global list last.
pub fn resolve<'a>(
    scopes: &[&'a [TypeSerializer]],
    owner: &str,
    ty: TypeKey,
) -> Result<&'a TypeSerializer> {
    scopes
        .iter()
        .copied()
        .flat_map(|scope| scope.iter())
        .find(|serializer| serializer.ty == ty)
        .ok_or_else(|| Error::serializer_missing(owner, ty.short_name()))
}
