use super::{Field, TypeKey};
use crate::{stmt::Value, Error, Result};
use indexmap::IndexMap;

/// A property of a model, as seen by the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: &'static str,
    pub ty: TypeKey,
    pub nullable: bool,

    /// The constructor has a default for this property, so a row may omit it.
    pub defaulted: bool,
}

impl Property {
    pub fn new<T: Field>(name: &'static str, defaulted: bool) -> Self {
        Self {
            name,
            ty: T::ty(),
            nullable: T::NULLABLE,
            defaulted,
        }
    }
}

/// Structural description of a model type.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDescriptor {
    pub name: &'static str,
    pub ty: TypeKey,

    /// Properties in declaration order.
    pub properties: Vec<Property>,
}

impl ModelDescriptor {
    pub fn new<M: 'static>(name: &'static str, properties: Vec<Property>) -> Self {
        Self {
            name,
            ty: TypeKey::of::<M>(),
            properties,
        }
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.name == name)
    }
}

/// A type whose properties the registry can enumerate, read, write and construct from.
///
/// Usually implemented with the [`model!`](crate::model) macro.
pub trait Model: Sized + 'static {
    fn describe() -> ModelDescriptor;

    /// Reads a property, `None` when the model has no such property.
    fn get(&self, property: &str) -> Option<Value>;

    /// Writes a property.
    fn set(&mut self, property: &str, value: Value) -> Result<()>;

    /// Constructs the model from decoded column values.
    fn load(record: Record) -> Result<Self>;
}

/// Values decoded from a row, keyed by property name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    model: &'static str,
    values: IndexMap<String, Value>,
}

impl Record {
    pub fn new(model: &'static str) -> Self {
        Self {
            model,
            values: IndexMap::new(),
        }
    }

    pub fn model(&self) -> &'static str {
        self.model
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Removes and converts a required value.
    pub fn field<T: Field>(&mut self, name: &str) -> Result<T> {
        match self.values.swap_remove(name) {
            Some(value) => T::from_value(value)
                .map_err(|err| err.context(crate::err!("property `{}.{name}`", self.model))),
            None if T::NULLABLE => T::from_value(Value::Null),
            None => Err(Error::from_args(format_args!(
                "missing value for `{}.{name}`",
                self.model
            ))),
        }
    }

    /// Removes and converts a value, falling back to `default` when the row omitted it.
    pub fn field_or<T: Field>(&mut self, name: &str, default: impl FnOnce() -> T) -> Result<T> {
        if self.values.contains_key(name) {
            self.field(name)
        } else {
            Ok(default())
        }
    }
}
