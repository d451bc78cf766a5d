use super::{Model, ModelDescriptor, TypeKey, TypeSerializer};

/// Constraint tags attachable to a table property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum C {
    Unique,
    AutoInc,
    AutoUuid,
    CascadeDelete,
    CascadeUpdate,
}

impl core::fmt::Display for C {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(match self {
            C::Unique => "UNIQUE",
            C::AutoInc => "AUTO_INC",
            C::AutoUuid => "AUTO_UUID",
            C::CascadeDelete => "CASCADE_DELETE",
            C::CascadeUpdate => "CASCADE_UPDATE",
        })
    }
}

/// Declarative definition of one table.
#[derive(Debug, Clone)]
pub struct TableDef {
    pub(crate) descriptor: ModelDescriptor,
    pub(crate) primary_key: String,
    pub(crate) foreign_keys: Vec<(String, TypeKey)>,
    pub(crate) constraints: Vec<(String, Vec<C>)>,
    pub(crate) serializers: Vec<TypeSerializer>,
}

impl TableDef {
    /// Maps `T` to a table keyed by the `primary_key` property.
    pub fn new<T: Model>(primary_key: impl Into<String>) -> Self {
        Self {
            descriptor: T::describe(),
            primary_key: primary_key.into(),
            foreign_keys: vec![],
            constraints: vec![],
            serializers: vec![],
        }
    }

    /// Declares `property` as a foreign key referencing the table mapping `T`.
    pub fn foreign_key<T: Model>(mut self, property: impl Into<String>) -> Self {
        self.foreign_keys.push((property.into(), TypeKey::of::<T>()));
        self
    }

    pub fn constraint(
        mut self,
        property: impl Into<String>,
        constraints: impl IntoIterator<Item = C>,
    ) -> Self {
        self.constraints
            .push((property.into(), constraints.into_iter().collect()));
        self
    }

    /// Serializers used only by this table's columns.
    pub fn serializers(mut self, serializers: impl IntoIterator<Item = TypeSerializer>) -> Self {
        self.serializers.extend(serializers);
        self
    }

    pub fn ty(&self) -> TypeKey {
        self.descriptor.ty
    }
}

/// Declarative definition of one schema.
#[derive(Debug, Clone)]
pub struct SchemaDef {
    pub(crate) name: String,
    pub(crate) tables: Vec<TableDef>,
    pub(crate) procedures: Vec<ModelDescriptor>,
    pub(crate) serializers: Vec<TypeSerializer>,
}

impl SchemaDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: vec![],
            procedures: vec![],
            serializers: vec![],
        }
    }

    pub fn table(mut self, table: TableDef) -> Self {
        self.tables.push(table);
        self
    }

    /// Binds the properties of `P` as the arguments of procedure `schema.P`.
    pub fn procedure<P: Model>(mut self) -> Self {
        self.procedures.push(P::describe());
        self
    }

    /// Serializers shared by every table and procedure of this schema.
    pub fn serializers(mut self, serializers: impl IntoIterator<Item = TypeSerializer>) -> Self {
        self.serializers.extend(serializers);
        self
    }
}
