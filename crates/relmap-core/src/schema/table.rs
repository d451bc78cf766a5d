use super::{Column, ModelDescriptor, TypeKey, TypeSerializer};
use std::fmt;

/// A domain type mapped to a database table.
#[derive(Debug, Clone)]
pub struct Table {
    pub id: TableId,

    /// Name of the schema the table lives in.
    pub schema: String,

    pub name: String,
    pub ty: TypeKey,
    pub descriptor: ModelDescriptor,

    pub primary_column: Column,
    pub foreign_columns: Vec<Column>,
    pub other_columns: Vec<Column>,

    /// Serializers overriding the schema and global ones for this table only.
    pub serializers: Vec<TypeSerializer>,
}

/// Uniquely identifies a table in the mapper.
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct TableId(pub usize);

impl Table {
    /// `schema.Name`, the table's identity.
    pub fn path(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// Every column: primary key, foreign keys, then the rest.
    pub fn columns(&self) -> impl Iterator<Item = &Column> + '_ {
        std::iter::once(&self.primary_column)
            .chain(self.foreign_columns.iter())
            .chain(self.other_columns.iter())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns().find(|column| column.name == name)
    }

    /// Columns an insert binds. An auto-generated primary key is left to the database.
    pub fn insert_columns(&self) -> Vec<&Column> {
        if self.primary_column.is_auto_generated() {
            self.foreign_columns
                .iter()
                .chain(self.other_columns.iter())
                .collect()
        } else {
            self.columns().collect()
        }
    }

    /// Columns an update assigns. The primary key is the predicate and never changes.
    pub fn update_columns(&self) -> Vec<&Column> {
        self.foreign_columns
            .iter()
            .chain(self.other_columns.iter())
            .collect()
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.schema == other.schema && self.name == other.name
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TableId({})", self.0)
    }
}
