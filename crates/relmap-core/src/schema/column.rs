use super::{Decoder, Encoder, Property, TableId, TypeKey, TypeSerializer};
use crate::stmt::WireType;

/// A mapped property of a table.
#[derive(Clone)]
pub struct Column {
    /// Table containing this column. A handle into the mapper, never ownership.
    pub table: TableId,

    /// Property name, also used as the column name.
    pub name: String,

    pub ty: TypeKey,
    pub nullable: bool,
    pub unique: bool,

    /// Database type emitted in DDL.
    pub db_type: String,

    pub wire_type: WireType,
    pub encoder: Encoder,
    pub decoder: Decoder,

    pub kind: ColumnKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnKind {
    Primary {
        /// The database assigns an increasing integer.
        auto_increment: bool,

        /// The database assigns a UUID.
        auto_uuid: bool,
    },
    Foreign {
        /// Referenced table, unset until the mapper links foreign keys.
        target: Option<TableId>,

        /// Type of the referenced model.
        target_ty: TypeKey,

        cascade_delete: bool,
        cascade_update: bool,
    },
    Other,
}

impl Column {
    pub(crate) fn new(
        table: TableId,
        property: &Property,
        serializer: &TypeSerializer,
        kind: ColumnKind,
    ) -> Self {
        Self {
            table,
            name: property.name.to_string(),
            ty: property.ty,
            nullable: property.nullable,
            unique: false,
            db_type: serializer.db_type.clone(),
            wire_type: serializer.wire_type,
            encoder: serializer.encoder,
            decoder: serializer.decoder,
            kind,
        }
    }

    pub fn is_primary(&self) -> bool {
        matches!(self.kind, ColumnKind::Primary { .. })
    }

    pub fn is_foreign(&self) -> bool {
        matches!(self.kind, ColumnKind::Foreign { .. })
    }

    pub fn is_auto_increment(&self) -> bool {
        matches!(
            self.kind,
            ColumnKind::Primary {
                auto_increment: true,
                ..
            }
        )
    }

    pub fn is_auto_uuid(&self) -> bool {
        matches!(
            self.kind,
            ColumnKind::Primary {
                auto_uuid: true,
                ..
            }
        )
    }

    /// The database, not the caller, provides this column's value on insert.
    pub fn is_auto_generated(&self) -> bool {
        self.is_auto_increment() || self.is_auto_uuid()
    }

    pub fn foreign_table(&self) -> Option<TableId> {
        match self.kind {
            ColumnKind::Foreign { target, .. } => target,
            _ => None,
        }
    }

    /// Serializer view of this column, for encoding parameters.
    pub fn serializer(&self) -> TypeSerializer {
        TypeSerializer {
            ty: self.ty,
            wire_type: self.wire_type,
            db_type: self.db_type.clone(),
            encoder: self.encoder,
            decoder: self.decoder,
        }
    }
}

impl core::fmt::Debug for Column {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("Column")
            .field("table", &self.table)
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("nullable", &self.nullable)
            .field("unique", &self.unique)
            .field("db_type", &self.db_type)
            .field("wire_type", &self.wire_type)
            .field("kind", &self.kind)
            .finish()
    }
}
