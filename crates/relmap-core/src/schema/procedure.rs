use super::{Decoder, Encoder, Property, TypeKey, TypeSerializer};
use crate::stmt::WireType;
use std::fmt;

/// A domain type bound to a stored procedure; its properties are the arguments.
#[derive(Debug, Clone)]
pub struct Procedure {
    pub id: ProcedureId,

    /// `None` for procedures registered outside any schema.
    pub schema: Option<String>,

    pub name: String,
    pub ty: TypeKey,

    /// Arguments in declaration order; empty for marker procedures.
    pub args: Vec<Arg>,
}

/// Uniquely identifies a procedure in the mapper.
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct ProcedureId(pub usize);

#[derive(Clone)]
pub struct Arg {
    /// Procedure owning this argument.
    pub procedure: ProcedureId,

    pub name: String,
    pub ty: TypeKey,
    pub nullable: bool,
    pub db_type: String,
    pub wire_type: WireType,
    pub encoder: Encoder,
    pub decoder: Decoder,
}

impl Procedure {
    /// `schema.Name`, or just `Name` for global procedures.
    pub fn path(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{}", self.name),
            None => self.name.clone(),
        }
    }

    pub fn is_marker(&self) -> bool {
        self.args.is_empty()
    }
}

impl PartialEq for Procedure {
    fn eq(&self, other: &Self) -> bool {
        self.schema == other.schema && self.name == other.name
    }
}

impl Arg {
    pub(crate) fn new(
        procedure: ProcedureId,
        property: &Property,
        serializer: &TypeSerializer,
    ) -> Self {
        Self {
            procedure,
            name: property.name.to_string(),
            ty: property.ty,
            nullable: property.nullable,
            db_type: serializer.db_type.clone(),
            wire_type: serializer.wire_type,
            encoder: serializer.encoder,
            decoder: serializer.decoder,
        }
    }

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

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arg")
            .field("procedure", &self.procedure)
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("db_type", &self.db_type)
            .field("wire_type", &self.wire_type)
            .finish()
    }
}

impl fmt::Debug for ProcedureId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ProcedureId({})", self.0)
    }
}
