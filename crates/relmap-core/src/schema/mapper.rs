use super::{
    serializer, Builder, Model, ModelDescriptor, Procedure, ProcedureId, RowDecoder, Schema, Table,
    TableId, TypeKey, TypeSerializer,
};
use crate::{err, Result};
use std::collections::HashMap;

/// The compiled, read-only registry of every schema, table and procedure.
///
/// Built once through [`Mapper::builder`]; safe to share between threads.
#[derive(Debug)]
pub struct Mapper {
    schemas: Vec<Schema>,
    tables: Vec<Table>,
    procedures: Vec<Procedure>,
    serializers: Vec<TypeSerializer>,
    inputs: Vec<ModelDescriptor>,
    outputs: Vec<ModelDescriptor>,

    table_lookup: HashMap<TypeKey, TableId>,
    procedure_lookup: HashMap<TypeKey, ProcedureId>,
}

impl Mapper {
    pub fn builder() -> Builder {
        Builder::new()
    }

    pub(super) fn new(
        schemas: Vec<Schema>,
        tables: Vec<Table>,
        procedures: Vec<Procedure>,
        serializers: Vec<TypeSerializer>,
        inputs: Vec<ModelDescriptor>,
        outputs: Vec<ModelDescriptor>,
    ) -> Self {
        let mut table_lookup = HashMap::new();
        for table in &tables {
            table_lookup.entry(table.ty).or_insert(table.id);
        }

        let mut procedure_lookup = HashMap::new();
        for procedure in &procedures {
            procedure_lookup.entry(procedure.ty).or_insert(procedure.id);
        }

        Self {
            schemas,
            tables,
            procedures,
            serializers,
            inputs,
            outputs,
            table_lookup,
            procedure_lookup,
        }
    }

    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }

    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.iter().find(|schema| schema.name == name)
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn procedures(&self) -> &[Procedure] {
        &self.procedures
    }

    /// Global serializers.
    pub fn serializers(&self) -> &[TypeSerializer] {
        &self.serializers
    }

    pub fn inputs(&self) -> &[ModelDescriptor] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[ModelDescriptor] {
        &self.outputs
    }

    /// The table mapping `T`.
    pub fn table<T: Model>(&self) -> Result<&Table> {
        let ty = TypeKey::of::<T>();
        self.table_by_ty(ty)
            .ok_or_else(|| err!("`{ty}` is not mapped to a table"))
    }

    pub fn table_by_ty(&self, ty: TypeKey) -> Option<&Table> {
        self.table_lookup.get(&ty).map(|id| self.table_by_id(*id))
    }

    pub fn table_by_id(&self, id: TableId) -> &Table {
        &self.tables[id.0]
    }

    /// The procedure bound to `P`.
    pub fn procedure<P: Model>(&self) -> Result<&Procedure> {
        let ty = TypeKey::of::<P>();
        self.procedure_lookup
            .get(&ty)
            .map(|id| &self.procedures[id.0])
            .ok_or_else(|| err!("`{ty}` is not bound to a procedure"))
    }

    /// Serializer for a property of type `ty` on `owner`.
    ///
    /// Table owners consult their own overrides and their schema's before the global
    /// list; any other owner only sees the global list.
    pub fn serializer_for(&self, owner: TypeKey, property: &str, ty: TypeKey) -> Result<&TypeSerializer> {
        match self.table_by_ty(owner) {
            Some(table) => {
                let schema = self
                    .schema(&table.schema)
                    .map(|schema| &schema.serializers[..])
                    .unwrap_or(&[]);
                serializer::resolve(
                    &[&table.serializers[..], schema, &self.serializers[..]],
                    &format!("{}.{property}", table.path()),
                    ty,
                )
            }
            None => serializer::resolve(
                &[&self.serializers[..]],
                &format!("{owner}.{property}"),
                ty,
            ),
        }
    }

    /// Plans how rows with the given column labels decode into `M`.
    pub fn decoder<M: Model>(&self, columns: &[String]) -> Result<RowDecoder> {
        RowDecoder::new::<M>(self, columns)
    }
}
