use super::{ProcedureId, TableId, TypeSerializer};

/// A named group of tables and procedures sharing serializer overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub name: String,
    pub tables: Vec<TableId>,
    pub procedures: Vec<ProcedureId>,
    pub serializers: Vec<TypeSerializer>,
}
