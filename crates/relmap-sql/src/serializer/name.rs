use super::{Flavor, Formatter, Ident, Period, ToSql};

use relmap_core::schema::{Procedure, Table};

/// `schema.Table`, the way every statement addresses a table.
pub(super) struct TableName<'a>(pub(super) &'a Table);

/// The table a FOREIGN KEY clause references.
pub(super) struct ReferenceName<'a>(pub(super) &'a Table);

pub(super) struct ProcedureName<'a>(pub(super) &'a Procedure);

impl ToSql for TableName<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, Period([Ident(&self.0.schema), Ident(&self.0.name)]));
    }
}

impl ToSql for ReferenceName<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        // SQLite resolves references inside the schema of the referencing table.
        match f.serializer.flavor {
            Flavor::Sqlite => fmt!(f, Ident(&self.0.name)),
            _ => fmt!(f, TableName(self.0)),
        }
    }
}

impl ToSql for ProcedureName<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match &self.0.schema {
            Some(schema) => fmt!(f, Period([Ident(schema), Ident(&self.0.name)])),
            None => fmt!(f, Ident(&self.0.name)),
        }
    }
}
