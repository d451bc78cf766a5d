use super::{Comma, Flavor, Formatter, Ident, ReferenceName, Serializer, TableName, ToSql};

use relmap_core::{
    schema::{Column, ColumnKind, Model, Table},
    stmt::Query,
    Error, Result,
};

/// UUID v4 text built from SQLite's random functions.
const SQLITE_UUID: &str = "(lower(hex(randomblob(4))) || '-' || lower(hex(randomblob(2))) || '-4' || \
     substr(lower(hex(randomblob(2))), 2) || '-' || substr('89ab', 1 + (abs(random()) % 4), 1) || \
     substr(lower(hex(randomblob(2))), 2) || '-' || lower(hex(randomblob(6))))";

struct ColumnDef<'a>(&'a Column);

struct ForeignKey<'a> {
    column: &'a Column,
    target: &'a Table,
}

impl<'a> Serializer<'a> {
    /// `CREATE TABLE IF NOT EXISTS` for the table mapping `T`.
    ///
    /// Columns come primary key first, then foreign keys, then the rest, followed by
    /// one FOREIGN KEY clause per foreign column.
    ///
    /// Database-generated UUID keys can only be read back on SQLite, so other
    /// flavors refuse to create `AUTO_UUID` tables.
    pub fn create_table<T: Model>(&self) -> Result<Query> {
        let table = self.table::<T>()?;

        if table.primary_column.is_auto_uuid() && self.flavor != Flavor::Sqlite {
            return Err(Error::unsupported_feature(format!(
                "creating `{}` with a generated UUID key",
                table.path()
            )));
        }

        let foreign_keys = table.foreign_columns.iter().filter_map(|column| {
            column.foreign_table().map(|id| ForeignKey {
                column,
                target: self.mapper.table_by_id(id),
            })
        });

        let mut f = self.formatter();
        fmt!(
            &mut f,
            "CREATE TABLE IF NOT EXISTS ",
            TableName(table),
            " (",
            Comma(table.columns().map(ColumnDef)),
        );
        for foreign_key in foreign_keys {
            fmt!(&mut f, ", ", foreign_key);
        }
        fmt!(&mut f, ")");

        Ok(f.into_query())
    }

    pub fn drop_table<T: Model>(&self) -> Result<Query> {
        let table = self.table::<T>()?;

        let mut f = self.formatter();
        fmt!(&mut f, "DROP TABLE IF EXISTS ", TableName(table));
        Ok(f.into_query())
    }
}

impl ToSql for ColumnDef<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let column = self.0;
        let flavor = f.serializer.flavor;

        match column.kind {
            ColumnKind::Primary {
                auto_increment: true,
                ..
            } => match flavor {
                // AUTOINCREMENT is only accepted on a column declared exactly INTEGER
                Flavor::Sqlite => {
                    fmt!(f, Ident(&column.name), " INTEGER PRIMARY KEY AUTOINCREMENT")
                }
                Flavor::Postgresql => fmt!(
                    f,
                    Ident(&column.name),
                    " ",
                    &column.db_type,
                    " GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY"
                ),
                Flavor::Mysql => fmt!(
                    f,
                    Ident(&column.name),
                    " ",
                    &column.db_type,
                    " AUTO_INCREMENT PRIMARY KEY"
                ),
            },
            ColumnKind::Primary {
                auto_uuid: true, ..
            } => fmt!(
                f,
                Ident(&column.name),
                " ",
                &column.db_type,
                " DEFAULT ",
                SQLITE_UUID,
                " PRIMARY KEY"
            ),
            ColumnKind::Primary { .. } => fmt!(
                f,
                Ident(&column.name),
                " ",
                &column.db_type,
                " PRIMARY KEY NOT NULL"
            ),
            ColumnKind::Foreign { .. } | ColumnKind::Other => {
                fmt!(f, Ident(&column.name), " ", &column.db_type);
                if !column.nullable {
                    fmt!(f, " NOT NULL");
                }
                if column.unique {
                    fmt!(f, " UNIQUE");
                }
            }
        }
    }
}

impl ToSql for ForeignKey<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let ColumnKind::Foreign {
            cascade_delete,
            cascade_update,
            ..
        } = self.column.kind
        else {
            return;
        };

        fmt!(
            f,
            "FOREIGN KEY (",
            Ident(&self.column.name),
            ") REFERENCES ",
            ReferenceName(self.target),
            " (",
            Ident(&self.target.primary_column.name),
            ")",
            cascade_update.then_some(" ON UPDATE CASCADE"),
            cascade_delete.then_some(" ON DELETE CASCADE"),
        );
    }
}
