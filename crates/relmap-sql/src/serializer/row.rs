use super::{
    column_param, key_param, Comma, Flavor, Formatter, Ident, Param, Placeholder, Serializer,
    TableName, ToSql,
};

use relmap_core::{
    schema::{Column, Field, Model, Table},
    stmt::{BatchQuery, Query, QueryParameter},
    Error, Result,
};

/// `column = ?`
struct Assign<'a, P>(&'a Column, P);

impl<P: ToSql> ToSql for Assign<'_, P> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, Ident(&self.0.name), " = ", self.1);
    }
}

impl<'a> Serializer<'a> {
    /// Inserts one row. An auto-generated primary key is left out and produced by
    /// the database.
    pub fn insert_row<T: Model>(&self, row: &T) -> Result<Query> {
        let table = self.table::<T>()?;
        let columns = table.insert_columns();

        let mut params = Vec::with_capacity(columns.len());
        for column in &columns {
            params.push(Param(column_param(*column, row)?));
        }

        let mut f = self.formatter();
        self.insert_template(&mut f, table, &columns, params);
        Ok(f.into_query())
    }

    /// Inserts many rows through one statement template.
    pub fn insert_rows<T: Model>(&self, rows: &[T]) -> Result<BatchQuery> {
        let table = self.table::<T>()?;
        let columns = table.insert_columns();

        let mut f = self.formatter();
        let placeholders = columns.iter().map(|_| Placeholder);
        self.insert_template(&mut f, table, &columns, placeholders);

        let matrix = self.value_matrix(rows, &columns)?;
        Ok(BatchQuery::new(f.dst, matrix))
    }

    /// Rewrites every non-key column of the row matching `row`'s primary key.
    pub fn update_row<T: Model>(&self, row: &T) -> Result<Query> {
        let table = self.table::<T>()?;
        let columns = self.update_columns(table)?;

        let mut params = Vec::with_capacity(columns.len());
        for column in &columns {
            params.push(Param(column_param(*column, row)?));
        }
        let key = Param(column_param(&table.primary_column, row)?);

        let mut f = self.formatter();
        fmt!(
            &mut f,
            "UPDATE ",
            TableName(table),
            " SET ",
            Comma(columns.iter().zip(params).map(|(column, param)| Assign(*column, param))),
            " WHERE ",
            Assign(&table.primary_column, key),
        );
        Ok(f.into_query())
    }

    pub fn update_rows<T: Model>(&self, rows: &[T]) -> Result<BatchQuery> {
        let table = self.table::<T>()?;
        let columns = self.update_columns(table)?;

        let mut f = self.formatter();
        fmt!(
            &mut f,
            "UPDATE ",
            TableName(table),
            " SET ",
            Comma(columns.iter().map(|column| Assign(*column, Placeholder))),
            " WHERE ",
            Assign(&table.primary_column, Placeholder),
        );

        let mut bound = columns;
        bound.push(&table.primary_column);
        let matrix = self.value_matrix(rows, &bound)?;
        Ok(BatchQuery::new(f.dst, matrix))
    }

    /// Deletes the row matching `row`'s primary key.
    pub fn delete_row<T: Model>(&self, row: &T) -> Result<Query> {
        let table = self.table::<T>()?;
        let key = Param(column_param(&table.primary_column, row)?);

        let mut f = self.formatter();
        self.delete_template(&mut f, table, key);
        Ok(f.into_query())
    }

    pub fn delete_rows<T: Model>(&self, rows: &[T]) -> Result<BatchQuery> {
        let table = self.table::<T>()?;

        let mut f = self.formatter();
        self.delete_template(&mut f, table, Placeholder);

        let matrix = self.value_matrix(rows, &[&table.primary_column])?;
        Ok(BatchQuery::new(f.dst, matrix))
    }

    pub fn delete_all<T: Model>(&self) -> Result<Query> {
        let table = self.table::<T>()?;

        let mut f = self.formatter();
        fmt!(&mut f, "DELETE FROM ", TableName(table));
        Ok(f.into_query())
    }

    pub fn select_all<T: Model>(&self) -> Result<Query> {
        let table = self.table::<T>()?;

        let mut f = self.formatter();
        fmt!(&mut f, "SELECT * FROM ", TableName(table));
        Ok(f.into_query())
    }

    /// Selects the row whose primary key equals `key`.
    pub fn select_pk<T: Model, K: Field>(&self, key: K) -> Result<Query> {
        let table = self.table::<T>()?;
        let column = &table.primary_column;

        if K::ty() != column.ty {
            relmap_core::bail!(
                "primary key of `{}` is `{}`, not `{}`",
                table.path(),
                column.ty,
                K::ty()
            );
        }

        let mut f = self.formatter();
        fmt!(
            &mut f,
            "SELECT * FROM ",
            TableName(table),
            " WHERE ",
            Assign(column, Param(key_param(column, &key))),
        );
        Ok(f.into_query())
    }

    pub fn count<T: Model>(&self) -> Result<Query> {
        let table = self.table::<T>()?;

        let mut f = self.formatter();
        fmt!(&mut f, "SELECT COUNT(*) FROM ", TableName(table));
        Ok(f.into_query())
    }

    /// The query returning the key generated by the last insert on this connection.
    pub fn last_insert_id(&self) -> Query {
        Query::raw(match self.flavor {
            Flavor::Sqlite => "SELECT last_insert_rowid()",
            Flavor::Postgresql => "SELECT lastval()",
            Flavor::Mysql => "SELECT LAST_INSERT_ID()",
        })
    }

    /// The query reading back the database-generated UUID key of the row just
    /// inserted into `T`'s table.
    pub fn inserted_uuid<T: Model>(&self) -> Result<Query> {
        let table = self.table::<T>()?;

        if self.flavor != Flavor::Sqlite {
            return Err(Error::unsupported_feature(format!(
                "reading back generated UUID keys of `{}`",
                table.path()
            )));
        }

        let mut f = self.formatter();
        fmt!(
            &mut f,
            "SELECT ",
            Ident(&table.primary_column.name),
            " FROM ",
            TableName(table),
            " WHERE rowid = last_insert_rowid()",
        );
        Ok(f.into_query())
    }

    fn insert_template<P: ToSql>(
        &self,
        f: &mut Formatter<'_>,
        table: &Table,
        columns: &[&Column],
        values: impl IntoIterator<Item = P>,
    ) {
        fmt!(f, "INSERT INTO ", TableName(table));

        if columns.is_empty() {
            match self.flavor {
                Flavor::Mysql => fmt!(f, " () VALUES ()"),
                _ => fmt!(f, " DEFAULT VALUES"),
            }
            return;
        }

        fmt!(
            f,
            " (",
            Comma(columns.iter().map(|column| Ident(&column.name))),
            ") VALUES (",
            Comma(values),
            ")",
        );
    }

    fn delete_template(&self, f: &mut Formatter<'_>, table: &Table, key: impl ToSql) {
        fmt!(
            f,
            "DELETE FROM ",
            TableName(table),
            " WHERE ",
            Assign(&table.primary_column, key),
        );
    }

    fn update_columns<'t>(&self, table: &'t Table) -> Result<Vec<&'t Column>> {
        let columns = table.update_columns();
        if columns.is_empty() {
            return Err(Error::unsupported_feature(format!(
                "updating `{}`, which has no columns besides its primary key",
                table.path()
            )));
        }
        Ok(columns)
    }

    fn value_matrix<T: Model>(
        &self,
        rows: &[T],
        columns: &[&Column],
    ) -> Result<Vec<Vec<QueryParameter>>> {
        rows.iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| column_param(column, row))
                    .collect::<Result<Vec<_>>>()
            })
            .collect()
    }
}
