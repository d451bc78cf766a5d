use super::{Ident, Param, Serializer, TableName, ToSql};

use relmap_core::{
    schema::{serializer, Field, Model, TypeKey},
    stmt::{Query, QueryParameter},
    Error, Result,
};

/// Assembles a custom statement.
///
/// Each method returns the SQL fragment to splice into the statement text and, for
/// values, records the matching parameter. Fragments must appear in the text in the
/// order they were requested. The first problem encountered is reported by
/// [`Serializer::query`].
pub struct QueryBuilder<'a, I = ()> {
    serializer: &'a Serializer<'a>,
    input: Option<&'a I>,
    params: Vec<QueryParameter>,
    placeholders: usize,
    error: Option<Error>,
}

impl<'a> Serializer<'a> {
    /// Builds a custom statement from the text returned by `build`.
    pub fn query(&self, build: impl FnOnce(&mut QueryBuilder<'_>) -> String) -> Result<Query> {
        QueryBuilder::new(self, None).finish(build)
    }

    /// Like [`Serializer::query`], with `input`'s properties available as parameters.
    pub fn query_with<I: Model>(
        &self,
        input: &I,
        build: impl FnOnce(&mut QueryBuilder<'_, I>) -> String,
    ) -> Result<Query> {
        QueryBuilder::new(self, Some(input)).finish(build)
    }
}

impl<'a, I> QueryBuilder<'a, I> {
    fn new(serializer: &'a Serializer<'a>, input: Option<&'a I>) -> Self {
        Self {
            serializer,
            input,
            params: vec![],
            placeholders: 0,
            error: None,
        }
    }

    fn finish(mut self, build: impl FnOnce(&mut Self) -> String) -> Result<Query> {
        let sql = build(&mut self);

        if let Some(err) = self.error {
            return Err(err);
        }

        debug_assert_eq!(self.placeholders, self.params.len());
        Ok(Query::new(sql, self.params))
    }

    /// The table mapping `T`.
    pub fn table<T: Model>(&mut self) -> String {
        match self.serializer.table::<T>() {
            Ok(table) => self.fragment(TableName(table)),
            Err(err) => self.fail(err),
        }
    }

    /// Column `name` of the table mapping `T`.
    pub fn column<T: Model>(&mut self, name: &str) -> String {
        let table = match self.serializer.table::<T>() {
            Ok(table) => table,
            Err(err) => return self.fail(err),
        };

        match table.column(name) {
            Some(column) => self.fragment(Ident(&column.name)),
            None => self.fail(relmap_core::err!(
                "table `{}` has no column `{name}`",
                table.path()
            )),
        }
    }

    /// A parameter carrying `value`, encoded with the global serializer of its type.
    pub fn value<T: Field>(&mut self, value: T) -> String {
        let mapper = self.serializer.mapper();
        let resolved = serializer::resolve(&[mapper.serializers()], "query value", T::ty());

        match resolved {
            Ok(serializer) => {
                let param = QueryParameter::new("value", value.to_value(), serializer);
                self.fragment(Param(param))
            }
            Err(err) => self.fail(err),
        }
    }

    fn fragment(&mut self, fragment: impl ToSql) -> String {
        let mut f = self.serializer.formatter();
        f.placeholders = self.placeholders;
        fmt!(&mut f, fragment);

        self.placeholders = f.placeholders;
        self.params.append(&mut f.params);
        f.dst
    }

    fn fail(&mut self, err: Error) -> String {
        self.error.get_or_insert(err);
        String::new()
    }
}

impl<I: Model> QueryBuilder<'_, I> {
    /// A parameter carrying property `name` of the input.
    pub fn input(&mut self, name: &str) -> String {
        let Some(input) = self.input else {
            return self.fail(relmap_core::err!("query has no input"));
        };

        let descriptor = I::describe();
        let (Some(property), Some(value)) = (descriptor.property(name), input.get(name)) else {
            return self.fail(relmap_core::err!(
                "input `{}` has no property `{name}`",
                descriptor.name
            ));
        };

        let mapper = self.serializer.mapper();
        match mapper.serializer_for(TypeKey::of::<I>(), name, property.ty) {
            Ok(serializer) => {
                let param = QueryParameter::new(name, value, serializer);
                self.fragment(Param(param))
            }
            Err(err) => self.fail(err),
        }
    }
}
