#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Period};

mod flavor;
pub use flavor::Flavor;

mod ident;
use ident::Ident;

mod name;
use name::{ProcedureName, ReferenceName, TableName};

mod params;
use params::{Param, Placeholder};

// Statement serializers
mod call;
mod create_table;
mod query;
pub use query::QueryBuilder;
mod row;
mod uml;

use relmap_core::{
    schema::{Column, Field, Mapper, Model, Table},
    stmt::{Query, QueryParameter},
    Result,
};

/// Generates parameterized SQL for the tables and procedures of a [`Mapper`].
#[derive(Debug, Clone, Copy)]
pub struct Serializer<'a> {
    /// Registry the statements are generated from
    mapper: &'a Mapper,

    /// The database flavor handles the differences between SQL dialects and
    /// supported features.
    flavor: Flavor,
}

struct Formatter<'a> {
    /// Handle to the serializer
    serializer: &'a Serializer<'a>,

    /// Where to write the serialized SQL
    dst: String,

    /// Parameters, in placeholder order
    params: Vec<QueryParameter>,

    /// Placeholders written so far
    placeholders: usize,
}

impl<'a> Serializer<'a> {
    pub fn new(mapper: &'a Mapper, flavor: Flavor) -> Self {
        Self { mapper, flavor }
    }

    pub fn mapper(&self) -> &'a Mapper {
        self.mapper
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// Quotes `name` as an identifier of this flavor.
    pub fn escaped(&self, name: &str) -> String {
        let mut f = self.formatter();
        fmt!(&mut f, Ident(name));
        f.dst
    }

    fn formatter(&self) -> Formatter<'_> {
        Formatter {
            serializer: self,
            dst: String::new(),
            params: vec![],
            placeholders: 0,
        }
    }

    fn table<T: Model>(&self) -> Result<&'a Table> {
        self.mapper.table::<T>()
    }
}

impl Formatter<'_> {
    fn into_query(self) -> Query {
        debug_assert_eq!(
            self.placeholders,
            self.params.len(),
            "placeholder count does not match parameters; sql={}",
            self.dst
        );
        Query::new(self.dst, self.params)
    }
}

/// The parameter binding `column` to its value on `row`.
fn column_param<T: Model>(column: &Column, row: &T) -> Result<QueryParameter> {
    let Some(value) = row.get(&column.name) else {
        relmap_core::bail!(
            "`{}` has no property `{}`",
            T::describe().name,
            column.name
        );
    };
    Ok(QueryParameter::new(&column.name, value, &column.serializer()))
}

/// The parameter binding a primary key value given on its own.
fn key_param<K: Field>(column: &Column, key: &K) -> QueryParameter {
    QueryParameter::new(&column.name, key.to_value(), &column.serializer())
}
