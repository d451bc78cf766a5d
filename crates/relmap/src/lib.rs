pub mod db;
pub use db::Db;

pub mod driver;
pub use driver::{Driver, BATCH_CHUNK_SIZE};

pub use relmap_core::{
    bail, err, model,
    schema::{self, serializers, Field, Mapper, Model, SchemaDef, TableDef, C},
    stmt, Connection, Error, Result,
};

pub use relmap_sql::{Flavor, QueryBuilder, Serializer};

#[cfg(feature = "postgresql")]
pub use relmap_driver_postgresql as postgresql;

#[cfg(feature = "sqlite")]
pub use relmap_driver_sqlite as sqlite;
