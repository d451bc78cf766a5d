mod batch;
pub use batch::Batch;

mod call;
pub use call::Call;

mod results;
pub use results::Results;

mod row;
pub use row::Rows;

mod run;
pub use run::Run;

mod table;
pub use table::Tables;

use crate::{driver::Driver, Flavor, Serializer};
use relmap_core::{driver::ResultSet, stmt::QueryParameter, Connection, Mapper, Model, Result};

/// Runs mapped operations on one connection.
///
/// Operations are grouped by what they act on: [`Db::table`] for DDL, [`Db::row`]
/// for single objects, [`Db::batch`] for many objects sharing one statement,
/// [`Db::run`] for custom queries and scripts, and [`Db::call`] for stored
/// procedures.
///
/// ```ignore
/// let mut db = Db::new(&mapper, Flavor::Sqlite, &mut connection);
/// db.table().create::<Parent>()?;
///
/// let mut parent = Parent { pk: 0, value: "x".into() };
/// db.row().insert(&mut parent)?;
/// assert_eq!(db.row().select_pk::<Parent, _>(parent.pk)?, Some(parent));
/// ```
#[derive(Debug)]
pub struct Db<'a> {
    serializer: Serializer<'a>,
    driver: Driver<'a>,
}

impl<'a> Db<'a> {
    pub fn new(mapper: &'a Mapper, flavor: Flavor, connection: &'a mut dyn Connection) -> Self {
        Self {
            serializer: Serializer::new(mapper, flavor),
            driver: Driver::new(connection),
        }
    }

    /// Installs a hook that sees every parameter before it is encoded.
    pub fn with_pre_encode(
        mut self,
        hook: impl Fn(&mut QueryParameter) + Send + Sync + 'static,
    ) -> Self {
        self.driver = self.driver.with_pre_encode(hook);
        self
    }

    pub fn mapper(&self) -> &'a Mapper {
        self.serializer.mapper()
    }

    pub fn serializer(&self) -> &Serializer<'a> {
        &self.serializer
    }

    pub fn driver(&mut self) -> &mut Driver<'a> {
        &mut self.driver
    }

    pub fn table(&mut self) -> Tables<'_, 'a> {
        Tables { db: self }
    }

    pub fn row(&mut self) -> Rows<'_, 'a> {
        Rows { db: self }
    }

    pub fn batch(&mut self) -> Batch<'_, 'a> {
        Batch { db: self }
    }

    pub fn run(&mut self) -> Run<'_, 'a> {
        Run { db: self }
    }

    pub fn call(&mut self) -> Call<'_, 'a> {
        Call { db: self }
    }
}

/// Decodes every remaining row of `results` into `O`.
fn decode_all<O: Model>(mapper: &Mapper, results: &mut dyn ResultSet) -> Result<Vec<O>> {
    let decoder = mapper.decoder::<O>(results.columns())?;
    decoder.decode_all(results)
}
