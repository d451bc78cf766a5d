use super::{decode_all, Db, Results};
use crate::QueryBuilder;
use relmap_core::{stmt::Query, Model, Result};

/// Custom statements, see [`Db::run`].
#[derive(Debug)]
pub struct Run<'db, 'a> {
    pub(super) db: &'db mut Db<'a>,
}

impl Run<'_, '_> {
    /// Runs a custom query and decodes its rows into `O`.
    ///
    /// ```ignore
    /// let children: Vec<Child> = db.run().query(|q| {
    ///     format!(
    ///         "SELECT * FROM {} WHERE {} = {}",
    ///         q.table::<Child>(),
    ///         q.column::<Child>("parent"),
    ///         q.value(parent.pk),
    ///     )
    /// })?;
    /// ```
    pub fn query<O: Model>(self, build: impl FnOnce(&mut QueryBuilder<'_>) -> String) -> Result<Vec<O>> {
        let query = self.db.serializer.query(build)?;
        self.rows(&query)
    }

    /// Like [`Run::query`], with `input`'s properties available as parameters.
    pub fn query_with<I: Model, O: Model>(
        self,
        input: &I,
        build: impl FnOnce(&mut QueryBuilder<'_, I>) -> String,
    ) -> Result<Vec<O>> {
        let query = self.db.serializer.query_with(input, build)?;
        self.rows(&query)
    }

    /// Runs a custom statement that returns no rows.
    pub fn update(self, build: impl FnOnce(&mut QueryBuilder<'_>) -> String) -> Result<u64> {
        let query = self.db.serializer.query(build)?;
        self.db.driver.update(&query)
    }

    /// Runs `sql` through the multi-result path, handing each result set to `f`.
    pub fn execute<T>(
        self,
        sql: &str,
        mut f: impl FnMut(usize, Results<'_>) -> Result<T>,
    ) -> Result<Vec<T>> {
        let mapper = self.db.serializer.mapper();
        self.db.driver.execute(&Query::raw(sql), |ordinal, results| {
            f(ordinal, Results::new(mapper, results))
        })
    }

    fn rows<O: Model>(self, query: &Query) -> Result<Vec<O>> {
        let mapper = self.db.serializer.mapper();
        self.db
            .driver
            .query(query, |results| decode_all(mapper, results))
    }
}
