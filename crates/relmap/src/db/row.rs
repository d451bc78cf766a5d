use super::{decode_all, Db};
use relmap_core::{driver::Row, schema::Field, Error, Model, Result};

/// Single object operations, see [`Db::row`].
#[derive(Debug)]
pub struct Rows<'db, 'a> {
    pub(super) db: &'db mut Db<'a>,
}

impl Rows<'_, '_> {
    /// Inserts `row`, writing a database-generated key back into it.
    ///
    /// Returns `false` when the insert affected no rows.
    pub fn insert<T: Model>(self, row: &mut T) -> Result<bool> {
        let Self { db } = self;
        let table = db.serializer.mapper().table::<T>()?;
        let pk = &table.primary_column;
        let query = db.serializer.insert_row(&*row)?;

        if !pk.is_auto_generated() {
            return Ok(db.driver.update(&query)? > 0);
        }

        let decoder = pk.decoder;
        let decode = |key: &dyn Row| decoder(key, 0);

        let key = if pk.is_auto_uuid() {
            let key_query = db.serializer.inserted_uuid::<T>()?;
            db.driver.insert_with_key_query(&query, &key_query, decode)?
        } else {
            let fallback = db.serializer.last_insert_id();
            db.driver.insert(&query, &fallback, decode)?
        };

        match key {
            Some(key) => {
                row.set(&pk.name, key)
                    .map_err(|err| err.context(Error::mapping(table.descriptor.name)))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Updates every non-key column of the row with `row`'s key.
    pub fn update<T: Model>(self, row: &T) -> Result<u64> {
        let query = self.db.serializer.update_row(row)?;
        self.db.driver.update(&query)
    }

    pub fn delete<T: Model>(self, row: &T) -> Result<u64> {
        let query = self.db.serializer.delete_row(row)?;
        self.db.driver.update(&query)
    }

    pub fn select_all<T: Model>(self) -> Result<Vec<T>> {
        let query = self.db.serializer.select_all::<T>()?;
        let mapper = self.db.serializer.mapper();
        self.db
            .driver
            .query(&query, |results| decode_all(mapper, results))
    }

    /// The row keyed by `key`, if any.
    pub fn select_pk<T: Model, K: Field>(self, key: K) -> Result<Option<T>> {
        let query = self.db.serializer.select_pk::<T, K>(key)?;
        let mapper = self.db.serializer.mapper();
        let mut rows = self
            .db
            .driver
            .query(&query, |results| decode_all(mapper, results))?;
        Ok(rows.pop())
    }

    pub fn count<T: Model>(self) -> Result<u64> {
        let query = self.db.serializer.count::<T>()?;
        let counts = self.db.driver.query_rows(&query, |row| row.get_i64(0))?;

        match counts.first() {
            Some(Some(count)) => Ok(u64::try_from(*count).unwrap_or_default()),
            _ => Err(relmap_core::err!("`{}` returned no count", query.sql)),
        }
    }
}
