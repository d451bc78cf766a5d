use super::Db;
use relmap_core::{Model, Result};

/// Table level operations, see [`Db::table`].
#[derive(Debug)]
pub struct Tables<'db, 'a> {
    pub(super) db: &'db mut Db<'a>,
}

impl Tables<'_, '_> {
    /// Creates `T`'s table unless it already exists.
    pub fn create<T: Model>(self) -> Result<()> {
        let query = self.db.serializer.create_table::<T>()?;
        self.db.driver.update(&query)?;
        Ok(())
    }

    pub fn drop<T: Model>(self) -> Result<()> {
        let query = self.db.serializer.drop_table::<T>()?;
        self.db.driver.update(&query)?;
        Ok(())
    }

    /// Deletes every row, returning how many were removed.
    pub fn delete_all<T: Model>(self) -> Result<u64> {
        let query = self.db.serializer.delete_all::<T>()?;
        self.db.driver.update(&query)
    }
}
