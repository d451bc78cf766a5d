use super::Db;
use relmap_core::{Model, Result};

/// Operations on many objects sharing one statement, see [`Db::batch`].
///
/// Each returns the affected row count summed over every row.
#[derive(Debug)]
pub struct Batch<'db, 'a> {
    pub(super) db: &'db mut Db<'a>,
}

impl Batch<'_, '_> {
    /// Inserts every row. Generated keys are not read back.
    pub fn insert<T: Model>(self, rows: &[T]) -> Result<u64> {
        let batch = self.db.serializer.insert_rows(rows)?;
        self.db.driver.batch(&batch)
    }

    pub fn update<T: Model>(self, rows: &[T]) -> Result<u64> {
        let batch = self.db.serializer.update_rows(rows)?;
        self.db.driver.batch(&batch)
    }

    pub fn delete<T: Model>(self, rows: &[T]) -> Result<u64> {
        let batch = self.db.serializer.delete_rows(rows)?;
        self.db.driver.batch(&batch)
    }
}
