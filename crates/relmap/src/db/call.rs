use super::{Db, Results};
use relmap_core::{Model, Result};

/// Stored procedure calls, see [`Db::call`].
#[derive(Debug)]
pub struct Call<'db, 'a> {
    pub(super) db: &'db mut Db<'a>,
}

impl Call<'_, '_> {
    /// Calls the procedure bound to `P` with `procedure`'s properties as arguments.
    ///
    /// Every result set the call yields is handed to `f` with its ordinal; the
    /// outputs are returned in the order the database produced them.
    pub fn procedure<P: Model, T>(
        self,
        procedure: &P,
        mut f: impl FnMut(usize, Results<'_>) -> Result<T>,
    ) -> Result<Vec<T>> {
        let query = self.db.serializer.call_procedure(procedure)?;
        let mapper = self.db.serializer.mapper();
        self.db.driver.call(&query, |ordinal, results| {
            f(ordinal, Results::new(mapper, results))
        })
    }
}
