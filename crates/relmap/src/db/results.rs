use super::decode_all;
use relmap_core::{driver::ResultSet, Mapper, Model, Result};

/// One result set of a multi-result execution.
pub struct Results<'r> {
    mapper: &'r Mapper,
    results: &'r mut dyn ResultSet,
}

impl<'r> Results<'r> {
    pub(super) fn new(mapper: &'r Mapper, results: &'r mut dyn ResultSet) -> Self {
        Self { mapper, results }
    }

    pub fn columns(&self) -> &[String] {
        self.results.columns()
    }

    /// Decodes every remaining row into `O`.
    pub fn decode<O: Model>(self) -> Result<Vec<O>> {
        decode_all(self.mapper, self.results)
    }
}

impl core::fmt::Debug for Results<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("Results")
            .field("columns", &self.results.columns())
            .finish()
    }
}
