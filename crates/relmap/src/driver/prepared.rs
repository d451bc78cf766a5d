use relmap_core::driver::Statement;
use std::ops::{Deref, DerefMut};

/// A prepared statement released when the guard goes out of scope.
pub(super) struct Prepared<'a> {
    statement: Box<dyn Statement + 'a>,
}

impl<'a> Prepared<'a> {
    pub(super) fn new(statement: Box<dyn Statement + 'a>) -> Self {
        Self { statement }
    }
}

impl<'a> Deref for Prepared<'a> {
    type Target = dyn Statement + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.statement
    }
}

impl DerefMut for Prepared<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.statement
    }
}

impl Drop for Prepared<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.statement.close() {
            log::warn!("failed to release statement; err={err}");
        }
    }
}
