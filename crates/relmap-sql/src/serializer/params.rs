use super::{Flavor, Formatter, ToSql};

use relmap_core::stmt::QueryParameter;
use std::fmt::Write;

/// A positional placeholder for the next parameter of the statement.
pub(super) struct Placeholder;

/// A placeholder together with the parameter it binds.
pub(super) struct Param(pub(super) QueryParameter);

impl ToSql for Placeholder {
    fn to_sql(self, f: &mut Formatter<'_>) {
        f.placeholders += 1;

        match f.serializer.flavor {
            Flavor::Sqlite | Flavor::Mysql => f.dst.push('?'),
            Flavor::Postgresql => {
                let _ = write!(f.dst, "${}", f.placeholders);
            }
        }
    }
}

impl ToSql for Param {
    fn to_sql(self, f: &mut Formatter<'_>) {
        f.params.push(self.0);
        Placeholder.to_sql(f);
    }
}
