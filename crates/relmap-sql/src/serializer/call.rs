use super::{Comma, Flavor, Param, ProcedureName, Serializer, ToSql};

use relmap_core::{
    schema::Model,
    stmt::{Query, QueryParameter},
    Error, Result,
};

impl<'a> Serializer<'a> {
    /// `CALL` for the procedure bound to `P`, arguments in declaration order.
    ///
    /// Marker procedures are called with an empty argument list.
    pub fn call_procedure<P: Model>(&self, procedure: &P) -> Result<Query> {
        let descriptor = self.mapper.procedure::<P>()?;

        if self.flavor == Flavor::Sqlite {
            return Err(Error::unsupported_feature(format!(
                "calling procedure `{}`: SQLite has no stored procedures",
                descriptor.path()
            )));
        }

        let mut params = Vec::with_capacity(descriptor.args.len());
        for arg in &descriptor.args {
            let Some(value) = procedure.get(&arg.name) else {
                relmap_core::bail!("`{}` has no property `{}`", descriptor.name, arg.name);
            };
            params.push(Param(QueryParameter::new(&arg.name, value, &arg.serializer())));
        }

        let mut f = self.formatter();
        fmt!(
            &mut f,
            "CALL ",
            ProcedureName(descriptor),
            "(",
            Comma(params),
            ")"
        );
        Ok(f.into_query())
    }
}
