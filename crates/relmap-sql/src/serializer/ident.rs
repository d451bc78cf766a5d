use super::{Flavor, Formatter, ToSql};

pub(super) struct Ident<S>(pub(super) S);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let name = self.0.as_ref();
        match f.serializer.flavor {
            Flavor::Sqlite => f.dst.push_str(name),
            Flavor::Postgresql => quote(&mut f.dst, '"', name),
            Flavor::Mysql => quote(&mut f.dst, '`', name),
        }
    }
}

fn quote(dst: &mut String, quote: char, name: &str) {
    dst.push(quote);
    for c in name.chars() {
        if c == quote {
            dst.push(quote);
        }
        dst.push(c);
    }
    dst.push(quote);
}
