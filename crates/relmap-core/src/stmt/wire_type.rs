/// The low-level parameter type a driver binds a value as.
///
/// Drivers need it to bind typed `NULL`s, and strongly typed databases use it to
/// pick the parameter's declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    Boolean,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    Char,
    Varchar,
    Text,
    Blob,
}

impl core::fmt::Display for WireType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let name = match self {
            WireType::Boolean => "BOOLEAN",
            WireType::SmallInt => "SMALLINT",
            WireType::Integer => "INTEGER",
            WireType::BigInt => "BIGINT",
            WireType::Real => "REAL",
            WireType::Double => "DOUBLE",
            WireType::Char => "CHAR",
            WireType::Varchar => "VARCHAR",
            WireType::Text => "TEXT",
            WireType::Blob => "BLOB",
        };
        f.write_str(name)
    }
}
