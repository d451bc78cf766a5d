use super::Serializer;

use relmap_core::Mapper;

/// SQL dialect a [`Serializer`] writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Postgresql,
    Sqlite,
    Mysql,
}

impl<'a> Serializer<'a> {
    pub fn sqlite(mapper: &'a Mapper) -> Serializer<'a> {
        Serializer::new(mapper, Flavor::Sqlite)
    }

    pub fn postgresql(mapper: &'a Mapper) -> Serializer<'a> {
        Serializer::new(mapper, Flavor::Postgresql)
    }

    pub fn mysql(mapper: &'a Mapper) -> Serializer<'a> {
        Serializer::new(mapper, Flavor::Mysql)
    }
}
