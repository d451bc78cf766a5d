mod builder;
pub use builder::Builder;

mod column;
pub use column::{Column, ColumnKind};

mod decode;
pub use decode::RowDecoder;

mod def;
pub use def::{SchemaDef, TableDef, C};

mod field;
pub use field::Field;

mod mapper;
pub use mapper::Mapper;

mod model;
pub use model::{Model, ModelDescriptor, Property, Record};

mod namespace;
pub use namespace::Schema;

mod procedure;
pub use procedure::{Arg, Procedure, ProcedureId};

pub mod serializer;
pub use serializer::{Decoder, Encoder, TypeSerializer};

pub mod serializers;

mod table;
pub use table::{Table, TableId};

mod type_key;
pub use type_key::TypeKey;

mod verify;
