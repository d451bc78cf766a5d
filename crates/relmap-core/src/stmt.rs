mod query;
pub use query::{BatchQuery, Query, QueryParameter};

mod value;
pub use value::Value;

mod wire_type;
pub use wire_type::WireType;
