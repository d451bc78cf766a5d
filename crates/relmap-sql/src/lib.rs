pub mod serializer;
pub use serializer::{Flavor, QueryBuilder, Serializer};
