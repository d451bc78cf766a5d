#[macro_use]
mod macros;

pub mod driver;
pub use driver::Connection;

mod error;
pub use error::{Error, IntoError, SchemaRule, Violation};

pub mod schema;
pub use schema::{Mapper, Model};

pub mod stmt;

/// A Result type alias that uses relmap's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
