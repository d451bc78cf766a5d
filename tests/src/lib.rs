mod exec_log;
pub use exec_log::{ExecLog, Op};

mod logging_connection;
pub use logging_connection::LoggingConnection;

mod mock;
pub use mock::{MockConnection, MockResult};

pub mod models;

pub use std_util::*;

use relmap::{Db, Flavor, Mapper};

/// Routes `log` output through the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// An in-memory SQLite connection that records every statement it prepares.
pub fn sqlite() -> (LoggingConnection, ExecLog) {
    init_logging();
    let connection = relmap_driver_sqlite::Sqlite::in_memory()
        .connect()
        .expect("failed to open in-memory SQLite database");
    LoggingConnection::new(Box::new(connection))
}

/// Creates every table of `models::mapper()` on a fresh in-memory database.
pub fn setup<'a>(mapper: &'a Mapper, connection: &'a mut LoggingConnection) -> Db<'a> {
    let mut db = Db::new(mapper, Flavor::Sqlite, connection);
    models::create_all(&mut db).expect("failed to create tables");
    db
}
