use pretty_assertions::assert_eq;
use relmap::{driver::Driver, stmt::Value, Db, Flavor, Serializer};
use relmap_core::driver::Capability;
use tests::{models::*, *};

struct Statements {
    insert: String,
    fallback: String,
}

fn statements(mapper: &relmap::Mapper, flavor: Flavor) -> Statements {
    let serializer = Serializer::new(mapper, flavor);
    Statements {
        insert: assert_ok!(serializer.insert_row(&Parent::new("x"))).sql,
        fallback: serializer.last_insert_id().sql,
    }
}

#[test]
fn native_keys_skip_the_fallback() {
    init_logging();
    let mapper = mapper();
    let sql = statements(&mapper, Flavor::Sqlite);

    let (connection, log) = MockConnection::new(&Capability::SQLITE);
    let mut connection = connection
        .on_update(&sql.insert, 1)
        .with_generated_keys(&sql.insert, vec![Value::I64(7)]);
    let mut db = Db::new(&mapper, Flavor::Sqlite, &mut connection);

    let mut parent = Parent::new("x");
    assert!(assert_ok!(db.row().insert(&mut parent)));
    assert_eq!(parent.pk, Some(7));
    assert_eq!(
        log.ops(),
        [
            Op::Prepare {
                sql: sql.insert.clone(),
                generated_keys: true
            },
            Op::Close {
                sql: sql.insert.clone()
            },
        ]
    );
}

#[test]
fn empty_native_keys_run_the_fallback_once() {
    init_logging();
    let mapper = mapper();
    let sql = statements(&mapper, Flavor::Sqlite);

    let (connection, log) = MockConnection::new(&Capability::SQLITE);
    let mut connection = connection
        .on_update(&sql.insert, 1)
        .with_generated_keys(&sql.insert, vec![])
        .on_query(&sql.fallback, &["last_insert_rowid()"], vec![vec![Value::I64(9)]]);
    let mut db = Db::new(&mapper, Flavor::Sqlite, &mut connection);

    let mut parent = Parent::new("x");
    assert!(assert_ok!(db.row().insert(&mut parent)));
    assert_eq!(parent.pk, Some(9));
    assert_eq!(log.count_prepared(&sql.fallback), 1);
}

#[test]
fn connections_without_native_keys_use_the_fallback() {
    init_logging();
    let mapper = mapper();
    let sql = statements(&mapper, Flavor::Postgresql);
    assert_eq!(sql.fallback, "SELECT lastval()");

    let (connection, log) = MockConnection::new(&Capability::POSTGRESQL);
    let mut connection = connection
        .on_update(&sql.insert, 1)
        .on_query(&sql.fallback, &["lastval"], vec![vec![Value::I64(3)]]);
    let mut db = Db::new(&mapper, Flavor::Postgresql, &mut connection);

    let mut parent = Parent::new("x");
    assert!(assert_ok!(db.row().insert(&mut parent)));
    assert_eq!(parent.pk, Some(3));
    assert_eq!(
        log.ops(),
        [
            Op::Prepare {
                sql: sql.insert.clone(),
                generated_keys: false
            },
            Op::Close {
                sql: sql.insert.clone()
            },
            Op::Prepare {
                sql: sql.fallback.clone(),
                generated_keys: false
            },
            Op::Close {
                sql: sql.fallback.clone()
            },
        ]
    );
}

#[test]
fn unrecoverable_key_is_an_identifier_retrieval_error() {
    init_logging();
    let mapper = mapper();
    let sql = statements(&mapper, Flavor::Sqlite);

    let (connection, log) = MockConnection::new(&Capability::SQLITE);
    let mut connection = connection
        .on_update(&sql.insert, 1)
        .on_query(&sql.fallback, &["last_insert_rowid()"], vec![]);
    let mut db = Db::new(&mapper, Flavor::Sqlite, &mut connection);

    let mut parent = Parent::new("x");
    let err = assert_err!(db.row().insert(&mut parent));
    assert!(err.is_identifier_retrieval());
    assert_eq!(parent.pk, None);
    assert_eq!(log.count_prepared(&sql.fallback), 1);
    assert!(log.statements_released());
}

#[test]
fn failing_fallback_is_the_cause() {
    init_logging();
    let mapper = mapper();
    let sql = statements(&mapper, Flavor::Postgresql);

    let (connection, log) = MockConnection::new(&Capability::POSTGRESQL);
    let mut connection = connection
        .on_update(&sql.insert, 1)
        .failing(&sql.fallback, "lastval is not yet defined in this session");
    let mut db = Db::new(&mapper, Flavor::Postgresql, &mut connection);

    let err = assert_err!(db.row().insert(&mut Parent::new("x")));
    assert!(err.is_identifier_retrieval());
    assert!(err.root().is_driver());
    assert!(err
        .to_string()
        .ends_with("lastval is not yet defined in this session"));
    assert_eq!(log.closed(), [sql.insert, sql.fallback]);
    assert!(log.statements_released());
}

#[test]
fn no_affected_rows_means_no_key() {
    init_logging();
    let mapper = mapper();
    let sql = statements(&mapper, Flavor::Sqlite);

    let (connection, log) = MockConnection::new(&Capability::SQLITE);
    let mut connection = connection
        .on_update(&sql.insert, 0)
        .with_generated_keys(&sql.insert, vec![Value::I64(1)]);
    let mut db = Db::new(&mapper, Flavor::Sqlite, &mut connection);

    let mut parent = Parent::new("x");
    assert!(!assert_ok!(db.row().insert(&mut parent)));
    assert_eq!(parent.pk, None);
    assert_eq!(log.prepared(), [sql.insert.clone()]);
    assert_eq!(log.closed(), [sql.insert]);
}

#[test]
fn driver_decodes_keys_with_the_caller_decoder() {
    init_logging();
    let mapper = mapper();
    let serializer = Serializer::sqlite(&mapper);
    let query = assert_ok!(serializer.insert_row(&Parent::new("x")));
    let fallback = serializer.last_insert_id();

    let (connection, _log) = MockConnection::new(&Capability::SQLITE);
    let mut connection = connection
        .on_update(&query.sql, 1)
        .with_generated_keys(&query.sql, vec![Value::I64(41)]);
    let mut driver = Driver::new(&mut connection);

    let key = assert_ok!(driver.insert(&query, &fallback, |row| {
        Ok(assert_some!(row.get_i64(0)?) + 1)
    }));
    assert_eq!(key, Some(42));
}
