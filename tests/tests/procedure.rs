use pretty_assertions::assert_eq;
use relmap::{
    model, serializers,
    stmt::{Query, Value},
    Db, Flavor, Mapper, SchemaDef, Serializer,
};
use relmap_core::driver::Capability;
use tests::{models::*, *};

model! {
    pub struct Vacuum {}
}

#[test]
fn results_are_decoded_by_ordinal() {
    init_logging();
    let mapper = mapper();
    let input = AddParent {
        value: "x".to_string(),
    };
    let call = assert_ok!(Serializer::postgresql(&mapper).call_procedure(&input)).sql;

    let (connection, log) = MockConnection::new(&Capability::POSTGRESQL);
    let connection = connection.on_execute(
        &call,
        vec![
            MockResult::rows(&["pk", "value"], vec![vec![Value::I32(1), Value::from("x")]]),
            MockResult::Count(1),
            MockResult::rows(
                &["parent", "children"],
                vec![
                    vec![Value::I32(1), Value::I64(0)],
                    vec![Value::I32(2), Value::I64(4)],
                ],
            ),
        ],
    );
    let bound = connection.bound();
    let mut connection = connection;
    let mut db = Db::new(&mapper, Flavor::Postgresql, &mut connection);

    #[derive(Debug, PartialEq)]
    enum Output {
        Parents(Vec<Parent>),
        Summaries(Vec<Summary>),
    }

    let outputs = assert_ok!(db.call().procedure(&input, |ordinal, results| match ordinal {
        0 => Ok(Output::Parents(results.decode()?)),
        _ => Ok(Output::Summaries(results.decode()?)),
    }));

    assert_eq!(
        outputs,
        [
            Output::Parents(vec![Parent {
                pk: Some(1),
                value: "x".to_string()
            }]),
            Output::Summaries(vec![
                Summary {
                    parent: 1,
                    children: 0
                },
                Summary {
                    parent: 2,
                    children: 4
                },
            ]),
        ]
    );

    assert_eq!(
        log.ops(),
        [
            Op::PrepareCall { sql: call.clone() },
            Op::Close { sql: call }
        ]
    );
    assert_eq!(*bound.lock().unwrap(), [vec![Value::from("x")]]);
}

#[test]
fn update_counts_alone_yield_nothing() {
    init_logging();
    let mut builder = Mapper::builder();
    builder
        .serializers(serializers::postgresql())
        .schema(SchemaDef::new("app"))
        .procedure::<Vacuum>();
    let mapper = assert_ok!(builder.build());

    let call = assert_ok!(Serializer::postgresql(&mapper).call_procedure(&Vacuum {}));
    assert_eq!(call.sql, r#"CALL "Vacuum"()"#);
    assert!(call.params.is_empty());

    let (connection, _log) = MockConnection::new(&Capability::POSTGRESQL);
    let mut connection = connection.on_execute(&call.sql, vec![MockResult::Count(0)]);
    let mut db = Db::new(&mapper, Flavor::Postgresql, &mut connection);

    let outputs = assert_ok!(db
        .call()
        .procedure(&Vacuum {}, |_, results| Ok(results.columns().len())));
    assert!(outputs.is_empty());
}

#[test]
fn sqlite_has_no_procedures() {
    let mapper = mapper();
    let (mut connection, log) = sqlite();
    let mut db = setup(&mapper, &mut connection);
    log.clear();

    let input = AddParent {
        value: "x".to_string(),
    };
    let err = assert_err!(db.call().procedure(&input, |_, _| Ok(())));
    assert!(err.is_unsupported_feature());
    assert!(log.is_empty());
}

#[test]
fn scripts_run_through_the_multi_result_path() {
    let mapper = mapper();
    let (mut connection, _log) = sqlite();
    let mut db = setup(&mapper, &mut connection);

    for value in ["a", "b"] {
        assert_ok!(db.row().insert(&mut Parent::new(value)));
    }

    let outputs = assert_ok!(db.run().execute(
        "SELECT pk, value FROM main.Parent ORDER BY pk",
        |ordinal, results| Ok((ordinal, results.decode::<Parent>()?.len()))
    ));
    assert_eq!(outputs, [(0, 2)]);

    let outputs = assert_ok!(db
        .run()
        .execute("DELETE FROM main.Parent", |_, _| Ok(())));
    assert!(outputs.is_empty());
    assert_eq!(assert_ok!(db.row().count::<Parent>()), 0);

    let counted = assert_ok!(db.driver().execute(&Query::raw("SELECT 1 AS one"), |_, results| {
        Ok(results.columns().to_vec())
    }));
    assert_eq!(counted, [vec!["one".to_string()]]);
}
