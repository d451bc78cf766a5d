use relmap::model;
use tests::{models::*, *};

model! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Unmapped {
        pub id: i32,
    }
}

#[test]
fn constraint_violations_carry_the_statement() {
    let mapper = mapper();
    let (mut connection, _log) = sqlite();
    let mut db = setup(&mapper, &mut connection);

    let mut first = Token {
        pk: None,
        label: "same".to_string(),
    };
    assert_ok!(db.row().insert(&mut first));

    let mut second = first.clone();
    second.pk = None;
    let err = assert_err!(db.row().insert(&mut second));

    assert!(err.is_query_execution());
    assert!(err.root().is_driver());
    assert!(err.to_string().contains("INSERT INTO main.Token"), "{err}");
}

#[test]
fn foreign_keys_are_enforced() {
    let mapper = mapper();
    let (mut connection, _log) = sqlite();
    let mut db = setup(&mapper, &mut connection);

    let mut orphan = Child {
        pk: None,
        parent: 999,
        note: None,
    };
    let err = assert_err!(db.row().insert(&mut orphan));

    assert!(err.is_query_execution());
    assert!(err.root().is_driver());
    assert_eq!(assert_ok!(db.row().count::<Child>()), 0);
}

#[test]
fn unmapped_models_fail_before_any_statement() {
    let mapper = mapper();
    let (mut connection, log) = sqlite();
    let mut db = setup(&mapper, &mut connection);
    log.clear();

    assert_err!(db.row().select_all::<Unmapped>());
    assert_err!(db.table().create::<Unmapped>());
    assert!(log.is_empty());
}

#[test]
fn primary_key_type_is_checked() {
    let mapper = mapper();
    let (mut connection, log) = sqlite();
    let mut db = setup(&mapper, &mut connection);
    log.clear();

    let err = assert_err!(db.row().select_pk::<Parent, _>("1".to_string()));
    assert_eq!(
        err.to_string(),
        "primary key of `main.Parent` is `i32`, not `String`"
    );
    assert!(log.is_empty());
}

#[test]
fn missing_keys_select_nothing() {
    let mapper = mapper();
    let (mut connection, _log) = sqlite();
    let mut db = setup(&mapper, &mut connection);

    assert_none!(assert_ok!(db.row().select_pk::<Parent, _>(42)));
}
