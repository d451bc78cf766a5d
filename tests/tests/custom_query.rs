use pretty_assertions::assert_eq;
use tests::{models::*, *};

fn seed(db: &mut relmap::Db<'_>) -> Vec<i32> {
    let mut pks = vec![];
    for (value, children) in [("a", 2), ("b", 0), ("c", 1)] {
        let mut parent = Parent::new(value);
        assert_ok!(db.row().insert(&mut parent));
        let pk = assert_some!(parent.pk);

        for i in 0..children {
            let mut child = Child {
                pk: None,
                parent: pk,
                note: Some(format!("{value}{i}")),
            };
            assert_ok!(db.row().insert(&mut child));
        }
        pks.push(pk);
    }
    pks
}

#[test]
fn predicate_with_bound_value() {
    let mapper = mapper();
    let (mut connection, log) = sqlite();
    let mut db = setup(&mapper, &mut connection);
    let pks = seed(&mut db);
    log.clear();

    let children: Vec<Child> = assert_ok!(db.run().query(|q| {
        format!(
            "SELECT * FROM {} WHERE {} = {} ORDER BY {}",
            q.table::<Child>(),
            q.column::<Child>("parent"),
            q.value(pks[0]),
            q.column::<Child>("pk"),
        )
    }));

    let notes: Vec<_> = children.iter().map(|c| c.note.as_deref()).collect();
    assert_eq!(notes, [Some("a0"), Some("a1")]);
    assert_eq!(
        log.prepared(),
        ["SELECT * FROM main.Child WHERE parent = ? ORDER BY pk"]
    );
}

#[test]
fn aggregate_into_an_output_type() {
    let mapper = mapper();
    let (mut connection, _log) = sqlite();
    let mut db = setup(&mapper, &mut connection);
    let pks = seed(&mut db);

    let summaries: Vec<Summary> = assert_ok!(db.run().query(|q| {
        format!(
            "SELECT {parent}, COUNT(*) AS children FROM {} GROUP BY {parent} ORDER BY {parent}",
            q.table::<Child>(),
            parent = q.column::<Child>("parent"),
        )
    }));

    assert_eq!(
        summaries,
        [
            Summary {
                parent: pks[0],
                children: 2
            },
            Summary {
                parent: pks[2],
                children: 1
            },
        ]
    );
}

#[test]
fn input_properties_become_parameters() {
    let mapper = mapper();
    let (mut connection, _log) = sqlite();
    let mut db = setup(&mapper, &mut connection);
    seed(&mut db);

    let input = ByValue {
        value: "b".to_string(),
    };
    let parents: Vec<Parent> = assert_ok!(db.run().query_with(&input, |q| {
        format!(
            "SELECT * FROM {} WHERE {} = {}",
            q.table::<Parent>(),
            q.column::<Parent>("value"),
            q.input("value"),
        )
    }));
    assert_eq!(parents.len(), 1);
    assert_eq!(parents[0].value, "b");
}

#[test]
fn custom_updates_report_affected_rows() {
    let mapper = mapper();
    let (mut connection, _log) = sqlite();
    let mut db = setup(&mapper, &mut connection);
    seed(&mut db);

    let updated = assert_ok!(db.run().update(|q| {
        format!(
            "UPDATE {} SET {} = {}",
            q.table::<Child>(),
            q.column::<Child>("note"),
            q.value(None::<String>),
        )
    }));
    assert_eq!(updated, 3);

    let children = assert_ok!(db.row().select_all::<Child>());
    assert!(children.iter().all(|child| child.note.is_none()));
}

#[test]
fn builder_errors_surface_before_execution() {
    let mapper = mapper();
    let (mut connection, log) = sqlite();
    let mut db = setup(&mapper, &mut connection);
    log.clear();

    let err = assert_err!(db.run().query::<Parent>(|q| {
        format!("SELECT {} FROM {}", q.column::<Parent>("missing"), q.table::<Parent>())
    }));
    assert_eq!(err.to_string(), "table `main.Parent` has no column `missing`");
    assert!(log.is_empty());
}

#[test]
fn rows_missing_a_required_column_fail_to_map() {
    let mapper = mapper();
    let (mut connection, _log) = sqlite();
    let mut db = setup(&mapper, &mut connection);
    seed(&mut db);

    let err = assert_err!(db.run().query::<Parent>(|q| {
        format!("SELECT {} FROM {}", q.column::<Parent>("pk"), q.table::<Parent>())
    }));
    assert!(err.is_mapping());
    assert_eq!(
        err.to_string(),
        "cannot map row to `Parent`: result set has no column for property `value`"
    );
}
