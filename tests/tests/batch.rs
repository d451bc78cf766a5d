use pretty_assertions::assert_eq;
use relmap::BATCH_CHUNK_SIZE;
use tests::{models::*, *};

fn parents(n: usize) -> Vec<Parent> {
    (0..n).map(|i| Parent::new(format!("parent {i}"))).collect()
}

#[test]
fn inserts_are_chunked() {
    assert_eq!(BATCH_CHUNK_SIZE, 1000);

    let mapper = mapper();
    let cases = [
        (999, vec![999]),
        (1000, vec![1000]),
        (1001, vec![1000, 1]),
        (2000, vec![1000, 1000]),
        (2500, vec![1000, 1000, 500]),
    ];

    for (rows, chunks) in cases {
        let (mut connection, log) = sqlite();
        let mut db = setup(&mapper, &mut connection);
        log.clear();

        assert_eq!(assert_ok!(db.batch().insert(&parents(rows))), rows as u64);
        assert_eq!(log.batches(), chunks, "rows={rows}");
        assert_eq!(
            log.count_prepared("INSERT INTO main.Parent (value) VALUES (?)"),
            1
        );
        assert_eq!(assert_ok!(db.row().count::<Parent>()), rows as u64);
    }
}

#[test]
fn batch_total_matches_single_row_execution() {
    let mapper = mapper();
    let rows = parents(2500);

    let (mut connection, _log) = sqlite();
    let mut db = setup(&mapper, &mut connection);
    let batched = assert_ok!(db.batch().insert(&rows));

    let (mut connection, _log) = sqlite();
    let mut db = setup(&mapper, &mut connection);
    let mut one_by_one = 0;
    for mut row in rows {
        if assert_ok!(db.row().insert(&mut row)) {
            one_by_one += 1;
        }
    }

    assert_eq!(batched, one_by_one);
}

#[test]
fn updates_and_deletes_are_batched() {
    let mapper = mapper();
    let (mut connection, log) = sqlite();
    let mut db = setup(&mapper, &mut connection);

    assert_eq!(assert_ok!(db.batch().insert(&parents(1500))), 1500);

    let mut rows = assert_ok!(db.row().select_all::<Parent>());
    for row in &mut rows {
        row.value.push_str(" (edited)");
    }

    log.clear();
    assert_eq!(assert_ok!(db.batch().update(&rows)), 1500);
    assert_eq!(log.batches(), [1000, 500]);

    let reloaded = assert_ok!(db.row().select_all::<Parent>());
    assert!(reloaded.iter().all(|row| row.value.ends_with(" (edited)")));

    assert_eq!(assert_ok!(db.batch().delete(&rows[..1200])), 1200);
    assert_eq!(assert_ok!(db.row().count::<Parent>()), 300);
}

#[test]
fn empty_batches_do_nothing() {
    let mapper = mapper();
    let (mut connection, log) = sqlite();
    let mut db = setup(&mapper, &mut connection);
    log.clear();

    assert_eq!(assert_ok!(db.batch().insert::<Parent>(&[])), 0);
    assert!(log.is_empty());
}
