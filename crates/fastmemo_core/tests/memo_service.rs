use fastmemo_core::db::{open_db, open_db_in_memory};
use fastmemo_core::relation;
use fastmemo_core::{
    Memo, MemoPatch, MemoService, MemoServiceError, NewMemo, SqliteMemoRepository,
};
use rusqlite::{params, Connection};

const U1: &str = "U1";
const U2: &str = "U2";

fn new_memo(title: &str, content: &str, related: &[&str]) -> NewMemo {
    NewMemo {
        title: title.to_string(),
        content: content.to_string(),
        related_memo_ids: related.iter().map(|id| id.to_string()).collect(),
    }
}

fn service(conn: &Connection) -> MemoService<SqliteMemoRepository<'_>> {
    MemoService::new(SqliteMemoRepository::try_new(conn).unwrap())
}

fn stored_relations(conn: &Connection, id: &str) -> String {
    conn.query_row(
        "SELECT related_memo_ids FROM memos WHERE id = ?1;",
        [id],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn create_then_get_returns_fields_and_relations() {
    let conn = open_db_in_memory().unwrap();
    let memos = service(&conn);

    let created = memos.create_memo(U1, new_memo("T", "C", &["a", "b"])).unwrap();
    assert_eq!(created.owner_id, U1);
    assert_eq!(created.related_memo_ids, vec!["a", "b"]);
    assert_eq!(created.created_at, created.updated_at);
    assert_eq!(stored_relations(&conn, &created.id), "a,b");

    let loaded = memos.get_memo(U1, &created.id).unwrap();
    assert_eq!(loaded.title, "T");
    assert_eq!(loaded.content, "C");
    assert_eq!(loaded.related_memo_ids, vec!["a", "b"]);
    assert_eq!(loaded, created);
}

#[test]
fn create_without_relations_stores_empty_text_and_returns_empty_list() {
    let conn = open_db_in_memory().unwrap();
    let memos = service(&conn);

    let created = memos.create_memo(U1, new_memo("solo", "", &[])).unwrap();
    assert!(created.related_memo_ids.is_empty());
    assert_eq!(stored_relations(&conn, &created.id), "");
}

#[test]
fn create_rejects_empty_title_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let memos = service(&conn);

    let err = memos.create_memo(U1, new_memo("", "body", &[])).unwrap_err();
    assert!(matches!(err, MemoServiceError::Validation(_)));
    assert!(memos.list_memos(U1, None).unwrap().is_empty());
}

#[test]
fn created_ids_are_unique() {
    let conn = open_db_in_memory().unwrap();
    let memos = service(&conn);

    let first = memos.create_memo(U1, new_memo("one", "", &[])).unwrap();
    let second = memos.create_memo(U1, new_memo("two", "", &[])).unwrap();
    assert_ne!(first.id, second.id);
}

#[test]
fn other_owner_gets_not_found() {
    let conn = open_db_in_memory().unwrap();
    let memos = service(&conn);
    let created = memos.create_memo(U1, new_memo("T", "C", &[])).unwrap();

    let err = memos.get_memo(U2, &created.id).unwrap_err();
    assert!(matches!(err, MemoServiceError::NotFound(ref id) if id == &created.id));

    let missing = memos.get_memo(U1, "no-such-memo").unwrap_err();
    assert!(matches!(missing, MemoServiceError::NotFound(_)));
    assert_eq!(err.to_string(), format!("memo not found: {}", created.id));
}

#[test]
fn other_owner_cannot_update_or_delete() {
    let conn = open_db_in_memory().unwrap();
    let memos = service(&conn);
    let created = memos.create_memo(U1, new_memo("T", "C", &["a"])).unwrap();

    let patch = MemoPatch {
        title: Some("hijacked".to_string()),
        ..MemoPatch::default()
    };
    let err = memos.update_memo(U2, &created.id, patch).unwrap_err();
    assert!(matches!(err, MemoServiceError::NotFound(_)));

    let err = memos.delete_memo(U2, &created.id).unwrap_err();
    assert!(matches!(err, MemoServiceError::NotFound(_)));

    assert_eq!(memos.get_memo(U1, &created.id).unwrap(), created);
}

#[test]
fn list_is_scoped_to_owner() {
    let conn = open_db_in_memory().unwrap();
    let memos = service(&conn);
    memos.create_memo(U1, new_memo("mine", "", &[])).unwrap();
    memos.create_memo(U2, new_memo("theirs", "", &[])).unwrap();

    let listed = memos.list_memos(U1, None).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "mine");
}

#[test]
fn update_with_empty_relation_list_clears_relations_only() {
    let conn = open_db_in_memory().unwrap();
    let memos = service(&conn);
    let created = memos.create_memo(U1, new_memo("T", "C", &["a", "b"])).unwrap();

    let patch = MemoPatch {
        title: None,
        content: None,
        related_memo_ids: Some(Vec::new()),
    };
    let updated = memos.update_memo(U1, &created.id, patch).unwrap();
    assert!(updated.related_memo_ids.is_empty());
    assert_eq!(updated.title, "T");
    assert_eq!(updated.content, "C");

    let loaded = memos.get_memo(U1, &created.id).unwrap();
    assert!(loaded.related_memo_ids.is_empty());
    assert_eq!(loaded.title, "T");
    assert_eq!(stored_relations(&conn, &created.id), "");
}

#[test]
fn update_applies_only_supplied_fields() {
    let conn = open_db_in_memory().unwrap();
    let memos = service(&conn);
    let created = memos.create_memo(U1, new_memo("T", "C", &["a"])).unwrap();

    let patch = MemoPatch {
        content: Some("new body".to_string()),
        ..MemoPatch::default()
    };
    let updated = memos.update_memo(U1, &created.id, patch).unwrap();
    assert_eq!(updated.title, "T");
    assert_eq!(updated.content, "new body");
    assert_eq!(updated.related_memo_ids, vec!["a"]);
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(updated.created_at, created.created_at);
}

#[test]
fn update_with_empty_title_fails_and_keeps_stored_memo() {
    let conn = open_db_in_memory().unwrap();
    let memos = service(&conn);
    let created = memos.create_memo(U1, new_memo("T", "C", &["a"])).unwrap();

    let patch = MemoPatch {
        title: Some(String::new()),
        content: Some("should not land".to_string()),
        related_memo_ids: None,
    };
    let err = memos.update_memo(U1, &created.id, patch).unwrap_err();
    assert!(matches!(err, MemoServiceError::Validation(_)));
    assert_eq!(memos.get_memo(U1, &created.id).unwrap(), created);
}

#[test]
fn update_without_fields_returns_current_memo_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let memos = service(&conn);
    let created = memos.create_memo(U1, new_memo("T", "C", &["a"])).unwrap();
    conn.execute(
        "UPDATE memos SET updated_at = 1000 WHERE id = ?1;",
        params![created.id],
    )
    .unwrap();

    let unchanged = memos
        .update_memo(U1, &created.id, MemoPatch::default())
        .unwrap();
    assert_eq!(unchanged.updated_at, 1000);

    let same_values = MemoPatch {
        title: Some("T".to_string()),
        related_memo_ids: Some(vec!["a".to_string()]),
        ..MemoPatch::default()
    };
    let unchanged = memos.update_memo(U1, &created.id, same_values).unwrap();
    assert_eq!(unchanged.updated_at, 1000);
}

#[test]
fn update_bumps_last_modified_on_change() {
    let conn = open_db_in_memory().unwrap();
    let memos = service(&conn);
    let created = memos.create_memo(U1, new_memo("T", "C", &[])).unwrap();
    conn.execute(
        "UPDATE memos SET updated_at = 1000 WHERE id = ?1;",
        params![created.id],
    )
    .unwrap();

    let patch = MemoPatch {
        related_memo_ids: Some(vec!["x".to_string(), "y".to_string()]),
        ..MemoPatch::default()
    };
    let updated = memos.update_memo(U1, &created.id, patch).unwrap();
    assert!(updated.updated_at > 1000);
    assert_eq!(updated.related_memo_ids, vec!["x", "y"]);
    assert_eq!(stored_relations(&conn, &created.id), "x,y");
}

#[test]
fn update_of_missing_memo_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let memos = service(&conn);

    let patch = MemoPatch {
        title: Some("x".to_string()),
        ..MemoPatch::default()
    };
    let err = memos.update_memo(U1, "missing", patch).unwrap_err();
    assert!(matches!(err, MemoServiceError::NotFound(_)));
}

#[test]
fn delete_is_terminal() {
    let conn = open_db_in_memory().unwrap();
    let memos = service(&conn);
    let created = memos.create_memo(U1, new_memo("T", "C", &[])).unwrap();

    let ack = memos.delete_memo(U1, &created.id).unwrap();
    assert_eq!(ack.id, created.id);

    let err = memos.get_memo(U1, &created.id).unwrap_err();
    assert!(matches!(err, MemoServiceError::NotFound(_)));

    let err = memos.delete_memo(U1, &created.id).unwrap_err();
    assert!(matches!(err, MemoServiceError::NotFound(_)));
}

#[test]
fn keyword_search_matches_title_or_content_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let memos = service(&conn);

    let first = memos
        .create_memo(U1, new_memo("First Test Memo", "Contains Alpha keyword", &[]))
        .unwrap();
    let second = memos
        .create_memo(U1, new_memo("Second Alpha Memo", "Plain body", &[]))
        .unwrap();
    memos
        .create_memo(U1, new_memo("Third Memo", "Talks about Bravo", &[]))
        .unwrap();
    memos
        .create_memo(U1, new_memo("Unique Content", "Only Charlie here", &[]))
        .unwrap();
    memos
        .create_memo(U2, new_memo("Alpha of someone else", "", &[]))
        .unwrap();

    let hits = memos.list_memos(U1, Some("Alpha")).unwrap();
    let ids: Vec<&str> = hits.iter().map(|memo| memo.id.as_str()).collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);

    let lowercase = memos.search_memos(U1, "alpha").unwrap();
    assert_eq!(lowercase.len(), 2);
}

#[test]
fn list_orders_by_creation_time_descending() {
    let conn = open_db_in_memory().unwrap();
    let memos = service(&conn);
    let older = memos.create_memo(U1, new_memo("older", "", &[])).unwrap();
    let newer = memos.create_memo(U1, new_memo("newer", "", &[])).unwrap();

    conn.execute(
        "UPDATE memos SET created_at = 2000 WHERE id = ?1;",
        params![older.id],
    )
    .unwrap();
    conn.execute(
        "UPDATE memos SET created_at = 1000 WHERE id = ?1;",
        params![newer.id],
    )
    .unwrap();

    let listed: Vec<Memo> = memos.list_memos(U1, None).unwrap();
    assert_eq!(listed[0].id, older.id);
    assert_eq!(listed[1].id, newer.id);
}

#[test]
fn blank_search_keyword_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let memos = service(&conn);
    memos.create_memo(U1, new_memo("T", "C", &[])).unwrap();

    for keyword in ["", "   "] {
        let err = memos.list_memos(U1, Some(keyword)).unwrap_err();
        assert!(matches!(err, MemoServiceError::Validation(_)));
        let err = memos.search_memos(U1, keyword).unwrap_err();
        assert!(matches!(err, MemoServiceError::Validation(_)));
    }
}

#[test]
fn keyword_wildcards_match_literally() {
    let conn = open_db_in_memory().unwrap();
    let memos = service(&conn);
    memos.create_memo(U1, new_memo("50% off", "", &[])).unwrap();
    memos.create_memo(U1, new_memo("500 items", "", &[])).unwrap();
    memos.create_memo(U1, new_memo("snake_case", "", &[])).unwrap();
    memos.create_memo(U1, new_memo("snakeXcase", "", &[])).unwrap();

    let percent = memos.search_memos(U1, "50%").unwrap();
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].title, "50% off");

    let underscore = memos.search_memos(U1, "e_c").unwrap();
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].title, "snake_case");
}

#[test]
fn relation_round_trip_through_storage_preserves_order_and_duplicates() {
    let conn = open_db_in_memory().unwrap();
    let memos = service(&conn);
    let related = ["c", "a", "c", "b"];

    let created = memos.create_memo(U1, new_memo("rel", "", &related)).unwrap();
    let loaded = memos.get_memo(U1, &created.id).unwrap();
    assert_eq!(loaded.related_memo_ids, related);
    assert_eq!(relation::decode(&relation::encode(&related)), related);
}

// No optimistic concurrency token exists: two writers to the same memo
// each succeed and the later write is what remains.
#[test]
fn concurrent_writers_are_last_writer_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memo_app.db");
    let conn_a = open_db(&path).unwrap();
    let conn_b = open_db(&path).unwrap();
    let writer_a = service(&conn_a);
    let writer_b = service(&conn_b);

    let created = writer_a.create_memo(U1, new_memo("T", "C", &[])).unwrap();

    let from_a = MemoPatch {
        title: Some("from a".to_string()),
        ..MemoPatch::default()
    };
    let from_b = MemoPatch {
        title: Some("from b".to_string()),
        ..MemoPatch::default()
    };
    writer_a.update_memo(U1, &created.id, from_a).unwrap();
    writer_b.update_memo(U1, &created.id, from_b).unwrap();

    assert_eq!(writer_a.get_memo(U1, &created.id).unwrap().title, "from b");
}
