//! End-to-end flows through the public API, the way the HTTP layer uses it.

use std::sync::Arc;

use content_store::{
    ContentStore, FrequencyOrder, SqliteRepository, StoreError, TextAnalytics,
    Upsert,
};
use data_digest::ContentDigest;

fn fresh_store() -> ContentStore {
    ContentStore::new(Arc::new(
        SqliteRepository::open_in_memory().expect("in-memory database"),
    ))
}

#[test]
fn upload_list_delete_lifecycle() {
    let store = fresh_store();

    let records = store
        .add_many(vec![
            ("alpha.txt".to_owned(), b"a b c".to_vec()),
            ("beta.txt".to_owned(), b"d e".to_vec()),
        ])
        .unwrap();
    assert_eq!(records.len(), 2);

    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].name, "alpha.txt");
    assert_eq!(listed[0].digest, ContentDigest::from_bytes(b"a b c"));

    store.remove_by_content(b"a b c").unwrap();
    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "beta.txt");

    let err = store.remove_by_content(b"a b c").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn analytics_track_store_mutations() {
    let store = fresh_store();
    let analytics = TextAnalytics::new(store.clone());

    store.add("alpha.txt", b"a b c").unwrap();
    store.add("beta.txt", b"d e").unwrap();
    assert_eq!(analytics.word_count().unwrap(), 5);

    // Replacing content through the upsert path is reflected immediately.
    let outcome = store.upsert_by_name("beta.txt", b"a a a").unwrap();
    assert!(matches!(outcome, Upsert::Updated(_)));
    assert_eq!(analytics.word_count().unwrap(), 6);
    assert_eq!(
        analytics.frequency(1, FrequencyOrder::Dsc).unwrap(),
        vec!["a"]
    );
}

#[test]
fn upsert_then_upsert_leaves_single_fresh_record() {
    let store = fresh_store();

    store.upsert_by_name("report.txt", b"first draft").unwrap();
    store.upsert_by_name("report.txt", b"final text").unwrap();

    let record = store.find_by_name("report.txt").unwrap();
    assert_eq!(record.content, b"final text");
    assert_eq!(record.digest, ContentDigest::from_bytes(b"final text"));
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn find_by_name_reports_missing_names() {
    let store = fresh_store();
    let err = store.find_by_name("ghost.txt").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}
