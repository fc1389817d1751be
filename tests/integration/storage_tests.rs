//! Store behavior under concurrent async callers

use quote_harvest::storage::{
    InsertOutcome, LogLevel, QuoteRecord, QuoteTagLink, SqliteStore, Store, UpdateOutcome,
    UserRecord,
};
use std::sync::Arc;
use tempfile::TempDir;

fn open_store(dir: &TempDir) -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open(&dir.path().join("quotes.db")).unwrap())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_tag_and_author_inserts() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let mut handles = Vec::new();
    for _ in 0..16 {
        let store = Arc::clone(&store);
        handles.push(tokio::task::spawn_blocking(move || {
            let tag = store.insert_tag("inspirational").unwrap();
            let author = store.insert_author("Marilyn Monroe").unwrap();
            (tag, author)
        }));
    }

    let mut tags_inserted = 0;
    let mut authors_inserted = 0;
    for handle in handles {
        let (tag, author) = handle.await.unwrap();
        tags_inserted += usize::from(tag == InsertOutcome::Inserted);
        authors_inserted += usize::from(author == InsertOutcome::Inserted);
    }

    assert_eq!(tags_inserted, 1);
    assert_eq!(authors_inserted, 1);
    let counts = store.table_counts().unwrap();
    assert_eq!(counts.tags, 1);
    assert_eq!(counts.authors, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_quotes_share_author() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let mut handles = Vec::new();
    for i in 0..20 {
        let store = Arc::clone(&store);
        handles.push(tokio::task::spawn_blocking(move || {
            store.insert_tag("humor").unwrap();
            store.insert_author("Mark Twain").unwrap();
            let quote = QuoteRecord {
                id: uuid::Uuid::new_v4().to_string(),
                text: format!("Quip {}", i),
                author: "Mark Twain".to_string(),
            };
            store.insert_quote(&quote).unwrap();
            store
                .insert_quote_tag(&QuoteTagLink {
                    quote_id: quote.id,
                    tag: "humor".to_string(),
                })
                .unwrap()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), InsertOutcome::Inserted);
    }

    let counts = store.table_counts().unwrap();
    assert_eq!(counts.quotes, 20);
    assert_eq!(counts.authors, 1);
    assert_eq!(counts.quote_tags, 20);
}

#[tokio::test]
async fn test_user_lifecycle() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    let id = uuid::Uuid::new_v4().to_string();

    let user = UserRecord {
        id: id.clone(),
        stripe_id: None,
        email: "dev@example.com".to_string(),
        fullname: None,
        password: "$argon2id$first".to_string(),
        access: true,
    };
    assert!(store.insert_user(&user).unwrap().is_inserted());

    assert_eq!(
        store.toggle_user_access(&id).unwrap(),
        UpdateOutcome::Updated(false)
    );
    assert!(store
        .change_user_password(&id, "$argon2id$second")
        .unwrap()
        .is_updated());
    store
        .record_api_log("dev@example.com", LogLevel::Warning, "access revoked")
        .unwrap();

    let stored = store.get_user(&id).unwrap().unwrap();
    assert!(!stored.access);
    assert_eq!(stored.password, "$argon2id$second");
    assert_eq!(store.table_counts().unwrap().api_logs, 1);
}
