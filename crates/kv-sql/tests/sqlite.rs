//! Integration tests for the SQLite connection.

use pairs_kv::{
    GetManyOptions, GetOptions, Json, KeySelector, PairStore, PutOptions, StoreConfig,
};
use pairs_kv_sql::{SqlConnection, SqlConnector};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Session {
    user: String,
    expires: u64,
}

#[tokio::test]
async fn pairs_survive_reconnect() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("pairs.db").display());

    {
        let store = SqlConnector::new(&url).open::<u64, String>().await.unwrap();
        for i in [3u64, 1, 2] {
            store.put(i, format!("v{i}"), PutOptions::default()).await.unwrap();
        }
    }

    let store = SqlConnector::new(&url).open::<u64, String>().await.unwrap();
    let items = store.get_range(KeySelector::new()).await.unwrap();
    let keys: Vec<u64> = items.iter().map(|i| i.key).collect();
    assert_eq!(keys, [1, 2, 3]);
    assert_eq!(store.get(2, GetOptions::default()).await.unwrap().as_deref(), Some("v2"));
}

#[tokio::test]
async fn integer_keys_scan_in_numeric_order() {
    let store = SqlConnector::new("sqlite::memory:").open::<i64, String>().await.unwrap();
    for i in [-300i64, -1, 0, 7, 256] {
        store.put(i, i.to_string(), PutOptions::default()).await.unwrap();
    }

    let items = store.get_range(KeySelector::new().start(-1).end(7)).await.unwrap();
    let keys: Vec<i64> = items.iter().map(|i| i.key).collect();
    assert_eq!(keys, [-1, 0, 7]);

    let items = store.get_range(KeySelector::new().reverse(true).limit(2)).await.unwrap();
    let keys: Vec<i64> = items.iter().map(|i| i.key).collect();
    assert_eq!(keys, [256, 7]);
}

#[tokio::test]
async fn json_values() {
    let conn = SqlConnection::connect("sqlite::memory:").await.unwrap();
    let store: PairStore<_, String, Json<Session>> =
        PairStore::new(conn, StoreConfig::new().with_table("sessions")).unwrap();

    let session = Session { user: "alice".to_owned(), expires: 1_700_000_000 };
    store.put("s1".to_owned(), Json(session.clone()), PutOptions::default()).await.unwrap();

    let Json(got) = store.get("s1".to_owned(), GetOptions::default()).await.unwrap().unwrap();
    assert_eq!(got, session);

    let items = store
        .get_many(["s1".to_owned()], GetManyOptions::default())
        .await
        .unwrap();
    assert_eq!(items[0].value.as_ref().map(|j| &j.0), Some(&session));
}

#[tokio::test]
async fn tables_are_independent() {
    let conn = SqlConnection::connect("sqlite::memory:").await.unwrap();
    let a: PairStore<_, String, String> =
        PairStore::new(conn.clone(), StoreConfig::new().with_table("a")).unwrap();
    let b: PairStore<_, String, String> =
        PairStore::new(conn, StoreConfig::new().with_table("b")).unwrap();

    a.put("k".to_owned(), "in a".to_owned(), PutOptions::default()).await.unwrap();
    assert_eq!(b.get("k".to_owned(), GetOptions::lenient()).await.unwrap(), None);
    assert_eq!(b.get_count(KeySelector::new()).await.unwrap(), 0);
    assert_eq!(a.get_count(KeySelector::new()).await.unwrap(), 1);
}
