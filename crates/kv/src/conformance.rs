//! Conformance tests for pair store backends.
//!
//! These tests verify that a [`Connection`] implementation behaves correctly
//! when driven by a [`PairStore`]. To use these tests with a custom backend,
//! build a `PairStore<_, String, String>` over it and call [`conformance`].
//!
//! Each test starts by clearing the table, so the suite may run against a
//! table that already holds data.

use crate::{
    Connection, DelOptions, GetManyOptions, GetOptions, Item, KeySelector, PairStore, PutOptions,
    StoreError, StoreResult,
};

/// Store type exercised by the conformance suite.
pub type TestStore<C> = PairStore<C, String, String>;

/// Run all conformance tests against a store.
///
/// This is the main entry point for testing a custom backend implementation.
pub async fn conformance<C: Connection>(store: &TestStore<C>) -> StoreResult<()> {
    test_empty_table(store).await?;
    test_round_trip(store).await?;
    test_existence_semantics(store).await?;
    test_get_many_order(store).await?;
    test_get_many_chunking(store).await?;
    test_get_many_missing(store).await?;
    test_get_many_keys_only(store).await?;
    test_range_bounds(store).await?;
    test_range_prefix(store).await?;
    test_range_reverse_limit(store).await?;
    test_count_delete_consistency(store).await?;
    test_conflicting_selectors(store).await?;
    Ok(())
}

fn s(v: &str) -> String {
    v.to_owned()
}

fn keys<K, V>(items: &[Item<K, V>]) -> Vec<&K> {
    items.iter().map(|i| &i.key).collect()
}

async fn clear<C: Connection>(store: &TestStore<C>) -> StoreResult<()> {
    store.del_range(KeySelector::new()).await?;
    Ok(())
}

async fn seed<C: Connection>(store: &TestStore<C>, keys: &[&str]) -> StoreResult<()> {
    for key in keys {
        store.put(s(key), format!("v-{key}"), PutOptions::default()).await?;
    }
    Ok(())
}

/// Test that an empty table returns nothing for every read.
pub async fn test_empty_table<C: Connection>(store: &TestStore<C>) -> StoreResult<()> {
    clear(store).await?;
    assert_eq!(store.get(s("a"), GetOptions::lenient()).await?, None);
    assert!(store.get_range(KeySelector::new()).await?.is_empty());
    assert_eq!(store.get_count(KeySelector::new()).await?, 0);
    assert!(store.get_many(Vec::<String>::new(), GetManyOptions::default()).await?.is_empty());
    assert_eq!(store.del_range(KeySelector::new()).await?, 0);
    Ok(())
}

/// Test that a put value is read back, and overwritten by a second put.
pub async fn test_round_trip<C: Connection>(store: &TestStore<C>) -> StoreResult<()> {
    clear(store).await?;
    store.put(s("k"), s("v1"), PutOptions::default()).await?;
    assert_eq!(store.get(s("k"), GetOptions::default()).await?, Some(s("v1")));

    store.put(s("k"), s("v2"), PutOptions::default()).await?;
    assert_eq!(store.get(s("k"), GetOptions::default()).await?, Some(s("v2")));
    assert_eq!(store.get_count(KeySelector::new()).await?, 1);
    Ok(())
}

/// Test the missing and existing key options of get, put and del.
pub async fn test_existence_semantics<C: Connection>(store: &TestStore<C>) -> StoreResult<()> {
    clear(store).await?;

    let err = store.get(s("nope"), GetOptions::default()).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref key) if key.contains("nope")));

    let err = store.put(s("k"), s("v"), PutOptions::update_only()).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    assert_eq!(store.get(s("k"), GetOptions::lenient()).await?, None);

    store.put(s("k"), s("v"), PutOptions::create_only()).await?;
    let err = store.put(s("k"), s("w"), PutOptions::create_only()).await.unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists(_)));
    assert_eq!(store.get(s("k"), GetOptions::default()).await?, Some(s("v")));

    store.put(s("k"), s("w"), PutOptions::update_only()).await?;
    assert_eq!(store.get(s("k"), GetOptions::default()).await?, Some(s("w")));

    assert!(store.del(s("k"), DelOptions::default()).await?);
    let err = store.del(s("k"), DelOptions::default()).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    assert!(!store.del(s("k"), DelOptions::lenient()).await?);
    Ok(())
}

/// Test that batch gets return items in request order.
pub async fn test_get_many_order<C: Connection>(store: &TestStore<C>) -> StoreResult<()> {
    clear(store).await?;
    seed(store, &["k1", "k2", "k3"]).await?;

    let items = store.get_many([s("k3"), s("k1"), s("k2")], GetManyOptions::default()).await?;
    assert_eq!(keys(&items), ["k3", "k1", "k2"]);
    assert_eq!(items[0].value.as_deref(), Some("v-k3"));
    assert_eq!(items[2].value.as_deref(), Some("v-k2"));
    Ok(())
}

/// Test that requests larger than one batch are transparent to the caller.
pub async fn test_get_many_chunking<C: Connection>(store: &TestStore<C>) -> StoreResult<()> {
    clear(store).await?;
    let all: Vec<String> = (0..1200).map(|i| format!("key-{i:05}")).collect();
    for key in &all {
        store.put(key.clone(), key.clone(), PutOptions::default()).await?;
    }

    // Request in descending order to check order restoration across chunks.
    let requested: Vec<String> = all.iter().rev().cloned().collect();
    let items = store.get_many(requested.clone(), GetManyOptions::default()).await?;
    assert_eq!(items.len(), 1200);
    assert!(items.iter().zip(&requested).all(|(item, key)| {
        &item.key == key && item.value.as_ref() == Some(key)
    }));

    assert_eq!(store.get_count(KeySelector::new()).await?, 1200);
    Ok(())
}

/// Test missing keys in batch gets.
pub async fn test_get_many_missing<C: Connection>(store: &TestStore<C>) -> StoreResult<()> {
    clear(store).await?;
    seed(store, &["a", "c"]).await?;
    let requested = [s("a"), s("b"), s("c"), s("d")];

    let err = store.get_many(requested.clone(), GetManyOptions::default()).await.unwrap_err();
    match err {
        StoreError::PartialNotFound { requested, missing } => {
            assert_eq!(requested, 4);
            assert_eq!(missing.len(), 2);
            assert!(missing[0].contains('b') && missing[1].contains('d'));
        }
        other => panic!("expected PartialNotFound, got {other}"),
    }

    let lenient = GetManyOptions::default().error_if_missing(false);
    let items = store.get_many(requested, lenient).await?;
    assert_eq!(keys(&items), ["a", "c"]);
    Ok(())
}

/// Test that batch gets can skip values.
pub async fn test_get_many_keys_only<C: Connection>(store: &TestStore<C>) -> StoreResult<()> {
    clear(store).await?;
    seed(store, &["a", "b"]).await?;

    let options = GetManyOptions::default().return_values(false);
    let items = store.get_many([s("b"), s("a")], options).await?;
    assert_eq!(items, [Item::new(s("b"), None), Item::new(s("a"), None)]);
    Ok(())
}

/// Test inclusive and exclusive range bounds.
pub async fn test_range_bounds<C: Connection>(store: &TestStore<C>) -> StoreResult<()> {
    clear(store).await?;
    seed(store, &["a", "b", "c", "d", "e"]).await?;

    let items = store.get_range(KeySelector::new().start_after(s("b")).end_before(s("e"))).await?;
    assert_eq!(keys(&items), ["c", "d"]);
    assert_eq!(items[0].value.as_deref(), Some("v-c"));

    let items = store.get_range(KeySelector::new().start(s("b")).end(s("d"))).await?;
    assert_eq!(keys(&items), ["b", "c", "d"]);

    let items = store.get_range(KeySelector::new().start_before(s("b")).end_after(s("c"))).await?;
    assert_eq!(keys(&items), ["b", "c"]);

    let items = store.get_range(KeySelector::new().end_before(s(""))).await?;
    assert!(items.is_empty());

    // Inverted bounds select nothing.
    let items = store.get_range(KeySelector::new().start(s("d")).end(s("b"))).await?;
    assert!(items.is_empty());

    let items = store.get_range(KeySelector::new().return_values(false)).await?;
    assert_eq!(items.len(), 5);
    assert!(items.iter().all(|i| i.value.is_none()));
    Ok(())
}

/// Test prefix selection.
pub async fn test_range_prefix<C: Connection>(store: &TestStore<C>) -> StoreResult<()> {
    clear(store).await?;
    seed(store, &["w9", "x", "x1", "x2", "y1"]).await?;

    let items = store.get_range(KeySelector::new().prefix(s("x"))).await?;
    assert_eq!(keys(&items), ["x", "x1", "x2"]);

    let items = store.get_range(KeySelector::new().prefix(s("x")).start_after(s("x"))).await?;
    assert_eq!(keys(&items), ["x1", "x2"]);

    assert_eq!(store.get_count(KeySelector::new().prefix(s("x"))).await?, 3);
    assert_eq!(store.get_count(KeySelector::new().prefix(s("z"))).await?, 0);
    Ok(())
}

/// Test descending scans and limits.
pub async fn test_range_reverse_limit<C: Connection>(store: &TestStore<C>) -> StoreResult<()> {
    clear(store).await?;
    seed(store, &["a", "b", "c", "d", "e"]).await?;

    let items = store.get_range(KeySelector::new().reverse(true).limit(2)).await?;
    assert_eq!(keys(&items), ["e", "d"]);

    let items = store.get_range(KeySelector::new().limit(2)).await?;
    assert_eq!(keys(&items), ["a", "b"]);

    assert!(store.get_range(KeySelector::new().limit(0)).await?.is_empty());

    // Limit and order do not affect counts.
    assert_eq!(store.get_count(KeySelector::new().reverse(true).limit(1)).await?, 5);
    Ok(())
}

/// Test that counts and range deletes agree with scans.
pub async fn test_count_delete_consistency<C: Connection>(store: &TestStore<C>) -> StoreResult<()> {
    clear(store).await?;
    seed(store, &["a", "b", "c", "d", "e"]).await?;

    let selector = || KeySelector::new().start(s("b")).end_before(s("e"));
    let scanned = store.get_range(selector().return_values(false)).await?.len() as u64;
    assert_eq!(store.get_count(selector()).await?, scanned);
    assert_eq!(store.del_range(selector()).await?, scanned);
    assert_eq!(store.get_count(selector()).await?, 0);
    assert_eq!(store.del_range(selector()).await?, 0);

    let remaining = store.get_range(KeySelector::new()).await?;
    assert_eq!(keys(&remaining), ["a", "e"]);
    Ok(())
}

/// Test that conflicting bounds are rejected before reaching the backend.
pub async fn test_conflicting_selectors<C: Connection>(store: &TestStore<C>) -> StoreResult<()> {
    let err = store.get_range(KeySelector::new().start(s("a")).start_after(s("b"))).await;
    assert!(matches!(err, Err(StoreError::InvalidArgument(_))));

    let err = store.get_count(KeySelector::new().end(s("a")).end_before(s("b"))).await;
    assert!(matches!(err, Err(StoreError::InvalidArgument(_))));

    let err = store.del_range(KeySelector::new().end_after(s("a")).end(s("b"))).await;
    assert!(matches!(err, Err(StoreError::InvalidArgument(_))));
    Ok(())
}
