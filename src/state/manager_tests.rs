//! Tests for the token store

use super::*;
use tempfile::tempdir;

#[tokio::test]
async fn test_in_memory_store() {
    let store = TokenStore::in_memory();
    assert!(store.is_in_memory());

    assert!(store.get_token("executions").await.is_none());

    store
        .set_token("executions", Some("t1".to_string()))
        .await
        .unwrap();
    assert_eq!(
        store.get_token("executions").await,
        Some("t1".to_string())
    );
}

#[tokio::test]
async fn test_store_persists_and_reloads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let store = TokenStore::new(&path);
    store
        .set_token("executions", Some("t1".to_string()))
        .await
        .unwrap();
    store.add_emitted("executions", 200).await.unwrap();

    // A fresh store sees what the first one saved
    let reloaded = TokenStore::from_file(&path).unwrap();
    assert_eq!(
        reloaded.get_token("executions").await,
        Some("t1".to_string())
    );
}

#[tokio::test]
async fn test_store_clears_token_on_exhaustion() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let store = TokenStore::new(&path);
    store
        .set_token("executions", Some("t1".to_string()))
        .await
        .unwrap();
    store.set_token("executions", None).await.unwrap();

    let reloaded = TokenStore::from_file(&path).unwrap();
    assert!(reloaded.get_token("executions").await.is_none());
}

#[tokio::test]
async fn test_store_clear_endpoint() {
    let store = TokenStore::in_memory();
    store
        .set_token("executions", Some("t1".to_string()))
        .await
        .unwrap();

    store.clear_endpoint("executions").await.unwrap();
    assert!(store.get_token("executions").await.is_none());
}

#[tokio::test]
async fn test_store_from_missing_file_starts_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.json");

    let store = TokenStore::from_file(&path).unwrap();
    assert!(store.get_token("anything").await.is_none());
}

#[tokio::test]
async fn test_store_to_json_pretty() {
    let store = TokenStore::in_memory();
    store
        .set_token("executions", Some("t1".to_string()))
        .await
        .unwrap();

    let json = store.to_json_pretty().await.unwrap();
    assert!(json.contains("executions"));
    assert!(json.contains("t1"));
}

#[tokio::test]
async fn test_store_independent_endpoints() {
    let store = TokenStore::in_memory();
    store
        .set_token("executions", Some("t1".to_string()))
        .await
        .unwrap();
    store
        .set_token("instances", Some("t2".to_string()))
        .await
        .unwrap();

    assert_eq!(
        store.get_token("executions").await,
        Some("t1".to_string())
    );
    assert_eq!(store.get_token("instances").await, Some("t2".to_string()));
}
