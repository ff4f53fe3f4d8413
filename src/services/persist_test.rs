use std::path::PathBuf;

use super::*;
use crate::roles::Role;
use crate::state::test_helpers::test_user;

fn temp_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("storegate-{tag}-{}", uuid::Uuid::new_v4()))
}

fn record() -> PersistedSession {
    PersistedSession { token: "tok-123".to_owned(), user: test_user(Role::Store) }
}

// =============================================================================
// FILE STORAGE
// =============================================================================

#[tokio::test]
async fn file_save_load_clear_round_trip() {
    let storage = FileSessionStorage::new(temp_path("round-trip"));
    let saved = record();

    storage.save(&saved).await.unwrap();
    let loaded = storage.load().await.unwrap().unwrap();
    assert_eq!(loaded.token, saved.token);
    assert_eq!(loaded.user.id, saved.user.id);
    assert_eq!(loaded.user.email, saved.user.email);
    assert_eq!(loaded.user.role, Role::Store);

    storage.clear().await.unwrap();
    assert!(storage.load().await.unwrap().is_none());
}

#[tokio::test]
async fn loading_a_missing_file_is_none() {
    let storage = FileSessionStorage::new(temp_path("missing"));
    assert!(storage.load().await.unwrap().is_none());
}

#[tokio::test]
async fn clearing_a_missing_file_is_ok() {
    let storage = FileSessionStorage::new(temp_path("clear-missing"));
    storage.clear().await.unwrap();
}

#[tokio::test]
async fn a_corrupt_file_loads_as_absent() {
    let path = temp_path("corrupt");
    tokio::fs::write(&path, b"{definitely not json").await.unwrap();

    let storage = FileSessionStorage::new(path.clone());
    assert!(storage.load().await.unwrap().is_none());

    let _ = tokio::fs::remove_file(&path).await;
}

#[tokio::test]
async fn save_creates_missing_parent_directories() {
    let dir = temp_path("nested");
    let storage = FileSessionStorage::new(dir.join("inner").join("session.json"));

    storage.save(&record()).await.unwrap();
    assert!(storage.load().await.unwrap().is_some());

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn save_overwrites_the_previous_record() {
    let storage = FileSessionStorage::new(temp_path("overwrite"));
    storage.save(&record()).await.unwrap();

    let mut newer = record();
    newer.token = "tok-456".to_owned();
    storage.save(&newer).await.unwrap();

    assert_eq!(storage.load().await.unwrap().unwrap().token, "tok-456");
    storage.clear().await.unwrap();
}

// =============================================================================
// MEMORY STORAGE
// =============================================================================

#[tokio::test]
async fn memory_round_trip() {
    let storage = MemorySessionStorage::new();
    assert!(storage.load().await.unwrap().is_none());

    let saved = record();
    storage.save(&saved).await.unwrap();
    assert_eq!(storage.load().await.unwrap().unwrap().token, saved.token);

    storage.clear().await.unwrap();
    assert!(storage.load().await.unwrap().is_none());
}
