//! Integration tests for category persistence on disk

use std::sync::Arc;

use dashboard_core::{move_workflow, CategorySet, RepoRef, WorkflowId, WorkflowRecord};
use dashboard_store::{CategoryStore, FileKeyValueStore, KeyValueStore, StorageKey, ThemeMode, ThemeStore};
use tempfile::tempdir;

fn workflows() -> Vec<WorkflowRecord> {
    vec![
        WorkflowRecord::new(1, "Infra - Deploy - Prod"),
        WorkflowRecord::new(2, "App - Test - Unit"),
        WorkflowRecord::new(3, "Standalone"),
    ]
}

#[tokio::test]
async fn test_assignment_survives_a_new_store_instance() {
    let dir = tempdir().unwrap();
    let repo = RepoRef::new("octo", "hello");

    {
        let store = CategoryStore::new(Arc::new(FileKeyValueStore::new(dir.path())));
        let set = store.load_or_seed(&repo, &workflows()).await.unwrap();
        let set = move_workflow(&WorkflowId::from(3), "Infra", &set);
        store.save(&repo, &set).await.unwrap();
    }

    let store = CategoryStore::new(Arc::new(FileKeyValueStore::new(dir.path())));
    let set = store.load(&repo).await.unwrap().unwrap();
    assert_eq!(set.names().collect::<Vec<_>>(), vec!["Infra", "App", "Uncategorized"]);
    assert_eq!(
        set.get("Infra").unwrap(),
        &[WorkflowId::from(1), WorkflowId::from(3)]
    );
    assert!(set.get("Uncategorized").unwrap().is_empty());
}

#[tokio::test]
async fn test_corrupt_file_is_treated_as_absent() {
    let dir = tempdir().unwrap();
    let repo = RepoRef::new("octo", "hello");
    let kv = Arc::new(FileKeyValueStore::new(dir.path()));
    kv.set(&StorageKey::categories(&repo), "[\"not\", \"a\", \"map\"]")
        .await
        .unwrap();

    let store = CategoryStore::new(kv);

    assert_eq!(store.load(&repo).await.unwrap(), None);
    let seeded = store.load_or_seed(&repo, &workflows()).await.unwrap();
    assert_eq!(seeded, CategorySet::seed_from_workflows(&workflows()));
}

#[tokio::test]
async fn test_reset_overwrites_customizations() {
    let dir = tempdir().unwrap();
    let repo = RepoRef::new("octo", "hello");
    let store = CategoryStore::new(Arc::new(FileKeyValueStore::new(dir.path())));
    store
        .save(&repo, &CategorySet::from_buckets([("Mine", vec![1u64, 2, 3])]))
        .await
        .unwrap();

    let reset = store.reset(&repo, &workflows()).await.unwrap();

    assert!(!reset.contains("Mine"));
    assert_eq!(store.load(&repo).await.unwrap(), Some(reset));
}

#[tokio::test]
async fn test_repositories_do_not_share_state() {
    let dir = tempdir().unwrap();
    let store = CategoryStore::new(Arc::new(FileKeyValueStore::new(dir.path())));
    let first = RepoRef::new("octo", "one");
    let second = RepoRef::new("octo", "two");

    store
        .save(&first, &CategorySet::from_buckets([("A", vec![1u64])]))
        .await
        .unwrap();

    assert!(store.load(&first).await.unwrap().is_some());
    assert!(store.load(&second).await.unwrap().is_none());
}

#[tokio::test]
async fn test_theme_preference_shares_the_store() {
    let dir = tempdir().unwrap();
    let kv: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(dir.path()));
    let theme = ThemeStore::new(kv.clone());

    theme.save(ThemeMode::Dark).await.unwrap();

    let reopened = ThemeStore::new(Arc::new(FileKeyValueStore::new(dir.path())));
    assert_eq!(reopened.load().await.unwrap(), ThemeMode::Dark);
    assert!(dir.path().join("preferences").join("dark_mode.json").exists());
}
