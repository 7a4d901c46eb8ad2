use super::support::fast_config;
use daily_folder::navigator::MemoryTreeView;
use daily_folder::store::{CollectionStore, SledCollectionStore};
use daily_folder::types::LibraryScope;
use daily_folder::DailyFolderApi;
use std::sync::Arc;
use tempfile::TempDir;

const SCOPE: LibraryScope = LibraryScope::USER;

#[tokio::test]
async fn test_sled_backed_goto_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("store");

    let leaf_id = {
        let store: Arc<dyn CollectionStore> =
            Arc::new(SledCollectionStore::new(&store_path).unwrap());
        let api = DailyFolderApi::new(store.clone(), &fast_config());
        let mut view = MemoryTreeView::load(store, &[SCOPE]).await.unwrap();
        api.goto_date(&mut view, "2025-03-07", SCOPE, true)
            .await
            .unwrap()
            .id
    };

    let store: Arc<dyn CollectionStore> = Arc::new(SledCollectionStore::new(&store_path).unwrap());
    let api = DailyFolderApi::new(store.clone(), &fast_config());
    let mut view = MemoryTreeView::load(store.clone(), &[SCOPE]).await.unwrap();

    let again = api
        .goto_date(&mut view, "2025-03-07", SCOPE, false)
        .await
        .unwrap();
    assert_eq!(again.id, leaf_id);
    assert_eq!(store.roots_in(SCOPE).await.unwrap().len(), 1);

    api.goto_date(&mut view, "2025-03-08", SCOPE, true)
        .await
        .unwrap();
    let existing = api.refresh_existing(SCOPE).await;
    assert_eq!(
        existing.in_month(2025, 3),
        vec!["2025-03-07", "2025-03-08"]
    );
}

#[tokio::test]
async fn test_custom_root_label_anchors_new_root() {
    let temp_dir = TempDir::new().unwrap();
    let store: Arc<dyn CollectionStore> =
        Arc::new(SledCollectionStore::new(&temp_dir.path().join("store")).unwrap());
    let mut config = fast_config();
    config.root_label = "Journal".to_string();
    let api = DailyFolderApi::new(store.clone(), &config);
    let mut view = MemoryTreeView::load(store.clone(), &[SCOPE]).await.unwrap();

    api.goto_date(&mut view, "2025-03-07", SCOPE, true)
        .await
        .unwrap();

    let roots = store.roots_in(SCOPE).await.unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].name, "Journal");
}
