use super::support::{api_over, RecordingStore};
use daily_folder::navigator::{MemoryTreeView, TreeView};
use daily_folder::types::LibraryScope;

const SCOPE: LibraryScope = LibraryScope::USER;

async fn view_over(store: &std::sync::Arc<RecordingStore>) -> MemoryTreeView {
    MemoryTreeView::load(store.clone(), &[SCOPE]).await.unwrap()
}

#[tokio::test]
async fn test_missing_chain_without_create_makes_no_writes() {
    let store = RecordingStore::new();
    let root = store.inner.insert("Daily Folder", None, SCOPE);
    store.inner.insert("2025", Some(root.id), SCOPE);
    let api = api_over(store.clone());
    let mut view = view_over(&store).await;

    let node = api.goto_date(&mut view, "2025-03-07", SCOPE, false).await;

    assert!(node.is_none());
    assert!(store.created.lock().is_empty());
    assert_eq!(store.inner.len(), 2);
}

#[tokio::test]
async fn test_empty_store_creates_four_nodes_in_order() {
    let store = RecordingStore::new();
    let api = api_over(store.clone());
    let mut view = view_over(&store).await;

    let leaf = api
        .goto_date(&mut view, "2024-12-25", SCOPE, true)
        .await
        .expect("leaf selected");

    assert_eq!(
        store.created_names(),
        vec!["Daily Folder", "2024", "2024-12", "2024-12-25"]
    );
    let created = store.created.lock().clone();
    assert_eq!(created[0].parent, None);
    assert_eq!(created[1].parent, Some(created[0].id));
    assert_eq!(created[2].parent, Some(created[1].id));
    assert_eq!(created[3].parent, Some(created[2].id));
    assert!(created.iter().all(|n| n.scope == SCOPE));
    assert_eq!(leaf.id, created[3].id);
    assert_eq!(view.selected_node(), Some(leaf));
}

#[tokio::test]
async fn test_goto_then_resolve_returns_same_ids() {
    let store = RecordingStore::new();
    let api = api_over(store.clone());
    let mut view = view_over(&store).await;

    let leaf = api
        .goto_date(&mut view, "2025-03-07", SCOPE, true)
        .await
        .unwrap();
    let chain = api
        .resolve_date("2025-03-07", SCOPE)
        .await
        .unwrap()
        .unwrap();

    let created: Vec<_> = store.created.lock().iter().map(|n| n.id).collect();
    assert_eq!(chain.ids().to_vec(), created);
    assert_eq!(chain.leaf().id, leaf.id);
}

#[tokio::test]
async fn test_partial_chain_only_creates_missing_levels() {
    let store = RecordingStore::new();
    let root = store.inner.insert("Daily Folder", None, SCOPE);
    store.inner.insert("2025", Some(root.id), SCOPE);
    let api = api_over(store.clone());
    let mut view = view_over(&store).await;

    api.goto_date(&mut view, "2025-03-07", SCOPE, true)
        .await
        .unwrap();

    assert_eq!(store.created_names(), vec!["2025-03", "2025-03-07"]);
}

#[tokio::test]
async fn test_existing_scan_skips_non_date_names() {
    let store = RecordingStore::new();
    let root = store.inner.insert("Daily Folder", None, SCOPE);
    let year = store.inner.insert("2025", Some(root.id), SCOPE);
    let month = store.inner.insert("2025-03", Some(year.id), SCOPE);
    store.inner.insert("2025-03-07", Some(month.id), SCOPE);
    store.inner.insert("notes", Some(month.id), SCOPE);
    let api = api_over(store.clone());

    let existing = api.refresh_existing(SCOPE).await;

    assert_eq!(existing.iter().collect::<Vec<_>>(), vec!["2025-03-07"]);
    assert!(store.created.lock().is_empty());
}

#[tokio::test]
async fn test_other_scope_is_untouched() {
    let store = RecordingStore::new();
    let api = api_over(store.clone());
    let mut view = MemoryTreeView::load(store.clone(), &[LibraryScope(2)])
        .await
        .unwrap();

    api.goto_date(&mut view, "2025-03-07", LibraryScope(2), true)
        .await
        .unwrap();

    assert!(api.refresh_existing(SCOPE).await.is_empty());
    assert!(api
        .resolve_date("2025-03-07", SCOPE)
        .await
        .unwrap()
        .is_none());
}
