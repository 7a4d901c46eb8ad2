use super::support::api_over;
use chrono::NaiveDate;
use daily_folder::hierarchy::HierarchyResolver;
use daily_folder::navigator::{MemoryTreeView, TreeNavigator, TreeView, DEFAULT_SETTLE_DELAY};
use daily_folder::path::DEFAULT_ROOT_LABEL;
use daily_folder::store::MemoryCollectionStore;
use daily_folder::types::LibraryScope;
use std::sync::Arc;
use std::time::Duration;

const SCOPE: LibraryScope = LibraryScope::USER;

fn march_7() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
}

fn row_of(view: &mut MemoryTreeView, name: &str) -> usize {
    (0..view.row_count())
        .find(|&i| {
            view.select_row(i);
            view.selected_node().map(|n| n.name == name).unwrap_or(false)
        })
        .unwrap()
}

#[tokio::test]
async fn test_same_name_under_other_root_is_skipped() {
    let store = Arc::new(MemoryCollectionStore::new());
    let archive = store.insert("Archive", None, SCOPE);
    let decoy = store.insert("2025", Some(archive.id), SCOPE);
    store.insert("2025-03", Some(decoy.id), SCOPE);
    let resolver = HierarchyResolver::new(store.clone(), DEFAULT_ROOT_LABEL);
    let chain = resolver.ensure_path(march_7(), SCOPE).await.unwrap();

    let mut view = MemoryTreeView::load(store.clone(), &[SCOPE]).await.unwrap();
    // Open the decoy branch so its "2025" row precedes the real one.
    let archive_row = row_of(&mut view, "Archive");
    view.toggle_open_state(archive_row);

    let navigator = TreeNavigator::new(Duration::ZERO);
    let leaf = navigator.navigate_to_chain(&mut view, &chain).await.unwrap();

    assert_eq!(leaf.id, chain.day.id);
    let decoy_row = (0..view.row_count())
        .find(|&i| {
            view.select_row(i);
            view.selected_node().map(|n| n.id == decoy.id).unwrap_or(false)
        })
        .unwrap();
    assert!(!view.is_container_open(decoy_row));
}

#[tokio::test]
async fn test_lazy_view_rows_appear_after_settle() {
    let store = Arc::new(MemoryCollectionStore::new());
    let resolver = HierarchyResolver::new(store.clone(), DEFAULT_ROOT_LABEL);
    let chain = resolver.ensure_path(march_7(), SCOPE).await.unwrap();

    let mut view = MemoryTreeView::load(store.clone(), &[SCOPE])
        .await
        .unwrap()
        .with_lazy(true);
    let root_row = row_of(&mut view, DEFAULT_ROOT_LABEL);
    let before = view.row_count();
    view.toggle_open_state(root_row);
    assert_eq!(view.row_count(), before);
    view.settle(Duration::ZERO).await;
    assert_eq!(view.row_count(), before + 1);

    let navigator = TreeNavigator::new(Duration::ZERO);
    let leaf = navigator.navigate_to_chain(&mut view, &chain).await.unwrap();
    assert_eq!(leaf.name, "2025-03-07");
}

#[tokio::test(start_paused = true)]
async fn test_each_expansion_waits_for_settle_delay() {
    let store = Arc::new(MemoryCollectionStore::new());
    let resolver = HierarchyResolver::new(store.clone(), DEFAULT_ROOT_LABEL);
    let chain = resolver.ensure_path(march_7(), SCOPE).await.unwrap();
    let mut view = MemoryTreeView::load(store.clone(), &[SCOPE])
        .await
        .unwrap()
        .with_lazy(true);

    let navigator = TreeNavigator::default();
    let started = tokio::time::Instant::now();
    navigator.navigate_to_chain(&mut view, &chain).await.unwrap();

    // Root, year and month are expanded; the day is only selected.
    assert!(started.elapsed() >= DEFAULT_SETTLE_DELAY * 3);
    assert!(started.elapsed() < DEFAULT_SETTLE_DELAY * 4);
}

#[tokio::test]
async fn test_missing_row_keeps_last_selection() {
    let store = Arc::new(MemoryCollectionStore::new());
    let resolver = HierarchyResolver::new(store.clone(), DEFAULT_ROOT_LABEL);
    // View built before the year exists shows the root as a leaf row.
    let root = store.insert(DEFAULT_ROOT_LABEL, None, SCOPE);
    let mut view = MemoryTreeView::load(store.clone(), &[SCOPE]).await.unwrap();
    let chain = resolver.ensure_path(march_7(), SCOPE).await.unwrap();
    assert_eq!(chain.root.id, root.id);

    let navigator = TreeNavigator::new(Duration::ZERO);
    let result = navigator.navigate_to_chain(&mut view, &chain).await;

    assert!(result.is_err());
    assert_eq!(view.selected_node().map(|n| n.id), Some(root.id));
}

#[tokio::test]
async fn test_goto_in_second_library_returns_its_own_leaf() {
    let store = Arc::new(MemoryCollectionStore::new());
    let resolver = HierarchyResolver::new(store.clone(), DEFAULT_ROOT_LABEL);
    let first = resolver.ensure_path(march_7(), LibraryScope(1)).await.unwrap();
    let second = resolver.ensure_path(march_7(), LibraryScope(2)).await.unwrap();
    let api = api_over(store.clone());
    let mut view = MemoryTreeView::load(store.clone(), &[LibraryScope(1), LibraryScope(2)])
        .await
        .unwrap();

    let leaf = api
        .goto_date(&mut view, "2025-03-07", LibraryScope(2), false)
        .await
        .unwrap();
    let resolved = api
        .resolve_date("2025-03-07", LibraryScope(2))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(leaf.id, resolved.day.id);
    assert_eq!(leaf.id, second.day.id);
    assert_ne!(leaf.id, first.day.id);
    assert_eq!(leaf.scope, LibraryScope(2));
}
