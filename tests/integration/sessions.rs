use super::support::{api_over, RecordingStore};
use daily_folder::error::ApiError;
use daily_folder::session::{SessionId, SessionRegistry};
use daily_folder::types::LibraryScope;
use parking_lot::Mutex;
use std::sync::Arc;

#[tokio::test]
async fn test_session_keeps_scan_and_tears_down_in_reverse() {
    let store = RecordingStore::new();
    let root = store.inner.insert("Daily Folder", None, LibraryScope(2));
    let year = store.inner.insert("2025", Some(root.id), LibraryScope(2));
    let month = store.inner.insert("2025-03", Some(year.id), LibraryScope(2));
    store.inner.insert("2025-03-07", Some(month.id), LibraryScope(2));
    let api = api_over(store.clone());

    let registry = SessionRegistry::new();
    let id = SessionId::new("calendar-window");
    registry.attach(id.clone(), LibraryScope(2));

    let released = Arc::new(Mutex::new(Vec::new()));
    for label in ["toolbar-button", "calendar-popup", "selection-listener"] {
        let released = released.clone();
        registry.with_session(&id, |session| {
            session.guards.push(label, move || {
                released.lock().push(label);
                if label == "calendar-popup" {
                    return Err(ApiError::ConfigError("popup already closed".to_string()));
                }
                Ok(())
            })
        });
    }

    let scope = registry.with_session(&id, |session| session.scope).unwrap();
    let existing = api.refresh_existing(scope).await;
    registry.with_session(&id, |session| session.existing = existing);
    assert_eq!(
        registry.with_session(&id, |session| session.existing.len()),
        Some(1)
    );

    let failed = registry.detach(&id).unwrap();
    assert_eq!(failed, vec!["calendar-popup"]);
    assert_eq!(
        *released.lock(),
        vec!["selection-listener", "calendar-popup", "toolbar-button"]
    );
    assert!(registry.is_empty());
}
