//! Shared fixtures for integration tests.

use async_trait::async_trait;
use daily_folder::config::DailyFolderConfig;
use daily_folder::error::StoreError;
use daily_folder::store::{CollectionNode, CollectionStore, MemoryCollectionStore};
use daily_folder::types::{CollectionId, LibraryScope};
use daily_folder::DailyFolderApi;
use parking_lot::Mutex;
use std::sync::Arc;

/// Memory store that records every successful create.
#[derive(Default)]
pub struct RecordingStore {
    pub inner: MemoryCollectionStore,
    pub created: Mutex<Vec<CollectionNode>>,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn created_names(&self) -> Vec<String> {
        self.created.lock().iter().map(|n| n.name.clone()).collect()
    }
}

#[async_trait]
impl CollectionStore for RecordingStore {
    async fn children_of(&self, parent: CollectionId) -> Result<Vec<CollectionNode>, StoreError> {
        self.inner.children_of(parent).await
    }

    async fn roots_in(&self, scope: LibraryScope) -> Result<Vec<CollectionNode>, StoreError> {
        self.inner.roots_in(scope).await
    }

    async fn create(
        &self,
        name: &str,
        parent: Option<CollectionId>,
        scope: LibraryScope,
    ) -> Result<CollectionNode, StoreError> {
        let node = self.inner.create(name, parent, scope).await?;
        self.created.lock().push(node.clone());
        Ok(node)
    }
}

/// Configuration with no settle delay.
pub fn fast_config() -> DailyFolderConfig {
    let mut config = DailyFolderConfig::default();
    config.navigation.settle_delay_ms = 0;
    config
}

pub fn api_over(store: Arc<dyn CollectionStore>) -> DailyFolderApi {
    DailyFolderApi::new(store, &fast_config())
}
