//! In-memory collection store.

use super::{CollectionNode, CollectionStore};
use crate::error::StoreError;
use crate::types::{CollectionId, LibraryScope};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Inner {
    nodes: Vec<CollectionNode>,
    next_id: u64,
}

/// Ephemeral store keeping collections in creation order
pub struct MemoryCollectionStore {
    inner: RwLock<Inner>,
    create_calls: AtomicUsize,
}

impl MemoryCollectionStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                nodes: Vec::new(),
                next_id: 1,
            }),
            create_calls: AtomicUsize::new(0),
        }
    }

    /// Insert a collection directly, bypassing the create counter.
    ///
    /// Used to seed fixtures such as hand-made sibling folders.
    pub fn insert(
        &self,
        name: &str,
        parent: Option<CollectionId>,
        scope: LibraryScope,
    ) -> CollectionNode {
        let mut inner = self.inner.write();
        let node = CollectionNode {
            id: CollectionId(inner.next_id),
            name: name.to_string(),
            parent,
            scope,
        };
        inner.next_id += 1;
        inner.nodes.push(node.clone());
        node
    }

    /// Snapshot of every collection in creation order.
    pub fn nodes(&self) -> Vec<CollectionNode> {
        self.inner.read().nodes.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `create` calls seen, successful or not.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

impl Default for MemoryCollectionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CollectionStore for MemoryCollectionStore {
    async fn children_of(&self, parent: CollectionId) -> Result<Vec<CollectionNode>, StoreError> {
        Ok(self
            .inner
            .read()
            .nodes
            .iter()
            .filter(|node| node.parent == Some(parent))
            .cloned()
            .collect())
    }

    async fn roots_in(&self, scope: LibraryScope) -> Result<Vec<CollectionNode>, StoreError> {
        Ok(self
            .inner
            .read()
            .nodes
            .iter()
            .filter(|node| node.parent.is_none() && node.scope == scope)
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        name: &str,
        parent: Option<CollectionId>,
        scope: LibraryScope,
    ) -> Result<CollectionNode, StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(parent_id) = parent {
            let inner = self.inner.read();
            match inner.nodes.iter().find(|node| node.id == parent_id) {
                Some(parent_node) if parent_node.scope != scope => {
                    return Err(StoreError::Corrupt(format!(
                        "Parent {} belongs to library {}, not {}",
                        parent_id, parent_node.scope, scope
                    )));
                }
                Some(_) => {}
                None => {
                    return Err(StoreError::Corrupt(format!(
                        "Parent collection {} does not exist",
                        parent_id
                    )));
                }
            }
        }
        Ok(self.insert(name, parent, scope))
    }
}
