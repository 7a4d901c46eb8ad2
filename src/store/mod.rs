//! Collection Store
//!
//! Contract for the host's collection storage plus the two backends shipped
//! with the crate: an in-memory store and a sled-backed persistent store.

pub mod memory;
pub mod persistence;

use crate::error::StoreError;
use crate::types::{CollectionId, LibraryScope};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use memory::MemoryCollectionStore;
pub use persistence::SledCollectionStore;

/// CollectionNode: A named collection owned by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionNode {
    pub id: CollectionId,
    pub name: String,
    pub parent: Option<CollectionId>,
    pub scope: LibraryScope,
}

/// Collection store interface
///
/// Sequences are returned in the store's natural order (creation order for
/// the bundled backends). Siblings are expected to be unique by name within a
/// scope; the store itself does not enforce it.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Direct children of `parent`.
    async fn children_of(&self, parent: CollectionId) -> Result<Vec<CollectionNode>, StoreError>;

    /// Parentless collections of `scope`.
    async fn roots_in(&self, scope: LibraryScope) -> Result<Vec<CollectionNode>, StoreError>;

    /// Create and persist a new collection.
    async fn create(
        &self,
        name: &str,
        parent: Option<CollectionId>,
        scope: LibraryScope,
    ) -> Result<CollectionNode, StoreError>;
}
