//! Sled-backed collection store.
//!
//! Records live in the `collections` tree keyed by big-endian id. Two index
//! trees keep lookups off a full scan: `children` (parent id ++ child id) and
//! `roots` (scope ++ root id). Ids come from sled's monotonic generator, so
//! key order within an index is creation order.

use super::{CollectionNode, CollectionStore};
use crate::error::StoreError;
use crate::types::{CollectionId, LibraryScope};
use async_trait::async_trait;
use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::Transactional;
use std::path::Path;
use tracing::{debug, warn};

const COLLECTIONS_TREE: &str = "collections";
const CHILDREN_TREE: &str = "children";
const ROOTS_TREE: &str = "roots";

/// Persistent collection store on sled
pub struct SledCollectionStore {
    db: sled::Db,
    collections: sled::Tree,
    children: sled::Tree,
    roots: sled::Tree,
}

impl SledCollectionStore {
    /// Open (or create) a store at `path`.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        let collections = db.open_tree(COLLECTIONS_TREE)?;
        let children = db.open_tree(CHILDREN_TREE)?;
        let roots = db.open_tree(ROOTS_TREE)?;
        Ok(Self {
            db,
            collections,
            children,
            roots,
        })
    }

    fn index_key(prefix: [u8; 8], id: CollectionId) -> [u8; 16] {
        let mut key = [0u8; 16];
        key[..8].copy_from_slice(&prefix);
        key[8..].copy_from_slice(&id.to_be_bytes());
        key
    }

    fn get(&self, id: CollectionId) -> Result<Option<CollectionNode>, StoreError> {
        match self.collections.get(id.to_be_bytes())? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn load_index(
        &self,
        index: &sled::Tree,
        prefix: [u8; 8],
    ) -> Result<Vec<CollectionNode>, StoreError> {
        let mut nodes = Vec::new();
        for entry in index.scan_prefix(prefix) {
            let (key, _) = entry?;
            let id_bytes: [u8; 8] = key
                .get(8..16)
                .and_then(|slice| slice.try_into().ok())
                .ok_or_else(|| StoreError::Corrupt(format!("Index key has {} bytes", key.len())))?;
            let id = CollectionId(u64::from_be_bytes(id_bytes));
            let node = self.get(id)?.ok_or_else(|| {
                StoreError::Corrupt(format!("Index points at missing collection {}", id))
            })?;
            nodes.push(node);
        }
        Ok(nodes)
    }
}

#[async_trait]
impl CollectionStore for SledCollectionStore {
    async fn children_of(&self, parent: CollectionId) -> Result<Vec<CollectionNode>, StoreError> {
        self.load_index(&self.children, parent.to_be_bytes())
    }

    async fn roots_in(&self, scope: LibraryScope) -> Result<Vec<CollectionNode>, StoreError> {
        self.load_index(&self.roots, scope.to_be_bytes())
    }

    async fn create(
        &self,
        name: &str,
        parent: Option<CollectionId>,
        scope: LibraryScope,
    ) -> Result<CollectionNode, StoreError> {
        if let Some(parent_id) = parent {
            let parent_node = self.get(parent_id)?.ok_or_else(|| {
                StoreError::Corrupt(format!("Parent collection {} does not exist", parent_id))
            })?;
            if parent_node.scope != scope {
                return Err(StoreError::Corrupt(format!(
                    "Parent {} belongs to library {}, not {}",
                    parent_id, parent_node.scope, scope
                )));
            }
        }

        let node = CollectionNode {
            id: CollectionId(self.db.generate_id()?),
            name: name.to_string(),
            parent,
            scope,
        };
        let bytes = bincode::serialize(&node)?;
        let (index, index_key) = match parent {
            Some(parent_id) => (&self.children, Self::index_key(parent_id.to_be_bytes(), node.id)),
            None => (&self.roots, Self::index_key(scope.to_be_bytes(), node.id)),
        };
        let record_key = node.id.to_be_bytes();

        // Record and index entry commit together or not at all.
        (&self.collections, index)
            .transaction(|(collections, index)| {
                collections.insert(&record_key[..], bytes.as_slice())?;
                index.insert(&index_key[..], &b""[..])?;
                Ok::<(), ConflictableTransactionError<()>>(())
            })
            .map_err(|e| match e {
                TransactionError::Storage(e) => StoreError::Backend(e),
                TransactionError::Abort(()) => {
                    StoreError::Corrupt(format!("Write of collection {} aborted", node.id))
                }
            })?;

        // Already committed; a failed flush does not undo the create.
        if let Err(e) = self.db.flush_async().await {
            warn!(id = %node.id, error = %e, "Flush after create failed");
        }

        debug!(id = %node.id, name = %node.name, scope = %scope, "Persisted collection");
        Ok(node)
    }
}
