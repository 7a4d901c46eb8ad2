//! Hierarchy Resolver
//!
//! Finds the Root → Year → Month → Day chain for a date inside one library,
//! and creates missing segments on request. Lookups never create; creation is
//! get-or-create per segment, so repeating it never duplicates a sibling.

use crate::error::ApiError;
use crate::path::{derive_path, DatePath};
use crate::store::{CollectionNode, CollectionStore};
use crate::types::{CollectionId, LibraryScope};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The four collections resolved for one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedChain {
    pub root: CollectionNode,
    pub year: CollectionNode,
    pub month: CollectionNode,
    pub day: CollectionNode,
}

impl ResolvedChain {
    /// Nodes in top-down order.
    pub fn nodes(&self) -> [&CollectionNode; 4] {
        [&self.root, &self.year, &self.month, &self.day]
    }

    pub fn ids(&self) -> [CollectionId; 4] {
        [self.root.id, self.year.id, self.month.id, self.day.id]
    }

    /// The day-level collection.
    pub fn leaf(&self) -> &CollectionNode {
        &self.day
    }
}

/// Resolves and creates date chains against a collection store
pub struct HierarchyResolver {
    store: Arc<dyn CollectionStore>,
    root_label: String,
}

impl HierarchyResolver {
    pub fn new(store: Arc<dyn CollectionStore>, root_label: impl Into<String>) -> Self {
        Self {
            store,
            root_label: root_label.into(),
        }
    }

    pub fn root_label(&self) -> &str {
        &self.root_label
    }

    pub fn store(&self) -> &Arc<dyn CollectionStore> {
        &self.store
    }

    /// Segment names for `date` under this resolver's root label.
    pub fn path_for(&self, date: NaiveDate) -> DatePath {
        derive_path(date, &self.root_label)
    }

    async fn siblings(
        &self,
        parent: Option<CollectionId>,
        scope: LibraryScope,
        name: &str,
    ) -> Result<Vec<CollectionNode>, ApiError> {
        let result = match parent {
            Some(parent_id) => self.store.children_of(parent_id).await,
            None => self.store.roots_in(scope).await,
        };
        result.map_err(|source| ApiError::LookupFailure {
            name: name.to_string(),
            source,
        })
    }

    /// First child of `parent` (or root of `scope`) named exactly `name`.
    async fn find_child(
        &self,
        parent: Option<CollectionId>,
        scope: LibraryScope,
        name: &str,
    ) -> Result<Option<CollectionNode>, ApiError> {
        let siblings = self.siblings(parent, scope, name).await?;
        Ok(siblings.into_iter().find(|node| node.name == name))
    }

    /// Get-or-create the collection `name` under `parent` in `scope`.
    ///
    /// A failed lookup is logged and creation is attempted anyway. A failed
    /// creation is returned as [`ApiError::CreationFailed`] and not retried.
    pub async fn ensure_segment(
        &self,
        name: &str,
        parent: Option<CollectionId>,
        scope: LibraryScope,
    ) -> Result<CollectionNode, ApiError> {
        match self.find_child(parent, scope, name).await {
            Ok(Some(existing)) => {
                debug!(segment = name, id = %existing.id, "Segment already exists");
                return Ok(existing);
            }
            Ok(None) => {}
            Err(e) => {
                // Lookup failures fall through to creation.
                warn!(
                    segment = name,
                    scope = %scope,
                    error = %e,
                    "Segment lookup failed, creating anyway"
                );
            }
        }

        let created = self
            .store
            .create(name, parent, scope)
            .await
            .map_err(|source| ApiError::CreationFailed {
                name: name.to_string(),
                source,
            })?;
        info!(segment = name, id = %created.id, scope = %scope, "Created collection");
        Ok(created)
    }

    /// The root collection for this resolver's label in `scope`, if any.
    pub async fn find_root(&self, scope: LibraryScope) -> Result<Option<CollectionNode>, ApiError> {
        self.find_child(None, scope, &self.root_label).await
    }

    /// Look up the full chain for `date`. Never creates.
    ///
    /// Returns `Ok(None)` as soon as any segment is missing.
    pub async fn resolve_path(
        &self,
        date: NaiveDate,
        scope: LibraryScope,
    ) -> Result<Option<ResolvedChain>, ApiError> {
        let path = self.path_for(date);

        let Some(root) = self.find_root(scope).await? else {
            return Ok(None);
        };
        let Some(year) = self.find_child(Some(root.id), scope, &path.year).await? else {
            return Ok(None);
        };
        let Some(month) = self.find_child(Some(year.id), scope, &path.month).await? else {
            return Ok(None);
        };
        let Some(day) = self.find_child(Some(month.id), scope, &path.day).await? else {
            return Ok(None);
        };

        Ok(Some(ResolvedChain {
            root,
            year,
            month,
            day,
        }))
    }

    /// Ensure every segment for `date` exists, strictly top-down.
    ///
    /// Stops at the first creation failure; later segments would have no parent.
    pub async fn ensure_path(
        &self,
        date: NaiveDate,
        scope: LibraryScope,
    ) -> Result<ResolvedChain, ApiError> {
        let path = self.path_for(date);
        let root = self.ensure_segment(&path.root, None, scope).await?;
        let year = self.ensure_segment(&path.year, Some(root.id), scope).await?;
        let month = self.ensure_segment(&path.month, Some(year.id), scope).await?;
        let day = self.ensure_segment(&path.day, Some(month.id), scope).await?;
        Ok(ResolvedChain {
            root,
            year,
            month,
            day,
        })
    }
}
