//! Daily Folder API
//!
//! Entry points used by a presentation layer: jump to a date's folder,
//! optionally creating it, and scan which dates already have one.

use crate::config::DailyFolderConfig;
use crate::error::ApiError;
use crate::existing::{self, ExistingDateSet};
use crate::hierarchy::{HierarchyResolver, ResolvedChain};
use crate::navigator::{TreeNavigator, TreeView};
use crate::path::{format_date, parse_date, today, DEFAULT_ROOT_LABEL};
use crate::store::{CollectionNode, CollectionStore};
use crate::types::LibraryScope;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Resolver and navigator bound to one store and configuration
pub struct DailyFolderApi {
    resolver: HierarchyResolver,
    navigator: TreeNavigator,
    default_scope: LibraryScope,
}

impl DailyFolderApi {
    pub fn new(store: Arc<dyn CollectionStore>, config: &DailyFolderConfig) -> Self {
        Self {
            resolver: HierarchyResolver::new(store, config.root_label()),
            navigator: TreeNavigator::new(config.navigation.settle_delay()),
            default_scope: config.default_scope,
        }
    }

    pub fn resolver(&self) -> &HierarchyResolver {
        &self.resolver
    }

    pub fn navigator(&self) -> &TreeNavigator {
        &self.navigator
    }

    pub fn default_scope(&self) -> LibraryScope {
        self.default_scope
    }

    /// Select the folder for `date_str` in `view`, creating the chain first
    /// when `create_if_missing` is set.
    ///
    /// Returns the resolved day collection. Every failure is logged and
    /// reported as `None`; a missing chain without creation is not a failure.
    pub async fn goto_date<V>(
        &self,
        view: &mut V,
        date_str: &str,
        scope: LibraryScope,
        create_if_missing: bool,
    ) -> Option<CollectionNode>
    where
        V: TreeView + ?Sized,
    {
        match self.try_goto_date(view, date_str, scope, create_if_missing).await {
            Ok(node) => node,
            Err(e) => {
                let segment = match &e {
                    ApiError::LookupFailure { name, .. }
                    | ApiError::CreationFailed { name, .. } => name.as_str(),
                    ApiError::NavigationIncomplete { segment } => segment.as_str(),
                    _ => "",
                };
                error!(
                    date = date_str,
                    segment,
                    scope = %scope,
                    error = %e,
                    "Go to date failed"
                );
                None
            }
        }
    }

    async fn try_goto_date<V>(
        &self,
        view: &mut V,
        date_str: &str,
        scope: LibraryScope,
        create_if_missing: bool,
    ) -> Result<Option<CollectionNode>, ApiError>
    where
        V: TreeView + ?Sized,
    {
        let date = parse_date(date_str)?;
        let chain = match self.resolver.resolve_path(date, scope).await? {
            Some(chain) => chain,
            None if !create_if_missing => {
                debug!(date = date_str, scope = %scope, "No folder for date, not creating");
                return Ok(None);
            }
            None => {
                self.resolver.ensure_path(date, scope).await?;
                view.invalidate().await;
                // Re-resolve so navigation uses the store's canonical nodes.
                match self.resolver.resolve_path(date, scope).await? {
                    Some(chain) => chain,
                    None => {
                        let path = self.resolver.path_for(date);
                        return Err(ApiError::NavigationIncomplete { segment: path.day });
                    }
                }
            }
        };

        let node = self.navigator.navigate_to_chain(view, &chain).await?;
        info!(date = date_str, id = %node.id, scope = %scope, "Navigated to date folder");
        Ok(Some(node))
    }

    /// Jump to today's folder, creating it if needed.
    pub async fn goto_today<V>(&self, view: &mut V, scope: LibraryScope) -> Option<CollectionNode>
    where
        V: TreeView + ?Sized,
    {
        let date = format_date(today());
        self.goto_date(view, &date, scope, true).await
    }

    /// Dates that already have a folder under the configured root.
    pub async fn refresh_existing(&self, scope: LibraryScope) -> ExistingDateSet {
        existing::refresh_existing(&self.resolver, scope).await
    }

    /// Dates that already have a folder under `root_label`, which may differ
    /// from the configured label. A blank label falls back to the default.
    pub async fn refresh_existing_under(
        &self,
        root_label: &str,
        scope: LibraryScope,
    ) -> ExistingDateSet {
        let label = match root_label.trim() {
            "" => DEFAULT_ROOT_LABEL,
            label => label,
        };
        let resolver = HierarchyResolver::new(self.resolver.store().clone(), label);
        existing::refresh_existing(&resolver, scope).await
    }

    /// Look up the chain for `date_str` without creating or navigating.
    pub async fn resolve_date(
        &self,
        date_str: &str,
        scope: LibraryScope,
    ) -> Result<Option<ResolvedChain>, ApiError> {
        let date = parse_date(date_str)?;
        self.resolver.resolve_path(date, scope).await
    }
}
