//! Tree Navigator
//!
//! Drives a row-indexed tree view to a resolved chain. The view may only
//! materialize a container's child rows some time after it is toggled open,
//! so every expansion is followed by an awaited settle delay before the next
//! scan.
//!
//! Rows are depth-first: once a container is open, its descendants follow it
//! directly. Each scan therefore starts just past the previous match, which
//! keeps a same-named node in another branch (for example a `2025` under a
//! different root) from being picked.

pub mod memory;

use crate::error::ApiError;
use crate::hierarchy::ResolvedChain;
use crate::store::CollectionNode;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

pub use memory::MemoryTreeView;

/// Default settle delay after expanding a container row
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(250);

/// Row-indexed tree view provided by the presentation layer
#[async_trait]
pub trait TreeView: Send {
    /// Number of currently visible rows.
    fn row_count(&self) -> usize;

    /// Make `index` the selected row.
    fn select_row(&mut self, index: usize);

    /// Collection behind the selected row, if that row is a collection.
    fn selected_node(&self) -> Option<CollectionNode>;

    fn is_container(&self, index: usize) -> bool;

    fn is_container_open(&self, index: usize) -> bool;

    fn toggle_open_state(&mut self, index: usize);

    /// Wait for rows of a just-toggled container to materialize.
    async fn settle(&mut self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }

    /// Pick up collections created since the view was built.
    async fn invalidate(&mut self) {}
}

/// Scans and expands rows of a [`TreeView`]
#[derive(Debug, Clone)]
pub struct TreeNavigator {
    settle_delay: Duration,
}

impl TreeNavigator {
    pub fn new(settle_delay: Duration) -> Self {
        Self { settle_delay }
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Scan rows from `start` for a collection named `name`.
    ///
    /// Each row is selected and read back. A matching closed container is
    /// opened and given time to settle. Returns the matching row index, or
    /// `None` once every row has been scanned.
    pub async fn find_and_expand<V>(&self, view: &mut V, name: &str, start: usize) -> Option<usize>
    where
        V: TreeView + ?Sized,
    {
        debug!(segment = name, start, "Scanning tree rows");
        let mut cursor = start;
        while cursor < view.row_count() {
            view.select_row(cursor);
            let matched = view
                .selected_node()
                .map(|node| node.name == name)
                .unwrap_or(false);
            if matched {
                if view.is_container(cursor) && !view.is_container_open(cursor) {
                    debug!(segment = name, index = cursor, "Expanding row");
                    view.toggle_open_state(cursor);
                    view.settle(self.settle_delay).await;
                }
                return Some(cursor);
            }
            cursor += 1;
        }
        debug!(segment = name, start, "Segment not found in rows");
        None
    }

    /// Scan rows from `start` for `name` and leave it selected without expanding.
    fn find_and_select<V>(&self, view: &mut V, name: &str, start: usize) -> Option<usize>
    where
        V: TreeView + ?Sized,
    {
        (start..view.row_count()).find(|&index| {
            view.select_row(index);
            view.selected_node()
                .map(|node| node.name == name)
                .unwrap_or(false)
        })
    }

    /// Expand root, year and month in turn and select the day row.
    ///
    /// Returns the chain's resolved leaf, not the row's node, so a same-named
    /// row from another library never leaks out. On failure the last
    /// successful selection stays in place.
    pub async fn navigate_to_chain<V>(
        &self,
        view: &mut V,
        chain: &ResolvedChain,
    ) -> Result<CollectionNode, ApiError>
    where
        V: TreeView + ?Sized,
    {
        let mut start = 0;
        for node in [&chain.root, &chain.year, &chain.month] {
            match self.find_and_expand(view, &node.name, start).await {
                Some(index) => start = index + 1,
                None => {
                    warn!(segment = %node.name, "Navigation stopped");
                    return Err(ApiError::NavigationIncomplete {
                        segment: node.name.clone(),
                    });
                }
            }
        }

        let leaf = chain.leaf();
        match self.find_and_select(view, &leaf.name, start) {
            Some(index) => {
                info!(segment = %leaf.name, index, "Selected date folder");
                Ok(leaf.clone())
            }
            None => {
                warn!(segment = %leaf.name, "Navigation stopped");
                Err(ApiError::NavigationIncomplete {
                    segment: leaf.name.clone(),
                })
            }
        }
    }
}

impl Default for TreeNavigator {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLE_DELAY)
    }
}
