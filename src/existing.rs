//! Existence Cache
//!
//! Walks the root subtree (years → months → days) and records which date
//! leaves exist. The set is rebuilt from scratch on every refresh and is only
//! a presentation hint; navigation never consults it.

use crate::error::ApiError;
use crate::hierarchy::HierarchyResolver;
use crate::path::{format_date, is_date_leaf_name};
use crate::types::LibraryScope;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Date leaf names observed under one root during one traversal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExistingDateSet {
    dates: BTreeSet<String>,
}

impl ExistingDateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.dates.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.dates.contains(name)
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.contains(&format_date(date))
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// All dates in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.dates.iter().map(String::as_str)
    }

    /// Dates falling in one month, ascending.
    pub fn in_month(&self, year: i32, month: u32) -> Vec<&str> {
        let prefix = format!("{:04}-{:02}-", year, month);
        self.dates
            .range(prefix.clone()..)
            .take_while(|name| name.starts_with(&prefix))
            .map(String::as_str)
            .collect()
    }
}

impl FromIterator<String> for ExistingDateSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

async fn collect_existing(
    resolver: &HierarchyResolver,
    scope: LibraryScope,
) -> Result<ExistingDateSet, ApiError> {
    let mut existing = ExistingDateSet::new();
    let Some(root) = resolver.find_root(scope).await? else {
        return Ok(existing);
    };

    let store = resolver.store();
    let lookup = |name: &str, source| ApiError::LookupFailure {
        name: name.to_string(),
        source,
    };
    for year in store
        .children_of(root.id)
        .await
        .map_err(|e| lookup(&root.name, e))?
    {
        for month in store
            .children_of(year.id)
            .await
            .map_err(|e| lookup(&year.name, e))?
        {
            for day in store
                .children_of(month.id)
                .await
                .map_err(|e| lookup(&month.name, e))?
            {
                if is_date_leaf_name(&day.name) {
                    existing.insert(day.name);
                }
            }
        }
    }
    Ok(existing)
}

/// Build the set of existing date leaves under the resolver's root in `scope`.
///
/// A missing root yields an empty set. Any traversal error is logged and also
/// yields an empty set rather than a partial one.
pub async fn refresh_existing(
    resolver: &HierarchyResolver,
    scope: LibraryScope,
) -> ExistingDateSet {
    match collect_existing(resolver, scope).await {
        Ok(existing) => {
            debug!(
                root = resolver.root_label(),
                scope = %scope,
                count = existing.len(),
                "Refreshed existing date folders"
            );
            existing
        }
        Err(e) => {
            warn!(
                root = resolver.root_label(),
                scope = %scope,
                error = %e,
                "Existing date scan failed"
            );
            ExistingDateSet::new()
        }
    }
}
