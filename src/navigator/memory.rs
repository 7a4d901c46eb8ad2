//! In-memory tree view.
//!
//! Projects one header row per library followed by its collections,
//! depth-first, the way a host collection pane lists them. Library rows
//! start open; collection rows start closed. In lazy mode a toggled
//! container only shows its children after [`TreeView::settle`] runs.

use super::TreeView;
use crate::error::StoreError;
use crate::store::{CollectionNode, CollectionStore};
use crate::types::{CollectionId, LibraryScope};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum RowKey {
    Library(LibraryScope),
    Collection(CollectionId),
}

#[derive(Debug, Clone)]
enum RowKind {
    Library(LibraryScope),
    Collection(CollectionNode),
}

#[derive(Debug, Clone)]
struct Entry {
    kind: RowKind,
    depth: usize,
    children: Vec<usize>,
}

impl Entry {
    fn key(&self) -> RowKey {
        match &self.kind {
            RowKind::Library(scope) => RowKey::Library(*scope),
            RowKind::Collection(node) => RowKey::Collection(node.id),
        }
    }

    fn label(&self) -> String {
        match &self.kind {
            RowKind::Library(scope) => format!("Library {}", scope),
            RowKind::Collection(node) => node.name.clone(),
        }
    }
}

/// Deterministic [`TreeView`] over a snapshot of collections
pub struct MemoryTreeView {
    store: Option<Arc<dyn CollectionStore>>,
    scopes: Vec<LibraryScope>,
    entries: Vec<Entry>,
    top: Vec<usize>,
    open: HashSet<RowKey>,
    pending: HashSet<RowKey>,
    lazy: bool,
    rows: Vec<usize>,
    selected: Option<RowKey>,
}

impl MemoryTreeView {
    /// Build a view from collections already in hand.
    pub fn from_nodes(scopes: &[LibraryScope], nodes: &[CollectionNode]) -> Self {
        let mut view = Self {
            store: None,
            scopes: scopes.to_vec(),
            entries: Vec::new(),
            top: Vec::new(),
            open: scopes.iter().map(|scope| RowKey::Library(*scope)).collect(),
            pending: HashSet::new(),
            lazy: false,
            rows: Vec::new(),
            selected: None,
        };
        view.rebuild_entries(nodes);
        view
    }

    /// Build a view by walking `store` for each scope; [`TreeView::invalidate`]
    /// walks it again.
    pub async fn load(
        store: Arc<dyn CollectionStore>,
        scopes: &[LibraryScope],
    ) -> Result<Self, StoreError> {
        let nodes = fetch_nodes(store.as_ref(), scopes).await?;
        let mut view = Self::from_nodes(scopes, &nodes);
        view.store = Some(store);
        Ok(view)
    }

    /// Defer child rows of toggled containers until the view settles.
    pub fn with_lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    fn rebuild_entries(&mut self, nodes: &[CollectionNode]) {
        let mut by_parent: HashMap<(LibraryScope, Option<CollectionId>), Vec<&CollectionNode>> =
            HashMap::new();
        for node in nodes {
            by_parent
                .entry((node.scope, node.parent))
                .or_default()
                .push(node);
        }

        self.entries.clear();
        self.top.clear();
        for scope in &self.scopes {
            let library = self.entries.len();
            self.entries.push(Entry {
                kind: RowKind::Library(*scope),
                depth: 0,
                children: Vec::new(),
            });
            self.top.push(library);

            let mut queue = VecDeque::from([(library, *scope, None)]);
            while let Some((parent_entry, scope, parent_id)) = queue.pop_front() {
                let depth = self.entries[parent_entry].depth + 1;
                let Some(children) = by_parent.get(&(scope, parent_id)) else {
                    continue;
                };
                for child in children {
                    let index = self.entries.len();
                    self.entries.push(Entry {
                        kind: RowKind::Collection((*child).clone()),
                        depth,
                        children: Vec::new(),
                    });
                    self.entries[parent_entry].children.push(index);
                    queue.push_back((index, scope, Some(child.id)));
                }
            }
        }
        self.rebuild_rows();
    }

    fn rebuild_rows(&mut self) {
        let mut rows = Vec::with_capacity(self.entries.len());
        let mut stack: Vec<usize> = self.top.iter().rev().copied().collect();
        while let Some(index) = stack.pop() {
            rows.push(index);
            let entry = &self.entries[index];
            let key = entry.key();
            if self.open.contains(&key) && !self.pending.contains(&key) {
                stack.extend(entry.children.iter().rev().copied());
            }
        }
        self.rows = rows;
    }

    fn entry_at(&self, row: usize) -> Option<&Entry> {
        self.rows.get(row).map(|&index| &self.entries[index])
    }

    /// Row index of the current selection, if still visible.
    pub fn selected_row(&self) -> Option<usize> {
        let selected = self.selected?;
        self.rows
            .iter()
            .position(|&index| self.entries[index].key() == selected)
    }

    /// Indented text rendering of the visible rows; the selection is marked `*`.
    pub fn render_lines(&self) -> Vec<String> {
        let selected = self.selected_row();
        self.rows
            .iter()
            .enumerate()
            .map(|(row, &index)| {
                let entry = &self.entries[index];
                let marker = if entry.children.is_empty() {
                    ' '
                } else if self.open.contains(&entry.key()) {
                    '▾'
                } else {
                    '▸'
                };
                let cursor = if selected == Some(row) { '*' } else { ' ' };
                format!(
                    "{}{}{} {}",
                    cursor,
                    "  ".repeat(entry.depth),
                    marker,
                    entry.label()
                )
            })
            .collect()
    }
}

async fn fetch_nodes(
    store: &dyn CollectionStore,
    scopes: &[LibraryScope],
) -> Result<Vec<CollectionNode>, StoreError> {
    let mut nodes = Vec::new();
    for scope in scopes {
        let mut queue: VecDeque<CollectionNode> = store.roots_in(*scope).await?.into();
        while let Some(node) = queue.pop_front() {
            queue.extend(store.children_of(node.id).await?);
            nodes.push(node);
        }
    }
    Ok(nodes)
}

#[async_trait]
impl TreeView for MemoryTreeView {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn select_row(&mut self, index: usize) {
        self.selected = self.entry_at(index).map(Entry::key);
    }

    fn selected_node(&self) -> Option<CollectionNode> {
        let row = self.selected_row()?;
        match &self.entry_at(row)?.kind {
            RowKind::Collection(node) => Some(node.clone()),
            RowKind::Library(_) => None,
        }
    }

    fn is_container(&self, index: usize) -> bool {
        self.entry_at(index)
            .map(|entry| !entry.children.is_empty())
            .unwrap_or(false)
    }

    fn is_container_open(&self, index: usize) -> bool {
        self.entry_at(index)
            .map(|entry| self.open.contains(&entry.key()))
            .unwrap_or(false)
    }

    fn toggle_open_state(&mut self, index: usize) {
        let Some(key) = self.entry_at(index).map(Entry::key) else {
            return;
        };
        if self.open.remove(&key) {
            self.pending.remove(&key);
        } else {
            self.open.insert(key);
            if self.lazy {
                self.pending.insert(key);
            }
        }
        self.rebuild_rows();
    }

    async fn settle(&mut self, delay: Duration) {
        tokio::time::sleep(delay).await;
        if !self.pending.is_empty() {
            self.pending.clear();
            self.rebuild_rows();
        }
    }

    async fn invalidate(&mut self) {
        let Some(store) = self.store.clone() else {
            return;
        };
        match fetch_nodes(store.as_ref(), &self.scopes).await {
            Ok(nodes) => self.rebuild_entries(&nodes),
            Err(e) => warn!(error = %e, "Tree view reload failed, keeping stale rows"),
        }
    }
}
