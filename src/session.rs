//! Sessions and their resources
//!
//! A session is one attached presentation surface (a window, a terminal run).
//! The owning lifecycle attaches it, and must detach it explicitly; detaching
//! releases the session's resources in reverse acquisition order.

use crate::error::ApiError;
use crate::existing::ExistingDateSet;
use crate::types::LibraryScope;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, warn};

/// Identifier chosen by the owning lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

type Release = Box<dyn FnOnce() -> Result<(), ApiError> + Send>;

/// Ordered list of acquired resources and how to release them
#[derive(Default)]
pub struct ResourceGuards {
    releases: Vec<(String, Release)>,
}

impl ResourceGuards {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resource; `release` runs once on teardown.
    pub fn push<F>(&mut self, label: impl Into<String>, release: F)
    where
        F: FnOnce() -> Result<(), ApiError> + Send + 'static,
    {
        self.releases.push((label.into(), Box::new(release)));
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    /// Release everything, newest first. A failing release is logged and
    /// does not stop the rest. Returns the labels that failed.
    pub fn release_all(&mut self) -> Vec<String> {
        let mut failed = Vec::new();
        while let Some((label, release)) = self.releases.pop() {
            match release() {
                Ok(()) => debug!(resource = %label, "Released"),
                Err(e) => {
                    warn!(resource = %label, error = %e, "Release failed");
                    failed.push(label);
                }
            }
        }
        failed
    }
}

impl fmt::Debug for ResourceGuards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.releases.iter().map(|(label, _)| label))
            .finish()
    }
}

impl Drop for ResourceGuards {
    fn drop(&mut self) {
        if !self.releases.is_empty() {
            warn!(pending = self.releases.len(), "Resource guards dropped without teardown");
            self.release_all();
        }
    }
}

/// State held for one attached session
#[derive(Debug)]
pub struct Session {
    pub scope: LibraryScope,
    /// Last existence scan shown in this session
    pub existing: ExistingDateSet,
    pub guards: ResourceGuards,
}

impl Session {
    pub fn new(scope: LibraryScope) -> Self {
        Self {
            scope,
            existing: ExistingDateSet::new(),
            guards: ResourceGuards::new(),
        }
    }
}

/// Explicit session-id keyed registry
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a session. Re-attaching an id tears down the previous one first.
    pub fn attach(&self, id: SessionId, scope: LibraryScope) {
        let previous = self.sessions.write().insert(id.clone(), Session::new(scope));
        if let Some(mut previous) = previous {
            warn!(session = %id, "Session re-attached, tearing down previous state");
            previous.guards.release_all();
        }
        info!(session = %id, scope = %scope, "Session attached");
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Run `f` against the session's state.
    pub fn with_session<R>(&self, id: &SessionId, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let mut sessions = self.sessions.write();
        sessions.get_mut(id).map(f)
    }

    /// Remove a session and release its resources. Returns the labels of
    /// releases that failed, or `None` if the session was not attached.
    pub fn detach(&self, id: &SessionId) -> Option<Vec<String>> {
        // Release outside the lock; releases may call back into the registry.
        let mut session = self.sessions.write().remove(id)?;
        let failed = session.guards.release_all();
        info!(session = %id, failed = failed.len(), "Session detached");
        Some(failed)
    }

    /// Detach every session, e.g. on shutdown.
    pub fn detach_all(&self) -> usize {
        let drained: Vec<(SessionId, Session)> = self.sessions.write().drain().collect();
        let count = drained.len();
        for (id, mut session) in drained {
            let failed = session.guards.release_all();
            debug!(session = %id, failed = failed.len(), "Session detached on shutdown");
        }
        count
    }
}
