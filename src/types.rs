//! Core types for the daily folder hierarchy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// CollectionId: Opaque identifier assigned by the collection store on creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(pub u64);

impl CollectionId {
    pub fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// LibraryScope: The library a collection belongs to; boundary for uniqueness and queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibraryScope(pub u64);

impl LibraryScope {
    /// The personal library every host starts with.
    pub const USER: LibraryScope = LibraryScope(1);

    pub fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl Default for LibraryScope {
    fn default() -> Self {
        Self::USER
    }
}

impl fmt::Display for LibraryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
