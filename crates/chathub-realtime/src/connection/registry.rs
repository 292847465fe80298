//! Concurrency-safe registry of all live connections.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use chathub_core::types::ConnectionId;
use chathub_core::{AppError, AppResult};

use super::handle::ConnectionHandle;

/// Thread-safe mapping from connection identifier to live handle.
///
/// Mutated by concurrent sessions (insert on join, remove on leave) and
/// iterated by the broadcaster. An identifier appears at most once at any
/// time; absence means the session has fully torn down or not yet started.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, Arc<ConnectionHandle>>,
}

impl ConnectionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Register a new open connection, keyed by its id.
    ///
    /// A duplicate identifier is a `Conflict` error; with v4 identifiers
    /// this indicates a generator defect and the caller treats it as fatal
    /// for the session.
    pub fn register(&self, handle: Arc<ConnectionHandle>) -> AppResult<()> {
        match self.connections.entry(handle.id) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "connection {} already registered",
                handle.id
            ))),
            Entry::Vacant(entry) => {
                entry.insert(handle);
                Ok(())
            }
        }
    }

    /// Remove a connection, returning its handle.
    ///
    /// Idempotent: removing an absent identifier is a no-op returning
    /// `None`, so double-teardown is tolerated.
    pub fn deregister(&self, id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.connections.remove(id).map(|(_, handle)| handle)
    }

    /// Return all currently registered handles at call time.
    ///
    /// Safe to iterate without blocking concurrent register/deregister.
    pub fn snapshot(&self) -> Vec<Arc<ConnectionHandle>> {
        self.connections
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Count of registered connections whose transport is currently open.
    pub fn open_count(&self) -> usize {
        self.connections
            .iter()
            .filter(|entry| entry.value().is_open())
            .count()
    }

    /// Total number of registered connections, open or not.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
