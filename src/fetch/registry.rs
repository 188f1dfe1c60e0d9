//! Backend registration and dispatch.
//!
//! An explicit owned value, created by the application's top-level context
//! and passed to whatever needs to look records up — never a process-wide
//! global. Registration order is priority order; the first enabled backend
//! to answer a lookup wins.

use crate::error::Result;
use crate::fetch::{BackendConfig, BackendKind, FetchBackend};
use crate::types::SequenceRecord;
use tracing::{debug, warn};

/// Ordered collection of enabled fetch backends
#[derive(Default)]
pub struct BackendRegistry {
    backends: Vec<FetchBackend>,
}

impl BackendRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable a backend.
    ///
    /// When `eager` is set, the backend opens its files / loads its index
    /// immediately and a failure fails the enable; otherwise opening is
    /// deferred to first use. Enabling a kind that is already registered
    /// replaces the previous registration in place, keeping its priority.
    pub fn enable(&mut self, config: BackendConfig, eager: bool) -> Result<()> {
        let mut backend = FetchBackend::from_config(config);
        if eager {
            backend.prepare()?;
        }
        let kind = backend.kind();
        match self.backends.iter_mut().find(|b| b.kind() == kind) {
            Some(slot) => *slot = backend,
            None => self.backends.push(backend),
        }
        debug!(?kind, eager, "backend enabled");
        Ok(())
    }

    /// Try each enabled backend strictly in registration order; the first
    /// to return a record wins. A backend that errors is logged and
    /// treated as "cannot answer", never fatal to the dispatch.
    pub fn dispatch(&mut self, identifier: &str) -> Option<SequenceRecord> {
        for backend in &mut self.backends {
            match backend.fetch(identifier) {
                Ok(Some(record)) => return Some(record),
                Ok(None) => continue,
                Err(e) => {
                    warn!(kind = ?backend.kind(), identifier, error = %e, "backend failed, skipping");
                    continue;
                }
            }
        }
        None
    }

    /// Disable one backend kind, dropping its file handles and cached
    /// index state.
    pub fn disable(&mut self, kind: BackendKind) {
        self.backends.retain(|b| b.kind() != kind);
        debug!(?kind, "backend disabled");
    }

    /// Tear down every backend (process shutdown)
    pub fn disable_all(&mut self) {
        self.backends.clear();
    }

    /// Whether a backend kind is currently enabled
    pub fn is_enabled(&self, kind: BackendKind) -> bool {
        self.backends.iter().any(|b| b.kind() == kind)
    }

    /// Number of enabled backends
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    /// True when no backend is enabled
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}
