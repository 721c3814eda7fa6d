//! Thread-safe store of compiled procedures.
//!
//! The cache implements a compile-once protocol without ever blocking a
//! caller on someone else's compilation:
//!
//! 1. [`ProcedureCache::try_find`] under the read lock.
//! 2. On [`Lookup::Miss`], [`ProcedureCache::mark_building`] under the write
//!    lock. Exactly one caller wins the mark for a key.
//! 3. The winner compiles with no lock held, then calls
//!    [`ProcedureCache::install`] (or [`ProcedureCache::abandon`] on failure).
//!
//! Callers that observe [`Lookup::Building`], or lose the mark, take the
//! interpreted path for that one call.

use crate::error::{DumpError, Result};
use crate::graph::{CacheKey, CompiledProcedure};
use crate::sync::{FastHash, FastMap, Guarded};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Outcome of a cache lookup.
#[derive(Debug, Clone)]
pub enum Lookup {
    /// A complete, ready-to-run procedure.
    Found(Arc<CompiledProcedure>),
    /// Another caller is compiling the key right now.
    Building,
    /// Nothing is known about the key.
    Miss,
}

#[derive(Debug, Default)]
struct CacheState {
    procedures: FastMap<CacheKey, Arc<CompiledProcedure>>,
    building: HashSet<CacheKey, FastHash>,
}

/// Map of [`CacheKey`] to [`CompiledProcedure`] plus the set of keys being
/// compiled.
#[derive(Debug, Default)]
pub struct ProcedureCache {
    state: Guarded<CacheState>,
    installs: AtomicUsize,
}

impl ProcedureCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks `key` up.
    pub fn try_find(&self, key: &CacheKey) -> Lookup {
        self.state.read(|state| {
            if let Some(procedure) = state.procedures.get(key) {
                Lookup::Found(Arc::clone(procedure))
            } else if state.building.contains(key) {
                Lookup::Building
            } else {
                Lookup::Miss
            }
        })
    }

    /// Claims the right to compile `key`.
    ///
    /// Returns false if the key is already installed or another caller holds
    /// the claim.
    pub fn mark_building(&self, key: &CacheKey) -> bool {
        self.state.write(|state| {
            if state.procedures.contains_key(key) {
                return false;
            }
            state.building.insert(key.clone())
        })
    }

    /// Installs a procedure and clears the key's building marker.
    ///
    /// # Errors
    /// `InvalidCacheState` if `key` was not marked as building.
    pub fn install(
        &self,
        key: CacheKey,
        procedure: CompiledProcedure,
    ) -> Result<Arc<CompiledProcedure>> {
        let procedure = Arc::new(procedure);
        self.state.write(|state| {
            if !state.building.remove(&key) {
                return Err(DumpError::InvalidCacheState(format!(
                    "install of {key} without a building marker"
                )));
            }
            tracing::debug!(key = %key, steps = procedure.steps().len(), "installed dump procedure");
            state.procedures.insert(key, Arc::clone(&procedure));
            self.installs.fetch_add(1, Ordering::Relaxed);
            Ok(procedure)
        })
    }

    /// Releases a building claim without installing anything.
    pub fn abandon(&self, key: &CacheKey) {
        self.state.write(|state| {
            state.building.remove(key);
        });
    }

    /// Drops every procedure and building marker.
    pub fn reset(&self) {
        self.state.write(|state| {
            tracing::debug!(procedures = state.procedures.len(), "resetting procedure cache");
            state.procedures.clear();
            state.building.clear();
        });
    }

    /// Number of installed procedures.
    pub fn len(&self) -> usize {
        self.state.read(|state| state.procedures.len())
    }

    /// Returns true if nothing is installed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of keys being compiled.
    pub fn building(&self) -> usize {
        self.state.read(|state| state.building.len())
    }

    /// Total installs since creation. Not reset by [`ProcedureCache::reset`].
    pub fn installs(&self) -> usize {
        self.installs.load(Ordering::Relaxed)
    }

    /// Installed procedures, sorted by type name.
    pub fn snapshot(&self) -> Vec<Arc<CompiledProcedure>> {
        let mut procedures: Vec<_> =
            self.state.read(|state| state.procedures.values().cloned().collect());
        procedures.sort_by(|a, b| a.key().type_name().cmp(b.key().type_name()));
        procedures
    }
}
