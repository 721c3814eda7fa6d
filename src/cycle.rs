//! Tracks objects already visited during one top-level call.

use crate::graph::ObjectId;
use crate::sync::FastMap;

/// Identity-based registry of visited objects.
///
/// Each entry carries a sequential label of the form `{TypeName}--{n}`. A
/// registry belongs to exactly one top-level call and is never shared between
/// threads.
#[derive(Debug, Default)]
pub struct CycleRegistry {
    seen: FastMap<ObjectId, String>,
    next: usize,
}

impl CycleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the label of `id` if it was already registered.
    pub fn contains(&self, id: &ObjectId) -> Option<&str> {
        self.seen.get(id).map(String::as_str)
    }

    /// Registers `id` and returns its label. Idempotent: a second call returns
    /// the label minted by the first.
    pub fn add(&mut self, id: ObjectId, type_name: &str) -> &str {
        let next = &mut self.next;
        self.seen.entry(id).or_insert_with(|| {
            let label = format!("{type_name}--{next}");
            *next += 1;
            label
        })
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns true if nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Forgets every object and restarts the label sequence.
    pub fn clear(&mut self) {
        self.seen.clear();
        self.next = 0;
    }
}
