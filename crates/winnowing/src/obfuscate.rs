//! Shared path obfuscation map.
//!
//! When obfuscation is on, the WFP header carries `<uuid><extension>` instead
//! of the real path. One map is shared by every engine that fingerprints the
//! same batch so results keyed by obfuscated paths can be mapped back.
//!
//! Guarantees:
//! - the same path always yields the same identifier;
//! - concurrent first-time insertions never lose entries;
//! - after any number of lookups over M distinct paths, `len() == M`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

#[derive(Debug, Default)]
struct Entries {
    forward: HashMap<String, String>,
    reverse: HashMap<String, String>,
}

/// Thread-safe bidirectional map from real paths to pseudonymous identifiers.
#[derive(Debug, Default)]
pub struct ObfuscationMap {
    entries: RwLock<Entries>,
}

impl ObfuscationMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Identifier for `path`, allocating one on first sight.
    pub fn obfuscate(&self, path: &str) -> String {
        if let Some(id) = self.read().forward.get(path) {
            return id.clone();
        }

        let mut entries = self.write();
        // Another thread may have inserted between the two locks.
        if let Some(id) = entries.forward.get(path) {
            return id.clone();
        }
        let id = format!("{}{}", Uuid::new_v4(), extension_of(path));
        entries.forward.insert(path.to_string(), id.clone());
        entries.reverse.insert(id.clone(), path.to_string());
        id
    }

    /// Original path for an identifier previously returned by [`Self::obfuscate`].
    pub fn deobfuscate(&self, id: &str) -> Option<String> {
        self.read().reverse.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `.ext` of the final path component, or an empty string.
fn extension_of(path: &str) -> String {
    Path::new(path)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
