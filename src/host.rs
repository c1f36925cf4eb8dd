//! Capabilities the embedding page provides to the widget.
//!
//! In a browser these are `window.location`/`history`, `localStorage` and
//! `crypto.getRandomValues`. The in-memory versions here back non-browser
//! hosts and tests.

use std::collections::HashMap;

use rand::RngCore;
use thiserror::Error;
use url::Url;

/// The page address bar.
pub trait Location {
    fn href(&self) -> Url;

    /// Rewrite the visible URL without navigating (`history.replaceState`).
    fn replace_state(&mut self, url: Url);

    /// Navigate away (`location.assign`).
    fn assign(&mut self, url: Url);
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read storage: {0}")]
    Read(String),

    #[error("Failed to write storage: {0}")]
    Write(String),
}

/// Durable, page-scoped key-value storage (`localStorage`).
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Source of cryptographically secure random words.
pub trait RandomSource {
    fn fill_u32(&mut self, dest: &mut [u32]);
}

/// Thread-local CSPRNG seeded from the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_u32(&mut self, dest: &mut [u32]) {
        let mut rng = rand::rng();
        for word in dest.iter_mut() {
            *word = rng.next_u32();
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

/// A location that only records what the widget asked for.
#[derive(Debug, Clone)]
pub struct MemoryLocation {
    current: Url,
    assigned: Option<Url>,
}

impl MemoryLocation {
    pub fn new(current: Url) -> Self {
        MemoryLocation {
            current,
            assigned: None,
        }
    }

    /// The last URL passed to `assign`, if the widget navigated away.
    pub fn assigned(&self) -> Option<&Url> {
        self.assigned.as_ref()
    }
}

impl Location for MemoryLocation {
    fn href(&self) -> Url {
        self.current.clone()
    }

    fn replace_state(&mut self, url: Url) {
        self.current = url;
    }

    fn assign(&mut self, url: Url) {
        self.assigned = Some(url.clone());
        self.current = url;
    }
}
