// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Persisted view preferences.
//!
//! The engine stores a single preference, the label column width, in a
//! key-value store supplied by the host. Keys are scoped per company and
//! location so two sites sharing a browser profile (or a config directory)
//! keep separate layouts.

use serde_json::Value;

use crate::error::StorageError;

/// Key holding the label column width in pixels.
pub const LABEL_WIDTH_KEY: &str = "monitoring.timeline.labels.width";

/// Width used when nothing usable is stored.
pub const DEFAULT_LABEL_WIDTH: f64 = 280.0;

/// A host-provided key-value store.
pub trait KeyValueStore {
    /// Reads `key` in `scope`.
    fn get(&self, scope: &str, key: &str) -> Result<Option<Value>, StorageError>;

    /// Writes `key` in `scope`.
    fn set(&mut self, scope: &str, key: &str, value: Value) -> Result<(), StorageError>;
}

/// A [`KeyValueStore`] bound to one company and location.
#[derive(Debug)]
pub struct ScopedStore<K> {
    inner: K,
    scope: String,
}

impl<K: KeyValueStore> ScopedStore<K> {
    /// Binds `inner` to a location scope.
    ///
    /// Both identifiers are required.
    pub fn new(inner: K, company: &str, location: &str) -> Result<Self, StorageError> {
        if company.trim().is_empty() {
            return Err(StorageError::MissingScope("company"));
        }
        if location.trim().is_empty() {
            return Err(StorageError::MissingScope("location"));
        }
        Ok(Self {
            inner,
            scope: format!("location:{company}:{location}"),
        })
    }

    /// The scope string keys are stored under.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Reads a key in this scope.
    pub fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        self.inner.get(&self.scope, key)
    }

    /// Writes a key in this scope.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), StorageError> {
        self.inner.set(&self.scope, key, value)
    }

    /// The wrapped store.
    pub fn inner(&self) -> &K {
        &self.inner
    }

    /// Mutable access to the wrapped store.
    pub fn inner_mut(&mut self) -> &mut K {
        &mut self.inner
    }
}

/// Interprets a stored width.
///
/// Numbers and numeric strings are accepted; anything else is `None`.
pub(crate) fn parse_width(value: &Value) -> Option<f64> {
    let width = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    width.filter(|w| w.is_finite())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::MemoryStore;

    #[test]
    fn scope_requires_both_ids() {
        assert!(matches!(
            ScopedStore::new(MemoryStore::default(), "", "hq"),
            Err(StorageError::MissingScope("company"))
        ));
        assert!(matches!(
            ScopedStore::new(MemoryStore::default(), "acme", " "),
            Err(StorageError::MissingScope("location"))
        ));
        let store = ScopedStore::new(MemoryStore::default(), "acme", "hq").unwrap();
        assert_eq!(store.scope(), "location:acme:hq");
    }

    #[test]
    fn scoped_keys_do_not_leak() {
        let mut a = ScopedStore::new(MemoryStore::default(), "acme", "hq").unwrap();
        a.set(LABEL_WIDTH_KEY, json!(120)).unwrap();
        let shared = a.inner().clone();
        let b = ScopedStore::new(shared, "acme", "depot").unwrap();
        assert_eq!(b.get(LABEL_WIDTH_KEY).unwrap(), None);
        assert_eq!(a.get(LABEL_WIDTH_KEY).unwrap(), Some(json!(120)));
    }

    #[test]
    fn widths_parse_leniently() {
        assert_eq!(parse_width(&json!(150)), Some(150.0));
        assert_eq!(parse_width(&json!("175.5")), Some(175.5));
        assert_eq!(parse_width(&json!("wide")), None);
        assert_eq!(parse_width(&json!(null)), None);
    }
}
