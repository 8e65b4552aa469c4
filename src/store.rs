//! # Namespaced store — one JSON object per backend key
//!
//! This module is the core of the crate. [`Store`] caches a single JSON
//! object in memory and writes the whole object through to a persistent
//! backend on every mutation. All reads and writes go through the
//! [`StorageBackend`] trait, so the same logic works against an in-memory
//! map (tests, volatile fallback) or the filesystem. Implementations live
//! in sibling modules ([`crate::memory`], [`crate::file_store`]).
//!
//! ## Read path
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`open`](Store::open) | Reads and parses the namespace key once. Absent, unreadable, or corrupt data falls back to the empty object. Never fails. |
//! | [`fields`](Store::fields) | The entire cached object. |
//! | [`get`](Store::get) | One field, `None` if absent. |
//! | [`get_as`](Store::get_as) | One field, deserialized into a concrete type. |
//!
//! ## Write path
//!
//! Every write mutates the cache, serializes the **whole** object, and hands
//! it to the backend under the namespace key. There is no buffering and no
//! debouncing: after any successful write the persisted record equals the
//! serialization of the cache.
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`set_field`](Store::set_field) | Inserts or overwrites one field, then persists. |
//! | [`set_value`](Store::set_value) | Like `set_field`, but serializes any `Serialize` value first. |
//! | [`replace_all`](Store::replace_all) | Discards the cache and installs a new object, then persists. No merge. |
//!
//! Field-level write and whole-object replace are deliberately two distinct
//! methods rather than one nullable parameter, so an empty-string field name
//! always means a field named `""` and can never be mistaken for "replace
//! everything".
//!
//! ## Failure semantics
//!
//! Corrupt or unreadable persisted state is tolerated exactly once, at
//! [`open`](Store::open), by substituting the empty object and logging a
//! warning. Write failures are never tolerated: both `set_field` and
//! `replace_all` return the backend's error to the caller. No operation
//! retries anything.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{BackendError, StoreError};

/// A JSON object — the in-memory form of everything persisted under one
/// namespace key.
pub type Fields = Map<String, Value>;

/// Synchronous string-keyed persistent storage.
///
/// An absent key is `Ok(None)`, not an error. `set` may legitimately fail
/// (quota, permissions, I/O) and implementations must surface that rather
/// than swallow it.
pub trait StorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError>;
    fn set(&self, key: &str, value: &str) -> Result<(), BackendError>;
}

/// A write-through JSON object bound to one namespace key of a backend.
pub struct Store<B: StorageBackend> {
    backend: B,
    namespace: String,
    fields: Fields,
}

impl<B: StorageBackend> Store<B> {
    /// Open the store for `namespace`, reading whatever is persisted there.
    ///
    /// An absent key, an unreadable backend, malformed JSON, or JSON that is
    /// not an object all yield the empty object. The last two are logged;
    /// none of them fail construction.
    pub fn open(backend: B, namespace: &str) -> Self {
        let fields = match backend.get(namespace) {
            Ok(Some(raw)) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(fields)) => fields,
                Ok(_) => {
                    tracing::warn!(
                        "Stored value under {namespace:?} is not a JSON object, starting empty"
                    );
                    Fields::new()
                }
                Err(e) => {
                    tracing::warn!(
                        "Stored value under {namespace:?} is not valid JSON, starting empty: {e}"
                    );
                    Fields::new()
                }
            },
            Ok(None) => Fields::new(),
            Err(e) => {
                tracing::warn!("Could not read {namespace:?} from backend, starting empty: {e}");
                Fields::new()
            }
        };

        Self {
            backend,
            namespace: namespace.to_string(),
            fields,
        }
    }

    /// The namespace key this store persists under.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The entire cached object.
    ///
    /// This is a read-only view; only [`set_field`](Self::set_field) and
    /// [`replace_all`](Self::replace_all) persist anything.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Get one field, or `None` if it has never been set.
    pub fn get(&self, field: &str) -> Option<&Value> {
        let value = self.fields.get(field);
        tracing::trace!("get {field:?} in {:?} -> {value:?}", self.namespace);
        value
    }

    /// Get one field deserialized into `T`.
    ///
    /// Returns `None` when the field is absent or its stored shape does not
    /// deserialize into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, field: &str) -> Option<T> {
        let value = self.fields.get(field)?;
        serde_json::from_value(value.clone()).ok()
    }

    /// Insert or overwrite one field, then persist the whole object.
    pub fn set_field(&mut self, field: &str, value: Value) -> Result<(), StoreError> {
        tracing::debug!("set {field:?} in {:?}", self.namespace);
        self.fields.insert(field.to_string(), value);
        self.persist()
    }

    /// Serialize `value` and store it under `field`.
    pub fn set_value<T: Serialize>(&mut self, field: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)?;
        self.set_field(field, value)
    }

    /// Replace the entire object with `fields`, then persist. No merge:
    /// every previously stored field is discarded.
    pub fn replace_all(&mut self, fields: Fields) -> Result<(), StoreError> {
        tracing::debug!(
            "replace all of {:?} ({} fields)",
            self.namespace,
            fields.len()
        );
        self.fields = fields;
        self.persist()
    }

    fn persist(&self) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&self.fields)?;
        self.backend.set(&self.namespace, &raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use serde::Deserialize;
    use serde_json::json;

    fn obj(value: Value) -> Fields {
        match value {
            Value::Object(fields) => fields,
            other => panic!("expected a JSON object, got {other}"),
        }
    }

    /// Backend whose reads and writes both fail.
    struct BrokenBackend;

    impl StorageBackend for BrokenBackend {
        fn get(&self, _key: &str) -> Result<Option<String>, BackendError> {
            Err(BackendError::Unavailable("storage disabled".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), BackendError> {
            Err(BackendError::Unavailable("quota exceeded".to_string()))
        }
    }

    #[test]
    fn open_fresh_namespace_is_empty() {
        let store = Store::open(MemoryBackend::new(), "budget");
        assert!(store.fields().is_empty());
        assert_eq!(store.namespace(), "budget");
    }

    #[test]
    fn open_with_malformed_json_is_empty() {
        let backend = MemoryBackend::new();
        backend.set("budget", "{not json at all").unwrap();

        let store = Store::open(backend, "budget");
        assert!(store.fields().is_empty());
    }

    #[test]
    fn open_with_non_object_json_is_empty() {
        let backend = MemoryBackend::new();
        backend.set("budget", "42").unwrap();

        let store = Store::open(backend, "budget");
        assert!(store.fields().is_empty());
    }

    #[test]
    fn open_with_unreadable_backend_is_empty() {
        let store = Store::open(BrokenBackend, "budget");
        assert!(store.fields().is_empty());
    }

    #[test]
    fn set_field_then_get_returns_it() {
        let mut store = Store::open(MemoryBackend::new(), "budget");
        store.set_field("total", json!(125.5)).unwrap();

        assert_eq!(store.get("total"), Some(&json!(125.5)));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn field_writes_merge_in_call_order() {
        let mut store = Store::open(MemoryBackend::new(), "budget");
        store.set_field("a", json!(1)).unwrap();
        store.set_field("b", json!(2)).unwrap();
        store.set_field("a", json!(3)).unwrap();

        assert_eq!(store.fields(), &obj(json!({"a": 3, "b": 2})));
    }

    #[test]
    fn empty_string_is_a_field_name_not_a_replace() {
        let mut store = Store::open(MemoryBackend::new(), "budget");
        store.set_field("a", json!(1)).unwrap();
        store.set_field("", json!("anonymous")).unwrap();

        assert_eq!(store.get(""), Some(&json!("anonymous")));
        assert_eq!(store.get("a"), Some(&json!(1)));
    }

    #[test]
    fn replace_all_discards_previous_fields() {
        let mut store = Store::open(MemoryBackend::new(), "budget");
        store.replace_all(obj(json!({"a": 1}))).unwrap();
        store.replace_all(obj(json!({"b": 2}))).unwrap();

        assert_eq!(store.fields(), &obj(json!({"b": 2})));
    }

    #[test]
    fn every_write_is_flushed_through() {
        let backend = MemoryBackend::new();
        let mut store = Store::open(backend.clone(), "budget");

        store.set_field("a", json!([1, 2, 3])).unwrap();
        let raw = backend.get("budget").unwrap().unwrap();
        assert_eq!(raw, serde_json::to_string(store.fields()).unwrap());

        store.replace_all(obj(json!({"b": null}))).unwrap();
        let raw = backend.get("budget").unwrap().unwrap();
        assert_eq!(raw, serde_json::to_string(store.fields()).unwrap());
    }

    #[test]
    fn reads_never_write() {
        let backend = MemoryBackend::new();
        let mut store = Store::open(backend.clone(), "budget");
        store.set_field("a", json!(1)).unwrap();

        let before = backend.get("budget").unwrap();
        for _ in 0..10 {
            let _ = store.get("a");
            let _ = store.fields();
        }
        assert_eq!(backend.get("budget").unwrap(), before);
    }

    #[test]
    fn reopen_reproduces_last_written_object() {
        let backend = MemoryBackend::new();
        let state = obj(json!({
            "entries": [{"name": "rent", "amount": 900.0}, {"name": "food", "amount": 250}],
            "currency": "EUR",
            "archived": false,
            "note": null,
        }));

        let mut store = Store::open(backend.clone(), "budget");
        store.replace_all(state.clone()).unwrap();

        let reopened = Store::open(backend, "budget");
        assert_eq!(reopened.fields(), &state);
    }

    #[test]
    fn failing_backend_surfaces_write_error() {
        let mut store = Store::open(BrokenBackend, "budget");

        let err = store.set_field("a", json!(1)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Backend(BackendError::Unavailable(_))
        ));

        let err = store.replace_all(Fields::new()).unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[test]
    fn typed_accessors_roundtrip() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Totals {
            income: f64,
            spent: f64,
        }

        let mut store = Store::open(MemoryBackend::new(), "budget");
        let totals = Totals {
            income: 2000.0,
            spent: 1150.5,
        };
        store.set_value("totals", &totals).unwrap();

        assert_eq!(store.get_as::<Totals>("totals"), Some(totals));
        assert_eq!(store.get_as::<String>("totals"), None);
        assert_eq!(store.get_as::<Totals>("missing"), None);
    }
}
