//! Typed wrappers binding values to a backing store.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::key::PersistKey;
use super::notify::ChangeNotifier;
use super::store::PersistentStore;

/// A named, typed slot in a backing store.
///
/// Reads never fail: a missing entry, or one that cannot be coerced back to
/// `T`, falls back to the default. Every read round-trips to the store;
/// nothing is cached in the wrapper.
///
/// Optional values belong in [`PersistedOptional`], which gives `None` its
/// remove-the-entry semantics. Storing an `Option<T>` through this type
/// would persist a null marker instead.
///
/// ```
/// use prefkit::{MemoryStore, PersistedValue};
/// use std::sync::Arc;
///
/// let store = Arc::new(MemoryStore::new());
/// let username = PersistedValue::new(store, "username", String::new());
///
/// assert_eq!(username.read(), "");
/// username.write("bdaralan".to_owned());
/// assert_eq!(username.read(), "bdaralan");
/// ```
#[derive(Clone)]
pub struct PersistedValue<T> {
    store: Arc<dyn PersistentStore>,
    key: String,
    default: T,
    notifier: Option<ChangeNotifier>,
}

impl<T> PersistedValue<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(store: Arc<dyn PersistentStore>, key: impl Into<String>, default: T) -> Self {
        PersistedValue {
            store,
            key: key.into(),
            default,
            notifier: None,
        }
    }

    /// Construct with a namespaced key.
    pub fn keyed(store: Arc<dyn PersistentStore>, key: &dyn PersistKey, default: T) -> Self {
        PersistedValue::new(store, key.prefixed_key(), default)
    }

    /// Post a `ChangeEvent` on `notifier` after every successful write.
    pub fn with_notifier(mut self, notifier: ChangeNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The stored value, or the default when the entry is absent or has the
    /// wrong shape.
    pub fn read(&self) -> T {
        match self.store.get_value(&self.key) {
            Some(raw) => match serde_json::from_value(raw) {
                Ok(value) => value,
                Err(e) => {
                    warn!(key = %self.key, error = %e, "Stored value has the wrong shape, using default");
                    self.default.clone()
                }
            },
            None => self.default.clone(),
        }
    }

    /// Store a new value, overwriting any prior entry.
    pub fn write(&self, value: T) {
        let encoded = match serde_json::to_value(&value) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!(key = %self.key, error = %e, "Failed to encode value, keeping previous entry");
                return;
            }
        };
        self.store.set_value(&self.key, Some(encoded.clone()));
        debug!(key = %self.key, "Wrote persisted value");
        if let Some(notifier) = &self.notifier {
            notifier.post(&self.key, Some(encoded));
        }
    }
}

/// The optional form of [`PersistedValue`].
///
/// Writing `None` removes the store entry instead of persisting a null
/// marker, so a later [`read`](PersistedOptional::read) falls back to the
/// default rather than reporting a stored null.
#[derive(Clone)]
pub struct PersistedOptional<T> {
    store: Arc<dyn PersistentStore>,
    key: String,
    default: Option<T>,
    notifier: Option<ChangeNotifier>,
}

impl<T> PersistedOptional<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(
        store: Arc<dyn PersistentStore>,
        key: impl Into<String>,
        default: Option<T>,
    ) -> Self {
        PersistedOptional {
            store,
            key: key.into(),
            default,
            notifier: None,
        }
    }

    /// Construct with a namespaced key.
    pub fn keyed(
        store: Arc<dyn PersistentStore>,
        key: &dyn PersistKey,
        default: Option<T>,
    ) -> Self {
        PersistedOptional::new(store, key.prefixed_key(), default)
    }

    /// Post a `ChangeEvent` on `notifier` after every successful write.
    pub fn with_notifier(mut self, notifier: ChangeNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The stored value, or the default when the entry is absent or has the
    /// wrong shape.
    pub fn read(&self) -> Option<T> {
        match self.store.get_value(&self.key) {
            Some(raw) => match serde_json::from_value(raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(key = %self.key, error = %e, "Stored value has the wrong shape, using default");
                    self.default.clone()
                }
            },
            None => self.default.clone(),
        }
    }

    /// Store a new value; `None` removes the entry.
    pub fn write(&self, value: Option<T>) {
        let Some(value) = value else {
            self.store.set_value(&self.key, None);
            debug!(key = %self.key, "Removed persisted value");
            if let Some(notifier) = &self.notifier {
                notifier.post(&self.key, None);
            }
            return;
        };

        let encoded = match serde_json::to_value(&value) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!(key = %self.key, error = %e, "Failed to encode value, keeping previous entry");
                return;
            }
        };
        self.store.set_value(&self.key, Some(encoded.clone()));
        debug!(key = %self.key, "Wrote persisted value");
        if let Some(notifier) = &self.notifier {
            notifier.post(&self.key, Some(encoded));
        }
    }
}
