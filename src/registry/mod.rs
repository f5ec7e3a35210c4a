//! # Resource Registry
//!
//! Key → singleton lookup used to publish shared capability objects, most
//! importantly the active [`LogFactory`](crate::logging::LogFactory) under
//! [`LOG_FACTORY_KEY`](crate::logging::LOG_FACTORY_KEY).
//!
//! Entries are registered once during startup and read many times after.
//! Registering an existing key overwrites it. There is no removal.
//!
//! Values are stored type-erased and handed back by clone, so resources are
//! usually registered as an `Arc<...>`:
//!
//! ```rust
//! use pipeline_failsafe::registry::ResourceRegistry;
//! use std::sync::Arc;
//!
//! let registry = ResourceRegistry::new();
//! registry.register("RateCache", Arc::new(vec![0.10_f64, 0.25]));
//!
//! let rates: Arc<Vec<f64>> = registry.get("RateCache").unwrap();
//! assert_eq!(rates.len(), 2);
//!
//! // Wrong type or unknown key: absent
//! assert!(registry.get::<Arc<String>>("RateCache").is_none());
//! assert!(registry.get::<Arc<Vec<f64>>>("Missing").is_none());
//! ```

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

type Entry = Arc<dyn Any + Send + Sync>;

/// Process-wide (per context) key → singleton mapping.
#[derive(Default)]
pub struct ResourceRegistry {
    entries: RwLock<HashMap<String, Entry>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `resource` under `key`, replacing any previous entry.
    pub fn register<R: Any + Send + Sync>(&self, key: impl Into<String>, resource: R) {
        let key = key.into();
        let replaced = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone(), Arc::new(resource))
            .is_some();

        if replaced {
            warn!(%key, resource = type_name::<R>(), "Resource replaced");
        } else {
            debug!(%key, resource = type_name::<R>(), "Resource registered");
        }
    }

    /// Looks up `key` and returns a clone of the resource if it has type `R`.
    pub fn get<R: Any + Clone>(&self, key: &str) -> Option<R> {
        let entry = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()?;

        let resource = entry.downcast_ref::<R>().cloned();
        if resource.is_none() {
            debug!(%key, expected = type_name::<R>(), "Resource has a different type");
        }
        resource
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<&String> = entries.keys().collect();
        keys.sort();
        f.debug_struct("ResourceRegistry").field("keys", &keys).finish()
    }
}
