//! # Store Registry
//!
//! One [`CollectionStore`] per record type under a shared root. Stores
//! are built on first request and reused afterwards.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use super::config::StoreConfig;
use super::errors::{CollectionError, CollectionResult};
use super::record::Record;
use super::store::CollectionStore;

type AnyStore = Arc<dyn Any + Send + Sync>;

#[derive(Debug, Default)]
struct Entries {
    /// Stores by record type
    stores: HashMap<TypeId, AnyStore>,
    /// Owning record type by collection name
    names: HashMap<String, TypeId>,
}

/// Registry of collection stores keyed by record type
#[derive(Debug)]
pub struct StoreRegistry {
    config: StoreConfig,
    entries: RwLock<Entries>,
}

impl StoreRegistry {
    /// Create a registry; fails if `config` is unusable
    pub fn new(config: StoreConfig) -> CollectionResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            entries: RwLock::new(Entries::default()),
        })
    }

    /// Shared configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Get the store for `R`, building it on first use.
    ///
    /// Fails with `Configuration` if a different record type already
    /// owns the same collection directory.
    pub fn collection<R: Record>(&self) -> CollectionResult<Arc<CollectionStore<R>>> {
        let key = TypeId::of::<R>();

        {
            let entries = self.entries.read()
                .map_err(|_| CollectionError::Internal("Lock poisoned".into()))?;
            if let Some(store) = entries.stores.get(&key) {
                return downcast::<R>(Arc::clone(store));
            }
        }

        let mut entries = self.entries.write()
            .map_err(|_| CollectionError::Internal("Lock poisoned".into()))?;

        // Another caller may have built it while we waited for the write lock
        if let Some(store) = entries.stores.get(&key) {
            return downcast::<R>(Arc::clone(store));
        }

        let name = R::collection_name();
        if entries.names.get(&name).is_some_and(|owner| *owner != key) {
            return Err(CollectionError::Configuration(format!(
                "collection '{}' is already owned by another record type ({} cannot share it)",
                name,
                std::any::type_name::<R>()
            )));
        }

        let store = Arc::new(CollectionStore::<R>::with_config(&self.config)?);
        debug!(collection = store.collection_name(), "registered collection store");
        entries.names.insert(name, key);
        entries.stores.insert(key, store.clone() as AnyStore);
        Ok(store)
    }

    /// Number of stores built so far
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .stores
            .len()
    }

    /// Whether no store has been built yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn downcast<R: Record>(store: AnyStore) -> CollectionResult<Arc<CollectionStore<R>>> {
    store
        .downcast::<CollectionStore<R>>()
        .map_err(|_| CollectionError::Internal("Registry entry has wrong type".into()))
}
