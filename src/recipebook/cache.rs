//! # Recipe Cache
//!
//! The cache is the authoritative, ordered in-memory collection of recipes and
//! the single source of truth for rendering. Insertion order is display order.
//!
//! ## Change Notification
//!
//! Every mutation bumps a generation counter published through a
//! [`tokio::sync::watch`] channel owned by the cache instance. Subscribers get
//! a [`CacheSubscription`]; the notification carries no payload, so consumers
//! re-pull state with [`Cache::get_all`] or [`Cache::get`] and derive their own
//! diffs.
//!
//! Notifications fire only for actual changes: updating or deleting an id
//! that is not cached is a no-op and leaves the generation untouched.
//!
//! ## Writers
//!
//! Mutators are crate-private. Outside this crate the cache is read-only;
//! inside, only [`crate::repository::RecipeRepository`] mutates it.

use crate::error::{RecipeError, Result};
use crate::model::{Recipe, RecipeId};
use crate::store::PersistentStore;
use tokio::sync::watch;

pub struct Cache {
    records: Vec<Recipe>,
    changes: watch::Sender<u64>,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

impl Cache {
    pub fn new() -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            records: Vec::new(),
            changes,
        }
    }

    pub fn subscribe(&self) -> CacheSubscription {
        CacheSubscription {
            rx: self.changes.subscribe(),
        }
    }

    /// Number of change notifications emitted so far.
    pub fn generation(&self) -> u64 {
        *self.changes.borrow()
    }

    pub fn get(&self, id: &RecipeId) -> Option<&Recipe> {
        self.records.iter().find(|r| r.id == *id)
    }

    /// Snapshot of the whole collection, in display order.
    pub fn get_all(&self) -> Vec<Recipe> {
        self.records.clone()
    }

    pub fn contains(&self, id: &RecipeId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: &RecipeId) -> Option<usize> {
        self.records.iter().position(|r| r.id == *id)
    }

    fn notify(&self) {
        self.changes.send_modify(|generation| *generation += 1);
    }

    pub(crate) fn add(&mut self, recipe: Recipe) {
        self.records.push(recipe);
        self.notify();
    }

    /// Replace the record with the same id. Returns false (and logs) when
    /// no such record exists.
    pub(crate) fn update(&mut self, recipe: Recipe) -> bool {
        match self.position(&recipe.id) {
            Some(index) => {
                self.records[index] = recipe;
                self.notify();
                true
            }
            None => {
                tracing::warn!("Ignoring update for uncached recipe {}", recipe.id);
                false
            }
        }
    }

    pub(crate) fn delete(&mut self, id: &RecipeId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.records.remove(index);
                self.notify();
                true
            }
            None => false,
        }
    }

    /// Swap the cached records for the store's contents. A failed read
    /// leaves the cache as it was.
    pub(crate) async fn replace_from_store(
        &mut self,
        store: &dyn PersistentStore,
    ) -> Result<usize> {
        let stored = read_all(store).await?;
        let count = stored.len();
        self.records = stored;
        self.notify();
        Ok(count)
    }

    /// Append every stored record in one pass, emitting a single
    /// notification. Records already cached are not deduplicated.
    pub(crate) async fn restore_from_store(
        &mut self,
        store: &dyn PersistentStore,
    ) -> Result<usize> {
        let stored = read_all(store).await?;
        let count = stored.len();
        if count > 0 {
            self.records.extend(stored);
            self.notify();
            tracing::info!(
                "Restored {} {} from store",
                count,
                if count == 1 { "recipe" } else { "recipes" }
            );
        }
        Ok(count)
    }
}

async fn read_all(store: &dyn PersistentStore) -> Result<Vec<Recipe>> {
    store.get_all().await.map_err(|e| match e {
        RecipeError::StoreRead(_) | RecipeError::NotConnected => e,
        other => RecipeError::StoreRead(other.to_string()),
    })
}

/// Receiving end of a cache's change notifications.
pub struct CacheSubscription {
    rx: watch::Receiver<u64>,
}

impl CacheSubscription {
    /// Whether the cache changed since the last [`mark_seen`](Self::mark_seen).
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Acknowledge pending changes, returning the current generation.
    pub fn mark_seen(&mut self) -> u64 {
        *self.rx.borrow_and_update()
    }

    /// Wait for the next change. Returns false once the cache is dropped.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
