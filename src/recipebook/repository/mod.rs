//! # Recipe Repository
//!
//! The single entry point for recipe mutations. Every mutation is applied to
//! the [`Cache`] first and synchronously, then handed to the write-behind
//! worker for the [`PersistentStore`]. Callers never wait on the store: a read
//! of the cache right after a mutation already reflects it.
//!
//! ## Lifecycle
//!
//! [`RecipeRepository::initialize`] connects the store, restores its contents
//! into the cache and starts the worker. Mutations before that fail with
//! [`RecipeError::NotInitialized`], so nothing can be added to an empty cache
//! that a later restore would then overwrite.
//!
//! ## Failure Policy
//!
//! Store write failures stop at this boundary: they are logged and counted in
//! [`WriteStats`], never returned to the controller, and the cache is not
//! reverted. The cache may then diverge from the store until
//! [`RecipeRepository::reload`].

use crate::cache::Cache;
use crate::error::{RecipeError, Result};
use crate::model::{Recipe, RecipeId};
use crate::store::PersistentStore;
use std::sync::Arc;

mod write_behind;

pub use write_behind::WriteStats;
use write_behind::WriteBehind;

pub struct RecipeRepository {
    store: Arc<dyn PersistentStore>,
    cache: Cache,
    writer: Option<WriteBehind>,
}

impl RecipeRepository {
    pub fn new(store: Arc<dyn PersistentStore>) -> Self {
        Self {
            store,
            cache: Cache::new(),
            writer: None,
        }
    }

    /// Connect the store, load it into the cache and start accepting
    /// mutations. Returns the number of restored recipes.
    pub async fn initialize(&mut self) -> Result<usize> {
        if self.writer.is_some() {
            tracing::warn!("Recipe repository is already initialized");
            return Ok(self.cache.len());
        }

        self.store.connect().await.map_err(|e| match e {
            RecipeError::StoreConnection(_) => e,
            other => RecipeError::StoreConnection(other.to_string()),
        })?;

        let restored = self.cache.restore_from_store(self.store.as_ref()).await?;
        self.writer = Some(WriteBehind::spawn(Arc::clone(&self.store)));
        Ok(restored)
    }

    pub fn is_initialized(&self) -> bool {
        self.writer.is_some()
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn add_recipe(&mut self, recipe: Recipe) -> Result<()> {
        let writer = self.writer.as_ref().ok_or(RecipeError::NotInitialized)?;
        self.cache.add(recipe.clone());
        writer.put(recipe);
        Ok(())
    }

    /// Replace a cached recipe. Unknown ids are ignored and nothing is
    /// written to the store.
    pub fn update_recipe(&mut self, recipe: Recipe) -> Result<()> {
        let writer = self.writer.as_ref().ok_or(RecipeError::NotInitialized)?;
        if self.cache.update(recipe.clone()) {
            writer.put(recipe);
        }
        Ok(())
    }

    pub fn delete_recipe(&mut self, id: &RecipeId) -> Result<()> {
        let writer = self.writer.as_ref().ok_or(RecipeError::NotInitialized)?;
        self.cache.delete(id);
        writer.delete(*id);
        Ok(())
    }

    /// Wait for every queued store write to be applied.
    pub async fn flush(&self) -> Result<WriteStats> {
        let writer = self.writer.as_ref().ok_or(RecipeError::NotInitialized)?;
        Ok(writer.flush().await)
    }

    /// Replace the cached state with the store's. If the store cannot be
    /// read the cache keeps its current contents.
    pub async fn reload(&mut self) -> Result<usize> {
        self.flush().await?;
        self.cache.replace_from_store(self.store.as_ref()).await
    }

    /// Apply pending writes and stop the worker.
    pub async fn shutdown(self) -> WriteStats {
        match self.writer {
            Some(writer) => writer.shutdown().await,
            None => WriteStats::default(),
        }
    }
}
