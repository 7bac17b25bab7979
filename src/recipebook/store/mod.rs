//! # Storage Layer
//!
//! This module defines the durable side of recipebook. The [`PersistentStore`]
//! trait is the contract the repository relies on; the cache never talks to a
//! store except through [`crate::cache::Cache::restore_from_store`].
//!
//! ## Design Rationale
//!
//! Storage is abstracted behind a trait to:
//! - Enable **testing** with [`memory::MemoryStore`] (no filesystem, injectable failures)
//! - Keep the cache and view **decoupled** from persistence details
//! - Allow other backends without touching the repository
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production storage, a single JSON document on disk
//! - [`memory::MemoryStore`]: In-memory storage for testing
//!
//! ## Contract
//!
//! - `connect` is idempotent and fails with `StoreConnection`
//! - `get` resolves to `None` on a miss, `get_all` to an empty list
//! - `put` is an upsert keyed by `id`
//! - `delete` of an absent id is a no-op
//! - `get_all` returns records in insertion order, so display order survives a reload
//!
//! ## Storage Format
//!
//! For `FileStore`:
//! ```text
//! <data_dir>/
//! ├── recipes.json        # All recipes (JSON array, insertion order)
//! └── recipebook.toml     # Optional configuration
//! ```

use crate::error::Result;
use crate::model::{Recipe, RecipeId};
use async_trait::async_trait;

pub mod fs;
pub mod memory;

/// Abstract interface for durable recipe storage.
#[async_trait]
pub trait PersistentStore: Send + Sync {
    /// Open the store. Calling it again on a connected store is a no-op.
    async fn connect(&self) -> Result<()>;

    /// Get a recipe by id
    async fn get(&self, id: &RecipeId) -> Result<Option<Recipe>>;

    /// List every stored recipe
    async fn get_all(&self) -> Result<Vec<Recipe>>;

    /// Insert or replace a recipe
    async fn put(&self, recipe: &Recipe) -> Result<()>;

    /// Remove a recipe
    async fn delete(&self, id: &RecipeId) -> Result<()>;
}

/// Insert `recipe` or replace the stored record with the same id, keeping its position.
pub(crate) fn upsert(records: &mut Vec<Recipe>, recipe: &Recipe) {
    match records.iter_mut().find(|existing| existing.id == recipe.id) {
        Some(existing) => *existing = recipe.clone(),
        None => records.push(recipe.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_replaces_in_place() {
        let first = Recipe::new("First");
        let second = Recipe::new("Second");
        let mut records = vec![first.clone(), second.clone()];

        let renamed = Recipe {
            name: "Renamed".into(),
            ..first.clone()
        };
        upsert(&mut records, &renamed);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Renamed");
        assert_eq!(records[1].id, second.id);
    }

    #[test]
    fn test_upsert_appends_new_records() {
        let mut records = vec![Recipe::new("First")];
        upsert(&mut records, &Recipe::new("Second"));
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "Second");
    }
}
