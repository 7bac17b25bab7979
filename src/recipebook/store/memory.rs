use super::{upsert, PersistentStore};
use crate::error::{RecipeError, Result};
use crate::model::{Recipe, RecipeId};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-memory store for testing.
///
/// Records keep insertion order. Failures can be injected for connect and
/// for writes to exercise the repository's error policy.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<Recipe>>,
    connected: AtomicBool,
    simulate_connect_error: AtomicBool,
    simulate_write_error: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `recipes`, as if written by an earlier session.
    pub fn with_recipes(recipes: Vec<Recipe>) -> Self {
        let store = Self::new();
        *store.lock() = recipes;
        store
    }

    /// Enable connection failure simulation.
    pub fn set_simulate_connect_error(&self, simulate: bool) {
        self.simulate_connect_error.store(simulate, Ordering::SeqCst);
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    /// Snapshot of the stored records, bypassing the connection check.
    pub fn snapshot(&self) -> Vec<Recipe> {
        self.lock().clone()
    }

    /// Number of successful `put`/`delete` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Recipe>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RecipeError::NotConnected)
        }
    }

    fn ensure_writable(&self, id: &RecipeId) -> Result<()> {
        self.ensure_connected()?;
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(RecipeError::StoreWrite {
                id: *id,
                reason: "Simulated write error".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PersistentStore for MemoryStore {
    async fn connect(&self) -> Result<()> {
        if self.simulate_connect_error.load(Ordering::SeqCst) {
            return Err(RecipeError::StoreConnection(
                "Simulated connection error".to_string(),
            ));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn get(&self, id: &RecipeId) -> Result<Option<Recipe>> {
        self.ensure_connected()?;
        Ok(self.lock().iter().find(|r| r.id == *id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Recipe>> {
        self.ensure_connected()?;
        Ok(self.lock().clone())
    }

    async fn put(&self, recipe: &Recipe) -> Result<()> {
        self.ensure_writable(&recipe.id)?;
        upsert(&mut self.lock(), recipe);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, id: &RecipeId) -> Result<()> {
        self.ensure_writable(id)?;
        self.lock().retain(|r| r.id != *id);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::Photo;

    pub struct StoreFixture {
        recipes: Vec<Recipe>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                recipes: Vec::new(),
            }
        }

        pub fn with_recipes(mut self, count: usize) -> Self {
            for i in 0..count {
                let recipe = Recipe::new(format!("Test Recipe {}", i + 1))
                    .with_ingredients([format!("ingredient {}", i + 1)])
                    .with_instructions([format!("step {}", i + 1)]);
                self.recipes.push(recipe);
            }
            self
        }

        pub fn with_recipe(mut self, recipe: Recipe) -> Self {
            self.recipes.push(recipe);
            self
        }

        pub fn with_photo_recipe(mut self, name: &str) -> Self {
            let recipe = Recipe::new(name)
                .with_ingredients(["flour"])
                .with_photo(Photo::new("image/png", vec![0x89, 0x50, 0x4e, 0x47]));
            self.recipes.push(recipe);
            self
        }

        pub fn recipes(&self) -> &[Recipe] {
            &self.recipes
        }

        pub fn build(self) -> MemoryStore {
            MemoryStore::with_recipes(self.recipes)
        }
    }
}
