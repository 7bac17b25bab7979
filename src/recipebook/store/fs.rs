use super::{upsert, PersistentStore};
use crate::error::{RecipeError, Result};
use crate::model::{Recipe, RecipeId};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::fs;
use tokio::sync::Mutex;

pub const DEFAULT_STORE_FILE: &str = "recipes.json";

/// File-based store: one JSON array holding every recipe.
pub struct FileStore {
    root: PathBuf,
    file_name: String,
    connected: AtomicBool,
    // Serializes read-modify-write cycles on the data file
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            file_name: DEFAULT_STORE_FILE.to_string(),
            connected: AtomicBool::new(false),
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_file_name(mut self, name: &str) -> Self {
        self.file_name = name.to_string();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_file(&self) -> PathBuf {
        self.root.join(&self.file_name)
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RecipeError::NotConnected)
        }
    }

    async fn load(&self) -> Result<Vec<Recipe>> {
        let content = match fs::read_to_string(self.data_file()).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RecipeError::Io(e)),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the whole collection atomically (temp file, then rename).
    async fn save(&self, records: &[Recipe]) -> Result<()> {
        let data_file = self.data_file();
        let tmp_file = data_file.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(records)?;
        fs::write(&tmp_file, content).await?;
        fs::rename(&tmp_file, &data_file).await?;
        Ok(())
    }

    async fn modify<F>(&self, id: &RecipeId, change: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<Recipe>) + Send,
    {
        self.ensure_connected()?;
        let _guard = self.write_lock.lock().await;
        let to_write_error = |e: RecipeError| RecipeError::StoreWrite {
            id: *id,
            reason: e.to_string(),
        };

        let mut records = self.load().await.map_err(to_write_error)?;
        change(&mut records);
        self.save(&records).await.map_err(to_write_error)
    }
}

#[async_trait]
impl PersistentStore for FileStore {
    async fn connect(&self) -> Result<()> {
        if self.connected.load(Ordering::SeqCst) {
            return Ok(());
        }

        fs::create_dir_all(&self.root).await.map_err(|e| {
            RecipeError::StoreConnection(format!("{}: {}", self.root.display(), e))
        })?;

        // Refuse to open a store we could not read back
        self.load().await.map_err(|e| {
            RecipeError::StoreConnection(format!("{}: {}", self.data_file().display(), e))
        })?;

        self.connected.store(true, Ordering::SeqCst);
        tracing::info!("Connected to recipe store at {}", self.data_file().display());
        Ok(())
    }

    async fn get(&self, id: &RecipeId) -> Result<Option<Recipe>> {
        Ok(self.get_all().await?.into_iter().find(|r| r.id == *id))
    }

    async fn get_all(&self) -> Result<Vec<Recipe>> {
        self.ensure_connected()?;
        self.load()
            .await
            .map_err(|e| RecipeError::StoreRead(e.to_string()))
    }

    async fn put(&self, recipe: &Recipe) -> Result<()> {
        self.modify(&recipe.id, |records| upsert(records, recipe))
            .await
    }

    async fn delete(&self, id: &RecipeId) -> Result<()> {
        self.modify(id, |records| records.retain(|r| r.id != *id))
            .await
    }
}
