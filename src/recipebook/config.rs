//! # Configuration
//!
//! Settings are loaded with [`confique`], layered in priority order:
//! 1. **Environment variables**: `RECIPEBOOK_DATA_DIR`, `RECIPEBOOK_STORE_FILE`, etc.
//! 2. **Config file**: `recipebook.toml` in the data directory (or the file
//!    given with `--config`), when present.
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | OS data directory | Where the recipe store lives |
//! | `store_file` | `recipes.json` | Store file name inside `data_dir` |
//! | `placeholder_image` | `./assets/icons/fast-food-100.png` | Image for recipes without a photo |
//! | `max_input_length` | `48` | Maximum characters per ingredient or instruction input |

use crate::error::{RecipeError, Result};
use crate::store::fs::DEFAULT_STORE_FILE;
use crate::validation::MAX_ENTRY_LEN;
use crate::view::{ViewSettings, DEFAULT_PLACEHOLDER_IMAGE};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "recipebook.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding the recipe store
    #[config(env = "RECIPEBOOK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[config(env = "RECIPEBOOK_STORE_FILE", default = "recipes.json")]
    pub store_file: String,

    #[config(
        env = "RECIPEBOOK_PLACEHOLDER_IMAGE",
        default = "./assets/icons/fast-food-100.png"
    )]
    pub placeholder_image: String,

    #[config(env = "RECIPEBOOK_MAX_INPUT_LENGTH", default = 48)]
    pub max_input_length: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            store_file: DEFAULT_STORE_FILE.to_string(),
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            max_input_length: MAX_ENTRY_LEN,
        }
    }
}

impl AppConfig {
    /// Load from the environment and, if it exists, `config_file`.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = config_file {
            builder = builder.file(path);
        }
        builder.load().map_err(|e| RecipeError::Config(e.to_string()))
    }

    /// Load from `explicit` if given, else from `recipebook.toml` in the
    /// data directory the environment points at.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if explicit.is_some() {
            return Self::load(explicit);
        }
        let file = Self::load(None)?.resolve_data_dir()?.join(CONFIG_FILENAME);
        Self::load(Some(&file))
    }

    /// The configured data directory, or the OS default.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| RecipeError::Config("Could not determine data directory".to_string()))
    }

    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            placeholder_src: self.placeholder_image.clone(),
            max_input_length: self.max_input_length,
        }
    }
}

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "recipebook", "recipebook")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.store_file, "recipes.json");
        assert_eq!(config.max_input_length, 48);
        assert_eq!(config.view_settings(), ViewSettings::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            "data_dir = \"/tmp/recipes\"\nstore_file = \"book.json\"\nmax_input_length = 64\n",
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/recipes")));
        assert_eq!(config.store_file, "book.json");
        assert_eq!(config.max_input_length, 64);
        assert_eq!(config.placeholder_image, DEFAULT_PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_invalid_file_is_a_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "max_input_length = \"lots\"\n").unwrap();

        assert!(matches!(
            AppConfig::load(Some(&path)),
            Err(RecipeError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load(Some(&dir.path().join(CONFIG_FILENAME))).unwrap();
        assert_eq!(config.store_file, DEFAULT_STORE_FILE);
        assert_eq!(config.max_input_length, MAX_ENTRY_LEN);
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let config = AppConfig {
            data_dir: Some(PathBuf::from("/srv/recipes")),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_data_dir().unwrap(),
            PathBuf::from("/srv/recipes")
        );
    }

    #[test]
    fn test_view_settings_follow_config() {
        let config = AppConfig {
            placeholder_image: "icon.png".to_string(),
            max_input_length: 10,
            ..Default::default()
        };
        let settings = config.view_settings();
        assert_eq!(settings.placeholder_src, "icon.png");
        assert_eq!(settings.max_input_length, 10);
    }
}
