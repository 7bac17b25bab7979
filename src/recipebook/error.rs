use crate::model::RecipeId;
use crate::validation::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("Could not connect to recipe store: {0}")]
    StoreConnection(String),

    #[error("Recipe store is not connected")]
    NotConnected,

    #[error("Failed to read from recipe store: {0}")]
    StoreRead(String),

    #[error("Failed to write recipe {id} to store: {reason}")]
    StoreWrite { id: RecipeId, reason: String },

    #[error("Invalid recipe: {0}")]
    Validation(#[from] ValidationError),

    #[error("Recipe repository has not been initialized")]
    NotInitialized,

    #[error("Recipe not found: {0}")]
    NotFound(RecipeId),

    #[error("No recipe matches '{0}'")]
    UnknownReference(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RecipeError>;
