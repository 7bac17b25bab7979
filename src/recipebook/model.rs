use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque recipe identifier. Generated client-side, never reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(Uuid);

impl RecipeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RecipeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for RecipeId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RecipeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// A binary image attached to a recipe.
///
/// Stores keep the bytes as base64 text; in memory it is always a plain blob.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub mime_type: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl Photo {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Read an image file, inferring the mime type from its extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let mime_type = match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            _ => "application/octet-stream",
        };
        Ok(Self::new(mime_type, data))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Content fingerprint, used to tell whether a rendered image is stale.
    pub fn digest(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.mime_type.hash(&mut hasher);
        self.data.hash(&mut hasher);
        hasher.finish()
    }
}

impl fmt::Debug for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Photo")
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub photo: Option<Photo>,
}

impl Recipe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RecipeId::new(),
            name: name.into(),
            description: None,
            ingredients: Vec::new(),
            instructions: Vec::new(),
            photo: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_ingredients<I, T>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_instructions<I, T>(mut self, instructions: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.instructions = instructions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_photo(mut self, photo: Photo) -> Self {
        self.photo = Some(photo);
        self
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<T, S>(bytes: T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: AsRef<[u8]>,
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes.as_ref()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        STANDARD
            .decode(text.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_id_parses_its_display_form() {
        let id = RecipeId::new();
        let parsed: RecipeId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_recipe_id_rejects_garbage() {
        assert!("not-an-id".parse::<RecipeId>().is_err());
    }

    #[test]
    fn test_photo_is_stored_as_base64_text() {
        let recipe = Recipe::new("Toast").with_photo(Photo::new("image/png", vec![1, 2, 3]));
        let json = serde_json::to_value(&recipe).unwrap();
        assert_eq!(json["photo"]["data"], "AQID");
        assert_eq!(json["photo"]["mime_type"], "image/png");
    }

    #[test]
    fn test_photo_rejects_structured_payloads() {
        let json = r#"{"id":"6f1c1c1e-8c1e-4d55-9a55-0c4a3b1c2d3e","name":"Toast",
            "photo":{"mime_type":"image/png","data":{"nested":true}}}"#;
        assert!(serde_json::from_str::<Recipe>(json).is_err());
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{"id":"6f1c1c1e-8c1e-4d55-9a55-0c4a3b1c2d3e","name":"Toast"}"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.photo.is_none());
        assert!(recipe.description.is_none());
    }

    #[test]
    fn test_digest_tracks_content() {
        let a = Photo::new("image/png", vec![1, 2, 3]);
        let b = Photo::new("image/png", vec![1, 2, 4]);
        assert_eq!(a.digest(), a.clone().digest());
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn test_photo_debug_hides_bytes() {
        let photo = Photo::new("image/jpeg", vec![0; 1024]);
        assert_eq!(
            format!("{:?}", photo),
            "Photo { mime_type: \"image/jpeg\", len: 1024 }"
        );
    }
}
