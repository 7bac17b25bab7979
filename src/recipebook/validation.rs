//! Recipe validation.
//!
//! Form input never becomes a [`Recipe`] directly. It is collected into a
//! [`RecipeDraft`], and [`RecipeDraft::validate`] sanitizes every field up
//! front, returning either a complete record or a [`ValidationError`] naming
//! the offending field so the form can highlight it.
//!
//! # Rules
//! - `name` is trimmed and stripped of control characters; it must not be empty
//! - `description` is trimmed; an empty description becomes `None`
//! - ingredient and instruction entries are trimmed, blank entries are dropped,
//!   and no entry may exceed [`MAX_ENTRY_LEN`] characters (or the limit given
//!   to [`RecipeDraft::validate_with`])
//! - a photo must be a JPEG or PNG image

use crate::model::{Photo, Recipe, RecipeId};
use std::fmt;

/// Longest accepted ingredient or instruction entry, in characters.
pub const MAX_ENTRY_LEN: usize = 48;

pub const ACCEPTED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

/// A form field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Description,
    /// Position of the input within the ingredients fieldset
    Ingredient(usize),
    /// Position of the input within the instructions fieldset
    Instruction(usize),
    Photo,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormField::Name => write!(f, "name"),
            FormField::Description => write!(f, "description"),
            FormField::Ingredient(i) => write!(f, "ingredient {}", i + 1),
            FormField::Instruction(i) => write!(f, "instruction {}", i + 1),
            FormField::Photo => write!(f, "photo"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationKind {
    /// Field is required but was empty
    Required,
    /// Field is longer than the allowed number of characters
    TooLong { max: usize },
    /// Photo has a mime type outside [`ACCEPTED_IMAGE_TYPES`]
    UnsupportedType(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: FormField,
    pub kind: ValidationKind,
}

impl ValidationError {
    pub fn new(field: FormField, kind: ValidationKind) -> Self {
        Self { field, kind }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValidationKind::Required => write!(f, "{} is required", self.field),
            ValidationKind::TooLong { max } => {
                write!(f, "{} must be at most {} characters", self.field, max)
            }
            ValidationKind::UnsupportedType(mime) => {
                write!(
                    f,
                    "{} has unsupported type '{}' (expected JPEG or PNG)",
                    self.field, mime
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Unvalidated recipe fields as collected from a form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeDraft {
    pub id: Option<RecipeId>,
    pub name: String,
    pub description: String,
    /// Raw input values in fieldset order, blanks included
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub photo: Option<Photo>,
}

impl RecipeDraft {
    pub fn validate(self) -> Result<Recipe, ValidationError> {
        self.validate_with(MAX_ENTRY_LEN)
    }

    /// Validate with `max_len` as the entry length limit.
    pub fn validate_with(self, max_len: usize) -> Result<Recipe, ValidationError> {
        let name = sanitize_text(&self.name);
        if name.is_empty() {
            return Err(ValidationError::new(
                FormField::Name,
                ValidationKind::Required,
            ));
        }

        let description = sanitize_text(&self.description);
        let ingredients = sanitize_entries(&self.ingredients, FormField::Ingredient, max_len)?;
        let instructions = sanitize_entries(&self.instructions, FormField::Instruction, max_len)?;

        if let Some(photo) = &self.photo {
            if !ACCEPTED_IMAGE_TYPES.contains(&photo.mime_type.as_str()) {
                return Err(ValidationError::new(
                    FormField::Photo,
                    ValidationKind::UnsupportedType(photo.mime_type.clone()),
                ));
            }
        }

        Ok(Recipe {
            id: self.id.unwrap_or_default(),
            name,
            description: (!description.is_empty()).then_some(description),
            ingredients,
            instructions,
            photo: self.photo,
        })
    }
}

fn sanitize_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control() || *c == '\n')
        .collect::<String>()
        .trim()
        .to_string()
}

fn sanitize_entries(
    raw: &[String],
    field: fn(usize) -> FormField,
    max_len: usize,
) -> Result<Vec<String>, ValidationError> {
    let mut entries = Vec::with_capacity(raw.len());
    for (position, value) in raw.iter().enumerate() {
        let value = sanitize_text(value);
        if value.is_empty() {
            continue;
        }
        if value.chars().count() > max_len {
            return Err(ValidationError::new(
                field(position),
                ValidationKind::TooLong { max: max_len },
            ));
        }
        entries.push(value);
    }
    Ok(entries)
}
