//! The add/edit recipe form.
//!
//! Text fields hold whatever the user typed; nothing is validated here. Each
//! fieldset is a growable list of text inputs: an edit form starts with one
//! input per existing entry plus a trailing blank, an add form with a single
//! blank, and typing into the last input asks for another.

use super::object_url::ObjectUrl;
use crate::model::{Photo, Recipe, RecipeId};
use crate::validation::FormField;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormMode {
    Add,
    Edit,
}

impl fmt::Display for FormMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormMode::Add => write!(f, "add"),
            FormMode::Edit => write!(f, "edit"),
        }
    }
}

/// Whether the user explicitly removed the photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Pristine,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldsetKind {
    Ingredients,
    Instructions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    /// Stable input name within its fieldset
    pub name: usize,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fieldset {
    kind: FieldsetKind,
    inputs: Vec<TextInput>,
    next_name: usize,
    max_len: usize,
}

impl Fieldset {
    fn new(kind: FieldsetKind, values: &[String], max_len: usize) -> Self {
        let mut fieldset = Self {
            kind,
            inputs: Vec::new(),
            next_name: 0,
            max_len,
        };
        fieldset.append(values);
        fieldset
    }

    /// Add one input per value, plus a trailing blank.
    pub(crate) fn append(&mut self, values: &[String]) {
        for value in values.iter().map(String::as_str).chain(std::iter::once("")) {
            let value = truncate(value, self.max_len);
            self.inputs.push(TextInput {
                name: self.next_name,
                value,
            });
            self.next_name += 1;
        }
    }

    pub fn kind(&self) -> FieldsetKind {
        self.kind
    }

    pub fn inputs(&self) -> &[TextInput] {
        &self.inputs
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Raw values in input order, blanks included.
    pub fn values(&self) -> Vec<String> {
        self.inputs.iter().map(|i| i.value.clone()).collect()
    }

    pub fn position(&self, name: usize) -> Option<usize> {
        self.inputs.iter().position(|i| i.name == name)
    }

    pub fn is_last(&self, name: usize) -> bool {
        self.inputs.last().is_some_and(|i| i.name == name)
    }

    /// Set an input's value, cut to the input's maximum length.
    pub fn set_value(&mut self, name: usize, value: &str) -> bool {
        let max_len = self.max_len;
        match self.inputs.iter_mut().find(|i| i.name == name) {
            Some(input) => {
                input.value = truncate(value, max_len);
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove(&mut self, name: usize) -> bool {
        let before = self.inputs.len();
        self.inputs.retain(|i| i.name != name);
        self.inputs.len() != before
    }
}

fn truncate(value: &str, max_len: usize) -> String {
    value.chars().take(max_len).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImagePreview {
    pub src: Option<ObjectUrl>,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    id: Option<RecipeId>,
    mode: FormMode,
    state: FormState,
    name: String,
    description: String,
    ingredients: Fieldset,
    instructions: Fieldset,
    upload: Option<Photo>,
    preview: ImagePreview,
    invalid: Option<FormField>,
}

/// Everything the user entered, as read at submission time.
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues {
    pub id: Option<RecipeId>,
    pub mode: FormMode,
    pub state: FormState,
    pub name: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    /// Newly selected image, if any
    pub upload: Option<Photo>,
}

impl FormView {
    pub(crate) fn new(mode: FormMode, recipe: Option<&Recipe>, max_len: usize) -> Self {
        let empty = Vec::new();
        Self {
            id: recipe.map(|r| r.id),
            mode,
            state: FormState::Pristine,
            name: recipe.map(|r| r.name.clone()).unwrap_or_default(),
            description: recipe
                .and_then(|r| r.description.clone())
                .unwrap_or_default(),
            ingredients: Fieldset::new(
                FieldsetKind::Ingredients,
                recipe.map_or(&empty, |r| &r.ingredients),
                max_len,
            ),
            instructions: Fieldset::new(
                FieldsetKind::Instructions,
                recipe.map_or(&empty, |r| &r.instructions),
                max_len,
            ),
            upload: None,
            preview: ImagePreview::default(),
            invalid: None,
        }
    }

    pub fn id(&self) -> Option<RecipeId> {
        self.id
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn fieldset(&self, kind: FieldsetKind) -> &Fieldset {
        match kind {
            FieldsetKind::Ingredients => &self.ingredients,
            FieldsetKind::Instructions => &self.instructions,
        }
    }

    pub fn fieldset_mut(&mut self, kind: FieldsetKind) -> &mut Fieldset {
        match kind {
            FieldsetKind::Ingredients => &mut self.ingredients,
            FieldsetKind::Instructions => &mut self.instructions,
        }
    }

    pub fn upload(&self) -> Option<&Photo> {
        self.upload.as_ref()
    }

    pub fn preview(&self) -> &ImagePreview {
        &self.preview
    }

    /// The field currently highlighted as invalid.
    pub fn invalid_field(&self) -> Option<FormField> {
        self.invalid
    }

    pub fn image_button_label(&self) -> &'static str {
        if self.preview.src.is_some() {
            "Change"
        } else {
            "Add photo"
        }
    }

    pub fn can_remove_image(&self) -> bool {
        self.preview.src.is_some()
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.clear_invalid(|field| field == FormField::Name);
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
        self.clear_invalid(|field| field == FormField::Description);
    }

    pub fn set_input(&mut self, kind: FieldsetKind, name: usize, value: &str) -> bool {
        let position = self.fieldset(kind).position(name);
        let changed = self.fieldset_mut(kind).set_value(name, value);
        if let Some(position) = position {
            self.clear_invalid(|field| match kind {
                FieldsetKind::Ingredients => field == FormField::Ingredient(position),
                FieldsetKind::Instructions => field == FormField::Instruction(position),
            });
        }
        changed
    }

    fn clear_invalid(&mut self, matches: impl Fn(FormField) -> bool) {
        if self.invalid.is_some_and(matches) {
            self.invalid = None;
        }
    }

    pub fn values(&self) -> FormValues {
        FormValues {
            id: self.id,
            mode: self.mode,
            state: self.state,
            name: self.name.clone(),
            description: self.description.clone(),
            ingredients: self.ingredients.values(),
            instructions: self.instructions.values(),
            upload: self.upload.clone().filter(|photo| !photo.is_empty()),
        }
    }

    pub(crate) fn set_invalid(&mut self, field: FormField) {
        self.invalid = Some(field);
    }

    pub(crate) fn set_preview(&mut self, preview: ImagePreview) -> Option<ObjectUrl> {
        std::mem::replace(&mut self.preview, preview).src
    }

    pub(crate) fn set_upload(&mut self, photo: Option<Photo>) {
        self.upload = photo;
    }

    pub(crate) fn mark_reset(&mut self) {
        self.state = FormState::Reset;
    }
}
