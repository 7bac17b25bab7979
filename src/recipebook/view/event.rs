//! Raw input events and the intents they translate into.
//!
//! A host reports what the user did as a [`RawEvent`]: an [`EventKind`] and the
//! [`Target`] element it happened on. The listener registry turns matching
//! events into [`Intent`]s, the closed set of things the controller knows how
//! to do.

use super::form::FieldsetKind;
use super::listeners::Root;
use crate::model::{Photo, RecipeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Change,
    KeyPress,
    KeyDown,
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Char(char),
}

/// The element an event happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Anywhere without a more specific target (page body, empty grid space)
    Document,
    AddRecipeButton,

    // Recipe card
    CardImage(RecipeId),
    CardTitle(RecipeId),
    ReadMore(RecipeId),
    OptionsToggle(RecipeId),
    CardEdit(RecipeId),
    CardDelete(RecipeId),

    // Modal
    ModalBackdrop,
    ModalInner,
    DetailEdit(RecipeId),
    DetailDelete(RecipeId),

    // Form
    Form,
    NameField,
    DescriptionField,
    ImageInput,
    RemoveImageButton,
    FieldsetInput { fieldset: FieldsetKind, name: usize },
    RemoveInput { fieldset: FieldsetKind, name: usize },
    CancelButton,
    SubmitButton,
}

impl Target {
    /// The recipe whose card or detail view contains this element.
    pub fn recipe_id(&self) -> Option<RecipeId> {
        match self {
            Target::CardImage(id)
            | Target::CardTitle(id)
            | Target::ReadMore(id)
            | Target::OptionsToggle(id)
            | Target::CardEdit(id)
            | Target::CardDelete(id)
            | Target::DetailEdit(id)
            | Target::DetailDelete(id) => Some(*id),
            _ => None,
        }
    }

    /// The card whose options dropdown contains this element.
    pub fn options_dropdown(&self) -> Option<RecipeId> {
        match self {
            Target::OptionsToggle(id) | Target::CardEdit(id) | Target::CardDelete(id) => Some(*id),
            _ => None,
        }
    }

    pub fn in_form(&self) -> bool {
        matches!(
            self,
            Target::Form
                | Target::NameField
                | Target::DescriptionField
                | Target::ImageInput
                | Target::RemoveImageButton
                | Target::FieldsetInput { .. }
                | Target::RemoveInput { .. }
                | Target::CancelButton
                | Target::SubmitButton
        )
    }

    /// Inside the modal's content area (everything but the backdrop).
    pub fn in_modal_inner(&self) -> bool {
        matches!(
            self,
            Target::ModalInner | Target::DetailEdit(_) | Target::DetailDelete(_)
        ) || self.in_form()
    }

    pub fn within(&self, root: Root) -> bool {
        match root {
            Root::Document => true,
            Root::Modal => *self == Target::ModalBackdrop || self.in_modal_inner(),
            Root::Form => self.in_form(),
            Root::ImageInput => *self == Target::ImageInput,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    pub kind: EventKind,
    pub target: Target,
    pub key: Option<Key>,
    /// File chosen in a file input, for `Change` events
    pub file: Option<Photo>,
}

impl RawEvent {
    pub fn new(kind: EventKind, target: Target) -> Self {
        Self {
            kind,
            target,
            key: None,
            file: None,
        }
    }

    pub fn click(target: Target) -> Self {
        Self::new(EventKind::Click, target)
    }

    pub fn key_press(target: Target, key: Key) -> Self {
        Self {
            key: Some(key),
            ..Self::new(EventKind::KeyPress, target)
        }
    }

    pub fn key_down(key: Key) -> Self {
        Self {
            key: Some(key),
            ..Self::new(EventKind::KeyDown, Target::Document)
        }
    }

    pub fn submit() -> Self {
        Self::new(EventKind::Submit, Target::Form)
    }

    pub fn file_selected(photo: Photo) -> Self {
        Self {
            file: Some(photo),
            ..Self::new(EventKind::Change, Target::ImageInput)
        }
    }
}

/// A user action, in domain terms.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    OpenRecipe(RecipeId),
    OpenAddForm,
    OpenEditForm(RecipeId),
    Delete(RecipeId),
    OpenOptionsMenu(RecipeId),
    CloseOptionsMenu,
    CloseModal,
    /// Escape: close whatever transient UI is open
    Dismiss,
    PreviewImage(Photo),
    ResetImage,
    AddInput(FieldsetKind),
    RemoveInput { fieldset: FieldsetKind, name: usize },
    Submit,
}
