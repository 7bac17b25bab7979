//! Delegated event listeners.
//!
//! A binding says: for events of this kind, happening inside this root, when
//! this condition holds, produce this handler's intent. Conditions and
//! handlers are closed enums so bindings can be compared, deduplicated and
//! logged; nothing here holds a closure.
//!
//! Bindings are kept in registration order, which is also dispatch order.

use super::event::{EventKind, Intent, Key, RawEvent, Target};
use super::ViewState;
use std::fmt;

/// Element a listener is delegated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Root {
    Document,
    Modal,
    Form,
    ImageInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Always,
    ShouldOpenRecipe,
    ShouldOpenAddForm,
    ShouldOpenEditForm,
    ShouldDelete,
    ShouldOpenOptionsMenu,
    /// A menu is open and the event happened outside its dropdown
    ShouldCloseOptionsMenu,
    /// Backdrop click or the cancel button
    ShouldCloseModal,
    ShouldPreviewImage,
    ShouldResetImage,
    /// Typing into the last input of a fieldset
    ShouldAddInput,
    ShouldRemoveInput,
    ShouldDismiss,
}

impl Condition {
    /// Evaluated against the view as it is when the event reaches the binding.
    pub fn holds(&self, event: &RawEvent, view: &ViewState) -> bool {
        let target = &event.target;
        match self {
            Condition::Always => true,
            Condition::ShouldOpenRecipe => {
                matches!(target, Target::CardImage(_) | Target::ReadMore(_))
            }
            Condition::ShouldOpenAddForm => *target == Target::AddRecipeButton,
            Condition::ShouldOpenEditForm => {
                matches!(target, Target::CardEdit(_) | Target::DetailEdit(_))
            }
            Condition::ShouldDelete => {
                matches!(target, Target::CardDelete(_) | Target::DetailDelete(_))
            }
            Condition::ShouldOpenOptionsMenu => matches!(target, Target::OptionsToggle(_)),
            Condition::ShouldCloseOptionsMenu => match view.open_options_menu_id() {
                Some(open) => target.options_dropdown() != Some(open),
                None => false,
            },
            Condition::ShouldCloseModal => {
                view.modal().is_some()
                    && (!target.in_modal_inner() || *target == Target::CancelButton)
            }
            Condition::ShouldPreviewImage => event.file.is_some(),
            Condition::ShouldResetImage => {
                *target == Target::RemoveImageButton
                    && view.form().is_some_and(|form| form.can_remove_image())
            }
            Condition::ShouldAddInput => match (target, view.form()) {
                (Target::FieldsetInput { fieldset, name }, Some(form)) => {
                    form.fieldset(*fieldset).is_last(*name)
                }
                _ => false,
            },
            Condition::ShouldRemoveInput => matches!(target, Target::RemoveInput { .. }),
            Condition::ShouldDismiss => event.key == Some(Key::Escape),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    OpenRecipe,
    OpenAddForm,
    OpenEditForm,
    Delete,
    OpenOptionsMenu,
    CloseOptionsMenu,
    CloseModal,
    Dismiss,
    PreviewImage,
    ResetImage,
    AddInput,
    RemoveInput,
    Submit,
}

impl Handler {
    /// The intent this handler produces for `event`, if the event carries
    /// what the handler needs.
    pub fn intent(&self, event: &RawEvent) -> Option<Intent> {
        let target = &event.target;
        match self {
            Handler::OpenRecipe => target.recipe_id().map(Intent::OpenRecipe),
            Handler::OpenAddForm => Some(Intent::OpenAddForm),
            Handler::OpenEditForm => target.recipe_id().map(Intent::OpenEditForm),
            Handler::Delete => target.recipe_id().map(Intent::Delete),
            Handler::OpenOptionsMenu => target.options_dropdown().map(Intent::OpenOptionsMenu),
            Handler::CloseOptionsMenu => Some(Intent::CloseOptionsMenu),
            Handler::CloseModal => Some(Intent::CloseModal),
            Handler::Dismiss => Some(Intent::Dismiss),
            Handler::PreviewImage => event.file.clone().map(Intent::PreviewImage),
            Handler::ResetImage => Some(Intent::ResetImage),
            Handler::AddInput => match target {
                Target::FieldsetInput { fieldset, .. } => Some(Intent::AddInput(*fieldset)),
                _ => None,
            },
            Handler::RemoveInput => match target {
                Target::RemoveInput { fieldset, name } => Some(Intent::RemoveInput {
                    fieldset: *fieldset,
                    name: *name,
                }),
                _ => None,
            },
            Handler::Submit => Some(Intent::Submit),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindOptions {
    pub event: EventKind,
    pub handler: Handler,
    pub root: Root,
    pub condition: Condition,
}

impl BindOptions {
    /// A document-level binding that always fires.
    pub fn new(event: EventKind, handler: Handler) -> Self {
        Self {
            event,
            handler,
            root: Root::Document,
            condition: Condition::Always,
        }
    }

    pub fn root(mut self, root: Root) -> Self {
        self.root = root;
        self
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub id: ListenerId,
    pub options: BindOptions,
}

#[derive(Debug, Default)]
pub struct ListenerRegistry {
    bindings: Vec<Binding>,
    next_id: u64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding. Returns `None` if an identical one exists.
    pub fn bind(&mut self, options: BindOptions) -> Option<ListenerId> {
        if self.bindings.iter().any(|b| b.options == options) {
            tracing::debug!("Skipping duplicate listener {:?}", options);
            return None;
        }

        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.bindings.push(Binding { id, options });
        tracing::debug!("Bound listener {} {:?}", id, options);
        Some(id)
    }

    pub fn unbind(&mut self, id: ListenerId) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|b| b.id != id);
        self.bindings.len() != before
    }

    /// Remove every binding, returning how many there were.
    pub fn unbind_all(&mut self) -> usize {
        let count = self.bindings.len();
        self.bindings.clear();
        tracing::debug!("Unbound {} listeners", count);
        count
    }

    pub fn get(&self, id: ListenerId) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.id == id)
    }

    pub fn ids(&self) -> Vec<ListenerId> {
        self.bindings.iter().map(|b| b.id).collect()
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
