//! # Controller
//!
//! Wires user intents to repository mutations and view updates. Raw events go
//! through the view's listener registry; every binding that matches yields an
//! [`Intent`], which is routed to one of the `on_*` operations.
//!
//! Dispatch follows delegated-listener semantics: bindings fire in
//! registration order, each condition sees the view as the previous handler
//! left it, and a binding removed during the dispatch does not fire. After a
//! dispatch the controller consumes the cache's change notification and
//! reconciles the card grid.
//!
//! The default document-level bindings are present whenever no modal is
//! open. Opening a modal adds its scoped bindings; closing it tears every
//! binding down and re-binds the defaults.

use crate::cache::CacheSubscription;
use crate::error::{RecipeError, Result};
use crate::model::RecipeId;
use crate::repository::{RecipeRepository, WriteStats};
use crate::validation::{RecipeDraft, ValidationError};
use crate::view::{
    BindOptions, Condition, EventKind, FieldsetKind, FormMode, FormState, Handler, Intent, Key,
    RawEvent, Root, Target, ViewSettings, ViewState,
};

/// What came of one intent.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Handled,
    /// Nothing to act on (unknown recipe, no form open)
    Ignored,
    /// The form was not submitted; the offending field is highlighted
    Rejected(ValidationError),
}

const DEFAULT_BINDINGS: [BindOptions; 7] = [
    bind(EventKind::Click, Handler::OpenRecipe, Root::Document, Condition::ShouldOpenRecipe),
    bind(EventKind::Click, Handler::OpenAddForm, Root::Document, Condition::ShouldOpenAddForm),
    bind(EventKind::Click, Handler::OpenEditForm, Root::Document, Condition::ShouldOpenEditForm),
    bind(EventKind::Click, Handler::Delete, Root::Document, Condition::ShouldDelete),
    bind(
        EventKind::Click,
        Handler::OpenOptionsMenu,
        Root::Document,
        Condition::ShouldOpenOptionsMenu,
    ),
    bind(
        EventKind::Click,
        Handler::CloseOptionsMenu,
        Root::Document,
        Condition::ShouldCloseOptionsMenu,
    ),
    bind(EventKind::KeyDown, Handler::Dismiss, Root::Document, Condition::ShouldDismiss),
];

const FORM_BINDINGS: [BindOptions; 6] = [
    bind(EventKind::Change, Handler::PreviewImage, Root::ImageInput, Condition::ShouldPreviewImage),
    bind(EventKind::Click, Handler::ResetImage, Root::Form, Condition::ShouldResetImage),
    bind(EventKind::KeyPress, Handler::AddInput, Root::Form, Condition::ShouldAddInput),
    bind(EventKind::Click, Handler::RemoveInput, Root::Form, Condition::ShouldRemoveInput),
    bind(EventKind::Submit, Handler::Submit, Root::Form, Condition::Always),
    bind(EventKind::Click, Handler::CloseModal, Root::Modal, Condition::ShouldCloseModal),
];

const DETAIL_BINDINGS: [BindOptions; 1] = [bind(
    EventKind::Click,
    Handler::CloseModal,
    Root::Modal,
    Condition::ShouldCloseModal,
)];

const fn bind(event: EventKind, handler: Handler, root: Root, condition: Condition) -> BindOptions {
    BindOptions {
        event,
        handler,
        root,
        condition,
    }
}

pub struct Controller {
    repository: RecipeRepository,
    view: ViewState,
    changes: CacheSubscription,
}

impl Controller {
    /// Take over an initialized repository, render its recipes and bind the
    /// default listeners.
    pub fn new(repository: RecipeRepository, settings: ViewSettings) -> Result<Self> {
        if !repository.is_initialized() {
            return Err(RecipeError::NotInitialized);
        }

        let mut changes = repository.cache().subscribe();
        changes.mark_seen();

        let mut view = ViewState::new(settings);
        view.render_list(&repository.cache().get_all());

        let mut controller = Self {
            repository,
            view,
            changes,
        };
        controller.bind_all(&DEFAULT_BINDINGS);
        Ok(controller)
    }

    pub fn repository(&self) -> &RecipeRepository {
        &self.repository
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn into_repository(self) -> RecipeRepository {
        self.repository
    }

    /// Apply pending store writes and stop.
    pub async fn shutdown(self) -> WriteStats {
        self.repository.shutdown().await
    }

    /// Run `event` through every listener bound when it arrived.
    pub fn handle_event(&mut self, event: RawEvent) -> Result<Vec<Outcome>> {
        let mut outcomes = Vec::new();
        for id in self.view.listener_ids() {
            if let Some(intent) = self.view.resolve(id, &event) {
                outcomes.push(self.dispatch(intent)?);
            }
        }
        self.sync_view();
        Ok(outcomes)
    }

    /// Type `text` into a form field, then deliver the key press.
    pub fn on_input(&mut self, target: Target, text: &str) -> Result<Vec<Outcome>> {
        let Some(form) = self.view.form_mut() else {
            return Ok(Vec::new());
        };
        let accepted = match target {
            Target::NameField => {
                form.set_name(text);
                true
            }
            Target::DescriptionField => {
                form.set_description(text);
                true
            }
            Target::FieldsetInput { fieldset, name } => form.set_input(fieldset, name, text),
            _ => false,
        };
        if !accepted {
            return Ok(Vec::new());
        }

        let key = text.chars().last().map_or(Key::Enter, Key::Char);
        self.handle_event(RawEvent::key_press(target, key))
    }

    pub fn dispatch(&mut self, intent: Intent) -> Result<Outcome> {
        tracing::debug!("Dispatching {:?}", intent);
        match intent {
            Intent::OpenRecipe(id) => Ok(self.on_open_recipe(&id)),
            Intent::OpenAddForm => Ok(self.on_open_add_form()),
            Intent::OpenEditForm(id) => Ok(self.on_open_edit_form(&id)),
            Intent::Delete(id) => self.on_delete(&id),
            Intent::OpenOptionsMenu(id) => Ok(self.on_open_options_menu(&id)),
            Intent::CloseOptionsMenu => Ok(self.on_close_options_menu()),
            Intent::CloseModal => Ok(self.on_close_modal()),
            Intent::Dismiss => Ok(self.on_dismiss()),
            Intent::PreviewImage(photo) => Ok(handled(self.view.preview_image(photo))),
            Intent::ResetImage => Ok(handled(self.view.reset_image())),
            Intent::AddInput(fieldset) => Ok(self.on_add_input(fieldset)),
            Intent::RemoveInput { fieldset, name } => {
                Ok(handled(self.view.remove_input(fieldset, name)))
            }
            Intent::Submit => self.on_submit(),
        }
    }

    pub fn on_open_recipe(&mut self, id: &RecipeId) -> Outcome {
        let Some(record) = self.repository.cache().get(id).cloned() else {
            tracing::warn!("Cannot open unknown recipe {}", id);
            return Outcome::Ignored;
        };
        self.clear_transient_ui();
        self.view.open_detail(&record);
        self.bind_all(&DETAIL_BINDINGS);
        Outcome::Handled
    }

    pub fn on_open_add_form(&mut self) -> Outcome {
        self.clear_transient_ui();
        self.view.open_form(FormMode::Add, None);
        self.bind_all(&FORM_BINDINGS);
        Outcome::Handled
    }

    pub fn on_open_edit_form(&mut self, id: &RecipeId) -> Outcome {
        let Some(record) = self.repository.cache().get(id).cloned() else {
            tracing::warn!("Cannot edit unknown recipe {}", id);
            return Outcome::Ignored;
        };
        self.clear_transient_ui();
        self.view.open_form(FormMode::Edit, Some(&record));
        self.bind_all(&FORM_BINDINGS);
        Outcome::Handled
    }

    /// Validate the form and save it. An invalid form stays open with the
    /// offending field marked; nothing is written.
    pub fn on_submit(&mut self) -> Result<Outcome> {
        let Some(values) = self.view.form_values() else {
            return Ok(Outcome::Ignored);
        };

        let stored_photo = values
            .id
            .and_then(|id| self.repository.cache().get(&id))
            .and_then(|recipe| recipe.photo.clone());
        let photo = match (values.upload, values.state) {
            (Some(upload), _) => Some(upload),
            (None, FormState::Pristine) => stored_photo,
            (None, FormState::Reset) => None,
        };

        let draft = RecipeDraft {
            id: values.id,
            name: values.name,
            description: values.description,
            ingredients: values.ingredients,
            instructions: values.instructions,
            photo,
        };
        let recipe = match draft.validate_with(self.view.settings().max_input_length) {
            Ok(recipe) => recipe,
            Err(err) => {
                tracing::debug!("Rejected form: {}", err);
                self.view.mark_invalid(err.field);
                return Ok(Outcome::Rejected(err));
            }
        };

        match values.mode {
            FormMode::Add => {
                self.repository.add_recipe(recipe.clone())?;
                self.view.add_card(&recipe);
            }
            FormMode::Edit => {
                self.repository.update_recipe(recipe.clone())?;
                self.view.update_card(&recipe);
            }
        }
        self.close_modal();
        Ok(Outcome::Handled)
    }

    pub fn on_delete(&mut self, id: &RecipeId) -> Result<Outcome> {
        self.clear_transient_ui();
        self.repository.delete_recipe(id)?;
        self.view.remove_card(id);
        Ok(Outcome::Handled)
    }

    /// Toggle a card's options menu. Opening one closes any other.
    pub fn on_open_options_menu(&mut self, id: &RecipeId) -> Outcome {
        if self.view.open_options_menu_id() == Some(*id) {
            self.view.close_options_menu();
            return Outcome::Handled;
        }
        handled(self.view.open_options_menu(id))
    }

    pub fn on_close_options_menu(&mut self) -> Outcome {
        handled(self.view.close_options_menu().is_some())
    }

    pub fn on_close_modal(&mut self) -> Outcome {
        handled(self.close_modal())
    }

    /// Escape: close the modal if one is open, else the options menu.
    pub fn on_dismiss(&mut self) -> Outcome {
        if self.close_modal() {
            return Outcome::Handled;
        }
        self.on_close_options_menu()
    }

    fn on_add_input(&mut self, fieldset: FieldsetKind) -> Outcome {
        handled(self.view.add_inputs(fieldset))
    }

    /// Close the modal, then restore the default bindings.
    fn close_modal(&mut self) -> bool {
        if !self.view.close_modal() {
            return false;
        }
        self.bind_all(&DEFAULT_BINDINGS);
        true
    }

    fn clear_transient_ui(&mut self) {
        self.view.close_options_menu();
        self.close_modal();
    }

    fn bind_all(&mut self, bindings: &[BindOptions]) {
        for options in bindings {
            self.view.bind_listener(*options);
        }
    }

    fn sync_view(&mut self) {
        if !self.changes.has_changed() {
            return;
        }
        self.changes.mark_seen();
        let records = self.repository.cache().get_all();
        self.view.reconcile(&records);
    }
}

fn handled(done: bool) -> Outcome {
    if done {
        Outcome::Handled
    } else {
        Outcome::Ignored
    }
}
