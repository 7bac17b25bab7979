//! # View State
//!
//! A host-independent model of what is on screen: the card grid, at most one
//! modal (a recipe detail or the add/edit form), the open options menu, the
//! delegated listener registry and the object URLs images are shown through.
//! A host renders from this state and reports input back as [`RawEvent`]s.
//!
//! ## Modal Lifecycle
//!
//! `Closed → Opening → Open → Closing → Closed`. Mounting and teardown each
//! finish within one call, so only `Closed` and `Open` are ever observed.
//! Closing always tears down every listener before the modal is dropped and
//! its image handles revoked, so no binding can outlive the elements it was
//! delegated from.
//!
//! ## Cards
//!
//! Cards are keyed by recipe id. The controller applies incremental updates
//! right after a mutation; [`ViewState::reconcile`] then brings the grid in
//! line with the cache order and finds nothing left to do.

use crate::model::{Photo, Recipe, RecipeId};
use crate::validation::{FormField, MAX_ENTRY_LEN};
use std::collections::{HashMap, HashSet};

pub mod card;
pub mod event;
pub mod form;
pub mod listeners;
pub mod modal;
pub mod object_url;

pub use card::{CardView, ImageSource, ImageView};
pub use event::{EventKind, Intent, Key, RawEvent, Target};
pub use form::{FieldsetKind, FormMode, FormState, FormValues, FormView, ImagePreview};
pub use listeners::{BindOptions, Condition, Handler, ListenerId, ListenerRegistry, Root};
pub use modal::{DetailView, Modal, ModalContent, ModalPhase};
pub use object_url::{ObjectUrl, ObjectUrls};

pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "./assets/icons/fast-food-100.png";
pub const EMPTY_LIST_HINT: &str = "Click the + button to create your first recipe";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSettings {
    /// Image shown for recipes without a photo
    pub placeholder_src: String,
    pub max_input_length: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            placeholder_src: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            max_input_length: MAX_ENTRY_LEN,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub moved: usize,
}

impl ReconcileStats {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Default)]
pub struct ViewState {
    settings: ViewSettings,
    cards: Vec<CardView>,
    options_menu: Option<RecipeId>,
    modal: Option<Modal>,
    listeners: ListenerRegistry,
    urls: ObjectUrls,
}

impl ViewState {
    pub fn new(settings: ViewSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    // --- Cards ---

    pub fn cards(&self) -> &[CardView] {
        &self.cards
    }

    pub fn card(&self, id: &RecipeId) -> Option<&CardView> {
        self.cards.iter().find(|c| c.id == *id)
    }

    /// Hint shown in place of the grid when there are no recipes.
    pub fn empty_hint(&self) -> Option<&'static str> {
        self.cards.is_empty().then_some(EMPTY_LIST_HINT)
    }

    /// Replace the whole grid.
    pub fn render_list(&mut self, records: &[Recipe]) {
        for card in self.cards.drain(..) {
            card.image.release(&mut self.urls);
        }
        self.options_menu = None;
        self.cards = records
            .iter()
            .map(|r| CardView::new(r, &mut self.urls, &self.settings.placeholder_src))
            .collect();
    }

    pub fn add_card(&mut self, record: &Recipe) {
        if self.card(&record.id).is_some() {
            self.update_card(record);
            return;
        }
        let card = CardView::new(record, &mut self.urls, &self.settings.placeholder_src);
        self.cards.push(card);
    }

    /// Patch a card in place. Returns false if there is no such card or it
    /// already shows `record`.
    pub fn update_card(&mut self, record: &Recipe) -> bool {
        match self.cards.iter_mut().find(|c| c.id == record.id) {
            Some(card) => card.patch(record, &mut self.urls, &self.settings.placeholder_src),
            None => false,
        }
    }

    pub fn remove_card(&mut self, id: &RecipeId) -> bool {
        let Some(index) = self.cards.iter().position(|c| c.id == *id) else {
            return false;
        };
        let card = self.cards.remove(index);
        card.image.release(&mut self.urls);
        if self.options_menu == Some(*id) {
            self.options_menu = None;
        }
        true
    }

    /// Keyed diff of the grid against `records`, which are in display order.
    pub fn reconcile(&mut self, records: &[Recipe]) -> ReconcileStats {
        let mut stats = ReconcileStats::default();
        let wanted: HashSet<RecipeId> = records.iter().map(|r| r.id).collect();

        let mut existing: HashMap<RecipeId, CardView> = HashMap::new();
        let mut old_order = Vec::new();
        for card in self.cards.drain(..) {
            if wanted.contains(&card.id) && !existing.contains_key(&card.id) {
                old_order.push(card.id);
                existing.insert(card.id, card);
            } else {
                card.image.release(&mut self.urls);
                stats.removed += 1;
            }
        }

        let mut new_order = Vec::new();
        for record in records {
            match existing.remove(&record.id) {
                Some(mut card) => {
                    if card.patch(record, &mut self.urls, &self.settings.placeholder_src) {
                        stats.updated += 1;
                    }
                    new_order.push(card.id);
                    self.cards.push(card);
                }
                None => {
                    if self.cards.iter().any(|c| c.id == record.id) {
                        continue;
                    }
                    self.cards.push(CardView::new(
                        record,
                        &mut self.urls,
                        &self.settings.placeholder_src,
                    ));
                    stats.added += 1;
                }
            }
        }
        stats.moved = old_order
            .iter()
            .zip(&new_order)
            .filter(|(old, new)| old != new)
            .count();

        if let Some(open) = self.options_menu {
            if self.card(&open).is_none() {
                self.options_menu = None;
            }
        }

        if !stats.is_noop() {
            tracing::debug!("Reconciled cards: {:?}", stats);
        }
        stats
    }

    // --- Options menu ---

    pub fn open_options_menu_id(&self) -> Option<RecipeId> {
        self.options_menu
    }

    /// Open a card's options menu, closing any other first.
    pub fn open_options_menu(&mut self, id: &RecipeId) -> bool {
        if self.card(id).is_none() {
            return false;
        }
        self.close_options_menu();
        for card in self.cards.iter_mut().filter(|c| c.id == *id) {
            card.options_open = true;
        }
        self.options_menu = Some(*id);
        true
    }

    pub fn close_options_menu(&mut self) -> Option<RecipeId> {
        let closed = self.options_menu.take()?;
        for card in self.cards.iter_mut() {
            card.options_open = false;
        }
        Some(closed)
    }

    // --- Modal ---

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn modal_phase(&self) -> ModalPhase {
        self.modal.as_ref().map_or(ModalPhase::Closed, |m| m.phase)
    }

    pub fn open_detail(&mut self, record: &Recipe) {
        self.close_modal();
        let detail = DetailView::new(record, &mut self.urls, &self.settings.placeholder_src);
        self.mount(ModalContent::Detail(detail));
    }

    /// Open the form. Edit forms are filled from `record`, including a
    /// preview of its stored photo.
    pub fn open_form(&mut self, mode: FormMode, record: Option<&Recipe>) {
        self.close_modal();
        let mut form = FormView::new(mode, record, self.settings.max_input_length);
        if let Some(record) = record {
            if let Some(photo) = &record.photo {
                form.set_preview(ImagePreview {
                    src: Some(self.urls.create(photo)),
                    alt: Some(record.name.clone()),
                });
            }
        }
        self.mount(ModalContent::Form(Box::new(form)));
    }

    fn mount(&mut self, content: ModalContent) {
        self.modal = Some(Modal {
            phase: ModalPhase::Open,
            content,
        });
    }

    /// Tear down every listener, then unmount the modal and revoke its image
    /// handles. Returns false if no modal was open.
    pub fn close_modal(&mut self) -> bool {
        let Some(modal) = self.modal.as_mut() else {
            return false;
        };
        modal.phase = ModalPhase::Closing;
        self.unbind_all_listeners();

        if let Some(modal) = self.modal.take() {
            modal.release(&mut self.urls);
        }
        true
    }

    // --- Form ---

    pub fn form(&self) -> Option<&FormView> {
        self.modal.as_ref().and_then(Modal::form)
    }

    pub fn form_mut(&mut self) -> Option<&mut FormView> {
        self.modal.as_mut().and_then(Modal::form_mut)
    }

    pub fn form_values(&self) -> Option<FormValues> {
        self.form().map(FormView::values)
    }

    /// Show a newly selected image in the form, replacing any previous
    /// preview.
    pub fn preview_image(&mut self, photo: Photo) -> bool {
        let Some(modal) = self.modal.as_mut() else {
            return false;
        };
        let Some(form) = modal.form_mut() else {
            return false;
        };

        let alt = (!form.name().is_empty()).then(|| form.name().to_string());
        let previous = form.set_preview(ImagePreview {
            src: Some(self.urls.create(&photo)),
            alt,
        });
        form.set_upload(Some(photo));
        if let Some(previous) = previous {
            self.urls.revoke(&previous);
        }
        true
    }

    /// Drop the upload and the preview, and remember the photo was removed.
    pub fn reset_image(&mut self) -> bool {
        let Some(form) = self.modal.as_mut().and_then(Modal::form_mut) else {
            return false;
        };
        let previous = form.set_preview(ImagePreview::default());
        form.set_upload(None);
        form.mark_reset();
        if let Some(previous) = previous {
            self.urls.revoke(&previous);
        }
        true
    }

    /// Append a blank input to a fieldset.
    pub fn add_inputs(&mut self, fieldset: FieldsetKind) -> bool {
        match self.form_mut() {
            Some(form) => {
                form.fieldset_mut(fieldset).append(&[]);
                true
            }
            None => false,
        }
    }

    pub fn remove_input(&mut self, fieldset: FieldsetKind, name: usize) -> bool {
        self.form_mut()
            .is_some_and(|form| form.fieldset_mut(fieldset).remove(name))
    }

    pub fn mark_invalid(&mut self, field: FormField) -> bool {
        match self.form_mut() {
            Some(form) => {
                form.set_invalid(field);
                true
            }
            None => false,
        }
    }

    // --- Listeners ---

    pub fn is_mounted(&self, root: Root) -> bool {
        match root {
            Root::Document => true,
            Root::Modal => self.modal.is_some(),
            Root::Form | Root::ImageInput => self.form().is_some(),
        }
    }

    /// Register a delegated listener. Refused for unmounted roots and for
    /// duplicates.
    pub fn bind_listener(&mut self, options: BindOptions) -> Option<ListenerId> {
        if !self.is_mounted(options.root) {
            tracing::warn!(
                "Cannot bind {:?} to unmounted root {:?}",
                options.handler,
                options.root
            );
            return None;
        }
        self.listeners.bind(options)
    }

    pub fn unbind_all_listeners(&mut self) -> usize {
        self.listeners.unbind_all()
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn listener_ids(&self) -> Vec<ListenerId> {
        self.listeners.ids()
    }

    /// The intent listener `id` produces for `event` in the current state.
    /// `None` if the listener is gone, listens for another kind of event,
    /// the event happened outside its root, or its condition does not hold.
    pub fn resolve(&self, id: ListenerId, event: &RawEvent) -> Option<Intent> {
        let binding = self.listeners.get(id)?;
        let options = binding.options;
        if options.event != event.kind
            || !self.is_mounted(options.root)
            || !event.target.within(options.root)
            || !options.condition.holds(event, self)
        {
            return None;
        }
        options.handler.intent(event)
    }

    // --- Object URLs ---

    pub fn live_object_urls(&self) -> usize {
        self.urls.live_count()
    }

    pub fn object_urls(&self) -> &ObjectUrls {
        &self.urls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(byte: u8) -> Photo {
        Photo::new("image/png", vec![byte; 4])
    }

    fn names(view: &ViewState) -> Vec<String> {
        view.cards().iter().map(|c| c.title.clone()).collect()
    }

    #[test]
    fn test_empty_list_shows_hint() {
        let mut view = ViewState::default();
        view.render_list(&[]);
        assert_eq!(view.empty_hint(), Some(EMPTY_LIST_HINT));

        view.render_list(&[Recipe::new("Toast")]);
        assert_eq!(view.empty_hint(), None);
    }

    #[test]
    fn test_render_list_releases_previous_handles() {
        let mut view = ViewState::default();
        let records = vec![
            Recipe::new("A").with_photo(photo(1)),
            Recipe::new("B").with_photo(photo(2)),
        ];
        view.render_list(&records);
        assert_eq!(view.live_object_urls(), 2);
        view.render_list(&records);
        assert_eq!(view.live_object_urls(), 2);
        view.render_list(&[]);
        assert_eq!(view.live_object_urls(), 0);
    }

    #[test]
    fn test_reconcile_adds_patches_removes_and_reorders() {
        let mut view = ViewState::default();
        let a = Recipe::new("A");
        let b = Recipe::new("B");
        let c = Recipe::new("C");
        view.render_list(&[a.clone(), b.clone(), c.clone()]);

        let renamed_b = Recipe {
            name: "B2".into(),
            ..b.clone()
        };
        let d = Recipe::new("D");
        let stats = view.reconcile(&[c.clone(), renamed_b.clone(), d.clone()]);

        assert_eq!(
            stats,
            ReconcileStats {
                added: 1,
                updated: 1,
                removed: 1,
                moved: 2,
            }
        );
        assert_eq!(names(&view), vec!["C", "B2", "D"]);
        assert!(view.reconcile(&[c, renamed_b, d]).is_noop());
    }

    #[test]
    fn test_reconcile_is_noop_after_incremental_updates() {
        let mut view = ViewState::default();
        let toast = Recipe::new("Toast");
        view.render_list(&[toast.clone()]);

        let tea = Recipe::new("Tea").with_photo(photo(3));
        view.add_card(&tea);
        let toast2 = Recipe {
            ingredients: vec!["bread".into()],
            ..toast
        };
        assert!(view.update_card(&toast2));
        assert!(view.reconcile(&[toast2.clone(), tea.clone()]).is_noop());

        assert!(view.remove_card(&tea.id));
        assert!(!view.remove_card(&tea.id));
        assert!(view.reconcile(&[toast2]).is_noop());
        assert_eq!(view.live_object_urls(), 0);
    }

    #[test]
    fn test_at_most_one_options_menu() {
        let mut view = ViewState::default();
        let a = Recipe::new("A");
        let b = Recipe::new("B");
        view.render_list(&[a.clone(), b.clone()]);

        assert!(view.open_options_menu(&a.id));
        assert!(view.open_options_menu(&b.id));
        let open: Vec<_> = view.cards().iter().filter(|c| c.options_open).collect();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, b.id);

        assert_eq!(view.close_options_menu(), Some(b.id));
        assert_eq!(view.close_options_menu(), None);
        assert!(!view.open_options_menu(&RecipeId::new()));
    }

    #[test]
    fn test_modal_lifecycle_tears_down_listeners() {
        let mut view = ViewState::default();
        assert_eq!(view.modal_phase(), ModalPhase::Closed);
        let close = BindOptions::new(EventKind::Click, Handler::CloseModal).root(Root::Modal);
        assert!(view.bind_listener(close).is_none());

        view.open_detail(&Recipe::new("Toast").with_photo(photo(1)));
        assert_eq!(view.modal_phase(), ModalPhase::Open);
        assert!(view.bind_listener(close).is_some());
        assert_eq!(view.live_object_urls(), 1);

        assert!(view.close_modal());
        assert_eq!(view.modal_phase(), ModalPhase::Closed);
        assert_eq!(view.listener_count(), 0);
        assert_eq!(view.live_object_urls(), 0);
        assert!(!view.close_modal());
    }

    #[test]
    fn test_edit_form_previews_stored_photo() {
        let mut view = ViewState::default();
        let recipe = Recipe::new("Toast").with_photo(photo(1));
        view.open_form(FormMode::Edit, Some(&recipe));

        let form = view.form().unwrap();
        assert!(form.can_remove_image());
        assert_eq!(form.image_button_label(), "Change");
        assert_eq!(view.live_object_urls(), 1);

        assert!(view.reset_image());
        let form = view.form().unwrap();
        assert_eq!(form.state(), FormState::Reset);
        assert!(!form.can_remove_image());
        assert_eq!(view.live_object_urls(), 0);
    }

    #[test]
    fn test_preview_replaces_previous_handle() {
        let mut view = ViewState::default();
        view.open_form(FormMode::Add, None);

        assert!(view.preview_image(photo(1)));
        assert!(view.preview_image(photo(2)));
        assert_eq!(view.live_object_urls(), 1);
        assert_eq!(view.form_values().unwrap().upload, Some(photo(2)));

        view.close_modal();
        assert_eq!(view.live_object_urls(), 0);
    }

    #[test]
    fn test_form_operations_need_a_form() {
        let mut view = ViewState::default();
        assert!(!view.preview_image(photo(1)));
        assert!(!view.reset_image());
        assert!(!view.add_inputs(FieldsetKind::Ingredients));
        assert!(!view.mark_invalid(FormField::Name));
        assert!(view.form_values().is_none());
        assert_eq!(view.live_object_urls(), 0);

        view.open_detail(&Recipe::new("Toast"));
        assert!(!view.add_inputs(FieldsetKind::Ingredients));
    }

    #[test]
    fn test_add_and_remove_inputs() {
        let mut view = ViewState::default();
        view.open_form(FormMode::Add, None);
        assert!(view.add_inputs(FieldsetKind::Instructions));
        assert_eq!(
            view.form().unwrap().fieldset(FieldsetKind::Instructions).len(),
            2
        );
        assert!(view.remove_input(FieldsetKind::Instructions, 0));
        assert!(!view.remove_input(FieldsetKind::Instructions, 0));
        assert_eq!(view.form_values().unwrap().instructions, vec![""]);
    }

    #[test]
    fn test_resolve_checks_kind_root_and_condition() {
        let mut view = ViewState::default();
        let id = view
            .bind_listener(
                BindOptions::new(EventKind::Click, Handler::OpenAddForm)
                    .when(Condition::ShouldOpenAddForm),
            )
            .unwrap();

        let click = RawEvent::click(Target::AddRecipeButton);
        assert_eq!(view.resolve(id, &click), Some(Intent::OpenAddForm));
        assert_eq!(
            view.resolve(id, &RawEvent::new(EventKind::KeyPress, Target::AddRecipeButton)),
            None
        );
        assert_eq!(view.resolve(id, &RawEvent::click(Target::Document)), None);

        view.unbind_all_listeners();
        assert_eq!(view.resolve(id, &click), None);
    }
}
