//! Whole user flows, driven the way a host drives the app: raw events in,
//! view state and store contents out.

use recipebook::app::launch;
use recipebook::controller::{Controller, Outcome};
use recipebook::model::{Photo, Recipe};
use recipebook::store::fs::FileStore;
use recipebook::store::memory::MemoryStore;
use recipebook::validation::{FormField, ValidationKind};
use recipebook::view::{
    FieldsetKind, FormState, Key, ModalPhase, RawEvent, Target, ViewSettings, EMPTY_LIST_HINT,
};
use std::sync::Arc;
use tempfile::tempdir;

async fn start(store: Arc<MemoryStore>) -> Controller {
    launch(store, ViewSettings::default()).await.unwrap()
}

fn type_entries(c: &mut Controller, kind: FieldsetKind, values: &[&str]) {
    for value in values {
        let name = c
            .view()
            .form()
            .and_then(|form| form.fieldset(kind).inputs().last())
            .map(|input| input.name).unwrap();
        c.on_input(Target::FieldsetInput { fieldset: kind, name }, value).unwrap();
    }
}

fn add_toast(c: &mut Controller) {
    c.handle_event(RawEvent::click(Target::AddRecipeButton)).unwrap();
    c.on_input(Target::NameField, "Toast").unwrap();
    type_entries(c, FieldsetKind::Ingredients, &["bread", "butter"]);
    type_entries(c, FieldsetKind::Instructions, &["toast it", "butter it"]);
    let outcomes = c.handle_event(RawEvent::submit()).unwrap();
    assert_eq!(outcomes, vec![Outcome::Handled]);
}

#[tokio::test]
async fn test_toast_added_then_deleted() {
    let store = Arc::new(MemoryStore::new());
    let mut c = start(store.clone()).await;
    assert_eq!(c.view().empty_hint(), Some(EMPTY_LIST_HINT));

    add_toast(&mut c);

    let cards = c.view().cards();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].title, "Toast");
    assert_eq!(cards[0].ingredients, vec!["bread", "butter"]);
    assert!(cards[0].image.is_placeholder());

    let saved = c.repository().cache().get_all();
    assert_eq!(saved[0].instructions, vec!["toast it", "butter it"]);
    c.repository().flush().await.unwrap();
    assert_eq!(store.snapshot(), saved);

    let id = cards[0].id;
    c.handle_event(RawEvent::click(Target::OptionsToggle(id))).unwrap();
    c.handle_event(RawEvent::click(Target::CardDelete(id))).unwrap();

    assert!(c.view().cards().is_empty());
    assert!(c.repository().cache().get_all().is_empty());
    let stats = c.shutdown().await;
    assert_eq!(stats.failed, 0);
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn test_edit_without_upload_keeps_photo() {
    let photo = Photo::new("image/jpeg", vec![1, 2, 3]);
    let original = Recipe::new("Pancakes")
        .with_ingredients(["flour", "milk"])
        .with_photo(photo.clone());
    let store = Arc::new(MemoryStore::with_recipes(vec![original.clone()]));
    let mut c = start(store).await;

    c.on_open_edit_form(&original.id);
    c.on_input(Target::DescriptionField, "Sunday breakfast").unwrap();
    assert_eq!(c.on_submit().unwrap(), Outcome::Handled);

    let updated = c.repository().cache().get(&original.id).unwrap();
    assert_eq!(updated.photo, Some(photo));
    assert_eq!(updated.description.as_deref(), Some("Sunday breakfast"));
}

#[tokio::test]
async fn test_reset_form_drops_photo() {
    let original = Recipe::new("Pancakes").with_photo(Photo::new("image/png", vec![9]));
    let store = Arc::new(MemoryStore::with_recipes(vec![original.clone()]));
    let mut c = start(store.clone()).await;

    c.handle_event(RawEvent::click(Target::OptionsToggle(original.id))).unwrap();
    c.handle_event(RawEvent::click(Target::CardEdit(original.id))).unwrap();
    c.handle_event(RawEvent::click(Target::RemoveImageButton)).unwrap();
    assert_eq!(c.view().form().unwrap().state(), FormState::Reset);

    c.handle_event(RawEvent::submit()).unwrap();
    assert_eq!(c.repository().cache().get(&original.id).unwrap().photo, None);
    assert!(c.view().cards()[0].image.is_placeholder());

    c.shutdown().await;
    assert_eq!(store.snapshot()[0].photo, None);
}

#[tokio::test]
async fn test_new_upload_replaces_photo() {
    let original = Recipe::new("Pancakes").with_photo(Photo::new("image/png", vec![9]));
    let store = Arc::new(MemoryStore::with_recipes(vec![original.clone()]));
    let mut c = start(store).await;
    let before = c.view().cards()[0].image.src().to_string();

    let fresh = Photo::new("image/png", vec![4, 5, 6]);
    c.on_open_edit_form(&original.id);
    c.handle_event(RawEvent::file_selected(fresh.clone())).unwrap();
    assert_eq!(c.view().form().unwrap().image_button_label(), "Change");
    c.handle_event(RawEvent::submit()).unwrap();

    assert_eq!(
        c.repository().cache().get(&original.id).unwrap().photo,
        Some(fresh)
    );
    assert_ne!(c.view().cards()[0].image.src(), before);
    assert_eq!(c.view().live_object_urls(), 1);
}

#[tokio::test]
async fn test_closing_the_form_restores_listener_baseline() {
    let mut c = start(Arc::new(MemoryStore::new())).await;
    let baseline = c.view().listener_count();

    c.on_open_add_form();
    assert!(c.view().listener_count() > baseline);
    c.handle_event(RawEvent::click(Target::CancelButton)).unwrap();

    assert_eq!(c.view().modal_phase(), ModalPhase::Closed);
    assert_eq!(c.view().listener_count(), baseline);

    c.view_mut().unbind_all_listeners();
    assert!(c.view().listeners().is_empty());
}

#[tokio::test]
async fn test_every_exit_path_tears_down() {
    let recipe = Recipe::new("Soup").with_photo(Photo::new("image/png", vec![1]));
    let mut c = start(Arc::new(MemoryStore::with_recipes(vec![recipe.clone()]))).await;
    let baseline = c.view().listener_count();

    let exits = [
        RawEvent::click(Target::ModalBackdrop),
        RawEvent::click(Target::CancelButton),
        RawEvent::key_down(Key::Escape),
        RawEvent::click(Target::DetailEdit(recipe.id)),
    ];
    for exit in exits {
        c.on_open_recipe(&recipe.id);
        c.handle_event(exit).unwrap();
        // DetailEdit swaps the detail for the form; close that too
        c.on_dismiss();

        assert_eq!(c.view().modal_phase(), ModalPhase::Closed);
        assert_eq!(c.view().listener_count(), baseline);
        assert_eq!(c.view().live_object_urls(), 1);
    }
}

#[tokio::test]
async fn test_invalid_entry_is_rejected_without_writes() {
    let store = Arc::new(MemoryStore::new());
    let mut c = start(store.clone()).await;

    c.on_open_add_form();
    c.on_input(Target::NameField, "   ").unwrap();
    type_entries(&mut c, FieldsetKind::Ingredients, &["salt"]);
    let outcomes = c.handle_event(RawEvent::submit()).unwrap();

    match outcomes.as_slice() {
        [Outcome::Rejected(err)] => {
            assert_eq!(err.field, FormField::Name);
            assert_eq!(err.kind, ValidationKind::Required);
        }
        other => panic!("expected one rejection, got {:?}", other),
    }
    assert_eq!(c.view().modal_phase(), ModalPhase::Open);
    assert!(c.repository().cache().is_empty());

    let stats = c.shutdown().await;
    assert_eq!(stats.applied, 0);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_unsupported_image_type_is_rejected() {
    let mut c = start(Arc::new(MemoryStore::new())).await;
    c.on_open_add_form();
    c.on_input(Target::NameField, "Toast").unwrap();
    c.handle_event(RawEvent::file_selected(Photo::new("image/gif", vec![1]))).unwrap();

    let outcome = c.on_submit().unwrap();
    assert!(matches!(
        outcome,
        Outcome::Rejected(ref err) if err.field == FormField::Photo
    ));
    assert_eq!(c.view().form().unwrap().invalid_field(), Some(FormField::Photo));
}

#[tokio::test]
async fn test_restored_order_survives_restart() {
    let dir = tempdir().unwrap();
    let names = ["Soup", "Bread", "Salad"];

    {
        let store = Arc::new(FileStore::new(dir.path()));
        let mut c = launch(store, ViewSettings::default()).await.unwrap();
        for name in names {
            c.on_open_add_form();
            c.on_input(Target::NameField, name).unwrap();
            c.on_submit().unwrap();
        }
        let stats = c.shutdown().await;
        assert_eq!(stats.applied, 3);
    }

    let store = Arc::new(FileStore::new(dir.path()));
    let c = launch(store, ViewSettings::default()).await.unwrap();
    let titles: Vec<_> = c.view().cards().iter().map(|card| card.title.as_str()).collect();
    assert_eq!(titles, names);
}

#[tokio::test]
async fn test_deleting_everything_leaks_no_object_urls() {
    let recipes: Vec<_> = (0..4)
        .map(|i| Recipe::new(format!("Dish {}", i)).with_photo(Photo::new("image/png", vec![i])))
        .collect();
    let mut c = start(Arc::new(MemoryStore::with_recipes(recipes.clone()))).await;
    assert_eq!(c.view().live_object_urls(), 4);

    c.on_open_recipe(&recipes[0].id);
    assert_eq!(c.view().live_object_urls(), 5);

    for recipe in &recipes {
        c.handle_event(RawEvent::click(Target::OptionsToggle(recipe.id))).unwrap();
        c.handle_event(RawEvent::click(Target::CardDelete(recipe.id))).unwrap();
    }
    assert_eq!(c.view().live_object_urls(), 0);
    assert_eq!(c.view().empty_hint(), Some(EMPTY_LIST_HINT));
}
