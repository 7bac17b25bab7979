use clap::Parser;
use recipebook::app;
use recipebook::config::AppConfig;
use recipebook::controller::{Controller, Outcome};
use recipebook::error::{RecipeError, Result};
use recipebook::model::{Photo, RecipeId};
use recipebook::store::fs::FileStore;
use recipebook::view::{FieldsetKind, Key, RawEvent, Target};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod args;
mod print;
use args::{Cli, Commands};
use print::{print_cards, print_detail, print_success, print_warning};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// What to type into the form. Empty lists leave a fieldset as it is.
#[derive(Default)]
struct FormInput {
    name: Option<String>,
    description: Option<String>,
    ingredients: Vec<String>,
    steps: Vec<String>,
    photo: Option<PathBuf>,
    remove_photo: bool,
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::discover(cli.config.as_deref())?;
    let store = FileStore::new(config.resolve_data_dir()?).with_file_name(&config.store_file);
    let mut controller = app::launch(Arc::new(store), config.view_settings()).await?;

    let result = match cli.command {
        Some(Commands::List) | None => {
            print_cards(controller.view());
            Ok(())
        }
        Some(Commands::Show { recipe }) => handle_show(&mut controller, &recipe),
        Some(Commands::Add {
            name,
            description,
            ingredients,
            steps,
            photo,
        }) => handle_add(
            &mut controller,
            FormInput {
                name: Some(name),
                description,
                ingredients,
                steps,
                photo,
                remove_photo: false,
            },
        ),
        Some(Commands::Edit {
            recipe,
            name,
            description,
            ingredients,
            steps,
            photo,
            remove_photo,
        }) => handle_edit(
            &mut controller,
            &recipe,
            FormInput {
                name,
                description,
                ingredients,
                steps,
                photo,
                remove_photo,
            },
        ),
        Some(Commands::Delete { recipe }) => handle_delete(&mut controller, &recipe),
    };

    let stats = controller.shutdown().await;
    if stats.failed > 0 {
        print_warning(&format!(
            "{} change(s) could not be saved; see the log for details.",
            stats.failed
        ));
    }
    result
}

/// A list position (1-based) or a recipe id.
fn resolve_recipe(controller: &Controller, reference: &str) -> Result<RecipeId> {
    let cards = controller.view().cards();
    if let Ok(position) = reference.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|i| cards.get(i))
            .map(|card| card.id)
            .ok_or_else(|| RecipeError::UnknownReference(reference.to_string()));
    }

    let id: RecipeId = reference
        .parse()
        .map_err(|_| RecipeError::UnknownReference(reference.to_string()))?;
    if cards.iter().any(|card| card.id == id) {
        Ok(id)
    } else {
        Err(RecipeError::NotFound(id))
    }
}

fn handle_show(controller: &mut Controller, reference: &str) -> Result<()> {
    let id = resolve_recipe(controller, reference)?;
    controller.handle_event(RawEvent::click(Target::ReadMore(id)))?;

    if let Some(detail) = controller.view().modal().and_then(|m| m.detail()) {
        print_detail(detail);
    }
    controller.handle_event(RawEvent::key_down(Key::Escape))?;
    Ok(())
}

fn handle_add(controller: &mut Controller, input: FormInput) -> Result<()> {
    controller.handle_event(RawEvent::click(Target::AddRecipeButton))?;
    fill_form(controller, &input)?;
    submit(controller)?;
    print_success(&format!(
        "Added {}",
        input.name.as_deref().unwrap_or_default()
    ));
    print_cards(controller.view());
    Ok(())
}

fn handle_edit(controller: &mut Controller, reference: &str, input: FormInput) -> Result<()> {
    let id = resolve_recipe(controller, reference)?;
    controller.handle_event(RawEvent::click(Target::OptionsToggle(id)))?;
    controller.handle_event(RawEvent::click(Target::CardEdit(id)))?;
    fill_form(controller, &input)?;
    submit(controller)?;
    print_success("Recipe updated");
    print_cards(controller.view());
    Ok(())
}

fn handle_delete(controller: &mut Controller, reference: &str) -> Result<()> {
    let id = resolve_recipe(controller, reference)?;
    let title = controller
        .view()
        .card(&id)
        .map(|card| card.title.clone())
        .unwrap_or_default();

    controller.handle_event(RawEvent::click(Target::OptionsToggle(id)))?;
    controller.handle_event(RawEvent::click(Target::CardDelete(id)))?;
    print_success(&format!("Deleted {}", title));
    print_cards(controller.view());
    Ok(())
}

fn fill_form(controller: &mut Controller, input: &FormInput) -> Result<()> {
    if let Some(name) = &input.name {
        controller.on_input(Target::NameField, name)?;
    }
    if let Some(description) = &input.description {
        controller.on_input(Target::DescriptionField, description)?;
    }
    fill_fieldset(controller, FieldsetKind::Ingredients, &input.ingredients)?;
    fill_fieldset(controller, FieldsetKind::Instructions, &input.steps)?;

    if input.remove_photo {
        controller.handle_event(RawEvent::click(Target::RemoveImageButton))?;
    }
    if let Some(path) = &input.photo {
        select_photo(controller, path)?;
    }
    Ok(())
}

/// Replace a fieldset's entries: remove every input but the trailing
/// blank, then type each value into the last input.
fn fill_fieldset(controller: &mut Controller, kind: FieldsetKind, values: &[String]) -> Result<()> {
    if values.is_empty() {
        return Ok(());
    }

    let Some(form) = controller.view().form() else {
        return Ok(());
    };
    let inputs = form.fieldset(kind).inputs();
    let stale: Vec<usize> = inputs
        .iter()
        .take(inputs.len().saturating_sub(1))
        .map(|input| input.name)
        .collect();
    for name in stale {
        controller.handle_event(RawEvent::click(Target::RemoveInput {
            fieldset: kind,
            name,
        }))?;
    }

    for value in values {
        let last = controller
            .view()
            .form()
            .and_then(|form| form.fieldset(kind).inputs().last())
            .map(|input| input.name);
        if let Some(name) = last {
            controller.on_input(Target::FieldsetInput { fieldset: kind, name }, value)?;
        }
    }
    Ok(())
}

fn select_photo(controller: &mut Controller, path: &Path) -> Result<()> {
    let photo = Photo::from_path(path)?;
    controller.handle_event(RawEvent::file_selected(photo))?;
    Ok(())
}

fn submit(controller: &mut Controller) -> Result<()> {
    for outcome in controller.handle_event(RawEvent::submit())? {
        if let Outcome::Rejected(err) = outcome {
            return Err(RecipeError::Validation(err));
        }
    }
    Ok(())
}
