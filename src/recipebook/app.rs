use crate::controller::Controller;
use crate::error::Result;
use crate::repository::RecipeRepository;
use crate::store::PersistentStore;
use crate::view::ViewSettings;
use std::sync::Arc;

/// Start the app on top of `store`: connect it, restore the cache and hand
/// back a controller with the recipe list rendered.
///
/// A store that cannot be connected or read aborts startup.
pub async fn launch(store: Arc<dyn PersistentStore>, settings: ViewSettings) -> Result<Controller> {
    let mut repository = RecipeRepository::new(store);
    let restored = repository.initialize().await?;
    tracing::debug!("Launching with {} recipes", restored);
    Controller::new(repository, settings)
}
