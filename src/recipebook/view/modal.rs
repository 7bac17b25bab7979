use super::card::ImageView;
use super::form::FormView;
use super::object_url::ObjectUrls;
use crate::model::{Recipe, RecipeId};

/// `Opening` and `Closing` name the mount and teardown steps. Both finish
/// within a single call, so callers only ever see `Closed` or `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalPhase {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

/// Read-only view of a single recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub id: RecipeId,
    pub name: String,
    pub description: Option<String>,
    pub image: ImageView,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

impl DetailView {
    pub(crate) fn new(recipe: &Recipe, urls: &mut ObjectUrls, placeholder: &str) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            description: recipe.description.clone(),
            image: ImageView::new(recipe.photo.as_ref(), &recipe.name, urls, placeholder),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModalContent {
    Detail(DetailView),
    Form(Box<FormView>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Modal {
    pub(crate) phase: ModalPhase,
    pub(crate) content: ModalContent,
}

impl Modal {
    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    pub fn content(&self) -> &ModalContent {
        &self.content
    }

    pub fn detail(&self) -> Option<&DetailView> {
        match &self.content {
            ModalContent::Detail(detail) => Some(detail),
            ModalContent::Form(_) => None,
        }
    }

    pub fn form(&self) -> Option<&FormView> {
        match &self.content {
            ModalContent::Form(form) => Some(form.as_ref()),
            ModalContent::Detail(_) => None,
        }
    }

    pub(crate) fn form_mut(&mut self) -> Option<&mut FormView> {
        match &mut self.content {
            ModalContent::Form(form) => Some(form.as_mut()),
            ModalContent::Detail(_) => None,
        }
    }

    /// Revoke every object URL the modal's content holds.
    pub(crate) fn release(&self, urls: &mut ObjectUrls) {
        match &self.content {
            ModalContent::Detail(detail) => detail.image.release(urls),
            ModalContent::Form(form) => {
                if let Some(src) = &form.preview().src {
                    urls.revoke(src);
                }
            }
        }
    }
}
