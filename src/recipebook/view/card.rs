use super::object_url::{ObjectUrl, ObjectUrls};
use crate::model::{Photo, Recipe, RecipeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Object(ObjectUrl),
    Placeholder(String),
}

/// A rendered recipe image: the photo through an object URL, or the
/// placeholder icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageView {
    pub source: ImageSource,
    pub alt: String,
    digest: Option<u64>,
}

impl ImageView {
    pub(crate) fn new(
        photo: Option<&Photo>,
        alt: &str,
        urls: &mut ObjectUrls,
        placeholder: &str,
    ) -> Self {
        let source = match photo {
            Some(photo) => ImageSource::Object(urls.create(photo)),
            None => ImageSource::Placeholder(placeholder.to_string()),
        };
        Self {
            source,
            alt: alt.to_string(),
            digest: photo.map(Photo::digest),
        }
    }

    pub fn src(&self) -> &str {
        match &self.source {
            ImageSource::Object(url) => url.as_str(),
            ImageSource::Placeholder(src) => src,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.source, ImageSource::Placeholder(_))
    }

    pub(crate) fn shows(&self, photo: Option<&Photo>) -> bool {
        self.digest == photo.map(Photo::digest)
    }

    pub(crate) fn release(&self, urls: &mut ObjectUrls) {
        if let ImageSource::Object(url) = &self.source {
            urls.revoke(url);
        }
    }
}

/// One card in the recipe grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: RecipeId,
    pub title: String,
    pub image: ImageView,
    pub ingredients: Vec<String>,
    pub options_open: bool,
}

impl CardView {
    pub(crate) fn new(recipe: &Recipe, urls: &mut ObjectUrls, placeholder: &str) -> Self {
        Self {
            id: recipe.id,
            title: recipe.name.clone(),
            image: ImageView::new(recipe.photo.as_ref(), &recipe.name, urls, placeholder),
            ingredients: recipe.ingredients.clone(),
            options_open: false,
        }
    }

    pub fn shows(&self, recipe: &Recipe) -> bool {
        self.id == recipe.id
            && self.title == recipe.name
            && self.ingredients == recipe.ingredients
            && self.image.shows(recipe.photo.as_ref())
    }

    /// Bring image, title and ingredients in line with `recipe`. The image
    /// handle is only replaced when the photo itself changed. Returns whether
    /// anything changed.
    pub(crate) fn patch(
        &mut self,
        recipe: &Recipe,
        urls: &mut ObjectUrls,
        placeholder: &str,
    ) -> bool {
        if self.shows(recipe) {
            return false;
        }

        if !self.image.shows(recipe.photo.as_ref()) {
            self.image.release(urls);
            self.image = ImageView::new(recipe.photo.as_ref(), &recipe.name, urls, placeholder);
        }
        self.image.alt = recipe.name.clone();
        self.title = recipe.name.clone();
        self.ingredients = recipe.ingredients.clone();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLACEHOLDER: &str = "placeholder.png";

    #[test]
    fn test_card_without_photo_uses_placeholder() {
        let mut urls = ObjectUrls::new();
        let card = CardView::new(&Recipe::new("Toast"), &mut urls, PLACEHOLDER);
        assert!(card.image.is_placeholder());
        assert_eq!(card.image.src(), PLACEHOLDER);
        assert_eq!(urls.live_count(), 0);
    }

    #[test]
    fn test_patch_keeps_handle_when_photo_unchanged() {
        let mut urls = ObjectUrls::new();
        let recipe = Recipe::new("Toast").with_photo(Photo::new("image/png", vec![1]));
        let mut card = CardView::new(&recipe, &mut urls, PLACEHOLDER);
        let src = card.image.src().to_string();

        let renamed = Recipe {
            name: "Rye toast".into(),
            ingredients: vec!["rye".into()],
            ..recipe
        };
        assert!(card.patch(&renamed, &mut urls, PLACEHOLDER));
        assert_eq!(card.title, "Rye toast");
        assert_eq!(card.ingredients, vec!["rye"]);
        assert_eq!(card.image.src(), src);
        assert_eq!(urls.live_count(), 1);
    }

    #[test]
    fn test_patch_swaps_handle_when_photo_removed() {
        let mut urls = ObjectUrls::new();
        let recipe = Recipe::new("Toast").with_photo(Photo::new("image/png", vec![1]));
        let mut card = CardView::new(&recipe, &mut urls, PLACEHOLDER);

        let bare = Recipe {
            photo: None,
            ..recipe
        };
        assert!(card.patch(&bare, &mut urls, PLACEHOLDER));
        assert!(card.image.is_placeholder());
        assert_eq!(urls.live_count(), 0);
        assert!(!card.patch(&bare, &mut urls, PLACEHOLDER));
    }
}
