//! Recipe expansion: a selected dish becomes a full recipe plus a photo.
//!
//! The recipe and the photo are requested concurrently. Their failures are
//! deliberately asymmetric: the recipe is the product, the photo is garnish.

use serde::{Deserialize, Serialize};
use sous_core::error::{Result, SousError};
use sous_core::kitchen::{EncodedImage, IngredientSet, Recipe};

use crate::image_generation::ImageGenerationClient;
use crate::prompts;
use crate::structured_generation::StructuredGenerationClient;

/// A recipe with its optional photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandedRecipe {
    pub recipe: Recipe,
    pub image: Option<EncodedImage>,
}

#[derive(Clone)]
pub struct RecipeExpansionOrchestrator {
    recipes: StructuredGenerationClient,
    images: ImageGenerationClient,
}

impl RecipeExpansionOrchestrator {
    pub fn new(recipes: StructuredGenerationClient, images: ImageGenerationClient) -> Self {
        Self { recipes, images }
    }

    /// Expands `dish_title` into a recipe and, when possible, a photo.
    ///
    /// Both requests are in flight at the same time and the call returns once
    /// both have settled. Any image failure is logged and degrades to
    /// `image: None`.
    ///
    /// # Errors
    ///
    /// - `SousError::InvalidInput` if `dish_title` is blank
    /// - any recipe failure, regardless of the image outcome
    pub async fn expand(
        &self,
        dish_title: &str,
        ingredients: &IngredientSet,
    ) -> Result<ExpandedRecipe> {
        let dish_title = dish_title.trim();
        if dish_title.is_empty() {
            return Err(SousError::invalid_input("dish title must not be blank"));
        }

        let recipe_prompt = prompts::recipe_prompt(dish_title, ingredients)?;
        let photo_prompt = prompts::dish_photo_prompt(dish_title)?;

        let (recipe, image) = tokio::join!(
            self.recipes.generate::<Recipe>(&recipe_prompt),
            self.images.generate(&photo_prompt),
        );

        let recipe = recipe.inspect_err(|err| {
            tracing::error!("[recipe_expansion] recipe for '{}' failed: {}", dish_title, err);
        })?;

        let image = image.unwrap_or_else(|err| {
            tracing::warn!(
                "[recipe_expansion] photo for '{}' unavailable: {}",
                dish_title,
                err
            );
            None
        });

        tracing::info!(
            "[recipe_expansion] expanded '{}' (photo: {})",
            dish_title,
            image.is_some()
        );
        Ok(ExpandedRecipe { recipe, image })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockImageBackend, MockTextBackend, RECIPE_JSON};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Barrier;

    fn pantry() -> IngredientSet {
        ["egg", "flour"].into_iter().collect()
    }

    fn orchestrator(
        text: MockTextBackend,
        image: MockImageBackend,
    ) -> (Arc<MockTextBackend>, Arc<MockImageBackend>, RecipeExpansionOrchestrator) {
        let text = Arc::new(text);
        let image = Arc::new(image);
        let orchestrator = RecipeExpansionOrchestrator::new(
            StructuredGenerationClient::new(text.clone(), "text-model"),
            ImageGenerationClient::new(image.clone()),
        );
        (text, image, orchestrator)
    }

    #[tokio::test]
    async fn test_expand_returns_recipe_and_image() {
        let (text, image, expansion) = orchestrator(
            MockTextBackend::new(vec![Ok(RECIPE_JSON.to_string())]),
            MockImageBackend::new(Ok(Some("cGhvdG8=".to_string()))),
        );

        let expanded = expansion.expand("Spinach Omelette", &pantry()).await.unwrap();

        assert_eq!(expanded.recipe.title, "Spinach Omelette");
        assert_eq!(expanded.recipe.instructions.len(), 3);
        assert_eq!(
            expanded.image.unwrap().data_uri(),
            "data:image/png;base64,cGhvdG8="
        );
        assert!(text.calls()[0].prompt.contains(r#""Spinach Omelette""#));
        assert!(image.prompts()[0].0.contains("food photography shot of Spinach Omelette"));
    }

    #[tokio::test]
    async fn test_recipe_and_image_run_concurrently() {
        // Each backend blocks until the other has been called as well.
        let barrier = Arc::new(Barrier::new(2));
        let (_, _, expansion) = orchestrator(
            MockTextBackend::new(vec![Ok(RECIPE_JSON.to_string())]).with_barrier(barrier.clone()),
            MockImageBackend::new(Ok(Some("cGhvdG8=".to_string()))).with_barrier(barrier),
        );

        let expanded = tokio::time::timeout(
            Duration::from_secs(5),
            expansion.expand("Spinach Omelette", &pantry()),
        )
        .await
        .expect("recipe and image requests were not concurrent")
        .unwrap();

        assert!(expanded.image.is_some());
    }

    #[tokio::test]
    async fn test_image_failure_degrades_to_none() {
        let (_, image, expansion) = orchestrator(
            MockTextBackend::new(vec![Ok(RECIPE_JSON.to_string())]),
            MockImageBackend::new(Err(SousError::transport_status(503, "UNAVAILABLE"))),
        );

        let expanded = expansion.expand("Spinach Omelette", &pantry()).await.unwrap();

        assert_eq!(expanded.recipe.title, "Spinach Omelette");
        assert_eq!(expanded.image, None);
        assert_eq!(image.call_count(), 1);
    }

    #[tokio::test]
    async fn test_recipe_failure_is_fatal_even_with_image() {
        let (_, image, expansion) = orchestrator(
            MockTextBackend::new(vec![Err(SousError::transport("connection refused"))]),
            MockImageBackend::new(Ok(Some("cGhvdG8=".to_string()))),
        );

        let err = expansion.expand("Spinach Omelette", &pantry()).await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(image.call_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_recipe_is_fatal() {
        let (_, _, expansion) = orchestrator(
            MockTextBackend::new(vec![Ok(r#"{"title": "Omelette"}"#.to_string())]),
            MockImageBackend::new(Ok(None)),
        );

        let err = expansion.expand("Omelette", &pantry()).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_blank_title_is_rejected_before_any_call() {
        let (text, image, expansion) = orchestrator(
            MockTextBackend::new(vec![]),
            MockImageBackend::new(Ok(None)),
        );

        let err = expansion.expand("   ", &pantry()).await.unwrap_err();

        assert!(err.is_invalid_input());
        assert!(text.calls().is_empty());
        assert_eq!(image.call_count(), 0);
    }
}
