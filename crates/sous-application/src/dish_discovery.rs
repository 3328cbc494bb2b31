//! Dish discovery: pantry plus course in, ranked dish suggestions out.

use sous_core::error::{Result, SousError};
use sous_core::kitchen::{Course, DishSuggestion, IngredientSet};

use crate::prompts;
use crate::structured_generation::StructuredGenerationClient;

/// Number of dishes requested per discovery.
pub const SUGGESTION_COUNT: usize = 4;

#[derive(Clone)]
pub struct DishDiscoveryOrchestrator {
    client: StructuredGenerationClient,
    count: usize,
}

impl DishDiscoveryOrchestrator {
    pub fn new(client: StructuredGenerationClient) -> Self {
        Self {
            client,
            count: SUGGESTION_COUNT,
        }
    }

    /// Asks for suggestions that use `ingredients` for `course`.
    ///
    /// The backend is asked for [`SUGGESTION_COUNT`] dishes but the result is
    /// returned as generated, in backend order; a shorter or longer list is
    /// not an error.
    ///
    /// # Errors
    ///
    /// - `SousError::InvalidInput` if `ingredients` is empty (no backend call)
    /// - `SousError::Transport` / `SousError::Validation` from the backend
    pub async fn discover(
        &self,
        ingredients: &IngredientSet,
        course: Course,
    ) -> Result<Vec<DishSuggestion>> {
        if ingredients.is_empty() {
            return Err(SousError::invalid_input(
                "add at least one ingredient before searching for dishes",
            ));
        }

        let prompt = prompts::dish_suggestions_prompt(ingredients, course, self.count)?;
        let dishes: Vec<DishSuggestion> = self.client.generate(&prompt).await?;

        tracing::info!(
            "[dish_discovery] {} suggestions for {} ({} ingredients)",
            dishes.len(),
            course,
            ingredients.len()
        );
        Ok(dishes)
    }
}
