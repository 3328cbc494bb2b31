//! Kitchen facade
//!
//! Holds the state a single user works with (pantry, course, current
//! suggestions, the selected dish and the chat) and drives the
//! orchestrators over it.

use std::sync::Arc;

use sous_core::backend::{ChatBackend, ImageGenerationBackend, TextGenerationBackend};
use sous_core::error::{Result, SousError};
use sous_core::kitchen::{Course, DishSuggestion, IngredientSet};

use crate::conversation::ConversationSession;
use crate::dish_discovery::DishDiscoveryOrchestrator;
use crate::image_generation::ImageGenerationClient;
use crate::recipe_expansion::{ExpandedRecipe, RecipeExpansionOrchestrator};
use crate::structured_generation::StructuredGenerationClient;

/// The selected dish with its expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub dish: DishSuggestion,
    pub expanded: ExpandedRecipe,
}

pub struct Kitchen {
    discovery: DishDiscoveryOrchestrator,
    expansion: RecipeExpansionOrchestrator,
    chat_backend: Arc<dyn ChatBackend>,
    ingredients: IngredientSet,
    course: Course,
    suggestions: Vec<DishSuggestion>,
    selection: Option<Selection>,
    chat: Option<Arc<ConversationSession>>,
}

impl Kitchen {
    pub fn new(
        discovery: DishDiscoveryOrchestrator,
        expansion: RecipeExpansionOrchestrator,
        chat_backend: Arc<dyn ChatBackend>,
    ) -> Self {
        Self {
            discovery,
            expansion,
            chat_backend,
            ingredients: IngredientSet::new(),
            course: Course::default(),
            suggestions: Vec::new(),
            selection: None,
            chat: None,
        }
    }

    /// Wires the orchestrators over raw backends; structured calls use
    /// `text_model`.
    pub fn from_backends(
        text: Arc<dyn TextGenerationBackend>,
        image: Arc<dyn ImageGenerationBackend>,
        chat: Arc<dyn ChatBackend>,
        text_model: &str,
    ) -> Self {
        let structured = StructuredGenerationClient::new(text, text_model);
        Self::new(
            DishDiscoveryOrchestrator::new(structured.clone()),
            RecipeExpansionOrchestrator::new(structured, ImageGenerationClient::new(image)),
            chat,
        )
    }

    pub fn ingredients(&self) -> &IngredientSet {
        &self.ingredients
    }

    pub fn add_ingredient(&mut self, ingredient: &str) -> bool {
        self.ingredients.add(ingredient)
    }

    pub fn remove_ingredient(&mut self, ingredient: &str) -> bool {
        self.ingredients.remove(ingredient)
    }

    pub fn course(&self) -> Course {
        self.course
    }

    pub fn set_course(&mut self, course: Course) {
        self.course = course;
    }

    pub fn suggestions(&self) -> &[DishSuggestion] {
        &self.suggestions
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Replaces the suggestion list with a fresh discovery.
    ///
    /// An empty pantry is rejected without touching the current list. Any
    /// other failure leaves the list empty.
    pub async fn find_dishes(&mut self) -> Result<&[DishSuggestion]> {
        if self.ingredients.is_empty() {
            return Err(SousError::invalid_input(
                "add at least one ingredient before searching for dishes",
            ));
        }

        self.suggestions.clear();
        self.suggestions = self.discovery.discover(&self.ingredients, self.course).await?;
        Ok(&self.suggestions)
    }

    /// Selects a suggestion by id and expands it into a recipe.
    ///
    /// The previous selection is discarded before expansion starts, so a
    /// failed expansion leaves nothing selected.
    pub async fn select_dish(&mut self, dish_id: &str) -> Result<&Selection> {
        let dish = self
            .suggestions
            .iter()
            .find(|dish| dish.id == dish_id)
            .cloned()
            .ok_or_else(|| SousError::invalid_input(format!("no suggestion with id `{dish_id}`")))?;

        self.selection = None;
        let expanded = self.expansion.expand(&dish.title, &self.ingredients).await?;
        Ok(&*self.selection.insert(Selection { dish, expanded }))
    }

    pub fn dismiss_selection(&mut self) {
        self.selection = None;
    }

    /// The chat session, created on first use and kept for the kitchen's
    /// lifetime.
    pub fn chat(&mut self) -> Arc<ConversationSession> {
        self.chat
            .get_or_insert_with(|| Arc::new(ConversationSession::new(self.chat_backend.as_ref())))
            .clone()
    }
}
