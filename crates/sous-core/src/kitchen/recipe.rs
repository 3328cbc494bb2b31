//! Full recipe record produced by expansion.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{Result, SousError};
use crate::schema::StructuredOutput;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub title: String,
    /// Ingredient lines with measurements, in the order they are used.
    pub ingredients: Vec<String>,
    /// Step-by-step instructions.
    pub instructions: Vec<String>,
    pub tips: Vec<String>,
    pub nutritional_info: String,
}

impl StructuredOutput for Recipe {
    const NAME: &'static str = "recipe";

    fn response_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "ingredients": { "type": "ARRAY", "items": { "type": "STRING" } },
                "instructions": { "type": "ARRAY", "items": { "type": "STRING" } },
                "tips": { "type": "ARRAY", "items": { "type": "STRING" } },
                "nutritionalInfo": { "type": "STRING" }
            },
            "required": ["title", "ingredients", "instructions", "tips", "nutritionalInfo"]
        })
    }

    /// A recipe without ingredients or steps cannot be cooked; tips may be empty.
    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(SousError::validation("recipe: title is blank"));
        }
        if self.ingredients.is_empty() {
            return Err(SousError::validation("recipe: ingredient list is empty"));
        }
        if self.instructions.is_empty() {
            return Err(SousError::validation("recipe: instruction list is empty"));
        }
        Ok(())
    }
}
