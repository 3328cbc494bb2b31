use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use sous_application::{ImageGenerationClient, RecipeExpansionOrchestrator, StructuredGenerationClient};
use sous_core::kitchen::IngredientSet;
use sous_interaction::GeminiBackends;

pub async fn run(title: &str, ingredients: &[String], image_out: Option<PathBuf>) -> Result<()> {
    let config = super::gemini_config()?;
    let backends = GeminiBackends::new(&config);
    let expansion = RecipeExpansionOrchestrator::new(
        StructuredGenerationClient::new(backends.text, config.text_model()),
        ImageGenerationClient::new(backends.image),
    );

    let ingredients: IngredientSet = ingredients.iter().collect();
    println!("{}", format!("Writing a recipe for {title}...").cyan());
    let expanded = expansion.expand(title, &ingredients).await?;

    super::print_recipe(&expanded, image_out.as_deref())
}
