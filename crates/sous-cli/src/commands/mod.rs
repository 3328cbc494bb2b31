pub mod chat;
pub mod recipe;
pub mod suggest;

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use sous_application::{ExpandedRecipe, Kitchen};
use sous_core::config::{GeminiConfig, load_secret_config};
use sous_interaction::GeminiBackends;

/// Loads the Gemini configuration from `~/.config/sous/secret.json` and the
/// environment.
pub fn gemini_config() -> Result<GeminiConfig> {
    let secrets = load_secret_config()?;
    Ok(secrets.require_gemini()?.clone())
}

pub fn kitchen(config: &GeminiConfig) -> Kitchen {
    let backends = GeminiBackends::new(config);
    Kitchen::from_backends(
        backends.text,
        backends.image,
        backends.chat,
        config.text_model(),
    )
}

pub fn print_recipe(expanded: &ExpandedRecipe, image_out: Option<&Path>) -> Result<()> {
    let recipe = &expanded.recipe;

    println!("{}", recipe.title.bold());
    println!();
    println!("{}", "Ingredients".underline());
    for ingredient in &recipe.ingredients {
        println!("  - {ingredient}");
    }
    println!();
    println!("{}", "Instructions".underline());
    for (step, instruction) in recipe.instructions.iter().enumerate() {
        println!("  {}. {instruction}", step + 1);
    }
    if !recipe.tips.is_empty() {
        println!();
        println!("{}", "Chef's tips".underline());
        for tip in &recipe.tips {
            println!("  * {tip}");
        }
    }
    println!();
    println!("{} {}", "Nutrition:".dimmed(), recipe.nutritional_info);

    match (&expanded.image, image_out) {
        (Some(image), Some(path)) => {
            std::fs::write(path, image.decode()?)
                .with_context(|| format!("Failed to write photo to {}", path.display()))?;
            println!("{} {}", "Photo saved to".green(), path.display());
        }
        (None, Some(_)) => println!("{}", "No photo was generated for this dish.".yellow()),
        _ => {}
    }

    Ok(())
}
