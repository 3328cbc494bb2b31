use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use sous_core::kitchen::Course;

pub async fn run(
    course: Course,
    ingredients: &[String],
    expand: Option<&str>,
    image_out: Option<PathBuf>,
) -> Result<()> {
    let config = super::gemini_config()?;
    let mut kitchen = super::kitchen(&config);
    for ingredient in ingredients {
        kitchen.add_ingredient(ingredient);
    }
    kitchen.set_course(course);

    println!(
        "{}",
        format!("Finding {} ideas for {}...", course, kitchen.ingredients().joined()).cyan()
    );
    let dishes = kitchen.find_dishes().await?;
    if dishes.is_empty() {
        println!("{}", "No dishes came back. Try adding an ingredient or two.".yellow());
        return Ok(());
    }

    for dish in dishes {
        println!(
            "[{}] {} {}",
            dish.id,
            dish.title.bold(),
            format!("({}, {}, match {}%)", dish.difficulty, dish.prep_time, dish.match_score).dimmed()
        );
        println!("    {}", dish.description);
    }

    if let Some(dish_id) = expand {
        println!();
        let selection = kitchen.select_dish(dish_id).await?;
        super::print_recipe(&selection.expanded, image_out.as_deref())?;
    }

    Ok(())
}
