//! Prompt templates for every generation call.

use minijinja::{Environment, UndefinedBehavior, Value, context};
use sous_core::error::{Result, SousError};
use sous_core::kitchen::{Course, IngredientSet};

const DISH_SUGGESTIONS_TEMPLATE: &str = r#"Based on these ingredients: {{ ingredients }}, suggest {{ count }} creative {{ course }} dishes.
Only suggest dishes where these ingredients are central or easy to supplement with common pantry staples."#;

const RECIPE_TEMPLATE: &str = r#"Create a detailed recipe for "{{ dish_title }}" using these primary ingredients: {{ ingredients }}.
Include specific measurements, step-by-step instructions, chef's tips, and basic nutritional info."#;

const DISH_PHOTO_TEMPLATE: &str = "A high-end, professional food photography shot of {{ dish_title }}. \
Beautiful plating, warm lighting, rustic kitchen background.";

fn render(template: &str, ctx: Value) -> Result<String> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.render_str(template, ctx)
        .map_err(|err| SousError::Serialization {
            format: "template".to_string(),
            message: err.to_string(),
        })
}

pub fn dish_suggestions_prompt(
    ingredients: &IngredientSet,
    course: Course,
    count: usize,
) -> Result<String> {
    render(
        DISH_SUGGESTIONS_TEMPLATE,
        context! {
            ingredients => ingredients.joined(),
            course => course.to_string(),
            count => count,
        },
    )
}

pub fn recipe_prompt(dish_title: &str, ingredients: &IngredientSet) -> Result<String> {
    render(
        RECIPE_TEMPLATE,
        context! {
            dish_title => dish_title,
            ingredients => ingredients.joined(),
        },
    )
}

pub fn dish_photo_prompt(dish_title: &str) -> Result<String> {
    render(DISH_PHOTO_TEMPLATE, context! { dish_title => dish_title })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dish_suggestions_prompt() {
        let ingredients: IngredientSet = ["egg", "flour"].into_iter().collect();
        let prompt = dish_suggestions_prompt(&ingredients, Course::MainCourse, 4).unwrap();

        assert!(prompt.starts_with(
            "Based on these ingredients: egg, flour, suggest 4 creative Main Course dishes."
        ));
        assert!(prompt.contains("central or easy to supplement with common pantry staples"));
    }

    #[test]
    fn test_recipe_prompt_quotes_title() {
        let ingredients: IngredientSet = ["egg"].into_iter().collect();
        let prompt = recipe_prompt("Spinach Omelette", &ingredients).unwrap();

        assert!(prompt.contains(r#"recipe for "Spinach Omelette" using these primary ingredients: egg."#));
        assert!(prompt.contains("basic nutritional info"));
    }

    #[test]
    fn test_photo_prompt_is_not_html_escaped() {
        let prompt = dish_photo_prompt("Mac & Cheese").unwrap();
        assert_eq!(
            prompt,
            "A high-end, professional food photography shot of Mac & Cheese. \
             Beautiful plating, warm lighting, rustic kitchen background."
        );
    }
}
