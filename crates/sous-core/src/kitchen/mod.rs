//! Kitchen domain module.
//!
//! - `ingredients`: the pantry (`IngredientSet`)
//! - `course`: course selector (`Course`)
//! - `dish`: discovery results (`DishSuggestion`, `Difficulty`)
//! - `recipe`: expansion results (`Recipe`)
//! - `image`: dish photo (`EncodedImage`)

mod course;
mod dish;
mod image;
mod ingredients;
mod recipe;

pub use course::Course;
pub use dish::{Difficulty, DishSuggestion, MATCH_SCORE_RANGE};
pub use image::{EncodedImage, PNG_DATA_URI_PREFIX};
pub use ingredients::IngredientSet;
pub use recipe::Recipe;
