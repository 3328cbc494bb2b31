//! Course selector.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The kind of dish the user wants to make.
///
/// `Display` yields the label used in prompts ("Main Course"); `FromStr`
/// additionally accepts the short lowercase forms used on the command line.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Course {
    #[strum(to_string = "Snack")]
    Snack,
    #[strum(to_string = "Starter")]
    Starter,
    #[default]
    #[serde(rename = "Main Course")]
    #[strum(to_string = "Main Course", serialize = "main", serialize = "main-course")]
    MainCourse,
    #[strum(to_string = "Dessert")]
    Dessert,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_labels() {
        let labels: Vec<String> = Course::iter().map(|c| c.to_string()).collect();
        assert_eq!(labels, vec!["Snack", "Starter", "Main Course", "Dessert"]);
    }

    #[test]
    fn test_parse_accepts_short_forms() {
        assert_eq!(Course::from_str("main").unwrap(), Course::MainCourse);
        assert_eq!(Course::from_str("Main Course").unwrap(), Course::MainCourse);
        assert_eq!(Course::from_str("dessert").unwrap(), Course::Dessert);
        assert!(Course::from_str("brunch").is_err());
    }

    #[test]
    fn test_default_is_main_course() {
        assert_eq!(Course::default(), Course::MainCourse);
        assert_eq!(
            serde_json::to_string(&Course::MainCourse).unwrap(),
            "\"Main Course\""
        );
    }
}
