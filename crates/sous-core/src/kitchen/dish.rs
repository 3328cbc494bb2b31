//! Dish suggestion records returned by discovery.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};
use strum::Display;

use crate::error::{Result, SousError};
use crate::schema::StructuredOutput;

/// Lowest and highest accepted `matchScore`.
pub const MATCH_SCORE_RANGE: std::ops::RangeInclusive<u8> = 1..=100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A candidate dish for the current pantry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishSuggestion {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    /// Free-form preparation time ("20 mins").
    pub prep_time: String,
    /// How well the dish fits the given ingredients, 1-100.
    #[serde(deserialize_with = "whole_number")]
    pub match_score: u8,
}

/// Backends declare `matchScore` as NUMBER, so `85.0` is as likely as `85`.
/// Fractional values are rejected rather than rounded.
fn whole_number<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.fract() != 0.0 || !(0.0..=f64::from(u8::MAX)).contains(&value) {
        return Err(serde::de::Error::custom(format!(
            "matchScore must be a whole number between {} and {}, got {value}",
            MATCH_SCORE_RANGE.start(),
            MATCH_SCORE_RANGE.end()
        )));
    }
    Ok(value as u8)
}

impl DishSuggestion {
    fn check(&self, index: usize) -> Result<()> {
        if !MATCH_SCORE_RANGE.contains(&self.match_score) {
            return Err(SousError::validation(format!(
                "dish suggestion list: $[{index}].matchScore {} is outside {}..={}",
                self.match_score,
                MATCH_SCORE_RANGE.start(),
                MATCH_SCORE_RANGE.end()
            )));
        }
        if self.title.trim().is_empty() {
            return Err(SousError::validation(format!(
                "dish suggestion list: $[{index}].title is blank"
            )));
        }
        Ok(())
    }
}

impl StructuredOutput for Vec<DishSuggestion> {
    const NAME: &'static str = "dish suggestion list";

    fn response_schema() -> Value {
        json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "id": { "type": "STRING" },
                    "title": { "type": "STRING" },
                    "description": { "type": "STRING" },
                    "difficulty": { "type": "STRING", "enum": ["Easy", "Medium", "Hard"] },
                    "prepTime": { "type": "STRING" },
                    "matchScore": { "type": "NUMBER" }
                },
                "required": ["id", "title", "description", "difficulty", "prepTime", "matchScore"]
            }
        })
    }

    fn validate(&self) -> Result<()> {
        self.iter()
            .enumerate()
            .try_for_each(|(index, dish)| dish.check(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_structured;

    const OMELETTE: &str = r#"{
        "id": "d1",
        "title": "Spinach Omelette",
        "description": "Fluffy eggs folded over wilted spinach.",
        "difficulty": "Easy",
        "prepTime": "15 mins",
        "matchScore": 92
    }"#;

    #[test]
    fn test_parse_suggestions_keeps_order() {
        let raw = format!(
            "[{OMELETTE}, {}]",
            OMELETTE
                .replace("\"d1\"", "\"d2\"")
                .replace("Spinach Omelette", "Crepes")
                .replace("92", "71.0")
        );
        let dishes: Vec<DishSuggestion> = parse_structured(&raw).unwrap();
        assert_eq!(dishes.len(), 2);
        assert_eq!(dishes[0].title, "Spinach Omelette");
        assert_eq!(dishes[0].difficulty, Difficulty::Easy);
        assert_eq!(dishes[1].title, "Crepes");
        assert_eq!(dishes[1].match_score, 71);
    }

    #[test]
    fn test_missing_match_score_is_rejected() {
        let raw = format!("[{}]", OMELETTE.replace(",\n        \"matchScore\": 92", ""));
        let err = parse_structured::<Vec<DishSuggestion>>(&raw).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("missing required field `matchScore`"));
    }

    #[test]
    fn test_out_of_range_match_score_is_rejected() {
        for score in ["0", "101", "250"] {
            let raw = format!("[{}]", OMELETTE.replace("92", score));
            let err = parse_structured::<Vec<DishSuggestion>>(&raw).unwrap_err();
            assert!(err.is_validation(), "score {score} should be rejected");
        }
    }

    #[test]
    fn test_fractional_match_score_is_rejected() {
        let raw = format!("[{}]", OMELETTE.replace("92", "87.5"));
        assert!(parse_structured::<Vec<DishSuggestion>>(&raw).unwrap_err().is_validation());
    }

    #[test]
    fn test_unknown_difficulty_is_rejected() {
        let raw = format!("[{}]", OMELETTE.replace("\"Easy\"", "\"Trivial\""));
        let err = parse_structured::<Vec<DishSuggestion>>(&raw).unwrap_err();
        assert!(err.to_string().contains("difficulty"));
    }

    #[test]
    fn test_empty_list_is_valid() {
        let dishes: Vec<DishSuggestion> = parse_structured("[]").unwrap();
        assert!(dishes.is_empty());
    }
}
