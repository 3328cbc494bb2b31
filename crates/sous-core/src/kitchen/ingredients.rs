//! Pantry ingredient set.

use serde::{Deserialize, Serialize};

/// The ingredients a user currently has on hand.
///
/// Entries are unique and trimmed. Set semantics ignore order, but insertion
/// order is kept so the pantry renders the way the user typed it. The set is
/// only ever changed through [`IngredientSet::add`] and
/// [`IngredientSet::remove`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientSet {
    items: Vec<String>,
}

impl IngredientSet {
    /// Creates an empty ingredient set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an ingredient.
    ///
    /// Returns `false` when the trimmed text is blank or already present.
    pub fn add(&mut self, ingredient: impl AsRef<str>) -> bool {
        let ingredient = ingredient.as_ref().trim();
        if ingredient.is_empty() || self.contains(ingredient) {
            return false;
        }
        self.items.push(ingredient.to_string());
        true
    }

    /// Removes an ingredient, returning whether it was present.
    pub fn remove(&mut self, ingredient: &str) -> bool {
        let ingredient = ingredient.trim();
        let before = self.items.len();
        self.items.retain(|item| item != ingredient);
        self.items.len() != before
    }

    pub fn contains(&self, ingredient: &str) -> bool {
        self.items.iter().any(|item| item == ingredient.trim())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    /// Comma separated list used when building prompts.
    pub fn joined(&self) -> String {
        self.items.join(", ")
    }
}

impl<S: AsRef<str>> FromIterator<S> for IngredientSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for ingredient in iter {
            set.add(ingredient);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_trims_and_deduplicates() {
        let mut set = IngredientSet::new();
        assert!(set.add(" egg "));
        assert!(!set.add("egg"));
        assert!(!set.add("   "));
        assert!(set.add("flour"));

        assert_eq!(set.len(), 2);
        assert_eq!(set.joined(), "egg, flour");
    }

    #[test]
    fn test_remove() {
        let mut set: IngredientSet = ["egg", "flour", "spinach"].into_iter().collect();
        assert!(set.remove("flour"));
        assert!(!set.remove("flour"));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["egg", "spinach"]);
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let set: IngredientSet = ["egg", "egg", "milk"].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["egg","milk"]"#);
    }
}
