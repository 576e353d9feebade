//! Ingredients — the canonical vocabulary every other table references.
//!
//! Ingredient rows are created lazily the first time a name is used
//! (case-insensitive get-or-create, stored title-cased) and accumulate;
//! nothing in the system ever deletes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A canonical ingredient. `name` is unique case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
  pub ingredient_id: Uuid,
  pub name:          String,
  /// Optional grouping, e.g. "produce" or "dairy".
  pub food_group:    Option<String>,
  pub created_at:    DateTime<Utc>,
}

/// Title-case an ingredient name for storage: first letter of each
/// whitespace-separated word uppercased, the rest lowercased.
pub fn title_case(name: &str) -> String {
  name
    .split_whitespace()
    .map(|word| {
      let mut chars = word.chars();
      match chars.next() {
        Some(first) => {
          first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
        }
        None => String::new(),
      }
    })
    .collect::<Vec<_>>()
    .join(" ")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn title_cases_each_word() {
    assert_eq!(title_case("chicken breast"), "Chicken Breast");
    assert_eq!(title_case("OLIVE OIL"), "Olive Oil");
    assert_eq!(title_case("  egg  "), "Egg");
  }
}
