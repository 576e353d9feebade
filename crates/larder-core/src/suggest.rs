//! Recipe suggestions driven by what a user has on hand.
//!
//! Every recipe in the catalog is evaluated against the caller's inventory
//! index; the pass is O(recipes × lines × inventory) with no caching —
//! catalogs are small and correctness wins over throughput here.

use serde::Serialize;

use crate::{
  feasibility::{self, MissingIngredient},
  matching::InventoryIndex,
  recipe::RecipeWithLines,
};

/// A recipe is retained as "almost makeable" when it is missing at most
/// this many lines.
pub const MAX_MISSING_FOR_SUGGESTION: usize = 2;

/// One entry of the suggestion response.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestedRecipe {
  pub recipe:              RecipeWithLines,
  pub can_make:            bool,
  pub missing_ingredients: Vec<MissingIngredient>,
}

/// Evaluate the whole catalog and keep recipes that are makeable or
/// missing at most [`MAX_MISSING_FOR_SUGGESTION`] lines, makeable first.
///
/// The sort is stable on `can_make` only — within each group recipes keep
/// their catalog order, with no secondary ordering by missing count.
pub fn suggest_recipes(
  recipes: Vec<RecipeWithLines>,
  index: &InventoryIndex,
) -> Vec<SuggestedRecipe> {
  let mut suggestions: Vec<SuggestedRecipe> = recipes
    .into_iter()
    .filter_map(|recipe| {
      let result = feasibility::evaluate(recipe.recipe.recipe_id, &recipe.lines, index);
      if result.can_make || result.missing.len() <= MAX_MISSING_FOR_SUGGESTION {
        Some(SuggestedRecipe {
          recipe,
          can_make: result.can_make,
          missing_ingredients: result.missing,
        })
      } else {
        None
      }
    })
    .collect();

  suggestions.sort_by_key(|s| !s.can_make);
  suggestions
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    matching::InventoryIndex,
    pantry::{InventoryItem, InventoryItemView, StorageLocation},
    recipe::{Recipe, RecipeLine, RecipeWithLines},
  };
  use chrono::Utc;
  use uuid::Uuid;

  fn recipe(title: &str, lines: Vec<(&str, &str, Uuid)>) -> RecipeWithLines {
    RecipeWithLines {
      recipe: Recipe {
        recipe_id:    Uuid::new_v4(),
        user_id:      Uuid::new_v4(),
        title:        title.to_owned(),
        description:  String::new(),
        instructions: String::new(),
        created_at:   Utc::now(),
      },
      lines: lines
        .into_iter()
        .map(|(name, quantity, ingredient_id)| RecipeLine {
          line_id: Uuid::new_v4(),
          ingredient_id,
          ingredient_name: name.to_owned(),
          quantity: quantity.to_owned(),
          unit: "pieces".to_owned(),
        })
        .collect(),
    }
  }

  fn stocked(name: &str, quantity: f64, ingredient_id: Uuid) -> InventoryItemView {
    InventoryItemView {
      item: InventoryItem {
        item_id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        ingredient_id,
        quantity,
        quantity_text: quantity.to_string(),
        unit: "pieces".to_owned(),
        storage_location: StorageLocation::Pantry,
        is_available: true,
        added_at: Utc::now(),
        expires_at: None,
      },
      ingredient_name: name.to_owned(),
    }
  }

  #[test]
  fn makeable_recipes_sort_first_regardless_of_catalog_order() {
    let onion = Uuid::new_v4();
    let index = InventoryIndex::from_views(vec![stocked("Onion", 5.0, onion)]);

    let catalog = vec![
      recipe("Needs saffron", vec![("Saffron", "1", Uuid::new_v4())]),
      recipe("Onion soup", vec![("Onion", "2", onion)]),
      recipe("Needs truffle", vec![("Truffle", "1", Uuid::new_v4())]),
    ];

    let suggestions = suggest_recipes(catalog, &index);
    assert_eq!(suggestions.len(), 3);
    assert!(suggestions[0].can_make);
    assert_eq!(suggestions[0].recipe.recipe.title, "Onion soup");
    // The two almost-makeable recipes keep their catalog order.
    assert_eq!(suggestions[1].recipe.recipe.title, "Needs saffron");
    assert_eq!(suggestions[2].recipe.recipe.title, "Needs truffle");
  }

  #[test]
  fn recipes_missing_more_than_two_lines_are_dropped() {
    let index = InventoryIndex::default();
    let catalog = vec![recipe(
      "Everything stew",
      vec![
        ("Carrot", "1", Uuid::new_v4()),
        ("Potato", "2", Uuid::new_v4()),
        ("Leek", "1", Uuid::new_v4()),
      ],
    )];

    assert!(suggest_recipes(catalog, &index).is_empty());
  }

  #[test]
  fn two_missing_lines_is_still_suggested() {
    let index = InventoryIndex::default();
    let catalog = vec![recipe(
      "Two short",
      vec![("Carrot", "1", Uuid::new_v4()), ("Potato", "2", Uuid::new_v4())],
    )];

    let suggestions = suggest_recipes(catalog, &index);
    assert_eq!(suggestions.len(), 1);
    assert!(!suggestions[0].can_make);
    assert_eq!(suggestions[0].missing_ingredients.len(), 2);
  }
}
