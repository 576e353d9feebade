//! Recipes and their ingredient lines.
//!
//! A line's quantity is stored as the *text* the author typed ("1 1/2"),
//! not a number. Parsing happens at evaluation time via
//! [`crate::quantity::Quantity::parse`]; lines whose text does not parse are
//! skipped during scans rather than failing the whole recipe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recipe's own fields, without its ingredient lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
  pub recipe_id:    Uuid,
  /// The author. Mutation is restricted to this user.
  pub user_id:      Uuid,
  pub title:        String,
  pub description:  String,
  pub instructions: String,
  pub created_at:   DateTime<Utc>,
}

/// One ingredient line, joined with the ingredient's canonical name for
/// display and matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeLine {
  pub line_id:         Uuid,
  pub ingredient_id:   Uuid,
  pub ingredient_name: String,
  /// Free-form quantity text; see the module docs.
  pub quantity:        String,
  pub unit:            String,
}

/// A recipe with its lines — the shape every read path returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeWithLines {
  #[serde(flatten)]
  pub recipe: Recipe,
  pub lines:  Vec<RecipeLine>,
}

/// Input to [`crate::store::PantryStore::add_recipe`]. Ingredients are
/// referenced by name and get-or-created by the store.
#[derive(Debug, Clone)]
pub struct NewRecipe {
  pub user_id:      Uuid,
  pub title:        String,
  pub description:  String,
  pub instructions: String,
  pub lines:        Vec<NewRecipeLine>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRecipeLine {
  pub name:     String,
  pub quantity: String,
  pub unit:     String,
}

/// Partial update for [`crate::store::PantryStore::update_recipe`].
/// `None` fields are left untouched; `lines: Some(..)` replaces the whole
/// line set.
#[derive(Debug, Clone, Default)]
pub struct RecipeUpdate {
  pub title:        Option<String>,
  pub description:  Option<String>,
  pub instructions: Option<String>,
  pub lines:        Option<Vec<NewRecipeLine>>,
}

/// A user's bookmark on a recipe. The shopping-list reconciler operates
/// only on recipes present in this set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedRecipe {
  pub user_id:   Uuid,
  pub recipe_id: Uuid,
  pub saved_at:  DateTime<Utc>,
}
