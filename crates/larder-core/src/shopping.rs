//! Shopping-list items.
//!
//! Rows are created either by an explicit add or by the auto-fill
//! reconciler ([`crate::reconcile`]). The reconciler never creates a second
//! unpurchased row for an ingredient that already has one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingListItem {
  pub item_id:       Uuid,
  pub user_id:       Uuid,
  pub ingredient_id: Uuid,
  pub quantity:      f64,
  pub unit:          String,
  pub is_purchased:  bool,
  pub added_at:      DateTime<Utc>,
}

/// A shopping-list item joined with its ingredient's canonical name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingListItemView {
  #[serde(flatten)]
  pub item:            ShoppingListItem,
  pub ingredient_name: String,
}

/// Input to [`crate::store::PantryStore::add_shopping_list_item`] and the
/// batch insert used by auto-fill. `item_id` and `added_at` are assigned by
/// the store; new rows are always unpurchased.
#[derive(Debug, Clone)]
pub struct NewShoppingListItem {
  pub user_id:       Uuid,
  pub ingredient_id: Uuid,
  pub quantity:      f64,
  pub unit:          String,
}

/// Partial update for a shopping-list item. `None` fields are left
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct ShoppingListItemUpdate {
  pub quantity:     Option<f64>,
  pub unit:         Option<String>,
  pub is_purchased: Option<bool>,
}
