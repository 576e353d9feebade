//! Pantry inventory items.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where an inventory item is kept. Part of the uniqueness key — the same
/// ingredient may sit in the fridge and the freezer as separate rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageLocation {
  Fridge,
  Freezer,
  Pantry,
}

/// One pantry row: a user's stock of one ingredient in one location.
///
/// `quantity` is the parsed numeric value; `quantity_text` retains the
/// string the user typed so it can be displayed back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
  pub item_id:          Uuid,
  pub user_id:          Uuid,
  pub ingredient_id:    Uuid,
  pub quantity:         f64,
  pub quantity_text:    String,
  pub unit:             String,
  pub storage_location: StorageLocation,
  /// `false` excludes the item from matching without deleting its history.
  pub is_available:     bool,
  pub added_at:         DateTime<Utc>,
  pub expires_at:       Option<NaiveDate>,
}

/// An inventory item joined with its ingredient's canonical name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemView {
  #[serde(flatten)]
  pub item:            InventoryItem,
  pub ingredient_name: String,
}

/// Input to [`crate::store::PantryStore::add_inventory_item`]. The
/// ingredient is resolved (get-or-create) by the caller beforehand;
/// `item_id` and `added_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewInventoryItem {
  pub user_id:          Uuid,
  pub ingredient_id:    Uuid,
  pub quantity:         f64,
  pub quantity_text:    String,
  pub unit:             String,
  pub storage_location: StorageLocation,
  pub expires_at:       Option<NaiveDate>,
}

/// Partial update for an inventory item. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct InventoryItemUpdate {
  pub quantity:         Option<(f64, String)>,
  pub unit:             Option<String>,
  pub storage_location: Option<StorageLocation>,
  pub is_available:     Option<bool>,
  /// `Some(None)` clears the expiry date.
  pub expires_at:       Option<Option<NaiveDate>>,
}
