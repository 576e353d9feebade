//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, dates as ISO 8601 dates,
//! UUIDs as hyphenated lowercase strings, and enums as their lowercase
//! wire names.

use chrono::{DateTime, NaiveDate, Utc};
use larder_core::{
  ingredient::Ingredient,
  pantry::{InventoryItem, InventoryItemView, StorageLocation},
  recipe::{Recipe, RecipeLine},
  shopping::{ShoppingListItem, ShoppingListItemView},
  user::User,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Timestamps ──────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  s.parse().map_err(|_| Error::DateParse(s.to_owned()))
}

// ─── StorageLocation ─────────────────────────────────────────────────────────

pub fn encode_location(l: StorageLocation) -> &'static str {
  match l {
    StorageLocation::Fridge => "fridge",
    StorageLocation::Freezer => "freezer",
    StorageLocation::Pantry => "pantry",
  }
}

pub fn decode_location(s: &str) -> Result<StorageLocation> {
  match s {
    "fridge" => Ok(StorageLocation::Fridge),
    "freezer" => Ok(StorageLocation::Freezer),
    "pantry" => Ok(StorageLocation::Pantry),
    other => Err(Error::UnknownStorageLocation(other.to_owned())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub username:      String,
  pub password_hash: String,
  pub first_name:    Option<String>,
  pub last_name:     Option<String>,
  pub email:         String,
  pub created_at:    String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      username:      self.username,
      password_hash: self.password_hash,
      first_name:    self.first_name,
      last_name:     self.last_name,
      email:         self.email,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from an `ingredients` row.
pub struct RawIngredient {
  pub ingredient_id: String,
  pub name:          String,
  pub food_group:    Option<String>,
  pub created_at:    String,
}

impl RawIngredient {
  pub fn into_ingredient(self) -> Result<Ingredient> {
    Ok(Ingredient {
      ingredient_id: decode_uuid(&self.ingredient_id)?,
      name:          self.name,
      food_group:    self.food_group,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `recipes` row.
pub struct RawRecipe {
  pub recipe_id:    String,
  pub user_id:      String,
  pub title:        String,
  pub description:  String,
  pub instructions: String,
  pub created_at:   String,
}

impl RawRecipe {
  pub fn into_recipe(self) -> Result<Recipe> {
    Ok(Recipe {
      recipe_id:    decode_uuid(&self.recipe_id)?,
      user_id:      decode_uuid(&self.user_id)?,
      title:        self.title,
      description:  self.description,
      instructions: self.instructions,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// A `recipe_lines` row joined with the ingredient's canonical name.
pub struct RawRecipeLine {
  pub line_id:         String,
  pub ingredient_id:   String,
  pub ingredient_name: String,
  pub quantity:        String,
  pub unit:            String,
}

impl RawRecipeLine {
  pub fn into_line(self) -> Result<RecipeLine> {
    Ok(RecipeLine {
      line_id:         decode_uuid(&self.line_id)?,
      ingredient_id:   decode_uuid(&self.ingredient_id)?,
      ingredient_name: self.ingredient_name,
      quantity:        self.quantity,
      unit:            self.unit,
    })
  }
}

/// An `inventory_items` row joined with the ingredient's canonical name.
pub struct RawInventoryItem {
  pub item_id:          String,
  pub user_id:          String,
  pub ingredient_id:    String,
  pub ingredient_name:  String,
  pub quantity:         f64,
  pub quantity_text:    String,
  pub unit:             String,
  pub storage_location: String,
  pub is_available:     bool,
  pub added_at:         String,
  pub expires_at:       Option<String>,
}

impl RawInventoryItem {
  pub fn into_view(self) -> Result<InventoryItemView> {
    Ok(InventoryItemView {
      item: InventoryItem {
        item_id:          decode_uuid(&self.item_id)?,
        user_id:          decode_uuid(&self.user_id)?,
        ingredient_id:    decode_uuid(&self.ingredient_id)?,
        quantity:         self.quantity,
        quantity_text:    self.quantity_text,
        unit:             self.unit,
        storage_location: decode_location(&self.storage_location)?,
        is_available:     self.is_available,
        added_at:         decode_dt(&self.added_at)?,
        expires_at:       self.expires_at.as_deref().map(decode_date).transpose()?,
      },
      ingredient_name: self.ingredient_name,
    })
  }
}

/// A `shopping_list_items` row joined with the ingredient's canonical name.
pub struct RawShoppingListItem {
  pub item_id:         String,
  pub user_id:         String,
  pub ingredient_id:   String,
  pub ingredient_name: String,
  pub quantity:        f64,
  pub unit:            String,
  pub is_purchased:    bool,
  pub added_at:        String,
}

impl RawShoppingListItem {
  pub fn into_view(self) -> Result<ShoppingListItemView> {
    Ok(ShoppingListItemView {
      item: ShoppingListItem {
        item_id:       decode_uuid(&self.item_id)?,
        user_id:       decode_uuid(&self.user_id)?,
        ingredient_id: decode_uuid(&self.ingredient_id)?,
        quantity:      self.quantity,
        unit:          self.unit,
        is_purchased:  self.is_purchased,
        added_at:      decode_dt(&self.added_at)?,
      },
      ingredient_name: self.ingredient_name,
    })
  }
}
