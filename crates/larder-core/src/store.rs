//! The `PantryStore` trait.
//!
//! Implemented by storage backends (e.g. `larder-store-sqlite`). Higher
//! layers (`larder-api`, `larder-server`) depend on this abstraction, not
//! on any concrete backend.
//!
//! Reads that can miss return `Option`/`bool` so handlers can map absence
//! to a not-found response without inspecting backend error types; backend
//! errors are reserved for infrastructure failures.

use std::future::Future;

use uuid::Uuid;

use crate::{
  ingredient::Ingredient,
  pantry::{InventoryItemUpdate, InventoryItemView, NewInventoryItem, StorageLocation},
  recipe::{NewRecipe, RecipeUpdate, RecipeWithLines, SavedRecipe},
  shopping::{NewShoppingListItem, ShoppingListItemUpdate, ShoppingListItemView},
  user::{NewUser, User},
};

/// Abstraction over a Larder storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (tokio with `axum`).
pub trait PantryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users & sessions ──────────────────────────────────────────────────

  /// Persist a new user. The username must not already be taken (callers
  /// pre-check; the store's unique constraint decides races).
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn get_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Record a login session keyed by the sha256 digest of the bearer
  /// token. The raw token is never stored.
  fn create_session(
    &self,
    user_id: Uuid,
    token_hash: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Resolve a token digest to its user. `None` means the token is not
  /// recognised.
  fn user_for_session<'a>(
    &'a self,
    token_hash: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  // ── Ingredients ───────────────────────────────────────────────────────

  /// Look up an ingredient by name case-insensitively, creating it
  /// (title-cased) if absent.
  fn get_or_create_ingredient<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Ingredient, Self::Error>> + Send + 'a;

  // ── Recipes ───────────────────────────────────────────────────────────

  /// Persist a recipe and its lines; line ingredients are get-or-created
  /// by name within the same transaction.
  fn add_recipe(
    &self,
    input: NewRecipe,
  ) -> impl Future<Output = Result<RecipeWithLines, Self::Error>> + Send + '_;

  fn get_recipe(
    &self,
    recipe_id: Uuid,
  ) -> impl Future<Output = Result<Option<RecipeWithLines>, Self::Error>> + Send + '_;

  /// List the catalog, optionally restricted to one author's recipes.
  fn list_recipes(
    &self,
    user_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<RecipeWithLines>, Self::Error>> + Send + '_;

  /// Apply a partial update. Returns `None` if the recipe does not exist.
  fn update_recipe(
    &self,
    recipe_id: Uuid,
    update: RecipeUpdate,
  ) -> impl Future<Output = Result<Option<RecipeWithLines>, Self::Error>> + Send + '_;

  /// Delete a recipe, its lines, and any bookmarks on it. Returns `false`
  /// if the recipe does not exist.
  fn delete_recipe(
    &self,
    recipe_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Saved recipes ─────────────────────────────────────────────────────

  fn save_recipe(
    &self,
    user_id: Uuid,
    recipe_id: Uuid,
  ) -> impl Future<Output = Result<SavedRecipe, Self::Error>> + Send + '_;

  /// Returns `false` if no bookmark existed.
  fn unsave_recipe(
    &self,
    user_id: Uuid,
    recipe_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn is_recipe_saved(
    &self,
    user_id: Uuid,
    recipe_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn list_saved_recipes(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<RecipeWithLines>, Self::Error>> + Send + '_;

  // ── Inventory ─────────────────────────────────────────────────────────

  /// All of a user's inventory, most recently added first. With
  /// `only_available`, rows flagged unavailable are excluded — this is the
  /// shape the matching index is built from.
  fn list_inventory(
    &self,
    user_id: Uuid,
    only_available: bool,
  ) -> impl Future<Output = Result<Vec<InventoryItemView>, Self::Error>> + Send + '_;

  /// Find the row for one (ingredient, location) pair, if present. Used to
  /// reject duplicates before insert.
  fn find_inventory_item(
    &self,
    user_id: Uuid,
    ingredient_id: Uuid,
    location: StorageLocation,
  ) -> impl Future<Output = Result<Option<InventoryItemView>, Self::Error>> + Send + '_;

  fn add_inventory_item(
    &self,
    input: NewInventoryItem,
  ) -> impl Future<Output = Result<InventoryItemView, Self::Error>> + Send + '_;

  /// Apply a partial update to a row owned by `user_id`. Returns `None`
  /// if no such row exists for that user.
  fn update_inventory_item(
    &self,
    user_id: Uuid,
    item_id: Uuid,
    update: InventoryItemUpdate,
  ) -> impl Future<Output = Result<Option<InventoryItemView>, Self::Error>> + Send + '_;

  /// Returns `false` if no row owned by `user_id` matched.
  fn delete_inventory_item(
    &self,
    user_id: Uuid,
    item_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Shopping list ─────────────────────────────────────────────────────

  fn list_shopping_list(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ShoppingListItemView>, Self::Error>> + Send + '_;

  /// Ingredient ids with at least one unpurchased entry — the
  /// reconciler's duplicate pre-check.
  fn unpurchased_ingredient_ids(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;

  fn add_shopping_list_item(
    &self,
    input: NewShoppingListItem,
  ) -> impl Future<Output = Result<ShoppingListItemView, Self::Error>> + Send + '_;

  /// Insert a batch of items in a single transaction — all rows commit or
  /// none do. Used by auto-fill.
  fn add_shopping_list_items(
    &self,
    inputs: Vec<NewShoppingListItem>,
  ) -> impl Future<Output = Result<Vec<ShoppingListItemView>, Self::Error>> + Send + '_;

  fn update_shopping_list_item(
    &self,
    user_id: Uuid,
    item_id: Uuid,
    update: ShoppingListItemUpdate,
  ) -> impl Future<Output = Result<Option<ShoppingListItemView>, Self::Error>> + Send + '_;

  /// Returns `false` if no row owned by `user_id` matched.
  fn delete_shopping_list_item(
    &self,
    user_id: Uuid,
    item_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
