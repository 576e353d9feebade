//! Handler for `GET /suggestions`.
//!
//! Evaluates the whole recipe catalog against the caller's available
//! inventory and returns recipes that are makeable or missing at most two
//! ingredients, makeable first.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use larder_core::{
  matching::InventoryIndex,
  store::PantryStore,
  suggest::{self, SuggestedRecipe},
};

use crate::{auth::CurrentUser, error::ApiError};

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
  /// Informational only — set when the caller has no available inventory.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message:           Option<String>,
  pub suggested_recipes: Vec<SuggestedRecipe>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub inventory_count:   Option<usize>,
}

/// `GET /suggestions`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  CurrentUser(user): CurrentUser,
) -> Result<Json<SuggestionsResponse>, ApiError>
where
  S: PantryStore,
{
  let inventory = store
    .list_inventory(user.user_id, true)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  // Empty pantry is a message, not an error.
  if inventory.is_empty() {
    return Ok(Json(SuggestionsResponse {
      message:           Some(
        "Your inventory is empty — add some ingredients to get suggestions"
          .to_owned(),
      ),
      suggested_recipes: Vec::new(),
      inventory_count:   None,
    }));
  }

  let inventory_count = inventory.len();
  let index = InventoryIndex::from_views(inventory);

  let recipes = store
    .list_recipes(None)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let suggested_recipes = suggest::suggest_recipes(recipes, &index);

  Ok(Json(SuggestionsResponse {
    message: None,
    suggested_recipes,
    inventory_count: Some(inventory_count),
  }))
}

#[cfg(test)]
mod tests {
  use super::*;
  use larder_core::{
    pantry::{NewInventoryItem, StorageLocation},
    recipe::{NewRecipe, NewRecipeLine},
    user::NewUser,
  };
  use larder_store_sqlite::SqliteStore;

  async fn setup() -> (Arc<SqliteStore>, larder_core::user::User) {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let user = store
      .create_user(NewUser {
        username:      "alice".to_owned(),
        password_hash: "$argon2id$stub".to_owned(),
        first_name:    None,
        last_name:     None,
        email:         "alice@example.com".to_owned(),
      })
      .await
      .unwrap();
    (store, user)
  }

  async fn add_recipe(store: &Arc<SqliteStore>, user_id: uuid::Uuid, title: &str, lines: Vec<(&str, &str)>) {
    store
      .add_recipe(NewRecipe {
        user_id,
        title: title.to_owned(),
        description: String::new(),
        instructions: String::new(),
        lines: lines
          .into_iter()
          .map(|(name, quantity)| NewRecipeLine {
            name:     name.to_owned(),
            quantity: quantity.to_owned(),
            unit:     "pieces".to_owned(),
          })
          .collect(),
      })
      .await
      .unwrap();
  }

  async fn stock(store: &Arc<SqliteStore>, user_id: uuid::Uuid, name: &str, quantity: f64) {
    let ingredient = store.get_or_create_ingredient(name).await.unwrap();
    store
      .add_inventory_item(NewInventoryItem {
        user_id,
        ingredient_id: ingredient.ingredient_id,
        quantity,
        quantity_text: quantity.to_string(),
        unit: "pieces".to_owned(),
        storage_location: StorageLocation::Pantry,
        expires_at: None,
      })
      .await
      .unwrap();
  }

  #[tokio::test]
  async fn empty_inventory_is_a_message_not_an_error() {
    let (store, user) = setup().await;
    add_recipe(&store, user.user_id, "Onion soup", vec![("onion", "2")]).await;

    let Json(res) = handler(State(store), CurrentUser(user)).await.unwrap();
    assert!(res.message.is_some());
    assert!(res.suggested_recipes.is_empty());
  }

  #[tokio::test]
  async fn makeable_recipes_come_first() {
    let (store, user) = setup().await;
    // Catalog order: the almost-makeable recipe is created first.
    add_recipe(&store, user.user_id, "Needs saffron", vec![("saffron", "1")]).await;
    add_recipe(&store, user.user_id, "Onion soup", vec![("onion", "2")]).await;
    stock(&store, user.user_id, "onion", 5.0).await;

    let Json(res) = handler(State(store), CurrentUser(user)).await.unwrap();
    assert_eq!(res.inventory_count, Some(1));
    assert_eq!(res.suggested_recipes.len(), 2);
    assert!(res.suggested_recipes[0].can_make);
    assert_eq!(res.suggested_recipes[0].recipe.recipe.title, "Onion soup");
    assert!(!res.suggested_recipes[1].can_make);
  }

  #[tokio::test]
  async fn insufficient_stock_reports_both_quantities() {
    let (store, user) = setup().await;
    add_recipe(&store, user.user_id, "Onion soup", vec![("onion", "2")]).await;
    stock(&store, user.user_id, "onion", 1.0).await;

    let Json(res) = handler(State(store), CurrentUser(user)).await.unwrap();
    assert_eq!(res.suggested_recipes.len(), 1);
    let missing = &res.suggested_recipes[0].missing_ingredients;
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].required_quantity, "2");
    assert_eq!(missing[0].available_quantity.as_deref(), Some("1"));
  }

  #[tokio::test]
  async fn hopeless_recipes_are_dropped() {
    let (store, user) = setup().await;
    add_recipe(
      &store,
      user.user_id,
      "Everything stew",
      vec![("carrot", "1"), ("potato", "2"), ("leek", "1")],
    )
    .await;
    stock(&store, user.user_id, "rice", 1.0).await;

    let Json(res) = handler(State(store), CurrentUser(user)).await.unwrap();
    assert!(res.suggested_recipes.is_empty());
  }
}
