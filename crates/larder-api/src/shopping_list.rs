//! Handlers for `/shopping-list` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/shopping-list` | The caller's list, newest first |
//! | `POST`   | `/shopping-list` | Body: [`NewShoppingBody`] |
//! | `PUT`    | `/shopping-list/:id` | Quantity / unit / purchased flag |
//! | `DELETE` | `/shopping-list/:id` | 204 |
//! | `POST`   | `/shopping-list/auto-fill/:recipe_id` | Append a saved recipe's shortfall |

use std::{collections::HashSet, sync::Arc};

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use larder_core::{
  matching::InventoryIndex,
  quantity::Quantity,
  reconcile,
  shopping::{NewShoppingListItem, ShoppingListItemUpdate, ShoppingListItemView},
  store::PantryStore,
};

use crate::{auth::CurrentUser, error::ApiError};

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /shopping-list`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ShoppingListItemView>>, ApiError>
where
  S: PantryStore,
{
  let items = store
    .list_shopping_list(user.user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(items))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NewShoppingBody {
  /// Ingredient name; get-or-created case-insensitively.
  pub name:     String,
  pub quantity: String,
  pub unit:     String,
}

/// `POST /shopping-list` — returns 201 + the stored item.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  CurrentUser(user): CurrentUser,
  Json(body): Json<NewShoppingBody>,
) -> Result<(StatusCode, Json<ShoppingListItemView>), ApiError>
where
  S: PantryStore,
{
  if body.name.trim().is_empty() {
    return Err(ApiError::validation("name", "may not be blank"));
  }
  if body.unit.trim().is_empty() {
    return Err(ApiError::validation("unit", "may not be blank"));
  }
  let quantity = Quantity::parse(&body.quantity).map_err(|_| {
    ApiError::validation(
      "quantity",
      format!(
        "{:?} is not a quantity like \"2\", \"1/2\", or \"1 1/2\"",
        body.quantity
      ),
    )
  })?;

  let ingredient = store
    .get_or_create_ingredient(&body.name)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let view = store
    .add_shopping_list_item(NewShoppingListItem {
      user_id:       user.user_id,
      ingredient_id: ingredient.ingredient_id,
      quantity:      quantity.value(),
      unit:          body.unit.trim().to_owned(),
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok((StatusCode::CREATED, Json(view)))
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateShoppingBody {
  pub quantity:     Option<String>,
  pub unit:         Option<String>,
  pub is_purchased: Option<bool>,
}

/// `PUT /shopping-list/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateShoppingBody>,
) -> Result<Json<ShoppingListItemView>, ApiError>
where
  S: PantryStore,
{
  let quantity = body
    .quantity
    .as_deref()
    .map(|text| {
      Quantity::parse(text).map(|q| q.value()).map_err(|_| {
        ApiError::validation(
          "quantity",
          format!("{text:?} is not a quantity like \"2\", \"1/2\", or \"1 1/2\""),
        )
      })
    })
    .transpose()?;

  let updated = store
    .update_shopping_list_item(user.user_id, id, ShoppingListItemUpdate {
      quantity,
      unit: body.unit,
      is_purchased: body.is_purchased,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("shopping-list item {id} not found")))?;

  Ok(Json(updated))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /shopping-list/:id`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: PantryStore,
{
  let removed = store
    .delete_shopping_list_item(user.user_id, id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  if !removed {
    return Err(ApiError::NotFound(format!("shopping-list item {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}

// ─── Auto-fill ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AutoFillResponse {
  pub message: String,
  pub items:   Vec<ShoppingListItemView>,
}

/// `POST /shopping-list/auto-fill/:recipe_id`
///
/// Appends the saved recipe's ingredients that are not covered by the
/// caller's available inventory, skipping ingredients that already have an
/// unpurchased entry. The whole batch commits in one transaction; a
/// validation failure on any planned line aborts the call with nothing
/// written.
pub async fn auto_fill<S>(
  State(store): State<Arc<S>>,
  CurrentUser(user): CurrentUser,
  Path(recipe_id): Path<Uuid>,
) -> Result<(StatusCode, Json<AutoFillResponse>), ApiError>
where
  S: PantryStore,
{
  if !store
    .is_recipe_saved(user.user_id, recipe_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
  {
    return Err(ApiError::NotFound(format!(
      "recipe {recipe_id} is not in your saved recipes"
    )));
  }

  let recipe = store
    .get_recipe(recipe_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("recipe {recipe_id} not found")))?;

  let inventory = store
    .list_inventory(user.user_id, true)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let index = InventoryIndex::from_views(inventory);

  let pending: HashSet<Uuid> = store
    .unpurchased_ingredient_ids(user.user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .into_iter()
    .collect();

  let additions =
    reconcile::plan_additions(user.user_id, recipe_id, &recipe.lines, &index, &pending)
      .map_err(|e| ApiError::Validation {
        field:   e.field.to_owned(),
        message: format!("{}: {}", e.ingredient_name, e.message),
      })?;

  if additions.is_empty() {
    return Ok((
      StatusCode::OK,
      Json(AutoFillResponse {
        message: "Your shopping list already covers this recipe".to_owned(),
        items:   Vec::new(),
      }),
    ));
  }

  let items = store
    .add_shopping_list_items(additions)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  tracing::info!(
    user = %user.username,
    %recipe_id,
    count = items.len(),
    "auto-filled shopping list from recipe"
  );

  Ok((
    StatusCode::CREATED,
    Json(AutoFillResponse {
      message: format!("Added {} missing ingredient(s) to your shopping list", items.len()),
      items,
    }),
  ))
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

  fn line(name: &str, quantity: &str, unit: &str) -> NewRecipeLine {
    NewRecipeLine {
      name:     name.to_owned(),
      quantity: quantity.to_owned(),
      unit:     unit.to_owned(),
    }
  }

  async fn saved_recipe(
    store: &Arc<SqliteStore>,
    user_id: Uuid,
    lines: Vec<NewRecipeLine>,
  ) -> Uuid {
    let recipe = store
      .add_recipe(NewRecipe {
        user_id,
        title: "Test dish".to_owned(),
        description: String::new(),
        instructions: String::new(),
        lines,
      })
      .await
      .unwrap();
    store
      .save_recipe(user_id, recipe.recipe.recipe_id)
      .await
      .unwrap();
    recipe.recipe.recipe_id
  }

  #[tokio::test]
  async fn auto_fill_adds_missing_ingredients() {
    let (store, user) = setup().await;
    let recipe_id = saved_recipe(
      &store,
      user.user_id,
      vec![line("onion", "2", "pieces"), line("saffron", "1", "pinch")],
    )
    .await;

    // Pantry covers the onion only.
    let onion = store.get_or_create_ingredient("onion").await.unwrap();
    store
      .add_inventory_item(NewInventoryItem {
        user_id:          user.user_id,
        ingredient_id:    onion.ingredient_id,
        quantity:         5.0,
        quantity_text:    "5".to_owned(),
        unit:             "pieces".to_owned(),
        storage_location: StorageLocation::Pantry,
        expires_at:       None,
      })
      .await
      .unwrap();

    let (status, Json(res)) = auto_fill(
      State(store.clone()),
      CurrentUser(user.clone()),
      Path(recipe_id),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(res.items.len(), 1);
    assert_eq!(res.items[0].ingredient_name, "Saffron");
    assert_eq!(res.items[0].item.quantity, 1.0);
  }

  #[tokio::test]
  async fn auto_fill_twice_creates_no_duplicates() {
    let (store, user) = setup().await;
    let recipe_id =
      saved_recipe(&store, user.user_id, vec![line("saffron", "1", "pinch")]).await;

    let (first_status, Json(first)) = auto_fill(
      State(store.clone()),
      CurrentUser(user.clone()),
      Path(recipe_id),
    )
    .await
    .unwrap();
    assert_eq!(first_status, StatusCode::CREATED);
    assert_eq!(first.items.len(), 1);

    let (second_status, Json(second)) = auto_fill(
      State(store.clone()),
      CurrentUser(user.clone()),
      Path(recipe_id),
    )
    .await
    .unwrap();
    assert_eq!(second_status, StatusCode::OK);
    assert!(second.items.is_empty());

    let list = store.list_shopping_list(user.user_id).await.unwrap();
    assert_eq!(list.len(), 1);
  }

  #[tokio::test]
  async fn auto_fill_of_unsaved_recipe_is_not_found() {
    let (store, user) = setup().await;
    let recipe = store
      .add_recipe(NewRecipe {
        user_id:      user.user_id,
        title:        "Unsaved".to_owned(),
        description:  String::new(),
        instructions: String::new(),
        lines:        vec![line("saffron", "1", "pinch")],
      })
      .await
      .unwrap();

    let err = auto_fill(
      State(store.clone()),
      CurrentUser(user.clone()),
      Path(recipe.recipe.recipe_id),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApiError::NotFound(_)));
    assert!(store.list_shopping_list(user.user_id).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn validation_failure_commits_nothing() {
    let (store, user) = setup().await;
    // Second line has a blank unit, so the plan must abort before the first
    // line reaches the store.
    let recipe_id = saved_recipe(
      &store,
      user.user_id,
      vec![line("carrot", "2", "pieces"), line("potato", "1", " ")],
    )
    .await;

    let err = auto_fill(
      State(store.clone()),
      CurrentUser(user.clone()),
      Path(recipe_id),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "unit"));
    assert!(store.list_shopping_list(user.user_id).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn unparseable_lines_are_skipped_not_fatal() {
    let (store, user) = setup().await;
    let recipe_id = saved_recipe(
      &store,
      user.user_id,
      vec![line("salt", "to taste", "pinch"), line("carrot", "2", "pieces")],
    )
    .await;

    let (_, Json(res)) = auto_fill(
      State(store.clone()),
      CurrentUser(user.clone()),
      Path(recipe_id),
    )
    .await
    .unwrap();

    assert_eq!(res.items.len(), 1);
    assert_eq!(res.items[0].ingredient_name, "Carrot");
  }
}
