//! Handlers for `/inventory` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/inventory` | `?include_unavailable=true` widens the listing |
//! | `POST`   | `/inventory` | Body: [`NewInventoryBody`]; quantity is a grammar string |
//! | `PUT`    | `/inventory/:id` | Partial update; owner only |
//! | `DELETE` | `/inventory/:id` | Owner only; 204 |
//!
//! Quantities arrive as strings in the `INT | INT/INT | INT WS INT/INT`
//! grammar. The parsed value is stored alongside the original text.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use larder_core::{
  pantry::{InventoryItemUpdate, InventoryItemView, NewInventoryItem, StorageLocation},
  quantity::Quantity,
  store::PantryStore,
};

use crate::{auth::CurrentUser, error::ApiError};

/// Parse a caller-supplied quantity string, surfacing grammar violations as
/// a field error on `quantity`.
fn parse_quantity(text: &str) -> Result<(f64, String), ApiError> {
  let quantity = Quantity::parse(text).map_err(|_| {
    ApiError::validation(
      "quantity",
      format!("{text:?} is not a quantity like \"2\", \"1/2\", or \"1 1/2\""),
    )
  })?;
  Ok((quantity.value(), text.trim().to_owned()))
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// If `true`, also return items flagged unavailable. Default `false`.
  #[serde(default)]
  pub include_unavailable: bool,
}

/// `GET /inventory[?include_unavailable=true]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  CurrentUser(user): CurrentUser,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<InventoryItemView>>, ApiError>
where
  S: PantryStore,
{
  let items = store
    .list_inventory(user.user_id, !params.include_unavailable)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(items))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NewInventoryBody {
  /// Ingredient name; get-or-created case-insensitively.
  pub name:             String,
  pub quantity:         String,
  pub unit:             String,
  pub storage_location: StorageLocation,
  pub expires_at:       Option<NaiveDate>,
}

/// `POST /inventory` — returns 201 + the stored item.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  CurrentUser(user): CurrentUser,
  Json(body): Json<NewInventoryBody>,
) -> Result<(StatusCode, Json<InventoryItemView>), ApiError>
where
  S: PantryStore,
{
  if body.name.trim().is_empty() {
    return Err(ApiError::validation("name", "may not be blank"));
  }
  if body.unit.trim().is_empty() {
    return Err(ApiError::validation("unit", "may not be blank"));
  }
  let (quantity, quantity_text) = parse_quantity(&body.quantity)?;

  let ingredient = store
    .get_or_create_ingredient(&body.name)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  // One row per (ingredient, location); point callers at PUT instead.
  if store
    .find_inventory_item(user.user_id, ingredient.ingredient_id, body.storage_location)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .is_some()
  {
    return Err(ApiError::validation(
      "name",
      format!("{} is already in this storage location", ingredient.name),
    ));
  }

  let view = store
    .add_inventory_item(NewInventoryItem {
      user_id: user.user_id,
      ingredient_id: ingredient.ingredient_id,
      quantity,
      quantity_text,
      unit: body.unit.trim().to_owned(),
      storage_location: body.storage_location,
      expires_at: body.expires_at,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok((StatusCode::CREATED, Json(view)))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// Distinguishes an absent field from an explicit `null` so `expires_at`
/// can be cleared.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Deserialize::deserialize(de).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct UpdateInventoryBody {
  pub quantity:         Option<String>,
  pub unit:             Option<String>,
  pub storage_location: Option<StorageLocation>,
  pub is_available:     Option<bool>,
  #[serde(default, deserialize_with = "double_option")]
  pub expires_at:       Option<Option<NaiveDate>>,
}

/// `PUT /inventory/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateInventoryBody>,
) -> Result<Json<InventoryItemView>, ApiError>
where
  S: PantryStore,
{
  let quantity = body.quantity.as_deref().map(parse_quantity).transpose()?;
  if let Some(unit) = &body.unit
    && unit.trim().is_empty()
  {
    return Err(ApiError::validation("unit", "may not be blank"));
  }

  let updated = store
    .update_inventory_item(user.user_id, id, InventoryItemUpdate {
      quantity,
      unit: body.unit,
      storage_location: body.storage_location,
      is_available: body.is_available,
      expires_at: body.expires_at,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("inventory item {id} not found")))?;

  Ok(Json(updated))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /inventory/:id`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: PantryStore,
{
  let removed = store
    .delete_inventory_item(user.user_id, id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  if !removed {
    return Err(ApiError::NotFound(format!("inventory item {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
