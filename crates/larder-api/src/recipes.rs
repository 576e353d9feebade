//! Handlers for `/recipes` and `/saved-recipes` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/recipes` | Public; `?mine=true` filters to the caller's own |
//! | `POST`   | `/recipes` | Body: [`NewRecipeBody`]; 201 + stored recipe |
//! | `GET`    | `/recipes/:id` | 404 if not found |
//! | `PUT`    | `/recipes/:id` | Owner only |
//! | `DELETE` | `/recipes/:id` | Owner only; 204 |
//! | `POST`   | `/recipes/:id/save` | Bookmark for the caller |
//! | `DELETE` | `/recipes/:id/save` | Remove the bookmark |
//! | `GET`    | `/saved-recipes` | The caller's bookmarks |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use larder_core::{
  recipe::{NewRecipe, NewRecipeLine, RecipeUpdate, RecipeWithLines, SavedRecipe},
  store::PantryStore,
};

use crate::{
  auth::{self, CurrentUser},
  error::ApiError,
};

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// If `true` and the request is authenticated, only the caller's own
  /// recipes are returned. Ignored for anonymous callers.
  #[serde(default)]
  pub mine: bool,
}

/// `GET /recipes[?mine=true]` — the one public read endpoint.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
  headers: HeaderMap,
) -> Result<Json<Vec<RecipeWithLines>>, ApiError>
where
  S: PantryStore,
{
  let author = if params.mine {
    auth::authenticate(&headers, store.as_ref())
      .await
      .ok()
      .map(|user| user.user_id)
  } else {
    None
  };

  let recipes = store
    .list_recipes(author)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(recipes))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /recipes` and `PUT /recipes/:id`.
#[derive(Debug, Deserialize)]
pub struct NewRecipeBody {
  pub title:        String,
  #[serde(default)]
  pub description:  String,
  #[serde(default)]
  pub instructions: String,
  #[serde(default)]
  pub ingredients:  Vec<NewRecipeLine>,
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
  pub message: String,
  pub recipe:  RecipeWithLines,
}

/// `POST /recipes` — returns 201 + the stored recipe.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  CurrentUser(user): CurrentUser,
  Json(body): Json<NewRecipeBody>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError>
where
  S: PantryStore,
{
  if body.title.trim().is_empty() {
    return Err(ApiError::validation("title", "may not be blank"));
  }
  if body.ingredients.iter().any(|line| line.name.trim().is_empty()) {
    return Err(ApiError::validation("ingredients", "ingredient names may not be blank"));
  }

  let recipe = store
    .add_recipe(NewRecipe {
      user_id:      user.user_id,
      title:        body.title.trim().to_owned(),
      description:  body.description,
      instructions: body.instructions,
      lines:        body.ingredients,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok((
    StatusCode::CREATED,
    Json(RecipeResponse {
      message: "Recipe added successfully".to_owned(),
      recipe,
    }),
  ))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /recipes/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<RecipeWithLines>, ApiError>
where
  S: PantryStore,
{
  let recipe = store
    .get_recipe(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("recipe {id} not found")))?;
  Ok(Json(recipe))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// JSON body accepted by `PUT /recipes/:id`; all fields optional.
#[derive(Debug, Deserialize)]
pub struct UpdateRecipeBody {
  pub title:        Option<String>,
  pub description:  Option<String>,
  pub instructions: Option<String>,
  pub ingredients:  Option<Vec<NewRecipeLine>>,
}

/// `PUT /recipes/:id` — only the recipe's author may update it.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateRecipeBody>,
) -> Result<Json<RecipeWithLines>, ApiError>
where
  S: PantryStore,
{
  require_owner(store.as_ref(), id, user.user_id, "update").await?;

  let updated = store
    .update_recipe(id, RecipeUpdate {
      title:        body.title,
      description:  body.description,
      instructions: body.instructions,
      lines:        body.ingredients,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("recipe {id} not found")))?;

  Ok(Json(updated))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /recipes/:id` — only the recipe's author may delete it.
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: PantryStore,
{
  require_owner(store.as_ref(), id, user.user_id, "delete").await?;

  store
    .delete_recipe(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}

/// 404 for unknown recipes, 403 when the caller is not the author.
async fn require_owner<S>(
  store: &S,
  recipe_id: Uuid,
  user_id: Uuid,
  verb: &str,
) -> Result<(), ApiError>
where
  S: PantryStore,
{
  let recipe = store
    .get_recipe(recipe_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("recipe {recipe_id} not found")))?;

  if recipe.recipe.user_id != user_id {
    return Err(ApiError::Forbidden(format!(
      "you can only {verb} your own recipes"
    )));
  }
  Ok(())
}

// ─── Saved recipes ───────────────────────────────────────────────────────────

/// `POST /recipes/:id/save`
pub async fn save<S>(
  State(store): State<Arc<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SavedRecipe>), ApiError>
where
  S: PantryStore,
{
  if store
    .get_recipe(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .is_none()
  {
    return Err(ApiError::NotFound(format!("recipe {id} not found")));
  }

  let saved = store
    .save_recipe(user.user_id, id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(saved)))
}

/// `DELETE /recipes/:id/save`
pub async fn unsave<S>(
  State(store): State<Arc<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: PantryStore,
{
  let removed = store
    .unsave_recipe(user.user_id, id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  if !removed {
    return Err(ApiError::NotFound(format!(
      "recipe {id} is not in your saved recipes"
    )));
  }
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /saved-recipes`
pub async fn list_saved<S>(
  State(store): State<Arc<S>>,
  CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<RecipeWithLines>>, ApiError>
where
  S: PantryStore,
{
  let recipes = store
    .list_saved_recipes(user.user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(recipes))
}
