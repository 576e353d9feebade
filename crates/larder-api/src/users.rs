//! Handlers for `/user` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/user` | Username of the authenticated caller |
//! | `GET`  | `/user/export` | Profile as a downloadable JSON file |

use axum::{
  Json,
  http::{HeaderValue, header},
  response::{IntoResponse, Response},
};
use serde_json::json;

use larder_core::user::UserProfile;

use crate::{auth::CurrentUser, error::ApiError};

/// `GET /user`
pub async fn get_user_info(CurrentUser(user): CurrentUser) -> Json<serde_json::Value> {
  Json(json!({ "username": user.username }))
}

/// `GET /user/export` — the caller's profile, served as an attachment.
pub async fn export_user_data(
  CurrentUser(user): CurrentUser,
) -> Result<Response, ApiError> {
  let filename = format!("attachment; filename=\"{}_data.json\"", user.username);
  let disposition = HeaderValue::from_str(&filename)
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let mut response = Json(UserProfile::from(&user)).into_response();
  response
    .headers_mut()
    .insert(header::CONTENT_DISPOSITION, disposition);
  Ok(response)
}
