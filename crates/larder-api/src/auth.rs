//! Registration, login, and the bearer-token extractor.
//!
//! Passwords are stored as argon2 PHC strings. Login and registration issue
//! an opaque token — 32 random bytes, hex-encoded for the client — and the
//! store keeps only its sha256 digest, so a leaked database cannot replay
//! sessions.

use std::sync::Arc;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  Json,
  extract::{FromRequestParts, State},
  http::{HeaderMap, StatusCode, header, request::Parts},
};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use larder_core::{store::PantryStore, user::{NewUser, User}};

use crate::error::ApiError;

// ─── Tokens ──────────────────────────────────────────────────────────────────

/// Generate a fresh client-facing bearer token.
fn issue_token() -> String {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}

/// The digest under which a token is stored and looked up.
pub fn token_digest(token: &str) -> String {
  hex::encode(Sha256::digest(token.as_bytes()))
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// The authenticated caller. Present in a handler signature means the
/// request carried a valid `Authorization: Bearer …` header.
pub struct CurrentUser(pub User);

/// Resolve the bearer token in `headers` to a user.
pub async fn authenticate<S>(headers: &HeaderMap, store: &S) -> Result<User, ApiError>
where
  S: PantryStore,
{
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let token = header_val
    .strip_prefix("Bearer ")
    .ok_or(ApiError::Unauthorized)?;

  store
    .user_for_session(&token_digest(token))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or(ApiError::Unauthorized)
}

impl<S> FromRequestParts<Arc<S>> for CurrentUser
where
  S: PantryStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &Arc<S>,
  ) -> Result<Self, Self::Rejection> {
    let user = authenticate(&parts.headers, state.as_ref()).await?;
    Ok(CurrentUser(user))
  }
}

// ─── Register ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub username:   String,
  pub password:   String,
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub email:      String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
  pub message: String,
  pub token:   String,
}

/// `POST /auth/register`
pub async fn register<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError>
where
  S: PantryStore,
{
  if body.username.trim().is_empty()
    || body.password.is_empty()
    || body.email.trim().is_empty()
  {
    return Err(ApiError::BadRequest(
      "username, password, and email are required".to_owned(),
    ));
  }

  if store
    .get_user_by_username(&body.username)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .is_some()
  {
    return Err(ApiError::BadRequest("Username already taken".to_owned()));
  }

  if store
    .get_user_by_email(&body.email)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .is_some()
  {
    return Err(ApiError::BadRequest("Email is already in use".to_owned()));
  }

  let salt = SaltString::generate(&mut OsRng);
  let password_hash = Argon2::default()
    .hash_password(body.password.as_bytes(), &salt)
    .map_err(|e| ApiError::Store(Box::new(std::io::Error::other(e.to_string()))))?
    .to_string();

  let user = store
    .create_user(NewUser {
      username: body.username.trim().to_owned(),
      password_hash,
      first_name: body.first_name,
      last_name: body.last_name,
      email: body.email.trim().to_owned(),
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let token = issue_token();
  store
    .create_session(user.user_id, token_digest(&token))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  tracing::info!(username = %user.username, "registered new user");

  Ok((
    StatusCode::CREATED,
    Json(AuthResponse {
      message: "User created successfully".to_owned(),
      token,
    }),
  ))
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub username: String,
  pub password: String,
}

/// `POST /auth/login`
pub async fn login<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<AuthResponse>, ApiError>
where
  S: PantryStore,
{
  let user = store
    .get_user_by_username(&body.username)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or(ApiError::Unauthorized)?;

  let parsed_hash =
    PasswordHash::new(&user.password_hash).map_err(|_| ApiError::Unauthorized)?;
  Argon2::default()
    .verify_password(body.password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  let token = issue_token();
  store
    .create_session(user.user_id, token_digest(&token))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(AuthResponse {
    message: "Login successful!".to_owned(),
    token,
  }))
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::Request;
  use larder_store_sqlite::SqliteStore;

  async fn store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open_in_memory().await.unwrap())
  }

  fn register_body(username: &str) -> RegisterBody {
    RegisterBody {
      username:   username.to_owned(),
      password:   "hunter2!".to_owned(),
      first_name: None,
      last_name:  None,
      email:      format!("{username}@example.com"),
    }
  }

  async fn extract(
    token: Option<&str>,
    store: &Arc<SqliteStore>,
  ) -> Result<CurrentUser, ApiError> {
    let mut builder = Request::builder();
    if let Some(token) = token {
      builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = builder.body(axum::body::Body::empty()).unwrap();
    let (mut parts, _) = req.into_parts();
    CurrentUser::from_request_parts(&mut parts, store).await
  }

  #[tokio::test]
  async fn register_then_extract_current_user() {
    let store = store().await;
    let (status, Json(res)) =
      register(State(store.clone()), Json(register_body("alice")))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);

    let CurrentUser(user) = extract(Some(&res.token), &store).await.unwrap();
    assert_eq!(user.username, "alice");
  }

  #[tokio::test]
  async fn login_issues_a_working_token() {
    let store = store().await;
    register(State(store.clone()), Json(register_body("alice")))
      .await
      .unwrap();

    let Json(res) = login(
      State(store.clone()),
      Json(LoginBody {
        username: "alice".to_owned(),
        password: "hunter2!".to_owned(),
      }),
    )
    .await
    .unwrap();

    let CurrentUser(user) = extract(Some(&res.token), &store).await.unwrap();
    assert_eq!(user.username, "alice");
  }

  #[tokio::test]
  async fn wrong_password_is_unauthorized() {
    let store = store().await;
    register(State(store.clone()), Json(register_body("alice")))
      .await
      .unwrap();

    let err = login(
      State(store.clone()),
      Json(LoginBody {
        username: "alice".to_owned(),
        password: "wrong".to_owned(),
      }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
  }

  #[tokio::test]
  async fn duplicate_username_is_rejected() {
    let store = store().await;
    register(State(store.clone()), Json(register_body("alice")))
      .await
      .unwrap();

    let mut body = register_body("alice");
    body.email = "other@example.com".to_owned();
    let err = register(State(store.clone()), Json(body)).await.unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(m) if m == "Username already taken"));
  }

  #[tokio::test]
  async fn missing_header_is_unauthorized() {
    let store = store().await;
    assert!(matches!(
      extract(None, &store).await,
      Err(ApiError::Unauthorized)
    ));
  }

  #[tokio::test]
  async fn unknown_token_is_unauthorized() {
    let store = store().await;
    assert!(matches!(
      extract(Some("not-a-real-token"), &store).await,
      Err(ApiError::Unauthorized)
    ));
  }
}
