//! JSON REST API for Larder.
//!
//! Exposes an axum [`Router`] backed by any [`larder_core::store::PantryStore`].
//! TLS and transport concerns are the caller's responsibility; authentication
//! is bearer-token based and handled by the [`auth::CurrentUser`] extractor.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", larder_api::api_router(store.clone()))
//! ```

pub mod auth;
pub mod error;
pub mod inventory;
pub mod recipes;
pub mod shopping_list;
pub mod suggestions;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use larder_core::store::PantryStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: PantryStore + 'static,
{
  Router::new()
    // Auth & account
    .route("/auth/register", post(auth::register::<S>))
    .route("/auth/login", post(auth::login::<S>))
    .route("/user", get(users::get_user_info))
    .route("/user/export", get(users::export_user_data))
    // Recipes
    .route("/recipes", get(recipes::list::<S>).post(recipes::create::<S>))
    .route(
      "/recipes/{id}",
      get(recipes::get_one::<S>)
        .put(recipes::update::<S>)
        .delete(recipes::delete::<S>),
    )
    .route(
      "/recipes/{id}/save",
      post(recipes::save::<S>).delete(recipes::unsave::<S>),
    )
    .route("/saved-recipes", get(recipes::list_saved::<S>))
    // Inventory
    .route(
      "/inventory",
      get(inventory::list::<S>).post(inventory::create::<S>),
    )
    .route(
      "/inventory/{id}",
      axum::routing::put(inventory::update::<S>).delete(inventory::delete::<S>),
    )
    // Shopping list
    .route(
      "/shopping-list",
      get(shopping_list::list::<S>).post(shopping_list::create::<S>),
    )
    .route(
      "/shopping-list/{id}",
      axum::routing::put(shopping_list::update::<S>)
        .delete(shopping_list::delete::<S>),
    )
    .route(
      "/shopping-list/auto-fill/{recipe_id}",
      post(shopping_list::auto_fill::<S>),
    )
    // Suggestions
    .route("/suggestions", get(suggestions::handler::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use larder_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  async fn router() -> Router<()> {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    api_router(store)
  }

  #[tokio::test]
  async fn suggestions_require_authentication() {
    let app = router().await;
    let res = app
      .oneshot(
        Request::builder()
          .uri("/suggestions")
          .body(Body::empty())
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn recipe_listing_is_public() {
    let app = router().await;
    let res = app
      .oneshot(Request::builder().uri("/recipes").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn register_and_call_an_authenticated_route() {
    let app = router().await;

    let res = app
      .clone()
      .oneshot(
        Request::builder()
          .method("POST")
          .uri("/auth/register")
          .header(header::CONTENT_TYPE, "application/json")
          .body(Body::from(
            r#"{"username":"alice","password":"hunter2!","email":"alice@example.com"}"#,
          ))
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let bytes = axum::body::to_bytes(res.into_body(), 64 * 1024).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let token = body["token"].as_str().unwrap().to_owned();

    let res = app
      .oneshot(
        Request::builder()
          .uri("/user")
          .header(header::AUTHORIZATION, format!("Bearer {token}"))
          .body(Body::empty())
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
  }
}
