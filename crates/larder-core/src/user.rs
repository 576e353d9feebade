//! User accounts.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A registered account. Not `Serialize` — the password hash must never
/// reach a response body; handlers expose [`UserProfile`] instead.
#[derive(Debug, Clone)]
pub struct User {
  pub user_id:       Uuid,
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  pub first_name:    Option<String>,
  pub last_name:     Option<String>,
  pub email:         String,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::PantryStore::create_user`].
/// `user_id` and `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub password_hash: String,
  pub first_name:    Option<String>,
  pub last_name:     Option<String>,
  pub email:         String,
}

/// The account fields safe to serialise back to the account's owner.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UserProfile {
  pub username:   String,
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub email:      String,
  pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
  fn from(u: &User) -> Self {
    Self {
      username:   u.username.clone(),
      first_name: u.first_name.clone(),
      last_name:  u.last_name.clone(),
      email:      u.email.clone(),
      created_at: u.created_at,
    }
  }
}
