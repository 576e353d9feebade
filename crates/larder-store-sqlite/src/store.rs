//! [`SqliteStore`] — the SQLite implementation of [`PantryStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use larder_core::{
  ingredient::{Ingredient, title_case},
  pantry::{InventoryItemUpdate, InventoryItemView, NewInventoryItem, StorageLocation},
  recipe::{NewRecipe, NewRecipeLine, RecipeUpdate, RecipeWithLines, SavedRecipe},
  shopping::{NewShoppingListItem, ShoppingListItemUpdate, ShoppingListItemView},
  store::PantryStore,
  user::{NewUser, User},
};

use crate::{
  Error, Result,
  encode::{
    RawIngredient, RawInventoryItem, RawRecipe, RawRecipeLine, RawShoppingListItem,
    RawUser, encode_date, encode_dt, encode_location, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Larder store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Row helpers (run on the connection thread) ──────────────────────────────

fn query_recipe_row(
  conn: &rusqlite::Connection,
  recipe_id: &str,
) -> rusqlite::Result<Option<RawRecipe>> {
  conn
    .query_row(
      "SELECT recipe_id, user_id, title, description, instructions, created_at
       FROM recipes WHERE recipe_id = ?1",
      rusqlite::params![recipe_id],
      |row| {
        Ok(RawRecipe {
          recipe_id:    row.get(0)?,
          user_id:      row.get(1)?,
          title:        row.get(2)?,
          description:  row.get(3)?,
          instructions: row.get(4)?,
          created_at:   row.get(5)?,
        })
      },
    )
    .optional()
}

fn query_recipe_lines(
  conn: &rusqlite::Connection,
  recipe_id: &str,
) -> rusqlite::Result<Vec<RawRecipeLine>> {
  let mut stmt = conn.prepare(
    "SELECT l.line_id, l.ingredient_id, g.name, l.quantity, l.unit
     FROM recipe_lines l
     JOIN ingredients g ON g.ingredient_id = l.ingredient_id
     WHERE l.recipe_id = ?1
     ORDER BY l.position",
  )?;
  stmt
    .query_map(rusqlite::params![recipe_id], |row| {
      Ok(RawRecipeLine {
        line_id:         row.get(0)?,
        ingredient_id:   row.get(1)?,
        ingredient_name: row.get(2)?,
        quantity:        row.get(3)?,
        unit:            row.get(4)?,
      })
    })?
    .collect()
}

/// Case-insensitive lookup by name, inserting a title-cased row if absent.
fn get_or_create_ingredient_row(
  conn: &rusqlite::Connection,
  name: &str,
) -> rusqlite::Result<RawIngredient> {
  let existing = conn
    .query_row(
      "SELECT ingredient_id, name, food_group, created_at
       FROM ingredients WHERE name = ?1 COLLATE NOCASE",
      rusqlite::params![name.trim()],
      |row| {
        Ok(RawIngredient {
          ingredient_id: row.get(0)?,
          name:          row.get(1)?,
          food_group:    row.get(2)?,
          created_at:    row.get(3)?,
        })
      },
    )
    .optional()?;

  if let Some(raw) = existing {
    return Ok(raw);
  }

  let raw = RawIngredient {
    ingredient_id: encode_uuid(Uuid::new_v4()),
    name:          title_case(name),
    food_group:    None,
    created_at:    encode_dt(Utc::now()),
  };
  conn.execute(
    "INSERT INTO ingredients (ingredient_id, name, food_group, created_at)
     VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![raw.ingredient_id, raw.name, raw.food_group, raw.created_at],
  )?;
  Ok(raw)
}

/// Replace a recipe's line set, get-or-creating ingredients by name.
fn insert_recipe_lines(
  conn: &rusqlite::Connection,
  recipe_id: &str,
  lines: &[NewRecipeLine],
) -> rusqlite::Result<()> {
  for (position, line) in lines.iter().enumerate() {
    let ingredient = get_or_create_ingredient_row(conn, &line.name)?;
    conn.execute(
      "INSERT INTO recipe_lines (line_id, recipe_id, ingredient_id, position, quantity, unit)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
      rusqlite::params![
        encode_uuid(Uuid::new_v4()),
        recipe_id,
        ingredient.ingredient_id,
        position as i64,
        line.quantity,
        line.unit,
      ],
    )?;
  }
  Ok(())
}

fn query_inventory_view(
  conn: &rusqlite::Connection,
  item_id: &str,
) -> rusqlite::Result<Option<RawInventoryItem>> {
  conn
    .query_row(
      "SELECT i.item_id, i.user_id, i.ingredient_id, g.name, i.quantity,
              i.quantity_text, i.unit, i.storage_location, i.is_available,
              i.added_at, i.expires_at
       FROM inventory_items i
       JOIN ingredients g ON g.ingredient_id = i.ingredient_id
       WHERE i.item_id = ?1",
      rusqlite::params![item_id],
      map_inventory_row,
    )
    .optional()
}

fn map_inventory_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawInventoryItem> {
  Ok(RawInventoryItem {
    item_id:          row.get(0)?,
    user_id:          row.get(1)?,
    ingredient_id:    row.get(2)?,
    ingredient_name:  row.get(3)?,
    quantity:         row.get(4)?,
    quantity_text:    row.get(5)?,
    unit:             row.get(6)?,
    storage_location: row.get(7)?,
    is_available:     row.get(8)?,
    added_at:         row.get(9)?,
    expires_at:       row.get(10)?,
  })
}

fn query_shopping_view(
  conn: &rusqlite::Connection,
  item_id: &str,
) -> rusqlite::Result<Option<RawShoppingListItem>> {
  conn
    .query_row(
      "SELECT s.item_id, s.user_id, s.ingredient_id, g.name, s.quantity,
              s.unit, s.is_purchased, s.added_at
       FROM shopping_list_items s
       JOIN ingredients g ON g.ingredient_id = s.ingredient_id
       WHERE s.item_id = ?1",
      rusqlite::params![item_id],
      map_shopping_row,
    )
    .optional()
}

fn map_shopping_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawShoppingListItem> {
  Ok(RawShoppingListItem {
    item_id:         row.get(0)?,
    user_id:         row.get(1)?,
    ingredient_id:   row.get(2)?,
    ingredient_name: row.get(3)?,
    quantity:        row.get(4)?,
    unit:            row.get(5)?,
    is_purchased:    row.get(6)?,
    added_at:        row.get(7)?,
  })
}

fn map_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    user_id:       row.get(0)?,
    username:      row.get(1)?,
    password_hash: row.get(2)?,
    first_name:    row.get(3)?,
    last_name:     row.get(4)?,
    email:         row.get(5)?,
    created_at:    row.get(6)?,
  })
}

fn into_recipe_with_lines(
  raw: (RawRecipe, Vec<RawRecipeLine>),
) -> Result<RecipeWithLines> {
  let (recipe, lines) = raw;
  Ok(RecipeWithLines {
    recipe: recipe.into_recipe()?,
    lines:  lines
      .into_iter()
      .map(RawRecipeLine::into_line)
      .collect::<Result<_>>()?,
  })
}

// ─── PantryStore impl ────────────────────────────────────────────────────────

impl PantryStore for SqliteStore {
  type Error = Error;

  // ── Users & sessions ──────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:       Uuid::new_v4(),
      username:      input.username,
      password_hash: input.password_hash,
      first_name:    input.first_name,
      last_name:     input.last_name,
      email:         input.email,
      created_at:    Utc::now(),
    };

    let id_str = encode_uuid(user.user_id);
    let at_str = encode_dt(user.created_at);
    let row = user.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, username, password_hash, first_name, last_name, email, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            row.username,
            row.password_hash,
            row.first_name,
            row.last_name,
            row.email,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
    let username = username.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, username, password_hash, first_name, last_name, email, created_at
               FROM users WHERE username = ?1 COLLATE NOCASE",
              rusqlite::params![username],
              map_user_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
    let email = email.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, username, password_hash, first_name, last_name, email, created_at
               FROM users WHERE email = ?1 COLLATE NOCASE",
              rusqlite::params![email],
              map_user_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn create_session(&self, user_id: Uuid, token_hash: String) -> Result<()> {
    let user_id_str = encode_uuid(user_id);
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token_hash, user_id, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![token_hash, user_id_str, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn user_for_session(&self, token_hash: &str) -> Result<Option<User>> {
    let token_hash = token_hash.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT u.user_id, u.username, u.password_hash, u.first_name, u.last_name,
                      u.email, u.created_at
               FROM sessions s
               JOIN users u ON u.user_id = s.user_id
               WHERE s.token_hash = ?1",
              rusqlite::params![token_hash],
              map_user_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Ingredients ───────────────────────────────────────────────────────────

  async fn get_or_create_ingredient(&self, name: &str) -> Result<Ingredient> {
    let name = name.to_owned();

    let raw: RawIngredient = self
      .conn
      .call(move |conn| Ok(get_or_create_ingredient_row(conn, &name)?))
      .await?;

    raw.into_ingredient()
  }

  // ── Recipes ───────────────────────────────────────────────────────────────

  async fn add_recipe(&self, input: NewRecipe) -> Result<RecipeWithLines> {
    let recipe_id = Uuid::new_v4();
    let recipe_id_str = encode_uuid(recipe_id);
    let user_id_str = encode_uuid(input.user_id);
    let at_str = encode_dt(Utc::now());

    let raw: (RawRecipe, Vec<RawRecipeLine>) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO recipes (recipe_id, user_id, title, description, instructions, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            recipe_id_str,
            user_id_str,
            input.title,
            input.description,
            input.instructions,
            at_str,
          ],
        )?;
        insert_recipe_lines(&tx, &recipe_id_str, &input.lines)?;

        let recipe = query_recipe_row(&tx, &recipe_id_str)?
          .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        let lines = query_recipe_lines(&tx, &recipe_id_str)?;
        tx.commit()?;
        Ok((recipe, lines))
      })
      .await?;

    into_recipe_with_lines(raw)
  }

  async fn get_recipe(&self, recipe_id: Uuid) -> Result<Option<RecipeWithLines>> {
    let id_str = encode_uuid(recipe_id);

    let raw: Option<(RawRecipe, Vec<RawRecipeLine>)> = self
      .conn
      .call(move |conn| {
        let Some(recipe) = query_recipe_row(conn, &id_str)? else {
          return Ok(None);
        };
        let lines = query_recipe_lines(conn, &id_str)?;
        Ok(Some((recipe, lines)))
      })
      .await?;

    raw.map(into_recipe_with_lines).transpose()
  }

  async fn list_recipes(&self, user_id: Option<Uuid>) -> Result<Vec<RecipeWithLines>> {
    let user_str = user_id.map(encode_uuid);

    let raws: Vec<(RawRecipe, Vec<RawRecipeLine>)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT recipe_id, user_id, title, description, instructions, created_at
           FROM recipes
           WHERE ?1 IS NULL OR user_id = ?1
           ORDER BY created_at DESC",
        )?;
        let recipes = stmt
          .query_map(rusqlite::params![user_str], |row| {
            Ok(RawRecipe {
              recipe_id:    row.get(0)?,
              user_id:      row.get(1)?,
              title:        row.get(2)?,
              description:  row.get(3)?,
              instructions: row.get(4)?,
              created_at:   row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut out = Vec::with_capacity(recipes.len());
        for recipe in recipes {
          let lines = query_recipe_lines(conn, &recipe.recipe_id)?;
          out.push((recipe, lines));
        }
        Ok(out)
      })
      .await?;

    raws.into_iter().map(into_recipe_with_lines).collect()
  }

  async fn update_recipe(
    &self,
    recipe_id: Uuid,
    update: RecipeUpdate,
  ) -> Result<Option<RecipeWithLines>> {
    let id_str = encode_uuid(recipe_id);

    let raw: Option<(RawRecipe, Vec<RawRecipeLine>)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if query_recipe_row(&tx, &id_str)?.is_none() {
          return Ok(None);
        }

        tx.execute(
          "UPDATE recipes SET
             title        = COALESCE(?2, title),
             description  = COALESCE(?3, description),
             instructions = COALESCE(?4, instructions)
           WHERE recipe_id = ?1",
          rusqlite::params![id_str, update.title, update.description, update.instructions],
        )?;

        if let Some(lines) = &update.lines {
          tx.execute(
            "DELETE FROM recipe_lines WHERE recipe_id = ?1",
            rusqlite::params![id_str],
          )?;
          insert_recipe_lines(&tx, &id_str, lines)?;
        }

        let recipe = query_recipe_row(&tx, &id_str)?
          .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        let lines = query_recipe_lines(&tx, &id_str)?;
        tx.commit()?;
        Ok(Some((recipe, lines)))
      })
      .await?;

    raw.map(into_recipe_with_lines).transpose()
  }

  async fn delete_recipe(&self, recipe_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(recipe_id);

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM recipes WHERE recipe_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(affected > 0)
  }

  // ── Saved recipes ─────────────────────────────────────────────────────────

  async fn save_recipe(&self, user_id: Uuid, recipe_id: Uuid) -> Result<SavedRecipe> {
    let user_str = encode_uuid(user_id);
    let recipe_str = encode_uuid(recipe_id);
    let at_str = encode_dt(Utc::now());

    let saved_at: String = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO saved_recipes (user_id, recipe_id, saved_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![user_str, recipe_str, at_str],
        )?;
        Ok(conn.query_row(
          "SELECT saved_at FROM saved_recipes WHERE user_id = ?1 AND recipe_id = ?2",
          rusqlite::params![user_str, recipe_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(SavedRecipe {
      user_id,
      recipe_id,
      saved_at: crate::encode::decode_dt(&saved_at)?,
    })
  }

  async fn unsave_recipe(&self, user_id: Uuid, recipe_id: Uuid) -> Result<bool> {
    let user_str = encode_uuid(user_id);
    let recipe_str = encode_uuid(recipe_id);

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM saved_recipes WHERE user_id = ?1 AND recipe_id = ?2",
          rusqlite::params![user_str, recipe_str],
        )?)
      })
      .await?;

    Ok(affected > 0)
  }

  async fn is_recipe_saved(&self, user_id: Uuid, recipe_id: Uuid) -> Result<bool> {
    let user_str = encode_uuid(user_id);
    let recipe_str = encode_uuid(recipe_id);

    let found: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM saved_recipes WHERE user_id = ?1 AND recipe_id = ?2",
              rusqlite::params![user_str, recipe_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;

    Ok(found)
  }

  async fn list_saved_recipes(&self, user_id: Uuid) -> Result<Vec<RecipeWithLines>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<(RawRecipe, Vec<RawRecipeLine>)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT r.recipe_id, r.user_id, r.title, r.description, r.instructions, r.created_at
           FROM saved_recipes sr
           JOIN recipes r ON r.recipe_id = sr.recipe_id
           WHERE sr.user_id = ?1
           ORDER BY sr.saved_at DESC",
        )?;
        let recipes = stmt
          .query_map(rusqlite::params![user_str], |row| {
            Ok(RawRecipe {
              recipe_id:    row.get(0)?,
              user_id:      row.get(1)?,
              title:        row.get(2)?,
              description:  row.get(3)?,
              instructions: row.get(4)?,
              created_at:   row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut out = Vec::with_capacity(recipes.len());
        for recipe in recipes {
          let lines = query_recipe_lines(conn, &recipe.recipe_id)?;
          out.push((recipe, lines));
        }
        Ok(out)
      })
      .await?;

    raws.into_iter().map(into_recipe_with_lines).collect()
  }

  // ── Inventory ─────────────────────────────────────────────────────────────

  async fn list_inventory(
    &self,
    user_id: Uuid,
    only_available: bool,
  ) -> Result<Vec<InventoryItemView>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<RawInventoryItem> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT i.item_id, i.user_id, i.ingredient_id, g.name, i.quantity,
                  i.quantity_text, i.unit, i.storage_location, i.is_available,
                  i.added_at, i.expires_at
           FROM inventory_items i
           JOIN ingredients g ON g.ingredient_id = i.ingredient_id
           WHERE i.user_id = ?1 AND (i.is_available = 1 OR ?2 = 0)
           ORDER BY i.added_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str, only_available], map_inventory_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawInventoryItem::into_view).collect()
  }

  async fn find_inventory_item(
    &self,
    user_id: Uuid,
    ingredient_id: Uuid,
    location: StorageLocation,
  ) -> Result<Option<InventoryItemView>> {
    let user_str = encode_uuid(user_id);
    let ingredient_str = encode_uuid(ingredient_id);
    let location_str = encode_location(location).to_owned();

    let raw: Option<RawInventoryItem> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT i.item_id, i.user_id, i.ingredient_id, g.name, i.quantity,
                      i.quantity_text, i.unit, i.storage_location, i.is_available,
                      i.added_at, i.expires_at
               FROM inventory_items i
               JOIN ingredients g ON g.ingredient_id = i.ingredient_id
               WHERE i.user_id = ?1 AND i.ingredient_id = ?2 AND i.storage_location = ?3",
              rusqlite::params![user_str, ingredient_str, location_str],
              map_inventory_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawInventoryItem::into_view).transpose()
  }

  async fn add_inventory_item(&self, input: NewInventoryItem) -> Result<InventoryItemView> {
    let item_id_str = encode_uuid(Uuid::new_v4());
    let user_str = encode_uuid(input.user_id);
    let ingredient_str = encode_uuid(input.ingredient_id);
    let location_str = encode_location(input.storage_location).to_owned();
    let at_str = encode_dt(Utc::now());
    let expires_str = input.expires_at.map(encode_date);

    let raw: RawInventoryItem = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO inventory_items (
             item_id, user_id, ingredient_id, quantity, quantity_text,
             unit, storage_location, is_available, added_at, expires_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?9)",
          rusqlite::params![
            item_id_str,
            user_str,
            ingredient_str,
            input.quantity,
            input.quantity_text,
            input.unit,
            location_str,
            at_str,
            expires_str,
          ],
        )?;
        query_inventory_view(conn, &item_id_str)?
          .ok_or(rusqlite::Error::QueryReturnedNoRows)
          .map_err(Into::into)
      })
      .await?;

    raw.into_view()
  }

  async fn update_inventory_item(
    &self,
    user_id: Uuid,
    item_id: Uuid,
    update: InventoryItemUpdate,
  ) -> Result<Option<InventoryItemView>> {
    let user_str = encode_uuid(user_id);
    let item_str = encode_uuid(item_id);
    let (quantity, quantity_text) = match update.quantity {
      Some((value, text)) => (Some(value), Some(text)),
      None => (None, None),
    };
    let location_str = update.storage_location.map(|l| encode_location(l).to_owned());
    let set_expiry = update.expires_at.is_some();
    let expires_str = update.expires_at.flatten().map(encode_date);

    let raw: Option<RawInventoryItem> = self
      .conn
      .call(move |conn| {
        let affected = conn.execute(
          "UPDATE inventory_items SET
             quantity         = COALESCE(?3, quantity),
             quantity_text    = COALESCE(?4, quantity_text),
             unit             = COALESCE(?5, unit),
             storage_location = COALESCE(?6, storage_location),
             is_available     = COALESCE(?7, is_available),
             expires_at       = CASE WHEN ?8 THEN ?9 ELSE expires_at END
           WHERE item_id = ?1 AND user_id = ?2",
          rusqlite::params![
            item_str,
            user_str,
            quantity,
            quantity_text,
            update.unit,
            location_str,
            update.is_available,
            set_expiry,
            expires_str,
          ],
        )?;
        if affected == 0 {
          return Ok(None);
        }
        Ok(query_inventory_view(conn, &item_str)?)
      })
      .await?;

    raw.map(RawInventoryItem::into_view).transpose()
  }

  async fn delete_inventory_item(&self, user_id: Uuid, item_id: Uuid) -> Result<bool> {
    let user_str = encode_uuid(user_id);
    let item_str = encode_uuid(item_id);

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM inventory_items WHERE item_id = ?1 AND user_id = ?2",
          rusqlite::params![item_str, user_str],
        )?)
      })
      .await?;

    Ok(affected > 0)
  }

  // ── Shopping list ─────────────────────────────────────────────────────────

  async fn list_shopping_list(&self, user_id: Uuid) -> Result<Vec<ShoppingListItemView>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<RawShoppingListItem> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT s.item_id, s.user_id, s.ingredient_id, g.name, s.quantity,
                  s.unit, s.is_purchased, s.added_at
           FROM shopping_list_items s
           JOIN ingredients g ON g.ingredient_id = s.ingredient_id
           WHERE s.user_id = ?1
           ORDER BY s.added_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], map_shopping_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawShoppingListItem::into_view).collect()
  }

  async fn unpurchased_ingredient_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
    let user_str = encode_uuid(user_id);

    let ids: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT ingredient_id FROM shopping_list_items
           WHERE user_id = ?1 AND is_purchased = 0",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    ids.iter().map(|s| crate::encode::decode_uuid(s)).collect()
  }

  async fn add_shopping_list_item(
    &self,
    input: NewShoppingListItem,
  ) -> Result<ShoppingListItemView> {
    let views = self.add_shopping_list_items(vec![input]).await?;
    views
      .into_iter()
      .next()
      .ok_or_else(|| Error::Database(rusqlite::Error::QueryReturnedNoRows.into()))
  }

  async fn add_shopping_list_items(
    &self,
    inputs: Vec<NewShoppingListItem>,
  ) -> Result<Vec<ShoppingListItemView>> {
    let at_str = encode_dt(Utc::now());

    let raws: Vec<RawShoppingListItem> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut item_ids = Vec::with_capacity(inputs.len());

        for input in &inputs {
          let item_id_str = encode_uuid(Uuid::new_v4());
          tx.execute(
            "INSERT INTO shopping_list_items (
               item_id, user_id, ingredient_id, quantity, unit, is_purchased, added_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
            rusqlite::params![
              item_id_str,
              encode_uuid(input.user_id),
              encode_uuid(input.ingredient_id),
              input.quantity,
              input.unit,
              at_str,
            ],
          )?;
          item_ids.push(item_id_str);
        }

        let mut rows = Vec::with_capacity(item_ids.len());
        for item_id in &item_ids {
          rows.push(
            query_shopping_view(&tx, item_id)?
              .ok_or(rusqlite::Error::QueryReturnedNoRows)?,
          );
        }
        tx.commit()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawShoppingListItem::into_view).collect()
  }

  async fn update_shopping_list_item(
    &self,
    user_id: Uuid,
    item_id: Uuid,
    update: ShoppingListItemUpdate,
  ) -> Result<Option<ShoppingListItemView>> {
    let user_str = encode_uuid(user_id);
    let item_str = encode_uuid(item_id);

    let raw: Option<RawShoppingListItem> = self
      .conn
      .call(move |conn| {
        let affected = conn.execute(
          "UPDATE shopping_list_items SET
             quantity     = COALESCE(?3, quantity),
             unit         = COALESCE(?4, unit),
             is_purchased = COALESCE(?5, is_purchased)
           WHERE item_id = ?1 AND user_id = ?2",
          rusqlite::params![
            item_str,
            user_str,
            update.quantity,
            update.unit,
            update.is_purchased,
          ],
        )?;
        if affected == 0 {
          return Ok(None);
        }
        Ok(query_shopping_view(conn, &item_str)?)
      })
      .await?;

    raw.map(RawShoppingListItem::into_view).transpose()
  }

  async fn delete_shopping_list_item(&self, user_id: Uuid, item_id: Uuid) -> Result<bool> {
    let user_str = encode_uuid(user_id);
    let item_str = encode_uuid(item_id);

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM shopping_list_items WHERE item_id = ?1 AND user_id = ?2",
          rusqlite::params![item_str, user_str],
        )?)
      })
      .await?;

    Ok(affected > 0)
  }
}
