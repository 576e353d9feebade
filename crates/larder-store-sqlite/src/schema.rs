//! SQL schema for the Larder SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    username      TEXT NOT NULL,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    first_name    TEXT,
    last_name     TEXT,
    email         TEXT NOT NULL,
    created_at    TEXT NOT NULL    -- ISO 8601 UTC
);

CREATE UNIQUE INDEX IF NOT EXISTS users_username_idx ON users(username COLLATE NOCASE);
CREATE UNIQUE INDEX IF NOT EXISTS users_email_idx    ON users(email COLLATE NOCASE);

-- Opaque bearer tokens, stored as sha256 hex digests only.
CREATE TABLE IF NOT EXISTS sessions (
    token_hash TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    created_at TEXT NOT NULL
);

-- Canonical ingredient vocabulary. Rows accumulate and are never deleted.
CREATE TABLE IF NOT EXISTS ingredients (
    ingredient_id TEXT PRIMARY KEY,
    name          TEXT NOT NULL,   -- title-cased; unique case-insensitively
    food_group    TEXT,
    created_at    TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS ingredients_name_idx ON ingredients(name COLLATE NOCASE);

CREATE TABLE IF NOT EXISTS recipes (
    recipe_id    TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL REFERENCES users(user_id),
    title        TEXT NOT NULL,
    description  TEXT NOT NULL,
    instructions TEXT NOT NULL,
    created_at   TEXT NOT NULL
);

-- One row per recipe ingredient. quantity is the author's free-form text
-- (\"1 1/2\"), parsed only at evaluation time.
CREATE TABLE IF NOT EXISTS recipe_lines (
    line_id       TEXT PRIMARY KEY,
    recipe_id     TEXT NOT NULL REFERENCES recipes(recipe_id) ON DELETE CASCADE,
    ingredient_id TEXT NOT NULL REFERENCES ingredients(ingredient_id),
    position      INTEGER NOT NULL,
    quantity      TEXT NOT NULL,
    unit          TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS saved_recipes (
    user_id   TEXT NOT NULL REFERENCES users(user_id),
    recipe_id TEXT NOT NULL REFERENCES recipes(recipe_id) ON DELETE CASCADE,
    saved_at  TEXT NOT NULL,
    PRIMARY KEY (user_id, recipe_id)
);

CREATE TABLE IF NOT EXISTS inventory_items (
    item_id          TEXT PRIMARY KEY,
    user_id          TEXT NOT NULL REFERENCES users(user_id),
    ingredient_id    TEXT NOT NULL REFERENCES ingredients(ingredient_id),
    quantity         REAL NOT NULL,
    quantity_text    TEXT NOT NULL,  -- the string the user typed
    unit             TEXT NOT NULL,
    storage_location TEXT NOT NULL,  -- 'fridge' | 'freezer' | 'pantry'
    is_available     INTEGER NOT NULL DEFAULT 1,
    added_at         TEXT NOT NULL,
    expires_at       TEXT,           -- ISO 8601 date or NULL
    UNIQUE (user_id, ingredient_id, storage_location)
);

CREATE TABLE IF NOT EXISTS shopping_list_items (
    item_id       TEXT PRIMARY KEY,
    user_id       TEXT NOT NULL REFERENCES users(user_id),
    ingredient_id TEXT NOT NULL REFERENCES ingredients(ingredient_id),
    quantity      REAL NOT NULL,
    unit          TEXT NOT NULL,
    is_purchased  INTEGER NOT NULL DEFAULT 0,
    added_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS sessions_user_idx       ON sessions(user_id);
CREATE INDEX IF NOT EXISTS recipe_lines_recipe_idx ON recipe_lines(recipe_id);
CREATE INDEX IF NOT EXISTS inventory_user_idx      ON inventory_items(user_id);
CREATE INDEX IF NOT EXISTS shopping_user_idx       ON shopping_list_items(user_id);

PRAGMA user_version = 1;
";
