//! Matching recipe-ingredient lines against a user's pantry.
//!
//! The index is built fresh per request from the user's available inventory
//! and holds pre-normalized names so the per-line match is a lookup plus at
//! most one ordered scan. Matching itself is a pure function; callers own
//! the per-recipe set of already-consumed inventory ids.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::{normalize, pantry::InventoryItemView};

/// One available pantry entry, keyed by ingredient.
#[derive(Debug, Clone)]
pub struct InventoryEntry {
  pub ingredient_id:   Uuid,
  pub ingredient_name: String,
  pub normalized_name: String,
  pub quantity:        f64,
  pub unit:            String,
}

/// In-memory map from ingredient id to a user's available pantry data.
///
/// Preserves the insertion order of [`InventoryIndex::insert`] so the
/// containment fallback scans entries deterministically. When the same
/// ingredient appears twice (one ingredient in two storage locations), the
/// first entry inserted wins and later ones are dropped — quantities are
/// not merged across locations.
#[derive(Debug, Default)]
pub struct InventoryIndex {
  order: Vec<Uuid>,
  by_id: HashMap<Uuid, InventoryEntry>,
}

impl InventoryIndex {
  /// Build an index from inventory views, normalizing each name once.
  /// Callers pass available items only, in the order entries should be
  /// scanned (the store returns most-recent-first).
  pub fn from_views<I>(views: I) -> Self
  where
    I: IntoIterator<Item = InventoryItemView>,
  {
    let mut index = Self::default();
    for view in views {
      index.insert(InventoryEntry {
        ingredient_id:   view.item.ingredient_id,
        normalized_name: normalize::normalize(&view.ingredient_name),
        ingredient_name: view.ingredient_name,
        quantity:        view.item.quantity,
        unit:            view.item.unit,
      });
    }
    index
  }

  pub fn insert(&mut self, entry: InventoryEntry) {
    if self.by_id.contains_key(&entry.ingredient_id) {
      return;
    }
    self.order.push(entry.ingredient_id);
    self.by_id.insert(entry.ingredient_id, entry);
  }

  pub fn get(&self, ingredient_id: Uuid) -> Option<&InventoryEntry> {
    self.by_id.get(&ingredient_id)
  }

  /// Entries in insertion order.
  pub fn entries(&self) -> impl Iterator<Item = &InventoryEntry> {
    self.order.iter().filter_map(|id| self.by_id.get(id))
  }

  pub fn len(&self) -> usize { self.order.len() }

  pub fn is_empty(&self) -> bool { self.order.is_empty() }
}

/// Find the inventory entry backing one recipe line, if any.
///
/// Tries exact ingredient-id equality first, then normalized-name
/// containment in either direction, scanning entries in index order.
/// Entries whose ids are in `matched` are excluded by both rules, so one
/// inventory item cannot cover two lines of the same recipe. Pure lookup —
/// callers add the returned id to `matched` themselves.
///
/// Units are never converted; a matched entry with a different unit is
/// treated as compatible and compared numerically.
pub fn match_ingredient<'a>(
  ingredient_id: Uuid,
  normalized_name: &str,
  index: &'a InventoryIndex,
  matched: &HashSet<Uuid>,
) -> Option<&'a InventoryEntry> {
  if let Some(entry) = index.get(ingredient_id)
    && !matched.contains(&ingredient_id)
  {
    return Some(entry);
  }

  index.entries().find(|entry| {
    !matched.contains(&entry.ingredient_id)
      && normalize::names_match(normalized_name, &entry.normalized_name)
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn entry(name: &str, quantity: f64) -> InventoryEntry {
    InventoryEntry {
      ingredient_id:   Uuid::new_v4(),
      ingredient_name: name.to_owned(),
      normalized_name: normalize::normalize(name),
      quantity,
      unit: "pieces".to_owned(),
    }
  }

  fn index_of(entries: Vec<InventoryEntry>) -> InventoryIndex {
    let mut index = InventoryIndex::default();
    for e in entries {
      index.insert(e);
    }
    index
  }

  #[test]
  fn exact_id_match_wins() {
    let onion = entry("Onion", 2.0);
    let onion_id = onion.ingredient_id;
    let index = index_of(vec![entry("Garlic", 1.0), onion]);

    let hit = match_ingredient(onion_id, "onion", &index, &HashSet::new()).unwrap();
    assert_eq!(hit.ingredient_id, onion_id);
  }

  #[test]
  fn falls_back_to_containment() {
    let breast = entry("Chicken Breast", 2.0);
    let breast_id = breast.ingredient_id;
    let index = index_of(vec![breast]);

    // Different ingredient id, but "chicken" is contained in "chicken breast".
    let hit =
      match_ingredient(Uuid::new_v4(), "chicken", &index, &HashSet::new()).unwrap();
    assert_eq!(hit.ingredient_id, breast_id);
  }

  #[test]
  fn matched_set_excludes_both_rules() {
    let onion = entry("Onion", 2.0);
    let onion_id = onion.ingredient_id;
    let index = index_of(vec![onion]);

    let mut matched = HashSet::new();
    matched.insert(onion_id);

    assert!(match_ingredient(onion_id, "onion", &index, &matched).is_none());
  }

  #[test]
  fn idempotent_without_matched_set_update() {
    let index = index_of(vec![entry("Onion", 2.0), entry("Red Onion", 1.0)]);
    let matched = HashSet::new();

    let first =
      match_ingredient(Uuid::new_v4(), "onion", &index, &matched).unwrap();
    let second =
      match_ingredient(Uuid::new_v4(), "onion", &index, &matched).unwrap();
    assert_eq!(first.ingredient_id, second.ingredient_id);
  }

  #[test]
  fn containment_scan_follows_insertion_order() {
    let first = entry("Onion", 2.0);
    let first_id = first.ingredient_id;
    let index = index_of(vec![first, entry("Green Onion", 5.0)]);

    let hit =
      match_ingredient(Uuid::new_v4(), "onion", &index, &HashSet::new()).unwrap();
    assert_eq!(hit.ingredient_id, first_id);
  }

  #[test]
  fn duplicate_ingredient_keeps_first_entry() {
    let fridge = entry("Butter", 1.0);
    let id = fridge.ingredient_id;
    let mut freezer = entry("Butter", 4.0);
    freezer.ingredient_id = id;

    let index = index_of(vec![fridge, freezer]);
    assert_eq!(index.len(), 1);
    assert_eq!(index.get(id).unwrap().quantity, 1.0);
  }
}
