//! Shopping-list reconciliation planning.
//!
//! Given a saved recipe's lines, the caller's inventory index, and the set
//! of ingredients already pending (unpurchased) on the shopping list, this
//! module decides which shopping-list rows auto-fill should create. It is
//! the pure half of the operation; the api layer owns the saved-recipe
//! check and the transactional insert.

use std::collections::HashSet;

use thiserror::Error;
use uuid::Uuid;

use crate::{
  matching::{self, InventoryIndex},
  normalize,
  quantity::Quantity,
  recipe::RecipeLine,
  shopping::NewShoppingListItem,
};

/// A planned addition failed validation. Auto-fill aborts the whole call
/// on the first of these — nothing is committed.
#[derive(Debug, Error)]
#[error("invalid {field} for {ingredient_name:?}: {message}")]
pub struct InvalidAddition {
  pub ingredient_name: String,
  pub field:           &'static str,
  pub message:         String,
}

/// Compute the shopping-list additions needed to cover `lines`.
///
/// A line produces an addition when its quantity parses, it is not covered
/// by inventory (no match, or matched but insufficient), and its
/// ingredient has no unpurchased entry in `pending`. Unparseable lines are
/// logged and skipped, as in the suggestion scan. Additions carry the full
/// required quantity from the line — not the shortfall delta, even when
/// inventory partially covers it.
///
/// All planned additions are validated before any is returned, so a single
/// invalid line aborts the whole plan.
pub fn plan_additions(
  user_id: Uuid,
  recipe_id: Uuid,
  lines: &[RecipeLine],
  index: &InventoryIndex,
  pending: &HashSet<Uuid>,
) -> Result<Vec<NewShoppingListItem>, InvalidAddition> {
  let mut matched: HashSet<Uuid> = HashSet::new();
  let mut additions = Vec::new();

  for line in lines {
    let required = match Quantity::parse(&line.quantity) {
      Ok(q) => q,
      Err(_) => {
        tracing::warn!(
          %recipe_id,
          line_id = %line.line_id,
          quantity = %line.quantity,
          "skipping recipe line with unparseable quantity during auto-fill"
        );
        continue;
      }
    };

    let normalized = normalize::normalize(&line.ingredient_name);
    if let Some(entry) =
      matching::match_ingredient(line.ingredient_id, &normalized, index, &matched)
    {
      matched.insert(entry.ingredient_id);
      if entry.quantity >= required.value() {
        continue;
      }
    }

    if pending.contains(&line.ingredient_id) {
      continue;
    }

    validate_addition(line, required.value())?;
    additions.push(NewShoppingListItem {
      user_id,
      ingredient_id: line.ingredient_id,
      quantity: required.value(),
      unit: line.unit.clone(),
    });
  }

  Ok(additions)
}

fn validate_addition(line: &RecipeLine, quantity: f64) -> Result<(), InvalidAddition> {
  if quantity <= 0.0 {
    return Err(InvalidAddition {
      ingredient_name: line.ingredient_name.clone(),
      field:           "quantity",
      message:         "must be greater than zero".to_owned(),
    });
  }
  if line.unit.trim().is_empty() {
    return Err(InvalidAddition {
      ingredient_name: line.ingredient_name.clone(),
      field:           "unit",
      message:         "may not be blank".to_owned(),
    });
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    matching::InventoryIndex,
    pantry::{InventoryItem, InventoryItemView, StorageLocation},
  };
  use chrono::Utc;

  fn line(name: &str, quantity: &str, unit: &str, ingredient_id: Uuid) -> RecipeLine {
    RecipeLine {
      line_id: Uuid::new_v4(),
      ingredient_id,
      ingredient_name: name.to_owned(),
      quantity: quantity.to_owned(),
      unit: unit.to_owned(),
    }
  }

  fn stocked(name: &str, quantity: f64, ingredient_id: Uuid) -> InventoryItemView {
    InventoryItemView {
      item: InventoryItem {
        item_id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        ingredient_id,
        quantity,
        quantity_text: quantity.to_string(),
        unit: "pieces".to_owned(),
        storage_location: StorageLocation::Pantry,
        is_available: true,
        added_at: Utc::now(),
        expires_at: None,
      },
      ingredient_name: name.to_owned(),
    }
  }

  #[test]
  fn covered_lines_produce_no_additions() {
    let user = Uuid::new_v4();
    let onion = Uuid::new_v4();
    let index = InventoryIndex::from_views(vec![stocked("Onion", 5.0, onion)]);

    let additions = plan_additions(
      user,
      Uuid::new_v4(),
      &[line("Onion", "2", "pieces", onion)],
      &index,
      &HashSet::new(),
    )
    .unwrap();
    assert!(additions.is_empty());
  }

  #[test]
  fn insufficient_match_adds_full_required_amount() {
    let user = Uuid::new_v4();
    let onion = Uuid::new_v4();
    let index = InventoryIndex::from_views(vec![stocked("Onion", 1.0, onion)]);

    let additions = plan_additions(
      user,
      Uuid::new_v4(),
      &[line("Onion", "3", "pieces", onion)],
      &index,
      &HashSet::new(),
    )
    .unwrap();
    assert_eq!(additions.len(), 1);
    // Full required amount, not the 2-piece shortfall.
    assert_eq!(additions[0].quantity, 3.0);
    assert_eq!(additions[0].ingredient_id, onion);
  }

  #[test]
  fn pending_ingredients_are_skipped() {
    let user = Uuid::new_v4();
    let saffron = Uuid::new_v4();
    let mut pending = HashSet::new();
    pending.insert(saffron);

    let additions = plan_additions(
      user,
      Uuid::new_v4(),
      &[line("Saffron", "1", "pinch", saffron)],
      &InventoryIndex::default(),
      &pending,
    )
    .unwrap();
    assert!(additions.is_empty());
  }

  #[test]
  fn unparseable_lines_are_skipped() {
    let additions = plan_additions(
      Uuid::new_v4(),
      Uuid::new_v4(),
      &[line("Salt", "to taste", "pinch", Uuid::new_v4())],
      &InventoryIndex::default(),
      &HashSet::new(),
    )
    .unwrap();
    assert!(additions.is_empty());
  }

  #[test]
  fn blank_unit_aborts_the_whole_plan() {
    let lines = vec![
      line("Carrot", "2", "pieces", Uuid::new_v4()),
      line("Potato", "1", "  ", Uuid::new_v4()),
    ];
    let err = plan_additions(
      Uuid::new_v4(),
      Uuid::new_v4(),
      &lines,
      &InventoryIndex::default(),
      &HashSet::new(),
    )
    .unwrap_err();
    assert_eq!(err.field, "unit");
    assert_eq!(err.ingredient_name, "Potato");
  }

  #[test]
  fn zero_quantity_fails_validation() {
    let err = plan_additions(
      Uuid::new_v4(),
      Uuid::new_v4(),
      &[line("Carrot", "0", "pieces", Uuid::new_v4())],
      &InventoryIndex::default(),
      &HashSet::new(),
    )
    .unwrap_err();
    assert_eq!(err.field, "quantity");
  }
}
