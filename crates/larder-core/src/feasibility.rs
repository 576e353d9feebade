//! Per-recipe feasibility evaluation.
//!
//! Walks a recipe's ingredient lines against an [`InventoryIndex`] and
//! classifies the recipe as makeable or not, collecting the missing lines.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  matching::{self, InventoryIndex},
  normalize,
  quantity::{self, Quantity},
  recipe::RecipeLine,
};

/// One unsatisfied recipe line. Quantities are pretty-rendered strings
/// ("1 1/2"), not numbers — this is a display shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingIngredient {
  pub ingredient_name:    String,
  pub required_quantity:  String,
  pub unit:               String,
  /// Present when a pantry entry matched but held too little.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub available_quantity: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub available_unit:     Option<String>,
}

/// The outcome of evaluating one recipe against one inventory index.
#[derive(Debug, Clone)]
pub struct Feasibility {
  pub can_make: bool,
  pub missing:  Vec<MissingIngredient>,
}

/// Evaluate a recipe's lines against the inventory index.
///
/// Lines whose quantity text does not parse are logged and skipped: they
/// count neither as satisfied nor as missing, so a recipe carrying only
/// such lines still reports `can_make = true`. This mirrors the observed
/// behavior of the system this one replaces; see DESIGN.md.
///
/// A recipe with zero lines is vacuously makeable. Each inventory entry
/// backs at most one line via the matched set.
pub fn evaluate(recipe_id: Uuid, lines: &[RecipeLine], index: &InventoryIndex) -> Feasibility {
  let mut matched: HashSet<Uuid> = HashSet::new();
  let mut missing = Vec::new();

  for line in lines {
    let required = match Quantity::parse(&line.quantity) {
      Ok(q) => q,
      Err(_) => {
        tracing::warn!(
          %recipe_id,
          line_id = %line.line_id,
          quantity = %line.quantity,
          "skipping recipe line with unparseable quantity"
        );
        continue;
      }
    };

    let normalized = normalize::normalize(&line.ingredient_name);
    match matching::match_ingredient(line.ingredient_id, &normalized, index, &matched) {
      None => missing.push(MissingIngredient {
        ingredient_name:    line.ingredient_name.clone(),
        required_quantity:  required.pretty(),
        unit:               line.unit.clone(),
        available_quantity: None,
        available_unit:     None,
      }),
      Some(entry) if entry.quantity < required.value() => {
        missing.push(MissingIngredient {
          ingredient_name:    line.ingredient_name.clone(),
          required_quantity:  required.pretty(),
          unit:               line.unit.clone(),
          available_quantity: Some(quantity::pretty_value(entry.quantity)),
          available_unit:     Some(entry.unit.clone()),
        });
        matched.insert(entry.ingredient_id);
      }
      Some(entry) => {
        matched.insert(entry.ingredient_id);
      }
    }
  }

  Feasibility { can_make: missing.is_empty(), missing }
}
