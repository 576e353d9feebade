//! Ingredient-name normalization.
//!
//! Recipe authors write "Finely Chopped Onion"; pantries say "onion". Names
//! are compared after lowercasing and stripping a fixed vocabulary of
//! descriptive modifier words, then checked for substring containment in
//! either direction.
//!
//! Containment is intentionally loose and can false-positive on short names
//! ("egg" matches inside "eggplant"). That is a known limitation of the
//! matching strategy, not something this module papers over.

/// Descriptive modifier words removed during normalization.
/// Matched as whole words, case-insensitively.
const MODIFIERS: &[&str] = &[
  "boneless",
  "chopped",
  "coarsely",
  "cooked",
  "diced",
  "dried",
  "finely",
  "fresh",
  "freshly",
  "frozen",
  "grated",
  "ground",
  "large",
  "medium",
  "minced",
  "peeled",
  "raw",
  "roughly",
  "shredded",
  "skinless",
  "sliced",
  "small",
  "thinly",
];

/// Produce the comparison key for an ingredient name.
///
/// Lowercases, drops modifier words, and collapses whitespace. Total and
/// deterministic; a name made up entirely of modifiers normalizes to `""`.
pub fn normalize(name: &str) -> String {
  name
    .to_lowercase()
    .split_whitespace()
    .filter(|word| !MODIFIERS.contains(word))
    .collect::<Vec<_>>()
    .join(" ")
}

/// Whether two *normalized* names refer to the same ingredient: equal, or
/// one contained in the other.
pub fn names_match(a: &str, b: &str) -> bool {
  if a.is_empty() || b.is_empty() {
    return false;
  }
  a.contains(b) || b.contains(a)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn strips_modifiers_and_lowercases() {
    assert_eq!(normalize("Finely Chopped Onion"), "onion");
    assert_eq!(normalize("onion"), "onion");
    assert_eq!(normalize("Boneless Skinless Chicken Breast"), "chicken breast");
  }

  #[test]
  fn modifier_names_equalize() {
    assert_eq!(normalize("Finely Chopped Onion"), normalize("onion"));
    assert_eq!(normalize("COOKED rice"), normalize("Rice"));
  }

  #[test]
  fn strips_whole_words_only() {
    // "rawhide" contains "raw" but is not the modifier word.
    assert_eq!(normalize("rawhide treats"), "rawhide treats");
  }

  #[test]
  fn collapses_whitespace() {
    assert_eq!(normalize("  shredded   mozzarella  cheese "), "mozzarella cheese");
  }

  #[test]
  fn containment_matches_either_direction() {
    assert!(names_match("chicken breast", "chicken"));
    assert!(names_match("chicken", "chicken breast"));
    assert!(!names_match("onion", "garlic"));
  }

  #[test]
  fn known_false_positive_on_short_names() {
    // Documented limitation of substring containment.
    assert!(names_match("egg", "eggplant"));
  }

  #[test]
  fn empty_keys_never_match() {
    assert!(!names_match("", "onion"));
    assert!(!names_match("onion", ""));
    assert!(!names_match("", ""));
  }
}
