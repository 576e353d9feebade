//! Quantity parsing and rendering.
//!
//! Recipe lines store their quantity as free-form text ("2", "1/2",
//! "1 1/2"); inventory and shopping-list rows store the parsed numeric
//! value. This module is the single boundary between the two: parsing holds
//! an exact rational so "1/3" never picks up binary noise before the final
//! float conversion, and `pretty` goes the other way for display.

use crate::{Error, Result};

/// An exact non-negative rational quantity.
///
/// Always kept with `denom >= 1`; not automatically reduced — call
/// [`Quantity::pretty`] for the lowest-terms rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantity {
  numer: u32,
  denom: u32,
}

impl Quantity {
  /// Parse a quantity string: a plain integer, a simple fraction, or a
  /// mixed number. Surrounding whitespace is trimmed.
  ///
  /// Anything else — letters, an empty string, multiple slashes, a zero
  /// denominator — fails with [`Error::QuantityFormat`].
  pub fn parse(text: &str) -> Result<Self> {
    let trimmed = text.trim();
    let parts: Vec<&str> = trimmed.split_whitespace().collect();

    match parts.as_slice() {
      [single] => {
        if single.contains('/') {
          parse_fraction(text, single)
        } else {
          let numer = parse_int(text, single)?;
          Ok(Self { numer, denom: 1 })
        }
      }
      [whole, frac] => {
        let whole = parse_int(text, whole)?;
        let frac = parse_fraction(text, frac)?;
        let numer = whole
          .checked_mul(frac.denom)
          .and_then(|w| w.checked_add(frac.numer))
          .ok_or_else(|| Error::QuantityFormat(text.to_owned()))?;
        Ok(Self { numer, denom: frac.denom })
      }
      _ => Err(Error::QuantityFormat(text.to_owned())),
    }
  }

  /// The quantity as a float, for comparison and numeric storage.
  pub fn value(&self) -> f64 { f64::from(self.numer) / f64::from(self.denom) }

  /// Recover a rational from a stored numeric value, trying denominators up
  /// to 16. Returns `None` when no small fraction fits (e.g. `0.33`).
  pub fn approximate(value: f64) -> Option<Self> {
    if !value.is_finite() || value < 0.0 {
      return None;
    }
    for denom in 1..=16u32 {
      let numer = (value * f64::from(denom)).round();
      if numer > f64::from(u32::MAX) {
        return None;
      }
      if (numer / f64::from(denom) - value).abs() < 1e-9 {
        return Some(Self { numer: numer as u32, denom });
      }
    }
    None
  }

  /// Render reduced to lowest terms: `"2"`, `"1/2"`, `"1 1/2"`.
  pub fn pretty(&self) -> String {
    let g = gcd(self.numer, self.denom);
    let (numer, denom) = (self.numer / g, self.denom / g);

    if denom == 1 {
      return numer.to_string();
    }
    let whole = numer / denom;
    let rem = numer % denom;
    if whole == 0 {
      format!("{rem}/{denom}")
    } else {
      format!("{whole} {rem}/{denom}")
    }
  }
}

/// Human rendering of a stored numeric quantity: a small fraction when one
/// fits exactly, otherwise a trimmed decimal.
pub fn pretty_value(value: f64) -> String {
  if let Some(q) = Quantity::approximate(value) {
    return q.pretty();
  }
  let s = format!("{value:.2}");
  s.trim_end_matches('0').trim_end_matches('.').to_owned()
}

fn parse_int(original: &str, s: &str) -> Result<u32> {
  if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
    return Err(Error::QuantityFormat(original.to_owned()));
  }
  s.parse()
    .map_err(|_| Error::QuantityFormat(original.to_owned()))
}

fn parse_fraction(original: &str, s: &str) -> Result<Quantity> {
  let Some((numer, denom)) = s.split_once('/') else {
    return Err(Error::QuantityFormat(original.to_owned()));
  };
  if denom.contains('/') {
    return Err(Error::QuantityFormat(original.to_owned()));
  }
  let numer = parse_int(original, numer)?;
  let denom = parse_int(original, denom)?;
  if denom == 0 {
    return Err(Error::QuantityFormat(original.to_owned()));
  }
  Ok(Quantity { numer, denom })
}

fn gcd(a: u32, b: u32) -> u32 {
  let (mut a, mut b) = (a, b);
  while b != 0 {
    (a, b) = (b, a % b);
  }
  a.max(1)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_plain_integers() {
    assert_eq!(Quantity::parse("1").unwrap().value(), 1.0);
    assert_eq!(Quantity::parse("12").unwrap().value(), 12.0);
    assert_eq!(Quantity::parse("  3 ").unwrap().value(), 3.0);
  }

  #[test]
  fn parses_simple_fractions() {
    assert_eq!(Quantity::parse("1/2").unwrap().value(), 0.5);
    assert_eq!(Quantity::parse("3/4").unwrap().value(), 0.75);
  }

  #[test]
  fn parses_mixed_numbers() {
    assert_eq!(Quantity::parse("1 1/2").unwrap().value(), 1.5);
    assert_eq!(Quantity::parse("2 3/4").unwrap().value(), 2.75);
  }

  #[test]
  fn rejects_garbage() {
    for bad in ["abc", "", "   ", "1/2/3", "1/", "/2", "1/0", "one half", "1 abc", "-1", "1.5"] {
      assert!(
        matches!(Quantity::parse(bad), Err(Error::QuantityFormat(_))),
        "expected {bad:?} to be rejected"
      );
    }
  }

  #[test]
  fn pretty_reduces_to_lowest_terms() {
    assert_eq!(Quantity::parse("2/4").unwrap().pretty(), "1/2");
    assert_eq!(Quantity::parse("4/2").unwrap().pretty(), "2");
    assert_eq!(Quantity::parse("1 2/4").unwrap().pretty(), "1 1/2");
    assert_eq!(Quantity::parse("7/4").unwrap().pretty(), "1 3/4");
  }

  #[test]
  fn parse_pretty_round_trips() {
    for s in ["2", "1/2", "1/3", "3/4", "1 1/2", "2 2/3"] {
      assert_eq!(Quantity::parse(s).unwrap().pretty(), s);
    }
  }

  #[test]
  fn approximate_recovers_common_fractions() {
    assert_eq!(Quantity::approximate(0.5).unwrap().pretty(), "1/2");
    assert_eq!(Quantity::approximate(1.5).unwrap().pretty(), "1 1/2");
    assert_eq!(Quantity::approximate(2.0).unwrap().pretty(), "2");
    assert!(Quantity::approximate(0.33).is_none());
    assert!(Quantity::approximate(-1.0).is_none());
  }

  #[test]
  fn pretty_value_falls_back_to_decimal() {
    assert_eq!(pretty_value(0.5), "1/2");
    assert_eq!(pretty_value(0.33), "0.33");
    assert_eq!(pretty_value(2.0), "2");
  }
}
