//! Small name helpers shared by the catalog, distractor and hint modules.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
  /// Leading street-type token, optionally followed by its "de/del/dels/des" particle.
  static ref STREET_PREFIX_REGEX: Regex = Regex::new(
    r"(?i)^(Carrer|Avinguda|Plaça|Passeig|Passatge|Ronda|Via|Camí|Jardins|Parc|Rambla|Travessera)(\s+d(e|els|es|el|ala))?"
  )
  .unwrap();
}

/// Non-street categories removed when the catalog is built.
pub const CATALOG_DENYLIST: &[&str] = &["autopista", "autovia", "b-1", "b-2"];

/// Hints additionally skip ring roads: they cross too many streets to help.
pub const HINT_DENYLIST: &[&str] = &["autopista", "autovia", "b-1", "b-2", "ronda"];

/// Street-type prefix of `name`, e.g. "Carrer de" for "Carrer de Balmes".
/// Empty when no known prefix matches.
pub fn street_prefix(name: &str) -> &str {
  STREET_PREFIX_REGEX
    .find(name)
    .map(|m| m.as_str().trim())
    .unwrap_or("")
}

/// Case-insensitive substring match against a denylist.
pub fn matches_denylist(name: &str, denylist: &[&str]) -> bool {
  let lower = name.to_lowercase();
  denylist.iter().any(|needle| lower.contains(needle))
}

/// Log-safe truncation for large strings.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn prefixes_follow_known_types() {
    assert_eq!(street_prefix("Carrer de Balmes"), "Carrer de");
    assert_eq!(street_prefix("Avinguda Diagonal"), "Avinguda");
    assert_eq!(street_prefix("Passeig de Gràcia"), "Passeig de");
    assert_eq!(street_prefix("Plaça de Catalunya"), "Plaça de");
    assert_eq!(street_prefix("Carrer d'Aragó"), "Carrer");
    assert_eq!(street_prefix("Gran Via de les Corts Catalanes"), "");
    assert_eq!(street_prefix(""), "");
  }

  #[test]
  fn particle_alternation_is_leftmost_first() {
    // "dels" is reached through the shorter "de" branch
    assert_eq!(street_prefix("Carrer dels Almogàvers"), "Carrer de");
    assert_eq!(street_prefix("carrer del Bruc"), "carrer de");
  }

  #[test]
  fn denylist_is_case_insensitive() {
    assert!(matches_denylist("Autopista del Mediterrani", CATALOG_DENYLIST));
    assert!(matches_denylist("Ronda de Dalt", HINT_DENYLIST));
    assert!(!matches_denylist("Ronda de Dalt", CATALOG_DENYLIST));
    assert!(!matches_denylist("Carrer de Balmes", HINT_DENYLIST));
  }

  #[test]
  fn truncation_respects_char_boundaries() {
    assert_eq!(trunc_for_log("abc", 10), "abc");
    let t = trunc_for_log("Plaça", 4);
    assert!(t.starts_with("Pla"));
  }
}
