//! Username collation
//!
//! Usernames compare equal when they are canonically equivalent after full
//! Unicode case folding. Accents and other diacritics stay significant, so
//! `"José"` and `"jose"` are distinct while `"José"` and `"JOSÉ"` collide, as
//! do the precomposed and decomposed spellings of `"José"`. Full folding also
//! maps `ß` to `ss` and final sigma to sigma. The PostgreSQL store uses the
//! ICU collation `und-u-ks-level2` for the same rule.

use caseless::Caseless;
use unicode_normalization::UnicodeNormalization;

/// Fold a username into its collation key
///
/// Two usernames collide exactly when their keys are equal. The key is the
/// NFC form of the canonical caseless match (NFD, case fold, NFD).
pub fn fold_username(username: &str) -> String {
    username
        .chars()
        .nfd()
        .default_case_fold()
        .nfd()
        .nfc()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collide(a: &str, b: &str) -> bool {
        fold_username(a) == fold_username(b)
    }

    #[test]
    fn test_fold_ascii() {
        assert_eq!(fold_username("Alice"), "alice");
        assert_eq!(fold_username("ALICE"), "alice");
        assert_eq!(fold_username("alice"), "alice");
    }

    #[test]
    fn test_case_variants_collide() {
        assert!(collide("alice", "Alice"));
        assert!(collide("aLiCe", "ALICE"));
        assert!(collide("José", "JOSÉ"));
    }

    #[test]
    fn test_accents_are_significant() {
        assert!(!collide("jose", "josé"));
        assert!(!collide("Zoe", "Zoë"));
        assert!(!collide("JOSE", "jos\u{e9}"));
    }

    #[test]
    fn test_full_case_folding() {
        assert!(collide("STRASSE", "straße"));
        assert!(collide("strasse", "STRAẞE"));
        assert_eq!(fold_username("straße"), "strasse");
    }

    #[test]
    fn test_composed_and_decomposed_forms_collide() {
        assert!(collide("Jos\u{e9}", "JOSE\u{301}"));
        assert!(collide("jose\u{301}", "JOS\u{c9}"));
        assert_eq!(fold_username("JOSE\u{301}"), "jos\u{e9}");
    }

    #[test]
    fn test_final_sigma() {
        assert!(collide("ΟΔΟΣ", "οδος"));
        assert!(collide("οδοσ", "οδος"));
    }

    #[test]
    fn test_distinct_names() {
        assert!(!collide("alice", "alicia"));
        assert!(!collide("bob", "bob "));
    }
}
