//! Resource-identifier validation.
//!
//! Base, table, view and record identifiers share one format: a first
//! character in `0-7` followed by 25 characters from a Crockford-style
//! base-32 alphabet (no I, L, O or U).

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RESOURCE_ID: Regex =
        Regex::new("^[0-7][0-9A-HJKMNP-TV-Z]{25}$").expect("resource id pattern is valid");
}

/// `true` if `id` is a well-formed base/table/view/record identifier.
pub fn is_valid_resource_id(id: &str) -> bool {
    RESOURCE_ID.is_match(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_identifiers() {
        assert!(is_valid_resource_id("0BASE000000000000000000000"));
        assert!(is_valid_resource_id("7ZYXWVTSRQPNMKJHGFEDCBA987"));
    }

    #[test]
    fn rejects_bad_first_character() {
        assert!(!is_valid_resource_id("8BASE000000000000000000000"));
        assert!(!is_valid_resource_id("ABASE000000000000000000000"));
    }

    #[test]
    fn rejects_excluded_alphabet_letters() {
        // I, L, O and U are not part of the alphabet.
        assert!(!is_valid_resource_id("0IIII000000000000000000000"));
        assert!(!is_valid_resource_id("0TABLE00000000000000000000"));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(!is_valid_resource_id("0SHORT"));
        assert!(!is_valid_resource_id("0BASE0000000000000000000000"));
        assert!(!is_valid_resource_id(""));
    }
}
