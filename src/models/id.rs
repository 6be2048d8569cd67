// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Document identifiers.
//!
//! Ids are 24 lowercase hex characters: a 4-byte big-endian Unix-seconds
//! prefix followed by 8 random bytes. The time prefix makes ids roughly
//! insertion-ordered, so keyset pagination by id walks documents in the
//! order they were created.

/// Lowest possible document id, used as the default pagination cursor.
pub const MIN_DOC_ID: &str = "000000000000000000000000";

/// Length of a document id in hex characters.
pub const DOC_ID_LEN: usize = 24;

/// Generate a fresh document id.
pub fn new_doc_id() -> String {
    let secs = chrono::Utc::now().timestamp().max(0) as u32;
    let entropy = uuid::Uuid::new_v4();

    let mut id = format!("{:08x}", secs);
    for byte in &entropy.as_bytes()[..8] {
        id.push_str(&format!("{:02x}", byte));
    }
    id
}

/// Parse a client-supplied document id, normalizing to lowercase.
///
/// Returns `None` if the input is not exactly 24 hex characters.
pub fn parse_doc_id(raw: &str) -> Option<String> {
    if raw.len() != DOC_ID_LEN || !raw.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(raw.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_shape() {
        let id = new_doc_id();
        assert_eq!(id.len(), DOC_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!id.chars().any(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = new_doc_id();
        let b = new_doc_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_min_id_sorts_before_generated() {
        // String comparison is the pagination order, so MIN_DOC_ID must
        // compare below any real id.
        let id = new_doc_id();
        assert!(MIN_DOC_ID < id.as_str());
    }

    #[test]
    fn test_parse_accepts_valid_id() {
        assert_eq!(
            parse_doc_id("65a9c0ffee00112233445566"),
            Some("65a9c0ffee00112233445566".to_string())
        );
    }

    #[test]
    fn test_parse_normalizes_case() {
        assert_eq!(
            parse_doc_id("65A9C0FFEE00112233445566"),
            Some("65a9c0ffee00112233445566".to_string())
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(parse_doc_id(""), None);
        assert_eq!(parse_doc_id("65a9c0"), None);
        assert_eq!(parse_doc_id("65a9c0ffee0011223344556g"), None);
        assert_eq!(parse_doc_id("65a9c0ffee001122334455667"), None);
    }
}
