//! Session identifier format and uniqueness.

use std::collections::HashSet;

use proptest::prelude::*;
use runway_core::domain::identifier::{SESSION_ID_PREFIX, SESSION_ID_SUFFIX_LEN};
use runway_core::domain::{generate_session_id, validate_session_id};

#[test]
fn generated_ids_have_prefix_and_suffix_length() {
    for _ in 0..1_000 {
        let id = generate_session_id();
        let suffix = id
            .as_str()
            .strip_prefix(SESSION_ID_PREFIX)
            .unwrap_or_default();
        assert_eq!(suffix.len(), SESSION_ID_SUFFIX_LEN, "{id}");
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }
}

#[test]
fn ten_thousand_ids_are_distinct() {
    let ids: HashSet<String> = (0..10_000)
        .map(|_| generate_session_id().as_str().to_string())
        .collect();
    assert_eq!(ids.len(), 10_000);
}

proptest! {
    #[test]
    fn well_formed_ids_validate(suffix in "[a-z0-9]{8}") {
        let id = format!("repo-{suffix}");
        prop_assert!(validate_session_id(&id).is_ok());
    }

    #[test]
    fn ids_with_wrong_suffix_length_are_rejected(suffix in "[a-z0-9]{0,7}|[a-z0-9]{9,16}") {
        let id = format!("repo-{suffix}");
        prop_assert!(validate_session_id(&id).is_err());
    }

    #[test]
    fn ids_with_uppercase_are_rejected(suffix in "[a-z0-9]{7}[A-Z]") {
        let id = format!("repo-{suffix}");
        prop_assert!(validate_session_id(&id).is_err());
    }
}
