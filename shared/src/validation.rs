//! Input validation functions
//!
//! Username rules are plain functions; workout rules are declared with the
//! `validator` derive on [`crate::types::WorkoutDraft`] and flattened into
//! human-readable messages here.

use validator::ValidationErrors;

/// Minimum username length, counted in characters
pub const MIN_USERNAME_LEN: usize = 4;

/// Validate a username
///
/// Usernames are compared case-sensitively by the store, so no
/// normalization happens here.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(format!(
            "Username must be at least {} characters long",
            MIN_USERNAME_LEN
        ));
    }
    Ok(())
}

/// Flatten `validator` errors into messages, ordered by field name
pub fn collect_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("Chris")]
    #[case("Will")]
    #[case("mathias_99")]
    #[case("ÄÖÜß")]
    fn test_valid_usernames(#[case] username: &str) {
        assert!(validate_username(username).is_ok());
    }

    #[rstest]
    #[case("", "Username is required")]
    #[case("abc", "Username must be at least 4 characters long")]
    #[case("x", "Username must be at least 4 characters long")]
    fn test_invalid_usernames(#[case] username: &str, #[case] expected: &str) {
        assert_eq!(validate_username(username).unwrap_err(), expected);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_short_usernames_rejected(username in "[a-zA-Z0-9]{1,3}") {
            prop_assert!(validate_username(&username).is_err());
        }

        #[test]
        fn prop_long_enough_usernames_accepted(username in "[a-zA-Z0-9_]{4,64}") {
            prop_assert!(validate_username(&username).is_ok());
        }
    }
}
