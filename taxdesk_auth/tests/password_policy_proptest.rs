//! Property-based tests for the password strength policy using proptest
//!
//! These tests check the policy against randomly generated passwords built
//! to contain, or to lack, each required character class.

use proptest::prelude::*;
use taxdesk_auth::auth::{AuthError, validate_password};

// Strategy to generate a password containing every required class
fn strong_password_strategy() -> impl Strategy<Value = String> {
    (
        "[a-z]{1,4}",
        "[A-Z]{1,4}",
        "[0-9]{1,4}",
        "[!@#$%^&*_ ]{1,4}",
        "[a-zA-Z0-9]{4,12}",
    )
        .prop_map(|(lower, upper, digit, special, filler)| {
            format!("{filler}{upper}{special}{lower}{digit}")
        })
}

proptest! {
    #[test]
    fn strong_passwords_accepted(password in strong_password_strategy()) {
        prop_assert!(validate_password(&password).is_ok());
    }

    #[test]
    fn short_passwords_rejected(password in ".{0,7}") {
        prop_assert!(matches!(
            validate_password(&password),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn missing_uppercase_rejected(password in "[a-z0-9!@#_]{8,24}") {
        prop_assert!(validate_password(&password).is_err());
    }

    #[test]
    fn missing_lowercase_rejected(password in "[A-Z0-9!@#_]{8,24}") {
        prop_assert!(validate_password(&password).is_err());
    }

    #[test]
    fn missing_digit_rejected(password in "[a-zA-Z!@#_]{8,24}") {
        prop_assert!(validate_password(&password).is_err());
    }

    #[test]
    fn missing_special_rejected(password in "[a-zA-Z0-9]{8,24}") {
        prop_assert!(validate_password(&password).is_err());
    }

    #[test]
    fn newline_anywhere_rejected(
        password in strong_password_strategy(),
        at in 0usize..8,
    ) {
        let mut chars: Vec<char> = password.chars().collect();
        chars.insert(at.min(chars.len()), '\n');
        let with_newline: String = chars.into_iter().collect();
        prop_assert!(validate_password(&with_newline).is_err());
    }
}
