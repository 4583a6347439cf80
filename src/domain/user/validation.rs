//! Rules for login credentials

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use crate::domain::validation::{FieldErrors, FieldRule, Schema, ValidationMode};

/// Letters, digits and `@ . + - _`
static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9@.+_-]+$").expect("username pattern is a valid regex"));

static CREDENTIALS_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new()
        .field(
            "username",
            FieldRule::string()
                .required()
                .length(3, 150)
                .pattern(USERNAME_PATTERN.clone()),
        )
        .field("password", FieldRule::string().required().length(8, 128))
});

/// Checks a username/password pair before the user is stored
pub fn validate_credentials(username: &str, password: &str) -> Result<(), FieldErrors> {
    let payload = json!({"username": username, "password": password});
    CREDENTIALS_SCHEMA.validate(&payload, ValidationMode::Strict)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_login_names() {
        for username in ["admin", "user_name", "ada.lovelace@example", "tester-2"] {
            assert!(validate_credentials(username, "password123").is_ok());
        }
    }

    #[test]
    fn test_rejects_space_in_username() {
        let errors = validate_credentials("ada lovelace", "password123").unwrap_err();

        assert_eq!(
            errors.get("username").unwrap(),
            ["value does not match regex '^[a-zA-Z0-9@.+_-]+$'"]
        );
        assert!(!errors.contains("password"));
    }

    #[test]
    fn test_reports_both_fields() {
        let errors = validate_credentials("ab", "short").unwrap_err();

        assert_eq!(errors.get("username").unwrap(), ["min length is 3"]);
        assert_eq!(errors.get("password").unwrap(), ["min length is 8"]);
    }

    #[test]
    fn test_password_upper_bound() {
        let errors = validate_credentials("admin", &"a".repeat(129)).unwrap_err();
        assert_eq!(errors.get("password").unwrap(), ["max length is 128"]);
    }
}
