// src/models/user.rs

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique login e-mail.
    pub email: String,

    pub full_name: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Profile of the current user.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub attempts_count: i64,
    pub best_score: Option<i32>,
}

/// DTO for creating a new account.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(custom(function = validate_name))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords don't match"))]
    pub confirm_password: String,
}

impl SignupRequest {
    /// Trims the free-text fields and lowercases the e-mail before validation.
    pub fn normalized(self) -> Self {
        SignupRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            ..self
        }
    }
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl LoginRequest {
    pub fn normalized(self) -> Self {
        LoginRequest {
            email: self.email.trim().to_lowercase(),
            ..self
        }
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.chars().count();
    if len < 2 {
        return Err(ValidationError::new("name_too_short")
            .with_message(Cow::Borrowed("Name must be at least 2 characters")));
    }
    if len > 100 {
        return Err(
            ValidationError::new("name_too_long").with_message(Cow::Borrowed("Name too long"))
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::describe_validation_errors;

    fn signup(name: &str, email: &str, password: &str, confirm: &str) -> SignupRequest {
        SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
        .normalized()
    }

    fn message(req: &SignupRequest) -> String {
        describe_validation_errors(&req.validate().unwrap_err())
    }

    #[test]
    fn valid_signup_passes() {
        let req = signup("  Ada Lovelace ", " ada@example.com ", "secret1", "secret1");
        assert!(req.validate().is_ok());
        assert_eq!(req.name, "Ada Lovelace");
        assert_eq!(req.email, "ada@example.com");
    }

    #[test]
    fn signup_rejects_bad_email() {
        let req = signup("Ada", "not-an-email", "secret1", "secret1");
        assert_eq!(message(&req), "Invalid email address");
    }

    #[test]
    fn signup_rejects_short_password() {
        let req = signup("Ada", "ada@example.com", "12345", "12345");
        assert_eq!(message(&req), "Password must be at least 6 characters");
    }

    #[test]
    fn signup_rejects_mismatched_confirmation() {
        let req = signup("Ada", "ada@example.com", "secret1", "secret2");
        assert_eq!(message(&req), "Passwords don't match");
    }

    #[test]
    fn signup_checks_name_length_after_trim() {
        let req = signup("  A  ", "ada@example.com", "secret1", "secret1");
        assert_eq!(message(&req), "Name must be at least 2 characters");

        let long = "x".repeat(101);
        let req = signup(&long, "ada@example.com", "secret1", "secret1");
        assert_eq!(message(&req), "Name too long");
    }

    #[test]
    fn login_validation() {
        let ok = LoginRequest {
            email: " ada@example.com".to_string(),
            password: "secret1".to_string(),
        }
        .normalized();
        assert!(ok.validate().is_ok());

        let bad = LoginRequest {
            email: "ada".to_string(),
            password: "123".to_string(),
        };
        let msg = describe_validation_errors(&bad.validate().unwrap_err());
        assert_eq!(
            msg,
            "Invalid email address; Password must be at least 6 characters"
        );
    }
}
