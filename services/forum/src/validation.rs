//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Rejected user input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Normalize an email address by lowercasing its domain part.
///
/// The local part is left alone, mail servers may treat it case-sensitively.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::new("email", "Email is required"));
    }

    if email.len() > 254 {
        return Err(ValidationError::new(
            "email",
            "Email must be at most 254 characters long",
        ));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(ValidationError::new("email", "Invalid email format"));
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::new("password", "Password is required"));
    }

    if password.len() < 8 {
        return Err(ValidationError::new(
            "password",
            "Password must be at least 8 characters long",
        ));
    }

    if password.len() > 128 {
        return Err(ValidationError::new(
            "password",
            "Password must be at most 128 characters long",
        ));
    }

    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new(
            "password",
            "Password cannot be entirely numeric",
        ));
    }

    Ok(())
}

/// Validate a display name or room/topic name
pub fn validate_name(field: &'static str, name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::new(field, "This field is required"));
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::new(
            field,
            "Must be at most 200 characters long",
        ));
    }

    Ok(())
}

/// Validate an avatar reference relative to the media root
pub fn validate_avatar(reference: &str) -> Result<(), ValidationError> {
    if reference.len() > 255 {
        return Err(ValidationError::new(
            "avatar",
            "Must be at most 255 characters long",
        ));
    }

    let escapes_root = reference.starts_with('/')
        || reference.starts_with('\\')
        || reference.split(['/', '\\']).any(|part| part == "..");
    if escapes_root {
        return Err(ValidationError::new(
            "avatar",
            "Must be a path inside the media directory",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email_lowercases_domain_only() {
        assert_eq!(normalize_email("Ada.Lovelace@Example.COM"), "Ada.Lovelace@example.com");
        assert_eq!(normalize_email("  bob@HOST.io "), "bob@host.io");
        assert_eq!(normalize_email("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("ada@").is_err());
        assert_eq!(validate_email("nope").unwrap_err().field, "email");
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("correct horse").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password("1234567890").is_err());
        assert!(validate_password(&"a".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Rustaceans").is_ok());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"n".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_avatar_stays_inside_media_root() {
        assert!(validate_avatar("avatar.svg").is_ok());
        assert!(validate_avatar("uploads/ada.png").is_ok());
        assert!(validate_avatar("").is_ok());
        assert!(validate_avatar("../settings.toml").is_err());
        assert!(validate_avatar("uploads/../../etc/passwd").is_err());
        assert!(validate_avatar("/etc/passwd").is_err());
    }
}
