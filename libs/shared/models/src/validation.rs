use std::sync::OnceLock;

use regex::Regex;

use crate::error::AppError;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    if email_pattern().is_match(email.trim()) {
        Ok(())
    } else {
        Err(AppError::ValidationError(format!("Invalid email address: {}", email)))
    }
}

pub fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::ValidationError(format!("{} must not be empty", field)));
    }
    Ok(())
}
