//! Field guards shared by the use-cases.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::ClientError;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex should compile"))
}

pub fn is_valid_email(value: &str) -> bool {
    email_re().is_match(value)
}

/// Fails with `message` when `value` is empty or whitespace.
pub fn require(value: &str, message: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::validation(message));
    }
    Ok(())
}

pub fn require_email(value: &str, message: &str) -> Result<(), ClientError> {
    if !is_valid_email(value) {
        return Err(ClientError::validation(message));
    }
    Ok(())
}
