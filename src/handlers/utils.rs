// handlers/utils.rs - Request validation helpers shared by handlers

use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::auth;
use crate::database::StoreError;
use crate::error::{ApiError, ApiResult};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Bearer token issued on login and registration
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

/// Trimmed value of a required text field
pub fn required(field: &str, value: &str) -> ApiResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::invalid_field(field, format!("{} is required", field)));
    }
    Ok(value.to_string())
}

/// Trimmed optional text; blank becomes `None`
pub fn optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Lower-cased address with a plausible `local@domain.tld` shape
pub fn normalize_email(field: &str, raw: &str) -> ApiResult<String> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(ApiError::invalid_field(field, "Invalid email format"));
    }
    Ok(email)
}

pub fn validate_password(password: &str) -> ApiResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::invalid_field(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    Ok(())
}

pub fn hash_password(password: &str, cost: u32) -> ApiResult<String> {
    validate_password(password)?;
    Ok(auth::hash_password(password, cost)?)
}

/// `YYYY-MM-DD`
pub fn parse_date(field: &str, raw: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::invalid_field(field, format!("{} must be a date in YYYY-MM-DD format", field)))
}

pub fn parse_optional_date(field: &str, raw: Option<&str>) -> ApiResult<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => parse_date(field, s).map(Some),
        None => Ok(None),
    }
}

/// Parses one of the closed string sets declared with `string_enum!`
pub fn parse_choice<T: FromStr<Err = String>>(field: &str, raw: &str) -> ApiResult<T> {
    raw.parse().map_err(|e: String| ApiError::invalid_field(field, e))
}

/// Turns a unique-key clash into a 400 with a caller-facing message
pub fn duplicate_as_bad_request(message: &'static str) -> impl Fn(StoreError) -> ApiError {
    move |err| match err {
        StoreError::Duplicate(_) => ApiError::bad_request(message),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_normalization() {
        assert_eq!(normalize_email("email", " John@Example.COM ").unwrap(), "john@example.com");
        for bad in ["", "john", "john@", "@x.com", "a@b", "a@@b.com", "a b@x.com", "a@x.com."] {
            assert!(normalize_email("email", bad).is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn required_and_optional_text() {
        assert_eq!(required("name", "  Ann ").unwrap(), "Ann");
        assert_eq!(required("name", "   ").unwrap_err().status_code(), 400);
        assert_eq!(optional(Some("  ".into())), None);
        assert_eq!(optional(Some(" x ".into())), Some("x".into()));
    }

    #[test]
    fn dates_and_passwords() {
        assert!(parse_date("start_date", "2025-02-30").is_err());
        assert_eq!(parse_date("d", "2025-02-28").unwrap().to_string(), "2025-02-28");
        assert_eq!(parse_optional_date("d", Some("")).unwrap(), None);
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }
}
