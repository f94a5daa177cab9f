use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::LazyLock;

static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("valid mobile pattern"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"));

/// Upper bound on an uploaded profile image, before base64 encoding.
pub const MAX_PROFILE_IMAGE_BYTES: usize = 800 * 1024;

/// Profile images arrive as `data:image/<type>;base64,<payload>` URLs.
pub fn validate_profile_image(image: &str) -> AppResult<()> {
    let payload = image
        .strip_prefix("data:image/")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| payload)
        .ok_or_else(|| {
            AppError::ValidationError("Profile image must be a base64 image data URL".to_string())
        })?;
    let padding = payload.bytes().rev().take_while(|b| *b == b'=').count();
    let decoded = (payload.len() / 4 * 3).saturating_sub(padding);
    if decoded > MAX_PROFILE_IMAGE_BYTES {
        return Err(AppError::ValidationError(
            "Image too large (max 800KB)".to_string(),
        ));
    }
    Ok(())
}

/// Strips spaces, dashes and parentheses users like to type.
pub fn normalize_mobile(mobile: &str) -> String {
    mobile
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect()
}

pub fn validate_mobile(mobile: &str) -> AppResult<()> {
    if !MOBILE_RE.is_match(mobile) {
        return Err(AppError::ValidationError(
            "Mobile number must be 10 to 15 digits, optionally prefixed with +".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> AppResult<()> {
    if !EMAIL_RE.is_match(email) {
        return Err(AppError::ValidationError("Invalid email address".to_string()));
    }
    Ok(())
}

pub fn require_non_empty(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::ValidationError(format!("{field} is required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_mobile() {
        assert!(validate_mobile("9876543210").is_ok());
        assert!(validate_mobile("+919876543210").is_ok());
        assert!(validate_mobile("98765").is_err());
        assert!(validate_mobile("98765abcde").is_err());
        assert!(validate_mobile("").is_err());
    }

    #[test]
    fn test_normalize_mobile() {
        assert_eq!(normalize_mobile("+91 98765-43210"), "+919876543210");
        assert_eq!(normalize_mobile("(987) 654 3210"), "9876543210");
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("owner@shop.in").is_ok());
        assert!(validate_email("owner@shop").is_err());
        assert!(validate_email("no at sign.com").is_err());
    }

    #[test]
    fn test_validate_profile_image() {
        assert!(validate_profile_image("data:image/png;base64,iVBORw0KGgo=").is_ok());
        assert!(validate_profile_image("https://cdn.example.com/me.png").is_err());
        assert!(validate_profile_image("data:text/plain;base64,aGVsbG8=").is_err());

        let at_limit = format!("data:image/jpeg;base64,{}", "A".repeat(MAX_PROFILE_IMAGE_BYTES / 3 * 4));
        assert!(validate_profile_image(&at_limit).is_ok());
        let too_big = format!("data:image/jpeg;base64,{}", "A".repeat(MAX_PROFILE_IMAGE_BYTES / 3 * 4 + 4));
        assert!(validate_profile_image(&too_big).is_err());
    }

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("Store name", "Kirana").is_ok());
        let err = require_non_empty("Store name", "   ").unwrap_err();
        assert!(err.to_string().contains("Store name is required"));
    }
}
