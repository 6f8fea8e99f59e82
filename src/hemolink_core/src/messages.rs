//! End-user wording for backend and transport failures.
//!
//! The raw message stays in `Session::error`; only the rendered banner uses
//! the translated text.

use crate::error::ApiError;

pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";
pub const NETWORK_FAILURE: &str =
    "Unable to reach the server. Check your connection and try again.";
pub const SESSION_EXPIRED: &str = "Your session has expired. Please sign in again.";

const TRANSLATIONS: &[(&str, &str)] = &[
    (
        "invalid credentials",
        "The email/phone number or password is incorrect.",
    ),
    (
        "wrong password",
        "The email/phone number or password is incorrect.",
    ),
    ("incorrect password", "The email/phone number or password is incorrect."),
    ("user not found", "No account exists for this email or phone number."),
    ("account not found", "No account exists for this email or phone number."),
    (
        "account is inactive",
        "This account has been deactivated. Contact support for help.",
    ),
    (
        "account is not active",
        "This account has been deactivated. Contact support for help.",
    ),
    ("email already exists", "An account with this email already exists."),
    ("email already in use", "An account with this email already exists."),
    ("phone already exists", "An account with this phone number already exists."),
    ("user already exists", "An account with these details already exists."),
    ("refresh token expired", SESSION_EXPIRED),
    ("invalid refresh token", SESSION_EXPIRED),
    ("no refresh token available", SESSION_EXPIRED),
    ("request timed out", NETWORK_FAILURE),
    ("network error", NETWORK_FAILURE),
];

/// Translate a stored error message for display.
pub fn translate(raw: &str) -> &'static str {
    let needle = raw.trim().to_lowercase();
    TRANSLATIONS
        .iter()
        .find(|(pattern, _)| needle.contains(pattern))
        .map(|(_, text)| *text)
        .unwrap_or(GENERIC_FAILURE)
}

/// Display text for an error that has not been stored yet.
pub fn describe(error: &ApiError) -> &'static str {
    if error.is_transport() {
        return NETWORK_FAILURE;
    }
    translate(&error.to_string())
}
