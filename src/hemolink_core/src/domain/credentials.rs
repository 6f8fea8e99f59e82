//! Client-side validation of sign-in and sign-up input.
//!
//! Invalid input is reported per field and never sent to the backend.

use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, Utc};
use regex::Regex;
use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

pub const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{9,15}$").expect("valid phone regex"));
static ID_CARD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[0-9]{9}|[0-9]{12})$").expect("valid id card regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    EmailOrPhone,
    Email,
    Password,
    FullName,
    Phone,
    YearOfBirth,
    IdCard,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::EmailOrPhone => "emailOrPhone",
            Field::Email => "email",
            Field::Password => "password",
            Field::FullName => "fullName",
            Field::Phone => "phone",
            Field::YearOfBirth => "yob",
            Field::IdCard => "idCard",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: Field,
    pub message: &'static str,
}

impl ValidationError {
    fn new(field: Field, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// All field errors of one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("Invalid input: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    /// Message to show next to `field`, if it failed.
    pub fn for_field(&self, field: Field) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn push<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.0.push(error);
                None
            }
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

fn is_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

/// Login identifier: either an email address or a phone number.
#[derive(Debug, Clone)]
pub struct EmailOrPhone(Secret<String>);

impl EmailOrPhone {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(ValidationError::new(
                Field::EmailOrPhone,
                "Email or phone number is required",
            ));
        }
        if !is_email(value) && !is_phone(value) {
            return Err(ValidationError::new(
                Field::EmailOrPhone,
                "Enter a valid email address or phone number",
            ));
        }
        Ok(Self(Secret::new(value.to_string())))
    }

    pub fn is_phone(&self) -> bool {
        is_phone(self.0.expose_secret())
    }
}

impl AsRef<Secret<String>> for EmailOrPhone {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl Password {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.is_empty() {
            return Err(ValidationError::new(Field::Password, "Password is required"));
        }
        if raw.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::new(
                Field::Password,
                "Password must be at least 6 characters",
            ));
        }
        Ok(Self(Secret::new(raw.to_string())))
    }
}

impl AsRef<Secret<String>> for Password {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

/// Validated sign-in credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email_or_phone: EmailOrPhone,
    pub password: Password,
}

impl Credentials {
    pub fn parse(email_or_phone: &str, password: &str) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let email_or_phone = errors.push(EmailOrPhone::parse(email_or_phone));
        let password = errors.push(Password::parse(password));

        match (email_or_phone, password) {
            (Some(email_or_phone), Some(password)) => Ok(Self {
                email_or_phone,
                password,
            }),
            _ => Err(errors),
        }
    }
}

/// Raw registration form as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub sex: Option<String>,
    pub yob: Option<i32>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub id_card: Option<String>,
}

/// Registration fields that passed validation.
#[derive(Debug, Clone)]
pub struct SignUpData {
    pub email: String,
    pub password: Password,
    pub full_name: Option<String>,
    pub sex: Option<String>,
    pub yob: Option<i32>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub id_card: Option<String>,
}

impl SignUpData {
    pub fn parse(form: SignUpForm) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let email = form.email.trim().to_string();
        if email.is_empty() {
            errors
                .0
                .push(ValidationError::new(Field::Email, "Email is required"));
        } else if !is_email(&email) {
            errors.0.push(ValidationError::new(
                Field::Email,
                "Enter a valid email address",
            ));
        }

        let password = errors.push(Password::parse(&form.password));

        let full_name = non_blank(form.full_name);
        if full_name.as_deref().is_some_and(|name| name.chars().count() < 2) {
            errors.0.push(ValidationError::new(
                Field::FullName,
                "Full name is too short",
            ));
        }

        let phone = non_blank(form.phone);
        if phone.as_deref().is_some_and(|phone| !is_phone(phone)) {
            errors.0.push(ValidationError::new(
                Field::Phone,
                "Enter a valid phone number",
            ));
        }

        if let Some(yob) = form.yob {
            if !is_plausible_yob(yob, Utc::now().year()) {
                errors.0.push(ValidationError::new(
                    Field::YearOfBirth,
                    "Enter a valid year of birth",
                ));
            }
        }

        let id_card = non_blank(form.id_card);
        if id_card.as_deref().is_some_and(|id| !ID_CARD_RE.is_match(id)) {
            errors.0.push(ValidationError::new(
                Field::IdCard,
                "ID card number must have 9 or 12 digits",
            ));
        }

        match password {
            Some(password) if errors.is_empty() => Ok(Self {
                email,
                password,
                full_name,
                sex: non_blank(form.sex),
                yob: form.yob,
                phone,
                address: non_blank(form.address),
                id_card,
            }),
            _ => Err(errors),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_plausible_yob(yob: i32, this_year: i32) -> bool {
    (1900..=this_year).contains(&yob)
}
