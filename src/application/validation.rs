//! Client-side form checks. A failure here never reaches the network.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::application::models::athlete::AthletePayload;
use crate::application::models::matches::{MatchPayload, SetPayload};
use crate::application::models::team::TeamPayload;
use crate::application::models::user::CreateUserPayload;
use crate::constants::{MAX_JERSEY_NUMBER, MIN_PASSWORD_LENGTH};
use crate::error::ValidationError;

static EMAIL_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Highest set number a best-of-five match can reach.
const MAX_SETS: u8 = 5;

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

pub fn validate_required(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "This field is required"));
    }
    Ok(())
}

pub fn validate_email(field: &str, value: &str) -> Result<(), ValidationError> {
    validate_required(field, value)?;
    let valid = EMAIL_RE
        .as_ref()
        .map(|re| re.is_match(value.trim()))
        .unwrap_or(false);
    if !valid {
        return Err(ValidationError::new(field, "Invalid email address"));
    }
    Ok(())
}

pub fn validate_password(field: &str, value: &str) -> Result<(), ValidationError> {
    validate_required(field, value)?;
    if value.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::new(
            field,
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        ));
    }
    Ok(())
}

pub fn validate_password_confirmation(
    password: &str,
    confirmation: &str,
) -> Result<(), ValidationError> {
    if password != confirmation {
        return Err(ValidationError::new(
            "confirmPassword",
            "Passwords do not match",
        ));
    }
    Ok(())
}

pub fn validate_jersey_number(number: Option<u8>) -> Result<(), ValidationError> {
    match number {
        Some(n) if n > MAX_JERSEY_NUMBER => Err(ValidationError::new(
            "jerseyNumber",
            format!("Jersey number must be between 0 and {MAX_JERSEY_NUMBER}"),
        )),
        _ => Ok(()),
    }
}

impl Validate for AthletePayload {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_required("firstName", &self.first_name)?;
        validate_required("lastName", &self.last_name)?;
        validate_jersey_number(self.jersey_number)
    }
}

impl Validate for TeamPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_required("name", &self.name)
    }
}

impl Validate for CreateUserPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_email("email", &self.email)?;
        validate_required("firstName", &self.first_name)?;
        validate_required("lastName", &self.last_name)?;
        match &self.password {
            Some(password) => validate_password("password", password),
            None => Ok(()),
        }
    }
}

impl Validate for MatchPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_required("opponent", &self.opponent)
    }
}

impl Validate for SetPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.number == 0 || self.number > MAX_SETS {
            return Err(ValidationError::new(
                "number",
                format!("Set number must be between 1 and {MAX_SETS}"),
            ));
        }
        Ok(())
    }
}
