//! Client-side form validation
//!
//! Validation failures are scoped to a field and block submission before any
//! request is built. The server repeats its own checks; these rules only
//! exist so obvious mistakes never leave the client.

use crate::types::{
    CreateVolunteerRequest, CreateWorkshopRequest, InactivateVolunteerRequest, LoginRequest,
    RegisterRequest, UpdateVolunteerRequest, UpdateWorkshopRequest,
};
use std::fmt;

/// A validation failure attached to one form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All field errors found in one submission, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Record the outcome of a single-field check
    pub fn check(&mut self, result: Result<(), FieldError>) {
        if let Err(error) = result {
            self.errors.push(error);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// First message recorded for `field`, if any
    pub fn field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Trait for request payloads that can be checked before submission
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::email(&self.email, "email"));
        errors.check(validators::required(&self.password, "password"));
        errors.into_result()
    }
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::required(&self.name, "name"));
        errors.check(validators::email(&self.email, "email"));
        errors.check(validators::password_strength(&self.password, "password"));
        errors.into_result()
    }
}

impl Validate for CreateVolunteerRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::required(&self.name, "name"));
        errors.check(validators::email(&self.email, "email"));
        if self.is_academic {
            errors.check(validators::required_opt(self.course.as_deref(), "course"));
            errors.check(validators::required_opt(self.ra.as_deref(), "ra"));
        }
        errors.into_result()
    }
}

impl Validate for UpdateVolunteerRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            errors.check(validators::required(name, "name"));
        }
        if let Some(email) = &self.email {
            errors.check(validators::email(email, "email"));
        }
        if self.is_academic == Some(true) {
            errors.check(validators::required_opt(self.course.as_deref(), "course"));
            errors.check(validators::required_opt(self.ra.as_deref(), "ra"));
        }
        errors.into_result()
    }
}

impl Validate for InactivateVolunteerRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        // The exit date is typed; ordering against the entry date is checked server-side.
        Ok(())
    }
}

impl Validate for CreateWorkshopRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::workshop_name(&self.name, "name"));
        errors.into_result()
    }
}

impl Validate for UpdateWorkshopRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            errors.check(validators::workshop_name(name, "name"));
        }
        errors.into_result()
    }
}

/// Common validation helpers
pub mod validators {
    use super::FieldError;
    use regex::Regex;
    use std::sync::LazyLock;

    static EMAIL_PATTERN: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

    /// Minimum length of a workshop name
    pub const WORKSHOP_NAME_MIN_LEN: usize = 3;

    /// Minimum password length accepted by the backend
    pub const PASSWORD_MIN_LEN: usize = 8;

    fn fail(field: &'static str, message: impl Into<String>) -> Result<(), FieldError> {
        Err(FieldError {
            field,
            message: message.into(),
        })
    }

    /// Validate that a string is not blank
    pub fn required(value: &str, field: &'static str) -> Result<(), FieldError> {
        if value.trim().is_empty() {
            return fail(field, "is required");
        }
        Ok(())
    }

    /// Validate that an optional string is present and not blank
    pub fn required_opt(value: Option<&str>, field: &'static str) -> Result<(), FieldError> {
        required(value.unwrap_or_default(), field)
    }

    /// Validate email format
    pub fn email(value: &str, field: &'static str) -> Result<(), FieldError> {
        required(value, field)?;
        if !EMAIL_PATTERN.is_match(value.trim()) {
            return fail(field, "is not a valid email address");
        }
        Ok(())
    }

    /// Validate password length and character mix
    pub fn password_strength(value: &str, field: &'static str) -> Result<(), FieldError> {
        if value.chars().count() < PASSWORD_MIN_LEN {
            return fail(
                field,
                format!("must have at least {PASSWORD_MIN_LEN} characters"),
            );
        }
        let has_upper = value.chars().any(|c| c.is_ascii_uppercase());
        let has_lower = value.chars().any(|c| c.is_ascii_lowercase());
        let has_digit = value.chars().any(|c| c.is_ascii_digit());
        if !(has_upper && has_lower && has_digit) {
            return fail(field, "must mix uppercase, lowercase and digits");
        }
        Ok(())
    }

    /// Validate a workshop name
    pub fn workshop_name(value: &str, field: &'static str) -> Result<(), FieldError> {
        required(value, field)?;
        if value.trim().chars().count() < WORKSHOP_NAME_MIN_LEN {
            return fail(
                field,
                format!("must have at least {WORKSHOP_NAME_MIN_LEN} characters"),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn volunteer(is_academic: bool, course: Option<&str>) -> CreateVolunteerRequest {
        CreateVolunteerRequest {
            name: "Carla Dias".into(),
            email: "carla@ellp.org".into(),
            phone: None,
            is_academic,
            course: course.map(Into::into),
            ra: Some("a1234567".into()),
            entry_date: Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_non_academic_with_course_passes() {
        assert!(volunteer(false, Some("Matemática")).validate().is_ok());
        assert!(volunteer(false, None).validate().is_ok());
    }

    #[test]
    fn test_academic_without_course_fails_on_course_field() {
        let errors = volunteer(true, Some("   ")).validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.field("course"), Some("is required"));
        assert_eq!(errors.field("ra"), None);
    }

    #[test]
    fn test_email_pattern() {
        assert!(validators::email("a@b.com", "email").is_ok());
        assert!(validators::email("a@b", "email").is_err());
        assert!(validators::email("a b@c.com", "email").is_err());
        assert_eq!(
            validators::email("", "email").unwrap_err().message,
            "is required"
        );
    }

    #[test]
    fn test_register_password_rules() {
        let mut request = RegisterRequest {
            name: "Admin".into(),
            email: "admin@ellp.org".into(),
            password: "short".into(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field("password").unwrap().contains("at least 8"));

        request.password = "alllowercase1".into();
        assert!(request.validate().is_err());

        request.password = "Secret123".into();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_workshop_name_minimum_length() {
        let request = CreateWorkshopRequest {
            name: "AB".into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            description: None,
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.to_string(), "name: must have at least 3 characters");

        let update = UpdateWorkshopRequest {
            description: Some("nova descrição".into()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_update_switching_to_academic_requires_ra() {
        let update = UpdateVolunteerRequest {
            is_academic: Some(true),
            course: Some("Computação".into()),
            ..Default::default()
        };
        let errors = update.validate().unwrap_err();
        assert_eq!(errors.field("ra"), Some("is required"));
    }
}
