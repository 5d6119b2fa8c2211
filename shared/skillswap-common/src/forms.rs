//! Form models with field-level validation.
//!
//! Each form validates before anything is sent and reports the first problem per
//! field, keyed by field name, so a front end can show it inline.

use std::collections::BTreeMap;

use validator::{Validate, ValidationErrors};

use crate::types::{LoginRequest, NewSkill, RegisterRequest, SkillLevel, SkillType};
use crate::validation::{
    message_of, validate_confirm_password, validate_email, validate_location,
    validate_login_password, validate_name, validate_password, validate_photo,
    validate_skill_name, PhotoMeta,
};

/// Field name → first error message.
pub type FormErrors = BTreeMap<String, String>;

/// Flatten `validator` output into one message per field.
pub fn collect_errors(errors: &ValidationErrors) -> FormErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| errs.first().map(|e| (field.to_string(), message_of(e))))
        .collect()
}

fn trimmed_or_none(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

// ============================================================================
// Login
// ============================================================================

#[derive(Debug, Clone, Default, Validate)]
pub struct LoginForm {
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    #[validate(custom(function = "validate_login_password"))]
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn check(&self) -> Result<(), FormErrors> {
        self.validate().map_err(|e| collect_errors(&e))
    }

    /// Wire payload with the email normalized.
    pub fn to_request(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.trim().to_lowercase(),
            password: self.password.clone(),
        }
    }
}

// ============================================================================
// Registration
// ============================================================================

#[derive(Debug, Clone, Validate)]
pub struct RegisterForm {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
    /// Checked against `password` in [`RegisterForm::check`].
    pub confirm_password: String,
    #[validate(custom(function = "validate_location"))]
    pub location: Option<String>,
    pub availability: Option<String>,
    #[validate(custom(function = "validate_photo"))]
    pub photo: Option<PhotoMeta>,
    pub is_public: bool,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            location: None,
            availability: None,
            photo: None,
            is_public: true,
        }
    }
}

impl RegisterForm {
    pub fn check(&self) -> Result<(), FormErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FormErrors::new(),
            Err(e) => collect_errors(&e),
        };
        if let Err(e) = validate_confirm_password(&self.password, &self.confirm_password) {
            errors.insert("confirm_password".to_string(), message_of(&e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Wire payload. `photo_path` comes from a prior upload.
    pub fn to_request(&self, photo_path: Option<String>) -> RegisterRequest {
        RegisterRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            password: self.password.clone(),
            location: trimmed_or_none(self.location.as_deref()),
            photo_path,
            availability: trimmed_or_none(self.availability.as_deref()),
            is_public: self.is_public,
        }
    }
}

// ============================================================================
// Skills
// ============================================================================

#[derive(Debug, Clone, Validate)]
pub struct SkillForm {
    #[validate(custom(function = "validate_skill_name"))]
    pub name: String,
    pub skill_type: SkillType,
    pub level: SkillLevel,
    pub description: Option<String>,
}

impl SkillForm {
    pub fn new(name: impl Into<String>, skill_type: SkillType, level: SkillLevel) -> Self {
        Self {
            name: name.into(),
            skill_type,
            level,
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn check(&self) -> Result<(), FormErrors> {
        self.validate().map_err(|e| collect_errors(&e))
    }

    pub fn to_request(&self) -> NewSkill {
        NewSkill {
            name: self.name.trim().to_string(),
            skill_type: self.skill_type,
            level: self.level,
            description: trimmed_or_none(self.description.as_deref()),
        }
    }
}
