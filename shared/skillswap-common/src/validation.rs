//! Client-side validation rules.
//!
//! These run before any network call. The server re-validates everything; these
//! checks only exist to give the user immediate, specific feedback.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use validator::ValidationError;

use crate::types::{MAX_STARS, MIN_STARS};

/// Largest accepted profile photo.
pub const MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;

/// Extensions accepted for profile photos.
pub const PHOTO_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// Throwaway mailbox providers refused at registration.
pub const DISPOSABLE_DOMAINS: [&str; 6] = [
    "tempmail.com",
    "10minutemail.com",
    "guerrillamail.com",
    "mailinator.com",
    "yopmail.com",
    "throwaway.com",
];

/// Characters that satisfy the "special character" password check.
pub const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Minimum length of a skill name after trimming.
pub const MIN_SKILL_NAME_LEN: usize = 3;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z\s'-]+$").unwrap());

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Display text of a validation error.
pub fn message_of(error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map_or_else(|| format!("{} is invalid", error.code), |m| m.to_string())
}

// ============================================================================
// Identity
// ============================================================================

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(invalid("required", "Email is required"));
    }
    if !EMAIL_REGEX.is_match(trimmed) {
        return Err(invalid("email", "Please enter a valid email address"));
    }

    let normalized = trimmed.to_lowercase();
    let domain = normalized.split('@').nth(1).unwrap_or_default();
    if DISPOSABLE_DOMAINS.contains(&domain) {
        return Err(invalid("disposable_email", "Please use a valid email address"));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let cleaned = name.trim();
    if cleaned.is_empty() {
        return Err(invalid("required", "Name is required"));
    }
    let len = cleaned.chars().count();
    if len < 2 {
        return Err(invalid("length", "Name must be at least 2 characters long"));
    }
    if len > 50 {
        return Err(invalid("length", "Name must be no more than 50 characters long"));
    }
    if !NAME_REGEX.is_match(cleaned) {
        return Err(invalid(
            "characters",
            "Name can only contain letters, spaces, hyphens, and apostrophes",
        ));
    }
    if cleaned.contains("  ") {
        return Err(invalid(
            "spaces",
            "Name cannot contain multiple consecutive spaces",
        ));
    }
    Ok(())
}

/// Location is optional; when present it must be 2–100 characters.
pub fn validate_location(location: &str) -> Result<(), ValidationError> {
    let cleaned = location.trim();
    if cleaned.is_empty() {
        return Ok(());
    }
    let len = cleaned.chars().count();
    if len < 2 {
        return Err(invalid("length", "Location must be at least 2 characters long"));
    }
    if len > 100 {
        return Err(invalid("length", "Location must be no more than 100 characters long"));
    }
    Ok(())
}

// ============================================================================
// Passwords
// ============================================================================

/// Individual password checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasswordChecks {
    pub length: bool,
    pub lowercase: bool,
    pub uppercase: bool,
    pub number: bool,
    pub special: bool,
}

/// Score out of five plus the checks that produced it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasswordStrength {
    pub score: u8,
    pub checks: PasswordChecks,
}

impl PasswordStrength {
    /// Character classes present, ignoring the length check (0–4).
    pub const fn variety(&self) -> u8 {
        self.checks.lowercase as u8
            + self.checks.uppercase as u8
            + self.checks.number as u8
            + self.checks.special as u8
    }

    /// Short label for a strength meter.
    pub const fn label(&self) -> &'static str {
        match self.score {
            0..=2 => "weak",
            3 => "fair",
            4 => "good",
            _ => "strong",
        }
    }
}

pub fn password_strength(password: &str) -> PasswordStrength {
    let checks = PasswordChecks {
        length: password.chars().count() >= 8,
        lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
        uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
        number: password.chars().any(|c| c.is_ascii_digit()),
        special: password.chars().any(|c| SPECIAL_CHARS.contains(c)),
    };
    let score = [
        checks.length,
        checks.lowercase,
        checks.uppercase,
        checks.number,
        checks.special,
    ]
    .into_iter()
    .filter(|passed| *passed)
    .count() as u8;

    PasswordStrength { score, checks }
}

/// Accepts iff the password is at least 8 characters and mixes at least three
/// character classes, the same bar registration applies server-side.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(invalid("required", "Password is required"));
    }
    if password.chars().count() < 8 {
        return Err(invalid("length", "Password must be at least 8 characters long"));
    }
    let strength = password_strength(password);
    if strength.score < 3 || strength.variety() < 3 {
        return Err(invalid(
            "weak",
            "Password is too weak. Include lowercase, uppercase, numbers, and special characters",
        ));
    }
    Ok(())
}

/// Login only requires a non-empty password.
pub fn validate_login_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(invalid("required", "Password is required"));
    }
    Ok(())
}

pub fn validate_confirm_password(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if confirm.is_empty() {
        return Err(invalid("required", "Please confirm your password"));
    }
    if password != confirm {
        return Err(invalid("mismatch", "Passwords do not match"));
    }
    Ok(())
}

// ============================================================================
// Photos
// ============================================================================

/// Metadata of a photo picked for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoMeta {
    pub file_name: String,
    pub size: u64,
    pub mime: String,
}

pub fn validate_photo(photo: &PhotoMeta) -> Result<(), ValidationError> {
    if photo.size > MAX_PHOTO_BYTES {
        return Err(invalid("size", "File size must be less than 5MB"));
    }
    if !photo.mime.starts_with("image/") {
        return Err(invalid("mime", "Please select an image file"));
    }
    let name = photo.file_name.to_lowercase();
    if !PHOTO_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
        return Err(invalid(
            "extension",
            "Please select a valid image file (JPG, PNG, GIF, or WebP)",
        ));
    }
    Ok(())
}

// ============================================================================
// Skills and ratings
// ============================================================================

pub fn validate_skill_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().chars().count() < MIN_SKILL_NAME_LEN {
        return Err(invalid(
            "length",
            "Skill name must be at least 3 characters long",
        ));
    }
    Ok(())
}

pub fn validate_stars(stars: u8) -> Result<(), ValidationError> {
    if stars == 0 {
        return Err(invalid("required", "Please select a rating"));
    }
    if !(MIN_STARS..=MAX_STARS).contains(&stars) {
        return Err(invalid("range", "Rating must be between 1 and 5 stars"));
    }
    Ok(())
}
