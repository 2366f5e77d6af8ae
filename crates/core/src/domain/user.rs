//! Signup draft and credential validation.

use artlog_common::{error::codes, AppError, AppResult};

const NICKNAME_MIN: usize = 2;
const NICKNAME_MAX: usize = 20;
const PASSWORD_MIN: usize = 8;
const PASSWORD_MAX: usize = 64;

/// A validated signup payload.
#[derive(Debug, Clone)]
pub struct SignupDraft {
    /// Account email.
    pub email: String,
    /// Display nickname, 2..=20 chars.
    pub nickname: String,
    /// Plain password, hashed before storage.
    pub password: String,
}

impl SignupDraft {
    /// Validate raw input into a draft.
    pub fn new(email: String, nickname: String, password: String) -> AppResult<Self> {
        validate_email(&email)?;
        validate_nickname(&nickname)?;
        validate_password(&password)?;

        Ok(Self {
            email,
            nickname,
            password,
        })
    }
}

/// Email must be non-blank and shaped like `local@domain.tld`.
pub fn validate_email(email: &str) -> AppResult<()> {
    if !validator::ValidateEmail::validate_email(&email) {
        return Err(AppError::invalid(
            codes::INVALID_EMAIL_FORMAT,
            "email format is invalid",
        ));
    }
    Ok(())
}

/// Nickname must be 2..=20 chars, non-blank.
pub fn validate_nickname(nickname: &str) -> AppResult<()> {
    let len = nickname.chars().count();
    if nickname.trim().is_empty() || !(NICKNAME_MIN..=NICKNAME_MAX).contains(&len) {
        return Err(AppError::invalid(
            codes::INVALID_NICKNAME_LENGTH,
            "nickname must be 2 to 20 characters",
        ));
    }
    Ok(())
}

/// Password must be 8..=64 chars.
pub fn validate_password(password: &str) -> AppResult<()> {
    let len = password.chars().count();
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
        return Err(AppError::invalid(
            codes::INVALID_PASSWORD_LENGTH,
            "password must be 8 to 64 characters",
        ));
    }
    Ok(())
}
