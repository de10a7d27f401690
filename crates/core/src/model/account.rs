use thiserror::Error;

use crate::error::{FieldError, FieldErrors};
use crate::model::form;

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccountError {
    #[error("invalid email address")]
    InvalidEmail,

    #[error("password is required")]
    MissingPassword,

    #[error("password must be at least 6 characters")]
    PasswordTooShort,
}

impl FieldError for AccountError {
    fn field(&self) -> &'static str {
        match self {
            AccountError::InvalidEmail => "email",
            AccountError::MissingPassword | AccountError::PasswordTooShort => "password",
        }
    }
}

/// Validated email + password pair.
///
/// `Debug` never prints the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// Credentials for signing in: any non-empty password.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn for_sign_in(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, FieldErrors<AccountError>> {
        Self::build(email.into(), password.into(), 1)
    }

    /// Credentials for creating an account: password of at least [`MIN_PASSWORD_LEN`].
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn for_sign_up(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, FieldErrors<AccountError>> {
        Self::build(email.into(), password.into(), MIN_PASSWORD_LEN)
    }

    fn build(
        email: String,
        password: String,
        min_len: usize,
    ) -> Result<Self, FieldErrors<AccountError>> {
        let mut errors = FieldErrors::new();
        if !form::is_valid_email(&email) {
            errors.push(AccountError::InvalidEmail);
        }
        if password.is_empty() {
            errors.push(AccountError::MissingPassword);
        } else if password.chars().count() < min_len {
            errors.push(AccountError::PasswordTooShort);
        }
        errors.finish(|| Self {
            email: email.trim().to_owned(),
            password,
        })
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}
