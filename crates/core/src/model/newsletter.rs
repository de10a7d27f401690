use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::error::{FieldError, FieldErrors};
use crate::model::form;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NewsletterError {
    #[error("invalid email address")]
    InvalidEmail,
}

impl FieldError for NewsletterError {
    fn field(&self) -> &'static str {
        "email"
    }
}

/// A newsletter signup. Emails are unique across subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsletterSubscription {
    email: String,
    subscribed_at: DateTime<Utc>,
}

impl NewsletterSubscription {
    /// Validate a raw email. The address is trimmed and lower-cased.
    ///
    /// # Errors
    ///
    /// Returns `NewsletterError::InvalidEmail` for malformed addresses.
    pub fn new(
        email: &str,
        subscribed_at: DateTime<Utc>,
    ) -> Result<Self, FieldErrors<NewsletterError>> {
        if !form::is_valid_email(email) {
            return Err(NewsletterError::InvalidEmail.into());
        }
        Ok(Self {
            email: email.trim().to_lowercase(),
            subscribed_at,
        })
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn subscribed_at(&self) -> DateTime<Utc> {
        self.subscribed_at
    }
}
