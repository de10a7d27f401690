use async_trait::async_trait;
use shelf_core::model::Credentials;

use super::session::{AuthUser, Session};
use crate::error::AuthError;

/// Result of a sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The account exists but must be confirmed from the emailed link.
    ConfirmationSent(AuthUser),
    /// Email confirmation is disabled; the user is signed in right away.
    SignedIn(Session),
}

/// Contract for the hosted auth API.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` for wrong credentials, or transport errors.
    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session, AuthError>;

    /// # Errors
    ///
    /// Returns `AuthError::Rejected` when the backend refuses the account, or transport errors.
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, AuthError>;

    /// Revoke the session behind `access_token`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the backend call fails.
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;

    /// Validate `access_token` and return its user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` for invalid or expired tokens, or transport errors.
    async fn fetch_user(&self, access_token: &str) -> Result<AuthUser, AuthError>;
}
