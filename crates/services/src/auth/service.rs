use std::sync::Arc;

use shelf_core::model::Credentials;

use super::backend::{AuthBackend, SignUpOutcome};
use super::session::{AuthEvent, AuthUser, Session, SessionState, Subscription};
use crate::error::AuthError;

/// Sign-in, sign-up and sign-out on top of an [`AuthBackend`], keeping
/// [`SessionState`] in step.
#[derive(Clone)]
pub struct AuthService {
    backend: Arc<dyn AuthBackend>,
    state: SessionState,
}

impl AuthService {
    #[must_use]
    pub fn new(backend: Arc<dyn AuthBackend>, state: SessionState) -> Self {
        Self { backend, state }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Locally held session, without a backend round trip.
    #[must_use]
    pub fn current_session(&self) -> Option<Session> {
        self.state.current()
    }

    /// Validate the held token against the backend.
    ///
    /// Returns `Ok(None)` when nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` when the backend rejects the token or is unreachable.
    pub async fn current_user(&self) -> Result<Option<AuthUser>, AuthError> {
        let Some(session) = self.state.current() else {
            return Ok(None);
        };
        let user = self.backend.fetch_user(&session.access_token).await?;
        Ok(Some(user))
    }

    /// # Errors
    ///
    /// Returns `AuthError::Invalid` for malformed input before any network call,
    /// or the backend's rejection.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let credentials = Credentials::for_sign_in(email, password)?;
        let session = self.backend.sign_in_with_password(&credentials).await?;
        let user = session.user.clone();
        log::info!("signed in as {}", user.id);
        self.state.sign_in(session);
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns `AuthError::Invalid` for malformed input (password under six
    /// characters included), or the backend's rejection.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
        let credentials = Credentials::for_sign_up(email, password)?;
        let outcome = self.backend.sign_up(&credentials).await?;
        if let SignUpOutcome::SignedIn(session) = &outcome {
            self.state.sign_in(session.clone());
        }
        Ok(outcome)
    }

    /// End the session. Local state is cleared even when the backend call fails.
    ///
    /// # Errors
    ///
    /// Returns the backend failure after clearing local state.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(session) = self.state.current() else {
            return Err(AuthError::NotSignedIn);
        };
        let result = self.backend.sign_out(&session.access_token).await;
        self.state.clear();
        if let Err(err) = &result {
            log::warn!("backend sign-out failed, local session cleared anyway: {err}");
        }
        result
    }

    /// Adopt a previously persisted session.
    pub fn restore(&self, session: Session) {
        self.state.restore(session);
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(AuthEvent, Option<&Session>) + Send + Sync + 'static,
    {
        self.state.subscribe(listener)
    }
}
