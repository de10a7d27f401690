use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use shelf_core::model::{Credentials, UserId};
use uuid::Uuid;

use super::backend::{AuthBackend, SignUpOutcome};
use super::session::{AuthUser, Session};
use crate::error::AuthError;

#[derive(Default)]
struct Accounts {
    by_email: HashMap<String, (UserId, String, bool)>,
    tokens: HashMap<String, UserId>,
    emails: HashMap<UserId, String>,
}

/// In-process auth backend for tests and offline use.
///
/// With `require_confirmation`, new accounts answer sign-up with
/// `ConfirmationSent` and refuse to sign in until [`InMemoryAuth::confirm`].
#[derive(Clone, Default)]
pub struct InMemoryAuth {
    accounts: Arc<Mutex<Accounts>>,
    require_confirmation: bool,
}

impl InMemoryAuth {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn requiring_confirmation() -> Self {
        Self {
            require_confirmation: true,
            ..Self::default()
        }
    }

    fn accounts(&self) -> Result<std::sync::MutexGuard<'_, Accounts>, AuthError> {
        self.accounts
            .lock()
            .map_err(|e| AuthError::Response(e.to_string()))
    }

    /// Mark an account as confirmed, as if the emailed link was followed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` for unknown emails.
    pub fn confirm(&self, email: &str) -> Result<(), AuthError> {
        let mut accounts = self.accounts()?;
        let entry = accounts
            .by_email
            .get_mut(&email.to_lowercase())
            .ok_or_else(|| AuthError::Rejected("User not found".into()))?;
        entry.2 = true;
        Ok(())
    }

    /// Number of live access tokens.
    #[must_use]
    pub fn active_tokens(&self) -> usize {
        self.accounts.lock().map(|a| a.tokens.len()).unwrap_or(0)
    }

    fn issue(accounts: &mut Accounts, user_id: UserId, email: &str) -> Session {
        let token = format!("mem-{}", Uuid::new_v4());
        accounts.tokens.insert(token.clone(), user_id);
        Session {
            access_token: token,
            refresh_token: None,
            expires_at: None,
            user: AuthUser {
                id: user_id,
                email: Some(email.to_owned()),
            },
        }
    }
}

#[async_trait]
impl AuthBackend for InMemoryAuth {
    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let email = credentials.email().to_lowercase();
        let mut accounts = self.accounts()?;
        let (user_id, confirmed) = match accounts.by_email.get(&email) {
            Some((id, password, confirmed)) if password == credentials.password() => {
                (*id, *confirmed)
            }
            _ => return Err(AuthError::Rejected("Invalid login credentials".into())),
        };
        if !confirmed {
            return Err(AuthError::Rejected("Email not confirmed".into()));
        }
        Ok(Self::issue(&mut accounts, user_id, &email))
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, AuthError> {
        let email = credentials.email().to_lowercase();
        let mut accounts = self.accounts()?;
        if accounts.by_email.contains_key(&email) {
            return Err(AuthError::Rejected("User already registered".into()));
        }
        let user_id = UserId::random();
        let confirmed = !self.require_confirmation;
        accounts.by_email.insert(
            email.clone(),
            (user_id, credentials.password().to_owned(), confirmed),
        );
        accounts.emails.insert(user_id, email.clone());

        if confirmed {
            Ok(SignUpOutcome::SignedIn(Self::issue(&mut accounts, user_id, &email)))
        } else {
            Ok(SignUpOutcome::ConfirmationSent(AuthUser {
                id: user_id,
                email: Some(email),
            }))
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let mut accounts = self.accounts()?;
        accounts
            .tokens
            .remove(access_token)
            .map(|_| ())
            .ok_or_else(|| AuthError::Rejected("Invalid token".into()))
    }

    async fn fetch_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let accounts = self.accounts()?;
        let user_id = *accounts
            .tokens
            .get(access_token)
            .ok_or_else(|| AuthError::Rejected("Invalid token".into()))?;
        Ok(AuthUser {
            id: user_id,
            email: accounts.emails.get(&user_id).cloned(),
        })
    }
}
