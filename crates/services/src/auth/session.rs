use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shelf_core::model::UserId;
use storage::rest::AccessTokenSource;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// The authenticated user as reported by the auth backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub email: Option<String>,
}

/// A signed-in session. `Debug` never prints tokens.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub user: AuthUser,
}

impl Session {
    /// `true` once `now` is past `expires_at`; sessions without expiry never expire.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"***")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "***"))
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    SessionRestored,
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

type Listener = dyn Fn(AuthEvent, Option<&Session>) + Send + Sync;

#[derive(Default)]
struct Inner {
    session: Option<Session>,
    listeners: Vec<(u64, Arc<Listener>)>,
    next_id: u64,
}

/// Current session plus the listeners interested in changes to it.
///
/// Cloning shares the same state. Listeners run on the thread that changed the
/// session, after the internal lock is released, so they may read the state.
#[derive(Clone, Default)]
pub struct SessionState {
    inner: Arc<Mutex<Inner>>,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.lock().session.clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<AuthUser> {
        self.lock().session.as_ref().map(|s| s.user.clone())
    }

    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.lock().session.as_ref().map(|s| s.user.id)
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.lock().session.is_some()
    }

    /// Register a listener; it stays registered while the `Subscription` lives.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(AuthEvent, Option<&Session>) + Send + Sync + 'static,
    {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Arc::new(listener)));
        Subscription {
            id,
            state: Arc::downgrade(&self.inner),
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    pub(crate) fn sign_in(&self, session: Session) {
        self.replace(Some(session), AuthEvent::SignedIn);
    }

    /// Adopt a session persisted by an earlier run.
    pub fn restore(&self, session: Session) {
        self.replace(Some(session), AuthEvent::SessionRestored);
    }

    pub(crate) fn clear(&self) {
        self.replace(None, AuthEvent::SignedOut);
    }

    fn replace(&self, session: Option<Session>, event: AuthEvent) {
        let (snapshot, listeners) = {
            let mut inner = self.lock();
            inner.session = session;
            let listeners: Vec<Arc<Listener>> =
                inner.listeners.iter().map(|(_, l)| Arc::clone(l)).collect();
            (inner.session.clone(), listeners)
        };
        log::debug!("auth state changed: {event:?}, {} listener(s)", listeners.len());
        for listener in listeners {
            listener(event, snapshot.as_ref());
        }
    }
}

impl AccessTokenSource for SessionState {
    fn access_token(&self) -> Option<String> {
        self.lock().session.as_ref().map(|s| s.access_token.clone())
    }
}

/// Keeps a listener registered. Dropping it (or calling `unsubscribe`) removes it.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    state: Weak<Mutex<Inner>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            let mut inner = state.lock().unwrap_or_else(PoisonError::into_inner);
            inner.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::time::fixed_now;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn session() -> Session {
        Session {
            access_token: "access".into(),
            refresh_token: Some("refresh".into()),
            expires_at: Some(fixed_now()),
            user: AuthUser {
                id: UserId::random(),
                email: Some("reader@example.com".into()),
            },
        }
    }

    #[test]
    fn listeners_see_each_transition() {
        let state = SessionState::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = state.subscribe(move |event, session| {
            sink.lock().unwrap().push((event, session.is_some()));
        });

        state.sign_in(session());
        state.clear();
        state.restore(session());

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (AuthEvent::SignedIn, true),
                (AuthEvent::SignedOut, false),
                (AuthEvent::SessionRestored, true),
            ]
        );
    }

    #[test]
    fn dropped_subscription_is_not_notified() {
        let state = SessionState::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let sub = state.subscribe(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        state.sign_in(session());
        sub.unsubscribe();
        state.clear();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(state.listener_count(), 0);
    }

    #[test]
    fn listener_may_read_state() {
        let state = SessionState::new();
        let reader = state.clone();
        let observed = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&observed);
        let _sub = state.subscribe(move |_, _| {
            *slot.lock().unwrap() = reader.user_id();
        });
        let s = session();
        let id = s.user.id;
        state.sign_in(s);
        assert_eq!(*observed.lock().unwrap(), Some(id));
    }

    #[test]
    fn token_follows_session() {
        let state = SessionState::new();
        assert_eq!(state.access_token(), None);
        state.sign_in(session());
        assert_eq!(state.access_token().as_deref(), Some("access"));
        state.clear();
        assert!(!state.is_signed_in());
    }

    #[test]
    fn expiry_and_redacted_debug() {
        let s = session();
        assert!(s.is_expired(fixed_now()));
        assert!(!s.is_expired(fixed_now() - chrono::Duration::seconds(1)));
        let debug = format!("{s:?}");
        assert!(!debug.contains("access\""));
        assert!(!debug.contains("refresh\""));
    }

    #[test]
    fn session_round_trips_through_json() {
        let s = session();
        let json = serde_json::to_string(&s).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
