use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use services::auth::{AuthEvent, Session, SessionState, Subscription};
use shelf_core::time::Clock;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionStoreError {
    #[error("session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt session file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Session persisted as JSON between runs.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> SessionStoreError {
        SessionStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// The stored session, unless missing or expired. Expired files are removed.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` when the file is unreadable or not a session.
    pub fn load(&self, clock: Clock) -> Result<Option<Session>, SessionStoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_err(err)),
        };
        let session: Session =
            serde_json::from_str(&contents).map_err(|source| SessionStoreError::Json {
                path: self.path.clone(),
                source,
            })?;
        if session.is_expired(clock.now()) {
            log::info!("stored session expired, signing out locally");
            self.clear()?;
            return Ok(None);
        }
        Ok(Some(session))
    }

    /// # Errors
    ///
    /// Returns `SessionStoreError` when the file cannot be written.
    pub fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        let json = serde_json::to_string_pretty(session).map_err(|source| {
            SessionStoreError::Json {
                path: self.path.clone(),
                source,
            }
        })?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        let mut file = open_private(&self.path).map_err(|e| self.io_err(e))?;
        file.write_all(json.as_bytes()).map_err(|e| self.io_err(e))?;
        log::debug!("session saved to {}", self.path.display());
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionStoreError` when an existing file cannot be removed.
    pub fn clear(&self) -> Result<(), SessionStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_err(err)),
        }
    }

    /// Mirror sign-in and sign-out into the file for as long as the
    /// returned subscription lives.
    #[must_use]
    pub fn track(&self, state: &SessionState) -> Subscription {
        let store = self.clone();
        state.subscribe(move |event, session| {
            let result = match (event, session) {
                (AuthEvent::SignedIn, Some(session)) => store.save(session),
                (AuthEvent::SignedOut, _) => store.clear(),
                _ => Ok(()),
            };
            if let Err(err) = result {
                log::warn!("failed to persist session: {err}");
            }
        })
    }
}

/// Open for writing, owner-only from creation on. A file left by an older
/// run is narrowed to 0600 before anything is written to it.
#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use services::auth::AuthUser;
    use shelf_core::model::UserId;
    use shelf_core::time::{fixed_clock, fixed_now};

    fn temp_store(name: &str) -> SessionStore {
        let path = std::env::temp_dir().join(format!(
            "shelf-session-{name}-{}.json",
            std::process::id()
        ));
        let store = SessionStore::new(path);
        store.clear().unwrap();
        store
    }

    fn session(expires_in: Option<Duration>) -> Session {
        Session {
            access_token: "access".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: expires_in.map(|d| fixed_now() + d),
            user: AuthUser {
                id: UserId::random(),
                email: Some("reader@example.com".to_string()),
            },
        }
    }

    #[test]
    fn missing_file_means_signed_out() {
        let store = temp_store("missing");
        assert!(store.load(fixed_clock()).unwrap().is_none());
    }

    #[test]
    fn saved_session_round_trips() {
        let store = temp_store("round-trip");
        let saved = session(Some(Duration::hours(1)));
        store.save(&saved).unwrap();
        let loaded = store.load(fixed_clock()).unwrap().unwrap();
        assert_eq!(loaded.user, saved.user);
        assert_eq!(loaded.access_token, "access");
        store.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let store = temp_store("private");
        std::fs::write(store.path(), "stale").unwrap();
        std::fs::set_permissions(store.path(), std::fs::Permissions::from_mode(0o644)).unwrap();

        store.save(&session(Some(Duration::hours(1)))).unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(store.load(fixed_clock()).unwrap().is_some());
        store.clear().unwrap();
    }

    #[test]
    fn expired_session_is_discarded() {
        let store = temp_store("expired");
        store.save(&session(Some(Duration::hours(-1)))).unwrap();
        assert!(store.load(fixed_clock()).unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let store = temp_store("corrupt");
        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(matches!(
            store.load(fixed_clock()),
            Err(SessionStoreError::Json { .. })
        ));
        store.clear().unwrap();
    }
}
