use std::sync::Arc;

use storage::repository::Storage;
use storage::rest::{AccessTokenSource, RestConfig};

use crate::Clock;
use crate::auth::{AuthBackend, AuthService, GoTrueAuth, InMemoryAuth, SessionState};
use crate::error::AppServicesError;
use crate::goal_service::GoalService;
use crate::library_service::LibraryService;
use crate::newsletter_service::NewsletterService;
use crate::profile_service::ProfileService;

/// Assembles app-facing services around one shared session.
#[derive(Clone)]
pub struct AppServices {
    session: SessionState,
    auth: Arc<AuthService>,
    library: Arc<LibraryService>,
    goals: Arc<GoalService>,
    profiles: Arc<ProfileService>,
    newsletter: Arc<NewsletterService>,
}

impl AppServices {
    /// Wire services over the given storage and auth backend.
    #[must_use]
    pub fn new(
        storage: &Storage,
        auth_backend: Arc<dyn AuthBackend>,
        session: SessionState,
        clock: Clock,
    ) -> Self {
        let auth = Arc::new(AuthService::new(auth_backend, session.clone()));
        let library = Arc::new(LibraryService::new(
            clock,
            session.clone(),
            Arc::clone(&storage.books),
            Arc::clone(&storage.reading_logs),
        ));
        let goals = Arc::new(GoalService::new(
            clock,
            session.clone(),
            Arc::clone(&storage.goals),
        ));
        let profiles = Arc::new(ProfileService::new(
            clock,
            session.clone(),
            Arc::clone(&storage.profiles),
            Arc::clone(&storage.books),
        ));
        let newsletter = Arc::new(NewsletterService::new(
            clock,
            Arc::clone(&storage.newsletter),
        ));

        Self {
            session,
            auth,
            library,
            goals,
            profiles,
            newsletter,
        }
    }

    /// Build services against the hosted backend. Table requests carry the
    /// session's access token once signed in.
    #[must_use]
    pub fn rest(config: RestConfig, clock: Clock) -> Self {
        let session = SessionState::new();
        let tokens: Arc<dyn AccessTokenSource> = Arc::new(session.clone());
        let storage = Storage::rest(config.clone(), tokens);
        let auth = Arc::new(GoTrueAuth::new(config, clock));
        Self::new(&storage, auth, session, clock)
    }

    /// Build services backed by `SQLite` storage and in-process accounts.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn local_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(
            &storage,
            Arc::new(InMemoryAuth::new()),
            SessionState::new(),
            clock,
        ))
    }

    /// Fully in-memory services.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(
            &Storage::in_memory(),
            Arc::new(InMemoryAuth::new()),
            SessionState::new(),
            clock,
        )
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn library(&self) -> Arc<LibraryService> {
        Arc::clone(&self.library)
    }

    #[must_use]
    pub fn goals(&self) -> Arc<GoalService> {
        Arc::clone(&self.goals)
    }

    #[must_use]
    pub fn profiles(&self) -> Arc<ProfileService> {
        Arc::clone(&self.profiles)
    }

    #[must_use]
    pub fn newsletter(&self) -> Arc<NewsletterService> {
        Arc::clone(&self.newsletter)
    }
}
