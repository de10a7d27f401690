use std::sync::Arc;

use shelf_core::model::{Profile, ProfileDraft};
use shelf_core::progress::StatusCounts;
use storage::repository::{BookRepository, ProfileRepository};

use crate::Clock;
use crate::auth::{AuthUser, SessionState};
use crate::error::ProfileServiceError;

/// Everything the profile page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileOverview {
    pub profile: Option<Profile>,
    pub email: Option<String>,
    pub counts: StatusCounts,
}

impl ProfileOverview {
    /// Form prefill: the stored profile, or an empty draft.
    #[must_use]
    pub fn draft(&self) -> ProfileDraft {
        self.profile
            .as_ref()
            .map(ProfileDraft::from_profile)
            .unwrap_or_default()
    }
}

#[derive(Clone)]
pub struct ProfileService {
    clock: Clock,
    session: SessionState,
    profiles: Arc<dyn ProfileRepository>,
    books: Arc<dyn BookRepository>,
}

impl ProfileService {
    #[must_use]
    pub fn new(
        clock: Clock,
        session: SessionState,
        profiles: Arc<dyn ProfileRepository>,
        books: Arc<dyn BookRepository>,
    ) -> Self {
        Self {
            clock,
            session,
            profiles,
            books,
        }
    }

    fn user(&self) -> Result<AuthUser, ProfileServiceError> {
        self.session.user().ok_or(ProfileServiceError::NotSignedIn)
    }

    /// Stored profile (if any), the account email and shelf counts.
    ///
    /// # Errors
    ///
    /// Returns `ProfileServiceError::Storage` on failures.
    pub async fn load_overview(&self) -> Result<ProfileOverview, ProfileServiceError> {
        let user = self.user()?;
        let profile = self.profiles.get_profile(user.id).await?;
        let statuses = self.books.list_statuses(user.id).await?;
        Ok(ProfileOverview {
            profile,
            email: user.email,
            counts: StatusCounts::tally(statuses.iter().map(String::as_str)),
        })
    }

    /// Replace the whole profile row; `updated_at` is set to now.
    ///
    /// # Errors
    ///
    /// Returns `ProfileServiceError::Profile` for invalid fields, or storage errors.
    pub async fn save_profile(&self, draft: ProfileDraft) -> Result<Profile, ProfileServiceError> {
        let user = self.user()?;
        let profile = draft.validate(user.id, self.clock.now())?;
        let stored = self.profiles.upsert_profile(&profile).await?;
        log::info!("profile {} updated", stored.id());
        Ok(stored)
    }
}
