//! Shared error types for the services crate.

use thiserror::Error;

use shelf_core::FieldErrors;
use shelf_core::model::{AccountError, BookError, GoalError, NewsletterError, ProfileError, ReadingLogError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `AuthService` and auth backends.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error(transparent)]
    Invalid(#[from] FieldErrors<AccountError>),
    #[error("not signed in")]
    NotSignedIn,
    /// The auth backend refused the request; carries its message.
    #[error("{0}")]
    Rejected(String),
    #[error("auth request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected auth response: {0}")]
    Response(String),
}

/// Errors emitted by `LibraryService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LibraryError {
    #[error("you must be logged in to manage books")]
    NotSignedIn,
    #[error(transparent)]
    Book(#[from] FieldErrors<BookError>),
    #[error(transparent)]
    ReadingLog(#[from] FieldErrors<ReadingLogError>),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `GoalService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GoalServiceError {
    #[error("you must be logged in to set a goal")]
    NotSignedIn,
    #[error(transparent)]
    Goal(#[from] FieldErrors<GoalError>),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ProfileService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProfileServiceError {
    #[error("you must be logged in to edit your profile")]
    NotSignedIn,
    #[error(transparent)]
    Profile(#[from] FieldErrors<ProfileError>),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `NewsletterService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NewsletterServiceError {
    #[error(transparent)]
    Invalid(#[from] FieldErrors<NewsletterError>),
    #[error("this email is already subscribed to the newsletter")]
    AlreadySubscribed,
    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for NewsletterServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UniqueViolation(_) => NewsletterServiceError::AlreadySubscribed,
            other => NewsletterServiceError::Storage(other),
        }
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
