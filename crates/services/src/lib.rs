#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth;
pub mod error;
pub mod goal_service;
pub mod library_service;
pub mod newsletter_service;
pub mod profile_service;

pub use shelf_core::Clock;

pub use app_services::AppServices;
pub use auth::{AuthService, AuthUser, Session, SessionState, SignUpOutcome};
pub use error::{
    AppServicesError, AuthError, GoalServiceError, LibraryError, NewsletterServiceError,
    ProfileServiceError,
};
pub use goal_service::GoalService;
pub use library_service::LibraryService;
pub use newsletter_service::NewsletterService;
pub use profile_service::{ProfileOverview, ProfileService};
