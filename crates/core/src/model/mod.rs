mod account;
mod book;
mod form;
mod goal;
mod ids;
mod newsletter;
mod profile;
mod reading_log;

pub use account::{AccountError, Credentials, MIN_PASSWORD_LEN};
pub use book::{Book, BookDetails, BookDetailsDraft, BookDraft, BookError, BookStatus, NewBook};
pub use form::{DATE_FORMAT, is_valid_email};
pub use goal::{GoalError, GoalPeriod, ReadingGoal, ReadingGoalDraft};
pub use ids::{BookId, ParseIdError, ReadingLogId, UserId};
pub use newsletter::{NewsletterError, NewsletterSubscription};
pub use profile::{GENDER_OPTIONS, Profile, ProfileDraft, ProfileError};
pub use reading_log::{NewReadingLog, PagesTally, ReadingLog, ReadingLogDraft, ReadingLogError};
