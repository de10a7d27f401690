use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::error::{FieldError, FieldErrors};
use crate::model::form::{self, DateInput, Positive};
use crate::model::ids::{BookId, ReadingLogId};

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReadingLogError {
    #[error("pages must be a positive number")]
    NonPositivePages,

    #[error("date is required")]
    MissingDate,

    #[error("date must be YYYY-MM-DD")]
    InvalidDate,
}

impl FieldError for ReadingLogError {
    fn field(&self) -> &'static str {
        match self {
            ReadingLogError::NonPositivePages => "pages_read",
            ReadingLogError::MissingDate | ReadingLogError::InvalidDate => "date_read",
        }
    }
}

//
// ─── DRAFT ────────────────────────────────────────────────────────────────────
//

/// Raw input of the log-progress form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingLogDraft {
    pub pages_read: String,
    pub date_read: String,
}

impl ReadingLogDraft {
    /// An empty form whose date defaults to `today`.
    #[must_use]
    pub fn for_day(today: NaiveDate) -> Self {
        Self {
            pages_read: String::new(),
            date_read: today.format(form::DATE_FORMAT).to_string(),
        }
    }

    /// Validate the draft for the given book.
    ///
    /// # Errors
    ///
    /// Returns every failing field: non-positive pages, missing or malformed date.
    pub fn validate(self, book_id: BookId) -> Result<NewReadingLog, FieldErrors<ReadingLogError>> {
        let mut errors = FieldErrors::new();

        let pages_read = match form::parse_positive(Some(&self.pages_read)) {
            Positive::Value(v) => v,
            Positive::Missing | Positive::Invalid => {
                errors.push(ReadingLogError::NonPositivePages);
                0
            }
        };
        let date_read = match form::parse_date(Some(&self.date_read)) {
            DateInput::Value(d) => Some(d),
            DateInput::Missing => {
                errors.push(ReadingLogError::MissingDate);
                None
            }
            DateInput::Invalid => {
                errors.push(ReadingLogError::InvalidDate);
                None
            }
        };

        errors.finish(|| NewReadingLog {
            book_id,
            date_read: date_read.unwrap_or_default(),
            pages_read,
        })
    }
}

/// A validated reading session that has not been stored yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewReadingLog {
    book_id: BookId,
    date_read: NaiveDate,
    pages_read: u32,
}

impl NewReadingLog {
    #[must_use]
    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    #[must_use]
    pub fn date_read(&self) -> NaiveDate {
        self.date_read
    }

    #[must_use]
    pub fn pages_read(&self) -> u32 {
        self.pages_read
    }
}

//
// ─── READING LOG ──────────────────────────────────────────────────────────────
//

/// Pages read for one book on one day. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingLog {
    id: ReadingLogId,
    book_id: BookId,
    date_read: NaiveDate,
    pages_read: u32,
    created_at: DateTime<Utc>,
}

impl ReadingLog {
    #[must_use]
    pub fn new(id: ReadingLogId, log: NewReadingLog, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            book_id: log.book_id,
            date_read: log.date_read,
            pages_read: log.pages_read,
            created_at,
        }
    }

    /// Rehydrate a log from storage.
    ///
    /// # Errors
    ///
    /// Returns `ReadingLogError::NonPositivePages` when `pages_read` is zero.
    pub fn from_persisted(
        id: ReadingLogId,
        book_id: BookId,
        date_read: NaiveDate,
        pages_read: u32,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ReadingLogError> {
        if pages_read == 0 {
            return Err(ReadingLogError::NonPositivePages);
        }
        Ok(Self {
            id,
            book_id,
            date_read,
            pages_read,
            created_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> ReadingLogId {
        self.id
    }

    #[must_use]
    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    #[must_use]
    pub fn date_read(&self) -> NaiveDate {
        self.date_read
    }

    #[must_use]
    pub fn pages_read(&self) -> u32 {
        self.pages_read
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The projection the progress aggregator needs.
    #[must_use]
    pub fn tally(&self) -> PagesTally {
        PagesTally {
            book_id: self.book_id,
            pages_read: self.pages_read,
        }
    }
}

/// Minimal `(book_id, pages_read)` projection of a reading log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagesTally {
    pub book_id: BookId,
    pub pages_read: u32,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn draft_defaults_date_to_today() {
        let today = fixed_now().date_naive();
        let draft = ReadingLogDraft::for_day(today);
        assert_eq!(draft.date_read, "2023-11-14");
        assert!(draft.pages_read.is_empty());
    }

    #[test]
    fn draft_requires_positive_pages() {
        let book_id = BookId::random();
        for raw in ["", "0", "-10", "ten"] {
            let draft = ReadingLogDraft {
                pages_read: raw.into(),
                date_read: "2024-05-01".into(),
            };
            let errors = draft.validate(book_id).unwrap_err();
            assert_eq!(errors.errors(), &[ReadingLogError::NonPositivePages]);
        }
    }

    #[test]
    fn draft_reports_missing_and_invalid_dates() {
        let book_id = BookId::random();
        let missing = ReadingLogDraft {
            pages_read: "20".into(),
            date_read: " ".into(),
        };
        assert_eq!(
            missing.validate(book_id).unwrap_err().for_field("date_read"),
            Some(&ReadingLogError::MissingDate)
        );

        let invalid = ReadingLogDraft {
            pages_read: "20".into(),
            date_read: "May 1st".into(),
        };
        assert_eq!(
            invalid.validate(book_id).unwrap_err().for_field("date_read"),
            Some(&ReadingLogError::InvalidDate)
        );
    }

    #[test]
    fn valid_draft_becomes_log() {
        let book_id = BookId::random();
        let new_log = ReadingLogDraft {
            pages_read: "35".into(),
            date_read: "2024-05-01".into(),
        }
        .validate(book_id)
        .unwrap();

        let log = ReadingLog::new(ReadingLogId::random(), new_log, fixed_now());
        assert_eq!(log.book_id(), book_id);
        assert_eq!(log.pages_read(), 35);
        assert_eq!(log.date_read(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(
            log.tally(),
            PagesTally {
                book_id,
                pages_read: 35
            }
        );
    }

    #[test]
    fn from_persisted_rejects_zero_pages() {
        let err = ReadingLog::from_persisted(
            ReadingLogId::random(),
            BookId::random(),
            fixed_now().date_naive(),
            0,
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, ReadingLogError::NonPositivePages);
    }
}
