use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{FieldError, FieldErrors};
use crate::model::form::{self, DateInput, Positive};
use crate::model::ids::{BookId, UserId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BookError {
    #[error("title is required")]
    EmptyTitle,

    #[error("author is required")]
    EmptyAuthor,

    #[error("pages must be a positive number")]
    NonPositivePages,

    #[error("invalid book status: {0}")]
    InvalidStatus(String),

    #[error("start date must be YYYY-MM-DD")]
    InvalidStartDate,

    #[error("end date must be YYYY-MM-DD")]
    InvalidEndDate,
}

impl FieldError for BookError {
    fn field(&self) -> &'static str {
        match self {
            BookError::EmptyTitle => "title",
            BookError::EmptyAuthor => "author",
            BookError::NonPositivePages => "total_pages",
            BookError::InvalidStatus(_) => "status",
            BookError::InvalidStartDate => "start_date",
            BookError::InvalidEndDate => "end_date",
        }
    }
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Where a book sits on the reader's shelf.
///
/// Transitions only happen through explicit edits; logging the last page of a
/// book does not move it to `Read`, and moving backwards is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookStatus {
    #[default]
    ToRead,
    Reading,
    Read,
}

impl BookStatus {
    pub const ALL: [BookStatus; 3] = [BookStatus::ToRead, BookStatus::Reading, BookStatus::Read];

    /// Wire/storage representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BookStatus::ToRead => "to-read",
            BookStatus::Reading => "reading",
            BookStatus::Read => "read",
        }
    }

    /// Parses the storage representation, returning `None` for unknown values.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "to-read" => Some(BookStatus::ToRead),
            "reading" => Some(BookStatus::Reading),
            "read" => Some(BookStatus::Read),
            _ => None,
        }
    }

    /// Whether a start date is meaningful for this status.
    #[must_use]
    pub fn keeps_start_date(self) -> bool {
        matches!(self, BookStatus::Reading | BookStatus::Read)
    }

    /// Whether an end date is meaningful for this status.
    #[must_use]
    pub fn keeps_end_date(self) -> bool {
        matches!(self, BookStatus::Read)
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.trim()).ok_or_else(|| BookError::InvalidStatus(s.trim().to_owned()))
    }
}

//
// ─── NEW BOOK ──────────────────────────────────────────────────────────────────
//

/// Raw input of the add-book form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub status: String,
    pub total_pages: Option<String>,
    pub notes: Option<String>,
}

impl Default for BookDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            status: BookStatus::default().as_str().to_owned(),
            total_pages: None,
            notes: None,
        }
    }
}

impl BookDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            ..Self::default()
        }
    }

    /// Validate the draft into a book ready to be inserted.
    ///
    /// # Errors
    ///
    /// Returns every failing field: empty title or author, a status outside the
    /// known set, or a page count that is not a positive integer.
    pub fn validate(self) -> Result<NewBook, FieldErrors<BookError>> {
        let mut errors = FieldErrors::new();

        if form::is_blank(&self.title) {
            errors.push(BookError::EmptyTitle);
        }
        if form::is_blank(&self.author) {
            errors.push(BookError::EmptyAuthor);
        }
        let status = match self.status.parse::<BookStatus>() {
            Ok(status) => status,
            Err(err) => {
                errors.push(err);
                BookStatus::default()
            }
        };
        let total_pages = match form::parse_positive(self.total_pages.as_deref()) {
            Positive::Missing => None,
            Positive::Value(v) => Some(v),
            Positive::Invalid => {
                errors.push(BookError::NonPositivePages);
                None
            }
        };

        errors.finish(|| NewBook {
            title: self.title.trim().to_owned(),
            author: self.author.trim().to_owned(),
            status,
            total_pages,
            notes: form::normalize_optional(self.notes),
        })
    }
}

/// A validated book that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    title: String,
    author: String,
    status: BookStatus,
    total_pages: Option<u32>,
    notes: Option<String>,
}

impl NewBook {
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    #[must_use]
    pub fn status(&self) -> BookStatus {
        self.status
    }

    #[must_use]
    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

//
// ─── DETAILS ───────────────────────────────────────────────────────────────────
//

/// Raw input of the book details form (status, dates, notes).
///
/// Changing the status through [`BookDetailsDraft::set_status`] clears dates the
/// new status does not show: `to-read` drops both dates, `reading` drops the end
/// date. This is a form convenience; stored books may still carry any dates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookDetailsDraft {
    pub status: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub notes: Option<String>,
}

impl BookDetailsDraft {
    /// Prefill the form from a stored book.
    #[must_use]
    pub fn from_book(book: &Book) -> Self {
        let mut draft = Self {
            status: book.status().as_str().to_owned(),
            start_date: book.start_date().map(|d| d.format(form::DATE_FORMAT).to_string()),
            end_date: book.end_date().map(|d| d.format(form::DATE_FORMAT).to_string()),
            notes: book.notes().map(str::to_owned),
        };
        draft.clear_hidden_dates();
        draft
    }

    /// Switch status and clear the dates the new status hides.
    pub fn set_status(&mut self, status: BookStatus) {
        self.status = status.as_str().to_owned();
        self.clear_hidden_dates();
    }

    fn clear_hidden_dates(&mut self) {
        let Some(status) = BookStatus::parse(self.status.trim()) else {
            return;
        };
        if !status.keeps_start_date() {
            self.start_date = None;
        }
        if !status.keeps_end_date() {
            self.end_date = None;
        }
    }

    /// Validate the draft into a details update.
    ///
    /// # Errors
    ///
    /// Returns every failing field: unknown status or malformed dates.
    pub fn validate(mut self) -> Result<BookDetails, FieldErrors<BookError>> {
        self.clear_hidden_dates();
        let mut errors = FieldErrors::new();

        let status = match self.status.parse::<BookStatus>() {
            Ok(status) => Some(status),
            Err(err) => {
                errors.push(err);
                None
            }
        };
        let start_date = match form::parse_date(self.start_date.as_deref()) {
            DateInput::Missing => None,
            DateInput::Value(d) => Some(d),
            DateInput::Invalid => {
                errors.push(BookError::InvalidStartDate);
                None
            }
        };
        let end_date = match form::parse_date(self.end_date.as_deref()) {
            DateInput::Missing => None,
            DateInput::Value(d) => Some(d),
            DateInput::Invalid => {
                errors.push(BookError::InvalidEndDate);
                None
            }
        };

        errors.finish(|| BookDetails {
            status: status.unwrap_or_default(),
            start_date,
            end_date,
            notes: form::normalize_optional(self.notes),
        })
    }
}

/// Validated details update. `None` values clear the stored column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDetails {
    pub status: BookStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

//
// ─── BOOK ──────────────────────────────────────────────────────────────────────
//

/// A book in a user's library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    id: BookId,
    user_id: UserId,
    title: String,
    author: String,
    status: BookStatus,
    total_pages: Option<u32>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl Book {
    #[must_use]
    pub fn new(id: BookId, user_id: UserId, new_book: NewBook, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            title: new_book.title,
            author: new_book.author,
            status: new_book.status,
            total_pages: new_book.total_pages,
            start_date: None,
            end_date: None,
            notes: new_book.notes,
            created_at,
        }
    }

    /// Rehydrate a book from storage.
    ///
    /// # Errors
    ///
    /// Returns `BookError` if the title or author is empty, or the page count is zero.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: BookId,
        user_id: UserId,
        title: String,
        author: String,
        status: BookStatus,
        total_pages: Option<u32>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        notes: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, BookError> {
        if title.trim().is_empty() {
            return Err(BookError::EmptyTitle);
        }
        if author.trim().is_empty() {
            return Err(BookError::EmptyAuthor);
        }
        if total_pages == Some(0) {
            return Err(BookError::NonPositivePages);
        }
        Ok(Self {
            id,
            user_id,
            title,
            author,
            status,
            total_pages,
            start_date,
            end_date,
            notes: form::normalize_optional(notes),
            created_at,
        })
    }

    /// Apply a details update in place.
    pub fn apply_details(&mut self, details: BookDetails) {
        self.status = details.status;
        self.start_date = details.start_date;
        self.end_date = details.end_date;
        self.notes = details.notes;
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> BookId {
        self.id
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    #[must_use]
    pub fn status(&self) -> BookStatus {
        self.status
    }

    #[must_use]
    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    #[must_use]
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    #[must_use]
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
