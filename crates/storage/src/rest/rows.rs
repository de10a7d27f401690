//! Wire shapes of the hosted tables and their conversion into domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shelf_core::model::{
    Book, BookDetails, BookId, BookStatus, GoalPeriod, NewsletterSubscription, PagesTally, Profile,
    ReadingGoal, ReadingLog, ReadingLogId, UserId,
};

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn positive(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} out of range: {v}")))
}

//
// ─── BOOKS ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BookRow {
    pub id: BookId,
    pub user_id: UserId,
    pub title: String,
    pub author: String,
    pub status: String,
    pub total_pages: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<BookRow> for Book {
    type Error = StorageError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        let status = BookStatus::parse(&row.status)
            .ok_or_else(|| StorageError::Serialization(format!("invalid status: {}", row.status)))?;
        let total_pages = row
            .total_pages
            .map(|v| positive("total_pages", v))
            .transpose()?;
        Book::from_persisted(
            row.id,
            row.user_id,
            row.title,
            row.author,
            status,
            total_pages,
            row.start_date,
            row.end_date,
            row.notes,
            row.created_at,
        )
        .map_err(ser)
    }
}

/// Insert payload; `created_at` is left to the backend default.
#[derive(Debug, Serialize)]
pub(crate) struct NewBookRow<'a> {
    pub id: BookId,
    pub user_id: UserId,
    pub title: &'a str,
    pub author: &'a str,
    pub status: BookStatus,
    pub total_pages: Option<u32>,
    pub notes: Option<&'a str>,
}

impl<'a> From<&'a Book> for NewBookRow<'a> {
    fn from(book: &'a Book) -> Self {
        Self {
            id: book.id(),
            user_id: book.user_id(),
            title: book.title(),
            author: book.author(),
            status: book.status(),
            total_pages: book.total_pages(),
            notes: book.notes(),
        }
    }
}

/// Details patch. `None` is sent as `null` and clears the column.
#[derive(Debug, Serialize)]
pub(crate) struct BookDetailsPatch<'a> {
    pub status: BookStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<&'a str>,
}

impl<'a> From<&'a BookDetails> for BookDetailsPatch<'a> {
    fn from(details: &'a BookDetails) -> Self {
        Self {
            status: details.status,
            start_date: details.start_date,
            end_date: details.end_date,
            notes: details.notes.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusRow {
    pub status: Option<String>,
}

//
// ─── READING LOGS ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct ReadingLogRow {
    pub id: ReadingLogId,
    pub book_id: BookId,
    pub date_read: NaiveDate,
    pub pages_read: i64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ReadingLogRow> for ReadingLog {
    type Error = StorageError;

    fn try_from(row: ReadingLogRow) -> Result<Self, Self::Error> {
        ReadingLog::from_persisted(
            row.id,
            row.book_id,
            row.date_read,
            positive("pages_read", row.pages_read)?,
            row.created_at,
        )
        .map_err(ser)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NewReadingLogRow {
    pub id: ReadingLogId,
    pub book_id: BookId,
    pub date_read: NaiveDate,
    pub pages_read: u32,
}

impl From<&ReadingLog> for NewReadingLogRow {
    fn from(log: &ReadingLog) -> Self {
        Self {
            id: log.id(),
            book_id: log.book_id(),
            date_read: log.date_read(),
            pages_read: log.pages_read(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TallyRow {
    pub book_id: BookId,
    pub pages_read: i64,
}

impl TryFrom<TallyRow> for PagesTally {
    type Error = StorageError;

    fn try_from(row: TallyRow) -> Result<Self, Self::Error> {
        Ok(PagesTally {
            book_id: row.book_id,
            pages_read: positive("pages_read", row.pages_read)?,
        })
    }
}

//
// ─── GOALS ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ReadingGoalRow {
    pub user_id: UserId,
    pub target_pages: i64,
    pub period: String,
    pub created_at: DateTime<Utc>,
}

impl From<&ReadingGoal> for ReadingGoalRow {
    fn from(goal: &ReadingGoal) -> Self {
        Self {
            user_id: goal.user_id(),
            target_pages: i64::from(goal.target_pages()),
            period: goal.period().as_str().to_owned(),
            created_at: goal.created_at(),
        }
    }
}

impl TryFrom<ReadingGoalRow> for ReadingGoal {
    type Error = StorageError;

    fn try_from(row: ReadingGoalRow) -> Result<Self, Self::Error> {
        let period = row.period.parse::<GoalPeriod>().map_err(ser)?;
        ReadingGoal::from_persisted(
            row.user_id,
            positive("target_pages", row.target_pages)?,
            period,
            row.created_at,
        )
        .map_err(ser)
    }
}

//
// ─── PROFILES ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ProfileRow {
    pub id: UserId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub gender: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Profile> for ProfileRow {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id(),
            first_name: profile.first_name().map(str::to_owned),
            last_name: profile.last_name().map(str::to_owned),
            country: profile.country().map(str::to_owned),
            gender: profile.gender().map(str::to_owned),
            updated_at: profile.updated_at(),
        }
    }
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile::from_persisted(
            row.id,
            row.first_name,
            row.last_name,
            row.country,
            row.gender,
            row.updated_at,
        )
    }
}

//
// ─── NEWSLETTER ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
pub(crate) struct SubscriberRow<'a> {
    pub email: &'a str,
}

impl<'a> From<&'a NewsletterSubscription> for SubscriberRow<'a> {
    fn from(sub: &'a NewsletterSubscription) -> Self {
        Self { email: sub.email() }
    }
}

/// Convert every row, skipping (and logging) rows that fail domain checks.
pub(crate) fn convert_lenient<R, T>(table: &str, rows: Vec<R>) -> Vec<T>
where
    T: TryFrom<R, Error = StorageError>,
{
    rows.into_iter()
        .filter_map(|row| match T::try_from(row) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("skipping malformed {table} row: {err}");
                None
            }
        })
        .collect()
}
