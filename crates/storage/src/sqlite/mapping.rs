use shelf_core::model::{
    Book, BookId, BookStatus, GoalPeriod, Profile, ReadingGoal, ReadingLog, ReadingLogId, UserId,
};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Map a driver error, surfacing constraint violations as domain errors.
pub(crate) fn db_err(e: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StorageError::UniqueViolation(db.message().to_owned());
        }
        if db.is_foreign_key_violation() {
            return StorageError::NotFound;
        }
    }
    StorageError::Connection(e.to_string())
}

fn uuid_from_str(field: &'static str, raw: &str) -> Result<Uuid, StorageError> {
    Uuid::parse_str(raw).map_err(|e| StorageError::Serialization(format!("{field}: {e}")))
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} out of range: {v}")))
}

pub(crate) fn user_id_from_row(row: &SqliteRow, column: &str) -> Result<UserId, StorageError> {
    let raw: String = row.try_get(column).map_err(ser)?;
    Ok(UserId::new(uuid_from_str("user_id", &raw)?))
}

/// Map every row, skipping (and logging) rows that fail domain checks.
pub(crate) fn map_rows_lenient<T>(
    table: &str,
    rows: &[SqliteRow],
    map: impl Fn(&SqliteRow) -> Result<T, StorageError>,
) -> Vec<T> {
    rows.iter()
        .filter_map(|row| match map(row) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("skipping malformed {table} row: {err}");
                None
            }
        })
        .collect()
}

pub(crate) fn parse_status(s: &str) -> Result<BookStatus, StorageError> {
    BookStatus::parse(s).ok_or_else(|| StorageError::Serialization(format!("invalid status: {s}")))
}

pub(crate) fn parse_period(s: &str) -> Result<GoalPeriod, StorageError> {
    s.parse::<GoalPeriod>().map_err(ser)
}

pub(crate) fn map_book_row(row: &SqliteRow) -> Result<Book, StorageError> {
    let id: String = row.try_get("id").map_err(ser)?;
    let status: String = row.try_get("status").map_err(ser)?;
    let total_pages = row
        .try_get::<Option<i64>, _>("total_pages")
        .map_err(ser)?
        .map(|v| u32_from_i64("total_pages", v))
        .transpose()?;

    Book::from_persisted(
        BookId::new(uuid_from_str("book_id", &id)?),
        user_id_from_row(row, "user_id")?,
        row.try_get("title").map_err(ser)?,
        row.try_get("author").map_err(ser)?,
        parse_status(&status)?,
        total_pages,
        row.try_get("start_date").map_err(ser)?,
        row.try_get("end_date").map_err(ser)?,
        row.try_get("notes").map_err(ser)?,
        row.try_get("created_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_log_row(row: &SqliteRow) -> Result<ReadingLog, StorageError> {
    let id: String = row.try_get("id").map_err(ser)?;
    let book_id: String = row.try_get("book_id").map_err(ser)?;
    ReadingLog::from_persisted(
        ReadingLogId::new(uuid_from_str("reading_log_id", &id)?),
        BookId::new(uuid_from_str("book_id", &book_id)?),
        row.try_get("date_read").map_err(ser)?,
        u32_from_i64("pages_read", row.try_get("pages_read").map_err(ser)?)?,
        row.try_get("created_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn book_id_from_row(row: &SqliteRow) -> Result<BookId, StorageError> {
    let raw: String = row.try_get("book_id").map_err(ser)?;
    Ok(BookId::new(uuid_from_str("book_id", &raw)?))
}

pub(crate) fn map_goal_row(row: &SqliteRow) -> Result<ReadingGoal, StorageError> {
    let period: String = row.try_get("period").map_err(ser)?;
    ReadingGoal::from_persisted(
        user_id_from_row(row, "user_id")?,
        u32_from_i64("target_pages", row.try_get("target_pages").map_err(ser)?)?,
        parse_period(&period)?,
        row.try_get("created_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_profile_row(row: &SqliteRow) -> Result<Profile, StorageError> {
    Ok(Profile::from_persisted(
        user_id_from_row(row, "id")?,
        row.try_get("first_name").map_err(ser)?,
        row.try_get("last_name").map_err(ser)?,
        row.try_get("country").map_err(ser)?,
        row.try_get("gender").map_err(ser)?,
        row.try_get("updated_at").map_err(ser)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_round_trip_through_storage_form() {
        for status in BookStatus::ALL {
            assert_eq!(parse_status(status.as_str()).unwrap(), status);
        }
        assert!(matches!(
            parse_status("abandoned"),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn malformed_ids_are_serialization_errors() {
        assert!(matches!(
            uuid_from_str("book_id", "not-a-uuid"),
            Err(StorageError::Serialization(msg)) if msg.starts_with("book_id")
        ));
    }
}
