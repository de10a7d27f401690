use shelf_core::model::{BookId, PagesTally, ReadingLog, UserId};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{book_id_from_row, db_err, map_log_row, map_rows_lenient, ser};
use crate::repository::{ReadingLogRepository, StorageError};

#[async_trait::async_trait]
impl ReadingLogRepository for SqliteRepository {
    async fn append_log(&self, log: &ReadingLog) -> Result<ReadingLog, StorageError> {
        sqlx::query(
            r"
            INSERT INTO reading_logs (id, book_id, date_read, pages_read, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(log.id().to_string())
        .bind(log.book_id().to_string())
        .bind(log.date_read())
        .bind(i64::from(log.pages_read()))
        .bind(log.created_at())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(log.clone())
    }

    async fn logs_for_book(&self, book_id: BookId) -> Result<Vec<ReadingLog>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, book_id, date_read, pages_read, created_at
            FROM reading_logs
            WHERE book_id = ?1
            ORDER BY date_read DESC, created_at DESC
            ",
        )
        .bind(book_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(map_rows_lenient("reading_logs", &rows, map_log_row))
    }

    async fn tallies(&self, user_id: UserId) -> Result<Vec<PagesTally>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT l.book_id AS book_id, l.pages_read AS pages_read
            FROM reading_logs l
            JOIN books b ON b.id = l.book_id
            WHERE b.user_id = ?1
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut tallies = Vec::with_capacity(rows.len());
        for row in rows {
            let pages: i64 = row.try_get("pages_read").map_err(ser)?;
            tallies.push(PagesTally {
                book_id: book_id_from_row(&row)?,
                pages_read: u32::try_from(pages).map_err(ser)?,
            });
        }
        Ok(tallies)
    }
}
