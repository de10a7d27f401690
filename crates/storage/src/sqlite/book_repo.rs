use shelf_core::model::{Book, BookDetails, BookId, UserId};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{db_err, map_book_row, map_rows_lenient, ser};
use crate::repository::{BookRepository, StorageError};

const BOOK_COLUMNS: &str = "id, user_id, title, author, status, total_pages, start_date, end_date, notes, created_at";

#[async_trait::async_trait]
impl BookRepository for SqliteRepository {
    async fn insert_book(&self, book: &Book) -> Result<Book, StorageError> {
        sqlx::query(
            r"
            INSERT INTO books (id, user_id, title, author, status, total_pages, start_date, end_date, notes, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ",
        )
        .bind(book.id().to_string())
        .bind(book.user_id().to_string())
        .bind(book.title())
        .bind(book.author())
        .bind(book.status().as_str())
        .bind(book.total_pages().map(i64::from))
        .bind(book.start_date())
        .bind(book.end_date())
        .bind(book.notes())
        .bind(book.created_at())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        self.get_book(book.user_id(), book.id()).await
    }

    async fn list_books(&self, user_id: UserId) -> Result<Vec<Book>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE user_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(map_rows_lenient("books", &rows, map_book_row))
    }

    async fn get_book(&self, user_id: UserId, id: BookId) -> Result<Book, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1 AND user_id = ?2"
        ))
        .bind(id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        match row {
            Some(row) => map_book_row(&row),
            None => Err(StorageError::NotFound),
        }
    }

    async fn update_details(
        &self,
        user_id: UserId,
        id: BookId,
        details: &BookDetails,
    ) -> Result<Book, StorageError> {
        let res = sqlx::query(
            r"
            UPDATE books
            SET status = ?1, start_date = ?2, end_date = ?3, notes = ?4
            WHERE id = ?5 AND user_id = ?6
            ",
        )
        .bind(details.status.as_str())
        .bind(details.start_date)
        .bind(details.end_date)
        .bind(details.notes.as_deref())
        .bind(id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        self.get_book(user_id, id).await
    }

    async fn delete_book(&self, user_id: UserId, id: BookId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM books WHERE id = ?1 AND user_id = ?2")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn list_statuses(&self, user_id: UserId) -> Result<Vec<String>, StorageError> {
        let rows = sqlx::query("SELECT status FROM books WHERE user_id = ?1")
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("status").map_err(ser))
            .collect()
    }
}
