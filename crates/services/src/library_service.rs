use std::sync::Arc;

use shelf_core::model::{
    Book, BookDetailsDraft, BookDraft, BookId, ReadingLog, ReadingLogDraft, ReadingLogId, UserId,
};
use shelf_core::progress::{BookWithProgress, attach_progress};
use storage::repository::{BookRepository, ReadingLogRepository};

use crate::Clock;
use crate::auth::SessionState;
use crate::error::LibraryError;

/// Books of the signed-in user and the reading logged against them.
#[derive(Clone)]
pub struct LibraryService {
    clock: Clock,
    session: SessionState,
    books: Arc<dyn BookRepository>,
    logs: Arc<dyn ReadingLogRepository>,
}

impl LibraryService {
    #[must_use]
    pub fn new(
        clock: Clock,
        session: SessionState,
        books: Arc<dyn BookRepository>,
        logs: Arc<dyn ReadingLogRepository>,
    ) -> Self {
        Self {
            clock,
            session,
            books,
            logs,
        }
    }

    fn user_id(&self) -> Result<UserId, LibraryError> {
        self.session.user_id().ok_or(LibraryError::NotSignedIn)
    }

    /// Books newest first, each with its aggregated pages read.
    ///
    /// A failed log fetch degrades to zero progress instead of failing the page.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::NotSignedIn` without a session, or
    /// `LibraryError::Storage` if the books cannot be fetched.
    pub async fn load_library(&self) -> Result<Vec<BookWithProgress>, LibraryError> {
        let user_id = self.user_id()?;
        let books = self.books.list_books(user_id).await?;
        let tallies = match self.logs.tallies(user_id).await {
            Ok(tallies) => tallies,
            Err(err) => {
                log::error!("failed to fetch reading logs: {err}");
                Vec::new()
            }
        };
        log::debug!("loaded {} book(s), {} log entries", books.len(), tallies.len());
        Ok(attach_progress(books, tallies))
    }

    /// Validate and store a new book.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Book` with every invalid field, or storage errors.
    pub async fn add_book(&self, draft: BookDraft) -> Result<Book, LibraryError> {
        let user_id = self.user_id()?;
        let new_book = draft.validate()?;
        let book = Book::new(BookId::random(), user_id, new_book, self.clock.now());
        let stored = self.books.insert_book(&book).await?;
        log::info!("added book {} ({})", stored.id(), stored.title());
        Ok(stored)
    }

    /// # Errors
    ///
    /// Returns `LibraryError::Storage(StorageError::NotFound)` for unknown books.
    pub async fn get_book(&self, id: BookId) -> Result<Book, LibraryError> {
        let user_id = self.user_id()?;
        Ok(self.books.get_book(user_id, id).await?)
    }

    /// Apply a details edit. Dates hidden by the new status are cleared first.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Book` for invalid fields, or storage errors.
    pub async fn update_details(
        &self,
        id: BookId,
        draft: BookDetailsDraft,
    ) -> Result<Book, LibraryError> {
        let user_id = self.user_id()?;
        let details = draft.validate()?;
        let updated = self.books.update_details(user_id, id, &details).await?;
        log::info!("updated book {id} to {}", updated.status());
        Ok(updated)
    }

    /// Record pages read on a day.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::ReadingLog` for invalid fields, or storage errors
    /// (`NotFound` when the book is not the user's).
    pub async fn log_progress(
        &self,
        book_id: BookId,
        draft: ReadingLogDraft,
    ) -> Result<ReadingLog, LibraryError> {
        let user_id = self.user_id()?;
        let new_log = draft.validate(book_id)?;
        self.books.get_book(user_id, book_id).await?;
        let log = ReadingLog::new(ReadingLogId::random(), new_log, self.clock.now());
        let stored = self.logs.append_log(&log).await?;
        log::info!("logged {} page(s) for book {book_id}", stored.pages_read());
        Ok(stored)
    }

    /// Blank log form for today.
    #[must_use]
    pub fn log_draft(&self) -> ReadingLogDraft {
        ReadingLogDraft::for_day(self.clock.today())
    }

    /// Logs of one book, most recent day first.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Storage` on failures.
    pub async fn reading_history(&self, book_id: BookId) -> Result<Vec<ReadingLog>, LibraryError> {
        let user_id = self.user_id()?;
        self.books.get_book(user_id, book_id).await?;
        Ok(self.logs.logs_for_book(book_id).await?)
    }

    /// Delete a book; its logs go with it.
    ///
    /// Returns the deleted book's title for the confirmation notice.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Storage` on failures.
    pub async fn delete_book(&self, id: BookId) -> Result<String, LibraryError> {
        let user_id = self.user_id()?;
        let book = self.books.get_book(user_id, id).await?;
        self.books.delete_book(user_id, id).await?;
        log::info!("deleted book {id}");
        Ok(book.title().to_owned())
    }
}
