use async_trait::async_trait;
use shelf_core::model::{
    Book, BookDetails, BookId, NewsletterSubscription, PagesTally, Profile, ReadingGoal,
    ReadingLog, UserId,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    /// A uniqueness constraint rejected the write.
    #[error("{0}")]
    UniqueViolation(String),

    #[error("{0}")]
    Unauthorized(String),

    /// Any other error reported by the backend; `message` is shown verbatim.
    #[error("{message}")]
    Backend {
        code: Option<String>,
        message: String,
    },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Repository contract for a user's books.
///
/// Every call is scoped to `user_id`; a book owned by someone else behaves as
/// if it did not exist.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Persist a new book and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the book cannot be stored.
    async fn insert_book(&self, book: &Book) -> Result<Book, StorageError>;

    /// All books of a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_books(&self, user_id: UserId) -> Result<Vec<Book>, StorageError>;

    /// Fetch one book.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_book(&self, user_id: UserId, id: BookId) -> Result<Book, StorageError>;

    /// Overwrite status, dates and notes of a book and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn update_details(
        &self,
        user_id: UserId,
        id: BookId,
        details: &BookDetails,
    ) -> Result<Book, StorageError>;

    /// Delete a book together with its reading logs.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn delete_book(&self, user_id: UserId, id: BookId) -> Result<(), StorageError>;

    /// Raw status column of every book of a user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_statuses(&self, user_id: UserId) -> Result<Vec<String>, StorageError>;
}

#[async_trait]
pub trait ReadingLogRepository: Send + Sync {
    /// Append a log entry and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the book does not exist, or other storage errors.
    async fn append_log(&self, log: &ReadingLog) -> Result<ReadingLog, StorageError>;

    /// Logs of one book, most recent `date_read` first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn logs_for_book(&self, book_id: BookId) -> Result<Vec<ReadingLog>, StorageError>;

    /// `(book_id, pages_read)` pairs of every log visible to the user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn tallies(&self, user_id: UserId) -> Result<Vec<PagesTally>, StorageError>;
}

#[async_trait]
pub trait ReadingGoalRepository: Send + Sync {
    /// Insert or replace the goal of `goal.user_id()`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the goal cannot be stored.
    async fn upsert_goal(&self, goal: &ReadingGoal) -> Result<ReadingGoal, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; a missing goal is `Ok(None)`.
    async fn goal_for_user(&self, user_id: UserId) -> Result<Option<ReadingGoal>, StorageError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Insert or replace the whole profile row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the profile cannot be stored.
    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; a missing profile is `Ok(None)`.
    async fn get_profile(&self, user_id: UserId) -> Result<Option<Profile>, StorageError>;
}

#[async_trait]
pub trait NewsletterRepository: Send + Sync {
    /// Record a subscription.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::UniqueViolation` if the email is already subscribed.
    async fn subscribe(&self, subscription: &NewsletterSubscription) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    books: Arc<Mutex<HashMap<BookId, Book>>>,
    logs: Arc<Mutex<Vec<ReadingLog>>>,
    goals: Arc<Mutex<HashMap<UserId, ReadingGoal>>>,
    profiles: Arc<Mutex<HashMap<UserId, Profile>>>,
    subscribers: Arc<Mutex<Vec<NewsletterSubscription>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl BookRepository for InMemoryRepository {
    async fn insert_book(&self, book: &Book) -> Result<Book, StorageError> {
        let mut guard = self.books.lock().map_err(poisoned)?;
        if guard.contains_key(&book.id()) {
            return Err(StorageError::Conflict);
        }
        guard.insert(book.id(), book.clone());
        Ok(book.clone())
    }

    async fn list_books(&self, user_id: UserId) -> Result<Vec<Book>, StorageError> {
        let guard = self.books.lock().map_err(poisoned)?;
        let mut books: Vec<Book> = guard
            .values()
            .filter(|b| b.user_id() == user_id)
            .cloned()
            .collect();
        books.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(books)
    }

    async fn get_book(&self, user_id: UserId, id: BookId) -> Result<Book, StorageError> {
        let guard = self.books.lock().map_err(poisoned)?;
        guard
            .get(&id)
            .filter(|b| b.user_id() == user_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn update_details(
        &self,
        user_id: UserId,
        id: BookId,
        details: &BookDetails,
    ) -> Result<Book, StorageError> {
        let mut guard = self.books.lock().map_err(poisoned)?;
        let book = guard
            .get_mut(&id)
            .filter(|b| b.user_id() == user_id)
            .ok_or(StorageError::NotFound)?;
        book.apply_details(details.clone());
        Ok(book.clone())
    }

    async fn delete_book(&self, user_id: UserId, id: BookId) -> Result<(), StorageError> {
        {
            let mut guard = self.books.lock().map_err(poisoned)?;
            match guard.get(&id) {
                Some(book) if book.user_id() == user_id => {
                    guard.remove(&id);
                }
                _ => return Err(StorageError::NotFound),
            }
        }
        let mut logs = self.logs.lock().map_err(poisoned)?;
        logs.retain(|log| log.book_id() != id);
        Ok(())
    }

    async fn list_statuses(&self, user_id: UserId) -> Result<Vec<String>, StorageError> {
        let guard = self.books.lock().map_err(poisoned)?;
        Ok(guard
            .values()
            .filter(|b| b.user_id() == user_id)
            .map(|b| b.status().as_str().to_owned())
            .collect())
    }
}

#[async_trait]
impl ReadingLogRepository for InMemoryRepository {
    async fn append_log(&self, log: &ReadingLog) -> Result<ReadingLog, StorageError> {
        if !self.books.lock().map_err(poisoned)?.contains_key(&log.book_id()) {
            return Err(StorageError::NotFound);
        }
        let mut guard = self.logs.lock().map_err(poisoned)?;
        guard.push(log.clone());
        Ok(log.clone())
    }

    async fn logs_for_book(&self, book_id: BookId) -> Result<Vec<ReadingLog>, StorageError> {
        let guard = self.logs.lock().map_err(poisoned)?;
        let mut logs: Vec<ReadingLog> = guard
            .iter()
            .filter(|log| log.book_id() == book_id)
            .cloned()
            .collect();
        logs.sort_by(|a, b| {
            b.date_read()
                .cmp(&a.date_read())
                .then(b.created_at().cmp(&a.created_at()))
        });
        Ok(logs)
    }

    async fn tallies(&self, user_id: UserId) -> Result<Vec<PagesTally>, StorageError> {
        let owned: Vec<BookId> = {
            let books = self.books.lock().map_err(poisoned)?;
            books
                .values()
                .filter(|b| b.user_id() == user_id)
                .map(Book::id)
                .collect()
        };
        let guard = self.logs.lock().map_err(poisoned)?;
        Ok(guard
            .iter()
            .filter(|log| owned.contains(&log.book_id()))
            .map(ReadingLog::tally)
            .collect())
    }
}

#[async_trait]
impl ReadingGoalRepository for InMemoryRepository {
    async fn upsert_goal(&self, goal: &ReadingGoal) -> Result<ReadingGoal, StorageError> {
        let mut guard = self.goals.lock().map_err(poisoned)?;
        guard.insert(goal.user_id(), goal.clone());
        Ok(goal.clone())
    }

    async fn goal_for_user(&self, user_id: UserId) -> Result<Option<ReadingGoal>, StorageError> {
        let guard = self.goals.lock().map_err(poisoned)?;
        Ok(guard.get(&user_id).cloned())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryRepository {
    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile, StorageError> {
        let mut guard = self.profiles.lock().map_err(poisoned)?;
        guard.insert(profile.id(), profile.clone());
        Ok(profile.clone())
    }

    async fn get_profile(&self, user_id: UserId) -> Result<Option<Profile>, StorageError> {
        let guard = self.profiles.lock().map_err(poisoned)?;
        Ok(guard.get(&user_id).cloned())
    }
}

#[async_trait]
impl NewsletterRepository for InMemoryRepository {
    async fn subscribe(&self, subscription: &NewsletterSubscription) -> Result<(), StorageError> {
        let mut guard = self.subscribers.lock().map_err(poisoned)?;
        if guard.iter().any(|s| s.email() == subscription.email()) {
            return Err(StorageError::UniqueViolation(format!(
                "{} is already subscribed",
                subscription.email()
            )));
        }
        guard.push(subscription.clone());
        Ok(())
    }
}

//
// ─── STORAGE ───────────────────────────────────────────────────────────────────
//

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub books: Arc<dyn BookRepository>,
    pub reading_logs: Arc<dyn ReadingLogRepository>,
    pub goals: Arc<dyn ReadingGoalRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub newsletter: Arc<dyn NewsletterRepository>,
}

impl Storage {
    /// Wire every repository to one shared adapter.
    pub fn from_repository<R>(repo: R) -> Self
    where
        R: BookRepository
            + ReadingLogRepository
            + ReadingGoalRepository
            + ProfileRepository
            + NewsletterRepository
            + Clone
            + 'static,
    {
        Self {
            books: Arc::new(repo.clone()),
            reading_logs: Arc::new(repo.clone()),
            goals: Arc::new(repo.clone()),
            profiles: Arc::new(repo.clone()),
            newsletter: Arc::new(repo),
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use shelf_core::model::{
        BookDetailsDraft, BookDraft, BookStatus, GoalPeriod, ReadingLogDraft, ReadingLogId,
    };
    use shelf_core::time::fixed_now;

    fn build_book(user: UserId, title: &str, minutes: i64) -> Book {
        let new_book = BookDraft {
            total_pages: Some("300".into()),
            ..BookDraft::new(title, "Author")
        }
        .validate()
        .unwrap();
        Book::new(
            BookId::random(),
            user,
            new_book,
            fixed_now() + Duration::minutes(minutes),
        )
    }

    fn build_log(book_id: BookId, pages: &str, date: &str) -> ReadingLog {
        let new_log = ReadingLogDraft {
            pages_read: pages.into(),
            date_read: date.into(),
        }
        .validate(book_id)
        .unwrap();
        ReadingLog::new(ReadingLogId::random(), new_log, fixed_now())
    }

    #[tokio::test]
    async fn books_are_listed_newest_first_per_user() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        let older = build_book(user, "Older", 0);
        let newer = build_book(user, "Newer", 5);
        let foreign = build_book(UserId::random(), "Foreign", 10);
        for book in [&older, &newer, &foreign] {
            repo.insert_book(book).await.unwrap();
        }

        let titles: Vec<String> = repo
            .list_books(user)
            .await
            .unwrap()
            .iter()
            .map(|b| b.title().to_owned())
            .collect();
        assert_eq!(titles, vec!["Newer", "Older"]);

        let err = repo.get_book(user, foreign.id()).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn update_details_overwrites_fields() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        let book = repo.insert_book(&build_book(user, "Dune", 0)).await.unwrap();

        let mut draft = BookDetailsDraft::from_book(&book);
        draft.set_status(BookStatus::Reading);
        draft.start_date = Some("2024-03-01".into());
        draft.notes = Some("sandworms".into());
        let details = draft.validate().unwrap();

        let updated = repo.update_details(user, book.id(), &details).await.unwrap();
        assert_eq!(updated.status(), BookStatus::Reading);
        assert_eq!(updated.start_date(), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(updated.notes(), Some("sandworms"));
    }

    #[tokio::test]
    async fn delete_cascades_to_logs() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        let book = repo.insert_book(&build_book(user, "Dune", 0)).await.unwrap();
        repo.append_log(&build_log(book.id(), "20", "2024-03-01"))
            .await
            .unwrap();

        repo.delete_book(user, book.id()).await.unwrap();

        assert!(repo.list_books(user).await.unwrap().is_empty());
        assert!(repo.logs_for_book(book.id()).await.unwrap().is_empty());
        assert!(repo.tallies(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn logs_are_newest_date_first_and_tallied_per_owner() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        let mine = repo.insert_book(&build_book(user, "Mine", 0)).await.unwrap();
        let theirs = repo
            .insert_book(&build_book(UserId::random(), "Theirs", 0))
            .await
            .unwrap();
        repo.append_log(&build_log(mine.id(), "10", "2024-03-01")).await.unwrap();
        repo.append_log(&build_log(mine.id(), "15", "2024-03-03")).await.unwrap();
        repo.append_log(&build_log(theirs.id(), "99", "2024-03-02")).await.unwrap();

        let logs = repo.logs_for_book(mine.id()).await.unwrap();
        assert_eq!(logs[0].pages_read(), 15);
        assert_eq!(logs[1].pages_read(), 10);

        let tallies = repo.tallies(user).await.unwrap();
        assert_eq!(tallies.len(), 2);
        assert!(tallies.iter().all(|t| t.book_id == mine.id()));
    }

    #[tokio::test]
    async fn same_day_logs_are_newest_entry_first() {
        let repo = InMemoryRepository::new();
        let book = repo
            .insert_book(&build_book(UserId::random(), "Dune", 0))
            .await
            .unwrap();
        let draft = |pages: &str| {
            ReadingLogDraft {
                pages_read: pages.into(),
                date_read: "2024-03-01".into(),
            }
            .validate(book.id())
            .unwrap()
        };
        let earlier = ReadingLog::new(ReadingLogId::random(), draft("10"), fixed_now());
        let later = ReadingLog::new(
            ReadingLogId::random(),
            draft("20"),
            fixed_now() + Duration::minutes(5),
        );
        repo.append_log(&earlier).await.unwrap();
        repo.append_log(&later).await.unwrap();

        let logs = repo.logs_for_book(book.id()).await.unwrap();
        let pages: Vec<u32> = logs.iter().map(ReadingLog::pages_read).collect();
        assert_eq!(pages, vec![20, 10]);
    }

    #[tokio::test]
    async fn log_for_missing_book_is_rejected() {
        let repo = InMemoryRepository::new();
        let err = repo
            .append_log(&build_log(BookId::random(), "10", "2024-03-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn goal_upsert_replaces_previous() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        let first = ReadingGoal::from_persisted(user, 100, GoalPeriod::Week, fixed_now()).unwrap();
        let second = ReadingGoal::from_persisted(user, 900, GoalPeriod::Month, fixed_now()).unwrap();
        repo.upsert_goal(&first).await.unwrap();
        repo.upsert_goal(&second).await.unwrap();

        let stored = repo.goal_for_user(user).await.unwrap().unwrap();
        assert_eq!(stored.target_pages(), 900);
        assert_eq!(stored.period(), GoalPeriod::Month);
        assert!(repo.goal_for_user(UserId::random()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_subscription_is_a_unique_violation() {
        let repo = InMemoryRepository::new();
        let sub = NewsletterSubscription::new("reader@example.com", fixed_now()).unwrap();
        repo.subscribe(&sub).await.unwrap();
        let again = NewsletterSubscription::new("READER@example.com", fixed_now()).unwrap();
        let err = repo.subscribe(&again).await.unwrap_err();
        assert!(matches!(err, StorageError::UniqueViolation(_)));
    }
}
