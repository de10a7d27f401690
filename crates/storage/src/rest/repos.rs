use async_trait::async_trait;
use reqwest::Method;
use shelf_core::model::{
    Book, BookDetails, BookId, NewsletterSubscription, PagesTally, Profile, ReadingGoal,
    ReadingLog, UserId,
};

use super::query::TableQuery;
use super::rows::{
    BookDetailsPatch, BookRow, NewBookRow, NewReadingLogRow, ProfileRow, ReadingGoalRow,
    ReadingLogRow, StatusRow, SubscriberRow, TallyRow, convert_lenient,
};
use super::{Prefer, RestRepository};
use crate::repository::{
    BookRepository, NewsletterRepository, ProfileRepository, ReadingGoalRepository,
    ReadingLogRepository, StorageError,
};

const BOOKS: &str = "books";
const READING_LOGS: &str = "reading_logs";
const READING_GOALS: &str = "reading_goals";
const PROFILES: &str = "profiles";
const NEWSLETTER: &str = "newsletter_subscribers";

fn first<T>(rows: Vec<T>) -> Result<T, StorageError> {
    rows.into_iter().next().ok_or(StorageError::NotFound)
}

#[async_trait]
impl BookRepository for RestRepository {
    async fn insert_book(&self, book: &Book) -> Result<Book, StorageError> {
        let req = self.request(
            Method::POST,
            &TableQuery::table(BOOKS),
            Some(Prefer::Representation),
        )?;
        let rows: Vec<BookRow> = Self::write_rows(req, &NewBookRow::from(book)).await?;
        Book::try_from(first(rows)?)
    }

    async fn list_books(&self, user_id: UserId) -> Result<Vec<Book>, StorageError> {
        let query = TableQuery::table(BOOKS)
            .select("*")
            .eq("user_id", user_id)
            .order_desc("created_at");
        let rows: Vec<BookRow> = Self::fetch_rows(self.request(Method::GET, &query, None)?).await?;
        Ok(convert_lenient(BOOKS, rows))
    }

    async fn get_book(&self, user_id: UserId, id: BookId) -> Result<Book, StorageError> {
        let query = TableQuery::table(BOOKS)
            .select("*")
            .eq("id", id)
            .eq("user_id", user_id)
            .limit(1);
        let row: Option<BookRow> =
            Self::fetch_optional(self.request(Method::GET, &query, None)?).await?;
        Book::try_from(row.ok_or(StorageError::NotFound)?)
    }

    async fn update_details(
        &self,
        user_id: UserId,
        id: BookId,
        details: &BookDetails,
    ) -> Result<Book, StorageError> {
        let query = TableQuery::table(BOOKS).eq("id", id).eq("user_id", user_id);
        let req = self.request(Method::PATCH, &query, Some(Prefer::Representation))?;
        let rows: Vec<BookRow> = Self::write_rows(req, &BookDetailsPatch::from(details)).await?;
        Book::try_from(first(rows)?)
    }

    async fn delete_book(&self, user_id: UserId, id: BookId) -> Result<(), StorageError> {
        // Reading logs go with the book through the backend's ON DELETE CASCADE.
        let query = TableQuery::table(BOOKS)
            .select("id")
            .eq("id", id)
            .eq("user_id", user_id);
        let req = self.request(Method::DELETE, &query, Some(Prefer::Representation))?;
        let deleted: Vec<serde_json::Value> = Self::fetch_rows(req).await?;
        if deleted.is_empty() {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn list_statuses(&self, user_id: UserId) -> Result<Vec<String>, StorageError> {
        let query = TableQuery::table(BOOKS)
            .select("status")
            .eq("user_id", user_id);
        let rows: Vec<StatusRow> =
            Self::fetch_rows(self.request(Method::GET, &query, None)?).await?;
        Ok(rows.into_iter().filter_map(|r| r.status).collect())
    }
}

#[async_trait]
impl ReadingLogRepository for RestRepository {
    async fn append_log(&self, log: &ReadingLog) -> Result<ReadingLog, StorageError> {
        let req = self.request(
            Method::POST,
            &TableQuery::table(READING_LOGS),
            Some(Prefer::Representation),
        )?;
        let rows: Vec<ReadingLogRow> = Self::write_rows(req, &NewReadingLogRow::from(log)).await?;
        ReadingLog::try_from(first(rows)?)
    }

    async fn logs_for_book(&self, book_id: BookId) -> Result<Vec<ReadingLog>, StorageError> {
        let query = TableQuery::table(READING_LOGS)
            .select("*")
            .eq("book_id", book_id)
            .order_desc("date_read")
            .order_desc("created_at");
        let rows: Vec<ReadingLogRow> =
            Self::fetch_rows(self.request(Method::GET, &query, None)?).await?;
        Ok(convert_lenient(READING_LOGS, rows))
    }

    async fn tallies(&self, _user_id: UserId) -> Result<Vec<PagesTally>, StorageError> {
        // reading_logs has no owner column; row-level security limits the
        // result to logs of the caller's books.
        let query = TableQuery::table(READING_LOGS).select("book_id,pages_read");
        let rows: Vec<TallyRow> = Self::fetch_rows(self.request(Method::GET, &query, None)?).await?;
        Ok(convert_lenient(READING_LOGS, rows))
    }
}

#[async_trait]
impl ReadingGoalRepository for RestRepository {
    async fn upsert_goal(&self, goal: &ReadingGoal) -> Result<ReadingGoal, StorageError> {
        let query = TableQuery::table(READING_GOALS).on_conflict("user_id");
        let req = self.request(Method::POST, &query, Some(Prefer::MergeDuplicates))?;
        let rows: Vec<ReadingGoalRow> = Self::write_rows(req, &ReadingGoalRow::from(goal)).await?;
        ReadingGoal::try_from(first(rows)?)
    }

    async fn goal_for_user(&self, user_id: UserId) -> Result<Option<ReadingGoal>, StorageError> {
        let query = TableQuery::table(READING_GOALS)
            .select("*")
            .eq("user_id", user_id)
            .limit(1);
        let row: Option<ReadingGoalRow> =
            Self::fetch_optional(self.request(Method::GET, &query, None)?).await?;
        row.map(ReadingGoal::try_from).transpose()
    }
}

#[async_trait]
impl ProfileRepository for RestRepository {
    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile, StorageError> {
        let query = TableQuery::table(PROFILES).on_conflict("id");
        let req = self.request(Method::POST, &query, Some(Prefer::MergeDuplicates))?;
        let rows: Vec<ProfileRow> = Self::write_rows(req, &ProfileRow::from(profile)).await?;
        Ok(Profile::from(first(rows)?))
    }

    async fn get_profile(&self, user_id: UserId) -> Result<Option<Profile>, StorageError> {
        let query = TableQuery::table(PROFILES)
            .select("*")
            .eq("id", user_id)
            .limit(1);
        let row: Option<ProfileRow> =
            Self::fetch_optional(self.request(Method::GET, &query, None)?).await?;
        Ok(row.map(Profile::from))
    }
}

#[async_trait]
impl NewsletterRepository for RestRepository {
    async fn subscribe(&self, subscription: &NewsletterSubscription) -> Result<(), StorageError> {
        let req = self
            .request(
                Method::POST,
                &TableQuery::table(NEWSLETTER),
                Some(Prefer::Minimal),
            )?
            .json(&SubscriberRow::from(subscription));
        Self::send_empty(req).await
    }
}
