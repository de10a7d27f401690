use chrono::{Duration, NaiveDate};
use shelf_core::model::{
    Book, BookDetailsDraft, BookDraft, BookId, BookStatus, GoalPeriod, NewsletterSubscription,
    Profile, ProfileDraft, ReadingGoal, ReadingLog, ReadingLogDraft, ReadingLogId, UserId,
};
use shelf_core::progress::StatusCounts;
use shelf_core::time::fixed_now;
use storage::repository::{
    BookRepository, NewsletterRepository, ProfileRepository, ReadingGoalRepository,
    ReadingLogRepository, Storage, StorageError,
};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let repo = SqliteRepository::connect(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

fn build_book(user: UserId, title: &str, total_pages: Option<&str>, minutes: i64) -> Book {
    let new_book = BookDraft {
        total_pages: total_pages.map(str::to_owned),
        notes: Some("borrowed from Sam".into()),
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
async fn sqlite_roundtrips_books_newest_first() {
    let repo = connect("memdb_books").await;
    let user = UserId::random();

    let older = repo
        .insert_book(&build_book(user, "Older", Some("350"), 0))
        .await
        .unwrap();
    let newer = repo
        .insert_book(&build_book(user, "Newer", None, 10))
        .await
        .unwrap();
    repo.insert_book(&build_book(UserId::random(), "Not mine", None, 20))
        .await
        .unwrap();

    assert_eq!(older.total_pages(), Some(350));
    assert_eq!(older.notes(), Some("borrowed from Sam"));
    assert_eq!(older.created_at(), fixed_now());

    let books = repo.list_books(user).await.unwrap();
    let ids: Vec<BookId> = books.iter().map(Book::id).collect();
    assert_eq!(ids, vec![newer.id(), older.id()]);

    let statuses = repo.list_statuses(user).await.unwrap();
    assert_eq!(statuses, vec!["to-read".to_owned(), "to-read".to_owned()]);
}

#[tokio::test]
async fn sqlite_updates_details_and_clears_columns() {
    let repo = connect("memdb_details").await;
    let user = UserId::random();
    let book = repo
        .insert_book(&build_book(user, "Dune", Some("412"), 0))
        .await
        .unwrap();

    let mut draft = BookDetailsDraft::from_book(&book);
    draft.set_status(BookStatus::Read);
    draft.start_date = Some("2024-02-01".into());
    draft.end_date = Some("2024-02-20".into());
    let read = repo
        .update_details(user, book.id(), &draft.validate().unwrap())
        .await
        .unwrap();
    assert_eq!(read.status(), BookStatus::Read);
    assert_eq!(read.end_date(), NaiveDate::from_ymd_opt(2024, 2, 20));

    let mut draft = BookDetailsDraft::from_book(&read);
    draft.set_status(BookStatus::ToRead);
    draft.notes = Some("  ".into());
    let back = repo
        .update_details(user, book.id(), &draft.validate().unwrap())
        .await
        .unwrap();
    assert_eq!(back.status(), BookStatus::ToRead);
    assert_eq!(back.start_date(), None);
    assert_eq!(back.end_date(), None);
    assert_eq!(back.notes(), None);

    let err = repo
        .update_details(UserId::random(), book.id(), &BookDetailsDraft::from_book(&back).validate().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn sqlite_delete_cascades_reading_logs() {
    let repo = connect("memdb_cascade").await;
    let user = UserId::random();
    let book = repo
        .insert_book(&build_book(user, "Dune", Some("412"), 0))
        .await
        .unwrap();
    let keep = repo
        .insert_book(&build_book(user, "Emma", Some("300"), 1))
        .await
        .unwrap();

    repo.append_log(&build_log(book.id(), "30", "2024-03-01")).await.unwrap();
    repo.append_log(&build_log(book.id(), "45", "2024-03-04")).await.unwrap();
    repo.append_log(&build_log(keep.id(), "12", "2024-03-02")).await.unwrap();

    let logs = repo.logs_for_book(book.id()).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].date_read(), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    assert_eq!(repo.tallies(user).await.unwrap().len(), 3);

    repo.delete_book(user, book.id()).await.unwrap();

    let remaining: Vec<BookId> = repo.list_books(user).await.unwrap().iter().map(Book::id).collect();
    assert_eq!(remaining, vec![keep.id()]);
    assert!(repo.logs_for_book(book.id()).await.unwrap().is_empty());
    let tallies = repo.tallies(user).await.unwrap();
    assert_eq!(tallies.len(), 1);
    assert_eq!(tallies[0].book_id, keep.id());

    let err = repo.delete_book(user, book.id()).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn sqlite_rejects_log_for_missing_book() {
    let repo = connect("memdb_orphan_log").await;
    let err = repo
        .append_log(&build_log(BookId::random(), "10", "2024-03-01"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn sqlite_goal_upsert_replaces_wholesale() {
    let repo = connect("memdb_goals").await;
    let user = UserId::random();
    assert!(repo.goal_for_user(user).await.unwrap().is_none());

    let weekly = ReadingGoal::from_persisted(user, 700, GoalPeriod::Week, fixed_now()).unwrap();
    repo.upsert_goal(&weekly).await.unwrap();
    let later = fixed_now() + Duration::days(3);
    let monthly = ReadingGoal::from_persisted(user, 1200, GoalPeriod::Month, later).unwrap();
    repo.upsert_goal(&monthly).await.unwrap();

    let stored = repo.goal_for_user(user).await.unwrap().unwrap();
    assert_eq!(stored, monthly);
}

#[tokio::test]
async fn sqlite_profile_upsert_overwrites_every_column() {
    let repo = connect("memdb_profiles").await;
    let user = UserId::random();
    assert!(repo.get_profile(user).await.unwrap().is_none());

    let first = ProfileDraft {
        first_name: Some("Ada".into()),
        last_name: Some("Lovelace".into()),
        country: Some("UK".into()),
        gender: Some("female".into()),
    }
    .validate(user, fixed_now())
    .unwrap();
    repo.upsert_profile(&first).await.unwrap();

    let second = ProfileDraft {
        first_name: Some("Ada".into()),
        ..ProfileDraft::default()
    }
    .validate(user, fixed_now() + Duration::hours(1))
    .unwrap();
    repo.upsert_profile(&second).await.unwrap();

    let stored: Profile = repo.get_profile(user).await.unwrap().unwrap();
    assert_eq!(stored.first_name(), Some("Ada"));
    assert_eq!(stored.last_name(), None);
    assert_eq!(stored.country(), None);
    assert_eq!(stored.updated_at(), Some(fixed_now() + Duration::hours(1)));
}

#[tokio::test]
async fn sqlite_newsletter_duplicate_is_unique_violation() {
    let storage = Storage::sqlite("sqlite:file:memdb_newsletter?mode=memory&cache=shared")
        .await
        .expect("storage");
    let sub = NewsletterSubscription::new("reader@example.com", fixed_now()).unwrap();
    storage.newsletter.subscribe(&sub).await.unwrap();

    let err = storage.newsletter.subscribe(&sub).await.unwrap_err();
    assert!(matches!(err, StorageError::UniqueViolation(_)));
}

#[tokio::test]
async fn sqlite_skips_rows_with_unknown_status() {
    let repo = connect("memdb_unknown_status").await;
    let user = UserId::random();
    let kept = repo
        .insert_book(&build_book(user, "Kept", Some("200"), 0))
        .await
        .unwrap();

    sqlx::query(
        r"
        INSERT INTO books (id, user_id, title, author, status, created_at)
        VALUES (?1, ?2, 'Shelved', 'Author', 'abandoned', ?3)
        ",
    )
    .bind(BookId::random().to_string())
    .bind(user.to_string())
    .bind(fixed_now() + Duration::minutes(5))
    .execute(repo.pool())
    .await
    .unwrap();

    let books = repo.list_books(user).await.unwrap();
    let ids: Vec<BookId> = books.iter().map(Book::id).collect();
    assert_eq!(ids, vec![kept.id()]);

    let statuses = repo.list_statuses(user).await.unwrap();
    assert_eq!(statuses.len(), 2);
    let counts = StatusCounts::tally(statuses.iter().map(String::as_str));
    assert_eq!(
        counts,
        StatusCounts {
            read: 0,
            reading: 0,
            to_read: 1,
        }
    );
}

#[tokio::test]
async fn sqlite_skips_malformed_log_rows() {
    let repo = connect("memdb_malformed_log").await;
    let book = repo
        .insert_book(&build_book(UserId::random(), "Dune", Some("400"), 0))
        .await
        .unwrap();
    let good = repo
        .append_log(&build_log(book.id(), "25", "2024-03-02"))
        .await
        .unwrap();

    sqlx::query(
        r"
        INSERT INTO reading_logs (id, book_id, date_read, pages_read, created_at)
        VALUES ('not-a-uuid', ?1, ?2, 10, ?3)
        ",
    )
    .bind(book.id().to_string())
    .bind(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    .bind(fixed_now())
    .execute(repo.pool())
    .await
    .unwrap();

    let logs = repo.logs_for_book(book.id()).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].id(), good.id());
}
