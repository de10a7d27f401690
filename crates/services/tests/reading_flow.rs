use std::sync::{Arc, Mutex};

use services::auth::AuthEvent;
use services::{AppServices, Clock, LibraryError, NewsletterServiceError, SignUpOutcome};
use shelf_core::model::{BookDetailsDraft, BookDraft, ProfileDraft, ReadingGoalDraft, ReadingLogDraft};
use shelf_core::progress::StatusCounts;
use shelf_core::time::fixed_now;
use storage::repository::StorageError;

fn book(title: &str, pages: &str) -> BookDraft {
    BookDraft {
        total_pages: Some(pages.to_string()),
        ..BookDraft::new(title, "Frank Herbert")
    }
}

fn pages(n: &str, date: &str) -> ReadingLogDraft {
    ReadingLogDraft {
        pages_read: n.to_string(),
        date_read: date.to_string(),
    }
}

async fn run_reading_flow(services: AppServices) {
    let auth = services.auth();
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let _subscription = auth.subscribe(move |event, _| sink.lock().unwrap().push(event));

    let outcome = auth
        .sign_up("reader@example.com", "secret1")
        .await
        .expect("sign up");
    assert!(matches!(outcome, SignUpOutcome::SignedIn(_)));

    let library = services.library();
    let dune = library
        .add_book(book("Dune", "350"))
        .await
        .expect("add dune");
    let messiah = library
        .add_book(book("Dune Messiah", "100"))
        .await
        .expect("add messiah");

    library
        .log_progress(dune.id(), pages("100", "2024-03-01"))
        .await
        .expect("log 1");
    library
        .log_progress(dune.id(), pages("75", "2024-03-02"))
        .await
        .expect("log 2");
    library
        .log_progress(messiah.id(), pages("150", "2024-03-03"))
        .await
        .expect("log 3");

    let shelf = library.load_library().await.expect("load library");
    assert_eq!(shelf.len(), 2);
    let dune_row = shelf.iter().find(|b| b.book.id() == dune.id()).unwrap();
    assert_eq!(dune_row.total_pages_read, 175);
    assert_eq!(dune_row.progress_percent(), 50);
    let messiah_row = shelf.iter().find(|b| b.book.id() == messiah.id()).unwrap();
    assert_eq!(messiah_row.progress_percent(), 150);

    let mut edit = BookDetailsDraft::from_book(&dune);
    edit.status = "reading".to_string();
    edit.start_date = Some("2024-03-01".to_string());
    library
        .update_details(dune.id(), edit)
        .await
        .expect("mark reading");

    let goals = services.goals();
    goals
        .set_goal(ReadingGoalDraft {
            target_pages: "700".to_string(),
            period: Some("week".to_string()),
        })
        .await
        .expect("set goal");
    let pace = goals.current_goal().await.expect("goal").expect("goal set");
    assert_eq!(pace.pages_per_day, 100);

    let profiles = services.profiles();
    profiles
        .save_profile(ProfileDraft {
            first_name: Some("Ada".to_string()),
            ..ProfileDraft::default()
        })
        .await
        .expect("save profile");
    let overview = profiles.load_overview().await.expect("overview");
    assert_eq!(overview.email.as_deref(), Some("reader@example.com"));
    assert_eq!(
        overview.counts,
        StatusCounts {
            read: 0,
            reading: 1,
            to_read: 1
        }
    );

    let title = library.delete_book(dune.id()).await.expect("delete");
    assert_eq!(title, "Dune");
    assert!(matches!(
        library.reading_history(dune.id()).await,
        Err(LibraryError::Storage(StorageError::NotFound))
    ));
    assert_eq!(library.load_library().await.unwrap().len(), 1);

    auth.sign_out().await.expect("sign out");
    assert!(matches!(
        library.load_library().await,
        Err(LibraryError::NotSignedIn)
    ));
    assert_eq!(
        *events.lock().unwrap(),
        vec![AuthEvent::SignedIn, AuthEvent::SignedOut]
    );
}

#[tokio::test]
async fn reading_flow_in_memory() {
    run_reading_flow(AppServices::in_memory(Clock::fixed(fixed_now()))).await;
}

#[tokio::test]
async fn reading_flow_sqlite() {
    let services = AppServices::local_sqlite(
        "sqlite:file:memdb_reading_flow?mode=memory&cache=shared",
        Clock::fixed(fixed_now()),
    )
    .await
    .expect("connect sqlite");
    run_reading_flow(services).await;
}

#[tokio::test]
async fn newsletter_needs_no_account() {
    let services = AppServices::local_sqlite(
        "sqlite:file:memdb_newsletter_flow?mode=memory&cache=shared",
        Clock::fixed(fixed_now()),
    )
    .await
    .expect("connect sqlite");
    let newsletter = services.newsletter();

    newsletter
        .subscribe("fan@example.com")
        .await
        .expect("first subscribe");
    let err = newsletter.subscribe("FAN@example.com").await.unwrap_err();
    assert!(matches!(err, NewsletterServiceError::AlreadySubscribed));
    assert_eq!(
        err.to_string(),
        "this email is already subscribed to the newsletter"
    );
}
