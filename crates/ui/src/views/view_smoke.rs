use std::sync::Arc;

use dioxus::prelude::*;
use services::auth::{AuthUser, Session, SessionState};
use services::{Clock, GoalService, LibraryService, ProfileOverview};
use shelf_core::model::{BookDraft, ReadingGoalDraft, ReadingLogDraft, UserId};
use shelf_core::progress::StatusCounts;
use shelf_core::time::fixed_now;
use storage::repository::Storage;

use super::{GoalCard, LibraryDocument, ProfileStats, render_library_page};
use crate::vm::{GoalCardVm, Notice, ProfileStatsVm};

fn signed_in() -> SessionState {
    let session = SessionState::new();
    session.restore(Session {
        access_token: "token".to_string(),
        refresh_token: None,
        expires_at: None,
        user: AuthUser {
            id: UserId::random(),
            email: Some("reader@example.com".to_string()),
        },
    });
    session
}

#[test]
fn empty_library_renders_empty_state() {
    let html = render_library_page(LibraryDocument::default());
    assert!(html.starts_with("<!DOCTYPE html>"), "missing doctype in {html}");
    assert!(
        html.contains("Your library is empty"),
        "missing empty state in {html}"
    );
    assert!(!html.contains("book-grid"), "unexpected grid in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn library_page_renders_cards_from_services() {
    let storage = Storage::in_memory();
    let clock = Clock::fixed(fixed_now());
    let session = signed_in();
    let library = LibraryService::new(
        clock,
        session.clone(),
        Arc::clone(&storage.books),
        Arc::clone(&storage.reading_logs),
    );
    let goals = GoalService::new(clock, session, Arc::clone(&storage.goals));

    let dune = library
        .add_book(BookDraft {
            status: "reading".to_string(),
            total_pages: Some("350".to_string()),
            notes: Some("**spice**".to_string()),
            ..BookDraft::new("Dune", "Frank Herbert")
        })
        .await
        .expect("add dune");
    library
        .log_progress(
            dune.id(),
            ReadingLogDraft {
                pages_read: "175".to_string(),
                date_read: "2024-03-01".to_string(),
            },
        )
        .await
        .expect("log");
    library
        .add_book(BookDraft {
            total_pages: Some("412".to_string()),
            ..BookDraft::new("Hyperion", "Dan Simmons")
        })
        .await
        .expect("add hyperion");
    goals
        .set_goal(ReadingGoalDraft {
            target_pages: "700".to_string(),
            period: Some("week".to_string()),
        })
        .await
        .expect("set goal");

    let books = library.load_library().await.expect("load");
    let pace = goals.current_goal().await.expect("goal");
    let html = render_library_page(LibraryDocument {
        books: &books,
        goal: pace.as_ref(),
        stats: None,
        notice: Some(Notice::success("Book added")),
    });

    assert!(html.contains("Dune"), "missing title in {html}");
    assert!(html.contains("50%"), "missing percent in {html}");
    assert!(html.contains("175 / 350 pages"), "missing pages in {html}");
    assert!(html.contains("width: 50%"), "missing bar in {html}");
    assert!(html.contains("412 pages"), "missing to-read pages in {html}");
    assert!(html.contains("<strong>spice</strong>"), "missing notes in {html}");
    assert!(html.contains("pages per day"), "missing goal card in {html}");
    assert!(html.contains("Book added"), "missing notice in {html}");
}

#[test]
fn goal_card_renders_pace() {
    let goal = GoalCardVm::from(&shelf_core::progress::GoalPace::new(
        700,
        shelf_core::model::GoalPeriod::Week,
    ));
    let html = dioxus_ssr::render_element(rsx! { GoalCard { goal } });
    assert!(html.contains("100"), "missing pace in {html}");
    assert!(html.contains("This week"), "missing period in {html}");
    assert!(html.contains("Over 7 days"), "missing days in {html}");
}

#[test]
fn profile_stats_render_counts_and_initials() {
    let stats = ProfileStatsVm::from(&ProfileOverview {
        profile: None,
        email: Some("reader@example.com".to_string()),
        counts: StatusCounts {
            read: 1,
            reading: 2,
            to_read: 1,
        },
    });
    let html = dioxus_ssr::render_element(rsx! { ProfileStats { stats } });
    assert!(html.contains(">R<"), "missing initials in {html}");
    assert!(html.contains("User Profile"), "missing heading in {html}");
    assert!(html.contains("<dd>2</dd>"), "missing reading count in {html}");
}

#[test]
fn error_notice_keeps_backend_text() {
    let err = storage::repository::StorageError::Backend {
        code: None,
        message: "JWT expired".to_string(),
    };
    let html = render_library_page(LibraryDocument {
        notice: Some(Notice::from_error(&err)),
        ..LibraryDocument::default()
    });
    assert!(html.contains("notice-error"), "missing error class in {html}");
    assert!(html.contains("JWT expired"), "missing message in {html}");
}
