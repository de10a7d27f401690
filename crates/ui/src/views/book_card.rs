use dioxus::prelude::*;

use crate::vm::{BookCardBody, BookCardVm};

#[component]
pub fn BookCard(book: BookCardVm) -> Element {
    let notes = book.notes_html.clone();

    rsx! {
        article { class: "book-card status-{book.status}",
            header {
                h3 { class: "book-title", "{book.title}" }
                p { class: "book-author", "{book.author}" }
            }

            BookCardContent { body: book.body.clone() }

            footer { class: "book-footer",
                span { class: "badge {book.badge_class}", "{book.status_label}" }
                if book.has_notes {
                    span { class: "notes-flag", title: "This book has notes", "notes" }
                }
            }

            match notes {
                Some(html) => rsx! {
                    details { class: "book-notes",
                        summary { "Notes" }
                        div { dangerous_inner_html: "{html}" }
                    }
                },
                None => rsx! {},
            }
        }
    }
}

#[component]
fn BookCardContent(body: BookCardBody) -> Element {
    let width = body.bar_width();

    match body {
        BookCardBody::Progress {
            percent,
            pages_read,
            total_pages,
        } => rsx! {
            div { class: "book-progress",
                div { class: "progress-label",
                    span { "Progress" }
                    span { "{percent}%" }
                }
                div { class: "progress-track",
                    div { class: "progress-fill", style: "width: {width}%" }
                }
                p { class: "progress-pages", "{pages_read} / {total_pages} pages" }
            }
        },
        BookCardBody::Pages { total_pages } => rsx! {
            p { class: "book-pages", "{total_pages} pages" }
        },
        BookCardBody::Finished {
            total_pages,
            started,
            finished,
        } => rsx! {
            div { class: "book-finished",
                {total_pages.map(|pages| rsx! { p { class: "book-pages", "{pages} pages" } })}
                {started.map(|date| rsx! { p { "Started: {date}" } })}
                {finished.map(|date| rsx! { p { "Finished: {date}" } })}
            }
        },
        BookCardBody::Empty => rsx! {},
    }
}
