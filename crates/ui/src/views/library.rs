use dioxus::prelude::*;
use shelf_core::progress::{BookWithProgress, GoalPace};

use crate::views::{BookCard, GoalCard, NoticeBanner, ProfileStats};
use crate::vm::{BookCardVm, GoalCardVm, Notice, ProfileStatsVm, map_book_cards};

const PAGE_STYLE: &str = "
body { font-family: system-ui, sans-serif; margin: 2rem; color: #1f2933; }
.book-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(16rem, 1fr)); gap: 1rem; }
.book-card { border: 1px solid #d9e2ec; border-radius: 0.5rem; padding: 1rem; }
.book-author, .progress-pages, .book-pages { color: #627d98; }
.progress-track { background: #e4e7eb; border-radius: 999px; height: 0.5rem; }
.progress-fill { background: #3e4c59; border-radius: 999px; height: 100%; }
.badge { border: 1px solid #3e4c59; border-radius: 999px; padding: 0 0.5rem; font-size: 0.8rem; }
.badge-default { background: #3e4c59; color: #fff; }
.badge-secondary { background: #e4e7eb; }
.library-empty { border: 2px dashed #d9e2ec; border-radius: 0.5rem; padding: 4rem; text-align: center; }
.notice-error { color: #ab091e; }
";

#[component]
pub fn LibraryPage(
    books: Vec<BookCardVm>,
    #[props(!optional)] goal: Option<GoalCardVm>,
    #[props(!optional)] stats: Option<ProfileStatsVm>,
    #[props(!optional)] notice: Option<Notice>,
) -> Element {
    rsx! {
        main { class: "page library",
            h1 { "My Library" }

            {notice.map(|notice| rsx! { NoticeBanner { notice } })}
            {stats.map(|stats| rsx! { ProfileStats { stats } })}
            {goal.map(|goal| rsx! { GoalCard { goal } })}

            if books.is_empty() {
                div { class: "library-empty",
                    h2 { "Your library is empty" }
                    p { "Add your first book to get started." }
                }
            } else {
                div { class: "book-grid",
                    for book in books.iter() {
                        BookCard { key: "{book.id}", book: book.clone() }
                    }
                }
            }
        }
    }
}

/// Inputs of a standalone library export.
#[derive(Clone, Debug, Default)]
pub struct LibraryDocument<'a> {
    pub books: &'a [BookWithProgress],
    pub goal: Option<&'a GoalPace>,
    pub stats: Option<ProfileStatsVm>,
    pub notice: Option<Notice>,
}

/// Render the library as a complete HTML document.
#[must_use]
pub fn render_library_page(doc: LibraryDocument<'_>) -> String {
    let books = map_book_cards(doc.books);
    let goal = doc.goal.map(GoalCardVm::from);
    let body = dioxus_ssr::render_element(rsx! {
        LibraryPage {
            books,
            goal,
            stats: doc.stats,
            notice: doc.notice,
        }
    });

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>My Library</title>\n<style>{PAGE_STYLE}</style>\n</head>\n\
         <body>\n{body}\n</body>\n</html>\n"
    )
}
