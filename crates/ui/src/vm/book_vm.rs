use shelf_core::model::{BookId, BookStatus, ReadingLog};
use shelf_core::progress::BookWithProgress;

use crate::vm::markdown_vm::markdown_to_html;
use crate::vm::time_fmt::format_date;

#[must_use]
pub fn status_label(status: BookStatus) -> &'static str {
    match status {
        BookStatus::Read => "Read",
        BookStatus::Reading => "Reading",
        BookStatus::ToRead => "To read",
    }
}

/// Badge style class per status.
#[must_use]
pub fn status_badge(status: BookStatus) -> &'static str {
    match status {
        BookStatus::Read => "badge-default",
        BookStatus::Reading => "badge-secondary",
        BookStatus::ToRead => "badge-outline",
    }
}

/// What the card body shows for the book's status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookCardBody {
    /// Reading with a declared page count.
    Progress {
        percent: u64,
        pages_read: u64,
        total_pages: u32,
    },
    /// To-read: page count only.
    Pages { total_pages: u32 },
    /// Read: page count and dates, each when present.
    Finished {
        total_pages: Option<u32>,
        started: Option<String>,
        finished: Option<String>,
    },
    Empty,
}

impl BookCardBody {
    /// Bar width in percent. The label keeps the unclamped value.
    #[must_use]
    pub fn bar_width(&self) -> u64 {
        match self {
            BookCardBody::Progress { percent, .. } => (*percent).min(100),
            _ => 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookCardVm {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub status: BookStatus,
    pub status_label: &'static str,
    pub badge_class: &'static str,
    pub has_notes: bool,
    pub notes_html: Option<String>,
    pub body: BookCardBody,
}

impl From<&BookWithProgress> for BookCardVm {
    fn from(item: &BookWithProgress) -> Self {
        let book = &item.book;
        let status = book.status();
        let body = match (status, book.total_pages()) {
            (BookStatus::Reading, Some(total_pages)) => BookCardBody::Progress {
                percent: item.progress_percent(),
                pages_read: item.total_pages_read,
                total_pages,
            },
            (BookStatus::ToRead, Some(total_pages)) => BookCardBody::Pages { total_pages },
            (BookStatus::Read, total_pages) => BookCardBody::Finished {
                total_pages,
                started: book.start_date().map(format_date),
                finished: book.end_date().map(format_date),
            },
            _ => BookCardBody::Empty,
        };

        Self {
            id: book.id(),
            title: book.title().to_owned(),
            author: book.author().to_owned(),
            status,
            status_label: status_label(status),
            badge_class: status_badge(status),
            has_notes: book.notes().is_some(),
            notes_html: book.notes().map(markdown_to_html),
            body,
        }
    }
}

#[must_use]
pub fn map_book_cards(items: &[BookWithProgress]) -> Vec<BookCardVm> {
    items.iter().map(BookCardVm::from).collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntryVm {
    pub date_str: String,
    pub pages_read: u32,
}

/// Single-book view: the card plus raw notes and reading history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookDetailVm {
    pub card: BookCardVm,
    pub progress_line: Option<String>,
    pub notes: Option<String>,
    pub history: Vec<LogEntryVm>,
}

impl BookDetailVm {
    #[must_use]
    pub fn new(item: &BookWithProgress, logs: &[ReadingLog]) -> Self {
        let card = BookCardVm::from(item);
        let progress_line = match &card.body {
            BookCardBody::Progress {
                percent,
                pages_read,
                total_pages,
            } => Some(format!("{percent}% ({pages_read} / {total_pages} pages)")),
            BookCardBody::Pages { total_pages } => Some(format!("{total_pages} pages")),
            BookCardBody::Finished {
                total_pages: Some(total_pages),
                ..
            } => Some(format!("{total_pages} pages")),
            _ => None,
        };
        Self {
            card,
            progress_line,
            notes: item.book.notes().map(str::to_owned),
            history: logs
                .iter()
                .map(|log| LogEntryVm {
                    date_str: format_date(log.date_read()),
                    pages_read: log.pages_read(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::model::{Book, BookDetailsDraft, BookDraft, UserId};
    use shelf_core::time::fixed_now;

    fn book(status: BookStatus, pages: Option<&str>) -> Book {
        let draft = BookDraft {
            status: status.as_str().into(),
            total_pages: pages.map(str::to_owned),
            ..BookDraft::new("Dune", "Frank Herbert")
        };
        Book::new(
            BookId::random(),
            UserId::random(),
            draft.validate().unwrap(),
            fixed_now(),
        )
    }

    #[test]
    fn reading_book_shows_unclamped_percent() {
        let item = BookWithProgress::new(book(BookStatus::Reading, Some("100")), 150);
        let vm = BookCardVm::from(&item);
        assert_eq!(
            vm.body,
            BookCardBody::Progress {
                percent: 150,
                pages_read: 150,
                total_pages: 100
            }
        );
        assert_eq!(vm.body.bar_width(), 100);
        assert_eq!(vm.status_label, "Reading");
    }

    #[test]
    fn reading_without_total_has_no_bar() {
        let item = BookWithProgress::new(book(BookStatus::Reading, None), 40);
        assert_eq!(BookCardVm::from(&item).body, BookCardBody::Empty);
    }

    #[test]
    fn to_read_shows_page_count_only() {
        let item = BookWithProgress::new(book(BookStatus::ToRead, Some("412")), 10);
        let vm = BookCardVm::from(&item);
        assert_eq!(vm.body, BookCardBody::Pages { total_pages: 412 });
        assert_eq!(vm.badge_class, "badge-outline");
    }

    #[test]
    fn read_book_shows_dates_when_present() {
        let mut stored = book(BookStatus::Read, None);
        let mut edit = BookDetailsDraft::from_book(&stored);
        edit.start_date = Some("2024-03-01".into());
        edit.notes = Some("*classic*".into());
        stored.apply_details(edit.validate().unwrap());

        let vm = BookCardVm::from(&BookWithProgress::new(stored, 0));
        assert_eq!(
            vm.body,
            BookCardBody::Finished {
                total_pages: None,
                started: Some("Mar 1, 2024".into()),
                finished: None
            }
        );
        assert!(vm.has_notes);
        assert_eq!(vm.notes_html.as_deref(), Some("<p><em>classic</em></p>\n"));
    }

    #[test]
    fn detail_lists_history_in_given_order() {
        let stored = book(BookStatus::Reading, Some("350"));
        let logs = vec![
            ReadingLog::from_persisted(
                shelf_core::model::ReadingLogId::random(),
                stored.id(),
                chrono::NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                75,
                fixed_now(),
            )
            .unwrap(),
        ];
        let detail = BookDetailVm::new(&BookWithProgress::new(stored, 175), &logs);
        assert_eq!(detail.progress_line.as_deref(), Some("50% (175 / 350 pages)"));
        assert_eq!(
            detail.history,
            vec![LogEntryVm {
                date_str: "Mar 2, 2024".into(),
                pages_read: 75
            }]
        );
    }
}
