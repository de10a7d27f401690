//! Derived reading numbers: pages read per book, progress percentage,
//! shelf counts per status and the daily pace of a reading goal.
//!
//! Everything here is a pure linear pass over small in-memory collections.

use std::collections::HashMap;

use crate::model::{Book, BookId, BookStatus, GoalPeriod, PagesTally, ReadingGoal};

//
// ─── AGGREGATION ───────────────────────────────────────────────────────────────
//

/// Sum `pages_read` per book over an unordered collection of log entries.
///
/// Books without entries are absent; look them up with [`pages_read_for`].
/// Entries for books the caller does not display are harmless.
#[must_use]
pub fn pages_read_by_book(tallies: impl IntoIterator<Item = PagesTally>) -> HashMap<BookId, u64> {
    let mut totals: HashMap<BookId, u64> = HashMap::new();
    for tally in tallies {
        *totals.entry(tally.book_id).or_insert(0) += u64::from(tally.pages_read);
    }
    totals
}

/// Total for `book_id`, defaulting to zero when the book has no entries.
#[must_use]
pub fn pages_read_for(totals: &HashMap<BookId, u64>, book_id: BookId) -> u64 {
    totals.get(&book_id).copied().unwrap_or(0)
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Raw progress percentage, not clamped.
///
/// Zero when the book declares no page count or nothing was read; logging more
/// pages than the book has yields a value above 100.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn progress_ratio(total_pages: Option<u32>, pages_read: u64) -> f64 {
    match total_pages {
        Some(total) if total > 0 && pages_read > 0 => {
            (pages_read as f64 / f64::from(total)) * 100.0
        }
        _ => 0.0,
    }
}

/// [`progress_ratio`] rounded to the nearest whole percent for display.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_percent(total_pages: Option<u32>, pages_read: u64) -> u64 {
    progress_ratio(total_pages, pages_read).round() as u64
}

/// A book joined with the pages logged against it. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookWithProgress {
    pub book: Book,
    pub total_pages_read: u64,
}

impl BookWithProgress {
    #[must_use]
    pub fn new(book: Book, total_pages_read: u64) -> Self {
        Self {
            book,
            total_pages_read,
        }
    }

    #[must_use]
    pub fn progress_ratio(&self) -> f64 {
        progress_ratio(self.book.total_pages(), self.total_pages_read)
    }

    #[must_use]
    pub fn progress_percent(&self) -> u64 {
        progress_percent(self.book.total_pages(), self.total_pages_read)
    }
}

/// Join books with the aggregated log totals, keeping the books' order.
#[must_use]
pub fn attach_progress(
    books: Vec<Book>,
    tallies: impl IntoIterator<Item = PagesTally>,
) -> Vec<BookWithProgress> {
    let totals = pages_read_by_book(tallies);
    books
        .into_iter()
        .map(|book| {
            let read = pages_read_for(&totals, book.id());
            BookWithProgress::new(book, read)
        })
        .collect()
}

//
// ─── STATUS COUNTS ─────────────────────────────────────────────────────────────
//

/// Number of books per shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub read: usize,
    pub reading: usize,
    pub to_read: usize,
}

impl StatusCounts {
    /// Count raw status values; anything unrecognised is skipped.
    #[must_use]
    pub fn tally<'a>(statuses: impl IntoIterator<Item = &'a str>) -> Self {
        statuses
            .into_iter()
            .filter_map(BookStatus::parse)
            .fold(Self::default(), Self::with)
    }

    #[must_use]
    pub fn from_books<'a>(books: impl IntoIterator<Item = &'a Book>) -> Self {
        books
            .into_iter()
            .map(Book::status)
            .fold(Self::default(), Self::with)
    }

    fn with(mut self, status: BookStatus) -> Self {
        match status {
            BookStatus::Read => self.read += 1,
            BookStatus::Reading => self.reading += 1,
            BookStatus::ToRead => self.to_read += 1,
        }
        self
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.read + self.reading + self.to_read
    }
}

//
// ─── GOAL PACE ─────────────────────────────────────────────────────────────────
//

/// `round(target_pages / days)`, or zero when either side is not positive.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn pages_per_day(target_pages: i64, days: i64) -> u64 {
    if target_pages <= 0 || days <= 0 {
        return 0;
    }
    (target_pages as f64 / days as f64).round() as u64
}

/// A goal translated into a daily reading pace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalPace {
    pub target_pages: u32,
    pub period: GoalPeriod,
    pub pages_per_day: u64,
}

impl GoalPace {
    #[must_use]
    pub fn new(target_pages: u32, period: GoalPeriod) -> Self {
        Self {
            target_pages,
            period,
            pages_per_day: pages_per_day(i64::from(target_pages), i64::from(period.days())),
        }
    }

    #[must_use]
    pub fn from_goal(goal: &ReadingGoal) -> Self {
        Self::new(goal.target_pages(), goal.period())
    }

    #[must_use]
    pub fn days(&self) -> u32 {
        self.period.days()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
