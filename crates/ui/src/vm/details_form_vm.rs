use shelf_core::model::{Book, BookDetailsDraft, BookStatus};

/// Field visibility of the book details form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookDetailsFormVm {
    pub draft: BookDetailsDraft,
    pub show_start_date: bool,
    pub show_end_date: bool,
    pub show_log_form: bool,
}

impl BookDetailsFormVm {
    #[must_use]
    pub fn from_book(book: &Book) -> Self {
        Self::from_draft(BookDetailsDraft::from_book(book))
    }

    #[must_use]
    pub fn from_draft(draft: BookDetailsDraft) -> Self {
        let status = BookStatus::parse(draft.status.trim());
        Self {
            show_start_date: status.is_some_and(BookStatus::keeps_start_date),
            show_end_date: status.is_some_and(BookStatus::keeps_end_date),
            show_log_form: status == Some(BookStatus::Reading),
            draft,
        }
    }

    /// Status picked in the form; hidden dates are dropped.
    #[must_use]
    pub fn with_status(mut self, status: BookStatus) -> Self {
        self.draft.set_status(status);
        Self::from_draft(self.draft)
    }

    #[must_use]
    pub fn into_draft(self) -> BookDetailsDraft {
        self.draft
    }
}
