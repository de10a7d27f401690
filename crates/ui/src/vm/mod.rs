mod book_vm;
mod details_form_vm;
mod goal_vm;
mod markdown_vm;
mod notice_vm;
mod profile_vm;
mod time_fmt;

pub use book_vm::{
    BookCardBody, BookCardVm, BookDetailVm, LogEntryVm, map_book_cards, status_badge,
    status_label,
};
pub use details_form_vm::BookDetailsFormVm;
pub use goal_vm::GoalCardVm;
pub use markdown_vm::{markdown_to_html, normalize_notes, sanitize_html};
pub use notice_vm::{Notice, NoticeKind};
pub use profile_vm::{ProfileStatsVm, initials};
pub use time_fmt::{format_date, format_datetime};
