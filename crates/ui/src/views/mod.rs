mod book_card;
mod goal_card;
mod library;
mod notice;
mod profile_stats;

#[cfg(test)]
mod view_smoke;

pub use book_card::BookCard;
pub use goal_card::GoalCard;
pub use library::{LibraryDocument, LibraryPage, render_library_page};
pub use notice::NoticeBanner;
pub use profile_stats::ProfileStats;
