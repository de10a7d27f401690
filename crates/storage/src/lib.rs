#![forbid(unsafe_code)]

pub mod repository;
pub mod rest;
pub mod sqlite;

pub use repository::{
    BookRepository, InMemoryRepository, NewsletterRepository, ProfileRepository,
    ReadingGoalRepository, ReadingLogRepository, Storage, StorageError,
};
pub use rest::{AccessTokenSource, Anonymous, RestConfig, RestRepository};
