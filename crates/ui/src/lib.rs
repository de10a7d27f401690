pub mod views;
pub mod vm;

pub use views::{LibraryDocument, render_library_page};
