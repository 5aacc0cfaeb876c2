//! Data models for the library server

pub mod book;
pub mod person;
pub mod search;

// Re-export commonly used types
pub use book::{Book, BookDetails, BookForm, BorrowedBook};
pub use person::{Person, PersonDetails, PersonForm};
pub use search::{SearchRequest, SearchResults};
