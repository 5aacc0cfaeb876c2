//! Book model, lending state and overdue computation

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::person::Person;

/// A book is overdue once it has been held for longer than this (10 days).
pub const OVERDUE_AFTER_MILLIS: i64 = 864_000_000;

/// Returns true when a book taken at `taken_at` is overdue at `now`.
///
/// The comparison is strict: a book held for exactly ten days is still on time.
pub fn is_overdue(taken_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - taken_at > Duration::milliseconds(OVERDUE_AFTER_MILLIS)
}

/// Book record as stored in the `book` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    /// Publication year
    pub year: i32,
    /// Person currently holding the book
    pub owner_id: Option<i32>,
    /// When the current holder took the book; set iff `owner_id` is set
    pub taken_at: Option<DateTime<Utc>>,
}

impl Book {
    pub fn is_taken(&self) -> bool {
        self.owner_id.is_some()
    }
}

/// A held book annotated with its overdue flag, computed at read time
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BorrowedBook {
    #[serde(flatten)]
    pub book: Book,
    pub expired: bool,
}

impl BorrowedBook {
    pub fn at(book: Book, now: DateTime<Utc>) -> Self {
        let expired = book.taken_at.is_some_and(|taken_at| is_overdue(taken_at, now));
        Self { book, expired }
    }
}

/// Editable book fields, used for creation and edits.
///
/// Carries no owner: `owner_id` and `taken_at` only change through assign/release.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookForm {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: String,
    #[validate(length(min = 2, max = 100, message = "Author must be between 2 and 100 characters"))]
    pub author: String,
    #[validate(range(min = 0, max = 9999, message = "Year must be between 0 and 9999"))]
    pub year: i32,
}

impl From<&Book> for BookForm {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year,
        }
    }
}

/// Book listing parameters. Pagination applies only when both `page` and
/// `books_per_page` are present.
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookListQuery {
    /// 0-based page index
    #[validate(range(min = 0, message = "page must not be negative"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, message = "books_per_page must be at least 1"))]
    pub books_per_page: Option<i64>,
    #[serde(default)]
    pub sort_by_year: bool,
}

/// Assignment request: only the person identifier is carried
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignBook {
    pub person_id: i32,
}

/// Single book view: the holder when taken, otherwise everyone it could be
/// assigned to
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    pub book: Book,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Person>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub people: Option<Vec<Person>>,
}
