//! Landing page search

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{book::Book, person::Person};

/// Free-text search over either books (title prefix) or people (name).
/// When both are sent, the book query is used.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SearchRequest {
    #[serde(rename = "bookQuery")]
    pub book_query: Option<String>,
    #[serde(rename = "personQuery")]
    pub person_query: Option<String>,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct SearchResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books: Option<Vec<Book>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub people: Option<Vec<Person>>,
}
