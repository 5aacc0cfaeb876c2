//! Repository layer for database operations

pub mod books;
pub mod people;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

use crate::error::AppResult;

pub use books::{BooksRepository, PgBooksRepository};
pub use people::{PeopleRepository, PgPeopleRepository};

/// Main repository struct holding the per-table repositories
#[derive(Clone)]
pub struct Repository {
    pool: Option<Pool<Postgres>>,
    pub books: Arc<dyn BooksRepository>,
    pub people: Arc<dyn PeopleRepository>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(PgBooksRepository::new(pool.clone())),
            people: Arc::new(PgPeopleRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Build a repository from arbitrary implementations (no database behind it)
    pub fn from_parts(books: Arc<dyn BooksRepository>, people: Arc<dyn PeopleRepository>) -> Self {
        Self {
            pool: None,
            books,
            people,
        }
    }

    /// Round-trip to the database, if there is one
    pub async fn ping(&self) -> AppResult<()> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}

/// Escapes `LIKE` wildcards so user input only ever matches literally.
pub(crate) fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_plain() {
        assert_eq!(escape_like("Harry"), "Harry");
        assert_eq!(escape_like(""), "");
    }

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\dir"), "c:\\\\dir");
    }
}
