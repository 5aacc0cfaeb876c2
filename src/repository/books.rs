//! Books repository for database operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use super::escape_like;
use crate::{
    error::AppResult,
    models::{
        book::{Book, BookForm},
        person::Person,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BooksRepository: Send + Sync {
    /// Every book, by year when `sort_by_year`, otherwise by id
    async fn find_all(&self, sort_by_year: bool) -> AppResult<Vec<Book>>;
    /// One 0-based page of books, same ordering as `find_all`
    async fn find_page(&self, page: i64, per_page: i64, sort_by_year: bool) -> AppResult<Vec<Book>>;
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>>;
    async fn find_by_title_prefix(&self, prefix: &str) -> AppResult<Vec<Book>>;
    /// Books currently held by a person
    async fn find_by_owner(&self, person_id: i32) -> AppResult<Vec<Book>>;
    /// Holder of a book; `None` when the book is free or missing
    async fn find_owner(&self, book_id: i32) -> AppResult<Option<Person>>;
    async fn create(&self, data: &BookForm) -> AppResult<Book>;
    /// Replaces the editable fields, leaving `owner_id` and `taken_at` untouched
    async fn update(&self, id: i32, data: &BookForm) -> AppResult<Option<Book>>;
    async fn delete(&self, id: i32) -> AppResult<()>;
    async fn assign(&self, id: i32, person_id: i32, taken_at: DateTime<Utc>) -> AppResult<Option<Book>>;
    async fn release(&self, id: i32) -> AppResult<Option<Book>>;
}

const BOOK_COLUMNS: &str = "id, title, author, year, owner_id, taken_at";

fn order_by(sort_by_year: bool) -> &'static str {
    if sort_by_year {
        "ORDER BY year, id"
    } else {
        "ORDER BY id"
    }
}

#[derive(Clone)]
pub struct PgBooksRepository {
    pool: Pool<Postgres>,
}

impl PgBooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BooksRepository for PgBooksRepository {
    async fn find_all(&self, sort_by_year: bool) -> AppResult<Vec<Book>> {
        let query = format!("SELECT {} FROM book {}", BOOK_COLUMNS, order_by(sort_by_year));
        let books = sqlx::query_as::<_, Book>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    async fn find_page(&self, page: i64, per_page: i64, sort_by_year: bool) -> AppResult<Vec<Book>> {
        let query = format!(
            "SELECT {} FROM book {} LIMIT $1 OFFSET $2",
            BOOK_COLUMNS,
            order_by(sort_by_year)
        );
        let books = sqlx::query_as::<_, Book>(&query)
            .bind(per_page)
            .bind(page.saturating_mul(per_page))
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        let query = format!("SELECT {} FROM book WHERE id = $1", BOOK_COLUMNS);
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn find_by_title_prefix(&self, prefix: &str) -> AppResult<Vec<Book>> {
        let query = format!("SELECT {} FROM book WHERE title LIKE $1 ORDER BY id", BOOK_COLUMNS);
        let books = sqlx::query_as::<_, Book>(&query)
            .bind(format!("{}%", escape_like(prefix)))
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    async fn find_by_owner(&self, person_id: i32) -> AppResult<Vec<Book>> {
        let query = format!(
            "SELECT {} FROM book WHERE owner_id = $1 ORDER BY taken_at, id",
            BOOK_COLUMNS
        );
        let books = sqlx::query_as::<_, Book>(&query)
            .bind(person_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    async fn find_owner(&self, book_id: i32) -> AppResult<Option<Person>> {
        let owner = sqlx::query_as::<_, Person>(
            r#"
            SELECT p.id, p.full_name, p.year_of_birth
            FROM book b
            JOIN person p ON p.id = b.owner_id
            WHERE b.id = $1
            "#,
        )
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(owner)
    }

    async fn create(&self, data: &BookForm) -> AppResult<Book> {
        let query = format!(
            "INSERT INTO book (title, author, year) VALUES ($1, $2, $3) RETURNING {}",
            BOOK_COLUMNS
        );
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(&data.title)
            .bind(&data.author)
            .bind(data.year)
            .fetch_one(&self.pool)
            .await?;
        Ok(book)
    }

    async fn update(&self, id: i32, data: &BookForm) -> AppResult<Option<Book>> {
        let query = format!(
            "UPDATE book SET title = $2, author = $3, year = $4 WHERE id = $1 RETURNING {}",
            BOOK_COLUMNS
        );
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(&data.title)
            .bind(&data.author)
            .bind(data.year)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM book WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn assign(&self, id: i32, person_id: i32, taken_at: DateTime<Utc>) -> AppResult<Option<Book>> {
        let query = format!(
            "UPDATE book SET owner_id = $2, taken_at = $3 WHERE id = $1 RETURNING {}",
            BOOK_COLUMNS
        );
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(person_id)
            .bind(taken_at)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn release(&self, id: i32) -> AppResult<Option<Book>> {
        let query = format!(
            "UPDATE book SET owner_id = NULL, taken_at = NULL WHERE id = $1 RETURNING {}",
            BOOK_COLUMNS
        );
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }
}
