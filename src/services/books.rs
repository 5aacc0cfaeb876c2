//! Book catalog and lending service

use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookDetails, BookForm},
        person::Person,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All books, optionally ordered by publication year
    pub async fn find_all(&self, sort_by_year: bool) -> AppResult<Vec<Book>> {
        self.repository.books.find_all(sort_by_year).await
    }

    /// One 0-based page of books. Bounds are the caller's responsibility.
    pub async fn find_page(&self, page: i64, per_page: i64, sort_by_year: bool) -> AppResult<Vec<Book>> {
        self.repository.books.find_page(page, per_page, sort_by_year).await
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        self.repository.books.find_by_id(id).await
    }

    /// Books whose title starts with `query`
    pub async fn search_by_title(&self, query: &str) -> AppResult<Vec<Book>> {
        self.repository.books.find_by_title_prefix(query).await
    }

    pub async fn create(&self, data: &BookForm) -> AppResult<Book> {
        data.validate()?;
        let book = self.repository.books.create(data).await?;
        tracing::info!("Created book {} \"{}\"", book.id, book.title);
        Ok(book)
    }

    /// Replace the editable fields of a book, keeping its current holder
    pub async fn update(&self, id: i32, data: &BookForm) -> AppResult<Option<Book>> {
        data.validate()?;
        let book = self.repository.books.update(id, data).await?;
        if book.is_some() {
            tracing::info!("Updated book {}", id);
        }
        Ok(book)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!("Deleted book {}", id);
        Ok(())
    }

    /// Person currently holding the book
    pub async fn get_owner(&self, id: i32) -> AppResult<Option<Person>> {
        self.repository.books.find_owner(id).await
    }

    /// Hand a book to a person, stamping the checkout time.
    ///
    /// A book already held by someone else is silently reassigned. Returns
    /// `None` without writing when the book does not exist.
    pub async fn assign(&self, id: i32, person_id: i32) -> AppResult<Option<Book>> {
        if self.repository.people.find_by_id(person_id).await?.is_none() {
            return Err(AppError::PersonNotFound(format!("Person {} not found", person_id)));
        }

        let book = self.repository.books.assign(id, person_id, Utc::now()).await?;
        match &book {
            Some(_) => tracing::info!("Book {} assigned to person {}", id, person_id),
            None => tracing::debug!("Assign ignored: book {} does not exist", id),
        }
        Ok(book)
    }

    /// Return a book to the library
    pub async fn release(&self, id: i32) -> AppResult<Option<Book>> {
        let book = self.repository.books.release(id).await?;
        match &book {
            Some(_) => tracing::info!("Book {} released", id),
            None => tracing::debug!("Release ignored: book {} does not exist", id),
        }
        Ok(book)
    }

    /// Book page: the holder if taken, otherwise every person it can go to
    pub async fn get_details(&self, id: i32) -> AppResult<Option<BookDetails>> {
        let Some(book) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let owner = if book.is_taken() {
            self.get_owner(id).await?
        } else {
            None
        };

        let people = match owner {
            Some(_) => None,
            None => Some(self.repository.people.find_all().await?),
        };

        Ok(Some(BookDetails { book, owner, people }))
    }
}
