//! Borrower management service

use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::BorrowedBook,
        person::{Person, PersonDetails, PersonForm},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct PeopleService {
    repository: Repository,
}

impl PeopleService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn find_all(&self) -> AppResult<Vec<Person>> {
        self.repository.people.find_all().await
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Person>> {
        self.repository.people.find_by_id(id).await
    }

    pub async fn find_by_full_name(&self, full_name: &str) -> AppResult<Option<Person>> {
        self.repository.people.find_by_full_name(full_name).await
    }

    /// People whose name contains `query`, ignoring case
    pub async fn search_by_name(&self, query: &str) -> AppResult<Vec<Person>> {
        self.repository.people.search_by_name(query).await
    }

    pub async fn create(&self, data: &PersonForm) -> AppResult<Person> {
        data.validate()?;
        self.ensure_name_available(&data.full_name, None).await?;

        let person = self.repository.people.create(data).await?;
        tracing::info!("Created person {} \"{}\"", person.id, person.full_name);
        Ok(person)
    }

    pub async fn update(&self, id: i32, data: &PersonForm) -> AppResult<Option<Person>> {
        data.validate()?;
        if self.find_by_id(id).await?.is_none() {
            return Ok(None);
        }
        self.ensure_name_available(&data.full_name, Some(id)).await?;

        let person = self.repository.people.update(id, data).await?;
        if person.is_some() {
            tracing::info!("Updated person {}", id);
        }
        Ok(person)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.people.delete(id).await?;
        tracing::info!("Deleted person {}", id);
        Ok(())
    }

    /// Books held by a person, flagged overdue as of now.
    /// An unknown person simply holds nothing.
    pub async fn get_books_with_overdue_status(&self, person_id: i32) -> AppResult<Vec<BorrowedBook>> {
        if self.find_by_id(person_id).await?.is_none() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let books = self.repository.books.find_by_owner(person_id).await?;
        Ok(books.into_iter().map(|book| BorrowedBook::at(book, now)).collect())
    }

    /// Person page: the person and their books with overdue flags
    pub async fn get_details(&self, id: i32) -> AppResult<Option<PersonDetails>> {
        let Some(person) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let books = self.get_books_with_overdue_status(id).await?;
        Ok(Some(PersonDetails { person, books }))
    }

    async fn ensure_name_available(&self, full_name: &str, current_id: Option<i32>) -> AppResult<()> {
        match self.find_by_full_name(full_name).await? {
            Some(existing) if Some(existing.id) != current_id => Err(AppError::Conflict(format!(
                "A person named \"{}\" already exists (id={})",
                full_name, existing.id
            ))),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Duration};
    use mockall::predicate::eq;

    use super::*;
    use crate::{
        models::book::Book,
        repository::{books::MockBooksRepository, people::MockPeopleRepository},
    };

    fn person(id: i32, full_name: &str) -> Person {
        Person {
            id,
            full_name: full_name.to_string(),
            year_of_birth: 1985,
        }
    }

    fn held_book(id: i32, owner_id: i32, taken_at: DateTime<Utc>) -> Book {
        Book {
            id,
            title: format!("Book {}", id),
            author: "Anonymous".to_string(),
            year: 2001,
            owner_id: Some(owner_id),
            taken_at: Some(taken_at),
        }
    }

    fn service(books: MockBooksRepository, people: MockPeopleRepository) -> PeopleService {
        PeopleService::new(Repository::from_parts(Arc::new(books), Arc::new(people)))
    }

    #[tokio::test]
    async fn test_books_are_flagged_overdue_after_ten_days() {
        let mut books = MockBooksRepository::new();
        let mut people = MockPeopleRepository::new();

        people
            .expect_find_by_id()
            .with(eq(3))
            .returning(|id| Ok(Some(person(id, "Anna"))));
        books.expect_find_by_owner().with(eq(3)).returning(|owner| {
            let now = Utc::now();
            Ok(vec![
                held_book(1, owner, now - Duration::days(2)),
                held_book(2, owner, now - Duration::days(15)),
                held_book(3, owner, now - Duration::days(9)),
            ])
        });

        let books = service(books, people)
            .get_books_with_overdue_status(3)
            .await
            .unwrap();

        let flags: Vec<(i32, bool)> = books.iter().map(|b| (b.book.id, b.expired)).collect();
        assert_eq!(flags, vec![(1, false), (2, true), (3, false)]);
    }

    #[tokio::test]
    async fn test_unknown_person_holds_nothing() {
        let mut books = MockBooksRepository::new();
        let mut people = MockPeopleRepository::new();

        people.expect_find_by_id().returning(|_| Ok(None));
        books.expect_find_by_owner().never();

        let books = service(books, people)
            .get_books_with_overdue_status(77)
            .await
            .unwrap();
        assert!(books.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name() {
        let mut people = MockPeopleRepository::new();
        people
            .expect_find_by_full_name()
            .withf(|name| name == "Ivan Petrov")
            .returning(|name| Ok(Some(person(4, name))));
        people.expect_create().never();

        let form = PersonForm {
            full_name: "Ivan Petrov".to_string(),
            year_of_birth: 1970,
        };
        let result = service(MockBooksRepository::new(), people).create(&form).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_may_keep_own_name() {
        let mut people = MockPeopleRepository::new();
        people
            .expect_find_by_id()
            .with(eq(4))
            .returning(|id| Ok(Some(person(id, "Ivan Petrov"))));
        people
            .expect_find_by_full_name()
            .returning(|name| Ok(Some(person(4, name))));
        people
            .expect_update()
            .withf(|id, form| *id == 4 && form.year_of_birth == 1971)
            .returning(|id, form| {
                Ok(Some(Person {
                    id,
                    full_name: form.full_name.clone(),
                    year_of_birth: form.year_of_birth,
                }))
            });

        let form = PersonForm {
            full_name: "Ivan Petrov".to_string(),
            year_of_birth: 1971,
        };
        let updated = service(MockBooksRepository::new(), people)
            .update(4, &form)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, 4);
        assert_eq!(updated.year_of_birth, 1971);
    }

    #[tokio::test]
    async fn test_create_validates_before_lookup() {
        let mut people = MockPeopleRepository::new();
        people.expect_find_by_full_name().never();
        people.expect_create().never();

        let form = PersonForm {
            full_name: String::new(),
            year_of_birth: 1990,
        };
        let result = service(MockBooksRepository::new(), people).create(&form).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_search_by_name_passes_query() {
        let mut people = MockPeopleRepository::new();
        people
            .expect_search_by_name()
            .withf(|query| query == "an")
            .returning(|_| Ok(vec![person(1, "Ivan"), person(2, "Anna")]));

        let found = service(MockBooksRepository::new(), people)
            .search_by_name("an")
            .await
            .unwrap();
        let names: Vec<&str> = found.iter().map(|p| p.full_name.as_str()).collect();
        assert_eq!(names, vec!["Ivan", "Anna"]);
    }

    #[tokio::test]
    async fn test_details_include_flagged_books() {
        let mut books = MockBooksRepository::new();
        let mut people = MockPeopleRepository::new();

        people.expect_find_by_id().returning(|id| Ok(Some(person(id, "Bob"))));
        books
            .expect_find_by_owner()
            .returning(|owner| Ok(vec![held_book(9, owner, Utc::now() - Duration::days(30))]));

        let details = service(books, people).get_details(2).await.unwrap().unwrap();
        assert_eq!(details.person.full_name, "Bob");
        assert_eq!(details.books.len(), 1);
        assert!(details.books[0].expired);
    }

    #[tokio::test]
    async fn test_update_missing_person_ignores_taken_name() {
        let mut people = MockPeopleRepository::new();
        people.expect_find_by_id().with(eq(40)).returning(|_| Ok(None));
        people.expect_find_by_full_name().never();
        people.expect_update().never();

        let form = PersonForm {
            full_name: "Ivan Petrov".to_string(),
            year_of_birth: 1970,
        };
        let result = service(MockBooksRepository::new(), people).update(40, &form).await;
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn test_details_of_missing_person() {
        let mut books = MockBooksRepository::new();
        let mut people = MockPeopleRepository::new();

        people.expect_find_by_id().returning(|_| Ok(None));
        books.expect_find_by_owner().never();

        let details = service(books, people).get_details(5).await.unwrap();
        assert!(details.is_none());
    }

    #[tokio::test]
    async fn test_details_books_match_overdue_listing() {
        let taken_at = Utc::now() - Duration::days(11);
        let mut books = MockBooksRepository::new();
        let mut people = MockPeopleRepository::new();

        people.expect_find_by_id().returning(|id| Ok(Some(person(id, "Anna"))));
        books
            .expect_find_by_owner()
            .with(eq(6))
            .returning(move |owner| {
                Ok(vec![held_book(1, owner, taken_at), held_book(2, owner, Utc::now())])
            });

        let service = service(books, people);
        let listing = service.get_books_with_overdue_status(6).await.unwrap();
        let details = service.get_details(6).await.unwrap().unwrap();

        let flags = |books: &[BorrowedBook]| {
            books.iter().map(|b| (b.book.id, b.expired)).collect::<Vec<_>>()
        };
        assert_eq!(flags(&details.books), flags(&listing));
        assert_eq!(flags(&details.books), vec![(1, true), (2, false)]);
    }
}
