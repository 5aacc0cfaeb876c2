//! People repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::escape_like;
use crate::{
    error::{AppError, AppResult},
    models::person::{Person, PersonForm},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PeopleRepository: Send + Sync {
    async fn find_all(&self) -> AppResult<Vec<Person>>;
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Person>>;
    async fn find_by_full_name(&self, full_name: &str) -> AppResult<Option<Person>>;
    /// Case-insensitive substring match on the full name
    async fn search_by_name(&self, query: &str) -> AppResult<Vec<Person>>;
    async fn create(&self, data: &PersonForm) -> AppResult<Person>;
    async fn update(&self, id: i32, data: &PersonForm) -> AppResult<Option<Person>>;
    /// Deletes a person, releasing every book they hold
    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// Turns a `person_full_name_key` violation into a 409
fn duplicate_name(err: sqlx::Error, full_name: &str) -> AppError {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(format!("A person named \"{}\" already exists", full_name))
        }
        other => AppError::Database(other),
    }
}

#[derive(Clone)]
pub struct PgPeopleRepository {
    pool: Pool<Postgres>,
}

impl PgPeopleRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PeopleRepository for PgPeopleRepository {
    async fn find_all(&self) -> AppResult<Vec<Person>> {
        let people = sqlx::query_as::<_, Person>(
            "SELECT id, full_name, year_of_birth FROM person ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(people)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Person>> {
        let person = sqlx::query_as::<_, Person>(
            "SELECT id, full_name, year_of_birth FROM person WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(person)
    }

    async fn find_by_full_name(&self, full_name: &str) -> AppResult<Option<Person>> {
        let person = sqlx::query_as::<_, Person>(
            "SELECT id, full_name, year_of_birth FROM person WHERE full_name = $1 LIMIT 1",
        )
        .bind(full_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(person)
    }

    async fn search_by_name(&self, query: &str) -> AppResult<Vec<Person>> {
        let people = sqlx::query_as::<_, Person>(
            "SELECT id, full_name, year_of_birth FROM person WHERE full_name ILIKE $1 ORDER BY id",
        )
        .bind(format!("%{}%", escape_like(query)))
        .fetch_all(&self.pool)
        .await?;
        Ok(people)
    }

    async fn create(&self, data: &PersonForm) -> AppResult<Person> {
        let person = sqlx::query_as::<_, Person>(
            r#"
            INSERT INTO person (full_name, year_of_birth)
            VALUES ($1, $2)
            RETURNING id, full_name, year_of_birth
            "#,
        )
        .bind(&data.full_name)
        .bind(data.year_of_birth)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_name(e, &data.full_name))?;
        Ok(person)
    }

    async fn update(&self, id: i32, data: &PersonForm) -> AppResult<Option<Person>> {
        let person = sqlx::query_as::<_, Person>(
            r#"
            UPDATE person SET full_name = $2, year_of_birth = $3
            WHERE id = $1
            RETURNING id, full_name, year_of_birth
            "#,
        )
        .bind(id)
        .bind(&data.full_name)
        .bind(data.year_of_birth)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| duplicate_name(e, &data.full_name))?;
        Ok(person)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        // owner_id has no cascade, and the CHECK pairs it with taken_at
        let released = sqlx::query("UPDATE book SET owner_id = NULL, taken_at = NULL WHERE owner_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM person WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        if released > 0 {
            tracing::info!("Released {} book(s) held by deleted person {}", released, id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{borrow::Cow, error::Error as StdError, fmt};

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    #[derive(Debug)]
    struct PgError {
        unique: bool,
    }

    impl fmt::Display for PgError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("constraint violated")
        }
    }

    impl StdError for PgError {}

    impl DatabaseError for PgError {
        fn message(&self) -> &str {
            "constraint violated"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(if self.unique { "23505" } else { "23514" }))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            if self.unique {
                ErrorKind::UniqueViolation
            } else {
                ErrorKind::CheckViolation
            }
        }
    }

    #[test]
    fn test_unique_violation_is_conflict() {
        let err = sqlx::Error::Database(Box::new(PgError { unique: true }));
        match duplicate_name(err, "Ivan Petrov") {
            AppError::Conflict(msg) => assert!(msg.contains("Ivan Petrov")),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_other_database_errors_pass_through() {
        let err = sqlx::Error::Database(Box::new(PgError { unique: false }));
        assert!(matches!(duplicate_name(err, "Anna"), AppError::Database(_)));

        let err = sqlx::Error::RowNotFound;
        assert!(matches!(duplicate_name(err, "Anna"), AppError::Database(_)));
    }
}
