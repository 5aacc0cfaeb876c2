//! Person (borrower) model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::book::BorrowedBook;

/// Person record as stored in the `person` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Person {
    pub id: i32,
    pub full_name: String,
    pub year_of_birth: i32,
}

/// Editable person fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct PersonForm {
    #[validate(length(min = 2, max = 100, message = "Full name must be between 2 and 100 characters"))]
    pub full_name: String,
    #[validate(range(min = 1900, max = 9999, message = "Year of birth must be 1900 or later"))]
    pub year_of_birth: i32,
}

impl From<&Person> for PersonForm {
    fn from(person: &Person) -> Self {
        Self {
            full_name: person.full_name.clone(),
            year_of_birth: person.year_of_birth,
        }
    }
}

/// Person page: the person and every book they currently hold
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PersonDetails {
    pub person: Person,
    pub books: Vec<BorrowedBook>,
}
