//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, home, people};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Server API",
        version = "0.1.0",
        description = "Books, borrowers and who holds what",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Search
        home::index,
        home::search,
        // Books
        books::list_books,
        books::new_book,
        books::create_book,
        books::show_book,
        books::edit_book,
        books::update_book,
        books::delete_book,
        books::assign_book,
        books::release_book,
        // People
        people::list_people,
        people::new_person,
        people::create_person,
        people::show_person,
        people::edit_person,
        people::update_person,
        people::delete_person,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::BookForm,
            crate::models::book::BookDetails,
            crate::models::book::BorrowedBook,
            crate::models::book::AssignBook,
            // People
            crate::models::person::Person,
            crate::models::person::PersonForm,
            crate::models::person::PersonDetails,
            // Search
            crate::models::search::SearchRequest,
            crate::models::search::SearchResults,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "search", description = "Landing page search"),
        (name = "books", description = "Book catalog and lending"),
        (name = "people", description = "Borrower management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_lending_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/books/{id}/assign"));
        assert!(doc.paths.paths.contains_key("/books/{id}/release"));
        assert!(doc.paths.paths.contains_key("/people/{id}"));
    }
}
