//! Book endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use validator::Validate;

use super::{JsonBody, QueryParams};
use crate::{
    error::{AppError, AppResult},
    models::book::{AssignBook, Book, BookDetails, BookForm, BookListQuery},
    AppState,
};

fn book_not_found(id: i32) -> AppError {
    AppError::BookNotFound(format!("Book {} not found", id))
}

/// List books, optionally paginated and sorted by year
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookListQuery),
    responses(
        (status = 200, description = "Books", body = Vec<Book>),
        (status = 400, description = "Invalid pagination parameters")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<BookListQuery>,
) -> AppResult<Json<Vec<Book>>> {
    query.validate()?;

    let books = match (query.page, query.books_per_page) {
        (Some(page), Some(per_page)) => {
            state
                .services
                .books
                .find_page(page, per_page, query.sort_by_year)
                .await?
        }
        _ => state.services.books.find_all(query.sort_by_year).await?,
    };

    Ok(Json(books))
}

/// Blank creation form
#[utoipa::path(
    get,
    path = "/books/new",
    tag = "books",
    responses((status = 200, description = "Empty book form", body = BookForm))
)]
pub async fn new_book() -> Json<BookForm> {
    Json(BookForm::default())
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookForm,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid form")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<BookForm>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = state.services.books.create(&form).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Book page: the holder, or the people it can be assigned to
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found")
    )
)]
pub async fn show_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetails>> {
    let details = state
        .services
        .books
        .get_details(id)
        .await?
        .ok_or_else(|| book_not_found(id))?;
    Ok(Json(details))
}

/// Edit form pre-filled with the current values
#[utoipa::path(
    get,
    path = "/books/{id}/edit",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book form", body = BookForm),
        (status = 404, description = "Book not found")
    )
)]
pub async fn edit_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookForm>> {
    let book = state
        .services
        .books
        .find_by_id(id)
        .await?
        .ok_or_else(|| book_not_found(id))?;
    Ok(Json(BookForm::from(&book)))
}

/// Update a book; its holder is kept
#[utoipa::path(
    patch,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookForm,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid form"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(form): JsonBody<BookForm>,
) -> AppResult<Json<Book>> {
    let book = state
        .services
        .books
        .update(id, &form)
        .await?
        .ok_or_else(|| book_not_found(id))?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses((status = 204, description = "Book deleted"))
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Hand the book to a person
#[utoipa::path(
    patch,
    path = "/books/{id}/assign",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = AssignBook,
    responses(
        (status = 200, description = "Book assigned", body = BookDetails),
        (status = 204, description = "No such book, nothing changed"),
        (status = 404, description = "Person not found")
    )
)]
pub async fn assign_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(request): JsonBody<AssignBook>,
) -> AppResult<Response> {
    if state.services.books.assign(id, request.person_id).await?.is_none() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    refreshed_details(&state, id).await
}

/// Take the book back from its holder
#[utoipa::path(
    patch,
    path = "/books/{id}/release",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book released", body = BookDetails),
        (status = 204, description = "No such book, nothing changed")
    )
)]
pub async fn release_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    if state.services.books.release(id).await?.is_none() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    refreshed_details(&state, id).await
}

async fn refreshed_details(state: &AppState, id: i32) -> AppResult<Response> {
    match state.services.books.get_details(id).await? {
        Some(details) => Ok(Json(details).into_response()),
        // deleted concurrently
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
