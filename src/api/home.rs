//! Landing page and search

use axum::{extract::State, Json};

use super::JsonBody;
use crate::{
    error::AppResult,
    models::search::{SearchRequest, SearchResults},
    AppState,
};

/// Landing page, no results yet
#[utoipa::path(
    get,
    path = "/",
    tag = "search",
    responses((status = 200, description = "Empty search results", body = SearchResults))
)]
pub async fn index() -> Json<SearchResults> {
    Json(SearchResults::default())
}

/// Search books by title prefix or people by name
#[utoipa::path(
    post,
    path = "/",
    tag = "search",
    request_body = SearchRequest,
    responses((status = 200, description = "Matching books or people", body = SearchResults))
)]
pub async fn search(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SearchRequest>,
) -> AppResult<Json<SearchResults>> {
    let mut results = SearchResults::default();

    if let Some(query) = request.book_query {
        results.books = Some(state.services.books.search_by_title(&query).await?);
    } else if let Some(query) = request.person_query {
        results.people = Some(state.services.people.search_by_name(&query).await?);
    }

    Ok(Json(results))
}
