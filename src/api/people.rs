//! People endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::JsonBody;
use crate::{
    error::{AppError, AppResult},
    models::person::{Person, PersonDetails, PersonForm},
    AppState,
};

fn person_not_found(id: i32) -> AppError {
    AppError::PersonNotFound(format!("Person {} not found", id))
}

/// List all people
#[utoipa::path(
    get,
    path = "/people",
    tag = "people",
    responses((status = 200, description = "People", body = Vec<Person>))
)]
pub async fn list_people(State(state): State<AppState>) -> AppResult<Json<Vec<Person>>> {
    let people = state.services.people.find_all().await?;
    Ok(Json(people))
}

/// Blank creation form
#[utoipa::path(
    get,
    path = "/people/new",
    tag = "people",
    responses((status = 200, description = "Empty person form", body = PersonForm))
)]
pub async fn new_person() -> Json<PersonForm> {
    Json(PersonForm::default())
}

/// Register a person
#[utoipa::path(
    post,
    path = "/people",
    tag = "people",
    request_body = PersonForm,
    responses(
        (status = 201, description = "Person created", body = Person),
        (status = 400, description = "Invalid form"),
        (status = 409, description = "Full name already taken")
    )
)]
pub async fn create_person(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<PersonForm>,
) -> AppResult<(StatusCode, Json<Person>)> {
    let person = state.services.people.create(&form).await?;
    Ok((StatusCode::CREATED, Json(person)))
}

/// Person page with their books and overdue flags
#[utoipa::path(
    get,
    path = "/people/{id}",
    tag = "people",
    params(("id" = i32, Path, description = "Person ID")),
    responses(
        (status = 200, description = "Person details", body = PersonDetails),
        (status = 404, description = "Person not found")
    )
)]
pub async fn show_person(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<PersonDetails>> {
    let details = state
        .services
        .people
        .get_details(id)
        .await?
        .ok_or_else(|| person_not_found(id))?;
    Ok(Json(details))
}

#[utoipa::path(
    get,
    path = "/people/{id}/edit",
    tag = "people",
    params(("id" = i32, Path, description = "Person ID")),
    responses(
        (status = 200, description = "Person form", body = PersonForm),
        (status = 404, description = "Person not found")
    )
)]
pub async fn edit_person(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<PersonForm>> {
    let person = state
        .services
        .people
        .find_by_id(id)
        .await?
        .ok_or_else(|| person_not_found(id))?;
    Ok(Json(PersonForm::from(&person)))
}

#[utoipa::path(
    patch,
    path = "/people/{id}",
    tag = "people",
    params(("id" = i32, Path, description = "Person ID")),
    request_body = PersonForm,
    responses(
        (status = 200, description = "Person updated", body = Person),
        (status = 400, description = "Invalid form"),
        (status = 404, description = "Person not found"),
        (status = 409, description = "Full name already taken")
    )
)]
pub async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(form): JsonBody<PersonForm>,
) -> AppResult<Json<Person>> {
    let person = state
        .services
        .people
        .update(id, &form)
        .await?
        .ok_or_else(|| person_not_found(id))?;
    Ok(Json(person))
}

/// Delete a person; books they held become free
#[utoipa::path(
    delete,
    path = "/people/{id}",
    tag = "people",
    params(("id" = i32, Path, description = "Person ID")),
    responses((status = 204, description = "Person deleted"))
)]
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.people.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
