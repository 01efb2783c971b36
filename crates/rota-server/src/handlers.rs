//! REST handlers. Thin adapters: every route delegates to one engine
//! operation and maps the outcome; no domain rules live here.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use rota_core::{TaskId, UserId};
use rota_store::seed::seed_demo_data;
use serde_json::json;

use crate::dto::{CreateTaskRequest, CreateUserRequest, TaskResponse, UserResponse};
use crate::error::ApiError;
use crate::server::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let (users, tasks) = state.engine.counts();
    Json(json!({ "status": "healthy", "users": users, "tasks": tasks }))
}

pub async fn list_users(State(state): State<AppState>) -> Json<Vec<UserResponse>> {
    Json(state.engine.list_users().into_iter().map(Into::into).collect())
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let overview = state.engine.get_user(&UserId::from_raw(id))?;
    Ok(Json(overview.into()))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response: UserResponse = state.engine.register_user(&request.name)?.into();
    let location = format!("/api/users/{}", response.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(response),
    ))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.engine.remove_user(&UserId::from_raw(id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_tasks(State(state): State<AppState>) -> Json<Vec<TaskResponse>> {
    Json(state.engine.list_tasks().into_iter().map(Into::into).collect())
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>, ApiError> {
    let overview = state.engine.get_task(&TaskId::from_raw(id))?;
    Ok(Json(overview.into()))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(request): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response: TaskResponse = state.engine.create_task(&request.title)?.into();
    let location = format!("/api/tasks/{}", response.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(response),
    ))
}

pub async fn seed(State(state): State<AppState>) -> impl IntoResponse {
    let seeded = seed_demo_data(&state.store);
    Json(json!({ "seeded": seeded }))
}
