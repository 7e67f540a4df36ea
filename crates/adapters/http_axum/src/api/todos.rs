//! JSON REST handlers for todos.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use ergo_app::ports::TodoRepository;
use ergo_domain::error::ValidationError;
use ergo_domain::id::TodoId;
use ergo_domain::params::UpdateParams;
use ergo_domain::todo::{NewTodo, Todo};

use super::RawQuery;
use crate::envelope::Envelope;
use crate::error::{ApiError, Operation};
use crate::state::AppState;

/// Request body for creating a todo.
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
}

/// Request body for updating a todo.
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub completed: bool,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Envelope<Vec<Todo>>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<Envelope<Todo>>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint. Creation answers `200`.
pub enum CreateResponse {
    Created(Json<Envelope<Todo>>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => json.into_response(),
        }
    }
}

/// Possible responses from the update endpoint.
pub enum UpdateResponse {
    Ok(Json<Envelope<Todo>>),
}

impl IntoResponse for UpdateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    Deleted(Json<Envelope<()>>),
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Deleted(json) => json.into_response(),
        }
    }
}

fn parse_id(raw: &str, operation: Operation) -> Result<TodoId, ApiError> {
    raw.parse::<TodoId>()
        .map_err(|_| ApiError::new(operation, ValidationError::InvalidId))
}

fn body_rejected(operation: Operation, rejection: &JsonRejection) -> ApiError {
    tracing::debug!(operation = operation.as_str(), reason = %rejection, "body rejected");
    ApiError::new(operation, ValidationError::InvalidBody)
}

/// `GET /api/todos`
pub async fn list<R>(
    State(state): State<AppState<R>>,
    query: RawQuery,
) -> Result<ListResponse, ApiError>
where
    R: TodoRepository + Send + Sync + 'static,
{
    let params = super::list_params(query);
    let todos = state
        .todo_service
        .list_todos(params)
        .await
        .map_err(|err| ApiError::new(Operation::List, err))?;

    tracing::info!(
        operation = "list",
        page = params.page(),
        per_page = params.per_page(),
        count = todos.len(),
        outcome = "ok",
        "todos listed"
    );
    Ok(ListResponse::Ok(Json(
        Envelope::success("todos fetched successfully", todos).with_meta(params),
    )))
}

/// `GET /api/todos/:id`
pub async fn get<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    R: TodoRepository + Send + Sync + 'static,
{
    let id = parse_id(&id, Operation::Get)?;
    let todo = state
        .todo_service
        .get_todo(id)
        .await
        .map_err(|err| ApiError::new(Operation::Get, err).with_todo_id(id))?;

    tracing::info!(operation = "get", todo_id = id.get(), outcome = "ok", "todo fetched");
    Ok(GetResponse::Ok(Json(Envelope::success(
        "todo fetched successfully",
        todo,
    ))))
}

/// `POST /api/todos`
pub async fn create<R>(
    State(state): State<AppState<R>>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    R: TodoRepository + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(|rejection| body_rejected(Operation::Create, &rejection))?;
    let new_todo = NewTodo::new(&req.title).map_err(|err| ApiError::new(Operation::Create, err))?;

    let created = state
        .todo_service
        .create_todo(new_todo)
        .await
        .map_err(|err| ApiError::new(Operation::Create, err))?;

    tracing::info!(
        operation = "create",
        todo_id = created.id.get(),
        outcome = "ok",
        "todo created"
    );
    Ok(CreateResponse::Created(Json(Envelope::success(
        "todo created successfully",
        created,
    ))))
}

/// `PATCH /api/todos/:id`
pub async fn update<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<UpdateResponse, ApiError>
where
    R: TodoRepository + Send + Sync + 'static,
{
    let id = parse_id(&id, Operation::Update)?;
    let Json(req) = payload
        .map_err(|rejection| body_rejected(Operation::Update, &rejection).with_todo_id(id))?;

    let updated = state
        .todo_service
        .update_todo(UpdateParams {
            id,
            completed: req.completed,
        })
        .await
        .map_err(|err| ApiError::new(Operation::Update, err).with_todo_id(id))?;

    tracing::info!(
        operation = "update",
        todo_id = id.get(),
        completed = updated.completed,
        outcome = "ok",
        "todo updated"
    );
    Ok(UpdateResponse::Ok(Json(Envelope::success(
        "todo updated successfully",
        updated,
    ))))
}

/// `DELETE /api/todos/:id`
pub async fn delete<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    R: TodoRepository + Send + Sync + 'static,
{
    let id = parse_id(&id, Operation::Delete)?;
    state
        .todo_service
        .delete_todo(id)
        .await
        .map_err(|err| ApiError::new(Operation::Delete, err).with_todo_id(id))?;

    tracing::info!(operation = "delete", todo_id = id.get(), outcome = "ok", "todo deleted");
    Ok(DeleteResponse::Deleted(Json(Envelope::success(
        "todo deleted successfully",
        (),
    ))))
}
