//! Todo page and the htmx fragments it swaps in.

use askama::Template;
use axum::Form;
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use ergo_app::ports::TodoRepository;
use ergo_domain::id::TodoId;
use ergo_domain::params::UpdateParams;
use ergo_domain::todo::{NewTodo, Todo};

use super::{UiError, render};
use crate::api::RawQuery;
use crate::state::AppState;

const HX_TRIGGER: &str = "hx-trigger";

/// Full page listing one window of todos.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    hostname: String,
    todos: Vec<Todo>,
    page: u64,
    per_page: u64,
    prev_page: Option<u64>,
    next_page: Option<u64>,
}

/// Single `<li>` fragment for one todo.
#[derive(Template)]
#[template(path = "todo.html")]
pub struct TodoTemplate {
    todo: Todo,
}

/// Form posted by the "add" input.
#[derive(Debug, Deserialize)]
pub struct CreateTodoForm {
    #[serde(default)]
    pub todo_title: String,
}

/// Form posted by the completion checkbox.
#[derive(Debug, Deserialize)]
pub struct UpdateTodoForm {
    #[serde(default)]
    pub completed: String,
}

/// Accepts the spellings `1 t T TRUE true True` and `0 f F FALSE false False`.
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn parse_id(raw: &str) -> Result<TodoId, UiError> {
    raw.parse::<TodoId>().map_err(|err| {
        tracing::debug!(reason = %err, raw, "invalid todo id");
        UiError::BadRequest("invalid request")
    })
}

fn hostname() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "default".to_string())
}

/// `GET /`: render the current page of todos.
pub async fn home<R>(
    State(state): State<AppState<R>>,
    query: RawQuery,
) -> Result<Response, UiError>
where
    R: TodoRepository + Send + Sync + 'static,
{
    let params = crate::api::list_params(query);
    let todos = state
        .todo_service
        .list_todos(params)
        .await
        .map_err(|err| UiError::from_service("home", &err))?;

    let full_page = u64::try_from(todos.len()).is_ok_and(|len| len == params.per_page());
    let template = HomeTemplate {
        hostname: hostname(),
        page: params.page(),
        per_page: params.per_page(),
        prev_page: params.page().checked_sub(1).filter(|prev| *prev >= 1),
        next_page: full_page.then(|| params.page().saturating_add(1)),
        todos,
    };

    Ok(render(&template)?.into_response())
}

/// `POST /ui/todo`: create a todo and return its fragment.
pub async fn create<R>(
    State(state): State<AppState<R>>,
    form: Result<Form<CreateTodoForm>, FormRejection>,
) -> Result<Response, UiError>
where
    R: TodoRepository + Send + Sync + 'static,
{
    let title = form.map(|Form(form)| form.todo_title).unwrap_or_default();
    let Ok(new_todo) = NewTodo::new(&title) else {
        tracing::debug!(
            operation = "ui_create",
            outcome = "rejected",
            "empty todo title"
        );
        return Err(UiError::BadRequest("enter a todo title"));
    };

    let todo = state
        .todo_service
        .create_todo(new_todo)
        .await
        .map_err(|err| UiError::from_service("ui_create", &err))?;

    tracing::info!(
        operation = "ui_create",
        todo_id = todo.id.get(),
        outcome = "ok",
        "todo created"
    );
    let body = render(&TodoTemplate { todo })?;
    Ok(([(HX_TRIGGER, "todoAdded")], body).into_response())
}

/// `PATCH /ui/todo/:id`: set the completion flag and return the fragment.
pub async fn update<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    form: Result<Form<UpdateTodoForm>, FormRejection>,
) -> Result<Response, UiError>
where
    R: TodoRepository + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let completed = form
        .ok()
        .and_then(|Form(form)| parse_flag(&form.completed))
        .ok_or(UiError::BadRequest("invalid request body"))?;

    let todo = state
        .todo_service
        .update_todo(UpdateParams { id, completed })
        .await
        .map_err(|err| UiError::from_service("ui_update", &err))?;

    tracing::info!(
        operation = "ui_update",
        todo_id = id.get(),
        completed,
        outcome = "ok",
        "todo updated"
    );
    Ok(render(&TodoTemplate { todo })?.into_response())
}

/// `DELETE /ui/todo/:id`: delete a todo; the empty body removes the fragment.
pub async fn delete<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<StatusCode, UiError>
where
    R: TodoRepository + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    state
        .todo_service
        .delete_todo(id)
        .await
        .map_err(|err| UiError::from_service("ui_delete", &err))?;

    tracing::info!(
        operation = "ui_delete",
        todo_id = id.get(),
        outcome = "ok",
        "todo deleted"
    );
    Ok(StatusCode::OK)
}
