//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod todos;

use std::collections::HashMap;

use axum::Router;
use axum::extract::Query;
use axum::extract::rejection::QueryRejection;
use axum::routing::get;

use ergo_app::ports::TodoRepository;
use ergo_domain::params::ListParams;

use crate::state::AppState;

/// Query-string keys accepted for the page size, in priority order.
const PER_PAGE_KEYS: [&str; 3] = ["limit", "per_page", "perPage"];

/// Raw query string as handed to list endpoints.
pub type RawQuery = Result<Query<HashMap<String, String>>, QueryRejection>;

/// Build the `/api` sub-router.
pub fn routes<R>() -> Router<AppState<R>>
where
    R: TodoRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/todos", get(todos::list::<R>).post(todos::create::<R>))
        .route(
            "/todos/{id}",
            get(todos::get::<R>)
                .patch(todos::update::<R>)
                .delete(todos::delete::<R>),
        )
}

/// Pagination window from the query string; a malformed query yields defaults.
pub(crate) fn list_params(query: RawQuery) -> ListParams {
    let Ok(Query(query)) = query else {
        return ListParams::default();
    };

    let per_page = PER_PAGE_KEYS.iter().find_map(|key| query.get(*key));
    ListParams::from_query(
        query.get("page").map(String::as_str),
        per_page.map(String::as_str),
    )
}
