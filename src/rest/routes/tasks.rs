// rest/routes/tasks.rs — the four task operations over HTTP.
//
// Writes follow the redirect-after-write pattern: on success the response is
// a 303 back to /tasks and the client re-fetches the current list.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
    Form, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::tasks::TaskError;
use crate::AppContext;

fn error_response(err: TaskError) -> (StatusCode, Json<Value>) {
    let status = match &err {
        TaskError::NotFound(_) => StatusCode::NOT_FOUND,
        TaskError::EmptyTitle => StatusCode::BAD_REQUEST,
        TaskError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() })))
}

pub async fn list_tasks(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match ctx.tasks.list_tasks().await {
        Ok(tasks) => Ok(Json(json!({ "tasks": tasks }))),
        Err(e) => Err(error_response(e)),
    }
}

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    /// Missing title is treated the same as an empty one.
    #[serde(default)]
    pub title: String,
}

pub async fn create_task(
    State(ctx): State<Arc<AppContext>>,
    Form(body): Form<CreateTaskRequest>,
) -> Result<Redirect, (StatusCode, Json<Value>)> {
    match ctx.tasks.create_task(&body.title).await {
        Ok(_) => Ok(Redirect::to("/tasks")),
        Err(e) => Err(error_response(e)),
    }
}

pub async fn toggle_complete(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Redirect, (StatusCode, Json<Value>)> {
    match ctx.tasks.toggle_complete(&id).await {
        Ok(_) => Ok(Redirect::to("/tasks")),
        Err(e) => Err(error_response(e)),
    }
}

pub async fn delete_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Redirect, (StatusCode, Json<Value>)> {
    match ctx.tasks.delete_task(&id).await {
        Ok(()) => Ok(Redirect::to("/tasks")),
        Err(e) => Err(error_response(e)),
    }
}
