//! Minimal HTML form front end.
//!
//! Every state-changing route redirects back to `/`. Store failures become
//! a 500 with the error text.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use log::{info, warn};
use serde::Deserialize;

use crate::model::{Category, NewTask, Priority, Progress, Task};
use crate::ops::{self, Mode};
use crate::output::format_percent;
use crate::store::TaskStore;
use crate::validate::parse_due_date;

pub struct AppState {
    pub store: TaskStore,
}

pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        warn!("request failed: {:#}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, format!("error: {:#}", self.0)).into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Run blocking store work off the async workers.
async fn with_store<T, F>(state: &AppState, f: F) -> Result<T, AppError>
where
    F: FnOnce(&TaskStore) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = state.store.clone();
    Ok(tokio::task::spawn_blocking(move || f(&store)).await??)
}

pub fn router(store: TaskStore) -> Router {
    let state = Arc::new(AppState { store });
    Router::new()
        .route("/", get(index))
        .route("/add", post(add))
        .route("/toggle/{id}", get(toggle))
        .route("/delete/{id}", get(delete))
        .route("/progress", get(progress))
        .with_state(state)
}

pub async fn serve(store: TaskStore, addr: SocketAddr) -> Result<()> {
    let data_file = store.path().display().to_string();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("serving {data_file} on http://{addr}");
    axum::serve(listener, router(store))
        .await
        .context("server error")?;
    Ok(())
}

#[derive(Deserialize)]
pub struct IndexQuery {
    mode: Option<String>,
}

async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IndexQuery>,
) -> Result<Html<String>, AppError> {
    let mode = query.mode.as_deref().map(Mode::parse).unwrap_or_default();
    let all = with_store(&state, |store| store.load()).await?;
    let tasks = ops::filter_tasks(&all, &mode, ops::today());
    Ok(Html(render_index(&tasks, &mode, &Progress::of(&all))))
}

#[derive(Deserialize)]
pub struct AddForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    priority: String,
    #[serde(default)]
    due_date: String,
}

async fn add(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddForm>,
) -> Result<Redirect, AppError> {
    if form.title.trim().is_empty() {
        return Ok(Redirect::to("/"));
    }
    let due_date = match parse_due_date(&form.due_date) {
        Ok(d) => d,
        Err(e) => {
            warn!("rejected new task '{}': {e}", form.title.trim());
            return Ok(Redirect::to("/"));
        }
    };
    let new = NewTask {
        title: form.title,
        category: Category::parse(form.category.trim()).unwrap_or_default(),
        priority: Priority::parse(form.priority.trim()).unwrap_or_default(),
        due_date,
        notes: String::new(),
    };
    let task = with_store(&state, move |store| ops::add_task(store, new)).await?;
    info!("added task {} '{}'", task.id, task.title);
    Ok(Redirect::to("/"))
}

async fn toggle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Redirect, AppError> {
    match with_store(&state, move |store| ops::toggle_done(store, id)).await? {
        Some(task) => info!("task {id} done={}", task.done),
        None => info!("toggle: task {id} not found"),
    }
    Ok(Redirect::to("/"))
}

async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Redirect, AppError> {
    if with_store(&state, move |store| ops::remove_task(store, id))
        .await?
        .is_some()
    {
        info!("deleted task {id}");
    }
    Ok(Redirect::to("/"))
}

async fn progress(State(state): State<Arc<AppState>>) -> Result<String, AppError> {
    let progress = with_store(&state, ops::progress).await?;
    Ok(format_percent(&progress))
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_task_row(task: &Task) -> String {
    let due = task
        .due_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());
    let class = if task.done { " class=\"done\"" } else { "" };
    format!(
        "<li{class}>{} <strong>{}</strong> ({}/{}) due {} \
         <a href=\"/toggle/{id}\">toggle</a> <a href=\"/delete/{id}\">delete</a></li>\n",
        task.marker(),
        escape(&task.title),
        task.category,
        task.priority,
        due,
        id = task.id,
    )
}

fn render_index(tasks: &[Task], mode: &Mode, progress: &Progress) -> String {
    let mut html = String::from(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>Career Todo</title>\
         <style>.done{color:#888;text-decoration:line-through}</style></head><body>\n\
         <h1>Career Todo</h1>\n",
    );
    html.push_str(&format!(
        "<p>Progress: {} &middot; showing {}</p>\n",
        format_percent(progress),
        escape(&mode.to_string())
    ));

    html.push_str("<form method=\"post\" action=\"/add\">\n");
    html.push_str("<input name=\"title\" placeholder=\"Title\" required>\n");
    html.push_str("<select name=\"category\">");
    for c in Category::ALL {
        let selected = if c == Category::default() { " selected" } else { "" };
        html.push_str(&format!("<option value=\"{c}\"{selected}>{c}</option>"));
    }
    html.push_str("</select>\n<select name=\"priority\">");
    for p in Priority::ALL {
        let selected = if p == Priority::default() { " selected" } else { "" };
        html.push_str(&format!("<option value=\"{p}\"{selected}>{p}</option>"));
    }
    html.push_str("</select>\n");
    html.push_str("<input name=\"due_date\" type=\"date\">\n");
    html.push_str("<button type=\"submit\">Add</button>\n</form>\n");

    html.push_str("<ul>\n");
    if tasks.is_empty() {
        html.push_str("<li>Nothing to show.</li>\n");
    }
    for task in tasks {
        html.push_str(&render_task_row(task));
    }
    html.push_str("</ul>\n</body></html>\n");
    html
}
