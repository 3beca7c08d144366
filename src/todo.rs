//! Tiny JSON GET client for placeholder todo items, with an offline loader.

use crate::error::{Result, TodoError};
use crate::models::Todo;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const TODO_BASE_URL: &str = "https://jsonplaceholder.typicode.com/todos";
pub const TODO_TIMEOUT_SECS: u64 = 5;

/// Fetch todo `id` from the placeholder API
pub fn fetch_todo(id: i64) -> std::result::Result<Todo, TodoError> {
    fetch_todo_from(TODO_BASE_URL, id)
}

/// Fetch todo `id` from `base_url`
pub fn fetch_todo_from(base_url: &str, id: i64) -> std::result::Result<Todo, TodoError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(TODO_TIMEOUT_SECS))
        .build()
        .map_err(|e| TodoError::Network(e.to_string()))?;

    let response = client
        .get(format!("{}/{id}", base_url.trim_end_matches('/')))
        .send()
        .map_err(|e| TodoError::Network(e.to_string()))?;

    if response.status() != StatusCode::OK {
        return Err(TodoError::Status(response.status().as_u16()));
    }

    response
        .json()
        .map_err(|e| TodoError::Network(e.to_string()))
}

/// Load a todo from a local JSON file
pub fn load_mock<P: AsRef<Path>>(path: P) -> Result<Todo> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// One-line status summary: `[DONE] #1: title`
pub fn summarize(todo: &Todo) -> String {
    let id = todo
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "?".to_string());
    let title = todo
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("Untitled");
    let status = if todo.completed { "[DONE]" } else { "[TODO]" };
    format!("{status} #{id}: {title}")
}
