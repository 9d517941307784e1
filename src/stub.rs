//! In-memory users endpoint for trying the form without the real application.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::record::ID_ATTRIBUTE;

/// Stub server configuration
pub struct StubConfig {
    pub port: u16,
    /// Path prefix the endpoint is mounted under, e.g. "/sdb"
    pub prefix: String,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            prefix: String::new(),
        }
    }
}

#[derive(Default)]
pub struct StubState {
    users: Mutex<BTreeMap<u64, Value>>,
}

impl StubState {
    fn next_id(users: &BTreeMap<u64, Value>) -> u64 {
        users.keys().next_back().map(|id| id + 1).unwrap_or(1)
    }
}

pub fn router(prefix: &str) -> Router {
    let state = Arc::new(StubState::default());
    let routes = Router::new()
        .route("/users/", post(create_user))
        .route("/users/manageUsers", get(manage_users))
        .route("/users/{id}", get(get_user).put(update_user))
        .with_state(state);

    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        routes
    } else {
        Router::new().nest(prefix, routes)
    }
}

/// Run the stub server
pub async fn run(config: StubConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(&config.prefix);
    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", config.port)).await?;
    tracing::info!(port = config.port, prefix = %config.prefix, "stub listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn with_id(mut body: Value, id: u64) -> Result<Value, StatusCode> {
    let object = body.as_object_mut().ok_or(StatusCode::BAD_REQUEST)?;
    object.insert(ID_ATTRIBUTE.to_string(), json!(id));
    Ok(body)
}

async fn create_user(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let mut users = state.users.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let id = StubState::next_id(&users);
    let user = with_id(body, id)?;
    users.insert(id, user.clone());
    tracing::info!(id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update_user(
    State(state): State<Arc<StubState>>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut users = state.users.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    if !users.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let user = with_id(body, id)?;
    users.insert(id, user.clone());
    tracing::info!(id, "user updated");
    Ok(Json(user))
}

async fn get_user(
    State(state): State<Arc<StubState>>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, StatusCode> {
    let users = state.users.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    users.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn manage_users(State(state): State<Arc<StubState>>) -> impl IntoResponse {
    let users = match state.users.lock() {
        Ok(users) => users,
        Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    };
    let mut rows = String::new();
    for (id, user) in users.iter() {
        let email = user.get("email").and_then(Value::as_str).unwrap_or("");
        rows.push_str(&format!("<li>{}: {}</li>", id, email));
    }
    Html(format!(
        "<!DOCTYPE html><html><head><title>Users</title></head><body><h1>Users</h1><ul>{}</ul></body></html>",
        rows
    ))
    .into_response()
}
