use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use rota_engine::AssignmentEngine;
use rota_store::InMemoryStore;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use crate::handlers;
use crate::rotation::{self, RotationConfig};

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub rotation: RotationConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 9292,
            rotation: RotationConfig::default(),
        }
    }
}

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AssignmentEngine>,
    pub store: Arc<InMemoryStore>,
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/api/users/{id}",
            get(handlers::get_user).delete(handlers::delete_user),
        )
        .route(
            "/api/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route("/api/tasks/{id}", get(handlers::get_task))
        .route("/api/seed", post(handlers::seed))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Create and start the server plus the rotation worker. Returns a handle
/// that keeps both alive and shuts them down together.
pub async fn start(
    config: ServerConfig,
    engine: Arc<AssignmentEngine>,
    store: Arc<InMemoryStore>,
) -> Result<ServerHandle, std::io::Error> {
    let cancel = CancellationToken::new();

    let rotation_handle =
        rotation::start_rotation_task(Arc::clone(&engine), config.rotation.clone(), cancel.clone());

    let state = AppState { engine, store };
    let router = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(port = local_addr.port(), "Rota server started");

    let shutdown = cancel.clone();
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .ok();
    });

    Ok(ServerHandle {
        port: local_addr.port(),
        cancel,
        _server: server_handle,
        _rotation: rotation_handle,
    })
}

/// Handle returned by `start()` — keeps background tasks alive.
pub struct ServerHandle {
    pub port: u16,
    cancel: CancellationToken,
    _server: tokio::task::JoinHandle<()>,
    _rotation: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Signal the server and the rotation worker to stop.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{TaskResponse, UserResponse};
    use rota_core::TaskState;
    use rota_engine::SequencePicker;
    use std::time::Duration;

    fn test_state() -> AppState {
        let store = Arc::new(InMemoryStore::new());
        let engine = Arc::new(
            AssignmentEngine::with_picker(Arc::clone(&store), Arc::new(SequencePicker::first()))
                // Keep single-user fixtures from completing tasks instantly.
                .min_task_age(Duration::from_secs(300)),
        );
        AppState { engine, store }
    }

    async fn start_test_server() -> ServerHandle {
        let state = test_state();
        let config = ServerConfig {
            port: 0, // Random port
            // Long interval: only the startup sweep runs during a test.
            rotation: RotationConfig { interval_secs: 3600 },
        };
        start(config, state.engine, state.store).await.unwrap()
    }

    #[test]
    fn build_router_creates_routes() {
        let _router = build_router(test_state());
    }

    #[tokio::test]
    async fn health_reports_counts() {
        let handle = start_test_server().await;
        let url = format!("http://127.0.0.1:{}/health", handle.port);

        let body: serde_json::Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["users"], 0);
        assert_eq!(body["tasks"], 0);

        handle.shutdown();
    }

    #[tokio::test]
    async fn user_crud_maps_status_codes() {
        let handle = start_test_server().await;
        let base = format!("http://127.0.0.1:{}/api/users", handle.port);
        let client = reqwest::Client::new();

        // Create: 201 with a Location reference.
        let resp = client
            .post(&base)
            .json(&serde_json::json!({ "name": "Alice" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
        let location = resp
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        let alice: UserResponse = resp.json().await.unwrap();
        assert_eq!(location, format!("/api/users/{}", alice.id));

        // Duplicate name, case-insensitive: 409.
        let resp = client
            .post(&base)
            .json(&serde_json::json!({ "name": "ALICE" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 409);

        // Blank name: 400.
        let resp = client
            .post(&base)
            .json(&serde_json::json!({ "name": "   " }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);

        // Read back: 200 for the list and the entity, 404 for a stranger.
        let users: Vec<UserResponse> = client.get(&base).send().await.unwrap().json().await.unwrap();
        assert_eq!(users.len(), 1);

        let resp = client
            .get(format!("{base}/{}", alice.id))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        let resp = client.get(format!("{base}/user_nope")).send().await.unwrap();
        assert_eq!(resp.status(), 404);

        // Delete: 204 once, 404 after.
        let resp = client
            .delete(format!("{base}/{}", alice.id))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 204);
        let resp = client
            .delete(format!("{base}/{}", alice.id))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);

        handle.shutdown();
    }

    #[tokio::test]
    async fn task_creation_assigns_and_rejects_duplicates() {
        let handle = start_test_server().await;
        let users_url = format!("http://127.0.0.1:{}/api/users", handle.port);
        let tasks_url = format!("http://127.0.0.1:{}/api/tasks", handle.port);
        let client = reqwest::Client::new();

        let alice: UserResponse = client
            .post(&users_url)
            .json(&serde_json::json!({ "name": "Alice" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        let resp = client
            .post(&tasks_url)
            .json(&serde_json::json!({ "title": "Ride" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
        let task: TaskResponse = resp.json().await.unwrap();
        assert_eq!(task.state, TaskState::InProgress);
        assert_eq!(task.assigned_user_id, Some(alice.id));
        assert_eq!(task.assigned_user_name.as_deref(), Some("Alice"));

        let resp = client
            .post(&tasks_url)
            .json(&serde_json::json!({ "title": "ride" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 409);

        let resp = client
            .post(&tasks_url)
            .json(&serde_json::json!({ "title": "" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);

        let resp = client
            .get(format!("{tasks_url}/{}", task.id))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let fetched: TaskResponse = resp.json().await.unwrap();
        assert_eq!(fetched.visited_users_count, 1);

        handle.shutdown();
    }

    #[tokio::test]
    async fn seed_endpoint_is_idempotent() {
        let handle = start_test_server().await;
        let url = format!("http://127.0.0.1:{}/api/seed", handle.port);
        let client = reqwest::Client::new();

        let body: serde_json::Value = client
            .post(&url)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["seeded"], true);

        let body: serde_json::Value = client
            .post(&url)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["seeded"], false);

        let users_url = format!("http://127.0.0.1:{}/api/users", handle.port);
        let users: Vec<UserResponse> = client
            .get(&users_url)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(users.len(), 10);

        handle.shutdown();
    }
}
