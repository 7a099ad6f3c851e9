//! REST API Server for the query router
//!
//! Exposes the pipeline and per-session history over HTTP
//! Serves as the playground back-end for a chat UI

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::models::Category;
use crate::pipeline::QueryPipeline;
use crate::session::SessionStore;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    pub query: String,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub pipeline: Arc<QueryPipeline>,
    pub sessions: Arc<SessionStore>,
}

/// =============================
/// Helpers: Session Ids
/// =============================

fn stable_uuid_from_string(input: &str) -> Uuid {
    use sha2::{Digest, Sha256};

    let hash = Sha256::digest(input.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hash[..16]);

    // Set UUID version (4) and variant (RFC4122) bits.
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    Uuid::from_bytes(bytes)
}

/// Accept real UUIDs as-is and map any other client token to a stable UUID
fn parse_session_id(value: Option<&str>) -> Option<Uuid> {
    match value {
        Some(v) if !v.trim().is_empty() => {
            Some(Uuid::parse_str(v).unwrap_or_else(|_| stable_uuid_from_string(v)))
        }
        _ => None,
    }
}

fn not_found(id: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error(format!("Session not found: {}", id))),
    )
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Agents Endpoint
/// =============================

async fn list_agents(State(state): State<ApiState>) -> Json<ApiResponse> {
    let agents: Vec<serde_json::Value> = Category::ALL
        .iter()
        .map(|category| {
            let agent = state.pipeline.dispatcher().agent_for(*category);
            serde_json::json!({
                "category": category,
                "name": agent.name(),
                "role": agent.role(),
            })
        })
        .collect();

    Json(ApiResponse::success(agents))
}

/// =============================
/// Chat Endpoint
/// =============================

async fn chat_handler(
    State(state): State<ApiState>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let requested = parse_session_id(req.session_id.as_deref());
    let (session_id, session) = state.sessions.get_or_create(requested).await;

    info!(%session_id, "Received chat request");

    // Held for the whole run: one query per session at a time
    let mut session = session.lock().await;
    let exchange = state.pipeline.process(&mut session, &req.query).await;

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "session_id": session_id,
            "category": exchange.category,
            "agent": exchange.agent,
            "reply": exchange.reply,
            "failed": exchange.failed,
            "history": session.history.all(),
        }))),
    )
}

/// =============================
/// Session Endpoints
/// =============================

async fn session_history(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> (StatusCode, Json<ApiResponse>) {
    let Some(session_id) = parse_session_id(Some(&id)) else {
        return not_found(&id);
    };

    match state.sessions.get(session_id).await {
        Ok(session) => {
            let session = session.lock().await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(serde_json::json!({
                    "session_id": session_id,
                    "history": session.history.all(),
                }))),
            )
        }
        Err(_) => not_found(&id),
    }
}

async fn clear_session(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> (StatusCode, Json<ApiResponse>) {
    let Some(session_id) = parse_session_id(Some(&id)) else {
        return not_found(&id);
    };

    match state.sessions.get(session_id).await {
        Ok(session) => {
            session.lock().await.history.clear();
            info!(%session_id, "Session history cleared");
            (
                StatusCode::OK,
                Json(ApiResponse::success(serde_json::json!({
                    "session_id": session_id,
                    "cleared": true,
                }))),
            )
        }
        Err(_) => not_found(&id),
    }
}

async fn end_session(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> (StatusCode, Json<ApiResponse>) {
    let Some(session_id) = parse_session_id(Some(&id)) else {
        return not_found(&id);
    };

    match state.sessions.end(session_id).await {
        Ok(()) => {
            info!(%session_id, "Session ended");
            (
                StatusCode::OK,
                Json(ApiResponse::success(serde_json::json!({
                    "session_id": session_id,
                    "ended": true,
                }))),
            )
        }
        Err(_) => not_found(&id),
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(pipeline: Arc<QueryPipeline>, sessions: Arc<SessionStore>) -> Router {
    let state = ApiState { pipeline, sessions };

    Router::new()
        .route("/health", get(health))
        .route("/api/agents", get(list_agents))
        .route("/api/chat", post(chat_handler))
        .route("/api/sessions/:id", axum::routing::delete(end_session))
        .route("/api/sessions/:id/history", get(session_history))
        .route("/api/sessions/:id/clear", post(clear_session))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    pipeline: Arc<QueryPipeline>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(pipeline, Arc::new(SessionStore::new()));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::MockAgent;
    use crate::classifier::KeywordClassifier;
    use crate::dispatcher::Dispatcher;
    use crate::models::RawResponse;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_router() -> (Router, Arc<SessionStore>) {
        let pipeline = QueryPipeline::new(
            KeywordClassifier::default(),
            Dispatcher::new(
                Arc::new(MockAgent::replying(
                    "Financial AI Agent",
                    RawResponse::structured("GOOG: $175.32 ..."),
                )),
                Arc::new(MockAgent::failing("Web Search Agent", "search backend down")),
            ),
        );
        let sessions = Arc::new(SessionStore::new());
        (create_router(Arc::new(pipeline), sessions.clone()), sessions)
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn chat(session_id: Option<&str>, query: &str) -> Request<Body> {
        let body = serde_json::json!({ "session_id": session_id, "query": query });
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn test_parse_session_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_session_id(Some(&id.to_string())), Some(id));
        assert_eq!(parse_session_id(Some("  ")), None);
        assert_eq!(parse_session_id(None), None);
        assert_eq!(
            parse_session_id(Some("browser-tab-1")),
            parse_session_id(Some("browser-tab-1"))
        );
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = test_router();
        let (status, body) = send(
            &router,
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_list_agents() {
        let (router, _) = test_router();
        let (status, body) = send(
            &router,
            Request::builder().uri("/api/agents").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["category"], "financial");
        assert_eq!(body["data"][0]["name"], "Financial AI Agent");
        assert_eq!(body["data"][1]["name"], "Web Search Agent");
    }

    #[tokio::test]
    async fn test_chat_creates_session_and_records_pair() {
        let (router, sessions) = test_router();
        let (status, body) = send(&router, chat(None, "What is the stock price of Google?")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["category"], "financial");
        assert_eq!(body["data"]["reply"], "GOOG: $175.32 ...");
        assert_eq!(body["data"]["history"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"]["history"][0]["role"], "user");
        assert_eq!(sessions.len().await, 1);
    }

    #[tokio::test]
    async fn test_chat_failure_still_succeeds_with_fallback() {
        let (router, _) = test_router();
        let (status, body) = send(&router, chat(Some("tab-7"), "capital of France?")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["failed"], true);
        assert_eq!(
            body["data"]["reply"],
            "Sorry, I encountered an error: Agent error: search backend down. Please try rephrasing your question."
        );
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let (router, _) = test_router();

        let (_, body) = send(&router, chat(Some("tab-1"), "stock tips")).await;
        let session_id = body["data"]["session_id"].as_str().unwrap().to_string();
        send(&router, chat(Some("tab-1"), "market news")).await;

        let (status, body) = send(
            &router,
            Request::builder()
                .uri(format!("/api/sessions/{}/history", session_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["history"].as_array().unwrap().len(), 4);

        let (status, _) = send(
            &router,
            Request::builder()
                .method("POST")
                .uri(format!("/api/sessions/{}/clear", session_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(
            &router,
            Request::builder()
                .uri("/api/sessions/tab-1/history")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert!(body["data"]["history"].as_array().unwrap().is_empty());

        let (status, _) = send(
            &router,
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/sessions/{}", session_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &router,
            Request::builder()
                .uri(format!("/api/sessions/{}/history", session_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }
}
