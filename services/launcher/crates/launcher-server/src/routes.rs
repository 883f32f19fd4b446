//! HTTP surface: `POST /api/instance` and `GET /health`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{StatusCode, header};
use axum::routing::{get, post};
use launcher_common::{
    Caller, ConfigError, InstanceCreated, LaunchParams, generate_token, pick_port,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the launcher router around `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/instance", post(create_instance))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Minimal health-check handler for container / load-balancer probes.
async fn health() -> StatusCode {
    StatusCode::OK
}

/// Start a new instance and tell the caller how to reach it.
async fn create_instance(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<InstanceCreated>, ApiError> {
    let caller = caller_of(&request);
    let config = &state.config;

    let port = pick_port(config.port_range()).ok_or(ConfigError::EmptyPortRange {
        min: config.port_min,
        max: config.port_max,
    })?;
    let params = LaunchParams::new(config, port, generate_token(), caller);

    let handle = state.launcher.launch(&params)?;
    tracing::info!(
        port,
        pid = ?handle.pid(),
        remote_addr = %params.caller.remote_addr,
        origin = %params.caller.origin,
        "instance launched",
    );
    handle.detach();

    Ok(Json(InstanceCreated {
        auth_token: params.token,
        socket_address: config.socket_address(port),
    }))
}

/// Remote IP and `Origin` header of `request`, empty when unavailable.
fn caller_of(request: &Request) -> Caller {
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default();
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    Caller {
        remote_addr,
        origin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use axum::body::Body;
    use axum::http::{HeaderMap, Method};
    use http_body_util::BodyExt;
    use launcher_common::LauncherConfig;
    use tower::ServiceExt;

    use crate::launcher::{InstanceHandle, InstanceLauncher, LaunchError, ProcessLauncher};

    /// Records every launch instead of spawning a process.
    #[derive(Clone, Default)]
    struct RecordingLauncher {
        launched: Arc<Mutex<Vec<LaunchParams>>>,
    }

    impl RecordingLauncher {
        fn launched(&self) -> Vec<LaunchParams> {
            self.launched.lock().unwrap().clone()
        }
    }

    impl InstanceLauncher for RecordingLauncher {
        fn launch(&self, params: &LaunchParams) -> Result<InstanceHandle, LaunchError> {
            self.launched.lock().unwrap().push(params.clone());
            Ok(InstanceHandle::untracked())
        }
    }

    fn recording_app() -> (Router, RecordingLauncher) {
        let launcher = RecordingLauncher::default();
        let app = build_router(AppState::new(LauncherConfig::default(), launcher.clone()));
        (app, launcher)
    }

    fn post_instance() -> axum::http::request::Builder {
        Request::builder().method(Method::POST).uri("/api/instance")
    }

    async fn send(app: &Router, request: Request) -> (StatusCode, HeaderMap, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, body.to_vec())
    }

    fn port_of(socket_address: &str) -> u16 {
        let port = socket_address
            .strip_prefix("ws://127.0.0.1:")
            .expect("socket address has the ws://127.0.0.1: prefix");
        port.parse().unwrap()
    }

    #[tokio::test]
    async fn create_instance_returns_token_and_address() {
        let (app, launcher) = recording_app();

        let (status, headers, body) = send(&app, post_instance().body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let created: InstanceCreated = serde_json::from_slice(&body).unwrap();
        assert_eq!(created.auth_token.len(), 64);
        assert!(created.auth_token.chars().all(|c| c.is_ascii_hexdigit()));
        let port = port_of(&created.socket_address);
        assert!((6000..=7000).contains(&port));

        let launched = launcher.launched();
        assert_eq!(launched.len(), 1);
        let params = &launched[0];
        assert_eq!(params.executable, "./vlmc");
        assert_eq!(params.port, port);
        assert_eq!(
            params.args(),
            vec![
                "da.vlmc".to_string(),
                port.to_string(),
                created.auth_token.clone(),
                String::new(),
                String::new(),
            ]
        );
    }

    #[tokio::test]
    async fn response_body_uses_wire_field_names() {
        let (app, _) = recording_app();
        let (_, _, body) = send(&app, post_instance().body(Body::empty()).unwrap()).await;

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["authToken"].is_string());
        assert!(json["socketAddress"].is_string());
    }

    #[tokio::test]
    async fn caller_address_and_origin_reach_the_instance() {
        let (app, launcher) = recording_app();
        let remote: SocketAddr = "192.168.1.20:51234".parse().unwrap();

        let request = post_instance()
            .header(header::ORIGIN, "http://editor.example")
            .extension(ConnectInfo(remote))
            .body(Body::empty())
            .unwrap();
        let (status, headers, _) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let launched = launcher.launched();
        assert_eq!(
            launched[0].caller,
            Caller {
                remote_addr: "192.168.1.20".to_string(),
                origin: "http://editor.example".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn sequential_calls_issue_distinct_tokens() {
        let (app, launcher) = recording_app();

        let (_, _, first) = send(&app, post_instance().body(Body::empty()).unwrap()).await;
        let (_, _, second) = send(&app, post_instance().body(Body::empty()).unwrap()).await;

        let first: InstanceCreated = serde_json::from_slice(&first).unwrap();
        let second: InstanceCreated = serde_json::from_slice(&second).unwrap();
        assert_ne!(first.auth_token, second.auth_token);
        // Ports may collide; only the launch count is checked.
        assert_eq!(launcher.launched().len(), 2);
    }

    #[tokio::test]
    async fn configured_host_and_single_port_are_used() {
        let launcher = RecordingLauncher::default();
        let config = LauncherConfig {
            socket_host: "wss://instances.example".to_string(),
            port_min: 6543,
            port_max: 6543,
            ..LauncherConfig::default()
        };
        let app = build_router(AppState::new(config, launcher.clone()));

        let (_, _, body) = send(&app, post_instance().body(Body::empty()).unwrap()).await;

        let created: InstanceCreated = serde_json::from_slice(&body).unwrap();
        assert_eq!(created.socket_address, "wss://instances.example:6543");
        assert_eq!(launcher.launched()[0].port, 6543);
    }

    #[tokio::test]
    async fn missing_executable_yields_server_error() {
        let config = LauncherConfig {
            executable: "/nonexistent/path/to/vlmc".to_string(),
            ..LauncherConfig::default()
        };
        let app = build_router(AppState::new(config, ProcessLauncher));

        let (status, headers, body) = send(&app, post_instance().body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(body, b"failed to launch instance");
    }

    #[tokio::test]
    async fn get_on_instance_route_is_rejected() {
        let (app, launcher) = recording_app();
        let request = Request::builder()
            .uri("/api/instance")
            .body(Body::empty())
            .unwrap();

        let (status, _, _) = send(&app, request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert!(launcher.launched().is_empty());
    }

    #[tokio::test]
    async fn preflight_is_answered_without_launching() {
        let (app, launcher) = recording_app();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/instance")
            .header(header::ORIGIN, "http://editor.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let (status, headers, _) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(launcher.launched().is_empty());
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let (app, _) = recording_app();
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let (status, _, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }
}
