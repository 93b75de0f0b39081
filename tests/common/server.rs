//! In-process HTTP backend for exercising the real REST client.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use sitework::api::ApiClient;

/// One request as the server saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body should be JSON")
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}

#[derive(Clone)]
struct Route {
    method: Method,
    path: String,
    status: StatusCode,
    content_type: &'static str,
    body: Vec<u8>,
}

#[derive(Default)]
struct ServerState {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Answers registered `(method, path)` routes and records every request.
/// Unregistered routes get `404 {"message": "no route"}`.
pub struct TestServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
}

impl TestServer {
    pub async fn start() -> Self {
        let state = Arc::new(ServerState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test server");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server");
        });

        TestServer { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url()).expect("client for test server")
    }

    /// Respond to `method path` with a JSON body
    pub fn json(&self, method: Method, path: &str, status: StatusCode, body: Value) {
        self.route(Route {
            method,
            path: path.to_string(),
            status,
            content_type: "application/json",
            body: body.to_string().into_bytes(),
        });
    }

    /// Respond to `method path` with raw bytes
    pub fn bytes(&self, method: Method, path: &str, body: &[u8]) {
        self.route(Route {
            method,
            path: path.to_string(),
            status: StatusCode::OK,
            content_type: "application/octet-stream",
            body: body.to_vec(),
        });
    }

    fn route(&self, route: Route) {
        let mut routes = self.state.routes.lock().unwrap();
        routes.retain(|r| !(r.method == route.method && r.path == route.path));
        routes.push(route);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// `METHOD /path` of every request so far
    pub fn request_lines(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("at least one request")
    }
}

async fn handle(State(state): State<Arc<ServerState>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let header_text = |name: header::HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let recorded = RecordedRequest {
        method: parts.method.clone(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        authorization: header_text(header::AUTHORIZATION),
        content_type: header_text(header::CONTENT_TYPE),
        body: body.to_vec(),
    };
    let route = state
        .routes
        .lock()
        .unwrap()
        .iter()
        .find(|r| r.method == recorded.method && r.path == recorded.path)
        .cloned();
    state.requests.lock().unwrap().push(recorded);

    match route {
        Some(route) => (
            route.status,
            [(header::CONTENT_TYPE, route.content_type)],
            Body::from(route.body),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            r#"{"message":"no route"}"#,
        )
            .into_response(),
    }
}
