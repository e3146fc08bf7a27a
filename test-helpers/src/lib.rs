pub mod mock;
pub mod telemetry;

use actix_web::dev::Server;
use actix_web::http::{StatusCode, header};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

/// Scripted response for one method and path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
}

/// A request as the mock backend saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    /// Path exactly as sent, still percent-encoded.
    pub path: String,
    pub body: String,
    pub accept: Option<String>,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
}

impl RecordedRequest {
    /// `"GET /api/devices"`
    pub fn line(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

#[derive(Default)]
struct Shared {
    routes: Mutex<HashMap<(String, String), MockResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// A device backend that answers scripted responses and 404 for anything
/// else, recording every request it receives.
pub struct MockBackend {
    #[allow(unused)]
    pub port: u16,
    /// `http://127.0.0.1:<port>`
    pub address: String,
    shared: Arc<Shared>,
}

impl MockBackend {
    /// Absolute URL for a path on this backend.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.address)
    }

    /// Answer `method path` with `status` and a raw body.
    pub fn respond(
        &self,
        method: &str,
        path: &str,
        status: u16,
        body: impl Into<String>,
    ) {
        self.shared.routes.lock().unwrap().insert(
            (method.to_uppercase(), path.to_string()),
            MockResponse {
                status,
                body: body.into(),
            },
        );
    }

    /// Answer `method path` with `status` and a JSON body.
    pub fn respond_json(
        &self,
        method: &str,
        path: &str,
        status: u16,
        body: &serde_json::Value,
    ) {
        self.respond(method, path, status, body.to_string());
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared.requests.lock().unwrap().clone()
    }

    /// Requests received so far as `"METHOD /path"` lines, in order.
    pub fn request_lines(&self) -> Vec<String> {
        self.requests().iter().map(RecordedRequest::line).collect()
    }

    pub fn clear_requests(&self) {
        self.shared.requests.lock().unwrap().clear();
    }
}

async fn handle(
    request: HttpRequest,
    body: web::Bytes,
    shared: web::Data<Arc<Shared>>,
) -> HttpResponse {
    let header_value = |name: header::HeaderName| {
        request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    let method = request.method().to_string();
    let path = request.path().to_string();

    shared.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        body: String::from_utf8_lossy(&body).into_owned(),
        accept: header_value(header::ACCEPT),
        content_type: header_value(header::CONTENT_TYPE),
        authorization: header_value(header::AUTHORIZATION),
    });

    let scripted = shared.routes.lock().unwrap().get(&(method, path)).cloned();
    match scripted {
        Some(response) => HttpResponse::build(
            StatusCode::from_u16(response.status)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        )
        .content_type("application/json")
        .body(response.body),
        None => HttpResponse::NotFound().finish(),
    }
}

/// Build the server, but not await it.
///
/// Returns the server and the port it bound to; port 0 gets an OS-assigned
/// port.
fn build(
    ip: &str,
    port: u16,
    shared: Arc<Shared>,
) -> std::io::Result<(Server, u16)> {
    let listener = TcpListener::bind(format!("{ip}:{port}"))?;
    let port = listener.local_addr()?.port();
    let shared = web::Data::new(shared);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(shared.clone())
            .default_service(web::to(handle))
    })
    .workers(1)
    .listen(listener)?
    .run();
    Ok((server, port))
}

pub async fn spawn_backend_on(ip: &str, port: u16) -> MockBackend {
    telemetry::init_test_subscriber();

    let shared = Arc::new(Shared::default());
    let (server, port) = build(ip, port, shared.clone()).unwrap();
    tokio::spawn(server);

    MockBackend {
        port,
        address: format!("http://{ip}:{port}"),
        shared,
    }
}

/// Use OS-assigned port for parallel testing.
pub async fn spawn_backend() -> MockBackend {
    spawn_backend_on("127.0.0.1", 0).await
}

/// An address nothing listens on, for provoking network errors.
pub fn unreachable_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
