//! Scripted HTTP backend
//!
//! Serves canned JSON responses per `(method, path)` over plain HTTP/1.1 and
//! records every request it parses. A route given several responses plays
//! them in order and then keeps repeating the last one.

use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone)]
struct Reply {
    status: u16,
    body: String,
}

type Routes = Arc<Mutex<HashMap<(String, String), VecDeque<Reply>>>>;

#[derive(Default)]
pub struct MockBackendBuilder {
    routes: HashMap<(String, String), VecDeque<Reply>>,
}

impl MockBackendBuilder {
    /// Add a JSON response for `method path`
    pub fn route(mut self, method: &str, path: &str, status: u16, body: Value) -> Self {
        self.routes
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back(Reply {
                status,
                body: body.to_string(),
            });
        self
    }

    /// Add a raw, possibly non-JSON, response body
    pub fn raw_route(mut self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.routes
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back(Reply {
                status,
                body: body.to_string(),
            });
        self
    }

    pub async fn start(self) -> MockBackend {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes: Routes = Arc::new(Mutex::new(self.routes));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let task_routes = routes.clone();
        let task_requests = requests.clone();
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = task_routes.clone();
                let requests = task_requests.clone();
                tokio::spawn(async move {
                    let _ = serve(stream, routes, requests).await;
                });
            }
        });

        MockBackend {
            addr,
            requests,
            handle,
        }
    }
}

pub struct MockBackend {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl MockBackend {
    pub fn builder() -> MockBackendBuilder {
        MockBackendBuilder::default()
    }

    /// A backend whose health endpoint reports `mongodb`
    pub async fn healthy(mongodb: &str) -> Self {
        Self::builder()
            .route(
                "GET",
                "/api/health",
                200,
                serde_json::json!({"status": "ok", "mongodb": mongodb}),
            )
            .start()
            .await
    }

    /// Accepts connections and never answers
    pub async fn silent() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        MockBackend {
            addr,
            requests: Arc::new(Mutex::new(Vec::new())),
            handle,
        }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(
    mut stream: TcpStream,
    routes: Routes,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            // Liveness probes connect and close without sending anything
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[header_end..]).into_owned();

    requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        body,
    });

    let reply = {
        let mut routes = routes.lock().unwrap();
        match routes.get_mut(&(method, path)) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        }
    }
    .unwrap_or(Reply {
        status: 404,
        body: r#"{"error":"not found"}"#.to_string(),
    });

    let response = format!(
        "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        reply.body.len(),
        reply.body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}
