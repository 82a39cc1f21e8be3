//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use main_api::config::GatewayConfig;
use main_api::lifecycle::{Shutdown, ShutdownReason};
use main_api::observability::GatewayMetrics;
use main_api::GatewayServer;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// A request seen by the mock auxiliary service.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    #[allow(dead_code)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Handle to a running mock auxiliary service.
pub struct MockAuxiliary {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockAuxiliary {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn calls_to(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }
}

/// Start a programmable mock auxiliary service.
///
/// `f` receives the request target (path and query) and returns the status
/// and JSON body to answer with.
pub async fn start_programmable_auxiliary<F, Fut>(f: F) -> MockAuxiliary
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let recorded = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let recorded = recorded.clone();
                    tokio::spawn(async move {
                        let (reader, mut writer) = socket.split();
                        let mut reader = BufReader::new(reader);

                        let mut request_line = String::new();
                        if reader.read_line(&mut request_line).await.unwrap_or(0) == 0 {
                            return;
                        }
                        let path = request_line
                            .split_whitespace()
                            .nth(1)
                            .unwrap_or("/")
                            .to_string();

                        let mut headers = Vec::new();
                        loop {
                            let mut line = String::new();
                            if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                                break;
                            }
                            let line = line.trim_end();
                            if line.is_empty() {
                                break;
                            }
                            if let Some((name, value)) = line.split_once(':') {
                                headers.push((name.trim().to_string(), value.trim().to_string()));
                            }
                        }
                        recorded.lock().unwrap().push(RecordedRequest {
                            path: path.clone(),
                            headers,
                        });

                        let (status, body) = f(path).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = writer.write_all(response.as_bytes()).await;
                        let _ = writer.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockAuxiliary { addr, requests }
}

/// A healthy auxiliary service with a small fixed data set.
pub async fn start_healthy_auxiliary() -> MockAuxiliary {
    start_programmable_auxiliary(|path| async move { healthy_response(&path) }).await
}

/// Responses of a healthy auxiliary service.
pub fn healthy_response(path: &str) -> (u16, String) {
    match path {
        "/version" => (200, r#"{"version":"2.1.0"}"#.into()),
        "/health" => (200, r#"{"status":"ok"}"#.into()),
        "/aws/s3/buckets" => (200, r#"[{"name":"assets"},{"name":"logs"}]"#.into()),
        "/aws/parameters/list" => (200, r#"["db-password","api-key"]"#.into()),
        "/aws/parameters?name=db-password" => (200, r#"{"name":"db-password","value":"hunter2"}"#.into()),
        p if p.starts_with("/aws/parameters?name=") => {
            let name = &p["/aws/parameters?name=".len()..];
            (404, format!(r#"{{"error":"Parameter {name} not found"}}"#))
        }
        _ => (500, r#"{"error":"unexpected path"}"#.into()),
    }
}

/// Mock auxiliary service that accepts connections and never answers.
pub struct HangingAuxiliary {
    pub addr: SocketAddr,
    accepted: Arc<AtomicUsize>,
}

impl HangingAuxiliary {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }
}

#[allow(dead_code)]
pub async fn start_hanging_auxiliary() -> HangingAuxiliary {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));

    let counter = accepted.clone();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            // Keep the socket open without reading or writing
            held.push(socket);
        }
    });

    HangingAuxiliary { addr, accepted }
}

/// Base URL where nothing is listening.
#[allow(dead_code)]
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// A gateway running on an ephemeral port.
pub struct Gateway {
    pub addr: SocketAddr,
    pub metrics: Arc<GatewayMetrics>,
    shutdown: Shutdown,
}

impl Gateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for Gateway {
    fn drop(&mut self) {
        self.shutdown.trigger(ShutdownReason::Requested);
    }
}

/// Start a gateway that forwards to `auxiliary_base_url`.
pub async fn start_gateway(auxiliary_base_url: &str) -> Gateway {
    start_gateway_with(auxiliary_base_url, |_| {}).await
}

/// Like [`start_gateway`], with `configure` applied to the config first.
pub async fn start_gateway_with(
    auxiliary_base_url: &str,
    configure: impl FnOnce(&mut GatewayConfig),
) -> Gateway {
    let mut config = GatewayConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config.auxiliary.base_url = auxiliary_base_url.to_string();
    configure(&mut config);

    let listener = TcpListener::bind(config.listener.bind_address()).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = GatewayServer::new(config).unwrap();
    let metrics = server.metrics();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    Gateway {
        addr,
        metrics,
        shutdown,
    }
}

/// Client that never reuses connections or goes through a proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Value of the first exposition sample whose name and labels all match.
#[allow(dead_code)]
pub fn sample(text: &str, name: &str, labels: &[&str]) -> Option<f64> {
    text.lines()
        .filter(|line| line.starts_with(name) && line[name.len()..].starts_with('{'))
        .find(|line| labels.iter().all(|l| line.contains(l)))
        .and_then(|line| line.rsplit(' ').next())
        .and_then(|v| v.parse().ok())
}
