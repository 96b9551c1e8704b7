//! Shared utilities for integration testing.

use serde_json::{json, Value};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

/// Every request the backend has received, in arrival order.
pub type RequestLog = Arc<Mutex<Vec<MockRequest>>>;

/// Every JSON-RPC call the node has answered: `(method, params)`.
pub type RpcLog = Arc<Mutex<Vec<(String, Value)>>>;

/// Count of logged calls to `method`.
#[allow(dead_code)]
pub fn rpc_calls(log: &RpcLog, method: &str) -> usize {
    log.lock().unwrap().iter().filter(|(m, _)| m == method).count()
}

/// Start a mock JSON-RPC node.
///
/// `handler` maps `(method, params)` to a result or to an error message,
/// which is returned as a JSON-RPC error object.
#[allow(dead_code)]
pub async fn start_rpc_node<F>(handler: F) -> (SocketAddr, RpcLog)
where
    F: Fn(&str, &Value) -> Result<Value, String> + Send + Sync + 'static,
{
    let handler = Arc::new(handler);
    let calls: RpcLog = Arc::new(Mutex::new(Vec::new()));
    let log = calls.clone();

    let (addr, _) = start_programmable_backend(move |req| {
        let handler = handler.clone();
        let calls = calls.clone();
        async move {
            let Ok(body) = serde_json::from_str::<Value>(&req.body) else {
                return (400, String::new());
            };
            let answer = |call: &Value| {
                let method = call["method"].as_str().unwrap_or_default().to_string();
                let params = call["params"].clone();
                calls.lock().unwrap().push((method.clone(), params.clone()));
                match handler(&method, &params) {
                    Ok(result) => json!({"jsonrpc": "2.0", "id": call["id"], "result": result}),
                    Err(message) => json!({
                        "jsonrpc": "2.0",
                        "id": call["id"],
                        "error": {"code": -32000, "message": message}
                    }),
                }
            };
            let response = match &body {
                Value::Array(batch) => Value::Array(batch.iter().map(answer).collect()),
                single => answer(single),
            };
            (200, response.to_string())
        }
    })
    .await;

    (addr, log)
}

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` maps each request to `(status, body)`. Returns the bound address and
/// the request log.
pub async fn start_programmable_backend<F, Fut>(f: F) -> (SocketAddr, RequestLog)
where
    F: Fn(MockRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let requests = log.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let requests = requests.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        requests.lock().unwrap().push(request.clone());

                        let (status, body) = f(request).await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, log)
}

async fn read_request(socket: &mut TcpStream) -> Option<MockRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = buf.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).to_string();

    Some(MockRequest { method, path, body })
}
