//! Test support for session lifecycle tests.

// Not every test binary exercises every helper
#![allow(dead_code)]

use console_api::Navigator;
use console_storage::{MemoryStore, Session, SessionStore};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A session as a login would have stored it.
pub fn sample_session() -> Session {
    Session {
        tenant_id: "tenant-1".to_string(),
        access_token: "tok-abc".to_string(),
        refresh_token: Some("refresh-xyz".to_string()),
        user_id: "user-42".to_string(),
        user_name: "Ada".to_string(),
        user_role: "manager".to_string(),
        user_email: "ada@example.com".to_string(),
        is_super_admin: false,
        subscription_status: "active".to_string(),
        subscription_current_period_end_at: "2026-12-01T00:00:00Z".to_string(),
        subscription_days_to_expiry: Some(117),
    }
}

pub fn empty_store() -> Arc<SessionStore> {
    Arc::new(SessionStore::new(Box::new(MemoryStore::new())))
}

pub fn store_with_session() -> Arc<SessionStore> {
    let store = empty_store();
    store.set(&sample_session()).unwrap();
    store
}

/// Navigator that records every navigation it is asked to perform.
#[derive(Default)]
pub struct RecordingNavigator {
    current: Mutex<String>,
    assigned: Mutex<Vec<String>>,
    replaced: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Arc<Self> {
        let navigator = Self::default();
        *navigator.current.lock().unwrap() = path.to_string();
        Arc::new(navigator)
    }

    pub fn assigned(&self) -> Vec<String> {
        self.assigned.lock().unwrap().clone()
    }

    pub fn replaced(&self) -> Vec<String> {
        self.replaced.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.current.lock().unwrap().clone()
    }

    fn assign(&self, url: &str) {
        self.assigned.lock().unwrap().push(url.to_string());
    }

    fn replace(&self, url: &str) {
        self.replaced.lock().unwrap().push(url.to_string());
    }
}

/// Minimal HTTP server answering every request with one canned response.
pub struct MockServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Start a server answering with the given status and JSON body.
    pub async fn start(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        let response = format!(
            "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = tokio::spawn({
            let requests = requests.clone();
            async move {
                loop {
                    let Ok((mut socket, _)) = listener.accept().await else {
                        break;
                    };
                    let requests = requests.clone();
                    let response = response.clone();
                    tokio::spawn(async move {
                        let mut buf = Vec::new();
                        let mut chunk = [0u8; 1024];
                        loop {
                            let Ok(n) = socket.read(&mut chunk).await else {
                                return;
                            };
                            if n == 0 {
                                return;
                            }
                            buf.extend_from_slice(&chunk[..n]);
                            if let Some(request_line) = complete_request_line(&buf) {
                                requests.lock().unwrap().push(request_line);
                                let _ = socket.write_all(response.as_bytes()).await;
                                let _ = socket.shutdown().await;
                                return;
                            }
                        }
                    });
                }
            }
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request lines ("METHOD /path") received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Once the head and the advertised body have fully arrived, return
/// "METHOD /path".
fn complete_request_line(buf: &[u8]) -> Option<String> {
    let head_end = buf.windows(4).position(|w| w == b"\r\n\r\n")?;
    let head = String::from_utf8_lossy(&buf[..head_end]);

    let body_len: usize = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0);
    if buf.len() < head_end + 4 + body_len {
        return None;
    }

    let mut parts = head.lines().next()?.split_whitespace();
    let method = parts.next()?;
    let path = parts.next()?;
    Some(format!("{} {}", method, path))
}
