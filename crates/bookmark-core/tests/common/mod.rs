//! Minimal HTTP/1.1 server that answers requests from a fixed script.
//!
//! Each connection gets the next reply in the script; once the script runs
//! out the last reply is repeated. Every request target (path and query) is
//! recorded so tests can assert on what was fetched.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Default)]
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// When set, a `Retry-After` header holding the Unix timestamp this many
    /// seconds after the moment the reply is sent.
    pub retry_after_from_now: Option<u64>,
    pub body: String,
    /// Hold the connection open this long before answering
    pub stall: Option<Duration>,
}

impl Reply {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn retry_after_in(mut self, secs: u64) -> Self {
        self.retry_after_from_now = Some(secs);
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    pub fn stall(mut self, duration: Duration) -> Self {
        self.stall = Some(duration);
        self
    }
}

pub struct ScriptedServer {
    base: String,
    targets: Arc<Mutex<Vec<String>>>,
}

impl ScriptedServer {
    /// Start serving `script` on an ephemeral port in a background thread.
    pub fn start(script: Vec<Reply>) -> Self {
        assert!(!script.is_empty(), "script needs at least one reply");

        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let targets = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&targets);
        thread::spawn(move || {
            let mut next = 0usize;
            for stream in listener.incoming().flatten() {
                let reply = &script[next.min(script.len() - 1)];
                next += 1;
                handle(stream, reply, &recorded);
            }
        });

        Self {
            base: format!("http://127.0.0.1:{}", port),
            targets,
        }
    }

    /// URL of `path` on this server
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Request targets received so far
    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.targets.lock().unwrap().len()
    }
}

/// A URL on a port nobody listens on
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

fn handle(mut stream: TcpStream, reply: &Reply, targets: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));

    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    let request = String::from_utf8_lossy(&request);
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("")
        .to_string();
    targets.lock().unwrap().push(target);

    if let Some(stall) = reply.stall {
        thread::sleep(stall);
    }

    let mut head = format!(
        "HTTP/1.1 {} Scripted\r\nContent-Length: {}\r\nConnection: close\r\n",
        reply.status,
        reply.body.len()
    );
    for (name, value) in &reply.headers {
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    if let Some(secs) = reply.retry_after_from_now {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
        head.push_str(&format!("Retry-After: {}\r\n", now + secs));
    }
    head.push_str("\r\n");

    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(reply.body.as_bytes());
    let _ = stream.flush();
}
